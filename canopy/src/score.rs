//! Priority score and ranking of zones.

use crate::error::CanopyError;
use serde::{Deserialize, Serialize};

/// Aggregates collected for a zone. Both slots must be filled before the zone can be scored.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneMetrics {
    /// Identifier of the zone.
    pub id: String,
    /// Number of trees in the zone.
    pub tree_count: Option<usize>,
    /// Distance to the nearest road.
    pub nearest_road_distance: Option<f64>,
}

impl ZoneMetrics {
    /// Metrics with empty slots.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tree_count: None,
            nearest_road_distance: None,
        }
    }

    /// Fills the tree count slot.
    pub fn with_tree_count(mut self, count: usize) -> Self {
        self.tree_count = Some(count);
        self
    }

    /// Fills the road distance slot.
    pub fn with_road_distance(mut self, distance: f64) -> Self {
        self.nearest_road_distance = Some(distance);
        self
    }
}

/// Zone with its aggregates and score. One row of the result table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredZone {
    /// Identifier of the zone.
    pub id: String,
    /// Number of trees in the zone.
    pub tree_count: usize,
    /// Distance to the nearest road.
    pub nearest_road_distance: f64,
    /// Priority score.
    pub priority_score: f64,
}

/// `tree_count / (distance + epsilon)`.
pub fn priority_score(tree_count: usize, distance: f64, epsilon: f64) -> f64 {
    if tree_count == 0 {
        return 0.0;
    }

    tree_count as f64 / (distance + epsilon)
}

/// Zones ordered by descending score. Zones with equal score are ordered by identifier.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RankedResult {
    zones: Vec<ScoredZone>,
}

impl RankedResult {
    /// Scores the zones and ranks them.
    ///
    /// Fails with [`CanopyError::IncompleteData`] if any of the zones misses one of the aggregates.
    pub fn rank(metrics: Vec<ZoneMetrics>, epsilon: f64) -> Result<Self, CanopyError> {
        let mut zones = metrics
            .into_iter()
            .map(|metrics| score_zone(metrics, epsilon))
            .collect::<Result<Vec<_>, _>>()?;

        zones.sort_by(|a, b| {
            b.priority_score
                .total_cmp(&a.priority_score)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(Self { zones })
    }

    /// The top priority zone.
    pub fn top_priority(&self) -> Option<&ScoredZone> {
        self.zones.first()
    }

    /// First `n` zones of the ranking, or all of them if there are fewer.
    pub fn top(&self, n: usize) -> &[ScoredZone] {
        &self.zones[..n.min(self.zones.len())]
    }

    /// All zones in rank order.
    pub fn rows(&self) -> &[ScoredZone] {
        &self.zones
    }

    /// Number of ranked zones.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Returns true if there are no ranked zones.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Position of the zone in the ranking, starting from 0.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.zones.iter().position(|zone| zone.id == id)
    }
}

fn score_zone(metrics: ZoneMetrics, epsilon: f64) -> Result<ScoredZone, CanopyError> {
    let ZoneMetrics {
        id,
        tree_count,
        nearest_road_distance,
    } = metrics;

    let Some(tree_count) = tree_count else {
        return Err(CanopyError::IncompleteData {
            zone_id: id,
            missing: "tree count",
        });
    };

    let distance = match nearest_road_distance {
        Some(distance) if distance.is_finite() && distance >= 0.0 => distance,
        _ => {
            return Err(CanopyError::IncompleteData {
                zone_id: id,
                missing: "road distance",
            })
        }
    };

    let score = priority_score(tree_count, distance, epsilon);
    if !score.is_finite() {
        return Err(CanopyError::Configuration(format!(
            "epsilon {epsilon:e} is too small to score zone `{id}` with {tree_count} trees"
        )));
    }

    Ok(ScoredZone {
        priority_score: score,
        id,
        tree_count,
        nearest_road_distance: distance,
    })
}
