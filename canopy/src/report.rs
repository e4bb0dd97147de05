//! Text tables for the console.

use crate::pipeline::Report;
use crate::score::{RankedResult, ScoredZone};
use std::fmt::{Display, Formatter, Write};

const HEADERS: [&str; 4] = ["Zone", "Tree count", "Road distance (m)", "Priority score"];

/// Grid table of ranked zones.
///
/// ```text
/// +------+------------+-------------------+----------------+
/// | Zone | Tree count | Road distance (m) | Priority score |
/// +======+============+===================+================+
/// | B    |         10 |             0.000 |   10000000.000 |
/// +------+------------+-------------------+----------------+
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ZoneTable<'a> {
    zones: &'a [ScoredZone],
}

impl<'a> ZoneTable<'a> {
    /// Table with the given rows.
    pub fn new(zones: &'a [ScoredZone]) -> Self {
        Self { zones }
    }
}

impl RankedResult {
    /// Table of the first `n` zones.
    pub fn table(&self, n: usize) -> ZoneTable<'_> {
        ZoneTable::new(self.top(n))
    }
}

fn cells(zone: &ScoredZone) -> [String; 4] {
    [
        zone.id.clone(),
        zone.tree_count.to_string(),
        format!("{:.3}", zone.nearest_road_distance),
        format!("{:.3}", zone.priority_score),
    ]
}

fn separator(f: &mut Formatter<'_>, widths: &[usize; 4], fill: char) -> std::fmt::Result {
    f.write_char('+')?;
    for width in widths {
        for _ in 0..width + 2 {
            f.write_char(fill)?;
        }
        f.write_char('+')?;
    }
    f.write_char('\n')
}

impl Display for ZoneTable<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let rows: Vec<[String; 4]> = self.zones.iter().map(cells).collect();

        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        separator(f, &widths, '-')?;
        f.write_char('|')?;
        for (header, width) in HEADERS.iter().zip(widths) {
            write!(f, " {header:<width$} |")?;
        }
        f.write_char('\n')?;
        separator(f, &widths, '=')?;

        for row in &rows {
            f.write_char('|')?;
            // Identifiers are left aligned, numbers right aligned.
            write!(f, " {:<width$} |", row[0], width = widths[0])?;
            for (cell, width) in row[1..].iter().zip(widths[1..].iter().copied()) {
                write!(f, " {cell:>width$} |")?;
            }
            f.write_char('\n')?;
            separator(f, &widths, '-')?;
        }

        Ok(())
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== TOP 10 PRIORITY ZONES ===")?;
        write!(f, "{}", self.ranked.table(10))?;
        writeln!(f)?;
        writeln!(f, "=== TOP PRIORITY ZONE ===")?;
        write!(f, "{}", self.ranked.table(1))?;

        if !self.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "=== EXCLUDED FEATURES ({}) ===", self.warnings.len())?;
            for warning in &self.warnings {
                writeln!(f, "{warning}")?;
            }
        }

        Ok(())
    }
}
