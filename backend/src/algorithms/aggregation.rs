//! Shot aggregation into grid cells.
//!
//! Shots are binned with [`GridSize::snap`], grouped by
//! `(x, y, is_three_point)`, counted, filtered by a minimum number of
//! attempts and turned into [`GridCell`]s. The output is sorted by the group
//! key (two-point before three-point within a bucket), so the same input always
//! produces the same sequence.

use std::collections::BTreeMap;

use super::binning::GridSize;
use crate::models::{point_value, GridCell, RawShot};

/// Counters describing one aggregation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationSummary {
    /// Records handed to the aggregator.
    pub input: usize,
    /// Records that made it into a group.
    pub used: usize,
    /// Records dropped because the made flag was unknown.
    pub skipped_unknown_outcome: usize,
    /// Records dropped because a coordinate was NaN or infinite.
    pub skipped_bad_coordinates: usize,
    /// Distinct `(x, y, is_three_point)` groups before filtering.
    pub groups: usize,
    /// Groups that survived the attempts filter.
    pub cells: usize,
}

/// Cells plus the counters that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub cells: Vec<GridCell>,
    pub summary: AggregationSummary,
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    attempts: u32,
    made: u32,
}

/// Aggregate `shots` on `grid`, dropping groups with fewer than
/// `min_attempts` attempts. A threshold of 0 behaves like 1.
pub fn aggregate(shots: &[RawShot], grid: GridSize, min_attempts: u32) -> Vec<GridCell> {
    aggregate_with_summary(shots, grid, min_attempts).cells
}

/// Same as [`aggregate`], also reporting how many records were skipped.
pub fn aggregate_with_summary(shots: &[RawShot], grid: GridSize, min_attempts: u32) -> Aggregation {
    let min_attempts = min_attempts.max(1);
    let mut summary = AggregationSummary {
        input: shots.len(),
        ..AggregationSummary::default()
    };
    let mut groups: BTreeMap<(i64, i64, bool), Tally> = BTreeMap::new();

    for shot in shots {
        let Some(made) = shot.made else {
            summary.skipped_unknown_outcome += 1;
            continue;
        };
        if !shot.x_feet.is_finite() || !shot.y_feet.is_finite() {
            summary.skipped_bad_coordinates += 1;
            continue;
        }

        let key = (grid.snap(shot.x_feet), grid.snap(shot.y_feet), shot.is_three_point);
        let tally = groups.entry(key).or_default();
        tally.attempts = tally.attempts.saturating_add(1);
        if made {
            tally.made = tally.made.saturating_add(1);
        }
        summary.used += 1;
    }
    summary.groups = groups.len();

    let cells: Vec<GridCell> = groups
        .into_iter()
        .filter(|(_, tally)| tally.attempts >= min_attempts)
        .map(|((x, y, is_three_point), tally)| build_cell(x, y, is_three_point, tally))
        .collect();
    summary.cells = cells.len();

    Aggregation { cells, summary }
}

fn build_cell(x: i64, y: i64, is_three_point: bool, tally: Tally) -> GridCell {
    let field_goal_pct = f64::from(tally.made) / f64::from(tally.attempts);
    GridCell {
        x,
        y,
        attempts: tally.attempts,
        made: tally.made,
        field_goal_pct,
        points_per_shot: field_goal_pct * f64::from(point_value(is_three_point)),
        is_three_point,
    }
}

#[cfg(test)]
#[path = "aggregation_tests.rs"]
mod aggregation_tests;
