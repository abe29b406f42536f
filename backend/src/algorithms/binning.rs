//! Court coordinate binning.
//!
//! A coordinate `v` lands in bucket `round(v / g) * g` for grid size `g`.
//! Ties round half to even (`0.5 -> 0`, `1.5 -> 2`, `-2.5 -> -2`).

use crate::error::{ServiceError, ServiceResult};

/// Edge length of a square grid bucket, in feet. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridSize(i64);

impl GridSize {
    pub fn new(feet: i64) -> ServiceResult<Self> {
        if feet < 1 {
            return Err(ServiceError::invalid(format!(
                "grid size must be a positive number of feet, got {}",
                feet
            )));
        }
        Ok(GridSize(feet))
    }

    pub fn feet(self) -> i64 {
        self.0
    }

    /// Bucket coordinate for `value`.
    ///
    /// Non-finite input maps to 0; callers that care filter it out first.
    pub fn snap(self, value: f64) -> i64 {
        let cells = (value / self.0 as f64).round_ties_even();
        (cells as i64).saturating_mul(self.0)
    }
}

impl TryFrom<i64> for GridSize {
    type Error = ServiceError;

    fn try_from(feet: i64) -> ServiceResult<Self> {
        GridSize::new(feet)
    }
}

/// Bin a single coordinate at `grid_size` feet.
pub fn bin(value: f64, grid_size: i64) -> ServiceResult<i64> {
    Ok(GridSize::new(grid_size)?.snap(value))
}
