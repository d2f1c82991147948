use serde::{Deserialize, Serialize};
use skybook_core::{MAX_BLOCK_COLS, MAX_BLOCK_ROWS};

pub const DEFAULT_SEAT_CEILING: u32 = 180;
pub const MAX_ROWS: u32 = MAX_BLOCK_ROWS;
/// Widest cabin accepted from the aircraft or the caller.
pub const MAX_COLS: u32 = MAX_BLOCK_COLS;
pub const DEFAULT_MAX_COLS: u32 = 20;
pub const DEFAULT_ROWS: u32 = 10;

/// Bounds an authoring matrix must respect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoringLimits {
    pub max_rows: u32,
    pub max_cols: u32,
    pub seat_ceiling: u32,
}

impl AuthoringLimits {
    /// `cabin_max_cols` comes from the aircraft; a missing or zero value
    /// falls back to 20 columns, anything wider than `MAX_COLS` is cut down.
    pub fn new(cabin_max_cols: Option<u32>, seat_ceiling: u32) -> Self {
        Self {
            max_rows: MAX_ROWS,
            max_cols: cabin_max_cols
                .filter(|c| *c > 0)
                .unwrap_or(DEFAULT_MAX_COLS)
                .min(MAX_COLS),
            seat_ceiling,
        }
    }

    /// Configured row limit, kept within `[1, MAX_ROWS]`.
    pub fn with_max_rows(mut self, max_rows: u32) -> Self {
        self.max_rows = max_rows.clamp(1, MAX_ROWS);
        self
    }

    /// Lower the ceiling to what the aircraft still has room for.
    pub fn with_remaining(mut self, remaining: u32) -> Self {
        self.seat_ceiling = self.seat_ceiling.min(remaining);
        self
    }

    // The fields are public, so the hard caps apply here as well.
    pub fn clamp_rows(&self, rows: u32) -> u32 {
        rows.clamp(1, self.max_rows.clamp(1, MAX_ROWS))
    }

    pub fn clamp_cols(&self, cols: u32) -> u32 {
        cols.clamp(1, self.max_cols.clamp(1, MAX_COLS))
    }
}

impl Default for AuthoringLimits {
    fn default() -> Self {
        Self::new(None, DEFAULT_SEAT_CEILING)
    }
}
