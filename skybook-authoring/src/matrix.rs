use serde::Serialize;
use tracing::warn;
use skybook_core::{Cell, CellId, ClassId, SeatMap};
use crate::limits::{AuthoringLimits, DEFAULT_ROWS, MAX_ROWS};
use crate::submission::SeatBlockSubmission;
use crate::{AuthoringError, AuthoringResult};

/// Result of a column bulk toggle: how many cells changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnToggle {
    Cleared { changed: u32 },
    Filled { changed: u32 },
}

/// One matrix position as the backend persists it (`x` = column, `y` = row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockCell {
    pub x: u32,
    pub y: u32,
    pub is_seat: bool,
}

/// Seat block being designed by an airline admin: `true` is a seat, `false`
/// an aisle or empty space.
///
/// Every operation either fully applies or leaves the matrix untouched, and
/// the seat count never goes above `limits.seat_ceiling`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthoringMatrix {
    cells: Vec<Vec<bool>>,
    limits: AuthoringLimits,
}

impl AuthoringMatrix {
    /// Ten rows by the aircraft's maximum column count.
    pub fn new(limits: AuthoringLimits) -> Self {
        Self::with_dimensions(limits, DEFAULT_ROWS, limits.max_cols)
    }

    pub fn with_dimensions(limits: AuthoringLimits, rows: u32, cols: u32) -> Self {
        let rows = limits.clamp_rows(rows) as usize;
        let cols = limits.clamp_cols(cols) as usize;
        Self {
            cells: vec![vec![false; cols]; rows],
            limits,
        }
    }

    pub fn rows(&self) -> u32 {
        self.cells.len() as u32
    }

    pub fn cols(&self) -> u32 {
        self.cells.first().map_or(0, |row| row.len() as u32)
    }

    pub fn limits(&self) -> AuthoringLimits {
        self.limits
    }

    pub fn matrix(&self) -> &[Vec<bool>] {
        &self.cells
    }

    pub fn is_seat(&self, row: u32, col: u32) -> Option<bool> {
        self.cells.get(row as usize)?.get(col as usize).copied()
    }

    pub fn count_seats(&self) -> u32 {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|seat| **seat).count() as u32)
            .sum()
    }

    /// Seats that can still be added before hitting the ceiling.
    pub fn remaining(&self) -> u32 {
        self.limits.seat_ceiling.saturating_sub(self.count_seats())
    }

    /// Reallocate to `rows × cols` (clamped to the limits), keeping the
    /// values of the overlapping area. Returns the dimensions applied.
    pub fn resize(&mut self, rows: u32, cols: u32) -> (u32, u32) {
        let rows = self.limits.clamp_rows(rows) as usize;
        let cols = self.limits.clamp_cols(cols) as usize;

        self.cells.resize_with(rows, Vec::new);
        for row in &mut self.cells {
            row.resize(cols, false);
        }

        (rows as u32, cols as u32)
    }

    /// Flip one cell. Returns the new value.
    pub fn toggle_cell(&mut self, row: u32, col: u32) -> AuthoringResult<bool> {
        let current = self
            .is_seat(row, col)
            .ok_or(AuthoringError::OutOfBounds { row, col })?;

        if !current {
            self.ensure_room(1)?;
        }

        self.cells[row as usize][col as usize] = !current;
        Ok(!current)
    }

    /// Clear the column when it is all seats, otherwise fill its gaps.
    /// Filling is refused as a whole when the gaps do not fit under the
    /// ceiling.
    pub fn toggle_column(&mut self, col: u32) -> AuthoringResult<ColumnToggle> {
        if col >= self.cols() {
            return Err(AuthoringError::OutOfBounds { row: 0, col });
        }
        let col = col as usize;

        let gaps = self.cells.iter().filter(|row| !row[col]).count() as u32;

        if gaps == 0 {
            for row in &mut self.cells {
                row[col] = false;
            }
            return Ok(ColumnToggle::Cleared { changed: self.rows() });
        }

        self.ensure_room(gaps)?;
        for row in &mut self.cells {
            row[col] = true;
        }
        Ok(ColumnToggle::Filled { changed: gaps })
    }

    /// Append an empty row; no-op at the row limit.
    pub fn add_row(&mut self) -> bool {
        if self.rows() >= self.limits.max_rows.min(MAX_ROWS) {
            return false;
        }
        let cols = self.cols() as usize;
        self.cells.push(vec![false; cols]);
        true
    }

    /// Drop the last row; no-op when only one is left.
    pub fn remove_row(&mut self) -> bool {
        if self.rows() <= 1 {
            return false;
        }
        self.cells.pop();
        true
    }

    pub fn reset(&mut self) {
        for row in &mut self.cells {
            row.fill(false);
        }
    }

    /// Snapshot the matrix as a submission payload. The matrix itself is
    /// left as is, so a failed upload can be retried.
    pub fn submit(&self, class_id: Option<ClassId>) -> AuthoringResult<SeatBlockSubmission> {
        let class_id = class_id.ok_or(AuthoringError::MissingClass)?;

        let total_seats = self.count_seats();
        if total_seats == 0 {
            return Err(AuthoringError::NoSeats);
        }
        if total_seats > self.limits.seat_ceiling {
            return Err(AuthoringError::CeilingExceeded {
                ceiling: self.limits.seat_ceiling,
                requested: total_seats,
            });
        }

        Ok(SeatBlockSubmission {
            matrix: self.cells.clone(),
            class_id,
            total_seats,
            rows: self.rows(),
            cols: self.cols(),
        })
    }

    /// Row-major list of every position, seats and aisles alike.
    pub fn to_cells(&self) -> Vec<BlockCell> {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(y, row)| {
                row.iter().enumerate().map(move |(x, is_seat)| BlockCell {
                    x: x as u32,
                    y: y as u32,
                    is_seat: *is_seat,
                })
            })
            .collect()
    }

    /// The block as a seat map, with provisional ids numbered from 1 in
    /// row-major order.
    pub fn preview(&self) -> SeatMap {
        let cols = self.cols();
        let cells = self
            .to_cells()
            .into_iter()
            .zip(1u32..)
            .map(|(c, id)| Cell {
                id: CellId(id),
                x: c.x,
                y: c.y,
                is_seat: c.is_seat,
                class_tag: None,
            })
            .collect();

        SeatMap {
            block_id: None,
            class_id: None,
            class_name: String::new(),
            rows: self.rows(),
            cols,
            cells,
        }
    }

    fn ensure_room(&self, adding: u32) -> AuthoringResult<()> {
        let requested = self.count_seats() + adding;
        if requested > self.limits.seat_ceiling {
            warn!("Cannot exceed {} seats limit (requested {})", self.limits.seat_ceiling, requested);
            return Err(AuthoringError::CeilingExceeded {
                ceiling: self.limits.seat_ceiling,
                requested,
            });
        }
        Ok(())
    }
}

/// Spreadsheet-style label: column letter(s) then 1-based row, e.g. `C12`.
pub fn seat_label(row: u32, col: u32) -> String {
    let mut letters = Vec::new();
    let mut n = col + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect::<String>() + &(row + 1).to_string()
}
