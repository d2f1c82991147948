use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use crate::cell::Cell;
use crate::ids::{CellId, ClassId};
use crate::{CoreError, CoreResult};

// ============================================================================
// Backend payloads
// ============================================================================

/// `GET .../seat_map` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatMapResponse {
    #[serde(default)]
    pub additional_seats_remaining: Option<i64>,
    #[serde(default)]
    pub seats_number: u32,
    pub seat_map: Vec<SeatBlockPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatBlockPayload {
    #[serde(alias = "id_cabin")]
    pub id_cell_block: Option<u32>,
    pub id_class: Option<ClassId>,
    #[serde(default)]
    pub class_name: String,
    pub rows: u32,
    pub cols: u32,
    #[serde(default)]
    pub cells: Vec<Cell>,
}

// ============================================================================
// Validated model
// ============================================================================

/// Largest grid a single block may declare.
pub const MAX_BLOCK_ROWS: u32 = 50;
pub const MAX_BLOCK_COLS: u32 = 50;

/// A class-tagged block of cells laid out on a `rows × cols` grid.
///
/// `SeatMap::new` and the `TryFrom` conversions are the loader boundary:
/// they refuse cells outside the grid and cells sharing a position. The
/// fields stay public, so consumers that render must still tolerate
/// inconsistent values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatMap {
    pub block_id: Option<u32>,
    pub class_id: Option<ClassId>,
    pub class_name: String,
    pub rows: u32,
    pub cols: u32,
    pub cells: Vec<Cell>,
}

impl SeatMap {
    pub fn new(rows: u32, cols: u32, cells: Vec<Cell>) -> CoreResult<Self> {
        let map = Self {
            block_id: None,
            class_id: None,
            class_name: String::new(),
            rows,
            cols,
            cells,
        };
        map.validate()?;
        Ok(map)
    }

    pub fn with_class(mut self, class_id: ClassId, class_name: impl Into<String>) -> Self {
        self.class_id = Some(class_id);
        self.class_name = class_name.into();
        self
    }

    /// Check grid dimensions, cell bounds, position collisions and id
    /// collisions.
    pub fn validate(&self) -> CoreResult<()> {
        if self.rows > MAX_BLOCK_ROWS || self.cols > MAX_BLOCK_COLS {
            return Err(CoreError::Validation(format!(
                "{}x{} grid exceeds the {}x{} block limit",
                self.rows, self.cols, MAX_BLOCK_ROWS, MAX_BLOCK_COLS
            )));
        }

        let mut positions = HashSet::with_capacity(self.cells.len());
        let mut ids = HashSet::with_capacity(self.cells.len());

        for cell in &self.cells {
            if !self.contains(cell.x, cell.y) {
                return Err(CoreError::Validation(format!(
                    "cell {} at ({}, {}) is outside a {}x{} grid",
                    cell.id, cell.x, cell.y, self.rows, self.cols
                )));
            }
            if !positions.insert(cell.position()) {
                return Err(CoreError::Validation(format!(
                    "cell {} collides with another cell at ({}, {})",
                    cell.id, cell.x, cell.y
                )));
            }
            if !ids.insert(cell.id) {
                return Err(CoreError::Validation(format!("duplicate cell id {}", cell.id)));
            }
        }

        Ok(())
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.cols && y < self.rows
    }

    pub fn find(&self, id: CellId) -> Option<&Cell> {
        self.cells.iter().find(|c| c.id == id)
    }

    pub fn cell_at(&self, x: u32, y: u32) -> Option<&Cell> {
        self.cells.iter().find(|c| c.x == x && c.y == y)
    }

    pub fn seat_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_seat).count()
    }
}

impl TryFrom<SeatBlockPayload> for SeatMap {
    type Error = CoreError;

    fn try_from(payload: SeatBlockPayload) -> CoreResult<Self> {
        let class_name = payload.class_name;
        let cells = payload
            .cells
            .into_iter()
            .map(|mut cell| {
                if cell.class_tag.is_none() && !class_name.is_empty() {
                    cell.class_tag = Some(class_name.clone());
                }
                cell
            })
            .collect();

        let map = SeatMap {
            block_id: payload.id_cell_block,
            class_id: payload.id_class,
            class_name,
            rows: payload.rows,
            cols: payload.cols,
            cells,
        };
        map.validate()?;
        Ok(map)
    }
}

/// Every block of one aircraft (or of the aircraft flying one leg).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AircraftSeatMap {
    pub blocks: Vec<SeatMap>,
    pub seats_number: u32,
    pub additional_seats_remaining: Option<u32>,
}

impl AircraftSeatMap {
    pub fn new(blocks: Vec<SeatMap>) -> CoreResult<Self> {
        let seats_number = blocks.iter().map(|b| b.seat_count() as u32).sum();
        let map = Self {
            blocks,
            seats_number,
            additional_seats_remaining: None,
        };
        map.check_unique_ids()?;
        Ok(map)
    }

    /// Locate a cell and the block holding it.
    pub fn find(&self, id: CellId) -> Option<(&SeatMap, &Cell)> {
        self.blocks
            .iter()
            .find_map(|block| block.find(id).map(|cell| (block, cell)))
    }

    pub fn total_seats(&self) -> usize {
        self.blocks.iter().map(SeatMap::seat_count).sum()
    }

    fn check_unique_ids(&self) -> CoreResult<()> {
        let mut owners: HashMap<CellId, usize> = HashMap::new();
        for (index, block) in self.blocks.iter().enumerate() {
            for cell in &block.cells {
                if let Some(other) = owners.insert(cell.id, index) {
                    if other != index {
                        return Err(CoreError::Validation(format!(
                            "cell id {} appears in blocks {} and {}",
                            cell.id, other, index
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl TryFrom<SeatMapResponse> for AircraftSeatMap {
    type Error = CoreError;

    fn try_from(response: SeatMapResponse) -> CoreResult<Self> {
        let blocks = response
            .seat_map
            .into_iter()
            .map(SeatMap::try_from)
            .collect::<CoreResult<Vec<_>>>()?;

        let map = Self {
            blocks,
            seats_number: response.seats_number,
            additional_seats_remaining: response
                .additional_seats_remaining
                .map(|n| n.clamp(0, u32::MAX as i64) as u32),
        };
        map.check_unique_ids()?;
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_bounds_cell() {
        let result = SeatMap::new(2, 3, vec![Cell::seat(1, 0, 0), Cell::seat(2, 3, 1)]);
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_rejects_colliding_cells() {
        let result = SeatMap::new(2, 2, vec![Cell::seat(1, 1, 1), Cell::aisle(2, 1, 1)]);
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_rejects_oversized_grid() {
        assert!(SeatMap::new(MAX_BLOCK_ROWS, MAX_BLOCK_COLS, vec![Cell::seat(1, 0, 0)]).is_ok());
        assert!(SeatMap::new(MAX_BLOCK_ROWS + 1, 3, vec![Cell::seat(1, 0, 0)]).is_err());

        let json = r#"
            {
                "seat_map": [
                    {
                        "rows": 4294967295,
                        "cols": 4294967295,
                        "cells": [{ "id_cell": 1, "x": 0, "y": 0, "is_seat": true }]
                    }
                ]
            }
        "#;
        let response: SeatMapResponse = serde_json::from_str(json).expect("Failed to deserialize");
        let result = AircraftSeatMap::try_from(response);
        assert!(matches!(result, Err(CoreError::Validation(msg)) if msg.contains("block limit")));
    }

    #[test]
    fn test_lookup() {
        let map = SeatMap::new(1, 3, vec![Cell::seat(7, 0, 0), Cell::aisle(8, 1, 0), Cell::seat(9, 2, 0)])
            .unwrap()
            .with_class(ClassId(1), "Economy");

        assert_eq!(map.seat_count(), 2);
        assert_eq!(map.find(CellId(9)).map(|c| c.x), Some(2));
        assert_eq!(map.cell_at(1, 0).map(|c| c.id), Some(CellId(8)));
        assert!(map.cell_at(0, 1).is_none());
    }

    #[test]
    fn test_response_conversion() {
        let json = r#"
            {
                "additional_seats_remaining": 120,
                "seats_number": 4,
                "seat_map": [
                    {
                        "class_name": "Business",
                        "id_cabin": 5,
                        "id_class": 2,
                        "rows": 2,
                        "cols": 3,
                        "cells": [
                            { "id_cell": 1, "x": 0, "y": 0, "is_seat": true },
                            { "id_cell": 2, "x": 1, "y": 0, "is_seat": false },
                            { "id_cell": 3, "x": 2, "y": 0, "is_seat": true }
                        ]
                    },
                    {
                        "class_name": "Economy",
                        "id_cell_block": 6,
                        "id_class": 1,
                        "rows": 1,
                        "cols": 2,
                        "cells": [
                            { "id_cell": 4, "x": 0, "y": 0, "is_seat": true },
                            { "id_cell": 5, "x": 1, "y": 0, "is_seat": true }
                        ]
                    }
                ]
            }
        "#;
        let response: SeatMapResponse = serde_json::from_str(json).expect("Failed to deserialize");
        let map = AircraftSeatMap::try_from(response).unwrap();

        assert_eq!(map.blocks.len(), 2);
        assert_eq!(map.blocks[0].block_id, Some(5));
        assert_eq!(map.additional_seats_remaining, Some(120));
        assert_eq!(map.total_seats(), 4);

        let (block, cell) = map.find(CellId(5)).unwrap();
        assert_eq!(block.class_name, "Economy");
        assert_eq!(cell.class_tag.as_deref(), Some("Economy"));
    }

    #[test]
    fn test_rejects_ids_shared_across_blocks() {
        let a = SeatMap::new(1, 1, vec![Cell::seat(1, 0, 0)]).unwrap();
        let b = SeatMap::new(1, 1, vec![Cell::seat(1, 0, 0)]).unwrap();
        assert!(AircraftSeatMap::new(vec![a, b]).is_err());
    }
}
