use serde::{Deserialize, Serialize};
use crate::ids::CellId;

/// One grid position of a seat map. `is_seat == false` marks an aisle or
/// empty space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(rename = "id_cell")]
    pub id: CellId,
    pub x: u32,
    pub y: u32,
    pub is_seat: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_tag: Option<String>,
}

impl Cell {
    pub fn seat(id: u32, x: u32, y: u32) -> Self {
        Self {
            id: CellId(id),
            x,
            y,
            is_seat: true,
            class_tag: None,
        }
    }

    pub fn aisle(id: u32, x: u32, y: u32) -> Self {
        Self {
            is_seat: false,
            ..Self::seat(id, x, y)
        }
    }

    pub fn position(&self) -> (u32, u32) {
        (self.x, self.y)
    }
}
