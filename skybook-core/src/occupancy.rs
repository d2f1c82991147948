use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use crate::ids::{CellId, ClassId};

/// One entry of `GET /flight/{id}/seats-occupied`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupiedBlock {
    #[serde(default, alias = "id_cabin")]
    pub id_cell_block: Option<u32>,
    #[serde(default)]
    pub id_class: Option<ClassId>,
    #[serde(default)]
    pub occupied_seats: u32,
    #[serde(default)]
    pub seats: Vec<OccupiedSeat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupiedSeat {
    pub id_cell: CellId,
    #[serde(default)]
    pub x: u32,
    #[serde(default)]
    pub y: u32,
}

/// Seats already booked on one leg. Never edited locally, only replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupancyIndex {
    occupied: HashSet<CellId>,
}

impl OccupancyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_blocks(blocks: &[OccupiedBlock]) -> Self {
        blocks
            .iter()
            .flat_map(|block| block.seats.iter().map(|seat| seat.id_cell))
            .collect()
    }

    pub fn contains(&self, id: CellId) -> bool {
        self.occupied.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.occupied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CellId> + '_ {
        self.occupied.iter().copied()
    }
}

impl FromIterator<CellId> for OccupancyIndex {
    fn from_iter<I: IntoIterator<Item = CellId>>(iter: I) -> Self {
        Self {
            occupied: iter.into_iter().collect(),
        }
    }
}
