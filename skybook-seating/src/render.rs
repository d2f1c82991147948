use serde::Serialize;
use skybook_core::{Cell, CellId, ClassId, OccupancyIndex, PassengerId, SeatMap};
use skybook_core::{MAX_BLOCK_COLS, MAX_BLOCK_ROWS};
use crate::selection::LegSelection;

/// Display state of one cell, as seen by one passenger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatState {
    /// Aisle or empty space, never interactive
    Aisle,
    /// Booked by someone else on this flight
    Occupied,
    /// This passenger's current choice
    Selected,
    /// Chosen by another passenger of the same reservation
    Taken,
    Available,
}

impl SeatState {
    pub fn is_disabled(self) -> bool {
        matches!(self, SeatState::Occupied | SeatState::Taken)
    }

    pub fn is_clickable(self) -> bool {
        matches!(self, SeatState::Selected | SeatState::Available)
    }
}

/// Priority order: aisle, occupied, own selection, other passenger's
/// selection, available.
pub fn seat_state(
    cell: &Cell,
    occupancy: &OccupancyIndex,
    selection: &LegSelection,
    passenger: PassengerId,
) -> SeatState {
    if !cell.is_seat {
        return SeatState::Aisle;
    }
    if occupancy.contains(cell.id) {
        return SeatState::Occupied;
    }
    match selection.owner_of(cell.id) {
        Some(owner) if owner == passenger => SeatState::Selected,
        Some(_) => SeatState::Taken,
        None => SeatState::Available,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedCell {
    pub id: CellId,
    pub x: u32,
    pub y: u32,
    pub state: SeatState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "slot", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Slot {
    Empty,
    Cell(RenderedCell),
}

/// Positional view of one block, row-major.
#[derive(Debug, Clone, Serialize)]
pub struct SeatGrid {
    pub block_id: Option<u32>,
    pub class_id: Option<ClassId>,
    pub class_name: String,
    pub rows: u32,
    pub cols: u32,
    pub slots: Vec<Slot>,
}

impl SeatGrid {
    pub fn slot(&self, x: u32, y: u32) -> Option<&Slot> {
        if x >= self.cols || y >= self.rows {
            return None;
        }
        self.slots.get((y as usize) * (self.cols as usize) + x as usize)
    }

    pub fn cells(&self) -> impl Iterator<Item = &RenderedCell> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Cell(cell) => Some(cell),
            Slot::Empty => None,
        })
    }

    pub fn state_of(&self, id: CellId) -> Option<SeatState> {
        self.cells().find(|c| c.id == id).map(|c| c.state)
    }

    pub fn count(&self, state: SeatState) -> usize {
        self.cells().filter(|c| c.state == state).count()
    }
}

/// Lay a seat map out on its grid for `passenger`.
///
/// Cells outside the declared bounds, or landing on an already filled
/// position, are left out instead of failing. A map declaring more than
/// the block limit renders as an empty 0x0 grid.
pub fn render(
    map: &SeatMap,
    occupancy: &OccupancyIndex,
    selection: &LegSelection,
    passenger: PassengerId,
) -> SeatGrid {
    let Some(len) = grid_len(map.rows, map.cols) else {
        tracing::warn!(
            "Refusing to render {}x{} block {:?}: over the {}x{} limit",
            map.rows,
            map.cols,
            map.block_id,
            MAX_BLOCK_ROWS,
            MAX_BLOCK_COLS
        );
        return SeatGrid {
            block_id: map.block_id,
            class_id: map.class_id,
            class_name: map.class_name.clone(),
            rows: 0,
            cols: 0,
            slots: Vec::new(),
        };
    };

    let cols = map.cols as usize;
    let mut slots = vec![Slot::Empty; len];

    for cell in &map.cells {
        if !map.contains(cell.x, cell.y) {
            tracing::debug!("Skipping cell {} outside {}x{} grid", cell.id, map.rows, map.cols);
            continue;
        }
        let index = (cell.y as usize) * cols + cell.x as usize;
        if slots[index] != Slot::Empty {
            tracing::debug!("Skipping cell {} on an occupied grid position", cell.id);
            continue;
        }
        slots[index] = Slot::Cell(RenderedCell {
            id: cell.id,
            x: cell.x,
            y: cell.y,
            state: seat_state(cell, occupancy, selection, passenger),
        });
    }

    SeatGrid {
        block_id: map.block_id,
        class_id: map.class_id,
        class_name: map.class_name.clone(),
        rows: map.rows,
        cols: map.cols,
        slots,
    }
}

fn grid_len(rows: u32, cols: u32) -> Option<usize> {
    if rows > MAX_BLOCK_ROWS || cols > MAX_BLOCK_COLS {
        return None;
    }
    (rows as usize).checked_mul(cols as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skybook_core::AircraftSeatMap;

    fn cabin() -> SeatMap {
        // 2 rows, 3 cols, aisle in the middle column
        SeatMap::new(
            2,
            3,
            vec![
                Cell::seat(1, 0, 0),
                Cell::aisle(2, 1, 0),
                Cell::seat(3, 2, 0),
                Cell::seat(4, 0, 1),
                Cell::aisle(5, 1, 1),
                Cell::seat(6, 2, 1),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_state_priority() {
        let map = cabin();
        let aircraft = AircraftSeatMap::new(vec![map.clone()]).unwrap();
        let occupancy: OccupancyIndex = [CellId(3)].into_iter().collect();
        let alice = PassengerId(0);
        let bob = PassengerId(1);

        let mut selection = LegSelection::new();
        selection.select(&aircraft, &occupancy, alice, CellId(1));
        selection.select(&aircraft, &occupancy, bob, CellId(4));

        let grid = render(&map, &occupancy, &selection, alice);
        assert_eq!(grid.state_of(CellId(1)), Some(SeatState::Selected));
        assert_eq!(grid.state_of(CellId(2)), Some(SeatState::Aisle));
        assert_eq!(grid.state_of(CellId(3)), Some(SeatState::Occupied));
        assert_eq!(grid.state_of(CellId(4)), Some(SeatState::Taken));
        assert_eq!(grid.state_of(CellId(6)), Some(SeatState::Available));

        // Same data seen from the other passenger
        let grid = render(&map, &occupancy, &selection, bob);
        assert_eq!(grid.state_of(CellId(1)), Some(SeatState::Taken));
        assert_eq!(grid.state_of(CellId(4)), Some(SeatState::Selected));
    }

    #[test]
    fn test_occupied_wins_over_selection() {
        let map = cabin();
        let aircraft = AircraftSeatMap::new(vec![map.clone()]).unwrap();
        let mut selection = LegSelection::new();
        selection.select(&aircraft, &OccupancyIndex::new(), PassengerId(0), CellId(6));

        // The seat is sold after the selection was made
        let occupancy: OccupancyIndex = [CellId(6)].into_iter().collect();
        let cell = map.find(CellId(6)).unwrap();
        assert_eq!(seat_state(cell, &occupancy, &selection, PassengerId(0)), SeatState::Occupied);
    }

    #[test]
    fn test_grid_positions() {
        let map = cabin();
        let grid = render(&map, &OccupancyIndex::new(), &LegSelection::new(), PassengerId(0));

        assert_eq!(grid.slots.len(), 6);
        match grid.slot(2, 1) {
            Some(Slot::Cell(cell)) => assert_eq!(cell.id, CellId(6)),
            other => panic!("unexpected slot {:?}", other),
        }
        assert!(grid.slot(3, 0).is_none());
        assert_eq!(grid.count(SeatState::Available), 4);
        assert_eq!(grid.count(SeatState::Aisle), 2);
    }

    #[test]
    fn test_skips_cells_outside_bounds() {
        // Built by hand, bypassing the loader's validation
        let map = SeatMap {
            block_id: None,
            class_id: None,
            class_name: String::new(),
            rows: 1,
            cols: 2,
            cells: vec![
                Cell::seat(1, 0, 0),
                Cell::seat(2, 5, 0),
                Cell::seat(3, 0, 9),
                Cell::seat(4, 0, 0),
            ],
        };
        let grid = render(&map, &OccupancyIndex::new(), &LegSelection::new(), PassengerId(0));

        assert_eq!(grid.slots.len(), 2);
        assert_eq!(grid.cells().count(), 1);
        assert_eq!(grid.state_of(CellId(1)), Some(SeatState::Available));
        assert_eq!(grid.slot(1, 0), Some(&Slot::Empty));
    }

    #[test]
    fn test_oversized_grid_renders_empty() {
        let map = SeatMap {
            block_id: Some(3),
            class_id: None,
            class_name: "Economy".to_string(),
            rows: u32::MAX,
            cols: u32::MAX,
            cells: vec![Cell::seat(1, 0, 0)],
        };
        let grid = render(&map, &OccupancyIndex::new(), &LegSelection::new(), PassengerId(0));

        assert_eq!((grid.rows, grid.cols), (0, 0));
        assert!(grid.slots.is_empty());
        assert!(grid.slot(0, 0).is_none());
        assert_eq!(grid.block_id, Some(3));

        let wide = SeatMap { rows: 1, cols: MAX_BLOCK_COLS + 1, ..map };
        assert!(render(&wide, &OccupancyIndex::new(), &LegSelection::new(), PassengerId(0)).slots.is_empty());
    }

    #[test]
    fn test_state_flags() {
        assert!(SeatState::Taken.is_disabled());
        assert!(SeatState::Occupied.is_disabled());
        assert!(!SeatState::Aisle.is_disabled());
        assert!(!SeatState::Aisle.is_clickable());
        assert!(SeatState::Selected.is_clickable());
    }
}
