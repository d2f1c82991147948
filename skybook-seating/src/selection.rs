use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use skybook_core::{AircraftSeatMap, CellId, OccupancyIndex, PassengerId};
use crate::render::{seat_state, SeatState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    UnknownCell,
    NotASeat,
    Occupied,
    TakenByOther,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::UnknownCell => "UNKNOWN_CELL",
            RejectReason::NotASeat => "NOT_A_SEAT",
            RejectReason::Occupied => "OCCUPIED",
            RejectReason::TakenByOther => "TAKEN_BY_OTHER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectOutcome {
    /// The passenger now holds the seat; `previous` was released
    Selected { previous: Option<CellId> },
    /// The passenger already held this seat
    Unchanged,
    Rejected { reason: RejectReason },
}

impl SelectOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, SelectOutcome::Rejected { .. })
    }
}

/// A selection dropped during reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Eviction {
    pub passenger: PassengerId,
    pub cell: CellId,
    pub reason: RejectReason,
}

/// Seat choices of every passenger on one leg.
///
/// Both directions of the mapping are kept so that a passenger holds at most
/// one cell and a cell belongs to at most one passenger.
#[derive(Debug, Clone, Default)]
pub struct LegSelection {
    by_passenger: BTreeMap<PassengerId, CellId>,
    by_cell: HashMap<CellId, PassengerId>,
}

impl LegSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection_of(&self, passenger: PassengerId) -> Option<CellId> {
        self.by_passenger.get(&passenger).copied()
    }

    pub fn owner_of(&self, cell: CellId) -> Option<PassengerId> {
        self.by_cell.get(&cell).copied()
    }

    /// `(passenger, cell)` pairs ordered by passenger.
    pub fn iter(&self) -> impl Iterator<Item = (PassengerId, CellId)> + '_ {
        self.by_passenger.iter().map(|(p, c)| (*p, *c))
    }

    pub fn selected_cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.by_passenger.values().copied()
    }

    pub fn len(&self) -> usize {
        self.by_passenger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_passenger.is_empty()
    }

    /// Handle a click on `cell` by `passenger`.
    ///
    /// Clicks the renderer would show as disabled are ignored and reported as
    /// `Rejected`; nothing changes in that case.
    pub fn select(
        &mut self,
        map: &AircraftSeatMap,
        occupancy: &OccupancyIndex,
        passenger: PassengerId,
        cell: CellId,
    ) -> SelectOutcome {
        let Some((_, target)) = map.find(cell) else {
            return SelectOutcome::Rejected { reason: RejectReason::UnknownCell };
        };

        match seat_state(target, occupancy, self, passenger) {
            SeatState::Aisle => SelectOutcome::Rejected { reason: RejectReason::NotASeat },
            SeatState::Occupied => SelectOutcome::Rejected { reason: RejectReason::Occupied },
            SeatState::Taken => SelectOutcome::Rejected { reason: RejectReason::TakenByOther },
            SeatState::Selected => SelectOutcome::Unchanged,
            SeatState::Available => {
                let previous = self.clear(passenger);
                self.by_passenger.insert(passenger, cell);
                self.by_cell.insert(cell, passenger);
                SelectOutcome::Selected { previous }
            }
        }
    }

    /// Release the passenger's seat, if any.
    pub fn clear(&mut self, passenger: PassengerId) -> Option<CellId> {
        let cell = self.by_passenger.remove(&passenger)?;
        self.by_cell.remove(&cell);
        Some(cell)
    }

    /// Drop every selection that is no longer valid against freshly fetched
    /// data: booked in the meantime, turned into a non-seat, or missing from
    /// the seat map. Without a seat map only occupancy is checked.
    pub fn reconcile(
        &mut self,
        map: Option<&AircraftSeatMap>,
        occupancy: &OccupancyIndex,
    ) -> Vec<Eviction> {
        let evictions: Vec<Eviction> = self
            .iter()
            .filter_map(|(passenger, cell)| {
                let reason = if occupancy.contains(cell) {
                    Some(RejectReason::Occupied)
                } else {
                    match map.map(|m| m.find(cell)) {
                        Some(None) => Some(RejectReason::UnknownCell),
                        Some(Some((_, c))) if !c.is_seat => Some(RejectReason::NotASeat),
                        _ => None,
                    }
                };
                reason.map(|reason| Eviction { passenger, cell, reason })
            })
            .collect();

        for eviction in &evictions {
            self.clear(eviction.passenger);
        }

        evictions
    }
}
