use chrono::{DateTime, Utc};
use skybook_core::{AircraftSeatMap, CellId, FlightId, Leg, OccupancyIndex, PassengerId};
use crate::render::{render, SeatGrid};
use crate::selection::{Eviction, LegSelection, RejectReason, SelectOutcome};

/// Seat map, occupancy and selections of one leg.
#[derive(Debug, Clone)]
pub struct LegSeating {
    pub leg: Leg,
    pub flight_id: FlightId,
    seat_map: Option<AircraftSeatMap>,
    occupancy: OccupancyIndex,
    selection: LegSelection,
    refreshed_at: Option<DateTime<Utc>>,
}

impl LegSeating {
    pub fn new(leg: Leg, flight_id: FlightId) -> Self {
        Self {
            leg,
            flight_id,
            seat_map: None,
            occupancy: OccupancyIndex::new(),
            selection: LegSelection::new(),
            refreshed_at: None,
        }
    }

    pub fn seat_map(&self) -> Option<&AircraftSeatMap> {
        self.seat_map.as_ref()
    }

    pub fn occupancy(&self) -> &OccupancyIndex {
        &self.occupancy
    }

    pub fn selection(&self) -> &LegSelection {
        &self.selection
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    pub fn is_loaded(&self) -> bool {
        self.seat_map.is_some()
    }

    /// Swap in freshly fetched data wholesale and drop selections it
    /// invalidates.
    pub fn replace(&mut self, seat_map: AircraftSeatMap, occupancy: OccupancyIndex) -> Vec<Eviction> {
        self.seat_map = Some(seat_map);
        self.occupancy = occupancy;
        self.refreshed_at = Some(Utc::now());
        self.selection.reconcile(self.seat_map.as_ref(), &self.occupancy)
    }

    pub fn select(&mut self, passenger: PassengerId, cell: CellId) -> SelectOutcome {
        match &self.seat_map {
            Some(map) => self.selection.select(map, &self.occupancy, passenger, cell),
            None => SelectOutcome::Rejected { reason: RejectReason::UnknownCell },
        }
    }

    pub fn clear(&mut self, passenger: PassengerId) -> Option<CellId> {
        self.selection.clear(passenger)
    }

    /// One grid per block, empty until the first load completes.
    pub fn render(&self, passenger: PassengerId) -> Vec<SeatGrid> {
        self.seat_map
            .iter()
            .flat_map(|map| map.blocks.iter())
            .map(|block| render(block, &self.occupancy, &self.selection, passenger))
            .collect()
    }
}
