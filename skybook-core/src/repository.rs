use async_trait::async_trait;
use crate::booking::{ReservationRequest, SeatBlockRequest};
use crate::ids::{AircraftId, FlightId};
use crate::occupancy::OccupiedBlock;
use crate::seat_map::AircraftSeatMap;
use crate::CoreResult;

/// Seat layout lookups
#[async_trait]
pub trait SeatMapSource: Send + Sync {
    /// Blocks of the aircraft operating a flight
    async fn flight_seat_map(&self, flight_id: FlightId) -> CoreResult<AircraftSeatMap>;

    /// Blocks already defined for one aircraft of an airline's fleet
    async fn aircraft_seat_map(
        &self,
        airline_code: &str,
        aircraft_id: AircraftId,
    ) -> CoreResult<AircraftSeatMap>;
}

/// Seats already sold on a flight
#[async_trait]
pub trait OccupancySource: Send + Sync {
    async fn occupied_seats(&self, flight_id: FlightId) -> CoreResult<Vec<OccupiedBlock>>;
}

/// Persists a newly authored seat block
#[async_trait]
pub trait SeatBlockSink: Send + Sync {
    async fn create_seat_block(
        &self,
        aircraft_id: AircraftId,
        request: &SeatBlockRequest,
    ) -> CoreResult<String>;
}

/// Books the tickets of a reservation
#[async_trait]
pub trait ReservationSink: Send + Sync {
    async fn book(&self, request: &ReservationRequest) -> CoreResult<String>;
}

/// Everything the seating service needs from the booking backend.
pub trait Backend: SeatMapSource + OccupancySource + SeatBlockSink + ReservationSink {}

impl<T> Backend for T where T: SeatMapSource + OccupancySource + SeatBlockSink + ReservationSink {}
