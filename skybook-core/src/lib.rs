pub mod ids;
pub mod cell;
pub mod seat_map;
pub mod occupancy;
pub mod booking;
pub mod repository;

pub use ids::{AircraftId, CellId, ClassId, FlightId, Leg, PassengerId};
pub use cell::Cell;
pub use seat_map::{AircraftSeatMap, SeatMap, MAX_BLOCK_COLS, MAX_BLOCK_ROWS};
pub use occupancy::OccupancyIndex;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Backend request failed: {0}")]
    Upstream(String),
    #[error("Internal service error: {0}")]
    Internal(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
