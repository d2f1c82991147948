use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SeatSelectedEvent {
    pub session_id: Uuid,
    pub flight_id: u32,
    pub leg: String,
    pub passenger_id: u32,
    pub cell_id: u32,
    pub previous_cell_id: Option<u32>,
    pub selected_at: i64,
}

/// A selection dropped because a refetch showed the seat as booked or gone.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SeatReleasedEvent {
    pub session_id: Uuid,
    pub flight_id: u32,
    pub passenger_id: u32,
    pub cell_id: u32,
    pub reason: String,
    pub released_at: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SeatBlockSubmittedEvent {
    pub session_id: Uuid,
    pub airline_code: String,
    pub aircraft_id: u32,
    pub class_id: u32,
    pub total_seats: u32,
    pub submitted_at: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatingEvent {
    SeatSelected(SeatSelectedEvent),
    SeatReleased(SeatReleasedEvent),
    SeatBlockSubmitted(SeatBlockSubmittedEvent),
}

impl SeatingEvent {
    pub fn session_id(&self) -> Uuid {
        match self {
            SeatingEvent::SeatSelected(e) => e.session_id,
            SeatingEvent::SeatReleased(e) => e.session_id,
            SeatingEvent::SeatBlockSubmitted(e) => e.session_id,
        }
    }
}
