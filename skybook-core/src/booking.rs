use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use skybook_shared::Masked;
use crate::ids::{CellId, ClassId, FlightId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

/// Passenger details as the booking endpoint expects them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassengerInfo {
    pub name: String,
    pub lastname: String,
    pub date_birth: NaiveDate,
    pub phone_number: String,
    pub email: Masked<String>,
    pub passport_number: Masked<String>,
    pub sex: Sex,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketInfo {
    pub id_flight: FlightId,
    pub id_seat: CellId,
    #[serde(default)]
    pub additional_baggage: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_info: TicketInfo,
    pub passenger_info: PassengerInfo,
}

/// `POST /flight/book` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationRequest {
    pub id_buyer: u32,
    pub tickets: Vec<Ticket>,
}

/// `POST /airline/add/block/aircraft/{id}` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatBlockRequest {
    pub matrix: Vec<Vec<bool>>,
    pub airline_code: String,
    pub id_class: ClassId,
    pub total_seats: u32,
    pub rows: u32,
    pub cols: u32,
}

/// Generic `{ "message": ... }` reply of the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendMessage {
    #[serde(default)]
    pub message: Option<String>,
}
