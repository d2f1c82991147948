pub mod models;
pub mod pii;

pub use models::events::SeatingEvent;
pub use pii::Masked;
