pub mod render;
pub mod selection;
pub mod leg;
pub mod session;
pub mod reservation;
pub mod loader;

pub use render::{render, seat_state, RenderedCell, SeatGrid, SeatState, Slot};
pub use selection::{Eviction, LegSelection, RejectReason, SelectOutcome};
pub use leg::LegSeating;
pub use session::SeatingSession;
pub use reservation::build_reservation;
pub use loader::{refresh_legs, LegRefresh};
