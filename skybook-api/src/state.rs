use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};
use uuid::Uuid;
use skybook_authoring::{AuthoringLimits, AuthoringMatrix, SeatBlockTarget};
use skybook_core::repository::Backend;
use skybook_seating::SeatingSession;
use skybook_shared::SeatingEvent;
use skybook_store::app_config::SeatingConfig;

/// Live sessions keyed by the id handed to the client. Each session has its
/// own lock so unrelated sessions never wait on each other.
pub type SessionStore<T> = Arc<RwLock<HashMap<Uuid, Arc<Mutex<T>>>>>;

/// An airline admin designing one new block for an aircraft.
#[derive(Debug, Clone)]
pub struct SeatBlockSession {
    pub target: SeatBlockTarget,
    pub matrix: AuthoringMatrix,
}

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn Backend>,
    pub seating: SeatingConfig,
    pub reservations: SessionStore<SeatingSession>,
    pub seat_blocks: SessionStore<SeatBlockSession>,
    pub events_tx: broadcast::Sender<SeatingEvent>,
}

impl AppState {
    pub fn new(backend: Arc<dyn Backend>, seating: SeatingConfig) -> Self {
        let (events_tx, _) = broadcast::channel(100);
        Self {
            backend,
            seating,
            reservations: Arc::default(),
            seat_blocks: Arc::default(),
            events_tx,
        }
    }

    /// Authoring bounds for an aircraft, before the backend's remaining
    /// capacity is applied.
    pub fn authoring_limits(&self, cabin_max_cols: Option<u32>) -> AuthoringLimits {
        AuthoringLimits::new(
            cabin_max_cols.or(Some(self.seating.default_max_cols)),
            self.seating.seat_ceiling,
        )
        .with_max_rows(self.seating.max_rows)
    }

    /// Nobody listening is fine.
    pub fn publish(&self, event: SeatingEvent) {
        let _ = self.events_tx.send(event);
    }
}
