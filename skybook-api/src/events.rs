use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;
use skybook_shared::SeatingEvent;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/events", get(stream_events))
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    /// Only forward events of this reservation or seat block
    pub session: Option<Uuid>,
}

fn event_name(event: &SeatingEvent) -> &'static str {
    match event {
        SeatingEvent::SeatSelected(_) => "seat_selected",
        SeatingEvent::SeatReleased(_) => "seat_released",
        SeatingEvent::SeatBlockSubmitted(_) => "seat_block_submitted",
    }
}

async fn stream_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events_tx.subscribe();
    let session = query.session;

    // Lagged receivers just skip what they missed
    let stream = BroadcastStream::new(rx).filter_map(move |result| async move {
        let event = result.ok()?;
        if session.is_some_and(|id| id != event.session_id()) {
            return None;
        }
        let data = serde_json::to_string(&event).ok()?;
        Some(Ok(Event::default().event(event_name(&event)).data(data)))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
