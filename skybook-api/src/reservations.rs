use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;
use skybook_core::booking::PassengerInfo;
use skybook_core::repository::ReservationSink;
use skybook_core::{CellId, FlightId, Leg, PassengerId};
use skybook_seating::{build_reservation, refresh_legs, LegRefresh, SeatGrid, SeatingSession, SelectOutcome};
use skybook_shared::models::events::{SeatReleasedEvent, SeatSelectedEvent};
use skybook_shared::SeatingEvent;
use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/reservations", post(create_reservation))
        .route("/v1/reservations/{id}", delete(close_reservation))
        .route("/v1/reservations/{id}/refresh", post(refresh_reservation))
        .route("/v1/reservations/{id}/passengers", post(add_passenger))
        .route("/v1/reservations/{id}/passengers/{passenger}", delete(remove_passenger))
        .route("/v1/reservations/{id}/legs/{leg}/seats", get(leg_seats))
        .route("/v1/reservations/{id}/legs/{leg}/select", post(select_seat))
        .route("/v1/reservations/{id}/confirm", post(confirm_reservation))
}

#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub flight_id: FlightId,
    pub return_flight_id: Option<FlightId>,
}

#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub reservation_id: Uuid,
    pub legs: Vec<LegRefresh>,
}

#[derive(Debug, Serialize)]
pub struct PassengerResponse {
    pub passenger_id: PassengerId,
}

#[derive(Debug, Deserialize)]
pub struct SeatsQuery {
    pub passenger: PassengerId,
}

#[derive(Debug, Serialize)]
pub struct LegSeatsResponse {
    pub leg: Leg,
    pub flight_id: FlightId,
    pub loaded: bool,
    pub blocks: Vec<SeatGrid>,
}

#[derive(Debug, Deserialize)]
pub struct SelectSeatRequest {
    pub passenger: PassengerId,
    pub cell_id: CellId,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub buyer_id: u32,
}

#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub message: String,
    pub tickets: usize,
}

async fn find_session(state: &AppState, id: Uuid) -> Result<Arc<Mutex<SeatingSession>>, AppError> {
    state
        .reservations
        .read()
        .await
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", id)))
}

/// Refetch every leg and announce the selections the new data invalidated.
///
/// Only a `Weak` handle is passed in: a reservation closed mid-load keeps
/// none of the new data and announces nothing.
async fn reload(state: &AppState, id: Uuid, session: &Weak<Mutex<SeatingSession>>) -> Vec<LegRefresh> {
    let results = refresh_legs(session, state.backend.as_ref()).await;

    if !state.reservations.read().await.contains_key(&id) {
        debug!("Reservation {} closed during refresh, not announcing releases", id);
        return results;
    }
    let Some(session) = session.upgrade() else {
        return results;
    };
    let flights: Vec<(Leg, FlightId)> = {
        let guard = session.lock().await;
        guard.legs().map(|l| (l.leg, l.flight_id)).collect()
    };

    for result in &results {
        let LegRefresh::Applied { leg, evicted, .. } = result else {
            continue;
        };
        let Some((_, flight_id)) = flights.iter().find(|(l, _)| l == leg) else {
            continue;
        };
        for eviction in evicted {
            state.publish(SeatingEvent::SeatReleased(SeatReleasedEvent {
                session_id: id,
                flight_id: flight_id.0,
                passenger_id: eviction.passenger.0,
                cell_id: eviction.cell.0,
                reason: eviction.reason.as_str().to_string(),
                released_at: Utc::now().timestamp(),
            }));
        }
    }

    results
}

async fn create_reservation(
    State(state): State<AppState>,
    Json(req): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>), AppError> {
    if req.return_flight_id == Some(req.flight_id) {
        return Err(AppError::Validation("Return flight must differ from the outbound flight".to_string()));
    }

    let id = Uuid::new_v4();
    let session = Arc::new(Mutex::new(SeatingSession::new(req.flight_id, req.return_flight_id)));
    let handle = Arc::downgrade(&session);
    state.reservations.write().await.insert(id, session);
    info!("Opened reservation {} for flight {}", id, req.flight_id);

    let legs = reload(&state, id, &handle).await;
    Ok((StatusCode::CREATED, Json(ReservationResponse { reservation_id: id, legs })))
}

async fn close_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .reservations
        .write()
        .await
        .remove(&id)
        .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", id)))?;
    info!("Closed reservation {}", id);
    Ok(StatusCode::NO_CONTENT)
}

async fn refresh_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReservationResponse>, AppError> {
    let handle = Arc::downgrade(&find_session(&state, id).await?);
    let legs = reload(&state, id, &handle).await;
    Ok(Json(ReservationResponse { reservation_id: id, legs }))
}

async fn add_passenger(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(info): Json<PassengerInfo>,
) -> Result<(StatusCode, Json<PassengerResponse>), AppError> {
    let session = find_session(&state, id).await?;
    let passenger_id = session.lock().await.add_passenger(info);
    Ok((StatusCode::CREATED, Json(PassengerResponse { passenger_id })))
}

async fn remove_passenger(
    State(state): State<AppState>,
    Path((id, passenger)): Path<(Uuid, PassengerId)>,
) -> Result<StatusCode, AppError> {
    let session = find_session(&state, id).await?;
    if !session.lock().await.remove_passenger(passenger) {
        return Err(AppError::NotFound(format!("Passenger {} not found", passenger)));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn leg_seats(
    State(state): State<AppState>,
    Path((id, leg)): Path<(Uuid, Leg)>,
    Query(query): Query<SeatsQuery>,
) -> Result<Json<LegSeatsResponse>, AppError> {
    let session = find_session(&state, id).await?;
    let guard = session.lock().await;

    if !guard.has_passenger(query.passenger) {
        return Err(AppError::NotFound(format!("Passenger {} not found", query.passenger)));
    }
    let seating = guard
        .leg(leg)
        .ok_or_else(|| AppError::NotFound(format!("Reservation {} has no {} flight", id, leg)))?;

    Ok(Json(LegSeatsResponse {
        leg,
        flight_id: seating.flight_id,
        loaded: seating.is_loaded(),
        blocks: seating.render(query.passenger),
    }))
}

/// Rejected picks answer 200 with the reason; only a missing session,
/// passenger or leg is an error.
async fn select_seat(
    State(state): State<AppState>,
    Path((id, leg)): Path<(Uuid, Leg)>,
    Json(req): Json<SelectSeatRequest>,
) -> Result<Json<SelectOutcome>, AppError> {
    let session = find_session(&state, id).await?;
    let mut guard = session.lock().await;

    if !guard.has_passenger(req.passenger) {
        return Err(AppError::NotFound(format!("Passenger {} not found", req.passenger)));
    }
    let seating = guard
        .leg_mut(leg)
        .ok_or_else(|| AppError::NotFound(format!("Reservation {} has no {} flight", id, leg)))?;

    let outcome = seating.select(req.passenger, req.cell_id);
    if let SelectOutcome::Selected { previous } = outcome {
        state.publish(SeatingEvent::SeatSelected(SeatSelectedEvent {
            session_id: id,
            flight_id: seating.flight_id.0,
            leg: leg.to_string(),
            passenger_id: req.passenger.0,
            cell_id: req.cell_id.0,
            previous_cell_id: previous.map(|c| c.0),
            selected_at: Utc::now().timestamp(),
        }));
    }

    Ok(Json(outcome))
}

/// Book every ticket. The session is closed on success and left untouched
/// when the backend refuses, so the user can fix it and retry.
async fn confirm_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ConfirmRequest>,
) -> Result<Json<ConfirmResponse>, AppError> {
    let session = find_session(&state, id).await?;
    let guard = session.lock().await;

    let request = build_reservation(&guard, req.buyer_id)?;
    let message = state.backend.book(&request).await?;
    drop(guard);

    state.reservations.write().await.remove(&id);
    info!("Booked {} tickets for reservation {}", request.tickets.len(), id);

    Ok(Json(ConfirmResponse {
        message,
        tickets: request.tickets.len(),
    }))
}
