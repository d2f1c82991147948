use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;
use skybook_authoring::{seat_label, submit_block, AuthoringMatrix, ColumnToggle, SeatBlockTarget};
use skybook_core::repository::SeatMapSource;
use skybook_core::{AircraftId, ClassId, SeatMap};
use skybook_shared::models::events::SeatBlockSubmittedEvent;
use skybook_shared::SeatingEvent;
use crate::error::AppError;
use crate::state::{AppState, SeatBlockSession};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/seat-blocks", post(open_seat_block))
        .route("/v1/seat-blocks/{id}", get(get_seat_block).delete(discard_seat_block))
        .route("/v1/seat-blocks/{id}/preview", get(preview_seat_block))
        .route("/v1/seat-blocks/{id}/size", put(resize_seat_block))
        .route("/v1/seat-blocks/{id}/cells/{row}/{col}/toggle", post(toggle_cell))
        .route("/v1/seat-blocks/{id}/columns/{col}/toggle", post(toggle_column))
        .route("/v1/seat-blocks/{id}/rows", post(add_row).delete(remove_row))
        .route("/v1/seat-blocks/{id}/reset", post(reset_seat_block))
        .route("/v1/seat-blocks/{id}/submit", post(submit_seat_block))
}

#[derive(Debug, Deserialize)]
pub struct OpenSeatBlockRequest {
    pub airline_code: String,
    pub aircraft_id: AircraftId,
    pub cabin_max_cols: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ResizeRequest {
    pub rows: u32,
    pub cols: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubmitRequest {
    pub class_id: Option<ClassId>,
}

#[derive(Debug, Serialize)]
pub struct SeatBlockView {
    pub seat_block_id: Uuid,
    pub airline_code: String,
    pub aircraft_id: AircraftId,
    pub rows: u32,
    pub cols: u32,
    pub max_rows: u32,
    pub max_cols: u32,
    pub seat_ceiling: u32,
    pub total_seats: u32,
    pub remaining: u32,
    pub matrix: Vec<Vec<bool>>,
    /// Seat labels in row-major order, e.g. `A1`, `C1`, `B2`
    pub labels: Vec<String>,
}

impl SeatBlockView {
    fn new(id: Uuid, session: &SeatBlockSession) -> Self {
        let matrix = &session.matrix;
        let limits = matrix.limits();
        Self {
            seat_block_id: id,
            airline_code: session.target.airline_code.clone(),
            aircraft_id: session.target.aircraft_id,
            rows: matrix.rows(),
            cols: matrix.cols(),
            max_rows: limits.max_rows,
            max_cols: limits.max_cols,
            seat_ceiling: limits.seat_ceiling,
            total_seats: matrix.count_seats(),
            remaining: matrix.remaining(),
            matrix: matrix.matrix().to_vec(),
            labels: matrix
                .to_cells()
                .into_iter()
                .filter(|c| c.is_seat)
                .map(|c| seat_label(c.y, c.x))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ColumnToggleResponse {
    pub toggle: ColumnToggle,
    pub seat_block: SeatBlockView,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: String,
    pub total_seats: u32,
}

async fn find_session(state: &AppState, id: Uuid) -> Result<Arc<Mutex<SeatBlockSession>>, AppError> {
    state
        .seat_blocks
        .read()
        .await
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Seat block {} not found", id)))
}

/// The ceiling starts from the configured limit and is lowered to what the
/// aircraft still has room for.
async fn open_seat_block(
    State(state): State<AppState>,
    Json(req): Json<OpenSeatBlockRequest>,
) -> Result<(StatusCode, Json<SeatBlockView>), AppError> {
    if req.airline_code.trim().is_empty() {
        return Err(AppError::Validation("Airline code is required".to_string()));
    }

    let aircraft = state
        .backend
        .aircraft_seat_map(&req.airline_code, req.aircraft_id)
        .await?;

    let mut limits = state.authoring_limits(req.cabin_max_cols);
    if let Some(remaining) = aircraft.additional_seats_remaining {
        limits = limits.with_remaining(remaining);
    }

    let session = SeatBlockSession {
        target: SeatBlockTarget {
            airline_code: req.airline_code,
            aircraft_id: req.aircraft_id,
        },
        matrix: AuthoringMatrix::with_dimensions(limits, state.seating.default_rows, limits.max_cols),
    };

    let id = Uuid::new_v4();
    let view = SeatBlockView::new(id, &session);
    state.seat_blocks.write().await.insert(id, Arc::new(Mutex::new(session)));
    info!(
        "Opened seat block {} for aircraft {} ({} seats allowed)",
        id, req.aircraft_id, limits.seat_ceiling
    );

    Ok((StatusCode::CREATED, Json(view)))
}

async fn get_seat_block(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SeatBlockView>, AppError> {
    let session = find_session(&state, id).await?;
    let guard = session.lock().await;
    Ok(Json(SeatBlockView::new(id, &guard)))
}

async fn discard_seat_block(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .seat_blocks
        .write()
        .await
        .remove(&id)
        .ok_or_else(|| AppError::NotFound(format!("Seat block {} not found", id)))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn preview_seat_block(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SeatMap>, AppError> {
    let session = find_session(&state, id).await?;
    let preview = session.lock().await.matrix.preview();
    Ok(Json(preview))
}

async fn resize_seat_block(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ResizeRequest>,
) -> Result<Json<SeatBlockView>, AppError> {
    let session = find_session(&state, id).await?;
    let mut guard = session.lock().await;
    let (rows, cols) = guard.matrix.resize(req.rows, req.cols);
    if (rows, cols) != (req.rows, req.cols) {
        debug!("Clamped seat block {} to {}x{}", id, rows, cols);
    }
    Ok(Json(SeatBlockView::new(id, &guard)))
}

async fn toggle_cell(
    State(state): State<AppState>,
    Path((id, row, col)): Path<(Uuid, u32, u32)>,
) -> Result<Json<SeatBlockView>, AppError> {
    let session = find_session(&state, id).await?;
    let mut guard = session.lock().await;
    guard.matrix.toggle_cell(row, col)?;
    Ok(Json(SeatBlockView::new(id, &guard)))
}

async fn toggle_column(
    State(state): State<AppState>,
    Path((id, col)): Path<(Uuid, u32)>,
) -> Result<Json<ColumnToggleResponse>, AppError> {
    let session = find_session(&state, id).await?;
    let mut guard = session.lock().await;
    let toggle = guard.matrix.toggle_column(col)?;
    Ok(Json(ColumnToggleResponse {
        toggle,
        seat_block: SeatBlockView::new(id, &guard),
    }))
}

async fn add_row(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SeatBlockView>, AppError> {
    let session = find_session(&state, id).await?;
    let mut guard = session.lock().await;
    if !guard.matrix.add_row() {
        debug!("Seat block {} already has the maximum number of rows", id);
    }
    Ok(Json(SeatBlockView::new(id, &guard)))
}

async fn remove_row(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SeatBlockView>, AppError> {
    let session = find_session(&state, id).await?;
    let mut guard = session.lock().await;
    if !guard.matrix.remove_row() {
        debug!("Seat block {} is down to one row", id);
    }
    Ok(Json(SeatBlockView::new(id, &guard)))
}

async fn reset_seat_block(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SeatBlockView>, AppError> {
    let session = find_session(&state, id).await?;
    let mut guard = session.lock().await;
    guard.matrix.reset();
    Ok(Json(SeatBlockView::new(id, &guard)))
}

/// Upload the block. The session is closed on success and kept as is when
/// the backend fails.
async fn submit_seat_block(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, AppError> {
    let session = find_session(&state, id).await?;
    let guard = session.lock().await;

    let submission = guard.matrix.submit(req.class_id)?;
    let message = submit_block(state.backend.as_ref(), &guard.target, &submission).await?;
    let target = guard.target.clone();
    drop(guard);

    state.seat_blocks.write().await.remove(&id);
    state.publish(SeatingEvent::SeatBlockSubmitted(SeatBlockSubmittedEvent {
        session_id: id,
        airline_code: target.airline_code,
        aircraft_id: target.aircraft_id.0,
        class_id: submission.class_id.0,
        total_seats: submission.total_seats,
        submitted_at: Utc::now().timestamp(),
    }));

    Ok(Json(SubmitResponse {
        message,
        total_seats: submission.total_seats,
    }))
}
