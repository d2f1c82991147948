use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use skybook_core::booking::SeatBlockRequest;
use skybook_core::repository::SeatBlockSink;
use skybook_core::{AircraftId, ClassId, CoreResult};

/// A validated snapshot of an authoring matrix, ready for upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatBlockSubmission {
    pub matrix: Vec<Vec<bool>>,
    pub class_id: ClassId,
    pub total_seats: u32,
    pub rows: u32,
    pub cols: u32,
}

impl SeatBlockSubmission {
    pub fn into_request(self, airline_code: impl Into<String>) -> SeatBlockRequest {
        SeatBlockRequest {
            matrix: self.matrix,
            airline_code: airline_code.into(),
            id_class: self.class_id,
            total_seats: self.total_seats,
            rows: self.rows,
            cols: self.cols,
        }
    }
}

/// Aircraft the block is being added to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatBlockTarget {
    pub airline_code: String,
    pub aircraft_id: AircraftId,
}

/// Upload a block and return the backend's confirmation message.
pub async fn submit_block<S>(
    sink: &S,
    target: &SeatBlockTarget,
    submission: &SeatBlockSubmission,
) -> CoreResult<String>
where
    S: SeatBlockSink + ?Sized,
{
    let request = submission.clone().into_request(target.airline_code.clone());

    match sink.create_seat_block(target.aircraft_id, &request).await {
        Ok(message) => {
            info!(
                "Added {} seat block ({}x{}, class {}) to aircraft {} of {}",
                request.total_seats,
                request.rows,
                request.cols,
                request.id_class,
                target.aircraft_id,
                target.airline_code
            );
            Ok(message)
        }
        Err(e) => {
            warn!("Seat block upload for aircraft {} failed: {}", target.aircraft_id, e);
            Err(e)
        }
    }
}
