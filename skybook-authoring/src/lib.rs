pub mod limits;
pub mod matrix;
pub mod submission;

pub use limits::AuthoringLimits;
pub use matrix::{seat_label, AuthoringMatrix, BlockCell, ColumnToggle};
pub use submission::{submit_block, SeatBlockSubmission, SeatBlockTarget};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthoringError {
    #[error("Cannot exceed {ceiling} seats limit (would reach {requested})")]
    CeilingExceeded {
        ceiling: u32,
        requested: u32,
    },

    #[error("Cell ({row}, {col}) is outside the matrix")]
    OutOfBounds {
        row: u32,
        col: u32,
    },

    #[error("Please select a class")]
    MissingClass,

    #[error("Please add at least one seat")]
    NoSeats,
}

pub type AuthoringResult<T> = Result<T, AuthoringError>;
