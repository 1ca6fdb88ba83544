//! Rotation error types.

use certroll_common::error::ErrorCode;

#[derive(Debug, thiserror::Error)]
pub enum RotationError {
    /// The plan was accepted but the node has not reported convergence yet.
    #[error("waiting for {node} to converge: {reason}")]
    Waiting { node: String, reason: String },

    #[error("plan for {node} failed: {reason}")]
    PlanFailed { node: String, reason: String },

    #[error("status update failed: {0}")]
    StatusUpdate(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RotationError {
    /// True when the pass stopped only because a node is still converging.
    pub fn is_waiting(&self) -> bool {
        matches!(self, Self::Waiting { .. })
    }
}

impl From<&RotationError> for ErrorCode {
    fn from(e: &RotationError) -> Self {
        match e {
            RotationError::Waiting { .. } => ErrorCode::PlanWaiting,
            RotationError::PlanFailed { .. } => ErrorCode::PlanFailed,
            RotationError::StatusUpdate(_) => ErrorCode::StatusUpdateFailed,
            // persist reports undecodable documents as InvalidData
            RotationError::Io(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                ErrorCode::ParseError
            }
            RotationError::Io(_) => ErrorCode::IoError,
        }
    }
}
