//! CLI errors and their process exit classification.

use certroll_common::error::ErrorCode;
use certroll_planner::RotationError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("node {0} not found in inventory")]
    NodeNotFound(String),

    #[error("control plane has no rotateCertificates request")]
    NoRotationRequested,
}

impl From<&CliError> for ErrorCode {
    fn from(e: &CliError) -> Self {
        match e {
            CliError::NodeNotFound(_) => ErrorCode::NotFound,
            CliError::NoRotationRequested => ErrorCode::InvalidInput,
        }
    }
}

/// Classify a command failure. Context layers are looked through.
pub fn error_code(e: &anyhow::Error) -> ErrorCode {
    if let Some(rotation) = e.downcast_ref::<RotationError>() {
        return ErrorCode::from(rotation);
    }
    if let Some(cli) = e.downcast_ref::<CliError>() {
        return ErrorCode::from(cli);
    }
    match e.downcast_ref::<std::io::Error>() {
        Some(io) if io.kind() == std::io::ErrorKind::InvalidData => ErrorCode::ParseError,
        Some(_) => ErrorCode::IoError,
        None => ErrorCode::Internal,
    }
}
