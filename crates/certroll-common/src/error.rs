use serde::{Deserialize, Serialize};

/// Machine-readable error codes shared by the planner and the CLI.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidInput,
    NotFound,
    PlanWaiting,
    PlanFailed,
    StatusUpdateFailed,
    IoError,
    ParseError,
    Internal,
}

impl ErrorCode {
    /// Process exit status reported by the CLI for this error.
    ///
    /// `PlanWaiting` is distinct from hard failures so a wrapping control
    /// loop can requeue without treating the pass as broken.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidInput | Self::ParseError => 2,
            Self::NotFound => 3,
            Self::PlanWaiting => 75,
            Self::PlanFailed => 4,
            Self::StatusUpdateFailed => 5,
            Self::IoError => 74,
            Self::Internal => 1,
        }
    }

    /// Whether a retry of the whole pass is expected to make progress.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::PlanWaiting | Self::PlanFailed | Self::StatusUpdateFailed | Self::IoError
        )
    }
}
