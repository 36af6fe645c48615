//! Session state exposed to the presentation layer

use super::ComparisonResult;

/// User-facing message for any failed fetch; raw detail goes to the log only
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching comparison data. Please try again later.";

/// Comparison session state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// Nothing in flight, nothing to report
    #[default]
    Idle,
    /// Request issued, waiting for the API
    Loading { query: String },
    /// Latest request succeeded
    Success(ComparisonResult),
    /// Latest request failed
    Error { message: String },
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Success or Error
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Error { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message } => Some(message),
            _ => None,
        }
    }
}
