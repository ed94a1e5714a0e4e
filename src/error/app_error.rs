use thiserror::Error;

/// Application-wide error type that represents all possible errors in the system.
///
/// This enum provides comprehensive error handling with structured information
/// for different error scenarios, supporting automatic conversion from anyhow
/// and detailed context for debugging and user feedback.
#[derive(Error, Debug)]
pub enum AppError {
    /// Required credential or configuration missing or malformed
    #[error("Configuration error: {key}: {reason}")]
    Configuration { key: String, reason: String },

    /// Validation error with field-specific details, raised before any
    /// network activity
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// The messaging platform rejected or failed to process a delivery
    #[error("Delivery failed ({}): {reason}", status_label(.status))]
    Delivery {
        /// HTTP status reported by the platform, if a response was received
        status: Option<u16>,
        /// The platform's reported reason, or the transport error text
        reason: String,
        source: Option<anyhow::Error>,
    },

    /// The bounded network call did not complete in time
    #[error("Delivery timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("HTTP {}", code),
        None => "no response".to_string(),
    }
}

impl AppError {
    /// Create a delivery error from a platform response
    pub fn delivery(status: Option<u16>, reason: impl Into<String>) -> Self {
        AppError::Delivery {
            status,
            reason: reason.into(),
            source: None,
        }
    }

    /// HTTP status attached to a delivery failure, if any
    pub fn delivery_status(&self) -> Option<u16> {
        match self {
            AppError::Delivery { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
