//! Error types for the Libris client

use thiserror::Error;

/// Main client error type.
///
/// Every failure a view can observe falls into one of these classes; the
/// dashboards convert them into user-visible messages and never let them
/// propagate further.
#[derive(Error, Debug)]
pub enum AppError {
    /// Client-side field validation failed; no request was issued.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The backend answered 401/403 on a privileged call.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Single-entity fetch answered 404.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Business-rule rejection (no copies available, double return, ...).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Transport failure: the request never produced a response.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Non-2xx response with no interpretable message.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Session file could not be read or written.
    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AppError {
    /// Message suitable for direct display.
    ///
    /// Connectivity failures must read as such, so the user can tell them
    /// apart from business-rule rejections.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Network(_) => {
                "Unable to connect to server. Please try again.".to_string()
            }
            AppError::Server { .. } => "Operation failed. Please try again.".to_string(),
            AppError::Validation(msg)
            | AppError::Auth(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg.clone(),
            AppError::Storage(_) => "Could not access saved session data.".to_string(),
            AppError::Config(_) => "Invalid client configuration.".to_string(),
        }
    }

    /// True for 401/403 responses, which follow the session-expiry policy.
    pub fn is_auth(&self) -> bool {
        matches!(self, AppError::Auth(_))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|field| field.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid input".to_string());
        AppError::Validation(message)
    }
}

/// Result type alias for client operations
pub type AppResult<T> = Result<T, AppError>;
