//! Error types for the ev-app service layer.

/// Service-layer error that wraps the lower crates' errors for the CLI and
/// any other frontend.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Backend request failed: {message}")]
    Api {
        message: String,
        /// Text shown to the user in a notification.
        user_message: String,
    },

    #[error("Boundary cache error: {0}")]
    Cache(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No location selected")]
    NoLocation,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api { user_message, .. } => user_message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<ev_config::ConfigError> for AppError {
    fn from(err: ev_config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<ev_api::ApiError> for AppError {
    fn from(err: ev_api::ApiError) -> Self {
        AppError::Api {
            message: err.to_string(),
            user_message: err.user_message(),
        }
    }
}

impl From<ev_cache::CacheError> for AppError {
    fn from(err: ev_cache::CacheError) -> Self {
        AppError::Cache(err.to_string())
    }
}

impl From<ev_core::CoreError> for AppError {
    fn from(err: ev_core::CoreError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}
