//! ev-api: the dashboard backend's HTTP surface.
//!
//! Contains:
//! - wire (serde shapes exactly as the backend sends them)
//! - model (domain-side results)
//! - convert (wire -> model)
//! - backend (the `Backend` seam consumed by the service layer)
//! - http (reqwest implementation of `Backend`)

pub mod backend;
pub mod convert;
pub mod http;
pub mod model;
pub mod wire;

pub use backend::Backend;
pub use http::{HttpBackend, HttpOptions};
pub use model::*;

use ev_core::CoreError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Envelope code the backend uses for success.
pub const SUCCESS_CODE: i64 = 200;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("Transport error on {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {endpoint}")]
    HttpStatus { endpoint: String, status: u16 },

    #[error("{endpoint} returned code {code}: {message}")]
    Application {
        endpoint: String,
        code: i64,
        message: String,
    },

    #[error("Failed to decode {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{endpoint} returned no data")]
    MissingData { endpoint: String },

    #[error("Invalid input: {0}")]
    Input(#[from] CoreError),
}

impl ApiError {
    /// Text suitable for a user-facing notification.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport { source, .. } if source.is_timeout() => {
                "The server took too long to respond.".to_string()
            }
            ApiError::Transport { .. } => "The server is not responding!".to_string(),
            ApiError::HttpStatus { status, .. } => format!("Status: {status}, server anomaly!"),
            ApiError::Application { message, .. } if !message.trim().is_empty() => message.clone(),
            ApiError::Application { code, .. } => format!("Request failed with code {code}"),
            ApiError::Decode { .. } => "The server sent an unreadable response.".to_string(),
            ApiError::MissingData { .. } => "The server returned no data.".to_string(),
            ApiError::Input(e) => e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_message_passes_through() {
        let e = ApiError::Application {
            endpoint: "/cities/all".to_string(),
            code: 500,
            message: "database offline".to_string(),
        };
        assert_eq!(e.user_message(), "database offline");

        let e = ApiError::Application {
            endpoint: "/cities/all".to_string(),
            code: 404,
            message: String::new(),
        };
        assert_eq!(e.user_message(), "Request failed with code 404");
    }

    #[test]
    fn input_errors_keep_core_text() {
        let e = ApiError::from(CoreError::InvalidDateTime {
            input: "yesterday".to_string(),
        });
        assert!(e.user_message().contains("yesterday"));
    }
}
