use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// No response was received from the remote API.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The remote API answered 401. The session has already been logged out.
    #[error("Authentication error: {0}")]
    Unauthorized(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// A successful response whose body does not match the expected schema.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Unauthorized(_) => Some(401),
            AppError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Unauthorized(_))
    }

    /// Human readable message for front-ends. FastAPI error bodies carry the
    /// message under `detail`, which is preferred over the raw body.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api { body, .. } | AppError::Unauthorized(body) => {
                serde_json::from_str::<serde_json::Value>(body)
                    .ok()
                    .and_then(|v| {
                        v.get("detail")
                            .or_else(|| v.get("message"))
                            .and_then(|d| d.as_str())
                            .map(str::to_string)
                    })
                    .unwrap_or_else(|| self.to_string())
            }
            _ => self.to_string(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidResponse(err.to_string())
    }
}
