use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request to todo server failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("request rejected: {}", .0.message)]
    Validation(ApiError),
    #[error("not found: {}", .0.message)]
    NotFound(ApiError),
    #[error("server error {status}: {}", .error.message)]
    Server { status: u16, error: ApiError },
}

impl ClientError {
    /// Classifies a non-success response. `body` is whatever the server sent;
    /// it is used verbatim as the message when it is not an `ApiError`.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        let error = serde_json::from_str::<ApiError>(body).unwrap_or_else(|_| {
            let code = match status {
                400 => ErrorCode::Validation,
                404 => ErrorCode::NotFound,
                _ => ErrorCode::Internal,
            };
            let message = if body.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                body.trim().to_string()
            };
            ApiError::new(code, message)
        });

        match status {
            400 => Self::Validation(error),
            404 => Self::NotFound(error),
            _ => Self::Server { status, error },
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Validation(error) | Self::NotFound(error) | Self::Server { error, .. } => {
                Some(error)
            }
            Self::InvalidUrl { .. } | Self::Transport(_) => None,
        }
    }

    /// Short text for the widget's notice line.
    pub fn notice(&self) -> String {
        match self {
            Self::Transport(_) => {
                "Cannot connect to server, please check network or server status.".to_string()
            }
            Self::InvalidUrl { url, .. } => format!("Invalid server address: {url}"),
            Self::Validation(error) | Self::NotFound(error) => error.message.clone(),
            Self::Server { status, error } => format!("Server error ({status}): {}", error.message),
        }
    }
}
