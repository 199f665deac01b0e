use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::TodoId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("{code:?}: {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn todo_not_found(id: TodoId) -> Self {
        Self::not_found(format!("todo {id} not found"))
    }

    /// Ids listed under `details.missing_ids`, if any.
    pub fn missing_ids(&self) -> Vec<TodoId> {
        self.details
            .as_ref()
            .and_then(|details| details.get("missing_ids"))
            .and_then(|ids| serde_json::from_value(ids.clone()).ok())
            .unwrap_or_default()
    }
}
