//! HTTP handlers. Each one unwraps the request, calls into `server_api`, and
//! maps `ApiError` codes onto status codes.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use shared::{
    domain::TodoId,
    error::{ApiError, ErrorCode},
    protocol::{
        CreateTodoRequest, ReorderRequest, ReorderResponse, TodoItem, UpdateTodoRequest,
    },
};
use tracing::error;

use crate::app_state::AppState;

pub(crate) type ApiRejection = (StatusCode, Json<ApiError>);

pub(crate) async fn healthz(
    State(state): State<Arc<AppState>>,
) -> Result<&'static str, ApiRejection> {
    server_api::health(&state.api).await.map_err(reject)?;
    Ok("ok")
}

pub(crate) async fn list_todos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TodoItem>>, ApiRejection> {
    let todos = server_api::list_todos(&state.api).await.map_err(reject)?;
    Ok(Json(todos))
}

pub(crate) async fn create_todo(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoItem>), ApiRejection> {
    let Json(req) = payload.map_err(malformed_body)?;
    let todo = server_api::create_todo(&state.api, req)
        .await
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(todo)))
}

pub(crate) async fn update_todo(
    State(state): State<Arc<AppState>>,
    todo_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<TodoItem>, ApiRejection> {
    let id = todo_id_from_path(todo_id)?;
    let Json(req) = payload.map_err(malformed_body)?;
    let todo = server_api::update_todo(&state.api, id, req)
        .await
        .map_err(reject)?;
    Ok(Json(todo))
}

pub(crate) async fn reorder_todos(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReorderRequest>, JsonRejection>,
) -> Result<Json<ReorderResponse>, ApiRejection> {
    let Json(req) = payload.map_err(|rejection| {
        body_rejection(rejection, "'ordered_ids' (list of integers) is required")
    })?;
    let response = server_api::reorder_todos(&state.api, req)
        .await
        .map_err(reject)?;
    Ok(Json(response))
}

pub(crate) async fn delete_todo(
    State(state): State<Arc<AppState>>,
    todo_id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiRejection> {
    let id = todo_id_from_path(todo_id)?;
    server_api::delete_todo(&state.api, id)
        .await
        .map_err(reject)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn reject(err: ApiError) -> ApiRejection {
    if err.code == ErrorCode::Internal {
        error!(message = %err.message, "request failed");
    }
    (status_for(err.code), Json(err))
}

fn malformed_body(rejection: JsonRejection) -> ApiRejection {
    body_rejection(rejection, "malformed request body")
}

// Bodies cut off by the size limit keep their 413; anything else is a 400.
fn body_rejection(rejection: JsonRejection, context: &str) -> ApiRejection {
    let (status, body) = reject(ApiError::validation(format!(
        "{context}: {}",
        rejection.body_text()
    )));
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return (rejection.status(), body);
    }
    (status, body)
}

// Non-numeric ids can never name a todo, so they read as not found.
fn todo_id_from_path(path: Result<Path<i64>, PathRejection>) -> Result<TodoId, ApiRejection> {
    match path {
        Ok(Path(id)) => Ok(TodoId(id)),
        Err(rejection) => Err(reject(ApiError::not_found(format!(
            "no todo at this path: {}",
            rejection.body_text()
        )))),
    }
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
