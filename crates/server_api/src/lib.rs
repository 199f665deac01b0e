use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use shared::{
    domain::TodoId,
    error::{ApiError, ErrorCode},
    protocol::{
        CreateTodoRequest, ReorderRequest, ReorderResponse, TodoItem, UpdateTodoRequest,
    },
};
use storage::{NewTodo, ReorderOutcome, Storage, StoredTodo, TodoPatch};
use tracing::{debug, warn};

pub const MAX_CONTENT_CHARS: usize = 200;

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub async fn health(ctx: &ApiContext) -> Result<(), ApiError> {
    ctx.storage.health_check().await.map_err(internal)
}

pub async fn list_todos(ctx: &ApiContext) -> Result<Vec<TodoItem>, ApiError> {
    let todos = ctx.storage.list_todos().await.map_err(internal)?;
    Ok(todos.into_iter().map(todo_item).collect())
}

pub async fn create_todo(
    ctx: &ApiContext,
    request: CreateTodoRequest,
) -> Result<TodoItem, ApiError> {
    let content = match request.content.as_deref().map(str::trim) {
        Some(content) if !content.is_empty() => validate_content(content)?,
        _ => return Err(ApiError::validation("content is required")),
    };
    let due_date = request
        .due_date
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(parse_due_date)
        .transpose()?;

    let created = ctx
        .storage
        .create_todo(&NewTodo {
            content,
            due_date,
            priority: request.priority,
        })
        .await
        .map_err(internal)?;
    debug!(todo_id = %created.id, position = created.position, "todo created");
    Ok(todo_item(created))
}

pub async fn update_todo(
    ctx: &ApiContext,
    id: TodoId,
    request: UpdateTodoRequest,
) -> Result<TodoItem, ApiError> {
    if request.is_empty() {
        let stored = ctx.storage.get_todo(id).await.map_err(internal)?;
        return stored
            .map(todo_item)
            .ok_or_else(|| ApiError::todo_not_found(id));
    }

    let content = request
        .content
        .as_deref()
        .map(validate_content)
        .transpose()?;
    let due_date = match request.due_date {
        None => None,
        Some(None) => Some(None),
        Some(Some(raw)) if raw.trim().is_empty() => Some(None),
        Some(Some(raw)) => Some(Some(parse_due_date(&raw)?)),
    };

    let patch = TodoPatch {
        content,
        is_completed: request.is_completed,
        due_date,
        priority: request.priority,
        position: request.position,
    };
    let updated = ctx
        .storage
        .update_todo(id, &patch)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::todo_not_found(id))?;
    Ok(todo_item(updated))
}

pub async fn reorder_todos(
    ctx: &ApiContext,
    request: ReorderRequest,
) -> Result<ReorderResponse, ApiError> {
    let mut seen = HashSet::with_capacity(request.ordered_ids.len());
    let duplicates: Vec<TodoId> = request
        .ordered_ids
        .iter()
        .copied()
        .filter(|id| !seen.insert(*id))
        .collect();
    // A repeated id leaves some todo unaccounted for, same as an unknown one.
    if !duplicates.is_empty() {
        warn!(?duplicates, "reorder rejected; ids repeated");
        return Err(ApiError::not_found(format!(
            "ordered_ids must name each todo once; repeated: {}",
            join_ids(&duplicates)
        ))
        .with_details(serde_json::json!({ "duplicate_ids": duplicates })));
    }

    match ctx
        .storage
        .reorder_todos(&request.ordered_ids)
        .await
        .map_err(internal)?
    {
        ReorderOutcome::Reordered { count } => {
            debug!(count, "todos reordered");
            Ok(ReorderResponse {
                message: "Todos reordered successfully.".to_string(),
                reordered: count,
            })
        }
        ReorderOutcome::Unresolved { missing } => {
            warn!(?missing, "reorder rejected; ids not found");
            Err(ApiError::not_found(format!(
                "todo ids not found: {}",
                join_ids(&missing)
            ))
            .with_details(serde_json::json!({ "missing_ids": missing })))
        }
    }
}

pub async fn delete_todo(ctx: &ApiContext, id: TodoId) -> Result<(), ApiError> {
    let deleted = ctx.storage.delete_todo(id).await.map_err(internal)?;
    if !deleted {
        return Err(ApiError::todo_not_found(id));
    }
    debug!(todo_id = %id, "todo deleted");
    Ok(())
}

/// Accepts RFC 3339, or a naive date-time / date which is read as UTC.
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(ApiError::validation(format!("invalid due_date '{raw}'")))
}

fn validate_content(raw: &str) -> Result<String, ApiError> {
    let content = raw.trim();
    if content.is_empty() {
        return Err(ApiError::validation("content must not be empty"));
    }
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(ApiError::validation(format!(
            "content exceeds {MAX_CONTENT_CHARS} characters"
        )));
    }
    Ok(content.to_string())
}

fn join_ids(ids: &[TodoId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn todo_item(todo: StoredTodo) -> TodoItem {
    TodoItem {
        id: todo.id,
        content: todo.content,
        is_completed: todo.is_completed,
        created_at: todo.created_at,
        due_date: todo.due_date,
        priority: todo.priority,
        position: todo.position,
    }
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, format!("{err:#}"))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
