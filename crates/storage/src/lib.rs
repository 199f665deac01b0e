use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, QueryBuilder, Row, Sqlite,
};
use std::{collections::HashSet, str::FromStr};

use shared::domain::{TodoId, DEFAULT_PRIORITY};

pub mod location;

pub use location::{prepare_database_url, DEFAULT_DATABASE_URL};

const TODO_COLUMNS: &str = "id, content, is_completed, created_at, due_date, priority, position";

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTodo {
    pub id: TodoId,
    pub content: String,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: i64,
    pub position: i64,
}

#[derive(Debug, Clone)]
pub struct NewTodo {
    pub content: String,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<i64>,
}

/// Fields left as `None` keep their stored value. `due_date: Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct TodoPatch {
    pub content: Option<String>,
    pub is_completed: Option<bool>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub priority: Option<i64>,
    pub position: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderOutcome {
    Reordered { count: usize },
    /// Nothing was written; these ids do not exist.
    Unresolved { missing: Vec<TodoId> },
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        location::ensure_parent_dir(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// All todos in display order: position, then newest first.
    pub async fn list_todos(&self) -> Result<Vec<StoredTodo>> {
        let rows = sqlx::query(&format!(
            "SELECT {TODO_COLUMNS} FROM todos ORDER BY position ASC, created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .context("failed to list todos")?;
        rows.iter().map(todo_from_row).collect()
    }

    pub async fn get_todo(&self, id: TodoId) -> Result<Option<StoredTodo>> {
        let row = sqlx::query(&format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(todo_from_row).transpose()
    }

    pub async fn create_todo(&self, new_todo: &NewTodo) -> Result<StoredTodo> {
        let mut tx = self.pool.begin().await?;

        let max_position: Option<i64> = sqlx::query_scalar("SELECT MAX(position) FROM todos")
            .fetch_one(&mut *tx)
            .await?;
        let position = max_position.map_or(0, |max| max + 1);

        let row = sqlx::query(&format!(
            "INSERT INTO todos (content, is_completed, created_at, due_date, priority, position)
             VALUES (?, 0, ?, ?, ?, ?)
             RETURNING {TODO_COLUMNS}"
        ))
        .bind(&new_todo.content)
        .bind(Utc::now())
        .bind(new_todo.due_date)
        .bind(new_todo.priority.unwrap_or(DEFAULT_PRIORITY))
        .bind(position)
        .fetch_one(&mut *tx)
        .await
        .context("failed to insert todo")?;
        let created = todo_from_row(&row)?;

        tx.commit().await?;
        Ok(created)
    }

    pub async fn update_todo(&self, id: TodoId, patch: &TodoPatch) -> Result<Option<StoredTodo>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        let mut todo = todo_from_row(&row)?;
        if let Some(content) = &patch.content {
            todo.content = content.clone();
        }
        if let Some(is_completed) = patch.is_completed {
            todo.is_completed = is_completed;
        }
        if let Some(due_date) = patch.due_date {
            todo.due_date = due_date;
        }
        if let Some(priority) = patch.priority {
            todo.priority = priority;
        }
        if let Some(position) = patch.position {
            todo.position = position;
        }

        sqlx::query(
            "UPDATE todos SET content = ?, is_completed = ?, due_date = ?, priority = ?, position = ?
             WHERE id = ?",
        )
        .bind(&todo.content)
        .bind(todo.is_completed)
        .bind(todo.due_date)
        .bind(todo.priority)
        .bind(todo.position)
        .bind(id.0)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("failed to update todo {id}"))?;

        tx.commit().await?;
        Ok(Some(todo))
    }

    /// Returns `false` when no row had this id.
    pub async fn delete_todo(&self, id: TodoId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete todo {id}"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Sets `position = index` for every id in `ordered_ids`, all or nothing.
    ///
    /// Every id must exist; otherwise the transaction is dropped without
    /// writing and the unresolved ids come back in input order. Todos not named
    /// keep their positions, so a partial list can leave duplicate positions
    /// behind. Callers are expected to submit the full set.
    pub async fn reorder_todos(&self, ordered_ids: &[TodoId]) -> Result<ReorderOutcome> {
        if ordered_ids.is_empty() {
            return Ok(ReorderOutcome::Reordered { count: 0 });
        }

        let mut tx = self.pool.begin().await?;

        let mut lookup = QueryBuilder::<Sqlite>::new("SELECT id FROM todos WHERE id IN (");
        let mut separated = lookup.separated(", ");
        for id in ordered_ids {
            separated.push_bind(id.0);
        }
        separated.push_unseparated(")");
        let found: Vec<i64> = lookup
            .build_query_scalar()
            .fetch_all(&mut *tx)
            .await
            .context("failed to resolve reorder ids")?;
        let existing: HashSet<i64> = found.into_iter().collect();

        let mut seen = HashSet::new();
        let missing: Vec<TodoId> = ordered_ids
            .iter()
            .copied()
            .filter(|id| !existing.contains(&id.0) && seen.insert(*id))
            .collect();
        if !missing.is_empty() {
            tx.rollback().await?;
            return Ok(ReorderOutcome::Unresolved { missing });
        }

        for (index, id) in ordered_ids.iter().enumerate() {
            let position = i64::try_from(index).context("reorder list too long")?;
            sqlx::query("UPDATE todos SET position = ? WHERE id = ?")
                .bind(position)
                .bind(id.0)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("failed to move todo {id} to position {position}"))?;
        }

        tx.commit().await?;
        Ok(ReorderOutcome::Reordered {
            count: ordered_ids.len(),
        })
    }
}

fn todo_from_row(row: &SqliteRow) -> Result<StoredTodo> {
    Ok(StoredTodo {
        id: TodoId(row.try_get::<i64, _>("id")?),
        content: row.try_get("content")?,
        is_completed: row.try_get("is_completed")?,
        created_at: row.try_get("created_at")?,
        due_date: row.try_get("due_date")?,
        priority: row.try_get("priority")?,
        position: row.try_get("position")?,
    })
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
