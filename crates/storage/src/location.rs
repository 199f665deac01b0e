//! Turning user-supplied database locations into sqlx SQLite urls.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./data/todos.db";

/// Bare paths and `sqlite:path` both become `sqlite://path`, with Windows
/// separators flipped. Anything that already names a scheme is left alone.
pub fn normalize_database_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return DEFAULT_DATABASE_URL.to_string();
    }
    if raw.starts_with("sqlite::memory:") || raw.contains("://") {
        return raw.to_string();
    }

    let path = raw.strip_prefix("sqlite:").unwrap_or(raw).replace('\\', "/");
    format!("sqlite://{path}")
}

/// File behind a SQLite url; `None` for in-memory or non-SQLite urls.
pub fn database_file(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") {
        return None;
    }
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split_once('?').map_or(rest, |(path, _query)| path);
    (!path.is_empty()).then(|| PathBuf::from(path))
}

pub fn ensure_parent_dir(database_url: &str) -> Result<()> {
    let Some(parent) = database_file(database_url)
        .as_deref()
        .and_then(|file| file.parent())
        .map(PathBuf::from)
    else {
        return Ok(());
    };

    fs::create_dir_all(&parent).with_context(|| {
        format!(
            "cannot create directory '{}' for database '{database_url}'",
            parent.display()
        )
    })
}

pub fn prepare_database_url(raw: &str) -> Result<String> {
    let database_url = normalize_database_url(raw);
    ensure_parent_dir(&database_url)?;
    Ok(database_url)
}

#[cfg(test)]
#[path = "tests/location_tests.rs"]
mod tests;
