use std::fs;

use serde::Deserialize;
use storage::DEFAULT_DATABASE_URL;
use tracing::warn;

const CONFIG_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub database_url: String,
    pub body_limit_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            database_url: DEFAULT_DATABASE_URL.into(),
            body_limit_bytes: 64 * 1024,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    bind_addr: Option<String>,
    database_url: Option<String>,
    body_limit_bytes: Option<usize>,
}

/// Defaults, then `server.toml` in the working directory, then environment.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(CONFIG_FILE) {
        apply_file_config(&mut settings, &raw);
    }
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());

    settings
}

fn apply_file_config(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<FileConfig>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(error) => {
            warn!(%error, file = CONFIG_FILE, "ignoring unreadable config file");
            return;
        }
    };

    if let Some(v) = file_cfg.bind_addr {
        settings.server_bind = v;
    }
    if let Some(v) = file_cfg.database_url {
        settings.database_url = v;
    }
    if let Some(v) = file_cfg.body_limit_bytes {
        settings.body_limit_bytes = v;
    }
}

fn apply_env_overrides(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = var("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = var("DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = var("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    if let Some(v) = var("APP__BODY_LIMIT_BYTES") {
        match v.parse::<usize>() {
            Ok(parsed) => settings.body_limit_bytes = parsed,
            Err(_) => warn!(value = %v, "ignoring non-numeric APP__BODY_LIMIT_BYTES"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
