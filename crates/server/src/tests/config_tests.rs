use super::*;

use std::collections::HashMap;

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn file_config_overrides_defaults() {
    let mut settings = Settings::default();
    apply_file_config(
        &mut settings,
        r#"
        bind_addr = "0.0.0.0:8080"
        body_limit_bytes = 4096
        "#,
    );
    assert_eq!(settings.server_bind, "0.0.0.0:8080");
    assert_eq!(settings.body_limit_bytes, 4096);
    assert_eq!(settings.database_url, Settings::default().database_url);
}

#[test]
fn malformed_file_config_is_ignored() {
    let mut settings = Settings::default();
    apply_file_config(&mut settings, "bind_addr = [not toml");
    assert_eq!(settings, Settings::default());
}

#[test]
fn app_prefixed_env_wins_over_plain_env() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        env_of(&[
            ("SERVER_BIND", "127.0.0.1:1"),
            ("APP__BIND_ADDR", "127.0.0.1:2"),
            ("DATABASE_URL", "sqlite://a.db"),
            ("APP__BODY_LIMIT_BYTES", "not-a-number"),
        ]),
    );
    assert_eq!(settings.server_bind, "127.0.0.1:2");
    assert_eq!(settings.database_url, "sqlite://a.db");
    assert_eq!(
        settings.body_limit_bytes,
        Settings::default().body_limit_bytes
    );
}

#[tokio::test]
async fn prepared_database_url_creates_openable_sqlite_file() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("server.db");

    let prepared =
        storage::prepare_database_url(db_path.to_string_lossy().as_ref()).expect("prepare");
    let storage = storage::Storage::new(&prepared).await.expect("open sqlite");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should be created: {}",
        db_path.display()
    );
}
