use std::fs;

use tempfile::NamedTempFile;

use crate::config::{self, AppConfig, StorageBackend};

fn env(pairs: &[(&str, &str)]) -> Option<::config::Map<String, String>> {
    let mut map = ::config::Map::new();
    for (k, v) in pairs {
        map.insert(k.to_string(), v.to_string());
    }
    Some(map)
}

#[test]
fn test_default_config() {
    let config = AppConfig::default();

    assert_eq!(config.app.name, "TODO API");
    assert_eq!(config.app.version, "1.0.0");
    assert!(!config.app.debug);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.cors.allow_origins, vec!["*".to_string()]);
    assert!(config.cors.allow_credentials);
    assert_eq!(config.logging.level, "info");
    assert!(config.logging.file_dir.is_none());
    assert_eq!(config.storage.backend, StorageBackend::Memory);
    assert_eq!(config.storage.timeout_ms, 5000);
    assert_eq!(config.static_files.dir, "dist/public");
}

#[test]
fn test_valid_config_does_not_error() {
    assert!(config::load_with_env(env(&[])).is_ok());
}

#[test]
fn test_config_from_env() {
    let config = config::load_with_env(env(&[
        ("TODO_API__SERVER__HOST", "127.0.0.1"),
        ("TODO_API__SERVER__PORT", "3000"),
        ("TODO_API__APP__DEBUG", "true"),
        ("TODO_API__STORAGE__BACKEND", "sqlite"),
        ("TODO_API__STORAGE__DATABASE_URL", "sqlite://test.db"),
        ("TODO_API__CORS__ALLOW_ORIGINS", "http://a.example,http://b.example"),
    ]))
    .unwrap();

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 3000);
    assert!(config.app.debug);
    assert_eq!(config.storage.backend, StorageBackend::Sqlite);
    assert_eq!(config.storage.database_url, "sqlite://test.db");
    assert_eq!(config.cors.allow_origins, vec!["http://a.example".to_string(), "http://b.example".to_string()]);
}

#[test]
fn test_invalid_server_port() {
    let result = config::load_with_env(env(&[("TODO_API__SERVER__PORT", "0")]));
    assert!(result.unwrap_err().to_string().contains("invalid server.port"));
}

#[test]
fn test_invalid_storage_settings() {
    let result = config::load_with_env(env(&[("TODO_API__STORAGE__TIMEOUT_MS", "0")]));
    assert!(result.unwrap_err().to_string().contains("timeout_ms"));

    let result = config::load_with_env(env(&[("TODO_API__STORAGE__BACKEND", "postgres")]));
    assert!(result.is_err());
}

#[test]
fn test_config_from_file() {
    let config_content = r#"
[app]
name = "File Todos"

[server]
port = 9000

[logging]
level = "debug"
file_dir = "logs"

[storage]
backend = "sqlite"
database_url = "sqlite://custom.db"
"#;
    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path().with_extension("toml");
    fs::write(&path, config_content).unwrap();

    let config = config::load_with_env(env(&[
        ("TODO_API_CONFIG", path.to_str().unwrap()),
        // Environment still wins over the file
        ("TODO_API__SERVER__PORT", "9100"),
    ]))
    .unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(config.app.name, "File Todos");
    assert_eq!(config.app.version, "1.0.0");
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.file_dir.as_deref(), Some("logs"));
    assert_eq!(config.storage.backend, StorageBackend::Sqlite);
    assert_eq!(config.storage.database_url, "sqlite://custom.db");
}

#[test]
fn test_ensure_sqlite_parent_dir() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("todos.db");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());

    config::ensure_sqlite_parent_dir(&url).unwrap();
    assert!(dir.path().join("nested").is_dir());

    // Non-sqlite:// URLs are left alone
    config::ensure_sqlite_parent_dir("sqlite::memory:").unwrap();
}
