use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
    pub name: String,
    pub version: String,
    pub debug: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub allow_credentials: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for the daily rolling log file. Stdout only when unset.
    pub file_dir: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub database_url: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    pub dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSection,
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub static_files: StaticFilesConfig,
}

const DEFAULTS: &str = include_str!("../config/default.toml");
const ENV_PREFIX: &str = "TODO_API";

impl Default for AppConfig {
    fn default() -> Self {
        // Fallback: parse the embedded default TOML
        match ::config::Config::builder()
            .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
            .build()
        {
            Ok(cfg) => match cfg.try_deserialize() {
                Ok(app_cfg) => app_cfg,
                Err(e) => {
                    eprintln!("FATAL: Failed to deserialize default config: {}", e);
                    panic!("Failed to deserialize default config: {}", e);
                }
            },
            Err(e) => {
                eprintln!("FATAL: Failed to parse default config: {}", e);
                panic!("Failed to parse default config: {}", e);
            }
        }
    }
}

/// Loads configuration: embedded defaults -> todo-api.toml -> $TODO_API_CONFIG -> env/.env
pub fn load() -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();
    load_with_env(None)
}

/// Same as [`load`], but reads environment overrides from `env` instead of the process
/// environment when given. Keys use the real variable names, e.g. `TODO_API__SERVER__PORT`.
pub fn load_with_env(env: Option<::config::Map<String, String>>) -> anyhow::Result<AppConfig> {
    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
        // Optional local file: todo-api.toml (in CWD)
        .add_source(::config::File::with_name("todo-api").required(false));

    let custom_path = match &env {
        Some(map) => map.get("TODO_API_CONFIG").cloned(),
        None => std::env::var("TODO_API_CONFIG").ok(),
    };
    if let Some(custom_path) = custom_path {
        builder = builder.add_source(::config::File::with_name(&custom_path).required(false));
    }

    // Environment variables last to have highest precedence
    let environment = ::config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("cors.allow_origins")
        .source(env);
    builder = builder.add_source(environment);

    let cfg = builder.build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    if cfg.app.name.trim().is_empty() {
        return Err(anyhow::anyhow!("app.name must not be empty"));
    }
    if cfg.server.port == 0 {
        return Err(anyhow::anyhow!("invalid server.port: {}", cfg.server.port));
    }
    // Warn for privileged ports on Unix-like systems
    #[cfg(unix)]
    if cfg.server.port < 1024 {
        tracing::warn!("Using privileged port {} - may require elevated permissions", cfg.server.port);
    }

    if cfg.storage.timeout_ms == 0 {
        return Err(anyhow::anyhow!("storage.timeout_ms must be > 0"));
    }
    if cfg.storage.backend == StorageBackend::Sqlite && cfg.storage.database_url.trim().is_empty() {
        return Err(anyhow::anyhow!("storage.database_url is required for the sqlite backend"));
    }

    Ok(())
}

pub fn ensure_sqlite_parent_dir(url: &str) -> anyhow::Result<()> {
    if let Some(path) = url.strip_prefix("sqlite://") {
        let path = path.split('?').next().unwrap_or(path);
        let p = Path::new(path);
        if let Some(parent) = p.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }
    Ok(())
}
