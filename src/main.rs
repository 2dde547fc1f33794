use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use todo_api::{app, config, state};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (embedded defaults -> todo-api.toml -> env/.env)
    let app_cfg = config::load()?;

    // Logging (stdout + optional daily file rotation)
    let (stdout_nb, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    let default_filter = format!("{},tower_http=info", app_cfg.logging.level.to_lowercase());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());
    let (file_layer, file_guard) = match app_cfg.logging.file_dir.as_deref() {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::daily(dir, "todo-api.log");
            let (file_nb, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file_nb).boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(stdout_nb))
        .with(file_layer)
        .init();
    // Keep guards alive so the non-blocking writers flush on exit
    let _log_guards = (stdout_guard, file_guard);

    info!("Starting {} v{}", app_cfg.app.name, app_cfg.app.version);
    info!("Debug mode: {}", app_cfg.app.debug);
    info!("Storage backend: {:?}", app_cfg.storage.backend);

    let storage = state::build_storage(&app_cfg).await?;
    let state = state::AppState::new(storage, app_cfg.clone());
    let router = app::build_app(state);

    let port: u16 = app_cfg.server.port;
    let host: String = app_cfg.server.host.clone();
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid listen addr {}:{} - {}", host, port, e))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("{} listening on http://{}", app_cfg.app.name, listener.local_addr()?);
    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

    info!("Shutting down application");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("Shutdown signal received. Stopping server...");
}
