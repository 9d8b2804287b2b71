//! Employee Directory - REST API for bank branches and their staff
//!
//! Serves CRUD endpoints for branches and employees under `/api/v1`,
//! backed by an in-memory or SQLite document store.

use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;

use config::LogFormat;
use employee_directory::{config, create_router, db, AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    // Check for --help flag
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        return Ok(());
    }

    // Check for --version flag
    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        println!("Employee Directory {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Check for --check-store flag
    if args.iter().any(|arg| arg == "--check-store") {
        return check_store().await;
    }

    // Load configuration first (before logging, so we know log format)
    let config = AppConfig::load().context("Failed to load configuration")?;

    // The guard must outlive the server so buffered log lines reach the file
    let _log_guard = init_logging(&config);

    info!("Employee Directory starting up");
    info!("Configuration loaded successfully");

    ensure_data_directory(&config)?;

    info!(backend = ?config.store.backend, "Initializing document store");
    let store = db::init_store(&config.store)
        .await
        .context("Failed to initialize document store")?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address configuration")?;

    let state = AppState::new(config, store);
    let app = create_router(state);

    info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("HTTP server is ready to accept connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Write and remove a probe document, reporting whether the store works
async fn check_store() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    ensure_data_directory(&config)?;

    match probe_store(&config).await {
        Ok(()) => {
            println!("OK");
            Ok(())
        }
        Err(e) => {
            eprintln!("Store check failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn probe_store(config: &AppConfig) -> Result<()> {
    const PROBE_COLLECTION: &str = "healthcheck";

    let store = db::init_store(&config.store).await?;

    let mut probe = db::Document::new();
    probe.insert("checkedAt".to_string(), json!(chrono::Utc::now().to_rfc3339()));

    let written = store
        .insert(PROBE_COLLECTION, probe)
        .await
        .context("Failed to write probe document")?;

    store
        .get(PROBE_COLLECTION, &written.id)
        .await
        .context("Failed to read probe document")?
        .context("Probe document vanished after write")?;

    if !store
        .remove(PROBE_COLLECTION, &written.id)
        .await
        .context("Failed to remove probe document")?
    {
        anyhow::bail!("Probe document could not be removed");
    }

    Ok(())
}

/// Initialize the logging/tracing infrastructure
///
/// One formatting layer per configured target, all sharing the env filter.
fn init_logging(config: &AppConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use config::LogTarget;
    use tracing_subscriber::{prelude::*, EnvFilter};

    let log_config = &config.logging;
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_config.level));

    let mut layers = Vec::new();
    let mut guard = None;

    if matches!(log_config.target, LogTarget::Console | LogTarget::Both) {
        layers.push(fmt_layer(&log_config.format, std::io::stdout, true));
    }
    if matches!(log_config.target, LogTarget::File | LogTarget::Both) {
        let (writer, file_guard) = create_file_writer(log_config);
        layers.push(fmt_layer(&log_config.format, writer, false));
        guard = Some(file_guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .init();

    guard
}

type BoxedLayer = Box<dyn tracing_subscriber::Layer<tracing_subscriber::Registry> + Send + Sync>;

/// Formatting layer for one output, in the configured format
fn fmt_layer<W>(format: &LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    use tracing_subscriber::{fmt, Layer};

    let layer = fmt::layer().with_writer(writer).with_ansi(ansi);
    match format {
        LogFormat::Json => layer.json().with_target(true).boxed(),
        LogFormat::Compact => layer.compact().with_target(false).boxed(),
        LogFormat::Pretty => layer.with_target(true).with_thread_ids(false).boxed(),
    }
}

/// Create a file writer with optional daily rotation
fn create_file_writer(
    log_config: &config::LoggingConfig,
) -> (
    tracing_appender::non_blocking::NonBlocking,
    tracing_appender::non_blocking::WorkerGuard,
) {
    if let Err(e) = std::fs::create_dir_all(&log_config.log_dir) {
        eprintln!(
            "Warning: Failed to create log directory {:?}: {}",
            log_config.log_dir, e
        );
    }

    let file_appender = if log_config.daily_rotation {
        tracing_appender::rolling::daily(&log_config.log_dir, &log_config.log_prefix)
    } else {
        tracing_appender::rolling::never(&log_config.log_dir, &log_config.log_prefix)
    };

    tracing_appender::non_blocking(file_appender)
}

/// Ensure the directory holding the SQLite file exists
fn ensure_data_directory(config: &AppConfig) -> Result<()> {
    if config.store.backend != config::StoreBackend::Sqlite {
        return Ok(());
    }

    if let Some(parent) = sqlite_parent_dir(&config.store.url) {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(&parent).context("Failed to create data directory")?;
            info!("Created data directory: {:?}", parent);
        }
    }
    Ok(())
}

/// Directory part of a `sqlite://` URL, ignoring query parameters
fn sqlite_parent_dir(url: &str) -> Option<std::path::PathBuf> {
    let path = url.strip_prefix("sqlite://")?;
    let path = path.split('?').next().unwrap_or(path);
    if path.starts_with(':') {
        return None;
    }
    std::path::Path::new(path).parent().map(|p| p.to_path_buf())
}

fn print_help() {
    println!(
        r#"Employee Directory {}

USAGE:
    employee-directory [OPTIONS]

OPTIONS:
    -h, --help          Print this help message
    -V, --version       Print version information
    --check-store       Write and remove a probe document, print OK and exit

ENVIRONMENT:
    EMPDIR_CONFIG       Path to the YAML configuration file
    EMPDIR_HOST         Listen address (default: 127.0.0.1)
    PORT, EMPDIR_PORT   Listen port (default: 3000)
    EMPDIR_STORE        Document store backend: memory or sqlite
    DATABASE_URL        SQLite connection URL
    RUST_LOG            Log filter (default: info)
    EMPDIR_LOG_FORMAT   Log format: pretty, compact or json
"#,
        env!("CARGO_PKG_VERSION")
    );
}
