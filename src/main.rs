use anyhow::{Context, Result};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use dayalbum::config::Config;
use dayalbum::db::Database;
use dayalbum::logging;
use dayalbum::web::{build_app_router, AppState};

fn parse_args() -> Option<PathBuf> {
    let args: Vec<String> = std::env::args().collect();
    let mut config_path = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("dayalbum {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    config_path
}

fn print_help() {
    println!(
        r#"dayalbum - browse local photo folders as albums, grouped by day

USAGE:
    dayalbum [OPTIONS]

OPTIONS:
    --config, -c PATH   Path to config file
    --version, -V       Show version
    --help, -h          Show this help message

ENVIRONMENT:
    DAYALBUM_CONFIG     Path to config file (overrides default location)
    DAYALBUM_DB         Database path
    DAYALBUM_HOST       Listen address
    DAYALBUM_PORT       Listen port
    DAYALBUM_LOG        Log filter (trace, debug, info, warn, error)

Config file location: $XDG_CONFIG_HOME/dayalbum/config.toml

See also: dayalbum-scan --help"#
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = parse_args();

    let config = match config_path {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };

    logging::init(&config.logging)?;

    let db = Database::open(config.db_path())?;
    db.initialize()?;
    tracing::info!(path = %config.db_path().display(), "Database ready");

    let host: IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.server.host))?;
    let addr = SocketAddr::new(host, config.server.port);

    let state = AppState::new(db.into_shared(), config);
    let app = build_app_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    tracing::info!(%addr, "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
