//! Logging configuration.
//!
//! Everything goes to stderr. On Linux the journal can be used as the
//! persistent sink; otherwise two daily-rolling files are written to the log
//! directory: `dayalbum.log` with every enabled event and `error.log` with
//! errors only.

use anyhow::Result;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

static GUARDS: OnceLock<Vec<WorkerGuard>> = OnceLock::new();

/// Initialize the logging system.
///
/// Log level can be controlled via the `DAYALBUM_LOG` environment variable,
/// e.g. `DAYALBUM_LOG=debug` or `DAYALBUM_LOG=dayalbum=debug,tower_http=info`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_env("DAYALBUM_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    #[cfg(target_os = "linux")]
    {
        if config.journald {
            if let Ok(journald_layer) = tracing_journald::layer() {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(stderr_layer)
                    .with(journald_layer)
                    .init();

                tracing::info!("Logging initialized with journald backend");
                return Ok(());
            }
        }
    }

    std::fs::create_dir_all(&config.dir)?;

    let (all_writer, all_guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&config.dir, "dayalbum.log"));
    let (err_writer, err_guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&config.dir, "error.log"));

    // The writers stop flushing once their guards drop.
    let _ = GUARDS.set(vec![all_guard, err_guard]);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(fmt::layer().with_writer(all_writer).with_ansi(false))
        .with(
            fmt::layer()
                .with_writer(err_writer)
                .with_ansi(false)
                .with_filter(LevelFilter::ERROR),
        )
        .init();

    tracing::info!(dir = %config.dir.display(), "Logging initialized with file backend");
    Ok(())
}

/// Stderr-only logging for the command-line importer.
pub fn init_stderr() {
    let env_filter = EnvFilter::try_from_env("DAYALBUM_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
