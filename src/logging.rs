use std::fs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingSettings;

/// Initializes logging: console output on stderr (stdout carries command
/// output) plus an optional daily-rotated JSON log file.
pub fn init_logging(settings: &LoggingSettings) {
    // Respect RUST_LOG if set; otherwise info for our crate, warnings elsewhere
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("osm_embed=info,warn"));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    let file_layer = settings.directory.as_ref().map(|directory| {
        let _ = fs::create_dir_all(directory);
        let file_appender = tracing_appender::rolling::daily(directory, &settings.file_prefix);
        let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
        // The guard must outlive the program for buffered lines to be flushed
        std::mem::forget(guard);
        fmt::layer().json().with_writer(non_blocking_writer)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();
}
