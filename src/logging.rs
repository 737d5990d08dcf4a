//! Tracing subscriber setup

use std::fs::OpenOptions;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Where and how log events are written
#[derive(Debug, Clone, Default)]
pub struct LogOptions<'a> {
    /// Append to this file instead of writing to stderr
    pub file: Option<&'a Path>,
    pub json: bool,
    /// Overrides `RUST_LOG` and the default filter
    pub filter: Option<&'a str>,
}

fn env_filter(filter: Option<&str>) -> EnvFilter {
    match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    }
}

/// Install the global subscriber
///
/// The returned guard flushes buffered events when dropped and must be held
/// for the lifetime of the program.
pub fn init(options: &LogOptions<'_>) -> std::io::Result<WorkerGuard> {
    let (writer, guard) = match options.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(options.filter))
        .with_writer(writer)
        .with_ansi(options.file.is_none());

    if options.json {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(guard)
}
