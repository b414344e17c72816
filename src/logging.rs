use crate::cli::Args;
use hapi_brief::config::Config;
use hapi_brief::error::AppError;
use std::io::{Stderr, stderr};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_LOG_FILE_NAME: &str = "hapi_brief.log";
const DEFAULT_DIRECTIVE: &str = "hapi_brief=info";

/// Console logs share the terminal with the JSON page on stdout, so they go
/// to stderr.
fn console_writer() -> Stderr {
    stderr()
}

fn env_filter() -> Result<EnvFilter, AppError> {
    let directive = DEFAULT_DIRECTIVE
        .parse()
        .map_err(|e| AppError::log_setup_error(format!("Invalid log directive: {e}")))?;
    Ok(EnvFilter::from_default_env().add_directive(directive))
}

/// Splits a log path into directory and file name, defaulting to the config log dir.
fn log_location(custom_log_path: Option<&str>) -> (String, String) {
    match custom_log_path {
        Some(custom_path) => {
            let path = Path::new(custom_path);
            let parent = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(DEFAULT_LOG_FILE_NAME);
            (parent.to_string_lossy().to_string(), file_name.to_string())
        }
        None => (
            Config::get_log_dir_path(),
            DEFAULT_LOG_FILE_NAME.to_string(),
        ),
    }
}

/// Sets up logging for the application.
///
/// Logs always go to a daily rolling file; with `--debug` they are also
/// written to stderr. `--log-file` wins over the configured log path.
///
/// Returns the path to the log file and the guard that must be kept alive
/// for the duration of the program to ensure proper log flushing.
pub async fn setup_logging(
    args: &Args,
    config_log_path: Option<&str>,
) -> Result<(String, WorkerGuard), AppError> {
    let custom_log_path = args.log_file.as_deref().or(config_log_path);
    let (log_dir, log_file_name) = log_location(custom_log_path);

    // Create log directory if it doesn't exist
    if !Path::new(&log_dir).exists() {
        tokio::fs::create_dir_all(&log_dir).await.map_err(|e| {
            AppError::log_setup_error(format!("Failed to create log directory: {e}"))
        })?;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, &log_file_name);

    // The guard must be kept alive for the duration of the program
    // to ensure logs are flushed properly
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::Layer::new()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(env_filter()?);

    let registry = tracing_subscriber::registry().with(file_layer);

    let installed = if args.debug {
        registry
            .with(
                fmt::Layer::new()
                    .with_writer(console_writer)
                    .with_ansi(true)
                    .with_filter(env_filter()?),
            )
            .try_init()
    } else {
        registry.try_init()
    };
    installed
        .map_err(|e| AppError::log_setup_error(format!("Failed to install subscriber: {e}")))?;

    let log_file_path = format!("{log_dir}/{log_file_name}");
    Ok((log_file_path, guard))
}
