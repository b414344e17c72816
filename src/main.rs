// src/main.rs
mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Args, is_config_update};
use commands::{
    handle_config_update_command, handle_list_config_command, handle_page_command, validate_args,
};
use hapi_brief::config::Config;
use hapi_brief::error::AppError;
use std::path::Path;

/// Log path from the saved config, without prompting or validating.
async fn configured_log_path() -> Option<String> {
    let config_path = Config::get_config_path();
    if !Path::new(&config_path).exists() {
        return None;
    }
    Config::load_from_path(&config_path)
        .await
        .ok()
        .and_then(|config| config.log_file_path)
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    validate_args(&args)?;

    let config_log_path = configured_log_path().await;
    let (log_file_path, _guard) = logging::setup_logging(&args, config_log_path.as_deref()).await?;
    tracing::info!("Logs are being written to: {log_file_path}");

    // Handle configuration operations first
    if args.list_config {
        return handle_list_config_command().await;
    }

    if is_config_update(&args) {
        return handle_config_update_command(&args).await;
    }

    let config = Config::load().await?;
    handle_page_command(&args, &config).await
}
