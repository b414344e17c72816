//! User interaction and prompts for configuration setup
//!
//! This module handles user prompts and input collection for configuration
//! initialization when config files don't exist or need user input.

use crate::error::AppError;
use tokio::io::{self, AsyncBufReadExt};

/// Prompts the user for the HAPI application identifier and returns the trimmed input.
///
/// The identifier is the base64 token HAPI issues for `application:email`.
///
/// # Example
/// ```no_run
/// use hapi_brief::config::user_prompts::prompt_for_app_identifier;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let identifier = prompt_for_app_identifier().await?;
/// assert!(!identifier.is_empty());
/// # Ok(())
/// # }
/// ```
pub async fn prompt_for_app_identifier() -> Result<String, AppError> {
    println!("Please enter your HAPI app identifier: ");
    let mut input = String::new();
    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin);
    reader.read_line(&mut input).await?;
    Ok(input.trim().to_string())
}
