use crate::cli::{Args, PageType, is_config_update};
use hapi_brief::config::Config;
use hapi_brief::data_fetcher::HapiClient;
use hapi_brief::data_fetcher::briefs::{
    DateRange, TableQuery, fetch_admin1_brief, fetch_admin2_brief, fetch_data_table,
    fetch_location_brief, fetch_locations,
};
use hapi_brief::data_fetcher::processors::parse_reference_date;
use hapi_brief::error::AppError;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Validates command line argument combinations.
///
/// Returns an error if a page is requested without the arguments it needs.
pub fn validate_args(args: &Args) -> Result<(), AppError> {
    if is_config_update(args) || args.list_config {
        return Ok(());
    }

    match args.page_type {
        PageType::Location | PageType::Admin1 | PageType::Admin2 if args.code.is_none() => {
            return Err(AppError::config_error(
                "--code is required for location, admin1 and admin2 pages",
            ));
        }
        PageType::Table if args.category.is_none() || args.subcategory.is_none() => {
            return Err(AppError::config_error(
                "--category and --subcategory are required for table pages",
            ));
        }
        _ => {}
    }

    if args.geojson && matches!(args.page_type, PageType::Locations | PageType::Table) {
        return Err(AppError::config_error(
            "--geojson is only available for location, admin1 and admin2 pages",
        ));
    }

    for date in [&args.start_date, &args.end_date].into_iter().flatten() {
        parse_reference_date(date)?;
    }

    Ok(())
}

/// Handles the --list-config command.
pub async fn handle_list_config_command() -> Result<(), AppError> {
    Config::display().await
}

/// Handles configuration update commands (--set-api-host, --set-app-identifier,
/// --set-log-file, --clear-log-file).
///
/// Starts from the saved file when there is one, never prompts.
pub async fn handle_config_update_command(args: &Args) -> Result<(), AppError> {
    let config_path = Config::get_config_path();
    let mut config = if Path::new(&config_path).exists() {
        Config::load_from_path(&config_path).await?
    } else {
        Config::default()
    };

    if let Some(new_host) = &args.new_api_host {
        config.api_host = new_host.clone();
    }

    if let Some(new_identifier) = &args.new_app_identifier {
        config.app_identifier = new_identifier.trim().to_string();
    }

    if let Some(new_log_path) = &args.new_log_file_path {
        config.log_file_path = Some(new_log_path.clone());
    } else if args.clear_log_file_path {
        config.log_file_path = None;
        println!("Custom log file path cleared. Using default location.");
    }

    config.save().await?;
    println!("Config updated successfully!");

    Ok(())
}

/// Filters for a table page.
pub fn table_query(args: &Args) -> Result<TableQuery, AppError> {
    let (Some(category), Some(subcategory)) = (&args.category, &args.subcategory) else {
        return Err(AppError::config_error(
            "--category and --subcategory are required for table pages",
        ));
    };
    Ok(TableQuery {
        location_code: args.location_code.clone(),
        admin1_code: args.admin1_code.clone(),
        admin2_code: args.admin2_code.clone(),
        provider_admin1_name: args.provider_admin1_name.clone(),
        provider_admin2_name: args.provider_admin2_name.clone(),
        sector_code: args.sector_code.clone(),
        admin_level: args.admin_level,
        dates: date_range(args),
        ..TableQuery::new(category, subcategory)
    })
}

fn date_range(args: &Args) -> DateRange {
    DateRange::new(args.start_date.clone(), args.end_date.clone())
}

fn required_code(args: &Args) -> Result<&str, AppError> {
    args.code
        .as_deref()
        .ok_or_else(|| AppError::config_error("--code is required for this page type"))
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, AppError> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

/// Serializes the requested page, or only its market features with `--geojson`.
pub async fn render_page(client: &HapiClient, args: &Args) -> Result<String, AppError> {
    let pretty = args.pretty;
    match args.page_type {
        PageType::Locations => {
            let listing = fetch_locations(client, args.filter.into()).await?;
            to_json(&listing, pretty)
        }
        PageType::Location => {
            let code = required_code(args)?;
            let brief = fetch_location_brief(client, code, &date_range(args))
                .await?
                .ok_or_else(|| AppError::missing_geography("location", code))?;
            if args.geojson {
                to_json(&brief.market_features, pretty)
            } else {
                to_json(&brief, pretty)
            }
        }
        PageType::Admin1 => {
            let code = required_code(args)?;
            let brief = fetch_admin1_brief(client, code)
                .await?
                .ok_or_else(|| AppError::missing_geography("admin1", code))?;
            if args.geojson {
                to_json(&brief.sections.market_features, pretty)
            } else {
                to_json(&brief, pretty)
            }
        }
        PageType::Admin2 => {
            let code = required_code(args)?;
            let brief = fetch_admin2_brief(client, code)
                .await?
                .ok_or_else(|| AppError::missing_geography("admin2", code))?;
            if args.geojson {
                to_json(&brief.sections.market_features, pretty)
            } else {
                to_json(&brief, pretty)
            }
        }
        PageType::Table => {
            let table = fetch_data_table(client, &table_query(args)?).await?;
            to_json(&table, pretty)
        }
    }
}

/// Builds the requested page with a client for `config` and prints it.
pub async fn handle_page_command(args: &Args, config: &Config) -> Result<(), AppError> {
    let client = HapiClient::new(config)?;
    info!("Building {:?} page", args.page_type);
    let output = render_page(&client, args).await?;
    println!("{output}");
    Ok(())
}
