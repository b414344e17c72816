use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, ValueEnum};

use hapi_brief::data_fetcher::briefs::LocationFilter;

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Page to assemble.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum PageType {
    /// List of locations (countries)
    #[default]
    Locations,
    /// Country brief for --code
    Location,
    /// Admin1 brief for --code
    Admin1,
    /// Admin2 brief for --code
    Admin2,
    /// Raw data table for --category/--subcategory
    Table,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    /// Locations with a Humanitarian Response Plan
    #[default]
    Hrp,
    /// Locations in the Global Humanitarian Overview
    Gho,
}

impl From<FilterArg> for LocationFilter {
    fn from(filter: FilterArg) -> Self {
        match filter {
            FilterArg::Hrp => LocationFilter::Hrp,
            FilterArg::Gho => LocationFilter::Gho,
        }
    }
}

/// Config-changing commands run instead of a brief.
pub fn is_config_update(args: &Args) -> bool {
    args.new_api_host.is_some()
        || args.new_app_identifier.is_some()
        || args.new_log_file_path.is_some()
        || args.clear_log_file_path
}

/// Humanitarian data briefs from HDX HAPI
///
/// Fetches every dataset a dashboard page shows for a country, admin1 or
/// admin2 unit, aggregates food prices by market and prints the result as
/// JSON on stdout.
///
/// Examples:
///   hapi_brief --type location --code AFG --pretty
///   hapi_brief --type admin2 --code AF0101 --geojson
///   hapi_brief --type table --category food --subcategory food-price --admin1-code AF01
#[derive(Parser, Debug)]
#[command(about, version, long_about)]
#[command(styles = get_styles())]
pub struct Args {
    /// Page to build.
    #[arg(long = "type", short = 't', value_enum, default_value_t = PageType::Locations)]
    pub page_type: PageType,

    /// P-code of the location, admin1 or admin2 unit.
    #[arg(long, short = 'c')]
    pub code: Option<String>,

    /// Which locations to list.
    #[arg(long, value_enum, default_value_t = FilterArg::Hrp)]
    pub filter: FilterArg,

    /// Only include observations from this date on (YYYY-MM-DD).
    #[arg(long = "start-date", help_heading = "Dates")]
    pub start_date: Option<String>,

    /// Only include observations up to this date (YYYY-MM-DD).
    #[arg(long = "end-date", help_heading = "Dates")]
    pub end_date: Option<String>,

    #[arg(long, help_heading = "Table")]
    pub category: Option<String>,

    #[arg(long, help_heading = "Table")]
    pub subcategory: Option<String>,

    #[arg(long = "location-code", help_heading = "Table")]
    pub location_code: Option<String>,

    #[arg(long = "admin1-code", help_heading = "Table")]
    pub admin1_code: Option<String>,

    #[arg(long = "admin2-code", help_heading = "Table")]
    pub admin2_code: Option<String>,

    /// Provider-supplied admin1 name; replaces --admin1-code in the query.
    #[arg(long = "provider-admin1-name", help_heading = "Table")]
    pub provider_admin1_name: Option<String>,

    /// Provider-supplied admin2 name; replaces --admin2-code in the query.
    #[arg(long = "provider-admin2-name", help_heading = "Table")]
    pub provider_admin2_name: Option<String>,

    #[arg(long = "sector-code", help_heading = "Table")]
    pub sector_code: Option<String>,

    #[arg(long = "admin-level", help_heading = "Table", value_parser = clap::value_parser!(u8).range(0..=2))]
    pub admin_level: Option<u8>,

    /// Print only the market GeoJSON feature collection (location, admin1, admin2).
    #[arg(long, help_heading = "Output")]
    pub geojson: bool,

    /// Pretty-print the JSON output.
    #[arg(long, short = 'p', help_heading = "Output")]
    pub pretty: bool,

    /// Update the API host in config.
    #[arg(long = "set-api-host", help_heading = "Configuration", value_name = "URL")]
    pub new_api_host: Option<String>,

    /// Update the application identifier in config.
    #[arg(
        long = "set-app-identifier",
        help_heading = "Configuration",
        value_name = "IDENTIFIER"
    )]
    pub new_app_identifier: Option<String>,

    /// Update log file path in config. This sets a persistent custom log file location.
    #[arg(long = "set-log-file", help_heading = "Configuration")]
    pub new_log_file_path: Option<String>,

    /// Clear the custom log file path from config. This reverts to using the default log location.
    #[arg(long = "clear-log-file", help_heading = "Configuration")]
    pub clear_log_file_path: bool,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Also write logs to stderr.
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}
