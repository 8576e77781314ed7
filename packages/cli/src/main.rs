#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front-end for the real-estate dashboard.
//!
//! ```text
//! realty_dash [--config FILE] [--data PATH | --url URL] [--format table|json] <view>
//! realty_dash competitive --room studio --room 1-room
//! realty_dash dynamics --project "ЖК Берег" --period quarter --unit rub
//! realty_dash express --parameter lot_price
//! realty_dash projects
//! ```
//!
//! Running `realty_dash` with no subcommand asks which view to render.
//!
//! Uses `indicatif-log-bridge` (via [`realty_dash_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and the load spinner never fight for the terminal.

mod projects;

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use realty_dash_analytics_models::{Parameter, Period, ProjectFilter, RoomFilter, Unit};
use realty_dash_cli_utils::{MultiProgress, Spinner};
use realty_dash_loader::{DashboardConfig, SnapshotStore};
use realty_dash_market_models::RootData;
use realty_dash_report::{DashboardState, View, render_view};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Aligned text tables
    Table,
    /// Pretty-printed JSON
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "realty_dash",
    about = "Render real-estate dashboard reports from a JSON snapshot"
)]
struct Cli {
    /// TOML config file (defaults to the built-in config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Snapshot file to read
    #[arg(long, global = true, conflicts_with = "url")]
    data: Option<PathBuf>,

    /// Snapshot URL to fetch
    #[arg(long, global = true)]
    url: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Restrict to a project (repeatable); the first one is also the
    /// project of single-project views
    #[arg(long = "project", global = true)]
    projects: Vec<String>,

    /// Restrict to an apartment type, e.g. `studio` or `2-room` (repeatable)
    #[arg(long = "room", global = true)]
    rooms: Vec<String>,

    /// Period of the dynamics view: week, month, quarter or half_year
    #[arg(long, global = true, default_value = "month", value_parser = parse_enum::<Period>)]
    period: Period,

    /// Unit of the changes in the dynamics and express views: rub or pct
    #[arg(long, global = true, default_value = "pct", value_parser = parse_enum::<Unit>)]
    unit: Unit,

    /// Parameter of the express view: sqm_price, lot_price, area or payment
    #[arg(long, global = true, default_value = "sqm_price", value_parser = parse_enum::<Parameter>)]
    parameter: Parameter,

    /// Promotion type shown by the marketing view
    #[arg(long, global = true)]
    kind: Option<String>,

    /// Show project groups collapsed to their header rows
    #[arg(long, global = true)]
    collapse: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum Commands {
    /// Summary of one project and lot totals
    Summary,
    /// Price, area and payment ranges
    Market,
    /// One parameter across projects: today, last week, two weeks and month
    Express,
    /// Deviation of every project from the market average
    Competitive,
    /// Down payment, monthly payment and payment trend
    Mortgage,
    /// Price forecasts
    Forecast,
    /// Marketing programs
    Marketing,
    /// Price changes of one project over a period
    Dynamics,
    /// Lots per floor of one project
    Floors,
    /// List the projects of the snapshot
    Projects,
}

impl Commands {
    const ALL: &[Self] = &[
        Self::Summary,
        Self::Market,
        Self::Express,
        Self::Competitive,
        Self::Mortgage,
        Self::Forecast,
        Self::Marketing,
        Self::Dynamics,
        Self::Floors,
        Self::Projects,
    ];

    const fn view(self) -> Option<View> {
        Some(match self {
            Self::Summary => View::Summary,
            Self::Market => View::Market,
            Self::Express => View::Express,
            Self::Competitive => View::Competitive,
            Self::Mortgage => View::Mortgage,
            Self::Forecast => View::Forecast,
            Self::Marketing => View::Marketing,
            Self::Dynamics => View::Dynamics,
            Self::Floors => View::Floors,
            Self::Projects => return None,
        })
    }

    const fn label(self) -> &'static str {
        match self.view() {
            Some(view) => view.title(),
            None => "Список ЖК",
        }
    }
}

/// Parses an enum flag through its `FromStr` implementation.
fn parse_enum<T>(value: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse::<T>().map_err(|e| format!("{value}: {e}"))
}

/// Resolves the config and applies the source flags on top.
fn resolve_config(cli: &Cli) -> Result<DashboardConfig, Box<dyn std::error::Error>> {
    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if let Some(path) = &cli.data {
        config.data.path = Some(path.clone());
        config.data.url = None;
    }
    if let Some(url) = &cli.url {
        config.data.url = Some(url.clone());
    }
    Ok(config)
}

async fn load_snapshot(
    multi: &MultiProgress,
    config: &DashboardConfig,
) -> Result<Arc<RootData>, Box<dyn std::error::Error>> {
    let source = config.source()?;
    let mut store = SnapshotStore::new();
    let ticket = store.begin_load();

    let spinner = Spinner::new(multi, &format!("Loading snapshot from {source}"));
    let result = realty_dash_loader::load(&source).await;
    spinner.finish_and_clear();

    store.complete(ticket, result);
    store
        .data()
        .ok_or_else(|| store.error().unwrap_or("snapshot not loaded").into())
}

/// Builds the dashboard state from the filter flags.
fn dashboard_state(
    cli: &Cli,
    config: &DashboardConfig,
    data: &RootData,
) -> Result<DashboardState, Box<dyn std::error::Error>> {
    let mut state = DashboardState::new(data);
    state.settings.default_down_payment_percent = config.mortgage.default_down_payment_percent;
    state.period = cli.period;
    state.unit = cli.unit;
    state.parameter = cli.parameter;
    state.promotion_kind.clone_from(&cli.kind);

    if let Some(first) = cli.projects.first() {
        state.select_project(data, first)?;
        state.projects = ProjectFilter::only(cli.projects.iter().map(String::as_str));
    }
    if !cli.rooms.is_empty() {
        state.rooms = RoomFilter::only(cli.rooms.iter().map(String::as_str));
    }
    if !cli.collapse {
        state.expanded.expand_all(data.project_names());
    }

    Ok(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = realty_dash_cli_utils::init_logger();
    let cli = Cli::parse();

    let command = match cli.command {
        Some(command) => command,
        None => {
            let labels: Vec<&str> = Commands::ALL.iter().map(|c| c.label()).collect();
            let idx = realty_dash_cli_utils::select("Какой отчёт показать?", &labels)?;
            Commands::ALL[idx]
        }
    };

    let config = resolve_config(&cli)?;
    let data = load_snapshot(&multi, &config).await?;
    let state = dashboard_state(&cli, &config, &data)?;

    let Some(view) = command.view() else {
        let totals = projects::totals(&data, &state.projects);
        match cli.format {
            OutputFormat::Table => print!("{}", projects::render(&data, &totals)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&totals)?),
        }
        return Ok(());
    };

    log::debug!("rendering {view} with {state:?}");
    let report = render_view(view, &data, &state)?;
    match cli.format {
        OutputFormat::Table => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_filters_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "realty_dash",
            "dynamics",
            "--project",
            "Берег",
            "--room",
            "studio",
            "--room",
            "2-room",
            "--period",
            "half_year",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.command, Some(Commands::Dynamics));
        assert_eq!(cli.projects, ["Берег"]);
        assert_eq!(cli.rooms, ["studio", "2-room"]);
        assert_eq!(cli.period, Period::HalfYear);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(!cli.collapse);
        assert_eq!(cli.unit, Unit::Pct);
        assert_eq!(cli.parameter, Parameter::SqmPrice);
    }

    #[test]
    fn enum_flags_parse_and_reject_unknown_values() {
        let cli = Cli::try_parse_from([
            "realty_dash",
            "express",
            "--unit",
            "rub",
            "--parameter",
            "lot_price",
            "--period",
            "week",
        ])
        .unwrap();
        assert_eq!(cli.command, Some(Commands::Express));
        assert_eq!(cli.unit, Unit::Rub);
        assert_eq!(cli.parameter, Parameter::LotPrice);
        assert_eq!(cli.period, Period::Week);

        assert!(Cli::try_parse_from(["realty_dash", "dynamics", "--period", "year"]).is_err());
        assert!(Cli::try_parse_from(["realty_dash", "dynamics", "--unit", "usd"]).is_err());
        assert!(parse_enum::<Period>("fortnight").is_err());
    }

    #[test]
    fn data_and_url_conflict() {
        assert!(
            Cli::try_parse_from(["realty_dash", "--data", "a.json", "--url", "http://x", "market"])
                .is_err()
        );
    }

    #[test]
    fn every_view_has_a_command() {
        let views: Vec<View> = Commands::ALL.iter().filter_map(|c| c.view()).collect();
        assert_eq!(views, View::all());
        assert_eq!(Commands::Projects.label(), "Список ЖК");
    }

    #[test]
    fn flags_shape_the_state() {
        let data: RootData = serde_json::from_str(
            r#"[{ "jk_name": "A", "apartments_by_type": {} },
                { "jk_name": "B", "apartments_by_type": {} }]"#,
        )
        .unwrap();
        let config = DashboardConfig::default();

        let cli = Cli::try_parse_from(["realty_dash", "floors", "--project", "B", "--unit", "rub"])
            .unwrap();
        let state = dashboard_state(&cli, &config, &data).unwrap();
        assert_eq!(state.unit, Unit::Rub);
        assert_eq!(state.selected_project.as_deref(), Some("B"));
        assert!(state.projects.matches("B"));
        assert!(!state.projects.matches("A"));
        assert!(state.expanded.is_expanded("A"));

        let cli = Cli::try_parse_from(["realty_dash", "floors", "--project", "C"]).unwrap();
        assert!(dashboard_state(&cli, &config, &data).is_err());
    }
}
