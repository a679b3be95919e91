use std::path::PathBuf;

use chrono::{DateTime, Local, TimeZone};
use serde_json::Value;

use crate::cli::commands::Cli;
use crate::cli::output::{format_summary, report_to_json};
use crate::error::{ConfigError, ReportError};
use crate::io::github::{self, HttpTransport};
use crate::io::{config_io, report_io, token};
use crate::model::config::{FetchConfig, ReportConfig};
use crate::model::window::ReportWindow;
use crate::ops::classify::classify;
use crate::ops::window::{parse_date, resolve_window};
use crate::report::render_report;

/// Everything a run needs, after merging the command line over the config file
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub org: String,
    pub project_number: u32,
    pub window: ReportWindow,
    pub report_path: PathBuf,
    /// `None` when the dump is disabled or the input is already a dump
    pub dump_path: Option<PathBuf>,
    pub input: Option<PathBuf>,
    pub json: bool,
    pub fetch: FetchConfig,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(cli: Cli) -> Result<(), ReportError> {
    let cwd = std::env::current_dir().map_err(|e| ReportError::ReadError {
        path: PathBuf::from("."),
        source: e,
    })?;
    let config = config_io::load_config(cli.config.as_deref(), &cwd)?;
    let settings = resolve_settings(&cli, config, &Local, Local::now())?;
    generate(&settings)
}

/// Merge CLI flags over the config file. All validation of user input
/// happens here, before anything touches the network.
pub fn resolve_settings<Tz: TimeZone>(
    cli: &Cli,
    config: ReportConfig,
    tz: &Tz,
    now: DateTime<Tz>,
) -> Result<Settings, ConfigError> {
    let date = match cli.window.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => now.date_naive(),
    };

    let start = cli.window.start.as_deref().or(config.window.start.as_deref());
    let end = cli.window.end.as_deref().or(config.window.end.as_deref());
    let window = resolve_window(tz, date, start, end, now)?;

    let report_path = cli
        .output
        .output
        .clone()
        .unwrap_or_else(|| report_io::default_output_path(&config.output.report_prefix, date, "md"));

    let dump_enabled = cli.input.is_none() && !cli.output.no_dump_json && config.output.dump_json;
    let dump_path = dump_enabled.then(|| {
        cli.output
            .json_file
            .clone()
            .unwrap_or_else(|| report_io::default_output_path(&config.output.data_prefix, date, "json"))
    });

    Ok(Settings {
        org: cli.board.org.clone().unwrap_or(config.board.org),
        project_number: cli.board.project_number.unwrap_or(config.board.number),
        window,
        report_path,
        dump_path,
        input: cli.input.clone(),
        json: cli.json,
        fetch: config.fetch,
    })
}

/// Fetch (or load), classify, render, write.
pub fn generate(settings: &Settings) -> Result<(), ReportError> {
    let nodes = load_nodes(settings)?;

    let items = report_io::decode_items(&nodes);
    let impacted = classify(&items, &settings.window.utc());
    let markdown = render_report(
        &impacted,
        &settings.window,
        &settings.org,
        settings.project_number,
    );
    report_io::write_report(&settings.report_path, &markdown)?;

    if settings.json {
        let json = report_to_json(
            &impacted,
            &settings.window,
            &settings.org,
            settings.project_number,
            &settings.report_path,
        );
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("{}", format_summary(&settings.report_path, impacted.len()));
    }
    Ok(())
}

fn load_nodes(settings: &Settings) -> Result<Vec<Value>, ReportError> {
    if let Some(path) = &settings.input {
        tracing::info!("Reading raw items from {}", path.display());
        return report_io::read_raw_items(path);
    }

    let token = token::github_token()?;
    let transport = HttpTransport::new(token, &settings.fetch)?;
    let nodes = github::fetch_raw_items(
        &transport,
        &settings.org,
        settings.project_number,
        &settings.fetch,
    )?;

    if let Some(dump) = &settings.dump_path {
        report_io::dump_raw_items(dump, &nodes)?;
    }
    Ok(nodes)
}
