// src/main.rs

//! covidtrack: COVID-19 country time-series CLI
//!
//! Drives the ingestion pipeline locally: one-shot refreshes, periodic
//! refreshes, and JSON inspection of the aggregated per-country series.

mod config;
mod error;
mod models;
mod pipeline;
mod query;
mod services;
mod store;
mod utils;

use std::fs;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::json;

use crate::config::Config;
use crate::error::Result;
use crate::models::CountrySnapshot;
use crate::pipeline::run_refresh;
use crate::query::{Scale, Series};
use crate::services::CountryResolver;
use crate::store::CountryStore;
use crate::utils::log;

#[derive(Parser, Debug)]
#[command(
    name = "covidtrack",
    version,
    about = "COVID-19 country time-series tracker"
)]

/// CLI Arguments
struct Cli {
    #[arg(short, long, default_value = "data/config.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

/// CLI Commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch both feeds once and build a fresh snapshot
    Refresh {
        /// Write the full snapshot as JSON to this file
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Refresh, then print selected countries' series as JSON
    Show {
        /// Comma-separated country labels (names, alpha-2/alpha-3, 'global')
        #[arg(long, default_value = "global")]
        countries: String,

        /// Comma-separated series: 'confirmed' and/or 'deaths'
        #[arg(long, default_value = "confirmed")]
        series: String,

        /// Align series to the first day with at least this many cases
        #[arg(long)]
        since: Option<String>,

        /// Axis scale hint for renderers: 'linear' or 'log'
        #[arg(long)]
        scale: Option<String>,
    },
    /// Refresh periodically (scheduler deployments)
    Watch {
        #[arg(long, default_value_t = 3600)]
        interval_secs: u64,
    },
    /// Validate configuration
    Validate,
}

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = Config::load_or_default(&cli.config);
    log::init(&config.logging.level);

    match cli.command {
        Command::Refresh { output } => {
            let store = CountryStore::new();
            run_refresh(&config, &store).await?;
            if let (Some(path), Some(snapshot)) = (output, store.load()) {
                fs::write(&path, serde_json::to_string_pretty(snapshot.as_ref())?)?;
                log::success(&format!("Snapshot written to {}", path));
            }
        }
        Command::Show {
            countries,
            series,
            since,
            scale,
        } => {
            let series = Series::parse_list(&series)?;
            let scale = Scale::parse(scale.as_deref())?;
            let since = query::parse_since(since.as_deref())?;
            let labels: Vec<String> = countries
                .split(',')
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect();

            let store = CountryStore::new();
            run_refresh(&config, &store).await?;
            let snapshot = store
                .load()
                .ok_or_else(|| error::AppError::config("no snapshot after refresh"))?;

            let body = render_selection(&snapshot, &labels, &series, since, scale)?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Command::Watch { interval_secs } => {
            let store = CountryStore::new();
            let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
            loop {
                ticker.tick().await;
                // Failures keep the previous snapshot; stale data keeps
                // serving until the next tick succeeds.
                if let Err(e) = run_refresh(&config, &store).await {
                    log::error(&format!("Refresh failed: {}", e));
                }
            }
        }
        Command::Validate => {
            config.validate()?;
            log::success("Configuration is valid");
        }
    }

    Ok(())
}

/// Serialize the requested countries and series into a JSON document.
fn render_selection(
    snapshot: &CountrySnapshot,
    labels: &[String],
    series: &[Series],
    since: u64,
    scale: Scale,
) -> Result<serde_json::Value> {
    let mut resolver = CountryResolver::new();
    let selected = snapshot.filter_labels(labels, &mut resolver)?;
    let multi_series = series.len() > 1;

    let mut entries = Vec::new();
    for country in &selected {
        for s in series {
            let label = if multi_series {
                format!("{} ({})", country.name(), s.display_name())
            } else {
                country.name().to_string()
            };

            let axes = match s {
                Series::Confirmed if since > 0 => match country.since_nth_case(since) {
                    Some(view) => json!({
                        "offset": view.offset,
                        "days": view.days,
                        "counts": view.confirmed,
                    }),
                    None => json!(null),
                },
                Series::Confirmed => {
                    let (days, counts) = country.confirmed_axes();
                    json!({ "days": days, "counts": counts })
                }
                Series::Deaths => {
                    let (days, counts) = country.deaths_axes();
                    json!({ "days": days, "counts": counts })
                }
            };

            entries.push(json!({
                "country": {
                    "id": country.id(),
                    "name": country.name(),
                    "last_update": country.last_update,
                },
                "label": label,
                "axes": axes,
            }));
        }
    }

    Ok(json!({
        "title": query::title(series),
        "scale": match scale { Scale::Linear => "linear", Scale::Log => "log" },
        "since": since,
        "countries": entries,
    }))
}
