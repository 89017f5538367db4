// src/pipeline/refresh.rs

//! Refresh cycle orchestration.
//!
//! One refresh fetches both feeds, parses every row, aggregates, and installs
//! the new snapshot. The cycle is atomic: any failure leaves the previously
//! installed snapshot in place.

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::error::Result;
use crate::services::{CountryResolver, FeedFetcher, parse_feed};
use crate::store::CountryStore;
use crate::utils::log;

use super::aggregate;

/// Summary of one refresh cycle.
#[derive(Debug)]
pub struct RefreshStats {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub observation_count: usize,
    pub country_count: usize,
}

/// Run one refresh cycle against the store.
///
/// Single-flight: returns [`crate::error::AppError::RefreshInFlight`] without
/// touching anything if another refresh holds the gate. Both fetches complete
/// before parsing and aggregation begin.
pub async fn run_refresh(config: &Config, store: &CountryStore) -> Result<RefreshStats> {
    let _guard = store.begin_refresh()?;
    let start_time = Utc::now();

    log::header("Refreshing country time series");

    log::step(1, 3, "Fetch - downloading historical and current feeds");
    let fetcher = FeedFetcher::new(config)?;
    let (historical_text, current_text) = fetcher.fetch_both().await?;

    log::step(2, 3, "Parse - converting CSV rows to observations");
    let skip = config.resolver.skip_unresolvable;
    let mut resolver = CountryResolver::new();
    let mut observations = parse_feed(&historical_text, &mut resolver, None, skip)?;
    // The current feed carries only the latest snapshot; its rows are
    // stamped with today so they merge into today's day entry by summing.
    let today = Utc::now().date_naive();
    observations.extend(parse_feed(&current_text, &mut resolver, Some(today), skip)?);

    log::step(3, 3, "Aggregate - building per-country day series");
    let snapshot = aggregate(&observations)?;

    let stats = RefreshStats {
        start_time,
        end_time: Utc::now(),
        observation_count: observations.len(),
        country_count: snapshot.len(),
    };
    store.install(snapshot);

    log::summary(
        "Refresh complete",
        &[
            ("Observations", stats.observation_count.to_string()),
            ("Countries", stats.country_count.to_string()),
            (
                "Elapsed",
                format!("{} ms", (stats.end_time - stats.start_time).num_milliseconds()),
            ),
        ],
    );

    Ok(stats)
}
