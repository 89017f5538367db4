//! Single-row ingest record.

use chrono::{DateTime, NaiveDate, Utc};

use super::CountryIdentity;

/// One parsed feed row: counts for one country on one calendar day.
///
/// Transient; discarded after aggregation. Several observations may share
/// `(day, country)` when both feeds report the same day or the source
/// contains residual multi-row entries; the aggregator sums them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyObservation {
    /// Calendar day the counts apply to
    pub day: NaiveDate,

    /// Resolved country identity
    pub country: CountryIdentity,

    /// Row-level last-update instant, normalized to UTC
    pub last_update: DateTime<Utc>,

    /// Cumulative confirmed cases
    pub confirmed: u64,

    /// Cumulative deaths
    pub deaths: u64,

    /// Cumulative recoveries
    pub recovered: u64,
}
