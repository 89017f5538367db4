//! Aggregated per-country day series and derived chart views.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::CountryIdentity;

/// Counts for one country on one day, summed across all contributing rows.
/// Immutable once aggregated; a refresh replaces whole series, never patches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayRecord {
    pub day: NaiveDate,
    pub confirmed: u64,
    pub deaths: u64,
    pub recovered: u64,
}

/// One country's complete day series, ordered ascending by day with exactly
/// one record per day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryDaySeries {
    /// Resolved identity (snapshot key is `identity.id()`)
    pub identity: CountryIdentity,

    /// Maximum last-update instant across all contributing observations
    pub last_update: DateTime<Utc>,

    /// Day records, ascending by day
    pub days: Vec<DayRecord>,
}

/// A series view aligned to the first day a count threshold was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SinceCaseView {
    /// Index into the confirmed>0 axes where the threshold was first met
    pub offset: usize,
    pub days: Vec<NaiveDate>,
    pub confirmed: Vec<u64>,
}

impl CountryDaySeries {
    /// Canonical identifier (alpha-3 or reserved pseudo-code).
    pub fn id(&self) -> &str {
        self.identity.id()
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.identity.name()
    }

    /// (days, counts) restricted to records with confirmed > 0.
    pub fn confirmed_axes(&self) -> (Vec<NaiveDate>, Vec<u64>) {
        Self::axes(&self.days, |d| d.confirmed)
    }

    /// (days, counts) restricted to records with deaths > 0.
    pub fn deaths_axes(&self) -> (Vec<NaiveDate>, Vec<u64>) {
        Self::axes(&self.days, |d| d.deaths)
    }

    /// Align the confirmed axes to the first day with confirmed >= `nth`.
    /// Returns `None` if the threshold was never reached.
    pub fn since_nth_case(&self, nth: u64) -> Option<SinceCaseView> {
        let (days, confirmed) = self.confirmed_axes();
        let offset = confirmed.iter().position(|&c| c >= nth)?;
        Some(SinceCaseView {
            offset,
            days: days[offset..].to_vec(),
            confirmed: confirmed[offset..].to_vec(),
        })
    }

    fn axes(days: &[DayRecord], count: impl Fn(&DayRecord) -> u64) -> (Vec<NaiveDate>, Vec<u64>) {
        days.iter()
            .filter(|d| count(d) > 0)
            .map(|d| (d.day, count(d)))
            .unzip()
    }
}
