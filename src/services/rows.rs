// src/services/rows.rs

//! Feed row parsing.
//!
//! Converts raw CSV records into typed [`DailyObservation`]s: timestamp
//! normalization, blank-count defaulting, sub-national row exclusion, and
//! country identity resolution.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::DailyObservation;
use crate::utils::log;

use super::CountryResolver;

/// One raw CSV record, as both feeds emit it. Columns the pipeline ignores
/// (coordinates, incident rates, UID) are dropped by the reader.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Country_Region")]
    pub country_region: String,

    #[serde(rename = "Last_Update")]
    pub last_update: String,

    /// Blank in the source for some rows; blank means zero, not an error.
    #[serde(rename = "Confirmed", default)]
    pub confirmed: Option<u64>,

    #[serde(rename = "Deaths", default)]
    pub deaths: Option<u64>,

    #[serde(rename = "Recovered", default)]
    pub recovered: Option<u64>,

    /// Alpha-3 code column; `ISO3` in the current feed, `iso3` historical.
    #[serde(rename = "ISO3", alias = "iso3", default)]
    pub iso3: Option<String>,

    /// Sub-national markers. A non-empty value on any of these means the row
    /// is a state/county breakdown that would double-count the national row.
    #[serde(rename = "Province_State", default)]
    pub province_state: Option<String>,

    #[serde(rename = "Admin2", default)]
    pub admin2: Option<String>,

    #[serde(rename = "FIPS", default)]
    pub fips: Option<String>,
}

impl RawRow {
    fn is_sub_national(&self) -> bool {
        [&self.province_state, &self.admin2, &self.fips]
            .iter()
            .any(|field| field.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }
}

/// Parse a feed row's last-update value: ISO-8601 datetime (`T` or space
/// separated, optional fractional seconds, optional UTC offset, optional
/// time part) or `MM/DD/YY`. Everything is normalized to UTC; an
/// offset-free datetime is taken as already UTC. Anything else is a parse
/// failure.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt.and_utc());
        }
    }
    for format in ["%Y-%m-%d", "%m/%d/%y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc());
        }
    }

    Err(AppError::timestamp(value))
}

/// Convert one raw record into an observation.
///
/// Returns `Ok(None)` for excluded sub-national rows. `override_day` stamps
/// the row with an externally supplied day (the current feed carries only
/// one implicit day, and its own date can lag); without it the day comes
/// from the row's last-update.
pub fn parse_row(
    row: &RawRow,
    resolver: &mut CountryResolver,
    override_day: Option<NaiveDate>,
) -> Result<Option<DailyObservation>> {
    if row.is_sub_national() {
        return Ok(None);
    }

    let last_update = parse_timestamp(&row.last_update)?;
    let country = resolver.resolve_row(row.iso3.as_deref(), &row.country_region)?;

    Ok(Some(DailyObservation {
        day: override_day.unwrap_or_else(|| last_update.date_naive()),
        country,
        last_update,
        confirmed: row.confirmed.unwrap_or(0),
        deaths: row.deaths.unwrap_or(0),
        recovered: row.recovered.unwrap_or(0),
    }))
}

/// Run every data row of a CSV document through the parser.
///
/// An unresolvable country label fails the whole feed unless
/// `skip_unresolvable` is set, in which case the row is logged and dropped.
/// Any other row error always fails the feed.
pub fn parse_feed(
    csv_text: &str,
    resolver: &mut CountryResolver,
    override_day: Option<NaiveDate>,
    skip_unresolvable: bool,
) -> Result<Vec<DailyObservation>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(csv_text.as_bytes());

    let mut observations = Vec::new();
    for record in reader.deserialize::<RawRow>() {
        let row = record?;
        match parse_row(&row, resolver, override_day) {
            Ok(Some(observation)) => observations.push(observation),
            Ok(None) => {}
            Err(AppError::UnknownCountry { label }) if skip_unresolvable => {
                log::warn(&format!("Skipping row with unknown country '{}'", label));
            }
            Err(e) => return Err(e),
        }
    }
    Ok(observations)
}
