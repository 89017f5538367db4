// src/pipeline/aggregate.rs

//! Observation aggregation.
//!
//! Groups observations by country and day, sums duplicates, and produces the
//! snapshot. Pure function of its input: the same observations always yield
//! an identical snapshot.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::{AppError, Result};
use crate::models::{
    CountryDaySeries, CountryIdentity, CountrySnapshot, DailyObservation, DayRecord,
};

/// Build a snapshot from the combined observation list of both feeds.
///
/// Summation absorbs both duplicate reporting between the feeds and residual
/// multi-row-per-day entries. An empty input is fatal for the refresh; the
/// caller must keep serving the previous snapshot.
pub fn aggregate(observations: &[DailyObservation]) -> Result<CountrySnapshot> {
    if observations.is_empty() {
        return Err(AppError::EmptyRefresh);
    }

    // Rollup across ALL observations, before per-country grouping.
    let global = build_series(CountryIdentity::global(), observations.iter());

    let mut groups: BTreeMap<&str, Vec<&DailyObservation>> = BTreeMap::new();
    for observation in observations {
        groups
            .entry(observation.country.id())
            .or_default()
            .push(observation);
    }

    let mut series: Vec<CountryDaySeries> = groups
        .into_values()
        .map(|group| {
            let identity = group[0].country.clone();
            build_series(identity, group.into_iter())
        })
        .collect();
    series.push(global);

    Ok(CountrySnapshot::new(series))
}

/// Sum one group of observations into a day-ordered series. Day keys come
/// from a BTreeMap, so the output is sorted regardless of input order.
fn build_series<'a>(
    identity: CountryIdentity,
    observations: impl Iterator<Item = &'a DailyObservation>,
) -> CountryDaySeries {
    let mut by_day: BTreeMap<NaiveDate, DayRecord> = BTreeMap::new();
    let mut last_update = None;

    for observation in observations {
        let record = by_day.entry(observation.day).or_insert(DayRecord {
            day: observation.day,
            confirmed: 0,
            deaths: 0,
            recovered: 0,
        });
        record.confirmed += observation.confirmed;
        record.deaths += observation.deaths;
        record.recovered += observation.recovered;

        if last_update.is_none_or(|seen| observation.last_update > seen) {
            last_update = Some(observation.last_update);
        }
    }

    CountryDaySeries {
        identity,
        last_update: last_update.unwrap_or_default(),
        days: by_day.into_values().collect(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use crate::models::GLOBAL_ID;

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 2, d).unwrap()
    }

    fn identity(alpha2: &str) -> CountryIdentity {
        CountryIdentity::registered(&rust_iso3166::from_alpha2(alpha2).unwrap())
    }

    fn observation(alpha2: &str, d: u32, confirmed: u64) -> DailyObservation {
        DailyObservation {
            day: day(d),
            country: identity(alpha2),
            last_update: DateTime::from_timestamp(1_580_000_000 + i64::from(d) * 86_400, 0)
                .unwrap(),
            confirmed,
            deaths: confirmed / 10,
            recovered: 0,
        }
    }

    #[test]
    fn test_duplicate_day_rows_are_summed() {
        // Two rows for ITA on the same day, as when both feeds report it.
        let snapshot =
            aggregate(&[observation("IT", 1, 10), observation("IT", 1, 20)]).unwrap();

        let italy = snapshot.get("ITA").unwrap();
        assert_eq!(italy.days.len(), 1);
        assert_eq!(italy.days[0].confirmed, 30);
        assert_eq!(italy.days[0].deaths, 3);
    }

    #[test]
    fn test_days_sorted_regardless_of_input_order() {
        let snapshot = aggregate(&[
            observation("IT", 3, 300),
            observation("IT", 1, 100),
            observation("IT", 2, 200),
        ])
        .unwrap();

        let days: Vec<NaiveDate> = snapshot
            .get("ITA")
            .unwrap()
            .days
            .iter()
            .map(|r| r.day)
            .collect();
        assert_eq!(days, vec![day(1), day(2), day(3)]);
    }

    #[test]
    fn test_no_duplicate_days_per_country() {
        let snapshot = aggregate(&[
            observation("IT", 1, 1),
            observation("IT", 1, 2),
            observation("IT", 2, 3),
        ])
        .unwrap();

        let days: Vec<NaiveDate> = snapshot
            .get("ITA")
            .unwrap()
            .days
            .iter()
            .map(|r| r.day)
            .collect();
        let mut deduped = days.clone();
        deduped.dedup();
        assert_eq!(days, deduped);
        assert!(days.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_series_last_update_is_group_maximum() {
        let snapshot = aggregate(&[observation("IT", 1, 1), observation("IT", 3, 2)]).unwrap();
        let italy = snapshot.get("ITA").unwrap();
        assert_eq!(
            italy.last_update,
            DateTime::<Utc>::from_timestamp(1_580_000_000 + 3 * 86_400, 0).unwrap()
        );
    }

    #[test]
    fn test_global_series_sums_all_countries() {
        let snapshot = aggregate(&[
            observation("IT", 1, 10),
            observation("ZA", 1, 5),
            observation("IT", 2, 20),
        ])
        .unwrap();

        let global = snapshot.global().unwrap();
        assert_eq!(global.id(), GLOBAL_ID);
        assert_eq!(global.days[0].confirmed, 15);
        assert_eq!(global.days[1].confirmed, 20);

        // Per day, GLOBAL equals the sum over all non-GLOBAL series.
        for record in &global.days {
            let expected: u64 = snapshot
                .iter()
                .filter(|s| s.id() != GLOBAL_ID)
                .flat_map(|s| &s.days)
                .filter(|r| r.day == record.day)
                .map(|r| r.confirmed)
                .sum();
            assert_eq!(record.confirmed, expected);
        }
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let observations = vec![
            observation("IT", 1, 10),
            observation("ZA", 2, 5),
            observation("IT", 1, 7),
        ];
        assert_eq!(
            aggregate(&observations).unwrap(),
            aggregate(&observations).unwrap()
        );
    }

    #[test]
    fn test_empty_input_is_fatal() {
        assert!(matches!(aggregate(&[]), Err(AppError::EmptyRefresh)));
    }

    #[test]
    fn test_feed_union_merges_same_day_by_summing() {
        // Historical rows for two days plus a current-feed row stamped onto
        // the second day must merge into one entry, not a duplicate day.
        use crate::services::{CountryResolver, parse_feed};

        let header = "Country_Region,Last_Update,Confirmed,Deaths,Recovered,iso3";
        let historical = format!(
            "{}\nItaly,2020-02-01 10:00:00,10,1,0,ITA\nItaly,2020-02-02 10:00:00,25,2,0,ITA\n",
            header
        );
        let current = format!("{}\nItaly,2020-02-02 18:00:00,30,3,1,ITA\n", header);

        let mut resolver = CountryResolver::new();
        let mut observations = parse_feed(&historical, &mut resolver, None, false).unwrap();
        observations
            .extend(parse_feed(&current, &mut resolver, Some(day(2)), false).unwrap());

        let snapshot = aggregate(&observations).unwrap();
        let italy = snapshot.get("ITA").unwrap();
        assert_eq!(italy.days.len(), 2);
        assert_eq!(italy.days[1].day, day(2));
        assert_eq!(italy.days[1].confirmed, 55);
        // Series last-update is the current feed's later stamp.
        assert_eq!(
            italy.last_update,
            DateTime::<Utc>::from_timestamp(1_580_666_400, 0).unwrap()
        );
    }
}
