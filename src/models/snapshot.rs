//! Complete aggregated dataset for one refresh cycle.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::services::CountryResolver;

use super::{CountryDaySeries, GLOBAL_ID};

/// Immutable mapping from canonical identifier to day series, plus the
/// synthetic `GLOBAL` rollup entry. Built fresh on every refresh and
/// installed wholesale; never patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountrySnapshot {
    countries: BTreeMap<String, CountryDaySeries>,
}

impl CountrySnapshot {
    /// Assemble a snapshot from aggregated series, keyed by canonical id.
    pub fn new(series: impl IntoIterator<Item = CountryDaySeries>) -> Self {
        Self {
            countries: series
                .into_iter()
                .map(|s| (s.id().to_string(), s))
                .collect(),
        }
    }

    /// Look up one series by canonical identifier.
    pub fn get(&self, id: &str) -> Option<&CountryDaySeries> {
        self.countries.get(id)
    }

    /// The synthetic rollup series across all countries.
    pub fn global(&self) -> Option<&CountryDaySeries> {
        self.countries.get(GLOBAL_ID)
    }

    /// Iterate all series in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &CountryDaySeries> {
        self.countries.values()
    }

    /// Number of series in the snapshot, including the rollup entry.
    pub fn len(&self) -> usize {
        self.countries.len()
    }

    /// Resolve a list of user-supplied labels (names, alpha-2/alpha-3 codes,
    /// reserved special names, or "global") and return the matching series in
    /// request order.
    ///
    /// All-or-nothing: one bad label fails the whole request naming that
    /// label, so the caller can report a single actionable error. An empty
    /// list defaults to the rollup series.
    pub fn filter_labels(
        &self,
        labels: &[String],
        resolver: &mut CountryResolver,
    ) -> Result<Vec<&CountryDaySeries>> {
        if labels.is_empty() {
            return Ok(vec![self.global().ok_or_else(|| {
                AppError::invalid_query("snapshot has no global series")
            })?]);
        }

        let mut selected = Vec::with_capacity(labels.len());
        for label in labels {
            let label = label.trim();
            let id = if label.eq_ignore_ascii_case(GLOBAL_ID) {
                GLOBAL_ID.to_string()
            } else {
                resolver
                    .resolve(label)
                    .map_err(|_| Self::bad_label(label))?
                    .id()
                    .to_string()
            };
            selected.push(self.get(&id).ok_or_else(|| Self::bad_label(label))?);
        }
        Ok(selected)
    }

    fn bad_label(label: &str) -> AppError {
        AppError::invalid_query(format!(
            "'{}' is not a known country.\n\
             Use a country name, an alpha-2 or alpha-3 code, a special entity \
             name ('Diamond Princess', 'MS Zaandam', 'Kosovo'), or 'global'.\n\
             An empty list defaults to 'global'.",
            label
        ))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate};

    use crate::models::CountryIdentity;

    use super::super::DayRecord;
    use super::*;

    fn series(identity: CountryIdentity, confirmed: u64) -> CountryDaySeries {
        CountryDaySeries {
            identity,
            last_update: DateTime::from_timestamp(1_583_020_800, 0).unwrap(),
            days: vec![DayRecord {
                day: NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
                confirmed,
                deaths: 0,
                recovered: 0,
            }],
        }
    }

    fn registered(alpha2: &str) -> CountryIdentity {
        CountryIdentity::registered(&rust_iso3166::from_alpha2(alpha2).unwrap())
    }

    fn sample_snapshot() -> CountrySnapshot {
        CountrySnapshot::new([
            series(registered("US"), 100),
            series(registered("ZA"), 50),
            series(CountryIdentity::global(), 150),
        ])
    }

    #[test]
    fn test_filter_preserves_request_order() {
        let snapshot = sample_snapshot();
        let mut resolver = CountryResolver::new();

        let labels = vec!["US".to_string(), "ZA".to_string()];
        let selected = snapshot.filter_labels(&labels, &mut resolver).unwrap();
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].id(), "USA");
        assert_eq!(selected[1].id(), "ZAF");
    }

    #[test]
    fn test_filter_fails_whole_request_naming_bad_label() {
        let snapshot = sample_snapshot();
        let mut resolver = CountryResolver::new();

        let labels = vec!["US".to_string(), "Atlantis".to_string()];
        let err = snapshot
            .filter_labels(&labels, &mut resolver)
            .unwrap_err()
            .to_string();
        assert!(err.contains("Atlantis"));
    }

    #[test]
    fn test_filter_fails_on_country_missing_from_snapshot() {
        // Resolvable label, but no data for it in this snapshot.
        let snapshot = sample_snapshot();
        let mut resolver = CountryResolver::new();

        let labels = vec!["Italy".to_string()];
        assert!(snapshot.filter_labels(&labels, &mut resolver).is_err());
    }

    #[test]
    fn test_empty_label_list_defaults_to_global() {
        let snapshot = sample_snapshot();
        let mut resolver = CountryResolver::new();

        let selected = snapshot.filter_labels(&[], &mut resolver).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id(), GLOBAL_ID);
    }

    #[test]
    fn test_global_label_case_insensitive() {
        let snapshot = sample_snapshot();
        let mut resolver = CountryResolver::new();

        let labels = vec!["global".to_string()];
        let selected = snapshot.filter_labels(&labels, &mut resolver).unwrap();
        assert_eq!(selected[0].id(), GLOBAL_ID);
    }
}
