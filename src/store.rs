// src/store.rs

//! Process-wide snapshot holder.
//!
//! Readers clone an `Arc` to the current snapshot and never observe a
//! partially built one; a refresh installs its result with a single swap
//! under a short write lock. Refreshes themselves are single-flight.

use std::sync::{Arc, RwLock};

use tokio::sync::{Mutex, MutexGuard};

use crate::error::{AppError, Result};
use crate::models::CountrySnapshot;

/// Holds the current [`CountrySnapshot`] and the refresh gate.
#[derive(Debug, Default)]
pub struct CountryStore {
    snapshot: RwLock<Option<Arc<CountrySnapshot>>>,
    refresh_gate: Mutex<()>,
}

/// Held for the duration of one refresh cycle; dropping it releases the gate.
pub struct RefreshGuard<'a>(#[allow(dead_code)] MutexGuard<'a, ()>);

impl CountryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the refresh gate. Fails with [`AppError::RefreshInFlight`] when
    /// another refresh holds it; the in-flight refresh is never interrupted.
    pub fn begin_refresh(&self) -> Result<RefreshGuard<'_>> {
        self.refresh_gate
            .try_lock()
            .map(RefreshGuard)
            .map_err(|_| AppError::RefreshInFlight)
    }

    /// Replace the snapshot wholesale. Called only by the refresh pipeline,
    /// and only with a complete, non-empty snapshot.
    pub fn install(&self, snapshot: CountrySnapshot) {
        let mut slot = self.snapshot.write().expect("snapshot lock poisoned");
        *slot = Some(Arc::new(snapshot));
    }

    /// The current snapshot, or `None` before the first successful refresh.
    pub fn load(&self) -> Option<Arc<CountrySnapshot>> {
        self.snapshot.read().expect("snapshot lock poisoned").clone()
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use crate::models::{CountryDaySeries, CountryIdentity};

    use super::*;

    fn snapshot(confirmed: u64) -> CountrySnapshot {
        CountrySnapshot::new([CountryDaySeries {
            identity: CountryIdentity::global(),
            last_update: DateTime::from_timestamp(0, 0).unwrap(),
            days: vec![crate::models::DayRecord {
                day: chrono::NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
                confirmed,
                deaths: 0,
                recovered: 0,
            }],
        }])
    }

    #[test]
    fn test_empty_until_first_install() {
        let store = CountryStore::new();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_install_replaces_wholesale() {
        let store = CountryStore::new();
        store.install(snapshot(1));
        let first = store.load().unwrap();

        store.install(snapshot(2));
        let second = store.load().unwrap();

        // The reader holding the old Arc still sees a complete snapshot.
        assert_eq!(first.global().unwrap().days[0].confirmed, 1);
        assert_eq!(second.global().unwrap().days[0].confirmed, 2);
    }

    #[test]
    fn test_empty_aggregation_never_replaces_snapshot() {
        // An empty refresh fails before install is ever reached.
        let store = CountryStore::new();
        store.install(snapshot(1));

        assert!(crate::pipeline::aggregate(&[]).is_err());
        let current = store.load().unwrap();
        assert_eq!(current.global().unwrap().days[0].confirmed, 1);
    }

    #[tokio::test]
    async fn test_refresh_gate_is_single_flight() {
        let store = CountryStore::new();

        let guard = store.begin_refresh().unwrap();
        assert!(matches!(
            store.begin_refresh(),
            Err(AppError::RefreshInFlight)
        ));

        drop(guard);
        assert!(store.begin_refresh().is_ok());
    }
}
