// src/models/mod.rs

//! Domain models for the tracker application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod country;
mod observation;
mod series;
mod snapshot;

// Re-export all public types
pub use country::{CountryIdentity, GLOBAL_ID, GLOBAL_NAME};
pub use observation::DailyObservation;
pub use series::{CountryDaySeries, DayRecord, SinceCaseView};
pub use snapshot::CountrySnapshot;
