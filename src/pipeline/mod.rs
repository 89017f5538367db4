//! Pipeline entry points for tracker operations.
//!
//! - `aggregate`: Fold parsed observations into a country snapshot
//! - `run_refresh`: Fetch, parse, aggregate, and install a new snapshot

pub mod aggregate;
pub mod refresh;

pub use aggregate::aggregate;
pub use refresh::{RefreshStats, run_refresh};
