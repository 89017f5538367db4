//! Service layer for the tracker application.
//!
//! This module contains the business logic for:
//! - Country identity resolution (`CountryResolver`)
//! - Feed row parsing (`RawRow`, `parse_feed`)
//! - Feed retrieval (`FeedFetcher`)

mod feeds;
mod resolver;
mod rows;

pub use feeds::FeedFetcher;
pub use resolver::CountryResolver;
pub use rows::{RawRow, parse_feed, parse_row, parse_timestamp};
