// src/lib.rs

//! covidtrack Library
//!
//! Ingests the current and historical COVID-19 CSV feeds, resolves country
//! identity, aggregates observations into per-country day series, and holds
//! the result in an atomically swappable snapshot store.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod query;
pub mod services;
pub mod store;
pub mod utils;
