// src/error.rs

//! Unified error handling for the tracker application.

use thiserror::Error;

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// CSV decoding failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Last-update timestamp in a feed row was not ISO-8601 or MM/DD/YY
    #[error("Unparseable timestamp '{value}'")]
    Timestamp { value: String },

    /// A feed row's country label could not be resolved to a registry entry
    #[error("Unknown country label '{label}'")]
    UnknownCountry { label: String },

    /// Both feeds yielded zero observations; the previous snapshot is kept
    #[error("Refresh produced no observations; keeping previous snapshot")]
    EmptyRefresh,

    /// A refresh was triggered while another one was still running
    #[error("A refresh is already in flight")]
    RefreshInFlight,

    /// Client-facing invalid request parameter or label
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a timestamp parse error.
    pub fn timestamp(value: impl Into<String>) -> Self {
        Self::Timestamp {
            value: value.into(),
        }
    }

    /// Create an unknown-country data-quality error.
    pub fn unknown_country(label: impl Into<String>) -> Self {
        Self::UnknownCountry {
            label: label.into(),
        }
    }

    /// Create a client-facing invalid-query error.
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery(message.into())
    }
}
