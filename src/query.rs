// src/query.rs

//! Client parameter validation.
//!
//! Shared by whatever front end drives the pipeline (CLI here, HTTP handlers
//! elsewhere). All failures are request-granularity [`AppError::InvalidQuery`]
//! errors naming the bad value and the accepted set.

use crate::error::{AppError, Result};

const SERIES_HELP: &str = "Valid series are none, one or both of 'confirmed' or 'deaths'.\n\
                           If left empty, 'confirmed' will be used.";

/// Which count sequence to plot or serialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    Confirmed,
    Deaths,
}

impl Series {
    /// Parse a comma-separated series selector. Empty input defaults to
    /// confirmed; at most two entries are accepted.
    pub fn parse_list(raw: &str) -> Result<Vec<Series>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(vec![Series::Confirmed]);
        }

        let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
        if parts.len() > 2 {
            return Err(AppError::invalid_query(format!(
                "Series has an invalid length. Max valid length is 2.\n\n{}",
                SERIES_HELP
            )));
        }

        parts
            .into_iter()
            .map(|part| match part {
                "confirmed" => Ok(Series::Confirmed),
                "deaths" => Ok(Series::Deaths),
                other => Err(AppError::invalid_query(format!(
                    "'{}' is not a valid series.\n\n{}",
                    other, SERIES_HELP
                ))),
            })
            .collect()
    }

    /// Human label used in chart titles.
    pub fn display_name(&self) -> &'static str {
        match self {
            Series::Confirmed => "Confirmed Cases",
            Series::Deaths => "Deaths",
        }
    }
}

/// Axis scale selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scale {
    #[default]
    Linear,
    Log,
}

impl Scale {
    /// Parse a scale value. `None` or empty defaults to linear.
    pub fn parse(raw: Option<&str>) -> Result<Scale> {
        match raw.map(str::trim) {
            None | Some("") | Some("linear") => Ok(Scale::Linear),
            Some("log") => Ok(Scale::Log),
            Some(other) => Err(AppError::invalid_query(format!(
                "'{}' is not a valid scale value.\n\n\
                 Valid values are 'linear' or 'log'.\n\
                 If left empty, 'linear' will be used.",
                other
            ))),
        }
    }
}

/// Parse the "since Nth case" threshold. `None` means no alignment (0).
pub fn parse_since(raw: Option<&str>) -> Result<u64> {
    match raw.map(str::trim) {
        None | Some("") => Ok(0),
        Some(value) => value.parse().map_err(|_| {
            AppError::invalid_query(format!("Since case value '{}' is not numeric.", value))
        }),
    }
}

/// Chart/response title for the selected series.
pub fn title(series: &[Series]) -> String {
    series
        .iter()
        .map(Series::display_name)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_default_and_parse() {
        assert_eq!(Series::parse_list("").unwrap(), vec![Series::Confirmed]);
        assert_eq!(
            Series::parse_list("deaths,confirmed").unwrap(),
            vec![Series::Deaths, Series::Confirmed]
        );
    }

    #[test]
    fn test_series_rejects_unknown_and_overlong() {
        let err = Series::parse_list("cases").unwrap_err().to_string();
        assert!(err.contains("'cases'"));
        assert!(Series::parse_list("confirmed,deaths,confirmed").is_err());
    }

    #[test]
    fn test_scale_parse() {
        assert_eq!(Scale::parse(None).unwrap(), Scale::Linear);
        assert_eq!(Scale::parse(Some("log")).unwrap(), Scale::Log);
        assert!(Scale::parse(Some("cubic")).is_err());
    }

    #[test]
    fn test_since_must_be_numeric() {
        assert_eq!(parse_since(None).unwrap(), 0);
        assert_eq!(parse_since(Some("100")).unwrap(), 100);
        assert!(parse_since(Some("ten")).is_err());
    }

    #[test]
    fn test_title_joins_display_names() {
        assert_eq!(
            title(&[Series::Confirmed, Series::Deaths]),
            "Confirmed Cases, Deaths"
        );
    }
}
