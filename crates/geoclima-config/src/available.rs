//! The available-dates service response.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

use geoclima_model::{AvailableDateBounds, DateFormat, days_before};

use crate::error::{ConfigError, Result};

/// First date assumed available when the service does not say otherwise.
pub fn default_first_available_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1991, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Bounds used before any fetch: data runs up to the day before `today`.
pub fn default_bounds(today: NaiveDate) -> AvailableDateBounds {
    AvailableDateBounds::new(default_first_available_date(), days_before(today, 1))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailableDatesResponse {
    #[serde(default)]
    pub data: Vec<AvailableDatesRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailableDatesRow {
    #[serde(default)]
    pub data_inizio: Option<String>,
    #[serde(default)]
    pub data_fine: Option<String>,
}

impl AvailableDatesResponse {
    /// Bounds of the first row; missing or unreadable dates fall back.
    pub fn bounds(&self, format: &DateFormat, fallback: AvailableDateBounds) -> AvailableDateBounds {
        let row = self.data.first();
        let parse = |value: Option<&String>| value.and_then(|value| format.parse_lenient(value));
        let first = parse(row.and_then(|row| row.data_inizio.as_ref())).unwrap_or(fallback.first);
        let last = parse(row.and_then(|row| row.data_fine.as_ref())).unwrap_or(fallback.last);
        if first > last {
            warn!(%first, %last, "service returned inverted dates, using defaults");
            return fallback;
        }
        AvailableDateBounds::new(first, last)
    }
}

pub fn parse_available_dates(
    text: &str,
    format: &DateFormat,
    fallback: AvailableDateBounds,
) -> Result<AvailableDateBounds> {
    let response: AvailableDatesResponse =
        serde_json::from_str(text).map_err(|source| ConfigError::Response { source })?;
    Ok(response.bounds(format, fallback))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reads_first_row() {
        let fallback = default_bounds(date(2024, 7, 1));
        let bounds = parse_available_dates(
            r#"{ "data": [ { "data_inizio": "2001-01-01", "data_fine": "2024-06-25" } ] }"#,
            &DateFormat::iso(),
            fallback,
        )
        .unwrap();
        assert_eq!(bounds, AvailableDateBounds::new(date(2001, 1, 1), date(2024, 6, 25)));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let fallback = default_bounds(date(2024, 7, 1));
        assert_eq!(fallback.first, date(1991, 1, 1));
        assert_eq!(fallback.last, date(2024, 6, 30));
        let bounds = parse_available_dates(
            r#"{ "data": [ { "data_fine": "not a date" } ] }"#,
            &DateFormat::iso(),
            fallback,
        )
        .unwrap();
        assert_eq!(bounds, fallback);
        assert_eq!(
            parse_available_dates("{}", &DateFormat::iso(), fallback).unwrap(),
            fallback
        );
    }

    #[test]
    fn instants_are_floored_to_their_day() {
        let fallback = default_bounds(date(2024, 7, 1));
        let bounds = parse_available_dates(
            r#"{ "data": [ { "data_inizio": "1991-01-01T00:00:00", "data_fine": "2024-06-25T23:30:00+02:00" } ] }"#,
            &DateFormat::iso(),
            fallback,
        )
        .unwrap();
        assert_eq!(bounds.last, date(2024, 6, 25));
    }

    #[test]
    fn malformed_response_is_an_error() {
        let fallback = default_bounds(date(2024, 7, 1));
        assert!(parse_available_dates("[", &DateFormat::iso(), fallback).is_err());
    }
}
