//! Calendar dates, ranges, bounds and moment-style date patterns.
//!
//! All arithmetic happens on calendar days (`NaiveDate`). Instants coming
//! from the outside are floored to the calendar day of the consumer's
//! offset before they enter a range, so half-day and timezone-boundary
//! values never shift a whole-day span.

use std::fmt;

use chrono::{DateTime, Days, Months, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Pattern used when no date format is configured.
pub const ISO_DATE_PATTERN: &str = "YYYY-MM-DD";

/// A (possibly unvalidated) pair of calendar dates.
///
/// `from <= to` only holds once the range has passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// A range ending at `to` and starting `days` calendar days earlier.
    pub fn ending_at(to: NaiveDate, days: u32) -> Self {
        Self {
            from: days_before(to, days),
            to,
        }
    }

    /// Whole calendar days between the endpoints; negative when inverted.
    pub fn span_days(&self) -> i64 {
        whole_days(self.from, self.to)
    }

    pub fn is_ordered(&self) -> bool {
        self.from <= self.to
    }
}

/// First and last calendar dates the backend can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AvailableDateBounds {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl AvailableDateBounds {
    pub fn new(first: NaiveDate, last: NaiveDate) -> Self {
        Self { first, last }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }

    pub fn contains_range(&self, range: &DateRange) -> bool {
        range.from >= self.first && range.to <= self.last
    }
}

/// Whole calendar days from `from` to `to`.
pub fn whole_days(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// `date` minus `days` calendar days, clamped at the earliest representable date.
pub fn days_before(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

/// `date` minus one calendar month (end-of-month clamped, as calendars do).
pub fn month_before(date: NaiveDate) -> NaiveDate {
    date.checked_sub_months(Months::new(1)).unwrap_or(date)
}

/// The calendar day `instant` falls on in `zone`.
pub fn calendar_day_in<Tz: TimeZone, Z: TimeZone>(instant: &DateTime<Tz>, zone: &Z) -> NaiveDate {
    instant.with_timezone(zone).date_naive()
}

/// A moment-style date pattern (`YYYY-MM-DD`, `DD/MM/YYYY`, ...) together
/// with its chrono translation.
///
/// Supported tokens: `YYYY`, `YY`, `MM`, `M`, `DD`, `D`. Text inside `[...]`
/// and any non-letter character is copied literally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateFormat {
    pattern: String,
    chrono_pattern: String,
}

impl DateFormat {
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        let chrono_pattern = translate_pattern(&pattern)?;
        Ok(Self {
            pattern,
            chrono_pattern,
        })
    }

    pub fn iso() -> Self {
        Self {
            pattern: ISO_DATE_PATTERN.to_string(),
            chrono_pattern: "%Y-%m-%d".to_string(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn format(&self, date: NaiveDate) -> String {
        date.format(&self.chrono_pattern).to_string()
    }

    pub fn parse(&self, value: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(value.trim(), &self.chrono_pattern).map_err(|_| {
            ModelError::DateParse {
                value: value.to_string(),
                pattern: self.pattern.clone(),
            }
        })
    }

    /// Parse a value that is either in this pattern or an RFC 3339 instant.
    ///
    /// Instants are floored to the calendar day of their own offset, which is
    /// the offset of the consumer that produced them.
    pub fn parse_lenient(&self, value: &str) -> Option<NaiveDate> {
        if let Ok(date) = self.parse(value) {
            return Some(date);
        }
        let trimmed = value.trim();
        if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
            return Some(instant.date_naive());
        }
        // Date-only prefix of an ISO instant without offset ("2024-06-25T00:00:00").
        trimmed
            .get(..10)
            .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
            .filter(|_| trimmed.len() == 10 || trimmed.as_bytes().get(10) == Some(&b'T'))
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self::iso()
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

impl TryFrom<String> for DateFormat {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<DateFormat> for String {
    fn from(value: DateFormat) -> Self {
        value.pattern
    }
}

fn translate_pattern(pattern: &str) -> Result<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 4);
    let (mut has_year, mut has_month, mut has_day) = (false, false, false);
    let mut idx = 0;
    while idx < chars.len() {
        let ch = chars[idx];
        if ch == '[' {
            let close = chars[idx + 1..]
                .iter()
                .position(|c| *c == ']')
                .ok_or_else(|| ModelError::UnterminatedEscape {
                    pattern: pattern.to_string(),
                })?;
            for literal in &chars[idx + 1..idx + 1 + close] {
                push_literal(&mut out, *literal);
            }
            idx += close + 2;
            continue;
        }
        if !ch.is_ascii_alphabetic() {
            push_literal(&mut out, ch);
            idx += 1;
            continue;
        }
        let run = chars[idx..].iter().take_while(|c| **c == ch).count();
        let token: String = chars[idx..idx + run].iter().collect();
        let translated = match token.as_str() {
            "YYYY" => {
                has_year = true;
                "%Y"
            }
            "YY" => {
                has_year = true;
                "%y"
            }
            "MM" => {
                has_month = true;
                "%m"
            }
            "M" => {
                has_month = true;
                "%-m"
            }
            "DD" => {
                has_day = true;
                "%d"
            }
            "D" => {
                has_day = true;
                "%-d"
            }
            _ => {
                return Err(ModelError::UnsupportedDateToken {
                    pattern: pattern.to_string(),
                    token,
                });
            }
        };
        out.push_str(translated);
        idx += run;
    }
    if !(has_year && has_month && has_day) {
        return Err(ModelError::IncompleteDatePattern {
            pattern: pattern.to_string(),
        });
    }
    Ok(out)
}

fn push_literal(out: &mut String, ch: char) {
    if ch == '%' {
        out.push_str("%%");
    } else {
        out.push(ch);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn iso_pattern_formats_and_parses() {
        let format = DateFormat::new("YYYY-MM-DD").unwrap();
        assert_eq!(format, DateFormat::iso());
        assert_eq!(format.format(date(2024, 6, 5)), "2024-06-05");
        assert_eq!(format.parse("2024-06-05").unwrap(), date(2024, 6, 5));
    }

    #[test]
    fn european_pattern_with_escape() {
        let format = DateFormat::new("DD/MM/YYYY [h]").unwrap();
        assert_eq!(format.format(date(2024, 1, 9)), "09/01/2024 h");
        assert_eq!(format.parse("09/01/2024 h").unwrap(), date(2024, 1, 9));
    }

    #[test]
    fn rejects_time_tokens_and_incomplete_patterns() {
        assert!(matches!(
            DateFormat::new("YYYY-MM-DD HH:mm"),
            Err(ModelError::UnsupportedDateToken { .. })
        ));
        assert!(matches!(
            DateFormat::new("YYYY-MM"),
            Err(ModelError::IncompleteDatePattern { .. })
        ));
        assert!(matches!(
            DateFormat::new("YYYY-MM-DD [x"),
            Err(ModelError::UnterminatedEscape { .. })
        ));
    }

    #[test]
    fn lenient_parse_floors_instants_to_their_own_day() {
        let format = DateFormat::iso();
        assert_eq!(
            format.parse_lenient("2024-06-25T23:30:00+02:00"),
            Some(date(2024, 6, 25))
        );
        assert_eq!(
            format.parse_lenient("2024-06-25T00:00:00"),
            Some(date(2024, 6, 25))
        );
        assert_eq!(format.parse_lenient("not a date"), None);
        assert_eq!(format.parse_lenient("2024-13-01"), None);
    }

    #[test]
    fn calendar_day_follows_consumer_offset() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 24, 22, 30, 0).unwrap();
        let rome = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(calendar_day_in(&instant, &rome), date(2024, 6, 25));
        assert_eq!(calendar_day_in(&instant, &Utc), date(2024, 6, 24));
    }

    #[test]
    fn span_and_month_arithmetic() {
        let range = DateRange::new(date(2024, 6, 10), date(2024, 6, 25));
        assert_eq!(range.span_days(), 15);
        assert_eq!(DateRange::ending_at(date(2024, 3, 1), 1).from, date(2024, 2, 29));
        assert_eq!(month_before(date(2024, 3, 31)), date(2024, 2, 29));
    }
}
