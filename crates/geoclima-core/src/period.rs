//! Period bucketing over a configured table.

use geoclima_model::{DateRange, PeriodKey, PeriodType};
use tracing::debug;

use crate::error::{Result, SynthesisError};

/// The period whose `[min, max]` covers `days`.
///
/// Entries are scanned in ascending order of `min` (absent reads as 0) and
/// the first covering entry wins. A table with a gap yields
/// [`SynthesisError::NoMatchingPeriodBucket`] for the days inside the gap;
/// no nearest bucket is guessed.
pub fn period_for_span(days: i64, periods: &[PeriodType]) -> Result<&PeriodType> {
    let mut ordered: Vec<&PeriodType> = periods.iter().collect();
    ordered.sort_by_key(|period| period.lower_bound());
    let found = ordered
        .into_iter()
        .find(|period| period.covers(days))
        .ok_or(SynthesisError::NoMatchingPeriodBucket { days })?;
    debug!(days, key = %found.key, "bucketed span");
    Ok(found)
}

/// Bucket the whole-day span of `range`.
pub fn period_for_range<'a>(range: &DateRange, periods: &'a [PeriodType]) -> Result<&'a PeriodType> {
    period_for_span(range.span_days(), periods)
}

/// The entry flagged `isDefault`, or the first entry when none is flagged.
pub fn default_period(periods: &[PeriodType]) -> Option<&PeriodType> {
    periods
        .iter()
        .find(|period| period.is_default)
        .or_else(|| periods.first())
}

pub fn find_period<'a>(periods: &'a [PeriodType], key: &PeriodKey) -> Result<&'a PeriodType> {
    periods
        .iter()
        .find(|period| &period.key == key)
        .ok_or_else(|| SynthesisError::UnknownPeriod(key.clone()))
}

/// Keys of the table, used to recognise period codes inside file names.
pub fn period_keys(periods: &[PeriodType]) -> Vec<PeriodKey> {
    periods.iter().map(|period| period.key.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Vec<PeriodType> {
        vec![
            PeriodType::new(10u32, Some(9), 20).as_default(),
            PeriodType::new(1u32, None, 5),
            PeriodType::new(7u32, Some(6), 8),
        ]
    }

    #[test]
    fn scans_in_ascending_min_order() {
        let table = sample_table();
        assert_eq!(period_for_span(0, &table).unwrap().key.as_str(), "1");
        assert_eq!(period_for_span(5, &table).unwrap().key.as_str(), "1");
        assert_eq!(period_for_span(6, &table).unwrap().key.as_str(), "7");
        assert_eq!(period_for_span(15, &table).unwrap().key.as_str(), "10");
        assert_eq!(period_for_span(20, &table).unwrap().key.as_str(), "10");
    }

    #[test]
    fn first_covering_entry_wins_on_overlap() {
        let table = vec![
            PeriodType::new(30u32, Some(10), 40),
            PeriodType::new(10u32, Some(5), 15),
        ];
        assert_eq!(period_for_span(12, &table).unwrap().key.as_str(), "10");
    }

    #[test]
    fn gap_reports_no_matching_bucket() {
        let table = vec![
            PeriodType::new(1u32, None, 6),
            PeriodType::new(10u32, Some(9), 20),
        ];
        assert_eq!(
            period_for_span(7, &table).unwrap_err(),
            SynthesisError::NoMatchingPeriodBucket { days: 7 }
        );
        assert!(period_for_span(21, &table).is_err());
        assert!(period_for_span(-1, &table).is_err());
    }

    #[test]
    fn default_falls_back_to_first_entry() {
        assert_eq!(default_period(&sample_table()).unwrap().key.as_str(), "10");
        let plain = vec![PeriodType::new(1u32, None, 5), PeriodType::new(7u32, Some(6), 8)];
        assert_eq!(default_period(&plain).unwrap().key.as_str(), "1");
        assert!(default_period(&[]).is_none());
    }

    #[test]
    fn unknown_fixed_key_is_an_error() {
        let key = PeriodKey::from(90u32);
        assert_eq!(
            find_period(&sample_table(), &key).unwrap_err(),
            SynthesisError::UnknownPeriod(key)
        );
    }
}
