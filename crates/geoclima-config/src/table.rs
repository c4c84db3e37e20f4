//! Authoring checks for period tables.

use std::fmt;

use geoclima_model::{PeriodKey, PeriodType};

/// A smell in a period table. None of these stop the table from loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableIssue {
    Empty,
    MissingDefault,
    MultipleDefaults { keys: Vec<PeriodKey> },
    InvertedBucket { key: PeriodKey, min: u32, max: u32 },
    /// Day counts below the lowest bucket.
    UncoveredStart { first: PeriodKey, min: u32 },
    /// Days `from..=to` fall between two buckets.
    Gap { after: PeriodKey, before: PeriodKey, from: u32, to: u32 },
    Overlap { first: PeriodKey, second: PeriodKey },
}

impl fmt::Display for TableIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "no period types configured"),
            Self::MissingDefault => write!(f, "no period is marked as default; the first one is used"),
            Self::MultipleDefaults { keys } => {
                let keys: Vec<&str> = keys.iter().map(PeriodKey::as_str).collect();
                write!(f, "several defaults ({}); the first one is used", keys.join(", "))
            }
            Self::InvertedBucket { key, min, max } => {
                write!(f, "period {key} has min {min} above max {max}")
            }
            Self::UncoveredStart { first, min } => {
                write!(f, "spans shorter than {min} days match no period (lowest is {first})")
            }
            Self::Gap {
                after,
                before,
                from,
                to,
            } => write!(f, "spans of {from}..={to} days fall between periods {after} and {before}"),
            Self::Overlap { first, second } => write!(f, "periods {first} and {second} overlap"),
        }
    }
}

/// Check a table for the defects that make bucketing ambiguous or partial.
///
/// Buckets are compared in ascending order of `min`, the order bucketing
/// scans them in.
pub fn check_period_table(periods: &[PeriodType]) -> Vec<TableIssue> {
    let mut issues = Vec::new();
    if periods.is_empty() {
        issues.push(TableIssue::Empty);
        return issues;
    }

    let defaults: Vec<PeriodKey> = periods
        .iter()
        .filter(|period| period.is_default)
        .map(|period| period.key.clone())
        .collect();
    match defaults.len() {
        0 => issues.push(TableIssue::MissingDefault),
        1 => {}
        _ => issues.push(TableIssue::MultipleDefaults { keys: defaults }),
    }

    for period in periods {
        if period.lower_bound() > period.max {
            issues.push(TableIssue::InvertedBucket {
                key: period.key.clone(),
                min: period.lower_bound(),
                max: period.max,
            });
        }
    }

    let mut ordered: Vec<&PeriodType> = periods
        .iter()
        .filter(|period| period.lower_bound() <= period.max)
        .collect();
    ordered.sort_by_key(|period| period.lower_bound());
    if let Some(first) = ordered.first()
        && first.lower_bound() > 0
    {
        issues.push(TableIssue::UncoveredStart {
            first: first.key.clone(),
            min: first.lower_bound(),
        });
    }
    for pair in ordered.windows(2) {
        let (lower, upper) = (pair[0], pair[1]);
        if upper.lower_bound() > lower.max.saturating_add(1) {
            issues.push(TableIssue::Gap {
                after: lower.key.clone(),
                before: upper.key.clone(),
                from: lower.max + 1,
                to: upper.lower_bound() - 1,
            });
        } else if upper.lower_bound() <= lower.max {
            issues.push(TableIssue::Overlap {
                first: lower.key.clone(),
                second: upper.key.clone(),
            });
        }
    }
    issues
}
