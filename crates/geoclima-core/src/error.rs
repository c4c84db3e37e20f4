//! Error types for parameter synthesis.

use thiserror::Error;

use geoclima_model::{PeriodKey, RangeErrorKind};

/// Reasons a range could not be turned into layer parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    /// Free-range bucketing found no period covering the span.
    #[error("no period bucket covers a span of {days} days")]
    NoMatchingPeriodBucket { days: i64 },
    /// A fixed selection named a key that is not in the period table.
    #[error("period '{0}' is not configured")]
    UnknownPeriod(PeriodKey),
    /// The period table is empty.
    #[error("no period types are configured")]
    EmptyPeriodTable,
}

impl SynthesisError {
    /// The range error this failure is reported as.
    ///
    /// An unknown period key or an empty table leaves no bucket to choose
    /// from, so configuration defects share the no-bucket kind.
    pub fn kind(&self) -> RangeErrorKind {
        match self {
            Self::NoMatchingPeriodBucket { .. } | Self::UnknownPeriod(_) | Self::EmptyPeriodTable => {
                RangeErrorKind::NoMatchingPeriodBucket
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, SynthesisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_failure_reports_the_no_bucket_kind() {
        for err in [
            SynthesisError::NoMatchingPeriodBucket { days: 7 },
            SynthesisError::UnknownPeriod(PeriodKey::from(15u32)),
            SynthesisError::EmptyPeriodTable,
        ] {
            assert_eq!(err.kind(), RangeErrorKind::NoMatchingPeriodBucket);
        }
        assert_eq!(
            SynthesisError::NoMatchingPeriodBucket { days: 7 }.to_string(),
            "no period bucket covers a span of 7 days"
        );
    }
}
