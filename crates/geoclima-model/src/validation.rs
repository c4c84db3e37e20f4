//! Outcome of range validation and the error taxonomy shared with the UI.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of the message-catalog keys used by the alert surface.
pub const ERROR_MESSAGE_PREFIX: &str = "gcapp.errorMessages";

/// Recoverable failures of the range pipeline.
///
/// None of these halt processing: the widget reverts to its last good value
/// and, for user-facing kinds, raises an alert keyed by [`Self::message_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[serde(rename_all = "camelCase")]
pub enum RangeErrorKind {
    #[error("start date is missing or not a valid calendar date")]
    InvalidFromDate,
    #[error("end date is missing or not a valid calendar date")]
    InvalidToDate,
    #[error("start date is after end date")]
    RangeOrder,
    #[error("range is outside the available dates")]
    OutOfBounds,
    #[error("no period bucket covers the selected span")]
    NoMatchingPeriodBucket,
    #[error("available dates were never paired with a map configuration")]
    UnresolvedPairing,
}

impl RangeErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidFromDate => "invalidFromDate",
            Self::InvalidToDate => "invalidToDate",
            Self::RangeOrder => "rangeOrder",
            Self::OutOfBounds => "outOfBounds",
            Self::NoMatchingPeriodBucket => "noMatchingPeriodBucket",
            Self::UnresolvedPairing => "unresolvedPairing",
        }
    }

    pub fn message_key(&self) -> String {
        format!("{ERROR_MESSAGE_PREFIX}.{}", self.as_str())
    }

    /// Kinds the user caused and can fix from the picker.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::InvalidFromDate | Self::InvalidToDate | Self::RangeOrder | Self::OutOfBounds
        )
    }
}

/// Result of checking a candidate range against the available bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<RangeErrorKind>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error_message: None,
        }
    }

    pub fn invalid(kind: RangeErrorKind) -> Self {
        Self {
            is_valid: false,
            error_message: Some(kind),
        }
    }

    pub fn into_result(self) -> Result<(), RangeErrorKind> {
        match self.error_message {
            Some(kind) => Err(kind),
            None => Ok(()),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error_message {
            None => f.write_str("valid"),
            Some(kind) => write!(f, "invalid ({}): {kind}", kind.as_str()),
        }
    }
}
