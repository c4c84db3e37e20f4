//! Period buckets used by the fixed-range and free-range pickers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ModelError;

/// Period code embedded in map file names (`1`, `7`, `10`, `30`, ...).
///
/// Configuration files write keys as numbers or strings; both normalise to
/// the same trimmed text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PeriodKey(String);

impl PeriodKey {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidPeriodKey(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PeriodKey {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<u32> for PeriodKey {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for PeriodKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawKey {
            Number(i64),
            Text(String),
        }

        match RawKey::deserialize(deserializer)? {
            RawKey::Number(value) => Ok(Self(value.to_string())),
            RawKey::Text(value) => Self::new(value).map_err(serde::de::Error::custom),
        }
    }
}

/// One bucket of a period table.
///
/// `max` is the inclusive upper day count the bucket covers; `min`, when
/// present, the inclusive lower bound (absent reads as 0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodType {
    pub key: PeriodKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    pub max: u32,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_default: bool,
}

impl PeriodType {
    pub fn new(key: impl Into<PeriodKey>, min: Option<u32>, max: u32) -> Self {
        Self {
            key: key.into(),
            label: None,
            min,
            max,
            is_default: false,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn lower_bound(&self) -> u32 {
        self.min.unwrap_or(0)
    }

    /// True when `days` falls inside `[min, max]`.
    pub fn covers(&self, days: i64) -> bool {
        days >= i64::from(self.lower_bound()) && days <= i64::from(self.max)
    }

    /// Label for display, falling back to the key.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(self.key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_accept_numbers_and_strings() {
        let numeric: PeriodKey = serde_json::from_str("10").unwrap();
        let text: PeriodKey = serde_json::from_str("\" 10 \"").unwrap();
        assert_eq!(numeric, text);
        assert!(serde_json::from_str::<PeriodKey>("\"  \"").is_err());
    }

    #[test]
    fn period_type_reads_plugin_config_shape() {
        let period: PeriodType =
            serde_json::from_str(r#"{ "key": 7, "label": "7 giorni", "max": 6 }"#).unwrap();
        assert_eq!(period.key.as_str(), "7");
        assert_eq!(period.lower_bound(), 0);
        assert!(!period.is_default);
        assert!(period.covers(0));
        assert!(period.covers(6));
        assert!(!period.covers(7));
        assert!(!period.covers(-1));
    }
}
