//! Identity and lifecycle state of the mutually-exclusive widgets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Widgets of the exclusion group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WidgetId {
    FixedRange,
    FreeRange,
    InfoChart,
}

impl WidgetId {
    pub const ALL: [WidgetId; 3] = [Self::FixedRange, Self::FreeRange, Self::InfoChart];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FixedRange => "fixedRange",
            Self::FreeRange => "freeRange",
            Self::InfoChart => "infoChart",
        }
    }

    /// The picker representation this widget shows, if it is a picker.
    pub fn range_manager(&self) -> Option<RangeManager> {
        match self {
            Self::FixedRange => Some(RangeManager::Fixed),
            Self::FreeRange => Some(RangeManager::Free),
            Self::InfoChart => None,
        }
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "fixedrange" | "fixed" | "fixedrangepicker" => Ok(Self::FixedRange),
            "freerange" | "free" | "freerangepicker" => Ok(Self::FreeRange),
            "infochart" | "chart" => Ok(Self::InfoChart),
            _ => Err(ModelError::UnknownWidget(s.to_string())),
        }
    }
}

/// Which representation of the range is in charge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeManager {
    #[default]
    #[serde(rename = "FIXED_RANGE")]
    Fixed,
    #[serde(rename = "FREE_RANGE")]
    Free,
}

impl RangeManager {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "FIXED_RANGE",
            Self::Free => "FREE_RANGE",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Self::Fixed => Self::Free,
            Self::Free => Self::Fixed,
        }
    }

    pub fn widget(&self) -> WidgetId {
        match self {
            Self::Fixed => WidgetId::FixedRange,
            Self::Free => WidgetId::FreeRange,
        }
    }
}

impl fmt::Display for RangeManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangeManager {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "FIXED_RANGE" | "FIXED" => Ok(Self::Fixed),
            "FREE_RANGE" | "FREE" => Ok(Self::Free),
            _ => Err(ModelError::UnknownRangeManager(s.to_string())),
        }
    }
}

/// Per-widget lifecycle state. Reset to defaults on deactivation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginState {
    pub is_loaded: bool,
    pub is_collapsed: bool,
    pub active_range_manager: RangeManager,
    pub show_picker: bool,
}

impl PluginState {
    /// Loaded and currently showing its picker.
    pub fn is_showing(&self) -> bool {
        self.is_loaded && self.show_picker
    }
}
