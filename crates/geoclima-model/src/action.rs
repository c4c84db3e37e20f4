//! In-process action surface: what flows into the range coordinator and
//! what it hands back to the host.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::AvailableDateBounds;
use crate::layer::{LayerRef, UpdateInstruction};
use crate::period::PeriodKey;
use crate::plugin::{RangeManager, WidgetId};
use crate::validation::RangeErrorKind;

/// Where a widget asks the date service for its bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchSettings {
    pub variable: String,
    pub url: String,
}

/// A bounds fetch the host must perform and answer with `BoundsFetched`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequest {
    pub widget: WidgetId,
    pub variable: String,
    pub url: String,
    pub time_unit: String,
    /// Echo this back so a result arriving after cancellation is dropped.
    pub ticket: u64,
}

/// Available dates fetched for a widget activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundsEvent {
    pub widget: Option<WidgetId>,
    pub bounds: AvailableDateBounds,
}

/// Map configuration finished loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEvent {
    pub layers: Vec<LayerRef>,
}

/// One pairing of a bounds event with a configuration event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedConfigEvent {
    pub last_available_date: NaiveDate,
    pub layers: Vec<LayerRef>,
}

impl CombinedConfigEvent {
    pub fn from_pair(bounds: BoundsEvent, config: ConfigEvent) -> Self {
        Self {
            last_available_date: bounds.bounds.last,
            layers: config.layers,
        }
    }
}

/// Inputs of the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum Action {
    BoundsFetched {
        #[serde(default)]
        widget: Option<WidgetId>,
        #[serde(default)]
        ticket: Option<u64>,
        first: NaiveDate,
        last: NaiveDate,
    },
    ConfigLoaded {
        layers: Vec<LayerRef>,
    },
    /// The form's current values; a missing or unparsable date is invalid.
    RangeChangeRequested {
        widget: WidgetId,
        #[serde(default)]
        from: Option<String>,
        #[serde(default)]
        to: Option<String>,
        #[serde(default)]
        period_key: Option<PeriodKey>,
    },
    WidgetActivated {
        widget: WidgetId,
    },
    WidgetDeactivated {
        widget: WidgetId,
    },
    /// The user switched away from `source` to the other picker.
    PickerToggled {
        source: RangeManager,
    },
    CollapseToggled {
        widget: WidgetId,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BoundsFetched { .. } => "BoundsFetched",
            Self::ConfigLoaded { .. } => "ConfigLoaded",
            Self::RangeChangeRequested { .. } => "RangeChangeRequested",
            Self::WidgetActivated { .. } => "WidgetActivated",
            Self::WidgetDeactivated { .. } => "WidgetDeactivated",
            Self::PickerToggled { .. } => "PickerToggled",
            Self::CollapseToggled { .. } => "CollapseToggled",
        }
    }
}

/// Outputs of the coordinator, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum Effect {
    FetchBounds {
        request: FetchRequest,
    },
    Update {
        instruction: UpdateInstruction,
    },
    RangeApplied {
        widget: Option<WidgetId>,
        map_file_name: String,
        from_formatted: String,
        to_formatted: String,
        layer_ids: Vec<String>,
    },
    AlertRaised {
        widget: WidgetId,
        kind: RangeErrorKind,
        message_key: String,
    },
    AlertCleared {
        widget: WidgetId,
    },
    /// The widget's working selection changed without a user edit
    /// (revert, hand-off between pickers, adopted defaults).
    RangeChanged {
        widget: WidgetId,
        from: Option<NaiveDate>,
        to: NaiveDate,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        period_key: Option<PeriodKey>,
    },
}

impl Effect {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FetchBounds { .. } => "FetchBounds",
            Self::Update { .. } => "Update",
            Self::RangeApplied { .. } => "RangeApplied",
            Self::AlertRaised { .. } => "AlertRaised",
            Self::AlertCleared { .. } => "AlertCleared",
            Self::RangeChanged { .. } => "RangeChanged",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_read_from_replay_json() {
        let json = r#"[
            { "type": "WidgetActivated", "widget": "fixedRange" },
            { "type": "BoundsFetched", "widget": "fixedRange", "ticket": 1,
              "first": "2020-01-01", "last": "2024-06-30" },
            { "type": "RangeChangeRequested", "widget": "fixedRange",
              "to": "2024-06-25", "periodKey": 30 },
            { "type": "PickerToggled", "source": "FIXED_RANGE" }
        ]"#;
        let actions: Vec<Action> = serde_json::from_str(json).unwrap();
        assert_eq!(actions.len(), 4);
        match &actions[2] {
            Action::RangeChangeRequested {
                from, period_key, ..
            } => {
                assert!(from.is_none());
                assert_eq!(period_key.as_ref().map(PeriodKey::as_str), Some("30"));
            }
            other => panic!("unexpected action {other:?}"),
        }
        assert_eq!(actions[3].name(), "PickerToggled");
    }
}
