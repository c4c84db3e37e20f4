use chrono::NaiveDate;
use serde::Serialize;

use geoclima_model::{DateRange, Effect, LayerRef, PeriodKey, PeriodType, UpdateInstruction, WidgetId};

/// One bucket of a period table, flattened for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodRow {
    pub key: String,
    pub label: String,
    pub min: u32,
    pub max: u32,
    pub is_default: bool,
}

impl From<&PeriodType> for PeriodRow {
    fn from(period: &PeriodType) -> Self {
        Self {
            key: period.key.to_string(),
            label: period.display_label().to_string(),
            min: period.lower_bound(),
            max: period.max,
            is_default: period.is_default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketOutcome {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub span_days: i64,
    /// `None` when no bucket covers the span.
    pub period: Option<PeriodKey>,
}

/// What `apply` would hand to the layer store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyPlan {
    pub widget: WidgetId,
    pub range: DateRange,
    pub period: Option<PeriodKey>,
    pub from_formatted: String,
    pub to_formatted: String,
    pub instructions: Vec<UpdateInstruction>,
    pub applied: Vec<Effect>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayStep {
    pub action: &'static str,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayOutcome {
    pub steps: Vec<ReplayStep>,
    /// Layer tree after the last action.
    pub layers: Vec<LayerRef>,
}

impl ReplayOutcome {
    pub fn effect_count(&self) -> usize {
        self.steps.iter().map(|step| step.effects.len()).sum()
    }
}
