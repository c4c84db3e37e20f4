//! Mutual exclusion between the range widgets.
//!
//! Decisions read a snapshot of the sibling states taken when the triggering
//! event is processed; a change made by a sibling after the snapshot is not
//! observed by that decision.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use geoclima_model::{PluginState, RangeManager, WidgetId, month_before};

/// Read access to the lifecycle state of every widget.
pub trait PluginStates {
    fn plugin_state(&self, widget: WidgetId) -> Option<PluginState>;
}

impl PluginStates for BTreeMap<WidgetId, PluginState> {
    fn plugin_state(&self, widget: WidgetId) -> Option<PluginState> {
        self.get(&widget).copied()
    }
}

/// The first sibling of `self_id` that reports itself loaded.
pub fn loaded_sibling(self_id: WidgetId, siblings: &impl PluginStates) -> Option<WidgetId> {
    WidgetId::ALL.into_iter().find(|widget| {
        *widget != self_id
            && siblings
                .plugin_state(*widget)
                .is_some_and(|state| state.is_loaded)
    })
}

/// Whether `self_id` should fetch its own bounds.
///
/// A loaded sibling already holds the bounds, and a second fetch would emit
/// an extra bounds event that shifts the pairing index.
pub fn should_fetch(self_id: WidgetId, siblings: &impl PluginStates) -> bool {
    match loaded_sibling(self_id, siblings) {
        Some(sibling) => {
            debug!(widget = %self_id, %sibling, "bounds fetch suppressed");
            false
        }
        None => true,
    }
}

/// Dates available when one picker hands over to the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandoffSources {
    /// Dates of the first visible catalogued layer.
    pub layer_from: Option<NaiveDate>,
    pub layer_to: Option<NaiveDate>,
    /// Last available date held by the receiving picker.
    pub stored_last: Option<NaiveDate>,
    /// Configured default last date.
    pub default_last: NaiveDate,
}

impl HandoffSources {
    fn end_date(&self) -> NaiveDate {
        self.layer_to.or(self.stored_last).unwrap_or(self.default_last)
    }
}

/// New selection of the picker that becomes visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handoff {
    pub target: WidgetId,
    pub from: Option<NaiveDate>,
    pub to: NaiveDate,
    /// The receiving fixed picker goes back to its default period.
    pub reset_period: bool,
}

/// Hand the end date over when the user switches away from `source`.
///
/// Leaving the fixed picker gives the free picker both endpoints (the
/// start falling back to one month before the end); leaving the free
/// picker gives the fixed picker its end date and its default period.
pub fn handoff(source: RangeManager, sources: &HandoffSources) -> Handoff {
    let to = sources.end_date();
    match source {
        RangeManager::Fixed => Handoff {
            target: WidgetId::FreeRange,
            from: Some(sources.layer_from.unwrap_or_else(|| month_before(to))),
            to,
            reset_period: false,
        },
        RangeManager::Free => Handoff {
            target: WidgetId::FixedRange,
            from: None,
            to,
            reset_period: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loaded() -> PluginState {
        PluginState {
            is_loaded: true,
            ..PluginState::default()
        }
    }

    #[test]
    fn loaded_sibling_suppresses_fetch() {
        let mut states = BTreeMap::new();
        states.insert(WidgetId::FixedRange, loaded());
        states.insert(WidgetId::FreeRange, PluginState::default());
        assert!(!should_fetch(WidgetId::FreeRange, &states));
        assert!(should_fetch(WidgetId::FixedRange, &states));
    }

    #[test]
    fn chart_panel_counts_as_sibling() {
        let mut states = BTreeMap::new();
        states.insert(WidgetId::InfoChart, loaded());
        assert_eq!(loaded_sibling(WidgetId::FixedRange, &states), Some(WidgetId::InfoChart));
        assert!(should_fetch(WidgetId::InfoChart, &states));
    }

    #[test]
    fn leaving_fixed_prefers_layer_dates() {
        let sources = HandoffSources {
            layer_from: Some(date(2024, 5, 1)),
            layer_to: Some(date(2024, 5, 20)),
            stored_last: Some(date(2024, 6, 30)),
            default_last: date(2024, 1, 1),
        };
        let result = handoff(RangeManager::Fixed, &sources);
        assert_eq!(result.target, WidgetId::FreeRange);
        assert_eq!(result.from, Some(date(2024, 5, 1)));
        assert_eq!(result.to, date(2024, 5, 20));
    }

    #[test]
    fn fallbacks_use_stored_then_default_last() {
        let mut sources = HandoffSources {
            layer_from: None,
            layer_to: None,
            stored_last: Some(date(2024, 3, 31)),
            default_last: date(2024, 1, 1),
        };
        let result = handoff(RangeManager::Fixed, &sources);
        assert_eq!(result.to, date(2024, 3, 31));
        assert_eq!(result.from, Some(date(2024, 2, 29)));

        sources.stored_last = None;
        let result = handoff(RangeManager::Free, &sources);
        assert_eq!(result.target, WidgetId::FixedRange);
        assert_eq!(result.to, date(2024, 1, 1));
        assert!(result.reset_period);
        assert_eq!(result.from, None);
    }
}
