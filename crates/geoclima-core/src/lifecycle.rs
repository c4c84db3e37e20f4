//! Per-widget lifecycle: `NotLoaded -> Loaded -> NotLoaded`, re-entrant.

use chrono::NaiveDate;
use tracing::{debug, info};

use geoclima_model::{
    AvailableDateBounds, DateFormat, DateRange, Effect, FetchSettings, PeriodKey, PeriodType,
    PluginState, RangeErrorKind, WidgetId, month_before,
};

use crate::arbitration::{PluginStates, loaded_sibling, should_fetch};
use crate::catalog::VariableCatalog;
use crate::period::default_period;
use crate::synthesize::{AddressingMode, SynthesisContext, fixed_range};

/// Static configuration of one widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    pub periods: Vec<PeriodType>,
    pub format: DateFormat,
    pub mode: AddressingMode,
    /// Single end date picker; map file names are kept.
    pub daily: bool,
    pub catalog: VariableCatalog,
    /// Where to fetch bounds; `None` disables fetching.
    pub fetch: Option<FetchSettings>,
    pub default_bounds: AvailableDateBounds,
    /// Whether applied ranges are pushed to the layers.
    pub propagates: bool,
}

impl WidgetConfig {
    pub fn new(periods: Vec<PeriodType>, default_bounds: AvailableDateBounds) -> Self {
        Self {
            periods,
            format: DateFormat::iso(),
            mode: AddressingMode::Suffix,
            daily: false,
            catalog: VariableCatalog::default(),
            fetch: None,
            default_bounds,
            propagates: true,
        }
    }

    pub fn synthesis_context(&self) -> SynthesisContext<'_> {
        SynthesisContext {
            periods: &self.periods,
            format: &self.format,
            mode: self.mode,
        }
    }

    pub fn default_period(&self) -> Option<&PeriodType> {
        default_period(&self.periods)
    }

    pub fn period(&self, key: &PeriodKey) -> Option<&PeriodType> {
        self.periods.iter().find(|period| &period.key == key)
    }
}

/// Form values of a widget. Fixed pickers derive `from` from `to` and the period.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub period: Option<PeriodKey>,
}

impl Selection {
    pub fn from_range(range: DateRange, period: Option<PeriodKey>) -> Self {
        Self {
            from: Some(range.from),
            to: Some(range.to),
            period,
        }
    }
}

/// Outcome of an activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    /// False when the widget was already loaded.
    pub entered: bool,
    pub fetch: bool,
    /// Loaded sibling whose bounds and end date were adopted.
    pub adopted_from: Option<WidgetId>,
}

#[derive(Debug, Clone)]
pub struct RangeWidget {
    id: WidgetId,
    config: WidgetConfig,
    state: PluginState,
    bounds: Option<AvailableDateBounds>,
    working: Selection,
    applied: Option<Selection>,
    alert: Option<RangeErrorKind>,
}

impl RangeWidget {
    pub fn new(id: WidgetId, config: WidgetConfig) -> Self {
        Self {
            id,
            config,
            state: PluginState::default(),
            bounds: None,
            working: Selection::default(),
            applied: None,
            alert: None,
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn state(&self) -> PluginState {
        self.state
    }

    pub fn state_mut(&mut self) -> &mut PluginState {
        &mut self.state
    }

    /// Fetched bounds, or the configured defaults before any fetch.
    pub fn bounds(&self) -> AvailableDateBounds {
        self.bounds.unwrap_or(self.config.default_bounds)
    }

    pub fn stored_bounds(&self) -> Option<AvailableDateBounds> {
        self.bounds
    }

    pub fn working(&self) -> &Selection {
        &self.working
    }

    /// Range last confirmed by propagation.
    pub fn applied(&self) -> Option<&Selection> {
        self.applied.as_ref()
    }

    pub fn alert(&self) -> Option<RangeErrorKind> {
        self.alert
    }

    fn is_fixed(&self) -> bool {
        self.id == WidgetId::FixedRange
    }

    /// Default selection ending at `to`.
    ///
    /// Fixed pickers span the default period; the others span one month.
    pub fn default_selection(&self, to: NaiveDate) -> Selection {
        let period = self.config.default_period();
        let from = match period {
            Some(period) if self.is_fixed() => fixed_range(to, period).from,
            _ => month_before(to),
        };
        Selection {
            from: Some(from),
            to: Some(to),
            period: period.map(|period| period.key.clone()),
        }
    }

    /// Enter `Loaded`. `owns_range` is true when this widget's representation
    /// is the visible one.
    pub fn activate(
        &mut self,
        siblings: &impl PluginStates,
        owns_range: bool,
    ) -> Activation {
        if self.state.is_loaded {
            debug!(widget = %self.id, "already loaded");
            return Activation {
                entered: false,
                fetch: false,
                adopted_from: None,
            };
        }
        self.working = self.default_selection(self.bounds().last);
        self.state.is_loaded = true;
        self.state.show_picker = owns_range && self.id.range_manager().is_some();
        let fetch = self.config.fetch.is_some() && owns_range && should_fetch(self.id, siblings);
        let sibling = loaded_sibling(self.id, siblings);
        info!(widget = %self.id, fetch, "widget loaded");
        Activation {
            entered: true,
            fetch,
            adopted_from: sibling,
        }
    }

    /// Take over a loaded sibling's bounds and end date.
    pub fn adopt(&mut self, bounds: Option<AvailableDateBounds>, to: Option<NaiveDate>) {
        if bounds.is_some() {
            self.bounds = bounds;
        }
        let to = to.unwrap_or(self.bounds().last);
        let period = self.working.period.clone();
        self.working = Selection {
            period,
            ..self.default_selection(to)
        };
    }

    /// Enter `NotLoaded`: the form returns to the layer-applied values,
    /// the alert is dropped and the panel state resets.
    pub fn deactivate(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.state.is_loaded {
            return effects;
        }
        self.working = match &self.applied {
            Some(applied) => applied.clone(),
            None => self.default_selection(self.bounds().last),
        };
        if let Some(effect) = self.clear_alert() {
            effects.push(effect);
        }
        self.state = PluginState {
            active_range_manager: self.state.active_range_manager,
            ..PluginState::default()
        };
        effects.push(self.range_changed());
        info!(widget = %self.id, "widget unloaded");
        effects
    }

    pub fn toggle_collapse(&mut self) {
        self.state.is_collapsed = !self.state.is_collapsed;
    }

    pub fn set_bounds(&mut self, bounds: AvailableDateBounds) {
        self.bounds = Some(bounds);
    }

    pub fn set_working(&mut self, selection: Selection) {
        self.working = selection;
    }

    /// Record a range accepted and propagated.
    pub fn confirm(&mut self, range: DateRange, period: Option<PeriodKey>) {
        let period = period.or_else(|| self.working.period.clone());
        let selection = Selection::from_range(range, period);
        self.working = selection.clone();
        self.applied = Some(selection);
    }

    /// Last known-good values: the applied range, else the previous form.
    pub fn last_good(&self) -> Selection {
        self.applied.clone().unwrap_or_else(|| self.working.clone())
    }

    pub fn raise_alert(&mut self, kind: RangeErrorKind) -> Effect {
        self.alert = Some(kind);
        Effect::AlertRaised {
            widget: self.id,
            kind,
            message_key: kind.message_key(),
        }
    }

    pub fn clear_alert(&mut self) -> Option<Effect> {
        self.alert
            .take()
            .map(|_| Effect::AlertCleared { widget: self.id })
    }

    /// The current form as an effect.
    pub fn range_changed(&self) -> Effect {
        Effect::RangeChanged {
            widget: self.id,
            from: self.working.from,
            to: self.working.to.unwrap_or(self.bounds().last),
            period_key: self.working.period.clone(),
        }
    }
}
