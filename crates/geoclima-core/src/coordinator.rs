//! Event-driven coordination of the range widgets.
//!
//! Actions are queued with [`RangeCoordinator::dispatch`] and processed one
//! at a time by [`RangeCoordinator::run`]; each reaction runs to completion
//! before the next starts. Bounds fetches and range derivations carry
//! generation tickets so that a superseded or cancelled computation never
//! mutates state.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, error, info, info_span, warn};

use geoclima_model::{
    Action, AvailableDateBounds, BoundsEvent, CombinedConfigEvent, ConfigEvent, DateRange, Effect,
    FetchRequest, LayerRef, PeriodKey, PluginState, RangeErrorKind, RangeManager,
    UpdateInstruction, WidgetId, month_before,
};

use crate::arbitration::{HandoffSources, handoff};
use crate::lifecycle::{RangeWidget, Selection, WidgetConfig};
use crate::merge::{MergeCoordinator, PairingStatus};
use crate::propagate::{propagate, summarize};
use crate::scheduler::{EventQueue, GenerationTracker, Ticket, Trigger};
use crate::store::LayerStore;
use crate::synthesize::{PeriodSelection, fixed_range, synthesize_params};
use crate::validator::check_date_range;

#[derive(Debug, Clone)]
struct Queued {
    action: Action,
    ticket: Option<Ticket<Trigger>>,
}

/// Owner of the widget group, the pairing buffer and the pending events.
#[derive(Debug, Default)]
pub struct RangeCoordinator {
    widgets: BTreeMap<WidgetId, RangeWidget>,
    active_manager: RangeManager,
    merge: MergeCoordinator<BoundsEvent, ConfigEvent>,
    generations: GenerationTracker<Trigger>,
    queue: EventQueue<Queued>,
}

impl RangeCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_widget(mut self, id: WidgetId, config: WidgetConfig) -> Self {
        self.register(id, config);
        self
    }

    pub fn register(&mut self, id: WidgetId, config: WidgetConfig) {
        self.widgets.insert(id, RangeWidget::new(id, config));
    }

    pub fn widget(&self, id: WidgetId) -> Option<&RangeWidget> {
        self.widgets.get(&id)
    }

    pub fn active_manager(&self) -> RangeManager {
        self.active_manager
    }

    pub fn pairing_status(&self) -> PairingStatus {
        self.merge.pairing_status()
    }

    /// Snapshot of every widget's lifecycle state.
    pub fn states(&self) -> BTreeMap<WidgetId, PluginState> {
        self.widgets
            .iter()
            .map(|(id, widget)| (*id, widget.state()))
            .collect()
    }

    /// Queue `action`. A range change supersedes any queued change of the
    /// same widget.
    pub fn dispatch(&mut self, action: Action) {
        let ticket = match &action {
            Action::RangeChangeRequested { widget, .. } => {
                Some(self.generations.begin(Trigger::Derive(*widget)))
            }
            _ => None,
        };
        self.queue.push(Queued { action, ticket });
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Process queued actions until the queue is empty.
    pub fn run<S: LayerStore>(&mut self, store: &mut S) -> Vec<Effect> {
        let mut effects = Vec::new();
        while let Some(Queued { action, ticket }) = self.queue.pop() {
            if let Some(ticket) = ticket
                && !self.generations.complete(&ticket)
            {
                debug!(action = action.name(), "superseded action discarded");
                continue;
            }
            let span = info_span!("action", name = action.name());
            let _guard = span.enter();
            effects.extend(self.handle(action, store));
        }
        effects
    }

    /// Dispatch `action` and run the queue.
    pub fn process<S: LayerStore>(&mut self, action: Action, store: &mut S) -> Vec<Effect> {
        self.dispatch(action);
        self.run(store)
    }

    fn handle<S: LayerStore>(&mut self, action: Action, store: &mut S) -> Vec<Effect> {
        match action {
            Action::WidgetActivated { widget } => self.on_activated(widget),
            Action::WidgetDeactivated { widget } => self.on_deactivated(widget),
            Action::BoundsFetched {
                widget,
                ticket,
                first,
                last,
            } => self.on_bounds(widget, ticket, AvailableDateBounds::new(first, last), store),
            Action::ConfigLoaded { layers } => self.on_config(layers, store),
            Action::RangeChangeRequested {
                widget,
                from,
                to,
                period_key,
            } => self.on_range_change(widget, from.as_deref(), to.as_deref(), period_key, store),
            Action::PickerToggled { source } => self.on_toggle(source, store),
            Action::CollapseToggled { widget } => {
                if let Some(target) = self.widgets.get_mut(&widget) {
                    target.toggle_collapse();
                }
                Vec::new()
            }
        }
    }

    fn on_activated(&mut self, id: WidgetId) -> Vec<Effect> {
        let snapshot = self.states();
        let owner_vacant = snapshot
            .get(&self.active_manager.widget())
            .is_none_or(|state| !state.is_loaded);
        if owner_vacant && let Some(manager) = id.range_manager() {
            if manager != self.active_manager {
                debug!(widget = %id, "picker takes over the vacant range");
            }
            self.active_manager = manager;
        }
        let owns_range = id
            .range_manager()
            .is_none_or(|manager| manager == self.active_manager);
        let active_manager = self.active_manager;
        let Some(widget) = self.widgets.get_mut(&id) else {
            warn!(widget = %id, "activation of unregistered widget ignored");
            return Vec::new();
        };
        widget.state_mut().active_range_manager = active_manager;
        let activation = widget.activate(&snapshot, owns_range);
        if !activation.entered {
            return Vec::new();
        }

        let mut effects = Vec::new();
        if activation.fetch
            && let Some(fetch) = widget.config().fetch.clone()
        {
            let ticket = self.generations.begin(Trigger::Fetch(id));
            effects.push(Effect::FetchBounds {
                request: FetchRequest {
                    widget: id,
                    variable: fetch.variable,
                    url: fetch.url,
                    time_unit: widget.config().format.pattern().to_string(),
                    ticket: ticket.generation,
                },
            });
        }

        if let Some(sibling) = activation.adopted_from {
            let (bounds, to) = self
                .widgets
                .get(&sibling)
                .map(|other| (other.stored_bounds(), other.working().to))
                .unwrap_or_default();
            if let Some(widget) = self.widgets.get_mut(&id) {
                widget.adopt(bounds, to);
                debug!(widget = %id, %sibling, "adopted sibling end date");
            }
        }
        if let Some(widget) = self.widgets.get(&id) {
            effects.push(widget.range_changed());
        }
        effects
    }

    fn on_deactivated(&mut self, id: WidgetId) -> Vec<Effect> {
        self.generations.invalidate(Trigger::Fetch(id));
        self.generations.invalidate(Trigger::Derive(id));
        let Some(widget) = self.widgets.get_mut(&id) else {
            return Vec::new();
        };
        let was_showing = widget.state().is_showing();
        let mut effects = widget.deactivate();
        if was_showing && let Some(manager) = id.range_manager() {
            effects.extend(self.hand_over(manager.other()));
        }
        effects
    }

    /// Make `manager`'s picker the visible one if it is still loaded.
    fn hand_over(&mut self, manager: RangeManager) -> Option<Effect> {
        let target = self
            .widgets
            .get_mut(&manager.widget())
            .filter(|widget| widget.state().is_loaded)?;
        self.active_manager = manager;
        let state = target.state_mut();
        state.active_range_manager = manager;
        state.show_picker = true;
        info!(widget = %manager.widget(), "picker shown after sibling unloaded");
        Some(target.range_changed())
    }

    fn on_bounds<S: LayerStore>(
        &mut self,
        widget: Option<WidgetId>,
        ticket: Option<u64>,
        bounds: AvailableDateBounds,
        store: &mut S,
    ) -> Vec<Effect> {
        if let (Some(id), Some(generation)) = (widget, ticket) {
            let ticket = Ticket {
                key: Trigger::Fetch(id),
                generation,
            };
            if !self.generations.complete(&ticket) {
                debug!(widget = %id, generation, "stale bounds discarded");
                return Vec::new();
            }
        }
        info!(first = %bounds.first, last = %bounds.last, "available dates received");

        let mut effects = Vec::new();
        for widget in self.widgets.values_mut() {
            widget.set_bounds(bounds);
            if widget.state().is_loaded && widget.applied().is_none() {
                let defaults = widget.default_selection(bounds.last);
                widget.set_working(defaults);
                effects.push(widget.range_changed());
            }
        }

        if let Some((bounds, config)) = self.merge.push_bounds(BoundsEvent { widget, bounds }) {
            effects.extend(self.on_combined(CombinedConfigEvent::from_pair(bounds, config), store));
        }
        effects
    }

    fn on_config<S: LayerStore>(&mut self, layers: Vec<LayerRef>, store: &mut S) -> Vec<Effect> {
        store.load_layers(layers.clone());
        match self.merge.push_config(ConfigEvent { layers }) {
            Some((bounds, config)) => {
                self.on_combined(CombinedConfigEvent::from_pair(bounds, config), store)
            }
            None => Vec::new(),
        }
    }

    /// Initial layer dates once both the bounds and the layer list are known:
    /// the month ending at the last available date, applied to every layer
    /// with a map file.
    fn on_combined<S: LayerStore>(&mut self, event: CombinedConfigEvent, store: &mut S) -> Vec<Effect> {
        let Some(owner) = self.loaded_picker() else {
            debug!("no picker loaded, combined configuration ignored");
            return Vec::new();
        };
        let to = event.last_available_date;
        let range = DateRange::new(month_before(to), to);
        let Some(widget) = self.widgets.get(&owner) else {
            return Vec::new();
        };
        let params = match synthesize_params(
            range,
            &PeriodSelection::Free,
            &widget.config().synthesis_context(),
        ) {
            Ok(params) => params,
            Err(err) => {
                error!(widget = %owner, %err, "initial layer dates not applied");
                return Vec::new();
            }
        };
        let instructions = propagate(&event.layers, &params, |layer| layer.map_file().is_some());
        let mut effects = apply_all(store, &instructions);
        effects.extend(summarize(None, &instructions, &params));

        for widget in self.widgets.values_mut() {
            if widget.state().is_loaded && widget.id().range_manager().is_some() {
                widget.confirm(range, None);
            }
        }
        info!(from = %range.from, to = %range.to, layers = instructions.len() / 2, "initial layer dates applied");
        effects
    }

    fn loaded_picker(&self) -> Option<WidgetId> {
        let active = self.active_manager.widget();
        let is_loaded_picker = |id: &WidgetId| {
            id.range_manager().is_some()
                && self
                    .widgets
                    .get(id)
                    .is_some_and(|widget| widget.state().is_loaded)
        };
        if is_loaded_picker(&active) {
            return Some(active);
        }
        self.widgets.keys().copied().find(is_loaded_picker)
    }

    fn on_range_change<S: LayerStore>(
        &mut self,
        id: WidgetId,
        from: Option<&str>,
        to: Option<&str>,
        period_key: Option<PeriodKey>,
        store: &mut S,
    ) -> Vec<Effect> {
        let Some(widget) = self.widgets.get_mut(&id) else {
            warn!(widget = %id, "range change for unregistered widget ignored");
            return Vec::new();
        };
        if !widget.state().is_loaded {
            debug!(widget = %id, "range change for unloaded widget ignored");
            return Vec::new();
        }
        if id.range_manager().is_some() && !widget.state().is_showing() {
            debug!(widget = %id, "range change for hidden picker ignored");
            return Vec::new();
        }
        let config = widget.config().clone();
        let parse = |value: Option<&str>| value.and_then(|value| config.format.parse_lenient(value));
        let requested_from = parse(from);
        let requested_to = parse(to);
        let bounds = widget.bounds();

        let (checked, selection, period) = if id == WidgetId::FixedRange {
            let key = period_key
                .or_else(|| widget.working().period.clone())
                .or_else(|| config.default_period().map(|period| period.key.clone()));
            let Some(period) = key.as_ref().and_then(|key| config.period(key)) else {
                error!(widget = %id, key = ?key, "selected period is not configured");
                return Vec::new();
            };
            let checked = match requested_to {
                None => Err(RangeErrorKind::InvalidToDate),
                Some(to) => check_date_range(Some(fixed_range(to, period).from), Some(to), &bounds),
            };
            let selection = if config.daily {
                PeriodSelection::Daily
            } else {
                PeriodSelection::Fixed(period.key.clone())
            };
            (checked, selection, key)
        } else {
            let checked = check_date_range(requested_from, requested_to, &bounds);
            let period = widget.working().period.clone();
            (checked, PeriodSelection::Free, period)
        };

        let range = match checked {
            Ok(range) => range,
            Err(kind) => return reject(widget, kind, requested_from, requested_to, period),
        };

        let params = match synthesize_params(range, &selection, &config.synthesis_context()) {
            Ok(params) => params,
            Err(err) => {
                error!(widget = %id, %err, kind = err.kind().as_str(), "range not applied");
                return Vec::new();
            }
        };

        let mut effects: Vec<Effect> = widget.clear_alert().into_iter().collect();
        let period = params.period.clone().or(period);
        widget.confirm(range, period);
        if !config.propagates {
            debug!(widget = %id, "widget does not propagate ranges");
            return effects;
        }
        let instructions = propagate(store.layers(), &params, |layer| config.catalog.matches(layer));
        effects.extend(apply_all(store, &instructions));
        effects.extend(summarize(Some(id), &instructions, &params));
        info!(
            widget = %id,
            from = %params.from_formatted,
            to = %params.to_formatted,
            period = ?params.period,
            "range applied"
        );
        effects
    }

    fn on_toggle<S: LayerStore>(&mut self, source: RangeManager, store: &S) -> Vec<Effect> {
        let target_id = source.other().widget();
        self.active_manager = source.other();
        if let Some(widget) = self.widgets.get_mut(&source.widget()) {
            widget.state_mut().show_picker = false;
            widget.state_mut().active_range_manager = self.active_manager;
        }
        let Some(target) = self.widgets.get_mut(&target_id) else {
            warn!(widget = %target_id, "toggle to unregistered picker");
            return Vec::new();
        };

        let format = &target.config().format;
        let params = target
            .config()
            .catalog
            .first_dated_layer(store.layers())
            .and_then(|layer| layer.params.as_ref());
        let parse = |value: Option<&String>| value.and_then(|value| format.parse_lenient(value));
        let sources = HandoffSources {
            layer_from: parse(params.and_then(|params| params.from_data.as_ref())),
            layer_to: parse(params.and_then(|params| params.to_data.as_ref())),
            stored_last: target.stored_bounds().map(|bounds| bounds.last),
            default_last: target.config().default_bounds.last,
        };
        let result = handoff(source, &sources);

        let period = if result.reset_period {
            target.config().default_period().map(|period| period.key.clone())
        } else {
            target.working().period.clone()
        };
        let from = match (result.from, &period) {
            (Some(from), _) => Some(from),
            (None, Some(key)) => target
                .config()
                .period(key)
                .map(|period| fixed_range(result.to, period).from),
            (None, None) => None,
        };
        target.set_working(Selection {
            from,
            to: Some(result.to),
            period,
        });
        let state = target.state_mut();
        state.active_range_manager = self.active_manager;
        state.show_picker = state.is_loaded;
        info!(from = %source, to = %target_id, "picker toggled");
        vec![target.range_changed()]
    }
}

fn apply_all<S: LayerStore>(store: &mut S, instructions: &[UpdateInstruction]) -> Vec<Effect> {
    instructions
        .iter()
        .map(|instruction| {
            store.apply(instruction);
            Effect::Update {
                instruction: instruction.clone(),
            }
        })
        .collect()
}

/// Revert the rejected fields to their last good values and raise the alert.
fn reject(
    widget: &mut RangeWidget,
    kind: RangeErrorKind,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    period: Option<PeriodKey>,
) -> Vec<Effect> {
    let good = widget.last_good();
    let selection = match kind {
        RangeErrorKind::InvalidFromDate => Selection {
            from: good.from,
            to: to.or(good.to),
            period,
        },
        RangeErrorKind::InvalidToDate => Selection {
            from: from.or(good.from),
            to: good.to,
            period,
        },
        _ => good,
    };
    warn!(widget = %widget.id(), kind = kind.as_str(), "range rejected, reverted");
    widget.set_working(selection);
    vec![widget.range_changed(), widget.raise_alert(kind)]
}

#[cfg(test)]
mod tests {
    use geoclima_model::{FetchSettings, PeriodType};

    use super::*;
    use crate::catalog::{NameMatch, VariableCatalog};
    use crate::store::InMemoryLayerStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_config() -> WidgetConfig {
        let mut config = WidgetConfig::new(
            vec![
                PeriodType::new(1u32, None, 5),
                PeriodType::new(7u32, Some(6), 8),
                PeriodType::new(10u32, Some(9), 20).as_default(),
                PeriodType::new(30u32, Some(21), 40),
            ],
            AvailableDateBounds::new(date(2020, 1, 1), date(2024, 6, 30)),
        );
        config.catalog = VariableCatalog::new(
            BTreeMap::from([("precipitazione".to_string(), vec!["prec".to_string()])]),
            NameMatch::Exact,
        );
        config.fetch = Some(FetchSettings {
            variable: "prec".to_string(),
            url: "https://example.org/dates".to_string(),
        });
        config
    }

    fn sample_store() -> InMemoryLayerStore {
        InMemoryLayerStore::new(vec![
            LayerRef::new("p", "prec").with_map("/maps/prec_1.map"),
            LayerRef::new("t", "tmax").with_map("/maps/tmax_1.map"),
        ])
    }

    fn free_change(from: Option<&str>, to: Option<&str>) -> Action {
        Action::RangeChangeRequested {
            widget: WidgetId::FreeRange,
            from: from.map(str::to_string),
            to: to.map(str::to_string),
            period_key: None,
        }
    }

    fn coordinator() -> RangeCoordinator {
        RangeCoordinator::new()
            .with_widget(WidgetId::FixedRange, sample_config())
            .with_widget(WidgetId::FreeRange, sample_config())
    }

    #[test]
    fn fixed_activation_requests_bounds() {
        let mut coordinator = coordinator();
        let mut store = sample_store();
        let effects = coordinator.process(
            Action::WidgetActivated {
                widget: WidgetId::FixedRange,
            },
            &mut store,
        );
        assert!(matches!(&effects[0], Effect::FetchBounds { request } if request.widget == WidgetId::FixedRange));
        assert!(coordinator.states()[&WidgetId::FixedRange].is_showing());
    }

    #[test]
    fn free_range_change_propagates_catalogued_layers() {
        let mut coordinator = coordinator();
        let mut store = sample_store();
        coordinator.process(
            Action::WidgetActivated {
                widget: WidgetId::FreeRange,
            },
            &mut store,
        );
        let effects = coordinator.process(
            free_change(Some("2024-06-10"), Some("2024-06-25")),
            &mut store,
        );
        let updates: Vec<&UpdateInstruction> = effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Update { instruction } => Some(instruction),
                _ => None,
            })
            .collect();
        assert_eq!(updates.len(), 2);
        assert_eq!(store.layer("p").unwrap().map_file(), Some("/maps/prec_10.map"));
        assert_eq!(store.layer("t").unwrap().map_file(), Some("/maps/tmax_1.map"));
        let applied = coordinator.widget(WidgetId::FreeRange).unwrap().applied().unwrap();
        assert_eq!(applied.to, Some(date(2024, 6, 25)));
    }

    #[test]
    fn invalid_from_reverts_without_update() {
        let mut coordinator = coordinator();
        let mut store = sample_store();
        coordinator.process(
            Action::WidgetActivated {
                widget: WidgetId::FreeRange,
            },
            &mut store,
        );
        coordinator.process(free_change(Some("2024-06-10"), Some("2024-06-25")), &mut store);
        let effects = coordinator.process(free_change(None, Some("2024-06-20")), &mut store);
        assert_eq!(effects.len(), 2);
        assert_eq!(
            effects[0],
            Effect::RangeChanged {
                widget: WidgetId::FreeRange,
                from: Some(date(2024, 6, 10)),
                to: date(2024, 6, 20),
                period_key: Some(PeriodKey::from(10u32)),
            }
        );
        assert!(matches!(
            &effects[1],
            Effect::AlertRaised { kind: RangeErrorKind::InvalidFromDate, message_key, .. }
                if message_key == "gcapp.errorMessages.invalidFromDate"
        ));

        let effects = coordinator.process(free_change(Some("2024-06-01"), Some("2024-06-20")), &mut store);
        assert_eq!(
            effects[0],
            Effect::AlertCleared {
                widget: WidgetId::FreeRange
            }
        );
    }

    #[test]
    fn newer_range_change_supersedes_queued_one() {
        let mut coordinator = coordinator();
        let mut store = sample_store();
        coordinator.process(
            Action::WidgetActivated {
                widget: WidgetId::FreeRange,
            },
            &mut store,
        );
        coordinator.dispatch(free_change(Some("2024-06-20"), Some("2024-06-25")));
        coordinator.dispatch(free_change(Some("2024-05-25"), Some("2024-06-25")));
        let effects = coordinator.run(&mut store);
        let maps: Vec<&str> = effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::RangeApplied { map_file_name, .. } => Some(map_file_name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(maps, vec!["/maps/prec_30.map"]);
    }

    #[test]
    fn stale_bounds_are_discarded_after_deactivation() {
        let mut coordinator = coordinator();
        let mut store = sample_store();
        let effects = coordinator.process(
            Action::WidgetActivated {
                widget: WidgetId::FixedRange,
            },
            &mut store,
        );
        let Effect::FetchBounds { request } = &effects[0] else {
            panic!("expected fetch");
        };
        let ticket = request.ticket;
        coordinator.process(
            Action::WidgetDeactivated {
                widget: WidgetId::FixedRange,
            },
            &mut store,
        );
        let effects = coordinator.process(
            Action::BoundsFetched {
                widget: Some(WidgetId::FixedRange),
                ticket: Some(ticket),
                first: date(2021, 1, 1),
                last: date(2023, 12, 31),
            },
            &mut store,
        );
        assert!(effects.is_empty());
        assert_eq!(coordinator.pairing_status(), PairingStatus::Idle);
        assert_eq!(
            coordinator.widget(WidgetId::FixedRange).unwrap().bounds().last,
            date(2024, 6, 30)
        );
    }

    #[test]
    fn toggle_hands_end_date_to_free_picker() {
        let mut coordinator = coordinator();
        let mut store = sample_store();
        for widget in [WidgetId::FixedRange, WidgetId::FreeRange] {
            coordinator.process(Action::WidgetActivated { widget }, &mut store);
        }
        let effects = coordinator.process(
            Action::PickerToggled {
                source: RangeManager::Fixed,
            },
            &mut store,
        );
        assert_eq!(coordinator.active_manager(), RangeManager::Free);
        assert_eq!(
            effects,
            vec![Effect::RangeChanged {
                widget: WidgetId::FreeRange,
                from: Some(date(2024, 5, 30)),
                to: date(2024, 6, 30),
                period_key: Some(PeriodKey::from(10u32)),
            }]
        );
        let states = coordinator.states();
        assert!(states[&WidgetId::FreeRange].is_showing());
        assert!(!states[&WidgetId::FixedRange].is_showing());
    }

    fn activate(
        coordinator: &mut RangeCoordinator,
        store: &mut InMemoryLayerStore,
        widget: WidgetId,
    ) -> Vec<Effect> {
        coordinator.process(Action::WidgetActivated { widget }, store)
    }

    #[test]
    fn free_picker_mounted_alone_fetches_and_shows() {
        let mut coordinator = coordinator();
        let mut store = sample_store();
        let effects = activate(&mut coordinator, &mut store, WidgetId::FreeRange);
        assert!(matches!(&effects[0], Effect::FetchBounds { request } if request.widget == WidgetId::FreeRange));
        assert_eq!(coordinator.active_manager(), RangeManager::Free);
        assert!(coordinator.states()[&WidgetId::FreeRange].is_showing());

        let effects = activate(&mut coordinator, &mut store, WidgetId::FixedRange);
        assert!(!effects.iter().any(|effect| matches!(effect, Effect::FetchBounds { .. })));
        assert!(!coordinator.states()[&WidgetId::FixedRange].is_showing());
    }

    #[test]
    fn free_picker_shows_once_fixed_unloads() {
        let mut coordinator = coordinator();
        let mut store = sample_store();
        activate(&mut coordinator, &mut store, WidgetId::FixedRange);
        activate(&mut coordinator, &mut store, WidgetId::FreeRange);
        assert!(!coordinator.states()[&WidgetId::FreeRange].is_showing());

        let effects = coordinator.process(
            Action::WidgetDeactivated {
                widget: WidgetId::FixedRange,
            },
            &mut store,
        );
        assert_eq!(coordinator.active_manager(), RangeManager::Free);
        let states = coordinator.states();
        assert!(states[&WidgetId::FreeRange].is_showing());
        assert_eq!(states[&WidgetId::FreeRange].active_range_manager, RangeManager::Free);
        assert!(matches!(
            effects.last(),
            Some(Effect::RangeChanged { widget: WidgetId::FreeRange, .. })
        ));

        let effects = coordinator.process(free_change(Some("2024-06-10"), Some("2024-06-25")), &mut store);
        assert!(effects.iter().any(|effect| matches!(effect, Effect::Update { .. })));
    }

    #[test]
    fn hidden_picker_cannot_apply_ranges() {
        let mut coordinator = coordinator();
        let mut store = sample_store();
        activate(&mut coordinator, &mut store, WidgetId::FixedRange);
        activate(&mut coordinator, &mut store, WidgetId::FreeRange);

        let effects = coordinator.process(free_change(Some("2024-06-10"), Some("2024-06-25")), &mut store);
        assert!(effects.is_empty());
        assert_eq!(store.applied(), 0);
        assert_eq!(store.layer("p").unwrap().map_file(), Some("/maps/prec_1.map"));
        assert!(coordinator.widget(WidgetId::FreeRange).unwrap().applied().is_none());
    }

    #[test]
    fn toggle_back_to_fixed_resets_the_period() {
        let mut coordinator = coordinator();
        let mut store = sample_store();
        activate(&mut coordinator, &mut store, WidgetId::FixedRange);
        coordinator.process(
            Action::RangeChangeRequested {
                widget: WidgetId::FixedRange,
                from: None,
                to: Some("2024-06-25".to_string()),
                period_key: Some(PeriodKey::from(7u32)),
            },
            &mut store,
        );
        assert_eq!(
            coordinator.widget(WidgetId::FixedRange).unwrap().working().period,
            Some(PeriodKey::from(7u32))
        );
        activate(&mut coordinator, &mut store, WidgetId::FreeRange);
        coordinator.process(
            Action::PickerToggled {
                source: RangeManager::Fixed,
            },
            &mut store,
        );
        coordinator.process(free_change(Some("2024-05-01"), Some("2024-05-25")), &mut store);

        let effects = coordinator.process(
            Action::PickerToggled {
                source: RangeManager::Free,
            },
            &mut store,
        );
        assert_eq!(coordinator.active_manager(), RangeManager::Fixed);
        assert_eq!(
            effects,
            vec![Effect::RangeChanged {
                widget: WidgetId::FixedRange,
                from: Some(date(2024, 5, 5)),
                to: date(2024, 5, 25),
                period_key: Some(PeriodKey::from(10u32)),
            }]
        );
        let states = coordinator.states();
        assert!(states[&WidgetId::FixedRange].is_showing());
        assert!(!states[&WidgetId::FreeRange].is_showing());
    }
}
