//! Command logic shared by the binary and its tests.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use tracing::{debug, info, info_span};

use geoclima_config::{PickerConfig, PluginsConfig, load_map_config, load_plugins_config};
use geoclima_core::{
    InMemoryLayerStore, LayerStore, PeriodSelection, WidgetConfig, check_date_range, fixed_range,
    period_for_range, propagate, summarize, synthesize_params,
};
use geoclima_model::{
    Action, AvailableDateBounds, DateFormat, DateRange, LayerRef, PeriodKey, WidgetId,
};

use crate::types::{ApplyPlan, BucketOutcome, PeriodRow, ReplayOutcome, ReplayStep};

pub fn read_plugins(path: &Path) -> Result<PluginsConfig> {
    load_plugins_config(path).with_context(|| format!("load plugin config {}", path.display()))
}

pub fn read_layers(path: &Path) -> Result<Vec<LayerRef>> {
    let config =
        load_map_config(path).with_context(|| format!("load map config {}", path.display()))?;
    Ok(config.into_layers())
}

pub fn read_actions(path: &Path) -> Result<Vec<Action>> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse actions in {}", path.display()))
}

/// The picker named on the command line, else the first configured one.
pub fn select_picker(
    plugins: &PluginsConfig,
    widget: Option<WidgetId>,
) -> Result<(WidgetId, &PickerConfig)> {
    match widget {
        Some(widget) => plugins
            .picker(widget)
            .map(|picker| (widget, picker))
            .ok_or_else(|| anyhow!("no {widget} picker in the plugin config")),
        None => plugins
            .primary()
            .ok_or_else(|| anyhow!("the plugin config has no pickers")),
    }
}

/// Parse a command-line date in the picker's pattern (ISO instants also accepted).
pub fn parse_date(format: &DateFormat, value: &str) -> Result<NaiveDate> {
    format
        .parse_lenient(value)
        .ok_or_else(|| anyhow!("'{value}' is not a date in the '{format}' pattern"))
}

pub fn period_rows(config: &WidgetConfig) -> Vec<PeriodRow> {
    let mut rows: Vec<PeriodRow> = config.periods.iter().map(PeriodRow::from).collect();
    rows.sort_by_key(|row| row.min);
    rows
}

pub fn bucket(config: &WidgetConfig, from: NaiveDate, to: NaiveDate) -> BucketOutcome {
    let range = DateRange::new(from, to);
    let period = period_for_range(&range, &config.periods)
        .ok()
        .map(|period| period.key.clone());
    BucketOutcome {
        from,
        to,
        span_days: range.span_days(),
        period,
    }
}

/// A range to apply from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyRequest {
    pub from: Option<NaiveDate>,
    pub to: NaiveDate,
    pub period: Option<PeriodKey>,
    pub bounds: AvailableDateBounds,
}

/// Derive the update instructions `request` produces on `layers`.
///
/// Without a start date the fixed-range derivation runs (`to` minus the
/// period length); with one the span is bucketed. A rejected range comes
/// back as the [`geoclima_model::RangeErrorKind`] inside the error.
pub fn plan_apply(
    widget: WidgetId,
    config: &WidgetConfig,
    layers: &[LayerRef],
    request: &ApplyRequest,
) -> Result<ApplyPlan> {
    let fixed = request.from.is_none() || request.period.is_some();
    let (range, selection) = if fixed {
        let key = request
            .period
            .clone()
            .or_else(|| config.default_period().map(|period| period.key.clone()))
            .ok_or_else(|| anyhow!("no period selected and no default configured"))?;
        let Some(period) = config.period(&key) else {
            bail!("period {key} is not configured");
        };
        let derived = fixed_range(request.to, period);
        let range = check_date_range(Some(derived.from), Some(derived.to), &request.bounds)?;
        let selection = if config.daily {
            PeriodSelection::Daily
        } else {
            PeriodSelection::Fixed(key)
        };
        (range, selection)
    } else {
        let range = check_date_range(request.from, Some(request.to), &request.bounds)?;
        (range, PeriodSelection::Free)
    };
    debug!(from = %range.from, to = %range.to, ?selection, "range accepted");

    let params = synthesize_params(range, &selection, &config.synthesis_context())?;
    let instructions = propagate(layers, &params, |layer| config.catalog.matches(layer));
    let applied = summarize(Some(widget), &instructions, &params);
    info!(
        %widget,
        layers = instructions.len() / 2,
        from = %params.from_formatted,
        to = %params.to_formatted,
        "update plan ready"
    );
    Ok(ApplyPlan {
        widget,
        range,
        period: params.period.clone(),
        from_formatted: params.from_formatted.clone(),
        to_formatted: params.to_formatted.clone(),
        instructions,
        applied,
    })
}

/// Feed `actions` one at a time through a coordinator built from `plugins`.
pub fn replay(
    plugins: &PluginsConfig,
    layers: Vec<LayerRef>,
    actions: Vec<Action>,
    default_bounds: AvailableDateBounds,
) -> Result<ReplayOutcome> {
    let mut coordinator = plugins
        .coordinator(default_bounds)
        .context("build coordinator")?;
    let mut store = InMemoryLayerStore::new(layers);
    let mut steps = Vec::with_capacity(actions.len());
    for (index, action) in actions.into_iter().enumerate() {
        let name = action.name();
        let span = info_span!("replay", step = index + 1, action = name);
        let effects = span.in_scope(|| coordinator.process(action, &mut store));
        steps.push(ReplayStep {
            action: name,
            effects,
        });
    }
    info!(
        steps = steps.len(),
        pairing = ?coordinator.pairing_status(),
        "replay complete"
    );
    Ok(ReplayOutcome {
        steps,
        layers: store.layers().to_vec(),
    })
}
