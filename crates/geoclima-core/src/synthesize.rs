//! Derivation of map-service parameters from a selected range.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use geoclima_model::{
    DateFormat, DateRange, LayerParams, LayerPatch, LayerRef, PeriodKey, PeriodType,
};

use crate::error::{Result, SynthesisError};
use crate::mapfile::{MapFileName, rename_with_date, retitle_with_date};
use crate::period::{find_period, period_for_range, period_keys};

/// Map file naming convention of the configured layers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressingMode {
    /// The file name carries a period code.
    #[default]
    Suffix,
    /// Name, title and file name carry the end date and its year.
    Prefix,
}

/// How the period code of a range is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodSelection {
    /// Explicit choice from the fixed-range picker.
    Fixed(PeriodKey),
    /// Bucketed from the whole-day span.
    Free,
    /// Single end date; map file names are left as they are.
    Daily,
}

/// Static inputs shared by every synthesis.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisContext<'a> {
    pub periods: &'a [PeriodType],
    pub format: &'a DateFormat,
    pub mode: AddressingMode,
}

/// The range as fixed-range pickers express it: `period.max` days ending at `to`.
pub fn fixed_range(to: NaiveDate, period: &PeriodType) -> DateRange {
    DateRange::ending_at(to, period.max)
}

/// A validated range turned into everything propagation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSet {
    pub range: DateRange,
    /// Code substituted into map file names; `None` keeps names unchanged.
    pub period: Option<PeriodKey>,
    pub from_formatted: String,
    pub to_formatted: String,
    mode: AddressingMode,
    known_codes: Vec<PeriodKey>,
    format: DateFormat,
}

impl ParamSet {
    pub fn mode(&self) -> AddressingMode {
        self.mode
    }

    /// The map file reference after applying this range to `existing`.
    pub fn map_file_for(&self, existing: &str) -> String {
        let parsed = MapFileName::parse(existing);
        match self.mode {
            AddressingMode::Suffix => {
                let Some(code) = &self.period else {
                    return existing.to_string();
                };
                match parsed.with_period_code(code, &self.known_codes) {
                    Some(updated) => updated.to_string(),
                    None => {
                        debug!(map = existing, code = %code, "map file carries no period code");
                        existing.to_string()
                    }
                }
            }
            AddressingMode::Prefix => parsed
                .with_year(self.range.to.year())
                .with_date(&self.to_formatted)
                .to_string(),
        }
    }

    /// New request parameters for `layer`, or `None` when it has no map file.
    ///
    /// In prefix mode only the map reference is sent; the dates travel in
    /// the renamed layer instead.
    pub fn layer_params(&self, layer: &LayerRef) -> Option<LayerParams> {
        let map = layer.map_file()?;
        let map = Some(self.map_file_for(map));
        Some(match self.mode {
            AddressingMode::Suffix => LayerParams {
                map,
                from_data: Some(self.from_formatted.clone()),
                to_data: Some(self.to_formatted.clone()),
            },
            AddressingMode::Prefix => LayerParams {
                map,
                ..LayerParams::default()
            },
        })
    }

    /// Node patch for `layer`: new params plus, in prefix mode, the
    /// date-stamped name, title and description.
    pub fn patch_for(&self, layer: &LayerRef) -> Option<LayerPatch> {
        let params = self.layer_params(layer)?;
        let mut patch = LayerPatch {
            params,
            ..LayerPatch::default()
        };
        if self.mode == AddressingMode::Prefix {
            let title = retitle_with_date(
                layer.title.as_deref().unwrap_or(&layer.name),
                &self.to_formatted,
            );
            patch.name = Some(rename_with_date(&layer.name, &self.to_formatted, &self.format));
            patch.description = Some(title.clone());
            patch.title = Some(title);
        }
        Some(patch)
    }
}

/// Turn a range and a period selection into a parameter set.
///
/// Free selections are bucketed in suffix mode only; prefix-mode names carry
/// no period code.
pub fn synthesize_params(
    range: DateRange,
    selection: &PeriodSelection,
    context: &SynthesisContext<'_>,
) -> Result<ParamSet> {
    let period = match (selection, context.mode) {
        (PeriodSelection::Fixed(key), _) => Some(find_period(context.periods, key)?.key.clone()),
        (PeriodSelection::Free, AddressingMode::Suffix) => {
            if context.periods.is_empty() {
                return Err(SynthesisError::EmptyPeriodTable);
            }
            Some(period_for_range(&range, context.periods)?.key.clone())
        }
        (PeriodSelection::Free | PeriodSelection::Daily, _) => None,
    };
    Ok(ParamSet {
        range,
        period,
        from_formatted: context.format.format(range.from),
        to_formatted: context.format.format(range.to),
        mode: context.mode,
        known_codes: period_keys(context.periods),
        format: context.format.clone(),
    })
}

/// What a single map file becomes under a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizedMap {
    pub map_file_name: String,
    pub from_formatted: String,
    pub to_formatted: String,
}

pub fn synthesize(
    existing_map_file_name: &str,
    range: DateRange,
    selection: &PeriodSelection,
    context: &SynthesisContext<'_>,
) -> Result<SynthesizedMap> {
    let params = synthesize_params(range, selection, context)?;
    Ok(SynthesizedMap {
        map_file_name: params.map_file_for(existing_map_file_name),
        from_formatted: params.from_formatted,
        to_formatted: params.to_formatted,
    })
}
