//! Range picker plugin configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use geoclima_core::{AddressingMode, NameMatch, RangeCoordinator, VariableCatalog, WidgetConfig};
use geoclima_model::{
    AvailableDateBounds, DateFormat, FetchSettings, ISO_DATE_PATTERN, PeriodType, WidgetId,
};

use crate::error::{ConfigError, Result};
use crate::table::{TableIssue, check_period_table};

fn default_time_unit() -> String {
    ISO_DATE_PATTERN.to_string()
}

/// Configuration of one picker plugin, as written in the host's plugin list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_url_select_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variabile_select_date: Option<String>,
    #[serde(default)]
    pub is_fetch_available_dates: bool,
    /// Layer names carry the end date; names match by prefix.
    #[serde(default)]
    pub check_prefixes: bool,
    #[serde(default)]
    pub show_one_date_picker: bool,
    #[serde(default = "default_time_unit")]
    pub time_unit: String,
    #[serde(default)]
    pub period_types: Vec<PeriodType>,
    #[serde(default)]
    pub variabili_meteo: BTreeMap<String, Vec<String>>,
}

impl PickerConfig {
    pub fn date_format(&self) -> Result<DateFormat> {
        DateFormat::new(self.time_unit.as_str()).map_err(|source| ConfigError::Picker {
            picker: self.display_id(),
            source,
        })
    }

    pub fn display_id(&self) -> String {
        self.id.clone().unwrap_or_else(|| "unnamed".to_string())
    }

    /// Fetch settings when fetching is enabled and fully configured.
    pub fn fetch_settings(&self) -> Option<FetchSettings> {
        if !self.is_fetch_available_dates {
            return None;
        }
        match (&self.default_url_select_date, &self.variabile_select_date) {
            (Some(url), Some(variable)) => Some(FetchSettings {
                variable: variable.clone(),
                url: url.clone(),
            }),
            _ => {
                warn!(picker = %self.display_id(), "fetch enabled without url or variable");
                None
            }
        }
    }

    pub fn catalog(&self) -> VariableCatalog {
        let matching = if self.check_prefixes {
            NameMatch::Prefix
        } else {
            NameMatch::Exact
        };
        VariableCatalog::new(self.variabili_meteo.clone(), matching)
    }

    pub fn widget_config(&self, default_bounds: AvailableDateBounds) -> Result<WidgetConfig> {
        let mut config = WidgetConfig::new(self.period_types.clone(), default_bounds);
        config.format = self.date_format()?;
        config.mode = if self.check_prefixes {
            AddressingMode::Prefix
        } else {
            AddressingMode::Suffix
        };
        config.daily = self.show_one_date_picker;
        config.catalog = self.catalog();
        config.fetch = self.fetch_settings();
        Ok(config)
    }
}

/// The three plugins of the exclusion group; any may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_range_picker: Option<PickerConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_range_picker: Option<PickerConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_chart: Option<PickerConfig>,
}

impl PluginsConfig {
    pub fn picker(&self, widget: WidgetId) -> Option<&PickerConfig> {
        match widget {
            WidgetId::FixedRange => self.fixed_range_picker.as_ref(),
            WidgetId::FreeRange => self.free_range_picker.as_ref(),
            WidgetId::InfoChart => self.info_chart.as_ref(),
        }
    }

    pub fn pickers(&self) -> impl Iterator<Item = (WidgetId, &PickerConfig)> {
        WidgetId::ALL
            .into_iter()
            .filter_map(|widget| self.picker(widget).map(|picker| (widget, picker)))
    }

    /// The configured picker that supplies shared settings (date format,
    /// period table, catalogue): fixed, then free, then the chart.
    pub fn primary(&self) -> Option<(WidgetId, &PickerConfig)> {
        self.pickers().next()
    }

    pub fn table_issues(&self) -> Vec<(WidgetId, TableIssue)> {
        self.pickers()
            .filter(|(widget, _)| widget.range_manager().is_some())
            .flat_map(|(widget, picker)| {
                check_period_table(&picker.period_types)
                    .into_iter()
                    .map(move |issue| (widget, issue))
            })
            .collect()
    }

    pub fn widget_configs(
        &self,
        default_bounds: AvailableDateBounds,
    ) -> Result<Vec<(WidgetId, WidgetConfig)>> {
        if self.pickers().next().is_none() {
            return Err(ConfigError::NoPickers);
        }
        let mut configs = Vec::new();
        for (widget, picker) in self.pickers() {
            if widget.range_manager().is_some() && picker.period_types.is_empty() {
                return Err(ConfigError::EmptyPeriodTable {
                    picker: picker.display_id(),
                });
            }
            let mut config = picker.widget_config(default_bounds)?;
            config.propagates = widget.range_manager().is_some();
            configs.push((widget, config));
        }
        Ok(configs)
    }

    /// A coordinator with every configured widget registered.
    pub fn coordinator(&self, default_bounds: AvailableDateBounds) -> Result<RangeCoordinator> {
        for (widget, issue) in self.table_issues() {
            warn!(%widget, %issue, "period table issue");
        }
        let mut coordinator = RangeCoordinator::new();
        for (widget, config) in self.widget_configs(default_bounds)? {
            coordinator.register(widget, config);
        }
        Ok(coordinator)
    }
}
