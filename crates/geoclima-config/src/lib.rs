//! Configuration loading for the range pickers.

pub mod available;
pub mod error;
pub mod loaders;
pub mod map;
pub mod picker;
pub mod table;

pub use available::{
    AvailableDatesResponse, AvailableDatesRow, default_bounds, default_first_available_date,
    parse_available_dates,
};
pub use error::{ConfigError, Result};
pub use loaders::{
    DocumentFormat, load_available_dates, load_map_config, load_plugins_config, parse_document,
    read_document,
};
pub use map::{MapConfig, MapSection};
pub use picker::{PickerConfig, PluginsConfig};
pub use table::{TableIssue, check_period_table};
