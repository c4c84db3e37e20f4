//! CLI argument definitions for `geoclima-range`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use geoclima_model::WidgetId;

#[derive(Parser)]
#[command(
    name = "geoclima-range",
    version,
    about = "Date-range pickers for time-bounded map layers",
    long_about = "Inspect period tables, validate date ranges and compute the layer\n\
                  updates the fixed and free range pickers would apply.\n\n\
                  Dates use the picker's configured timeUnit (YYYY-MM-DD by default)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show a picker's period table and any problems with it.
    Periods(PeriodsArgs),

    /// Bucket the whole-day span between two dates.
    Bucket(BucketArgs),

    /// Check a range against the available dates.
    Validate(ValidateArgs),

    /// Compute the layer updates for a range.
    Apply(ApplyArgs),

    /// Run a scripted list of actions through the coordinator.
    Replay(ReplayArgs),
}

/// Plugin configuration and picker selection shared by most commands.
#[derive(Args)]
pub struct PickerArgs {
    /// Plugin configuration file (.json or .toml).
    #[arg(long = "config", value_name = "FILE")]
    pub config: PathBuf,

    /// Picker whose settings are used (default: the first configured).
    #[arg(long = "picker", value_enum)]
    pub picker: Option<PickerArg>,
}

#[derive(Args)]
pub struct PeriodsArgs {
    #[command(flatten)]
    pub picker: PickerArgs,
}

#[derive(Args)]
pub struct BucketArgs {
    #[command(flatten)]
    pub picker: PickerArgs,

    #[arg(long = "from", value_name = "DATE")]
    pub from: String,

    #[arg(long = "to", value_name = "DATE")]
    pub to: String,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// First available date.
    #[arg(long = "first", value_name = "DATE")]
    pub first: String,

    /// Last available date.
    #[arg(long = "last", value_name = "DATE")]
    pub last: String,

    /// Start of the range; omitted or unreadable counts as invalid.
    #[arg(long = "from", value_name = "DATE")]
    pub from: Option<String>,

    #[arg(long = "to", value_name = "DATE")]
    pub to: Option<String>,

    /// Date pattern of all four dates.
    #[arg(long = "time-unit", value_name = "PATTERN", default_value = "YYYY-MM-DD")]
    pub time_unit: String,
}

/// Where the available dates come from when no fetch is possible.
#[derive(Args)]
pub struct BoundsArgs {
    /// Saved available-dates service response.
    #[arg(long = "available", value_name = "FILE")]
    pub available: Option<PathBuf>,

    /// Reference day for the default bounds (default: today).
    #[arg(long = "today", value_name = "DATE")]
    pub today: Option<String>,
}

#[derive(Args)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub picker: PickerArgs,

    /// Map configuration holding the layer list.
    #[arg(long = "map", value_name = "FILE")]
    pub map: PathBuf,

    #[arg(long = "to", value_name = "DATE")]
    pub to: String,

    /// Start of a free range; without it the period length sets the start.
    #[arg(long = "from", value_name = "DATE")]
    pub from: Option<String>,

    /// Period key of a fixed range (default: the table's default).
    #[arg(long = "period", value_name = "KEY")]
    pub period: Option<String>,

    #[command(flatten)]
    pub bounds: BoundsArgs,

    /// Print the plan as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct ReplayArgs {
    /// Plugin configuration file (.json or .toml).
    #[arg(long = "config", value_name = "FILE")]
    pub config: PathBuf,

    /// Map configuration holding the initial layer list.
    #[arg(long = "map", value_name = "FILE")]
    pub map: PathBuf,

    /// JSON list of actions.
    #[arg(long = "events", value_name = "FILE")]
    pub events: PathBuf,

    /// Reference day for the default bounds (default: today).
    #[arg(long = "today", value_name = "DATE")]
    pub today: Option<String>,

    /// Print the effects as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PickerArg {
    Fixed,
    Free,
    Chart,
}

impl From<PickerArg> for WidgetId {
    fn from(value: PickerArg) -> Self {
        match value {
            PickerArg::Fixed => WidgetId::FixedRange,
            PickerArg::Free => WidgetId::FreeRange,
            PickerArg::Chart => WidgetId::InfoChart,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
