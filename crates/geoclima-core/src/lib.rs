//! Date-range coordination for time-bounded map layers.
//!
//! The pure parts (validation, bucketing, map file rewriting, propagation)
//! are usable on their own; [`RangeCoordinator`] wires them to the widget
//! lifecycle, the arbitration gate and the bounds/configuration pairing.

pub mod arbitration;
pub mod catalog;
pub mod coordinator;
pub mod error;
pub mod lifecycle;
pub mod mapfile;
pub mod merge;
pub mod period;
pub mod propagate;
pub mod scheduler;
pub mod store;
pub mod synthesize;
pub mod validator;

pub use arbitration::{Handoff, HandoffSources, PluginStates, handoff, loaded_sibling, should_fetch};
pub use catalog::{NameMatch, VariableCatalog};
pub use coordinator::RangeCoordinator;
pub use error::SynthesisError;
pub use lifecycle::{Activation, RangeWidget, Selection, WidgetConfig};
pub use mapfile::{MapFileName, MapFileToken, rename_with_date, retitle_with_date};
pub use merge::{MergeCoordinator, PairingStatus};
pub use period::{default_period, find_period, period_for_range, period_for_span, period_keys};
pub use propagate::{propagate, summarize};
pub use scheduler::{EventQueue, GenerationTracker, Ticket, Trigger};
pub use store::{InMemoryLayerStore, LayerStore};
pub use synthesize::{
    AddressingMode, ParamSet, PeriodSelection, SynthesisContext, SynthesizedMap, fixed_range,
    synthesize, synthesize_params,
};
pub use validator::{check_date_range, validate_date_range};
