pub mod action;
pub mod date;
pub mod error;
pub mod layer;
pub mod period;
pub mod plugin;
pub mod validation;

pub use action::{
    Action, BoundsEvent, CombinedConfigEvent, ConfigEvent, Effect, FetchRequest, FetchSettings,
};
pub use date::{
    AvailableDateBounds, DateFormat, DateRange, ISO_DATE_PATTERN, calendar_day_in, days_before,
    month_before, whole_days,
};
pub use error::{ModelError, Result};
pub use layer::{LayerParams, LayerPatch, LayerRef, UpdateInstruction};
pub use period::{PeriodKey, PeriodType};
pub use plugin::{PluginState, RangeManager, WidgetId};
pub use validation::{ERROR_MESSAGE_PREFIX, RangeErrorKind, ValidationResult};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_instructions_serialize_tagged() {
        let instruction = UpdateInstruction::UpdateNode {
            layer_id: "prec".to_string(),
            patch: LayerPatch {
                params: LayerParams {
                    map: Some("prec_10.map".to_string()),
                    from_data: Some("2024-06-10".to_string()),
                    to_data: Some("2024-06-25".to_string()),
                },
                ..LayerPatch::default()
            },
        };
        let json = serde_json::to_value(&instruction).expect("serialize instruction");
        assert_eq!(json["type"], "update_node");
        assert_eq!(json["layer_id"], "prec");
        assert_eq!(json["patch"]["params"]["fromData"], "2024-06-10");
        assert!(json["patch"].get("name").is_none());
        let round: UpdateInstruction = serde_json::from_value(json).expect("deserialize");
        assert_eq!(round, instruction);
    }

    #[test]
    fn layer_without_map_has_no_map_file() {
        let layer: LayerRef = serde_json::from_str(
            r#"{ "id": "a", "name": "Pioggia_Cumulata", "params": { "fromData": "x" } }"#,
        )
        .expect("layer");
        assert!(layer.visibility);
        assert_eq!(layer.map_file(), None);
        assert_eq!(
            LayerRef::new("b", "spi3").with_map("spi3_30.map").map_file(),
            Some("spi3_30.map")
        );
    }
}
