//! Fan-out of a parameter set into layer update instructions.

use std::collections::BTreeMap;

use tracing::debug;

use geoclima_model::{Effect, LayerRef, UpdateInstruction, WidgetId};

use crate::synthesize::ParamSet;

/// Update instructions for every layer accepted by `predicate`.
///
/// Each matching layer yields `UpdateSettings` followed by `UpdateNode`,
/// both carrying the same params. Layers without a map file are skipped.
pub fn propagate<F>(layers: &[LayerRef], params: &ParamSet, predicate: F) -> Vec<UpdateInstruction>
where
    F: Fn(&LayerRef) -> bool,
{
    let mut instructions = Vec::new();
    for layer in layers {
        if !predicate(layer) {
            debug!(layer = %layer.id, name = %layer.name, "layer not catalogued, skipped");
            continue;
        }
        let Some(patch) = params.patch_for(layer) else {
            debug!(layer = %layer.id, "layer has no map file, skipped");
            continue;
        };
        instructions.push(UpdateInstruction::UpdateSettings {
            params: patch.params.clone(),
        });
        instructions.push(UpdateInstruction::UpdateNode {
            layer_id: layer.id.clone(),
            patch,
        });
    }
    instructions
}

/// One `RangeApplied` per distinct map file, listing the layers it covers.
pub fn summarize(
    widget: Option<WidgetId>,
    instructions: &[UpdateInstruction],
    params: &ParamSet,
) -> Vec<Effect> {
    let mut by_map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for instruction in instructions {
        if let UpdateInstruction::UpdateNode { layer_id, patch } = instruction {
            let map = patch.params.map.clone().unwrap_or_default();
            by_map.entry(map).or_default().push(layer_id.clone());
        }
    }
    by_map
        .into_iter()
        .map(|(map_file_name, layer_ids)| Effect::RangeApplied {
            widget,
            map_file_name,
            from_formatted: params.from_formatted.clone(),
            to_formatted: params.to_formatted.clone(),
            layer_ids,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use geoclima_model::{DateFormat, DateRange, PeriodType};

    use super::*;
    use crate::synthesize::{AddressingMode, PeriodSelection, SynthesisContext, synthesize_params};

    fn sample_params() -> ParamSet {
        let periods = vec![
            PeriodType::new(1u32, None, 5),
            PeriodType::new(10u32, Some(6), 20).as_default(),
        ];
        let format = DateFormat::iso();
        let context = SynthesisContext {
            periods: &periods,
            format: &format,
            mode: AddressingMode::Suffix,
        };
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 25).unwrap(),
        );
        synthesize_params(range, &PeriodSelection::Free, &context).unwrap()
    }

    #[test]
    fn emits_settings_before_node_for_each_layer() {
        let layers = vec![
            LayerRef::new("a", "prec").with_map("prec_1.map"),
            LayerRef::new("b", "prec_no_map"),
            LayerRef::new("c", "other").with_map("other_1.map"),
            LayerRef::new("d", "tmax").with_map("tmax_1.map"),
        ];
        let instructions = propagate(&layers, &sample_params(), |layer| layer.name != "other");
        assert_eq!(instructions.len(), 4);
        assert!(matches!(instructions[0], UpdateInstruction::UpdateSettings { .. }));
        assert_eq!(instructions[1].layer_id(), Some("a"));
        assert!(matches!(instructions[2], UpdateInstruction::UpdateSettings { .. }));
        assert_eq!(instructions[3].layer_id(), Some("d"));
        if let (
            UpdateInstruction::UpdateSettings { params },
            UpdateInstruction::UpdateNode { patch, .. },
        ) = (&instructions[0], &instructions[1])
        {
            assert_eq!(params, &patch.params);
            assert_eq!(params.map.as_deref(), Some("prec_10.map"));
        } else {
            panic!("unexpected instruction order");
        }
    }

    #[test]
    fn summary_groups_layers_by_map_file() {
        let layers = vec![
            LayerRef::new("a", "prec").with_map("shared_1.map"),
            LayerRef::new("b", "prec2").with_map("shared_1.map"),
            LayerRef::new("c", "tmax").with_map("tmax_1.map"),
        ];
        let params = sample_params();
        let instructions = propagate(&layers, &params, |_| true);
        let effects = summarize(Some(WidgetId::FreeRange), &instructions, &params);
        assert_eq!(effects.len(), 2);
        match &effects[0] {
            Effect::RangeApplied {
                map_file_name,
                layer_ids,
                from_formatted,
                ..
            } => {
                assert_eq!(map_file_name, "shared_10.map");
                assert_eq!(layer_ids, &vec!["a".to_string(), "b".to_string()]);
                assert_eq!(from_formatted, "2024-06-10");
            }
            other => panic!("unexpected effect {other:?}"),
        }
    }
}
