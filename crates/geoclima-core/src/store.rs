//! The external layer store contract and an in-memory implementation.

use tracing::{debug, warn};

use geoclima_model::{LayerParams, LayerPatch, LayerRef, UpdateInstruction};

/// Layer tree owned by the host.
pub trait LayerStore {
    fn layers(&self) -> &[LayerRef];

    fn apply(&mut self, instruction: &UpdateInstruction);

    /// Replace the layer list after a map configuration load.
    fn load_layers(&mut self, layers: Vec<LayerRef>);
}

/// Layer tree kept in memory, with the shared "current settings" projection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryLayerStore {
    layers: Vec<LayerRef>,
    settings: LayerParams,
    applied: usize,
}

impl InMemoryLayerStore {
    pub fn new(layers: Vec<LayerRef>) -> Self {
        Self {
            layers,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &LayerParams {
        &self.settings
    }

    pub fn layer(&self, id: &str) -> Option<&LayerRef> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    /// Number of instructions applied so far.
    pub fn applied(&self) -> usize {
        self.applied
    }
}

fn merge_params(target: &mut LayerParams, update: &LayerParams) {
    if let Some(map) = &update.map {
        target.map = Some(map.clone());
    }
    if let Some(from) = &update.from_data {
        target.from_data = Some(from.clone());
    }
    if let Some(to) = &update.to_data {
        target.to_data = Some(to.clone());
    }
}

fn merge_patch(layer: &mut LayerRef, patch: &LayerPatch) {
    if let Some(name) = &patch.name {
        layer.name.clone_from(name);
    }
    if let Some(title) = &patch.title {
        layer.title = Some(title.clone());
    }
    if let Some(description) = &patch.description {
        layer.description = Some(description.clone());
    }
    merge_params(layer.params.get_or_insert_with(LayerParams::default), &patch.params);
}

impl LayerStore for InMemoryLayerStore {
    fn layers(&self) -> &[LayerRef] {
        &self.layers
    }

    fn apply(&mut self, instruction: &UpdateInstruction) {
        self.applied += 1;
        match instruction {
            UpdateInstruction::UpdateSettings { params } => merge_params(&mut self.settings, params),
            UpdateInstruction::UpdateNode { layer_id, patch } => {
                match self.layers.iter_mut().find(|layer| &layer.id == layer_id) {
                    Some(layer) => {
                        merge_patch(layer, patch);
                        debug!(layer = %layer_id, "layer updated");
                    }
                    None => warn!(layer = %layer_id, "update for unknown layer ignored"),
                }
            }
        }
    }

    fn load_layers(&mut self, layers: Vec<LayerRef>) {
        debug!(count = layers.len(), "layers loaded");
        self.layers = layers;
    }
}
