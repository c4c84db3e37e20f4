//! Layer references owned by the external layer tree and the update
//! instructions proposed for them.

use serde::{Deserialize, Serialize};

/// Request parameters of a time-bounded map layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_data: Option<String>,
}

/// A node of the layer tree as seen by the range pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerRef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_visibility")]
    pub visibility: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<LayerParams>,
}

fn default_visibility() -> bool {
    true
}

impl LayerRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            title: None,
            description: None,
            visibility: true,
            params: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_map(mut self, map: impl Into<String>) -> Self {
        self.params.get_or_insert_with(LayerParams::default).map = Some(map.into());
        self
    }

    #[must_use]
    pub fn with_dates(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        let params = self.params.get_or_insert_with(LayerParams::default);
        params.from_data = Some(from.into());
        params.to_data = Some(to.into());
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visibility = false;
        self
    }

    /// The map file reference, when the layer carries one.
    pub fn map_file(&self) -> Option<&str> {
        self.params
            .as_ref()
            .and_then(|params| params.map.as_deref())
            .filter(|map| !map.is_empty())
    }
}

/// Changes proposed for a single layer node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub params: LayerParams,
}

/// Instruction for the external layer store.
///
/// Propagation always emits `UpdateSettings` before the `UpdateNode` of the
/// same layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpdateInstruction {
    /// Update the shared "current settings" projection.
    UpdateSettings { params: LayerParams },
    /// Update the parameters (and possibly names) of one layer node.
    UpdateNode { layer_id: String, patch: LayerPatch },
}

impl UpdateInstruction {
    pub fn layer_id(&self) -> Option<&str> {
        match self {
            Self::UpdateSettings { .. } => None,
            Self::UpdateNode { layer_id, .. } => Some(layer_id),
        }
    }
}
