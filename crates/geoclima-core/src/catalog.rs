//! Catalogue of layer names the range pickers drive.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use geoclima_model::LayerRef;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameMatch {
    #[default]
    Exact,
    /// A layer matches when its name starts with a catalogued name.
    Prefix,
}

/// Groups of variable-layer names (precipitation, temperature, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableCatalog {
    groups: BTreeMap<String, Vec<String>>,
    matching: NameMatch,
}

impl VariableCatalog {
    pub fn new(groups: BTreeMap<String, Vec<String>>, matching: NameMatch) -> Self {
        Self { groups, matching }
    }

    pub fn matching(&self) -> NameMatch {
        self.matching
    }

    pub fn groups(&self) -> &BTreeMap<String, Vec<String>> {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.values().flatten().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        match self.matching {
            NameMatch::Exact => self.names().any(|known| known == name),
            NameMatch::Prefix => self.names().any(|known| name.starts_with(known)),
        }
    }

    pub fn matches(&self, layer: &LayerRef) -> bool {
        self.contains(&layer.name)
    }

    /// The first visible catalogued layer carrying request dates.
    pub fn first_dated_layer<'a>(&self, layers: &'a [LayerRef]) -> Option<&'a LayerRef> {
        layers.iter().find(|layer| {
            layer.visibility
                && self.matches(layer)
                && layer
                    .params
                    .as_ref()
                    .is_some_and(|params| params.to_data.is_some())
        })
    }
}
