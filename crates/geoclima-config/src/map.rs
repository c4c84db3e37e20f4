//! Map configuration documents (`{ "map": { "layers": [...] } }`).

use serde::{Deserialize, Serialize};

use geoclima_core::VariableCatalog;
use geoclima_model::LayerRef;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default)]
    pub map: MapSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSection {
    #[serde(default)]
    pub layers: Vec<LayerRef>,
}

impl MapConfig {
    pub fn layers(&self) -> &[LayerRef] {
        &self.map.layers
    }

    pub fn into_layers(self) -> Vec<LayerRef> {
        self.map.layers
    }

    /// Layers the pickers drive: catalogued and carrying a map file.
    pub fn driven_layers<'a>(&'a self, catalog: &'a VariableCatalog) -> impl Iterator<Item = &'a LayerRef> {
        self.map
            .layers
            .iter()
            .filter(|layer| catalog.matches(layer) && layer.map_file().is_some())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use geoclima_core::NameMatch;

    use super::*;

    #[test]
    fn reads_map_store_shape() {
        let config: MapConfig = serde_json::from_str(
            r#"{
                "version": 2,
                "map": {
                    "center": { "x": 11.0, "y": 43.5 },
                    "layers": [
                        { "id": "osm", "name": "OpenStreetMap", "group": "background" },
                        { "id": "prec", "name": "Pioggia_Cumulata", "title": "Pioggia cumulata",
                          "params": { "map": "/srv/geoclima/prec_10.map",
                                      "fromData": "2024-06-10", "toData": "2024-06-25" } }
                    ]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.layers().len(), 2);
        let catalog = VariableCatalog::new(
            BTreeMap::from([("precipitazione".to_string(), vec!["Pioggia_Cumulata".to_string()])]),
            NameMatch::Exact,
        );
        let driven: Vec<&str> = config.driven_layers(&catalog).map(|layer| layer.id.as_str()).collect();
        assert_eq!(driven, vec!["prec"]);
    }
}
