//! Reading configuration documents from disk.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use geoclima_model::{AvailableDateBounds, DateFormat};

use crate::available::parse_available_dates;
use crate::error::{ConfigError, Result};
use crate::map::MapConfig;
use crate::picker::PluginsConfig;

/// Syntax of a configuration document, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// `.toml` files are TOML, everything else is JSON.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

pub fn parse_document<T: DeserializeOwned>(text: &str, format: DocumentFormat, path: &Path) -> Result<T> {
    match format {
        DocumentFormat::Json => serde_json::from_str(text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        }),
        DocumentFormat::Toml => toml::from_str(text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::io(path, source))?;
    let format = DocumentFormat::for_path(path);
    debug!(path = %path.display(), ?format, "reading configuration");
    parse_document(&text, format, path)
}

pub fn load_plugins_config(path: &Path) -> Result<PluginsConfig> {
    read_document(path)
}

pub fn load_map_config(path: &Path) -> Result<MapConfig> {
    read_document(path)
}

/// Read a saved available-dates service response.
pub fn load_available_dates(
    path: &Path,
    format: &DateFormat,
    fallback: AvailableDateBounds,
) -> Result<AvailableDateBounds> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::io(path, source))?;
    parse_available_dates(&text, format, fallback)
}
