use std::path::PathBuf;

use geoclima_model::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse available-dates response: {source}")]
    Response {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid picker '{picker}': {source}")]
    Picker {
        picker: String,
        #[source]
        source: ModelError,
    },

    #[error("picker '{picker}' has no period types")]
    EmptyPeriodTable { picker: String },

    #[error("no range picker is configured")]
    NoPickers,
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
