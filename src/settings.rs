use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::render::PageBreakPolicy;

pub const SETTINGS_PATH_VAR: &str = "AGENDA_TOOL_SETTINGS";
pub const HTTP_ADDR_VAR: &str = "AGENDA_TOOL_HTTP_ADDR";
pub const OUTPUT_DIR_VAR: &str = "AGENDA_TOOL_OUTPUT_DIR";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize settings for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Tool-wide knobs that are not part of an agenda itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgendaSettings {
    pub page: PageBreakPolicy,
    pub output_dir: PathBuf,
    pub file_stem: String,
    pub http_addr: String,
}

impl Default for AgendaSettings {
    fn default() -> Self {
        Self {
            page: PageBreakPolicy::default(),
            output_dir: PathBuf::from("."),
            file_stem: "agenda".to_string(),
            http_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl AgendaSettings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&raw).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.page.validate().map_err(SettingsError::Invalid)?;
        if self.file_stem.trim().is_empty() {
            return Err(SettingsError::Invalid("file_stem must not be empty".into()));
        }
        Ok(())
    }

    /// Resolution order: environment variable, then settings file named by
    /// [`SETTINGS_PATH_VAR`], then defaults.
    pub fn resolve_with<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match lookup(SETTINGS_PATH_VAR) {
            Some(path) if !path.trim().is_empty() => Self::load(path.trim())?,
            _ => Self::default(),
        };
        if let Some(addr) = lookup(HTTP_ADDR_VAR) {
            settings.http_addr = addr;
        }
        if let Some(dir) = lookup(OUTPUT_DIR_VAR) {
            settings.output_dir = PathBuf::from(dir);
        }
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_env() -> Result<Self, SettingsError> {
        Self::resolve_with(|key| std::env::var(key).ok())
    }
}

/// Install the stderr log subscriber used by the binaries. `RUST_LOG`
/// overrides the given default filter.
#[cfg(any(feature = "cli_api", feature = "http_api"))]
pub fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    // A second install (e.g. from tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
