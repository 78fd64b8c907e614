use super::ScheduleConfig;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid agenda document: {0}")]
    Parse(#[from] serde_json::Error),
}

pub fn config_from_json_str(input: &str) -> Result<ScheduleConfig, ConfigFileError> {
    Ok(serde_json::from_str(input)?)
}

/// Read a draft from disk. The result is not validated; generation does that.
pub fn load_config_from_json<P: AsRef<Path>>(path: P) -> Result<ScheduleConfig, ConfigFileError> {
    let file = File::open(path.as_ref())?;
    let config: ScheduleConfig = serde_json::from_reader(BufReader::new(file))?;
    tracing::debug!(
        path = %path.as_ref().display(),
        slots = config.slots.len(),
        breaks = config.breaks.len(),
        "loaded agenda draft"
    );
    Ok(config)
}
