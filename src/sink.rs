use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::render::{Artifact, ArtifactFormat};

#[derive(Debug, Error)]
pub enum SinkFailure {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("sink rejected the {format} artifact: {reason}")]
    Rejected {
        format: ArtifactFormat,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub location: String,
    pub bytes: usize,
}

/// Final destination of a rendered artifact.
pub trait ArtifactSink {
    fn deliver(&self, artifact: &Artifact) -> Result<Delivery, SinkFailure>;
}

pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/<stem>.<extension of format>`
    pub fn for_format(dir: impl AsRef<Path>, stem: &str, format: ArtifactFormat) -> Self {
        Self::new(dir.as_ref().join(format!("{stem}.{}", format.extension())))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_failure(&self, source: io::Error) -> SinkFailure {
        SinkFailure::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ArtifactSink for FileSink {
    fn deliver(&self, artifact: &Artifact) -> Result<Delivery, SinkFailure> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_failure(e))?;
        }
        let bytes = artifact.to_bytes();
        fs::write(&self.path, &bytes).map_err(|e| self.io_failure(e))?;
        tracing::info!(
            path = %self.path.display(),
            format = %artifact.format,
            bytes = bytes.len(),
            "artifact written"
        );
        Ok(Delivery {
            location: self.path.display().to_string(),
            bytes: bytes.len(),
        })
    }
}

/// Keeps delivered artifacts in memory, in delivery order.
#[derive(Default)]
pub struct MemorySink {
    delivered: RefCell<Vec<Artifact>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> Vec<Artifact> {
        self.delivered.borrow().clone()
    }

    pub fn take(&self) -> Vec<Artifact> {
        self.delivered.take()
    }
}

impl ArtifactSink for MemorySink {
    fn deliver(&self, artifact: &Artifact) -> Result<Delivery, SinkFailure> {
        let bytes = artifact.to_bytes().len();
        let mut delivered = self.delivered.borrow_mut();
        delivered.push(artifact.clone());
        Ok(Delivery {
            location: format!("memory:{}", delivered.len()),
            bytes,
        })
    }
}
