use thiserror::Error;

use crate::config::{ConfigError, ScheduleConfig};
use crate::grid::{AgendaGrid, GridProjector};
use crate::render::{Artifact, ArtifactFormat, RenderError, Renderer};
use crate::settings::AgendaSettings;
use crate::sink::{ArtifactSink, Delivery, SinkFailure};
use crate::timeline::TimelineBuilder;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Sink(#[from] SinkFailure),
}

impl GenerationError {
    /// Only delivery failures are worth retrying; the grid is still valid.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GenerationError::Sink(_))
    }
}

/// Validate the config, merge sessions with breaks and expand across days.
pub fn compose(config: &ScheduleConfig) -> Result<AgendaGrid, ConfigError> {
    if let Err(err) = config.validate() {
        tracing::warn!(error = %err, "agenda config rejected");
        return Err(err);
    }
    let timeline = TimelineBuilder::new(&config.slots, &config.breaks).build();
    GridProjector::new(config).project(&timeline)
}

/// A composed agenda that can be rendered and delivered any number of times.
#[derive(Debug, Clone)]
pub struct Generation {
    grid: AgendaGrid,
}

impl Generation {
    pub fn compose(config: &ScheduleConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            grid: compose(config)?,
        })
    }

    pub fn grid(&self) -> &AgendaGrid {
        &self.grid
    }

    pub fn into_grid(self) -> AgendaGrid {
        self.grid
    }

    pub fn render(&self, renderer: &dyn Renderer) -> Result<Artifact, RenderError> {
        renderer.render(&self.grid)
    }

    pub fn render_format(
        &self,
        format: ArtifactFormat,
        settings: &AgendaSettings,
    ) -> Result<Artifact, RenderError> {
        let renderer = format.renderer(settings)?;
        self.render(renderer.as_ref())
    }

    pub fn deliver(
        &self,
        renderer: &dyn Renderer,
        sink: &dyn ArtifactSink,
    ) -> Result<Delivery, GenerationError> {
        let artifact = self.render(renderer)?;
        sink.deliver(&artifact).map_err(|err| {
            tracing::warn!(format = %artifact.format, error = %err, "artifact delivery failed");
            GenerationError::from(err)
        })
    }
}

/// One full cycle: compose, render in `format`, deliver to `sink`.
pub fn generate(
    config: &ScheduleConfig,
    format: ArtifactFormat,
    settings: &AgendaSettings,
    sink: &dyn ArtifactSink,
) -> Result<Delivery, GenerationError> {
    let generation = Generation::compose(config)?;
    let renderer = format.renderer(settings)?;
    generation.deliver(renderer.as_ref(), sink)
}
