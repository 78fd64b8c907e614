pub mod clock;
pub mod config;
pub mod grid;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod pipeline;
pub mod render;
pub mod settings;
pub mod sink;
pub mod timeline;

pub use config::{
    Break, ConfigError, ConfigFileError, DayContent, MAX_DAYS, ScheduleConfig, Slot,
    config_from_json_str, load_config_from_json,
};
pub use grid::{AgendaGrid, GridCell, GridProjector, GridRow, RowKind, ShapeError, project_dates};
pub use pipeline::{Generation, GenerationError, compose, generate};
pub use render::{
    Artifact, ArtifactBody, ArtifactFormat, CsvRenderer, HtmlPreviewRenderer, PageBreakPolicy,
    RenderError, Renderer, StyledDocumentRenderer, TableDocument, TableRenderer, UnknownFormat,
};
pub use settings::{AgendaSettings, SettingsError};
pub use sink::{ArtifactSink, Delivery, FileSink, MemorySink, SinkFailure};
pub use timeline::{Event, Timeline, TimelineBuilder};
