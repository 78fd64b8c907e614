use std::fmt;
use std::str::FromStr;

use polars::prelude::PolarsError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::{AgendaGrid, ShapeError};
use crate::settings::AgendaSettings;

pub mod csv;
pub mod document;
pub mod html;
pub mod table;

pub use self::csv::CsvRenderer;
pub use document::StyledDocumentRenderer;
pub use html::HtmlPreviewRenderer;
pub use table::{PageBreakPolicy, TableDocument, TablePage, TableRenderer};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("malformed agenda grid: {0}")]
    MalformedIr(#[from] ShapeError),
    #[error("template error: {0}")]
    Template(String),
    #[error("table error: {0}")]
    Table(#[from] PolarsError),
    #[error("csv error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("encoding error: {0}")]
    Encoding(String),
    #[error("invalid page policy: {0}")]
    InvalidPolicy(String),
}

impl From<handlebars::TemplateError> for RenderError {
    fn from(value: handlebars::TemplateError) -> Self {
        Self::Template(value.to_string())
    }
}

impl From<handlebars::RenderError> for RenderError {
    fn from(value: handlebars::RenderError) -> Self {
        Self::Template(value.to_string())
    }
}

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactFormat {
    HtmlPreview,
    Table,
    StyledDocument,
    Csv,
}

impl ArtifactFormat {
    pub const ALL: [ArtifactFormat; 4] = [
        ArtifactFormat::HtmlPreview,
        ArtifactFormat::Table,
        ArtifactFormat::StyledDocument,
        ArtifactFormat::Csv,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactFormat::HtmlPreview => "html",
            ArtifactFormat::Table => "table",
            ArtifactFormat::StyledDocument => "doc",
            ArtifactFormat::Csv => "csv",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactFormat::HtmlPreview => "html",
            ArtifactFormat::Table => "txt",
            ArtifactFormat::StyledDocument => "doc",
            ArtifactFormat::Csv => "csv",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            ArtifactFormat::HtmlPreview => "text/html; charset=utf-8",
            ArtifactFormat::Table => "text/plain; charset=utf-8",
            ArtifactFormat::StyledDocument => "application/msword",
            ArtifactFormat::Csv => "text/csv; charset=utf-8",
        }
    }

    pub fn renderer(&self, settings: &AgendaSettings) -> RenderResult<Box<dyn Renderer>> {
        Ok(match self {
            ArtifactFormat::HtmlPreview => Box::new(HtmlPreviewRenderer::new()?),
            ArtifactFormat::Table => Box::new(TableRenderer::new(settings.page.clone())?),
            ArtifactFormat::StyledDocument => Box::new(StyledDocumentRenderer::new()?),
            ArtifactFormat::Csv => Box::new(CsvRenderer),
        })
    }
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown format '{0}' (expected html, table, doc or csv)")]
pub struct UnknownFormat(pub String);

impl FromStr for ArtifactFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" | "preview" => Ok(ArtifactFormat::HtmlPreview),
            "table" | "txt" | "pdf" => Ok(ArtifactFormat::Table),
            "doc" | "word" => Ok(ArtifactFormat::StyledDocument),
            "csv" => Ok(ArtifactFormat::Csv),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ArtifactBody {
    Text(String),
    Paged(TableDocument),
}

/// A rendered view of one grid.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub format: ArtifactFormat,
    pub body: ArtifactBody,
}

impl Artifact {
    pub fn text(format: ArtifactFormat, text: String) -> Self {
        Self {
            format,
            body: ArtifactBody::Text(text),
        }
    }

    pub fn encode(&self) -> String {
        match &self.body {
            ArtifactBody::Text(text) => text.clone(),
            ArtifactBody::Paged(document) => document.to_text(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode().into_bytes()
    }

    pub fn as_table(&self) -> Option<&TableDocument> {
        match &self.body {
            ArtifactBody::Paged(document) => Some(document),
            ArtifactBody::Text(_) => None,
        }
    }
}

/// Presentation-only view of an [`AgendaGrid`]. Implementations must keep
/// row order and day columns exactly as given.
pub trait Renderer {
    fn format(&self) -> ArtifactFormat;
    fn render(&self, grid: &AgendaGrid) -> RenderResult<Artifact>;
}
