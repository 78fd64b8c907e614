use handlebars::Handlebars;
use serde::Serialize;

use super::{Artifact, ArtifactFormat, RenderResult, Renderer};
use crate::grid::{AgendaGrid, GridCell, RowKind};

const PREVIEW_TEMPLATE: &str = "preview";

const PREVIEW_SOURCE: &str = r#"<section class="agenda-preview">
  <header>
    <h2 class="agenda-title">{{title}}</h2>
    {{#if subtitle}}<p class="agenda-subtitle">{{subtitle}}</p>{{/if}}
    <p class="agenda-dates">{{date_range}}</p>
  </header>
  <table class="agenda-table">
    <thead>
      <tr><th class="time-head">Time</th>{{#each days}}<th class="day-head">{{this}}</th>{{/each}}</tr>
    </thead>
    <tbody>
{{#each rows}}
      <tr class="{{#if is_break}}break-row{{else}}session-row{{/if}}">
        <td class="time">{{time_label}}</td>
{{#each cells}}
        {{#if is_break}}<td class="break"><span class="break-name">{{heading}}</span></td>{{else}}<td class="session"><h4 class="session-title">{{heading}}</h4>{{#if bullets}}<ul>{{#each bullets}}<li>{{this}}</li>{{/each}}</ul>{{/if}}{{#if trainer}}<p class="trainer">Trainer: {{trainer}}</p>{{/if}}</td>{{/if}}
{{/each}}
      </tr>
{{/each}}
    </tbody>
  </table>
</section>
"#;

#[derive(Serialize)]
pub(crate) struct CellView<'a> {
    pub is_break: bool,
    pub heading: &'a str,
    pub bullets: &'a [String],
    pub trainer: &'a str,
}

#[derive(Serialize)]
pub(crate) struct RowView<'a> {
    pub time_label: &'a str,
    pub is_break: bool,
    pub cells: Vec<CellView<'a>>,
}

/// Template data shared by the markup renderers.
#[derive(Serialize)]
pub(crate) struct GridView<'a> {
    pub title: &'a str,
    pub subtitle: Option<&'a str>,
    pub date_range: &'a str,
    pub days: Vec<&'a str>,
    pub rows: Vec<RowView<'a>>,
}

impl<'a> GridView<'a> {
    pub fn from_grid(grid: &'a AgendaGrid) -> Self {
        let rows = grid
            .rows
            .iter()
            .map(|row| RowView {
                time_label: &row.time_label,
                is_break: row.kind == RowKind::Break,
                cells: row.cells.iter().map(CellView::from_cell).collect(),
            })
            .collect();

        Self {
            title: &grid.header.title,
            subtitle: grid.header.subtitle.as_deref(),
            date_range: &grid.header.date_range.label,
            days: grid.header.days.iter().map(|d| d.label.as_str()).collect(),
            rows,
        }
    }
}

impl<'a> CellView<'a> {
    fn from_cell(cell: &'a GridCell) -> Self {
        match cell {
            GridCell::Session {
                title,
                bullets,
                trainer,
            } => Self {
                is_break: false,
                heading: title,
                bullets,
                trainer,
            },
            GridCell::Break { name } => Self {
                is_break: true,
                heading: name,
                bullets: &[],
                trainer: "",
            },
        }
    }
}

/// Inline markup for the on-screen preview.
pub struct HtmlPreviewRenderer {
    registry: Handlebars<'static>,
}

impl HtmlPreviewRenderer {
    pub fn new() -> RenderResult<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_template_string(PREVIEW_TEMPLATE, PREVIEW_SOURCE)?;
        Ok(Self { registry })
    }
}

impl Renderer for HtmlPreviewRenderer {
    fn format(&self) -> ArtifactFormat {
        ArtifactFormat::HtmlPreview
    }

    fn render(&self, grid: &AgendaGrid) -> RenderResult<Artifact> {
        grid.check_shape()?;
        let markup = self
            .registry
            .render(PREVIEW_TEMPLATE, &GridView::from_grid(grid))?;
        tracing::info!(rows = grid.rows.len(), bytes = markup.len(), "rendered html preview");
        Ok(Artifact::text(self.format(), markup))
    }
}
