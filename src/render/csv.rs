use super::{Artifact, ArtifactFormat, RenderError, RenderResult, Renderer};
use crate::clock;
use crate::grid::{AgendaGrid, GridCell, RowKind};

/// Flattens each row into one record: `start,end,kind,<day 1>..<day N>`.
pub struct CsvRenderer;

fn flatten_cell(cell: &GridCell) -> String {
    match cell {
        GridCell::Session {
            title,
            bullets,
            trainer,
        } => {
            let mut parts = vec![title.clone()];
            if !bullets.is_empty() || !trainer.is_empty() {
                parts.push(bullets.join("; "));
            }
            if !trainer.is_empty() {
                parts.push(trainer.clone());
            }
            parts.join(" | ")
        }
        GridCell::Break { name } => name.clone(),
    }
}

impl Renderer for CsvRenderer {
    fn format(&self) -> ArtifactFormat {
        ArtifactFormat::Csv
    }

    fn render(&self, grid: &AgendaGrid) -> RenderResult<Artifact> {
        grid.check_shape()?;

        let mut writer = ::csv::Writer::from_writer(Vec::new());
        let mut header = vec!["start".to_string(), "end".to_string(), "kind".to_string()];
        header.extend(grid.header.days.iter().map(|d| d.date.format("%Y-%m-%d").to_string()));
        writer.write_record(&header)?;

        for row in &grid.rows {
            let kind = match row.kind {
                RowKind::Session => "session",
                RowKind::Break => "break",
            };
            let mut record = vec![
                clock::format_clock(row.start),
                clock::format_clock(row.end),
                kind.to_string(),
            ];
            record.extend(row.cells.iter().map(flatten_cell));
            writer.write_record(&record)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| RenderError::Encoding(format!("csv buffer: {e}")))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| RenderError::Encoding(format!("csv output is not utf-8: {e}")))?;
        tracing::info!(rows = grid.rows.len(), "rendered csv");
        Ok(Artifact::text(self.format(), text))
    }
}
