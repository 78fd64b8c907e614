use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::{Artifact, ArtifactBody, ArtifactFormat, RenderError, RenderResult, Renderer};
use crate::grid::AgendaGrid;

pub const TIME_COLUMN: &str = "time";
pub const PAGE_SEPARATOR: char = '\x0c';

/// How the tabular view splits an agenda across pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageBreakPolicy {
    pub max_rows_per_page: usize,
    pub max_days_per_page: usize,
}

impl Default for PageBreakPolicy {
    fn default() -> Self {
        Self {
            max_rows_per_page: 12,
            max_days_per_page: 5,
        }
    }
}

impl PageBreakPolicy {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_rows_per_page == 0 {
            return Err("max_rows_per_page must be at least 1".into());
        }
        if self.max_days_per_page == 0 {
            return Err("max_days_per_page must be at least 1".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TablePage {
    pub number: usize,
    /// Index of the first grid row on this page.
    pub row_offset: usize,
    /// Index of the first day column on this page.
    pub day_offset: usize,
    /// Printed header: "Time" followed by the day labels of this page.
    pub header: Vec<String>,
    /// `time` column plus one `day_N` column per day on the page.
    pub frame: DataFrame,
}

impl TablePage {
    pub fn day_count(&self) -> usize {
        self.header.len().saturating_sub(1)
    }

    pub fn row_count(&self) -> usize {
        self.frame.height()
    }

    pub fn cell(&self, row: usize, day: usize) -> RenderResult<Option<String>> {
        let name = day_column_name(self.day_offset + day);
        Ok(self
            .frame
            .column(&name)?
            .str()?
            .get(row)
            .map(ToOwned::to_owned))
    }

    pub fn time_label(&self, row: usize) -> RenderResult<Option<String>> {
        Ok(self
            .frame
            .column(TIME_COLUMN)?
            .str()?
            .get(row)
            .map(ToOwned::to_owned))
    }
}

#[derive(Debug, Clone)]
pub struct TableDocument {
    pub title: String,
    pub date_range: String,
    pub pages: Vec<TablePage>,
}

impl TableDocument {
    /// Plain-text encoding; pages are separated by a form feed.
    pub fn to_text(&self) -> String {
        let total = self.pages.len();
        self.pages
            .iter()
            .map(|page| {
                format!(
                    "{}\n{}\nPage {} of {}\n{}",
                    self.title,
                    self.date_range,
                    page.number,
                    total,
                    render_page_as_text_table(page)
                )
            })
            .collect::<Vec<_>>()
            .join(&PAGE_SEPARATOR.to_string())
    }
}

fn day_column_name(day: usize) -> String {
    format!("day_{}", day + 1)
}

fn frame_for_days(grid: &AgendaGrid, days: std::ops::Range<usize>) -> PolarsResult<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(days.len() + 1);

    let times: Vec<&str> = grid.rows.iter().map(|r| r.time_label.as_str()).collect();
    columns.push(Series::new(PlSmallStr::from_static(TIME_COLUMN), times).into_column());

    for day in days {
        let cells: Vec<String> = grid
            .rows
            .iter()
            .map(|row| row.cells[day].lines().join("\n"))
            .collect();
        columns.push(Series::new(day_column_name(day).as_str().into(), cells).into_column());
    }

    DataFrame::new(columns)
}

/// Page-oriented tabular view. Column groups are laid out first, each split
/// into row chunks, so a page never holds a partial row or a partial column.
pub struct TableRenderer {
    policy: PageBreakPolicy,
}

impl TableRenderer {
    pub fn new(policy: PageBreakPolicy) -> RenderResult<Self> {
        policy.validate().map_err(RenderError::InvalidPolicy)?;
        Ok(Self { policy })
    }

    pub fn paginate(&self, grid: &AgendaGrid) -> RenderResult<TableDocument> {
        grid.check_shape()?;

        let num_days = grid.num_days();
        let row_count = grid.rows.len();
        let mut pages = Vec::new();

        for day_offset in (0..num_days).step_by(self.policy.max_days_per_page) {
            let day_end = (day_offset + self.policy.max_days_per_page).min(num_days);
            let frame = frame_for_days(grid, day_offset..day_end)?;

            let mut header = Vec::with_capacity(day_end - day_offset + 1);
            header.push("Time".to_string());
            header.extend(grid.header.days[day_offset..day_end].iter().map(|d| d.label.clone()));

            // An empty timeline still yields one page per column group.
            let row_offsets: Vec<usize> = if row_count == 0 {
                vec![0]
            } else {
                (0..row_count).step_by(self.policy.max_rows_per_page).collect()
            };
            for row_offset in row_offsets {
                let len = self.policy.max_rows_per_page.min(row_count - row_offset);
                pages.push(TablePage {
                    number: pages.len() + 1,
                    row_offset,
                    day_offset,
                    header: header.clone(),
                    frame: frame.slice(row_offset as i64, len),
                });
            }
        }

        Ok(TableDocument {
            title: grid.header.title.clone(),
            date_range: grid.header.date_range.label.clone(),
            pages,
        })
    }
}

impl Renderer for TableRenderer {
    fn format(&self) -> ArtifactFormat {
        ArtifactFormat::Table
    }

    fn render(&self, grid: &AgendaGrid) -> RenderResult<Artifact> {
        let document = self.paginate(grid)?;
        tracing::info!(
            rows = grid.rows.len(),
            days = grid.num_days(),
            pages = document.pages.len(),
            "rendered table document"
        );
        Ok(Artifact {
            format: self.format(),
            body: ArtifactBody::Paged(document),
        })
    }
}

fn cell_lines(frame: &DataFrame, column: &str, row_idx: usize) -> Vec<String> {
    frame
        .column(column)
        .ok()
        .and_then(|c| c.str().ok())
        .and_then(|ca| ca.get(row_idx))
        .map(|s| s.lines().map(ToOwned::to_owned).collect())
        .unwrap_or_default()
}

fn render_page_as_text_table(page: &TablePage) -> String {
    let frame = &page.frame;
    let column_names: Vec<String> = std::iter::once(TIME_COLUMN.to_string())
        .chain((0..page.day_count()).map(|d| day_column_name(page.day_offset + d)))
        .collect();

    // Each printed row is as tall as its tallest cell.
    let rows: Vec<Vec<Vec<String>>> = (0..frame.height())
        .map(|row_idx| {
            column_names
                .iter()
                .map(|name| cell_lines(frame, name, row_idx))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = page.header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (ci, lines) in row.iter().enumerate() {
            for line in lines {
                widths[ci] = widths[ci].max(line.chars().count());
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let push_line = |out: &mut String, cells: &[&str]| {
        out.push('|');
        for (ci, text) in cells.iter().enumerate() {
            out.push(' ');
            out.push_str(text);
            let pad = widths[ci].saturating_sub(text.chars().count());
            out.push_str(&" ".repeat(pad));
            out.push_str(" |");
        }
        out.push('\n');
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    let header: Vec<&str> = page.header.iter().map(String::as_str).collect();
    push_line(&mut out, &header);
    out.push_str(&sep);
    out.push('\n');

    for row in &rows {
        let height = row.iter().map(Vec::len).max().unwrap_or(0).max(1);
        for line_idx in 0..height {
            let cells: Vec<&str> = row
                .iter()
                .map(|lines| lines.get(line_idx).map(String::as_str).unwrap_or(""))
                .collect();
            push_line(&mut out, &cells);
        }
        out.push_str(&sep);
        out.push('\n');
    }
    out
}
