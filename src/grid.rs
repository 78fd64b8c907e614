//! The renderer-agnostic Day × Event grid.
//!
//! [`GridProjector`] expands a [`Timeline`] across the configured date range.
//! Every renderer consumes the resulting [`AgendaGrid`] read-only, and every
//! renderer checks [`AgendaGrid::check_shape`] before emitting anything.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::{self, hhmm};
use crate::config::{ConfigError, ScheduleConfig};
use crate::timeline::{Event, Timeline};

const DAY_LABEL_FORMAT: &str = "%a, %d %b %Y";
const RANGE_LABEL_FORMAT: &str = "%d %b %Y";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHeader {
    /// One-based.
    pub day_number: usize,
    pub date: NaiveDate,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridHeader {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub date_range: DateRange,
    pub days: Vec<DayHeader>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Session,
    Break,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GridCell {
    Session {
        title: String,
        bullets: Vec<String>,
        trainer: String,
    },
    Break {
        name: String,
    },
}

impl GridCell {
    pub fn kind(&self) -> RowKind {
        match self {
            GridCell::Session { .. } => RowKind::Session,
            GridCell::Break { .. } => RowKind::Break,
        }
    }

    /// Session title or break name.
    pub fn heading(&self) -> &str {
        match self {
            GridCell::Session { title, .. } => title,
            GridCell::Break { name } => name,
        }
    }

    /// Text lines for plain renderings: heading, bullets, then the trainer.
    pub fn lines(&self) -> Vec<String> {
        match self {
            GridCell::Session {
                title,
                bullets,
                trainer,
            } => {
                let mut lines = Vec::with_capacity(bullets.len() + 2);
                lines.push(title.clone());
                lines.extend(bullets.iter().map(|b| format!("• {b}")));
                if !trainer.is_empty() {
                    lines.push(format!("Trainer: {trainer}"));
                }
                lines
            }
            GridCell::Break { name } => vec![name.clone()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRow {
    pub time_label: String,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    pub kind: RowKind,
    pub cells: Vec<GridCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaGrid {
    pub header: GridHeader,
    pub rows: Vec<GridRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("grid has no day columns")]
    NoDays,
    #[error("row {row} has {found} cells but the grid has {expected} days")]
    CellCount {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row} is a {row_kind:?} row but day {day} holds a {cell_kind:?} cell")]
    KindMismatch {
        row: usize,
        day: usize,
        row_kind: RowKind,
        cell_kind: RowKind,
    },
}

impl AgendaGrid {
    pub fn num_days(&self) -> usize {
        self.header.days.len()
    }

    /// `rows × days` structure every renderer relies on.
    pub fn check_shape(&self) -> Result<(), ShapeError> {
        let expected = self.num_days();
        if expected == 0 {
            return Err(ShapeError::NoDays);
        }
        for (row_idx, row) in self.rows.iter().enumerate() {
            if row.cells.len() != expected {
                return Err(ShapeError::CellCount {
                    row: row_idx,
                    expected,
                    found: row.cells.len(),
                });
            }
            if let Some((day, cell)) = row
                .cells
                .iter()
                .enumerate()
                .find(|(_, cell)| cell.kind() != row.kind)
            {
                return Err(ShapeError::KindMismatch {
                    row: row_idx,
                    day,
                    row_kind: row.kind,
                    cell_kind: cell.kind(),
                });
            }
        }
        Ok(())
    }

    /// `(time label, heading per day)` for every row, in order.
    pub fn outline(&self) -> Vec<(String, Vec<String>)> {
        self.rows
            .iter()
            .map(|row| {
                let headings = row.cells.iter().map(|c| c.heading().to_string()).collect();
                (row.time_label.clone(), headings)
            })
            .collect()
    }
}

/// Calendar dates for `num_days` consecutive days from `start`.
pub fn project_dates(start: NaiveDate, num_days: usize) -> Vec<NaiveDate> {
    start.iter_days().take(num_days).collect()
}

pub struct GridProjector<'a> {
    config: &'a ScheduleConfig,
}

impl<'a> GridProjector<'a> {
    pub fn new(config: &'a ScheduleConfig) -> Self {
        Self { config }
    }

    pub fn project(&self, timeline: &Timeline<'_>) -> Result<AgendaGrid, ConfigError> {
        let num_days = self.config.num_days()?;
        let dates = project_dates(self.config.start_date, num_days);
        if dates.len() != num_days {
            return Err(ConfigError::DateOverflow(self.config.start_date));
        }

        let header = self.header(&dates);
        let mut rows = Vec::with_capacity(timeline.len());
        for event in timeline.iter() {
            rows.push(self.row(event, num_days)?);
        }

        tracing::debug!(rows = rows.len(), days = num_days, "grid projected");
        Ok(AgendaGrid { header, rows })
    }

    fn header(&self, dates: &[NaiveDate]) -> GridHeader {
        let start = self.config.start_date;
        let end = dates.last().copied().unwrap_or(start);
        let label = if start == end {
            start.format(RANGE_LABEL_FORMAT).to_string()
        } else {
            format!(
                "{} - {}",
                start.format(RANGE_LABEL_FORMAT),
                end.format(RANGE_LABEL_FORMAT)
            )
        };

        let days = dates
            .iter()
            .enumerate()
            .map(|(idx, date)| DayHeader {
                day_number: idx + 1,
                date: *date,
                label: format!("Day {} ({})", idx + 1, date.format(DAY_LABEL_FORMAT)),
            })
            .collect();

        GridHeader {
            title: self.config.title.clone(),
            subtitle: self.config.subtitle.clone(),
            date_range: DateRange { start, end, label },
            days,
        }
    }

    fn row(&self, event: &Event<'_>, num_days: usize) -> Result<GridRow, ConfigError> {
        let cells = match event {
            Event::Session(slot) => (0..num_days)
                .map(|day| {
                    self.config
                        .content(day, slot.index)
                        .map(|content| GridCell::Session {
                            title: content.title.clone(),
                            bullets: content.bullets.clone(),
                            trainer: content.trainer.clone(),
                        })
                        .ok_or(ConfigError::MissingDayContent {
                            day,
                            slot: slot.index,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?,
            Event::Break(entry) => vec![
                GridCell::Break {
                    name: entry.name.clone(),
                };
                num_days
            ],
        };

        Ok(GridRow {
            time_label: clock::time_range_label(event.start(), event.end()),
            start: event.start(),
            end: event.end(),
            kind: if event.is_break() {
                RowKind::Break
            } else {
                RowKind::Session
            },
            cells,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_dates_crosses_month_and_leap_day() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let dates = project_dates(start, 3);
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            ]
        );
    }

    #[test]
    fn session_lines_include_bullets_and_trainer() {
        let cell = GridCell::Session {
            title: "Ownership".into(),
            bullets: vec!["moves".into(), "borrows".into()],
            trainer: "Ada".into(),
        };
        assert_eq!(
            cell.lines(),
            vec!["Ownership", "• moves", "• borrows", "Trainer: Ada"]
        );
    }

    #[test]
    fn check_shape_flags_kind_mismatch() {
        let grid = AgendaGrid {
            header: GridHeader {
                title: "T".into(),
                subtitle: None,
                date_range: DateRange {
                    start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    label: "01 Jan 2024".into(),
                },
                days: vec![DayHeader {
                    day_number: 1,
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    label: "Day 1".into(),
                }],
            },
            rows: vec![GridRow {
                time_label: "12:00 - 13:00".into(),
                start: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
                end: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
                kind: RowKind::Break,
                cells: vec![GridCell::Session {
                    title: "Oops".into(),
                    bullets: vec![],
                    trainer: String::new(),
                }],
            }],
        };
        assert!(matches!(
            grid.check_shape(),
            Err(ShapeError::KindMismatch { row: 0, day: 0, .. })
        ));
    }
}
