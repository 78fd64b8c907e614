use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::clock::{self, hhmm};

pub mod file;
pub(crate) mod validation;

pub use file::{ConfigFileError, config_from_json_str, load_config_from_json};

/// Upper bound on the number of days one agenda may span.
pub const MAX_DAYS: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("start date {start} must be on or before end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("day count must be at least 1 (got {0})")]
    NonPositiveDayCount(i64),

    #[error("agenda spans {days} days; at most {max} are supported")]
    TooManyDays { days: usize, max: usize },

    #[error("slot {index} must start before it ends ({start} - {end})")]
    InvalidSlot {
        index: usize,
        start: NaiveTime,
        end: NaiveTime,
    },

    #[error("slot index {0} is used more than once")]
    DuplicateSlotIndex(usize),

    #[error("slot index {index} is out of range for {count} slots")]
    SlotIndexOutOfRange { index: usize, count: usize },

    #[error("break '{name}' must start before it ends ({start} - {end})")]
    InvalidBreak {
        name: String,
        start: NaiveTime,
        end: NaiveTime,
    },

    #[error("break {0} requires a non-empty name")]
    UnnamedBreak(Uuid),

    #[error("day {day_no} is beyond the last supported day {max}", day_no = .day + 1)]
    DayOutOfRange { day: usize, max: usize },

    #[error("missing content for day {day_no}, slot {slot_no}", day_no = .day + 1, slot_no = .slot + 1)]
    MissingDayContent { day: usize, slot: usize },

    #[error("content given for day {day_no}, slot {slot_no}, which is outside the agenda", day_no = .day + 1, slot_no = .slot + 1)]
    UnexpectedDayContent { day: usize, slot: usize },

    #[error("invalid time {0} (expected HH:MM)")]
    InvalidTime(String),

    #[error("date arithmetic overflowed from {0}")]
    DateOverflow(NaiveDate),
}

/// A recurring time window shared by every day of the agenda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub index: usize,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl Slot {
    pub fn new(index: usize, start: NaiveTime, end: NaiveTime) -> Self {
        Self { index, start, end }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayContent {
    pub title: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub trainer: String,
}

impl DayContent {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            bullets: Vec::new(),
            trainer: String::new(),
        }
    }

    pub fn with_bullets<I, S>(mut self, bullets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bullets = bullets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_trainer(mut self, trainer: impl Into<String>) -> Self {
        self.trainer = trainer.into();
        self
    }
}

/// A global pause (lunch, coffee) inserted identically into every day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Break {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl Break {
    pub fn new(name: impl Into<String>, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start,
            end,
        }
    }
}

/// Everything one generation request needs. Cloned as a snapshot before
/// composition; composition only ever borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub slots: Vec<Slot>,
    #[serde(default)]
    pub breaks: Vec<Break>,
    /// Indexed `[day][slot.index]`.
    #[serde(default)]
    pub day_content: Vec<Vec<Option<DayContent>>>,
}

impl ScheduleConfig {
    pub fn new(title: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            start_date,
            end_date,
            slots: Vec::new(),
            breaks: Vec::new(),
            day_content: Vec::new(),
        }
    }

    /// Build from a start and a day count instead of an end date.
    pub fn with_day_count(
        title: impl Into<String>,
        start_date: NaiveDate,
        num_days: i64,
    ) -> Result<Self, ConfigError> {
        let end_date = Self::end_for_count(start_date, num_days)?;
        Ok(Self::new(title, start_date, end_date))
    }

    /// Only the calendar date of `start` is used; the time of day is dropped.
    pub fn starting_at(
        title: impl Into<String>,
        start: NaiveDateTime,
        num_days: i64,
    ) -> Result<Self, ConfigError> {
        Self::with_day_count(title, start.date(), num_days)
    }

    fn end_for_count(start_date: NaiveDate, num_days: i64) -> Result<NaiveDate, ConfigError> {
        if num_days < 1 {
            return Err(ConfigError::NonPositiveDayCount(num_days));
        }
        start_date
            .checked_add_days(Days::new(num_days as u64 - 1))
            .ok_or(ConfigError::DateOverflow(start_date))
    }

    /// `floor((end - start) / 1 day) + 1`, rejected when the range is
    /// reversed or exceeds [`MAX_DAYS`].
    pub fn num_days(&self) -> Result<usize, ConfigError> {
        if self.end_date < self.start_date {
            return Err(ConfigError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        let days = (self.end_date - self.start_date).num_days() as usize + 1;
        if days > MAX_DAYS {
            return Err(ConfigError::TooManyDays {
                days,
                max: MAX_DAYS,
            });
        }
        Ok(days)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate_config(self)
    }

    pub fn content(&self, day: usize, slot: usize) -> Option<&DayContent> {
        self.day_content
            .get(day)
            .and_then(|row| row.get(slot))
            .and_then(Option::as_ref)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_dates(&mut self, start: NaiveDate, end: NaiveDate) -> Result<(), ConfigError> {
        if end < start {
            return Err(ConfigError::InvalidDateRange { start, end });
        }
        self.start_date = start;
        self.end_date = end;
        Ok(())
    }

    pub fn set_day_count(&mut self, num_days: i64) -> Result<(), ConfigError> {
        self.end_date = Self::end_for_count(self.start_date, num_days)?;
        Ok(())
    }

    /// Append a slot and return its index.
    pub fn add_slot(&mut self, start: NaiveTime, end: NaiveTime) -> Result<usize, ConfigError> {
        let index = self.slots.len();
        if start >= end {
            return Err(ConfigError::InvalidSlot { index, start, end });
        }
        self.slots.push(Slot::new(index, start, end));
        Ok(index)
    }

    /// Remove the highest-indexed slot together with its per-day content.
    pub fn remove_last_slot(&mut self) -> Option<Slot> {
        let last = self.slots.iter().map(|s| s.index).max()?;
        let position = self.slots.iter().position(|s| s.index == last)?;
        for row in &mut self.day_content {
            row.truncate(last);
        }
        Some(self.slots.remove(position))
    }

    pub fn add_break(
        &mut self,
        name: impl Into<String>,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Uuid, ConfigError> {
        let entry = Break::new(name, start, end);
        validation::validate_break(&entry)?;
        let id = entry.id;
        self.breaks.push(entry);
        Ok(id)
    }

    pub fn remove_break(&mut self, id: Uuid) -> Option<Break> {
        let position = self.breaks.iter().position(|b| b.id == id)?;
        Some(self.breaks.remove(position))
    }

    /// Store content for `(day, slot)`, both zero-based. `day` must be below
    /// [`MAX_DAYS`] and `slot` must name an existing slot. Rows grow with empty
    /// entries as needed; gaps are reported by [`ScheduleConfig::validate`].
    pub fn set_day_content(
        &mut self,
        day: usize,
        slot: usize,
        content: DayContent,
    ) -> Result<(), ConfigError> {
        if day >= MAX_DAYS {
            return Err(ConfigError::DayOutOfRange { day, max: MAX_DAYS });
        }
        if slot >= self.slots.len() {
            return Err(ConfigError::SlotIndexOutOfRange {
                index: slot,
                count: self.slots.len(),
            });
        }
        if self.day_content.len() <= day {
            self.day_content.resize_with(day + 1, Vec::new);
        }
        let row = &mut self.day_content[day];
        if row.len() <= slot {
            row.resize(slot + 1, None);
        }
        row[slot] = Some(content);
        Ok(())
    }

    pub fn describe(&self) -> String {
        let days = self
            .num_days()
            .map(|d| d.to_string())
            .unwrap_or_else(|e| format!("invalid ({e})"));
        let mut out = format!(
            "Title      : {}\nDates      : {} .. {} ({} days)\n",
            self.title, self.start_date, self.end_date, days
        );
        out.push_str("Slots      :");
        if self.slots.is_empty() {
            out.push_str(" none");
        }
        for slot in &self.slots {
            out.push_str(&format!(
                "\n  #{} {}",
                slot.index + 1,
                clock::time_range_label(slot.start, slot.end)
            ));
        }
        out.push_str("\nBreaks     :");
        if self.breaks.is_empty() {
            out.push_str(" none");
        }
        for (position, entry) in self.breaks.iter().enumerate() {
            out.push_str(&format!(
                "\n  {}. {} {}",
                position + 1,
                entry.name,
                clock::time_range_label(entry.start, entry.end)
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn num_days_counts_inclusive_range() {
        let config = ScheduleConfig::new("Agenda", d(2024, 2, 28), d(2024, 3, 1));
        assert_eq!(config.num_days().unwrap(), 3);
    }

    #[test]
    fn num_days_rejects_reversed_range() {
        let config = ScheduleConfig::new("Agenda", d(2024, 3, 2), d(2024, 3, 1));
        assert!(matches!(
            config.num_days(),
            Err(ConfigError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn with_day_count_rejects_zero() {
        let result = ScheduleConfig::with_day_count("Agenda", d(2024, 3, 1), 0);
        assert_eq!(result.unwrap_err(), ConfigError::NonPositiveDayCount(0));
    }

    #[test]
    fn remove_last_slot_drops_its_content() {
        let mut config = ScheduleConfig::new("Agenda", d(2024, 3, 1), d(2024, 3, 1));
        config.add_slot(t(9, 0), t(10, 0)).unwrap();
        config.add_slot(t(10, 0), t(11, 0)).unwrap();
        config.set_day_content(0, 0, DayContent::new("A")).unwrap();
        config.set_day_content(0, 1, DayContent::new("B")).unwrap();

        let removed = config.remove_last_slot().unwrap();
        assert_eq!(removed.index, 1);
        assert_eq!(config.day_content[0].len(), 1);
        assert_eq!(config.content(0, 0).map(|c| c.title.as_str()), Some("A"));
    }

    #[test]
    fn add_break_rejects_inverted_times() {
        let mut config = ScheduleConfig::new("Agenda", d(2024, 3, 1), d(2024, 3, 1));
        let err = config.add_break("Lunch", t(13, 0), t(12, 0)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBreak { .. }));
        assert!(config.breaks.is_empty());
    }

    #[test]
    fn set_day_content_rejects_day_past_the_maximum() {
        let mut config = ScheduleConfig::new("Agenda", d(2024, 3, 1), d(2024, 3, 1));
        config.add_slot(t(9, 0), t(10, 0)).unwrap();

        let err = config
            .set_day_content(usize::MAX - 1, 0, DayContent::new("Far away"))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::DayOutOfRange {
                day: usize::MAX - 1,
                max: MAX_DAYS
            }
        );
        assert_eq!(
            config.set_day_content(MAX_DAYS, 0, DayContent::new("Day 31")),
            Err(ConfigError::DayOutOfRange {
                day: MAX_DAYS,
                max: MAX_DAYS
            })
        );
        assert!(config.day_content.is_empty());

        assert_eq!(
            config.set_day_content(MAX_DAYS - 1, 0, DayContent::new("Day 30")),
            Ok(())
        );
    }

    #[test]
    fn set_day_content_rejects_unknown_slot() {
        let mut config = ScheduleConfig::new("Agenda", d(2024, 3, 1), d(2024, 3, 1));
        config.add_slot(t(9, 0), t(10, 0)).unwrap();

        assert_eq!(
            config.set_day_content(0, usize::MAX, DayContent::new("Nowhere")),
            Err(ConfigError::SlotIndexOutOfRange {
                index: usize::MAX,
                count: 1
            })
        );
        assert!(config.day_content.is_empty());
    }

    #[test]
    fn missing_content_message_is_one_based() {
        let err = ConfigError::MissingDayContent { day: 0, slot: 2 };
        assert_eq!(err.to_string(), "missing content for day 1, slot 3");
    }
}
