use super::{Break, ConfigError, ScheduleConfig, Slot};
use std::collections::HashSet;

pub fn validate_slot(slot: &Slot) -> Result<(), ConfigError> {
    if slot.start >= slot.end {
        return Err(ConfigError::InvalidSlot {
            index: slot.index,
            start: slot.start,
            end: slot.end,
        });
    }
    Ok(())
}

pub fn validate_break(entry: &Break) -> Result<(), ConfigError> {
    if entry.name.trim().is_empty() {
        return Err(ConfigError::UnnamedBreak(entry.id));
    }
    if entry.start >= entry.end {
        return Err(ConfigError::InvalidBreak {
            name: entry.name.clone(),
            start: entry.start,
            end: entry.end,
        });
    }
    Ok(())
}

/// Slot indices must form `0..slots.len()` so content rows can be addressed
/// by index.
fn validate_slot_indices(slots: &[Slot]) -> Result<(), ConfigError> {
    let mut seen = HashSet::with_capacity(slots.len());
    for slot in slots {
        if slot.index >= slots.len() {
            return Err(ConfigError::SlotIndexOutOfRange {
                index: slot.index,
                count: slots.len(),
            });
        }
        if !seen.insert(slot.index) {
            return Err(ConfigError::DuplicateSlotIndex(slot.index));
        }
        validate_slot(slot)?;
    }
    Ok(())
}

fn validate_day_content(config: &ScheduleConfig, num_days: usize) -> Result<(), ConfigError> {
    let slot_count = config.slots.len();

    for (day, row) in config.day_content.iter().enumerate() {
        for (slot, entry) in row.iter().enumerate() {
            if entry.is_some() && (day >= num_days || slot >= slot_count) {
                return Err(ConfigError::UnexpectedDayContent { day, slot });
            }
        }
    }

    for day in 0..num_days {
        for slot in 0..slot_count {
            if config.content(day, slot).is_none() {
                return Err(ConfigError::MissingDayContent { day, slot });
            }
        }
    }
    Ok(())
}

pub fn validate_config(config: &ScheduleConfig) -> Result<(), ConfigError> {
    let num_days = config.num_days()?;
    validate_slot_indices(&config.slots)?;
    for entry in &config.breaks {
        validate_break(entry)?;
    }
    validate_day_content(config, num_days)
}
