use chrono::{NaiveTime, Timelike};

use shared_models::AppError;

use crate::models::{SlotStatus, TimeRange, TimeSlot};

/// Slot length the API uses when it splits ranges into bookable slots.
pub const DEFAULT_SLOT_MINUTES: u32 = 30;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Collapses back-to-back slots into contiguous ranges.
///
/// Slots are sorted by start time first, so input order does not matter. Two
/// slots join only when one ends exactly where the next begins; overlapping
/// slots are kept as separate ranges.
pub fn merge_adjacent_slots(slots: &[TimeSlot]) -> Vec<TimeRange> {
    let mut sorted: Vec<&TimeSlot> = slots.iter().collect();
    sorted.sort_by(|a, b| {
        a.start_time
            .cmp(&b.start_time)
            .then_with(|| a.end_time.cmp(&b.end_time))
    });

    let mut ranges = Vec::new();
    let mut current: Option<TimeRange> = None;

    for slot in sorted {
        current = match current.take() {
            None => Some(slot.to_range()),
            Some(mut range) if range.end_time == slot.start_time => {
                range.end_time = slot.end_time.clone();
                Some(range)
            }
            Some(range) => {
                ranges.push(range);
                Some(slot.to_range())
            }
        };
    }

    ranges.extend(current);
    ranges
}

/// Fuses ranges that overlap or touch, keeping the later end time.
///
/// `10:00-15:00` and `14:00-19:00` become `10:00-19:00`.
pub fn merge_overlapping_ranges(ranges: &[TimeRange]) -> Vec<TimeRange> {
    let mut sorted: Vec<&TimeRange> = ranges.iter().collect();
    sorted.sort_by(|a, b| {
        a.start_time
            .cmp(&b.start_time)
            .then_with(|| a.end_time.cmp(&b.end_time))
    });

    let mut merged: Vec<TimeRange> = Vec::new();

    for range in sorted {
        match merged.last_mut() {
            Some(last) if last.end_time >= range.start_time => {
                if range.end_time > last.end_time {
                    last.end_time = range.end_time.clone();
                }
            }
            _ => merged.push(range.clone()),
        }
    }

    merged
}

/// Splits ranges into available slots of `slot_minutes`, dropping any
/// trailing remainder shorter than a full slot.
pub fn expand_ranges(ranges: &[TimeRange], slot_minutes: u32) -> Result<Vec<TimeSlot>, AppError> {
    if slot_minutes == 0 {
        return Err(AppError::Validation("Slot duration must be positive".to_string()));
    }
    if slot_minutes > MINUTES_PER_DAY {
        return Err(AppError::Validation(format!(
            "Slot duration must be at most {} minutes",
            MINUTES_PER_DAY
        )));
    }

    let mut slots = Vec::new();

    for range in ranges {
        let start = minutes_of_day(&range.start_time)?;
        let end = minutes_of_day(&range.end_time)?;

        let mut current = start;
        while current + slot_minutes <= end {
            slots.push(
                TimeSlot::new(format_minutes(current), format_minutes(current + slot_minutes))
                    .with_status(SlotStatus::Available),
            );
            current += slot_minutes;
        }
    }

    Ok(slots)
}

fn minutes_of_day(time: &str) -> Result<u32, AppError> {
    let parsed = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .map_err(|_| AppError::Validation(format!("Invalid time of day: {}", time)))?;

    Ok(parsed.hour() * 60 + parsed.minute())
}

fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
