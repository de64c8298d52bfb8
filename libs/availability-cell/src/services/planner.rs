use serde::Serialize;

use shared_models::AppError;

use crate::models::{TimeRange, TimeSlot};
use crate::services::normalizer::merge_overlapping_ranges;

/// What adding a slot to a day should do, decided against the day's current slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "detail", rename_all = "snake_case")]
pub enum SlotPlan {
    /// No overlap: send the slot through `add-slot`.
    Add(TimeRange),
    /// Overlaps existing slots: replace the day with these fused ranges.
    Merge(Vec<TimeRange>),
    /// The exact slot already exists.
    Duplicate,
    /// An existing slot already covers the whole slot.
    AlreadyCovered,
}

impl SlotPlan {
    pub fn sends_request(&self) -> bool {
        matches!(self, SlotPlan::Add(_) | SlotPlan::Merge(_))
    }
}

pub fn ranges_overlap(a: &TimeRange, b: &TimeRange) -> bool {
    (a.start_time <= b.start_time && b.start_time < a.end_time)
        || (b.start_time <= a.start_time && a.start_time < b.end_time)
}

pub fn plan_slot(existing: &[TimeSlot], start_time: &str, end_time: &str) -> Result<SlotPlan, AppError> {
    if start_time.is_empty() || end_time.is_empty() {
        return Err(AppError::Validation("Please enter both start and end times".to_string()));
    }
    if start_time >= end_time {
        return Err(AppError::Validation("End time must be after start time".to_string()));
    }

    if existing
        .iter()
        .any(|slot| slot.start_time == start_time && slot.end_time == end_time)
    {
        return Ok(SlotPlan::Duplicate);
    }

    if existing
        .iter()
        .any(|slot| slot.start_time.as_str() <= start_time && slot.end_time.as_str() >= end_time)
    {
        return Ok(SlotPlan::AlreadyCovered);
    }

    let candidate = TimeRange::new(start_time, end_time);
    let existing_ranges: Vec<TimeRange> = existing.iter().map(TimeRange::from).collect();

    if existing_ranges.iter().any(|range| ranges_overlap(range, &candidate)) {
        let mut all = existing_ranges;
        all.push(candidate);
        return Ok(SlotPlan::Merge(merge_overlapping_ranges(&all)));
    }

    Ok(SlotPlan::Add(candidate))
}
