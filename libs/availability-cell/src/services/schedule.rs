use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{DayAvailability, DayOfWeek, TimeRange};
use crate::services::normalizer::merge_adjacent_slots;

/// All seven days of a doctor's week, Monday first.
///
/// Days the API has no record for are present as unavailable with no slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklySchedule {
    days: BTreeMap<DayOfWeek, DayAvailability>,
}

impl WeeklySchedule {
    pub fn from_days(records: Vec<DayAvailability>) -> Self {
        let mut days: BTreeMap<DayOfWeek, DayAvailability> = records
            .into_iter()
            .map(|record| (record.day_of_week, record))
            .collect();

        for day in DayOfWeek::ALL {
            days.entry(day).or_insert_with(|| DayAvailability::unavailable(day));
        }

        Self { days }
    }

    pub fn day(&self, day: DayOfWeek) -> &DayAvailability {
        // every weekday is inserted by from_days
        &self.days[&day]
    }

    pub fn iter(&self) -> impl Iterator<Item = &DayAvailability> {
        self.days.values()
    }

    pub fn available_days(&self) -> Vec<DayOfWeek> {
        self.iter()
            .filter(|day| day.is_available)
            .map(|day| day.day_of_week)
            .collect()
    }

    /// Contiguous working hours per day.
    pub fn ranges(&self, day: DayOfWeek) -> Vec<TimeRange> {
        merge_adjacent_slots(&self.day(day).slots)
    }

    pub fn total_slots(&self) -> usize {
        self.iter().map(|day| day.slots.len()).sum()
    }

    pub fn into_days(self) -> Vec<DayAvailability> {
        self.days.into_values().collect()
    }
}
