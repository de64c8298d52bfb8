use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use shared_models::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Monday to Friday.
    pub const WEEKDAYS: [DayOfWeek; 5] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
    ];

    /// Key used in request bodies and resource paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayOfWeek {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        DayOfWeek::ALL
            .into_iter()
            .find(|day| day.as_str() == key)
            .ok_or_else(|| AppError::Validation(format!("Unknown day of week: {}", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Booked,
    Past,
    Blocked,
    #[serde(other)]
    Unknown,
}

/// A single bookable unit, e.g. `09:00`-`09:30`.
///
/// Times are zero-padded 24-hour strings; ordering and equality are plain
/// string comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start_time: String,
    pub end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SlotStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<String>,
}

impl TimeSlot {
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            start_time: start_time.into(),
            end_time: end_time.into(),
            status: None,
            appointment_id: None,
        }
    }

    pub fn with_status(mut self, status: SlotStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_booked(&self) -> bool {
        self.status == Some(SlotStatus::Booked)
    }

    pub fn to_range(&self) -> TimeRange {
        TimeRange::new(self.start_time.clone(), self.end_time.clone())
    }
}

/// A contiguous span of availability; the write format of `/availability/set`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_time: String,
    pub end_time: String,
}

impl TimeRange {
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_time, self.end_time)
    }
}

impl FromStr for TimeRange {
    type Err = AppError;

    /// Parses `HH:MM-HH:MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| AppError::Validation(format!("Expected START-END, got {}", s)))?;

        let (start, end) = (start.trim(), end.trim());
        if start.is_empty() || end.is_empty() {
            return Err(AppError::Validation(format!("Expected START-END, got {}", s)));
        }

        Ok(TimeRange::new(start, end))
    }
}

impl From<&TimeSlot> for TimeRange {
    fn from(slot: &TimeSlot) -> Self {
        slot.to_range()
    }
}

/// A doctor's schedule for one weekday, as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailability {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<String>,
    pub day_of_week: DayOfWeek,
    pub is_available: bool,
    #[serde(default)]
    pub slots: Vec<TimeSlot>,
}

impl DayAvailability {
    pub fn new(day_of_week: DayOfWeek, is_available: bool, slots: Vec<TimeSlot>) -> Self {
        Self {
            id: None,
            doctor_id: None,
            day_of_week,
            is_available,
            slots,
        }
    }

    /// Placeholder for a day the server has no record of.
    pub fn unavailable(day_of_week: DayOfWeek) -> Self {
        Self::new(day_of_week, false, Vec::new())
    }

    pub fn booked_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_booked()).count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetAvailabilityRequest {
    pub day_of_week: DayOfWeek,
    pub is_available: bool,
    pub time_ranges: Vec<TimeRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddSlotRequest {
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveSlotRequest {
    pub start_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotQuery {
    pub appointment_date: NaiveDate,
}

impl SlotQuery {
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![(
            "appointment_date",
            self.appointment_date.format("%Y-%m-%d").to_string(),
        )]
    }
}
