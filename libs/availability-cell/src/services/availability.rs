use futures::future::try_join_all;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use shared_api::ApiClient;
use shared_config::AppConfig;
use shared_models::{AppError, AuthContext};

use crate::models::{
    AddSlotRequest, DayAvailability, DayOfWeek, RemoveSlotRequest, SetAvailabilityRequest,
    TimeRange, TimeSlot,
};
use crate::services::normalizer::{merge_adjacent_slots, merge_overlapping_ranges};
use crate::services::planner::{plan_slot, SlotPlan};
use crate::services::schedule::WeeklySchedule;

pub struct AvailabilityService {
    client: ApiClient,
}

impl AvailabilityService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Ok(Self::new(ApiClient::new(config)?))
    }

    /// Get the doctor's weekly availability, one record per configured day
    pub async fn get_availability(&self, auth: &AuthContext) -> Result<Vec<DayAvailability>, AppError> {
        debug!("Fetching weekly availability");

        let days: Vec<DayAvailability> = self
            .client
            .request(Method::GET, "/availability", auth, None)
            .await?;

        debug!("Fetched availability for {} days", days.len());
        Ok(days)
    }

    /// Replace a day's schedule with the given ranges.
    ///
    /// Ranges are sent as given; overlap handling belongs to the server.
    pub async fn set_availability(
        &self,
        day: DayOfWeek,
        is_available: bool,
        time_ranges: Vec<TimeRange>,
        auth: &AuthContext,
    ) -> Result<DayAvailability, AppError> {
        debug!(
            "Setting availability for {}: available={}, {} ranges",
            day,
            is_available,
            time_ranges.len()
        );

        let request = SetAvailabilityRequest {
            day_of_week: day,
            is_available,
            time_ranges,
        };

        let updated: DayAvailability = self
            .client
            .request(Method::POST, "/availability/set", auth, Some(json!(request)))
            .await?;

        info!("Availability for {} now has {} slots", day, updated.slots.len());
        Ok(updated)
    }

    /// Add a single slot to a day
    pub async fn add_slot(
        &self,
        day: DayOfWeek,
        start_time: &str,
        end_time: &str,
        auth: &AuthContext,
    ) -> Result<DayAvailability, AppError> {
        debug!("Adding slot {}-{} to {}", start_time, end_time, day);

        let request = AddSlotRequest {
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
        };

        let path = format!("/availability/{}/add-slot", day);
        self.client
            .request(Method::POST, &path, auth, Some(json!(request)))
            .await
    }

    /// Remove the slot starting at `start_time` from a day.
    ///
    /// Only the start time identifies the slot; which one goes when two slots
    /// share a start time is up to the server.
    pub async fn remove_slot(
        &self,
        day: DayOfWeek,
        start_time: &str,
        auth: &AuthContext,
    ) -> Result<DayAvailability, AppError> {
        debug!("Removing slot starting {} from {}", start_time, day);

        let request = RemoveSlotRequest {
            start_time: start_time.to_string(),
        };

        let path = format!("/availability/{}/remove-slot", day);
        self.client
            .request(Method::POST, &path, auth, Some(json!(request)))
            .await
    }

    /// Delete a day's availability entirely
    pub async fn delete_availability(&self, day: DayOfWeek, auth: &AuthContext) -> Result<(), AppError> {
        debug!("Deleting availability for {}", day);

        let path = format!("/availability/{}", day);
        self.client.request_empty(Method::DELETE, &path, auth).await?;

        info!("Deleted availability for {}", day);
        Ok(())
    }

    /// Save a day expressed as discrete slots by merging them into ranges first.
    pub async fn update_availability(
        &self,
        availability: DayAvailability,
        auth: &AuthContext,
    ) -> Result<DayAvailability, AppError> {
        let time_ranges = merge_adjacent_slots(&availability.slots);
        debug!(
            "Merged {} slots into {} ranges for {}",
            availability.slots.len(),
            time_ranges.len(),
            availability.day_of_week
        );

        self.set_availability(
            availability.day_of_week,
            availability.is_available,
            time_ranges,
            auth,
        )
        .await
    }

    /// Give Monday to Friday the same working hours in one go.
    ///
    /// The five days are saved concurrently through [`Self::update_availability`];
    /// the first failure is returned.
    pub async fn setup_weekdays(
        &self,
        start_time: &str,
        end_time: &str,
        auth: &AuthContext,
    ) -> Result<Vec<DayAvailability>, AppError> {
        if start_time.is_empty() || end_time.is_empty() {
            return Err(AppError::Validation("Please select both start and end times".to_string()));
        }
        if start_time >= end_time {
            return Err(AppError::Validation("End time must be after start time".to_string()));
        }

        info!("Setting up weekday hours {}-{}", start_time, end_time);

        let saves = DayOfWeek::WEEKDAYS.into_iter().map(|day| {
            let availability =
                DayAvailability::new(day, true, vec![TimeSlot::new(start_time, end_time)]);
            self.update_availability(availability, auth)
        });

        try_join_all(saves).await
    }

    /// Fetch availability as a full Monday-to-Sunday view
    pub async fn get_weekly_schedule(&self, auth: &AuthContext) -> Result<WeeklySchedule, AppError> {
        let days = self.get_availability(auth).await?;
        Ok(WeeklySchedule::from_days(days))
    }

    /// Enable or disable a day, keeping its existing hours when enabling.
    pub async fn toggle_day(
        &self,
        current: &DayAvailability,
        enabled: bool,
        auth: &AuthContext,
    ) -> Result<DayAvailability, AppError> {
        let time_ranges = if enabled {
            let existing: Vec<TimeRange> = current.slots.iter().map(TimeRange::from).collect();
            merge_overlapping_ranges(&existing)
        } else {
            Vec::new()
        };

        self.set_availability(current.day_of_week, enabled, time_ranges, auth)
            .await
    }

    /// Plan and, when needed, apply a new slot for a day.
    ///
    /// Returns the plan together with the updated day; the day is `None` when
    /// the plan needed no request (duplicate or already covered).
    pub async fn apply_slot(
        &self,
        current: &DayAvailability,
        start_time: &str,
        end_time: &str,
        auth: &AuthContext,
    ) -> Result<(SlotPlan, Option<DayAvailability>), AppError> {
        let plan = plan_slot(&current.slots, start_time, end_time)?;
        let day = current.day_of_week;

        let updated = match &plan {
            SlotPlan::Add(range) => Some(
                self.add_slot(day, &range.start_time, &range.end_time, auth)
                    .await?,
            ),
            SlotPlan::Merge(ranges) => {
                info!("Slot {}-{} overlaps existing slots on {}, merging", start_time, end_time, day);
                Some(self.set_availability(day, true, ranges.clone(), auth).await?)
            }
            SlotPlan::Duplicate | SlotPlan::AlreadyCovered => {
                debug!("Slot {}-{} already present on {}: {:?}", start_time, end_time, day, plan);
                None
            }
        };

        Ok((plan, updated))
    }
}
