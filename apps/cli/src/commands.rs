use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use availability_cell::models::{DayAvailability, DayOfWeek, TimeRange, TimeSlot};
use availability_cell::services::{
    expand_ranges, AvailabilityService, SlotQueryService, DEFAULT_SLOT_MINUTES,
};
use shared_api::ApiClient;
use shared_models::{AppError, AuthContext};

#[derive(Subcommand)]
pub enum Commands {
    /// List the configured days as returned by the server
    List,

    /// Show all seven days, Monday first
    Week,

    /// Replace a day's hours
    Set {
        day: DayOfWeek,

        /// Working hours as HH:MM-HH:MM, repeatable
        #[arg(short, long = "range")]
        ranges: Vec<TimeRange>,

        /// Mark the day as not available
        #[arg(long)]
        unavailable: bool,
    },

    /// Add hours to a day, merging with overlapping hours
    AddSlot {
        day: DayOfWeek,
        start: String,
        end: String,
    },

    /// Give Monday to Friday the same hours
    Setup {
        #[arg(default_value = "09:00")]
        start: String,
        #[arg(default_value = "17:00")]
        end: String,
    },

    /// Remove the slot starting at the given time
    RemoveSlot { day: DayOfWeek, start: String },

    /// Delete a day's availability
    Delete { day: DayOfWeek },

    /// Turn a day on or off, keeping its hours
    Toggle { day: DayOfWeek, state: DayState },

    /// Save a day given as discrete slots
    Update {
        day: DayOfWeek,

        /// Slots as HH:MM-HH:MM, repeatable
        #[arg(short, long = "slot")]
        slots: Vec<TimeRange>,

        #[arg(long)]
        unavailable: bool,
    },

    /// Bookable slots for a doctor on a date (YYYY-MM-DD)
    Slots { doctor_id: String, date: NaiveDate },

    /// Show the slots the server would generate for some hours
    Preview {
        #[arg(short, long = "range", required = true)]
        ranges: Vec<TimeRange>,

        /// Slot length in minutes
        #[arg(short, long, default_value_t = DEFAULT_SLOT_MINUTES)]
        minutes: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DayState {
    On,
    Off,
}

pub async fn run(command: Commands, client: ApiClient, auth: &AuthContext) -> Result<(), AppError> {
    let availability = AvailabilityService::new(client.clone());

    match command {
        Commands::List => print_json(&availability.get_availability(auth).await?),
        Commands::Week => print_json(&availability.get_weekly_schedule(auth).await?),
        Commands::Set {
            day,
            ranges,
            unavailable,
        } => print_json(
            &availability
                .set_availability(day, !unavailable, ranges, auth)
                .await?,
        ),
        Commands::AddSlot { day, start, end } => {
            let schedule = availability.get_weekly_schedule(auth).await?;
            let (plan, updated) = availability
                .apply_slot(schedule.day(day), &start, &end, auth)
                .await?;
            print_json(&json!({ "plan": plan, "availability": updated }))
        }
        Commands::Setup { start, end } => {
            print_json(&availability.setup_weekdays(&start, &end, auth).await?)
        }
        Commands::RemoveSlot { day, start } => {
            print_json(&availability.remove_slot(day, &start, auth).await?)
        }
        Commands::Delete { day } => {
            availability.delete_availability(day, auth).await?;
            info!("Availability for {} deleted", day.label());
            print_json(&json!({ "deleted": day }))
        }
        Commands::Toggle { day, state } => {
            let schedule = availability.get_weekly_schedule(auth).await?;
            let enabled = matches!(state, DayState::On);
            print_json(
                &availability
                    .toggle_day(schedule.day(day), enabled, auth)
                    .await?,
            )
        }
        Commands::Update {
            day,
            slots,
            unavailable,
        } => {
            let slots: Vec<TimeSlot> = slots
                .into_iter()
                .map(|range| TimeSlot::new(range.start_time, range.end_time))
                .collect();
            let record = DayAvailability::new(day, !unavailable, slots);
            print_json(&availability.update_availability(record, auth).await?)
        }
        Commands::Slots { doctor_id, date } => {
            let slots = SlotQueryService::new(client)
                .get_doctor_availability_for_date(&doctor_id, date, auth)
                .await?;
            print_json(&json!({
                "doctor_id": doctor_id,
                "date": date,
                "day_of_week": DayOfWeek::from_date(date),
                "slots": slots,
            }))
        }
        Commands::Preview { ranges, minutes } => print_json(&expand_ranges(&ranges, minutes)?),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
