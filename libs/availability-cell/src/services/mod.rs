pub mod availability;
pub mod normalizer;
pub mod planner;
pub mod schedule;
pub mod slot_query;

pub use availability::AvailabilityService;
pub use normalizer::{expand_ranges, merge_adjacent_slots, merge_overlapping_ranges, DEFAULT_SLOT_MINUTES};
pub use planner::{plan_slot, ranges_overlap, SlotPlan};
pub use schedule::WeeklySchedule;
pub use slot_query::{normalize_slot_response, SlotQueryService};
