use chrono::NaiveDate;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use shared_api::ApiClient;
use shared_config::AppConfig;
use shared_models::{AppError, AuthContext};

use crate::models::{SlotQuery, TimeSlot};

/// Public lookup of a doctor's bookable slots on a calendar date.
pub struct SlotQueryService {
    client: ApiClient,
}

impl SlotQueryService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Ok(Self::new(ApiClient::new(config)?))
    }

    /// Bookable slots for `doctor_id` on `appointment_date`.
    ///
    /// Works without a token. A body that is not a JSON array yields an empty
    /// list; transport and HTTP failures are returned as errors.
    pub async fn get_doctor_availability_for_date(
        &self,
        doctor_id: &str,
        appointment_date: NaiveDate,
        auth: &AuthContext,
    ) -> Result<Vec<TimeSlot>, AppError> {
        validate_doctor_id(doctor_id)?;

        let query = SlotQuery { appointment_date };
        let path = format!("/availability/doctor/{}", doctor_id);

        debug!(
            "Requesting slots for doctor {} on {}",
            doctor_id, appointment_date
        );

        let body = self
            .client
            .request_value(Method::GET, &path, auth, &query.to_query_pairs())
            .await
            .map_err(|e| {
                error!("Error fetching slots for doctor {}: {}", doctor_id, e);
                e
            })?;

        let slots = normalize_slot_response(body)?;
        info!(
            "Doctor {} has {} slots on {}",
            doctor_id,
            slots.len(),
            appointment_date
        );

        Ok(slots)
    }
}

/// Turns a slot-query body into slots.
///
/// Any top-level shape other than an array becomes an empty list. An array
/// whose items are not slots is an [`AppError::InvalidResponse`].
pub fn normalize_slot_response(body: Value) -> Result<Vec<TimeSlot>, AppError> {
    match body {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value::<TimeSlot>(item).map_err(|e| {
                    AppError::InvalidResponse(format!("slot {} is malformed: {}", index, e))
                })
            })
            .collect(),
        other => {
            warn!("Expected an array of slots, got {}; returning none", json_type(&other));
            Ok(Vec::new())
        }
    }
}

/// Doctor ids are interpolated into the request path, so only id characters
/// (letters, digits, `-` and `_`) are accepted.
fn validate_doctor_id(doctor_id: &str) -> Result<(), AppError> {
    let valid = !doctor_id.is_empty()
        && doctor_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Invalid doctor id: {:?}", doctor_id)))
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
