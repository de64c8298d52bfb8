use std::time::Duration;

use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{AuthContext, User};

pub struct TestConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub access_token: Option<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api/v1".to_string(),
            request_timeout: Duration::from_secs(5),
            access_token: Some("test-access-token".to_string()),
        }
    }
}

impl TestConfig {
    /// Points the config at a mock server root, keeping the `/api/v1` prefix.
    pub fn with_server(server_uri: &str) -> Self {
        Self {
            api_base_url: format!("{}/api/v1", server_uri),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            api_base_url: self.api_base_url.clone(),
            request_timeout: self.request_timeout,
            access_token: self.access_token.clone(),
        }
    }

    pub fn auth(&self) -> AuthContext {
        match &self.access_token {
            Some(token) => AuthContext::bearer(token.clone()),
            None => AuthContext::anonymous(),
        }
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: "patient".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn doctor(email: &str) -> Self {
        Self::new(email, "doctor")
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, "patient")
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            created_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + chrono::Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// Canned bodies shaped like the availability API's responses.
pub struct MockApiResponses;

impl MockApiResponses {
    pub fn time_slot(start_time: &str, end_time: &str, status: &str) -> Value {
        json!({
            "start_time": start_time,
            "end_time": end_time,
            "status": status,
            "appointment_id": null
        })
    }

    pub fn booked_slot(start_time: &str, end_time: &str, appointment_id: &str) -> Value {
        json!({
            "start_time": start_time,
            "end_time": end_time,
            "status": "booked",
            "appointment_id": appointment_id
        })
    }

    /// A day record whose slots are the given `(start, end)` pairs, all available.
    pub fn day_availability(day_of_week: &str, is_available: bool, slots: &[(&str, &str)]) -> Value {
        let slots: Vec<Value> = slots
            .iter()
            .map(|(start, end)| Self::time_slot(start, end, "available"))
            .collect();

        json!({
            "id": Uuid::new_v4().to_string(),
            "doctor_id": Uuid::new_v4().to_string(),
            "day_of_week": day_of_week,
            "is_available": is_available,
            "slots": slots
        })
    }

    pub fn error_response(detail: &str) -> Value {
        json!({
            "detail": detail
        })
    }
}
