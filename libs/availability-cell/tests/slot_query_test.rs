use assert_matches::assert_matches;
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use availability_cell::models::SlotStatus;
use availability_cell::services::SlotQueryService;
use shared_models::{AppError, AuthContext};
use shared_utils::test_utils::{MockApiResponses, TestConfig};

const DOCTOR_ID: &str = "7f1c2a8e-doctor";

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn create_service(mock_server: &MockServer) -> SlotQueryService {
    let config = TestConfig::with_server(&mock_server.uri());
    SlotQueryService::from_config(&config.to_app_config()).unwrap()
}

async fn mount_body(mock_server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/availability/doctor/{}", DOCTOR_ID)))
        .and(query_param("appointment_date", "2026-10-19"))
        .respond_with(response)
        .expect(1)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_returns_slots_from_array() {
    let mock_server = MockServer::start().await;
    mount_body(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(json!([
            MockApiResponses::time_slot("09:00", "09:30", "available"),
            MockApiResponses::booked_slot("09:30", "10:00", "appt-1"),
            MockApiResponses::time_slot("10:00", "10:30", "past"),
        ])),
    )
    .await;

    let service = create_service(&mock_server);
    let slots = service
        .get_doctor_availability_for_date(DOCTOR_ID, date(), &AuthContext::anonymous())
        .await
        .unwrap();

    assert_eq!(slots.len(), 3);
    assert_eq!(slots[0].status, Some(SlotStatus::Available));
    assert!(slots[1].is_booked());
    assert_eq!(slots[1].appointment_id.as_deref(), Some("appt-1"));
    assert_eq!(slots[2].status, Some(SlotStatus::Past));
}

#[tokio::test]
async fn test_empty_array_is_empty() {
    let mock_server = MockServer::start().await;
    mount_body(&mock_server, ResponseTemplate::new(200).set_body_json(json!([]))).await;

    let service = create_service(&mock_server);
    let slots = service
        .get_doctor_availability_for_date(DOCTOR_ID, date(), &AuthContext::anonymous())
        .await
        .unwrap();

    assert!(slots.is_empty());
}

#[tokio::test]
async fn test_non_array_bodies_become_empty() {
    let bodies = [
        ResponseTemplate::new(200).set_body_json(json!(null)),
        ResponseTemplate::new(200).set_body_json(json!({})),
        ResponseTemplate::new(200).set_body_json(json!("error")),
        ResponseTemplate::new(200).set_body_json(json!({ "slots": [] })),
        ResponseTemplate::new(200),
        ResponseTemplate::new(200).set_body_string("not json"),
    ];

    for body in bodies {
        let mock_server = MockServer::start().await;
        mount_body(&mock_server, body).await;

        let service = create_service(&mock_server);
        let slots = service
            .get_doctor_availability_for_date(DOCTOR_ID, date(), &AuthContext::anonymous())
            .await
            .unwrap();

        assert!(slots.is_empty());
    }
}

#[tokio::test]
async fn test_server_error_is_propagated() {
    let mock_server = MockServer::start().await;
    mount_body(
        &mock_server,
        ResponseTemplate::new(500).set_body_json(MockApiResponses::error_response("boom")),
    )
    .await;

    let service = create_service(&mock_server);
    let result = service
        .get_doctor_availability_for_date(DOCTOR_ID, date(), &AuthContext::anonymous())
        .await;

    assert_matches!(result, Err(AppError::Api { status: 500, .. }));
}

#[tokio::test]
async fn test_malformed_item_is_invalid_response() {
    let mock_server = MockServer::start().await;
    mount_body(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(json!([
            MockApiResponses::time_slot("09:00", "09:30", "available"),
            { "start_time": 900 },
        ])),
    )
    .await;

    let service = create_service(&mock_server);
    let result = service
        .get_doctor_availability_for_date(DOCTOR_ID, date(), &AuthContext::anonymous())
        .await;

    assert_matches!(result, Err(AppError::InvalidResponse(msg)) if msg.contains("slot 1"));
}

#[tokio::test]
async fn test_anonymous_request_has_no_authorization_header() {
    let mock_server = MockServer::start().await;
    mount_body(&mock_server, ResponseTemplate::new(200).set_body_json(json!([]))).await;

    let service = create_service(&mock_server);
    service
        .get_doctor_availability_for_date(DOCTOR_ID, date(), &AuthContext::anonymous())
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_token_is_sent_when_present() {
    let mock_server = MockServer::start().await;
    mount_body(&mock_server, ResponseTemplate::new(200).set_body_json(json!([]))).await;

    let config = TestConfig::with_server(&mock_server.uri());
    let service = SlotQueryService::from_config(&config.to_app_config()).unwrap();
    service
        .get_doctor_availability_for_date(DOCTOR_ID, date(), &config.auth())
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].headers.get("authorization").unwrap(),
        "Bearer test-access-token"
    );
}

#[tokio::test]
async fn test_doctor_id_with_path_characters_is_rejected() {
    let mock_server = MockServer::start().await;

    let service = create_service(&mock_server);
    for doctor_id in ["other/doctor", "doc?appointment_date=2020-01-01", ""] {
        let result = service
            .get_doctor_availability_for_date(doctor_id, date(), &AuthContext::anonymous())
            .await;
        assert_matches!(result, Err(AppError::Validation(_)));
    }

    assert!(mock_server.received_requests().await.unwrap().is_empty());
}
