use anyhow::Result;
use axum::http::StatusCode;
use chrono::Duration;
use serde_json::{Value, json};
use vaxtrack_core::api_routes::{self, utils as route_utils, v1};

mod support;

use support::{at, build_test_app, identity, record, vaccination_body};

#[tokio::test]
async fn health_does_not_require_identity() -> Result<()> {
    let app = build_test_app(at(2025, 1, 1, 12))?;

    let response = app.server.get(api_routes::HEALTH).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn api_routes_require_a_pharmacist_header() -> Result<()> {
    let app = build_test_app(at(2025, 1, 1, 12))?;

    let response = app
        .server
        .post(v1::vaccinations::COLLECTION)
        .json(&vaccination_body("P-001", "2025-01-01T09:00:00Z", "days_14"))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"]["kind"], "unauthorized");
    assert_eq!(body["error"]["status"], 401);
    Ok(())
}

#[tokio::test]
async fn recording_derives_the_follow_up_due_date() -> Result<()> {
    let app = build_test_app(at(2025, 1, 1, 12))?;

    let event = record(
        &app.server,
        &vaccination_body("P-001", "2025-01-01T09:00:00Z", "days_14"),
    )
    .await;

    assert_eq!(event["next_dose_due"], "2025-01-15");
    assert_eq!(event["status"], "follow_up_due");
    assert_eq!(event["vaccine_name"], "COVID-19");
    assert_eq!(event["recorded_by"], "ph-1");
    Ok(())
}

#[tokio::test]
async fn invalid_input_is_a_validation_error() -> Result<()> {
    let app = build_test_app(at(2025, 1, 1, 12))?;
    let (name, value) = identity();

    let mut missing_batch = vaccination_body("P-001", "2025-01-01T09:00:00Z", "days_14");
    missing_batch["batch_number"] = json!("  ");
    let response = app
        .server
        .post(v1::vaccinations::COLLECTION)
        .add_header(name, value)
        .json(&missing_batch)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["kind"], "validation_error");
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap_or_default()
            .contains("batch_number")
    );

    let unknown_policy = vaccination_body("P-001", "2025-01-01T09:00:00Z", "fortnightly");
    let response = app
        .server
        .post(v1::vaccinations::COLLECTION)
        .add_header(name, value)
        .json(&unknown_policy)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["kind"], "validation_error");

    let future = vaccination_body("P-001", "2025-01-02T09:00:00Z", "days_14");
    let response = app
        .server
        .post(v1::vaccinations::COLLECTION)
        .add_header(name, value)
        .json(&future)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn follow_up_completes_once() -> Result<()> {
    let app = build_test_app(at(2025, 1, 1, 12))?;
    let (name, value) = identity();

    let event = record(
        &app.server,
        &vaccination_body("P-001", "2025-01-01T09:00:00Z", "days_7"),
    )
    .await;
    let id = event["id"].as_str().unwrap_or_default();
    let path = route_utils::replace_param(v1::vaccinations::COMPLETE_FOLLOW_UP, "{id}", id);

    let first = app.server.post(&path).add_header(name, value).await;
    first.assert_status_ok();
    let body: Value = first.json();
    assert_eq!(body["data"]["status"], "follow_up_completed");

    let second = app.server.post(&path).add_header(name, value).await;
    second.assert_status(StatusCode::CONFLICT);
    let body: Value = second.json();
    assert_eq!(body["error"]["kind"], "invalid_state");
    Ok(())
}

#[tokio::test]
async fn lookups_distinguish_missing_and_malformed_ids() -> Result<()> {
    let app = build_test_app(at(2025, 1, 1, 12))?;
    let (name, value) = identity();

    let unknown = route_utils::replace_param(
        v1::vaccinations::ITEM,
        "{id}",
        "0191f3c4-0000-7000-8000-000000000000",
    );
    let response = app.server.get(&unknown).add_header(name, value).await;
    response.assert_status(StatusCode::NOT_FOUND);

    let malformed = route_utils::replace_param(v1::vaccinations::ITEM, "{id}", "not-a-uuid");
    let response = app.server.get(&malformed).add_header(name, value).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn patient_history_lists_newest_first() -> Result<()> {
    let app = build_test_app(at(2025, 3, 1, 12))?;
    let (name, value) = identity();

    record(
        &app.server,
        &vaccination_body("P-001", "2025-01-01T09:00:00Z", "none"),
    )
    .await;
    record(
        &app.server,
        &vaccination_body("P-001", "2025-02-01T09:00:00Z", "one_month"),
    )
    .await;
    record(
        &app.server,
        &vaccination_body("P-002", "2025-02-01T09:00:00Z", "none"),
    )
    .await;

    let path = route_utils::replace_param(v1::vaccinations::BY_PATIENT, "{patient_id}", "P-001");
    let response = app.server.get(&path).add_header(name, value).await;
    response.assert_status_ok();
    let body: Value = response.json();
    let events = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["administered_at"], "2025-02-01T09:00:00Z");
    assert_eq!(events[1]["status"], "administered");
    Ok(())
}

#[tokio::test]
async fn manual_sweep_marks_overdue_follow_ups_missed() -> Result<()> {
    let app = build_test_app(at(2025, 1, 1, 12))?;
    let (name, value) = identity();

    let event = record(
        &app.server,
        &vaccination_body("P-001", "2025-01-01T09:00:00Z", "days_14"),
    )
    .await;

    // Due 2025-01-15; the default grace period is 30 days.
    app.clock.set(at(2025, 2, 14, 0));
    let response = app
        .server
        .post(v1::maintenance::SWEEP)
        .add_header(name, value)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["missed"], json!([event["id"]]));

    let again = app
        .server
        .post(v1::maintenance::SWEEP)
        .add_header(name, value)
        .await;
    let body: Value = again.json();
    assert_eq!(body["data"]["missed"], json!([]));

    app.clock.advance(Duration::days(1));
    let path = route_utils::replace_param(
        v1::vaccinations::COMPLETE_FOLLOW_UP,
        "{id}",
        event["id"].as_str().unwrap_or_default(),
    );
    let late = app.server.post(&path).add_header(name, value).await;
    late.assert_status(StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn vaccine_catalog_is_listed() -> Result<()> {
    let app = build_test_app(at(2025, 1, 1, 12))?;
    let (name, value) = identity();

    let response = app.server.get(v1::VACCINES).add_header(name, value).await;
    response.assert_status_ok();
    let body: Value = response.json();
    let names = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(names.len(), 14);
    assert!(names.contains(&json!("Hepatitis B")));
    Ok(())
}
