use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{Value, json};
use vaxtrack_core::api_routes::{utils as route_utils, v1};
use vaxtrack_server::infra::middleware::PHARMACIST_HEADER;

mod support;

use support::{adr_body, at, build_test_app, identity, record, vaccination_body};

async fn submit(server: &axum_test::TestServer, body: &Value) -> axum_test::TestResponse {
    let (name, value) = identity();
    server
        .post(v1::adr_reports::COLLECTION)
        .add_header(name, value)
        .json(body)
        .await
}

#[tokio::test]
async fn anaphylaxis_is_escalated_and_acknowledged_once() -> Result<()> {
    let app = build_test_app(at(2025, 1, 1, 12))?;
    let (name, value) = identity();

    let response = submit(&app.server, &adr_body("P-001", "anaphylaxis", "recovering")).await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["data"]["report"]["risk_tier"], "critical");
    assert_eq!(body["data"]["report"]["escalated"], true);
    assert_eq!(body["data"]["report"]["reported_by"], "ph-1");
    let entry_id = body["data"]["escalation"]["id"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    assert_eq!(
        body["data"]["escalation"]["adr_report_id"],
        body["data"]["report"]["id"]
    );

    let open = app.server.get(v1::escalations::OPEN).add_header(name, value).await;
    open.assert_status_ok();
    let listed: Value = open.json();
    assert_eq!(listed["data"].as_array().map(Vec::len), Some(1));

    let ack_path = route_utils::replace_param(v1::escalations::ACKNOWLEDGE, "{id}", &entry_id);
    let ack = app
        .server
        .post(&ack_path)
        .add_header(PHARMACIST_HEADER, "ph-2")
        .await;
    ack.assert_status_ok();
    let acked: Value = ack.json();
    assert_eq!(acked["data"]["acknowledged_by"], "ph-2");
    assert!(acked["data"]["acknowledged_at"].is_string());

    let again = app.server.post(&ack_path).add_header(name, value).await;
    again.assert_status(StatusCode::CONFLICT);

    let item = route_utils::replace_param(v1::escalations::ITEM, "{id}", &entry_id);
    let stored: Value = app.server.get(&item).add_header(name, value).await.json();
    assert_eq!(stored["data"]["acknowledged_by"], "ph-2");

    let open: Value = app
        .server
        .get(v1::escalations::OPEN)
        .add_header(name, value)
        .await
        .json();
    assert_eq!(open["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn priority_reports_are_not_escalated() -> Result<()> {
    let app = build_test_app(at(2025, 1, 1, 12))?;
    let (name, value) = identity();

    let response = submit(&app.server, &adr_body("P-001", "severe", "recovering")).await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["data"]["report"]["risk_tier"], "priority");
    assert_eq!(body["data"]["report"]["escalated"], false);
    assert!(body["data"]["escalation"].is_null());

    let report_id = body["data"]["report"]["id"].as_str().unwrap_or_default();
    let path = route_utils::replace_param(v1::adr_reports::ITEM, "{id}", report_id);
    let fetched: Value = app.server.get(&path).add_header(name, value).await.json();
    assert_eq!(fetched["data"]["symptoms"], "hives and wheezing");
    Ok(())
}

#[tokio::test]
async fn supplied_risk_tier_is_ignored() -> Result<()> {
    let app = build_test_app(at(2025, 1, 1, 12))?;

    let mut body = adr_body("P-001", "mild", "recovered");
    body["risk_tier"] = json!("critical");
    let response = submit(&app.server, &body).await;
    response.assert_status(StatusCode::CREATED);
    let created: Value = response.json();
    assert_eq!(created["data"]["report"]["risk_tier"], "routine");
    Ok(())
}

#[tokio::test]
async fn missing_severity_is_rejected() -> Result<()> {
    let app = build_test_app(at(2025, 1, 1, 12))?;

    let mut body = adr_body("P-001", "mild", "recovered");
    if let Some(fields) = body.as_object_mut() {
        fields.remove("severity");
    }
    let response = submit(&app.server, &body).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let error: Value = response.json();
    assert_eq!(error["error"]["kind"], "validation_error");
    Ok(())
}

#[tokio::test]
async fn related_event_must_exist_and_match_the_patient() -> Result<()> {
    let app = build_test_app(at(2025, 1, 2, 12))?;

    let mut unknown = adr_body("P-001", "moderate", "recovered");
    unknown["related_vaccination_event_id"] = json!("0191f3c4-0000-7000-8000-000000000000");
    submit(&app.server, &unknown)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let event = record(
        &app.server,
        &vaccination_body("P-002", "2025-01-01T09:00:00Z", "none"),
    )
    .await;
    let mut other_patient = adr_body("P-001", "moderate", "recovered");
    other_patient["related_vaccination_event_id"] = event["id"].clone();
    submit(&app.server, &other_patient)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let mut same_patient = adr_body("P-002", "moderate", "recovered");
    same_patient["related_vaccination_event_id"] = event["id"].clone();
    submit(&app.server, &same_patient)
        .await
        .assert_status(StatusCode::CREATED);
    Ok(())
}
