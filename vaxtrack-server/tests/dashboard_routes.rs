use anyhow::Result;
use serde_json::Value;
use vaxtrack_core::api_routes::v1;
use vaxtrack_server::infra::middleware::PHARMACIST_HEADER;

mod support;

use support::{adr_body, at, build_test_app, identity, record, vaccination_body};

#[tokio::test]
async fn dashboard_summarises_the_callers_records() -> Result<()> {
    let app = build_test_app(at(2025, 1, 10, 12))?;
    let (name, value) = identity();

    record(
        &app.server,
        &vaccination_body("P-001", "2025-01-01T09:00:00Z", "days_14"),
    )
    .await;
    record(
        &app.server,
        &vaccination_body("P-001", "2025-01-02T09:00:00Z", "none"),
    )
    .await;
    record(
        &app.server,
        &vaccination_body("P-002", "2025-01-03T09:00:00Z", "days_7"),
    )
    .await;
    app.server
        .post(v1::adr_reports::COLLECTION)
        .add_header(name, value)
        .json(&adr_body("P-001", "mild", "recovered"))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let response = app.server.get(v1::DASHBOARD).add_header(name, value).await;
    response.assert_status_ok();
    let body: Value = response.json();
    let snapshot = &body["data"];

    assert_eq!(snapshot["counts"]["total_vaccinations"], 3);
    assert_eq!(snapshot["counts"]["active_patients"], 2);
    assert_eq!(snapshot["counts"]["pending_follow_ups"], 2);
    assert_eq!(snapshot["counts"]["adr_report_count"], 1);
    assert_eq!(snapshot["recent_vaccinations"].as_array().map(Vec::len), Some(3));

    // P-002 is due 2025-01-10 (today), P-001 on 2025-01-15.
    let due = snapshot["due_follow_ups"].as_array().cloned().unwrap_or_default();
    assert_eq!(due.len(), 2);
    assert_eq!(due[0]["due_on"], "2025-01-10");
    assert_eq!(due[0]["days_until_due"], 0);
    assert_eq!(due[1]["days_until_due"], 5);
    assert_eq!(snapshot["generated_at"], "2025-01-10T12:00:00Z");
    Ok(())
}

#[tokio::test]
async fn another_pharmacist_sees_an_empty_dashboard() -> Result<()> {
    let app = build_test_app(at(2025, 1, 10, 12))?;

    record(
        &app.server,
        &vaccination_body("P-001", "2025-01-01T09:00:00Z", "days_14"),
    )
    .await;

    let body: Value = app
        .server
        .get(v1::DASHBOARD)
        .add_header(PHARMACIST_HEADER, "ph-other")
        .await
        .json();
    assert_eq!(body["data"]["counts"]["total_vaccinations"], 0);
    assert_eq!(body["data"]["due_follow_ups"].as_array().map(Vec::len), Some(0));
    Ok(())
}
