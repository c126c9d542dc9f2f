#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum_test::TestServer;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};
use vaxtrack_core::{application::AppUnitOfWork, clock::ManualClock};
use vaxtrack_server::{
    AppState, create_app,
    infra::{config::Config, middleware::PHARMACIST_HEADER},
};

/// Router over the in-memory store, driven by a manual clock.
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub clock: ManualClock,
}

pub fn build_test_app(start: DateTime<Utc>) -> Result<TestApp> {
    let clock = ManualClock::new(start);
    let state = AppState::new(
        AppUnitOfWork::in_memory(),
        Arc::new(clock.clone()),
        Arc::new(Config::default()),
    );
    let server = TestServer::new(create_app(state.clone()))
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;

    Ok(TestApp {
        server,
        state,
        clock,
    })
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub const PHARMACIST: &str = "ph-1";

pub fn identity() -> (&'static str, &'static str) {
    (PHARMACIST_HEADER, PHARMACIST)
}

pub fn vaccination_body(patient: &str, administered_at: &str, policy: &str) -> Value {
    json!({
        "patient_id": patient,
        "vaccine_name": "covid-19",
        "batch_number": "BT01",
        "dose_number": 1,
        "administered_at": administered_at,
        "follow_up_policy": policy,
    })
}

pub fn adr_body(patient: &str, severity: &str, outcome: &str) -> Value {
    json!({
        "patient_id": patient,
        "vaccine_name": "Influenza",
        "batch_number": "FL-22",
        "vaccinated_on": "2025-01-01",
        "onset_at": "2025-01-01T10:15:00Z",
        "severity": severity,
        "outcome": outcome,
        "symptoms": "hives and wheezing",
    })
}

/// Posts a vaccination as [`PHARMACIST`] and returns the stored event.
pub async fn record(server: &TestServer, body: &Value) -> Value {
    let (name, value) = identity();
    let response = server
        .post(vaxtrack_core::api_routes::v1::vaccinations::COLLECTION)
        .add_header(name, value)
        .json(body)
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let body: Value = response.json();
    body["data"].clone()
}
