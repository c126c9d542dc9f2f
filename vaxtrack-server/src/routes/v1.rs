use axum::{
    Router, middleware,
    routing::{get, post},
};
use vaxtrack_core::api_routes::v1;

use crate::{
    AppState,
    handlers::{adr_reports, catalog, dashboard, escalations, maintenance, vaccinations},
    infra::middleware::principal_middleware,
};

/// Create all v1 API routes. Every route requires a pharmacist identity.
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        // Vaccination records
        .route(
            v1::vaccinations::COLLECTION,
            post(vaccinations::record_vaccination),
        )
        .route(v1::vaccinations::ITEM, get(vaccinations::get_vaccination))
        .route(
            v1::vaccinations::COMPLETE_FOLLOW_UP,
            post(vaccinations::complete_follow_up),
        )
        .route(
            v1::vaccinations::BY_PATIENT,
            get(vaccinations::list_patient_vaccinations),
        )
        // Adverse reactions and escalation
        .route(v1::adr_reports::COLLECTION, post(adr_reports::submit_report))
        .route(v1::adr_reports::ITEM, get(adr_reports::get_report))
        .route(v1::escalations::OPEN, get(escalations::list_open))
        .route(v1::escalations::ITEM, get(escalations::get_escalation))
        .route(
            v1::escalations::ACKNOWLEDGE,
            post(escalations::acknowledge),
        )
        // Dashboard and reference data
        .route(v1::DASHBOARD, get(dashboard::snapshot))
        .route(v1::VACCINES, get(catalog::list_vaccines))
        .route(v1::maintenance::SWEEP, post(maintenance::sweep))
        .route_layer(middleware::from_fn(principal_middleware))
}
