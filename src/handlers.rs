// HTTP request handlers
use crate::server::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use chrono::Utc;
use muniboard::departures::{self, DeparturesResponse};
use muniboard::muni_data;
use serde::Serialize;
use tracing::instrument;

pub async fn root() -> impl IntoResponse {
    axum::response::Redirect::to("/departures.json")
}

#[instrument(name = "departures_json", skip_all)]
pub async fn departures_json(State(state): State<AppState>) -> Json<DeparturesResponse> {
    let stop_ids = state.stops.stop_ids();
    let raw = muni_data::fetch_all(&state.muni, &stop_ids).await;
    let board = departures::format(&raw, &state.stops, Utc::now(), state.max_departures);
    Json(DeparturesResponse::new(board, Utc::now()))
}

#[derive(Serialize)]
pub struct Healthy {
    pub status: &'static str,
}

pub async fn healthy() -> Json<Healthy> {
    Json(Healthy { status: "ok" })
}
