// Router setup
use crate::handlers;
use crate::server::state::AppState;
use axum::error_handling::HandleErrorLayer;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Router, http};
use http::HeaderValue;
use http::header::CACHE_CONTROL;
use std::time;
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::cors;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::error;

// Outer deadline for a whole request. Each upstream call already times out
// after 10 seconds, this bounds the request even if the fetch layer stalls.
const REQUEST_TIMEOUT: time::Duration = time::Duration::from_secs(30);

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::healthy))
        .route("/departures.json", get(handlers::departures_json))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(|_: BoxError| async {
                    error!("Timed out");
                    (StatusCode::REQUEST_TIMEOUT, "Timed out. Sorry!".to_string())
                }))
                .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
                .layer(
                    CorsLayer::new()
                        .allow_methods([http::Method::GET])
                        .allow_origin(cors::Any),
                ),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=10"),
        ))
        .with_state(state)
}
