use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{health_handler, index_handler, redirect_handler, shorten_handler};
use crate::state::AppState;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct App {}

impl App {
    pub fn router(state: AppState, request_timeout: Duration) -> Router {
        Router::new()
            .route("/", get(index_handler))
            .route("/health", get(health_handler))
            .route("/api/shorten", post(shorten_handler))
            .route("/{short_code}", get(redirect_handler))
            .with_state(state)
            .layer((
                TraceLayer::new_for_http(),
                TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout),
            ))
    }
}
