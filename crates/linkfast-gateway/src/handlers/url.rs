use crate::error::{AppError, Result};
use crate::model::{ShortenRequest, ShortenResponse};
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use linkfast_core::ShortCode;
use tracing::debug;

pub async fn shorten_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ShortenResponse>> {
    // any Content-Type is accepted
    let request: ShortenRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!(error = %e, "rejected shorten request body");
        AppError::InvalidJson
    })?;

    let shortened = state.shortener().shorten(&request.url).await?;

    Ok(Json(ShortenResponse {
        short_url: shortened.short_code.to_url(state.base_url()),
        original_url: shortened.original_url,
        short_code: shortened.short_code.to_string(),
    }))
}

pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    // only well-formed codes reach the redirector
    let code = ShortCode::new(short_code).map_err(|_| AppError::NotFound)?;

    let original_url = state.redirector().resolve(&code).await?;

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, original_url)],
    )
        .into_response())
}
