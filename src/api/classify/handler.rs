// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classification endpoint handlers
//!
//! Each handler is the same pipeline with a different acquisition front
//! and response representation: acquire → decode → predict → rank →
//! render. Inference runs on a blocking task so the async scheduler is
//! not stalled by CPU-bound model work.

use axum::extract::{Query, State};
use axum::response::Html;
use axum::Json;
use axum_extra::extract::Multipart;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use tracing::{info, warn};

use super::response::ClassifyResponse;
use crate::acquire::{self, ImageBytes};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::api::pages::layout;
use crate::ranking::{classification_card, rank, Ranking};
use crate::vision::decode_image_bytes;

#[derive(Debug, Deserialize)]
pub struct ClassifyUrlParams {
    pub url: String,
}

/// POST /classify-upload - classify an uploaded image, return JSON
pub async fn classify_upload_json(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let bytes = acquire::read_upload(multipart).await?;
    let ranking = classify_bytes(&state, bytes).await?;
    Ok(Json(ClassifyResponse::from(&ranking)))
}

/// POST /upload - classify an uploaded image, return the HTML card
///
/// The uploaded image is embedded in the card as a base64 data URI so
/// the page needs no further request to display it.
pub async fn classify_upload_html(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, ApiError> {
    let bytes = acquire::read_upload(multipart).await?;

    let content_type = bytes
        .content_type
        .clone()
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let image_src = format!("data:{};base64,{}", content_type, STANDARD.encode(&bytes.data));

    let ranking = classify_bytes(&state, bytes).await?;
    Ok(Html(layout(&classification_card(&ranking, &image_src))))
}

/// GET /classify-url?url=... - fetch a remote image, classify it,
/// return the HTML card with the original URL as the image source
pub async fn classify_url(
    State(state): State<AppState>,
    Query(params): Query<ClassifyUrlParams>,
) -> Result<Html<String>, ApiError> {
    let bytes =
        acquire::fetch_url(&state.http_client, &params.url, state.max_fetch_bytes).await?;
    let ranking = classify_bytes(&state, bytes).await?;
    Ok(Html(layout(&classification_card(&ranking, &params.url))))
}

/// Shared pipeline tail: decode, predict on a blocking task, rank.
async fn classify_bytes(state: &AppState, bytes: ImageBytes) -> Result<Ranking, ApiError> {
    let image = decode_image_bytes(&bytes).map_err(|e| {
        warn!(error = %e, "rejecting undecodable upload");
        e
    })?;

    let classifier = state.classifier.clone();
    let prediction = tokio::task::spawn_blocking(move || classifier.predict(&image))
        .await
        .map_err(|e| ApiError::InternalError(format!("inference task failed: {}", e)))??;

    info!(
        label = %prediction.label,
        index = prediction.index,
        "classified image"
    );

    let ranking = rank(&prediction, state.classifier.labels())?;
    Ok(ranking)
}
