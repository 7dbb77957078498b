// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image acquisition from uploads and remote URLs
//!
//! Produces [`ImageBytes`] from either a multipart form upload or a
//! single HTTP GET against a caller-supplied URL. Each request acquires
//! its bytes exactly once; nothing here retries or caches.

use axum_extra::extract::Multipart;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Default cap on a fetched response body (10MB)
pub const DEFAULT_MAX_FETCH_BYTES: usize = 10 * 1024 * 1024;

/// Default request timeout for URL fetches
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Raw image bytes plus the declared content type, if any.
///
/// Consumed once by the decoder and dropped with the request.
#[derive(Debug, Clone)]
pub struct ImageBytes {
    pub data: Bytes,
    pub content_type: Option<String>,
}

impl ImageBytes {
    pub fn new(data: Bytes, content_type: Option<String>) -> Self {
        Self { data, content_type }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Errors reading an uploaded file out of a multipart form
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("multipart form is missing the 'file' field")]
    MissingFileField,

    #[error("uploaded file is empty")]
    EmptyUpload,

    #[error("failed to read multipart form: {0}")]
    MultipartRead(String),
}

/// Errors fetching an image from a remote URL
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("'{0}' is not a valid absolute http(s) URL")]
    InvalidUrl(String),

    #[error("request to '{url}' failed: {message}")]
    Request { url: String, message: String },

    #[error("'{url}' returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("response from '{url}' exceeds the {limit} byte fetch limit")]
    TooLarge { url: String, limit: usize },
}

/// Build the shared HTTP client used for URL fetches.
///
/// One client per process; reqwest pools connections internally.
pub fn build_http_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Read the `file` field of a multipart upload fully into memory.
///
/// Captures the part's declared content type so the HTML view can embed
/// the image as a data URI. An absent field or a zero-length body is an
/// [`AcquireError`].
pub async fn read_upload(mut multipart: Multipart) -> Result<ImageBytes, AcquireError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AcquireError::MultipartRead(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().map(|ct| ct.to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| AcquireError::MultipartRead(e.to_string()))?;

        if data.is_empty() {
            return Err(AcquireError::EmptyUpload);
        }

        debug!(bytes = data.len(), ?content_type, "read multipart upload");
        return Ok(ImageBytes::new(data, content_type));
    }

    Err(AcquireError::MissingFileField)
}

/// Fetch image bytes from a remote URL with a single GET request.
///
/// The URL must be absolute http or https. The response body is streamed
/// and capped at `max_bytes`; a non-2xx status fails without reading the
/// body. No retries.
pub async fn fetch_url(
    client: &Client,
    raw_url: &str,
    max_bytes: usize,
) -> Result<ImageBytes, FetchError> {
    let parsed = Url::parse(raw_url).map_err(|_| FetchError::InvalidUrl(raw_url.to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(FetchError::InvalidUrl(raw_url.to_string()));
    }

    let response = client
        .get(parsed)
        .send()
        .await
        .map_err(|e| FetchError::Request {
            url: raw_url.to_string(),
            message: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: raw_url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| FetchError::Request {
            url: raw_url.to_string(),
            message: e.to_string(),
        })?;
        if body.len() + chunk.len() > max_bytes {
            return Err(FetchError::TooLarge {
                url: raw_url.to_string(),
                limit: max_bytes,
            });
        }
        body.extend_from_slice(&chunk);
    }

    debug!(bytes = body.len(), url = raw_url, "fetched remote image");
    Ok(ImageBytes::new(Bytes::from(body), content_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use std::net::SocketAddr;

    async fn spawn_stub_server(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    #[test]
    fn test_image_bytes_accessors() {
        let bytes = ImageBytes::new(Bytes::from_static(b"abc"), Some("image/png".to_string()));
        assert_eq!(bytes.len(), 3);
        assert!(!bytes.is_empty());
        assert_eq!(bytes.content_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn test_fetch_rejects_relative_url() {
        let client = build_http_client(5);
        let result = fetch_url(&client, "not-a-url", 1024).await;
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_http_scheme() {
        let client = build_http_client(5);
        let result = fetch_url(&client, "ftp://example.com/img.png", 1024).await;
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_fetch_surfaces_http_404() {
        let router = Router::new().route("/img.png", get(|| async { StatusCode::NOT_FOUND }));
        let addr = spawn_stub_server(router).await;

        let client = build_http_client(5);
        let url = format!("http://{}/missing.png", addr);
        let result = fetch_url(&client, &url, 1024).await;

        match result {
            Err(FetchError::Status { status, url: u }) => {
                assert_eq!(status, 404);
                assert!(u.contains("missing.png"));
            }
            other => panic!("expected Status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_reads_body_and_content_type() {
        let router = Router::new().route(
            "/img.png",
            get(|| async {
                (
                    [(axum::http::header::CONTENT_TYPE, "image/png")],
                    Bytes::from_static(&[0x89, 0x50, 0x4E, 0x47]),
                )
            }),
        );
        let addr = spawn_stub_server(router).await;

        let client = build_http_client(5);
        let url = format!("http://{}/img.png", addr);
        let bytes = fetch_url(&client, &url, 1024).await.unwrap();

        assert_eq!(&bytes.data[..], &[0x89, 0x50, 0x4E, 0x47]);
        assert_eq!(bytes.content_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn test_fetch_enforces_size_cap() {
        let router = Router::new().route(
            "/big.png",
            get(|| async { Bytes::from(vec![0u8; 4096]) }),
        );
        let addr = spawn_stub_server(router).await;

        let client = build_http_client(5);
        let url = format!("http://{}/big.png", addr);
        let result = fetch_url(&client, &url, 1024).await;

        assert!(matches!(result, Err(FetchError::TooLarge { limit: 1024, .. })));
    }
}
