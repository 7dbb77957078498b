// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classification API endpoints
//!
//! POST /classify-upload (JSON), POST /upload (HTML card),
//! GET /classify-url (HTML card from a remote image).

pub mod handler;
pub mod response;

pub use handler::{classify_upload_html, classify_upload_json, classify_url, ClassifyUrlParams};
pub use response::ClassifyResponse;
