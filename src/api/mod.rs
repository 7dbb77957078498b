// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod classify;
pub mod errors;
pub mod http_server;
pub mod pages;

pub use classify::{classify_upload_html, classify_upload_json, classify_url, ClassifyResponse};
pub use errors::{ApiError, ErrorResponse};
pub use http_server::{build_router, start_server, AppState};
