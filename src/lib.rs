// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod acquire;
pub mod api;
pub mod classifier;
pub mod config;
pub mod ranking;
pub mod vision;

// Re-export the pipeline types handlers and tests work with
pub use acquire::{fetch_url, read_upload, AcquireError, FetchError, ImageBytes};
pub use api::{build_router, start_server, ApiError, AppState, ClassifyResponse, ErrorResponse};
pub use classifier::{FixedClassifier, ImageClassifier, OnnxClassifier, PredictError, Prediction};
pub use config::ServiceConfig;
pub use ranking::{classification_card, format_percent, rank, ContractViolation, Ranking};
pub use vision::{decode_image_bytes, DecodeError};
