// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image decoding and model-input preprocessing
//!
//! This module turns raw request bytes into a [`image::DynamicImage`]
//! and, separately, a decoded image into the normalized tensor the
//! classifier consumes. Decoding makes no resizing or normalization
//! decisions; that belongs to preprocessing.

pub mod decode;
pub mod preprocess;

pub use decode::{decode_image_bytes, detect_format, DecodeError};
pub use preprocess::preprocess_for_classification;
