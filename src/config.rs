// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration from CLI flags and environment variables

use clap::Parser;
use std::path::PathBuf;

use crate::acquire::{DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_FETCH_BYTES};

/// Wildlife classifier node configuration
#[derive(Parser, Debug, Clone)]
#[command(name = "wildlife-classifier-node")]
#[command(about = "HTTP image classification service", long_about = None)]
pub struct ServiceConfig {
    /// Address to bind the HTTP server to
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    pub bind_addr: String,

    /// Port for the HTTP server
    #[arg(long, env = "API_PORT", default_value_t = 8008)]
    pub port: u16,

    /// Path to the ONNX classification model
    #[arg(long, env = "MODEL_PATH", default_value = "./models/wildlife.onnx")]
    pub model_path: PathBuf,

    /// Path to the labels file (one class label per line)
    #[arg(long, env = "LABELS_PATH", default_value = "./models/labels.txt")]
    pub labels_path: PathBuf,

    /// Timeout for remote image fetches, in seconds
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub fetch_timeout_secs: u64,

    /// Maximum size of a fetched remote image, in bytes
    #[arg(long, env = "MAX_FETCH_BYTES", default_value_t = DEFAULT_MAX_FETCH_BYTES)]
    pub max_fetch_bytes: usize,
}
