// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use std::{env, sync::Arc};
use tokio::signal;
use wildlife_classifier_node::{
    acquire::build_http_client,
    api::{start_server, AppState},
    classifier::OnnxClassifier,
    config::ServiceConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = ServiceConfig::parse();

    tracing::info!(
        model = %config.model_path.display(),
        labels = %config.labels_path.display(),
        "loading classifier"
    );

    // Model and label list load once; every request shares them read-only
    let classifier = OnnxClassifier::load(&config.model_path, &config.labels_path)?;

    let state = AppState::new(
        Arc::new(classifier),
        build_http_client(config.fetch_timeout_secs),
        config.max_fetch_bytes,
    );

    tokio::select! {
        result = start_server(&config, state) => {
            result.map_err(|e| anyhow::anyhow!("server error: {}", e))?;
        }
        _ = signal::ctrl_c() => {
            tracing::info!("shutdown signal received, stopping");
        }
    }

    Ok(())
}
