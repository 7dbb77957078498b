// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classifier interface and the raw prediction it produces
//!
//! The model artifact is loaded once at startup and shared read-only
//! across all request tasks. Handlers only see the [`ImageClassifier`]
//! trait, so tests can drive the full pipeline with a fixed classifier
//! and no model file on disk.

pub mod onnx_model;

use image::DynamicImage;
use thiserror::Error;

pub use onnx_model::OnnxClassifier;

/// Raw output of one classification: the winning label, its index into
/// the fixed label list, and one probability per label in list order.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub index: usize,
    pub probabilities: Vec<f64>,
}

/// Inference failure inside the model runtime
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("inference failed: {0}")]
    Inference(String),

    #[error("model produced an empty output tensor")]
    EmptyOutput,
}

/// A pretrained image classifier with a fixed, ordered label list.
///
/// `predict` is synchronous and CPU-bound; callers run it on a blocking
/// task so it does not stall the async scheduler.
pub trait ImageClassifier: Send + Sync {
    /// Ordered label list, fixed at load time.
    fn labels(&self) -> &[String];

    /// Model name for logging and the health endpoint.
    fn model_name(&self) -> &str;

    fn predict(&self, image: &DynamicImage) -> Result<Prediction, PredictError>;
}

/// Classifier returning a canned probability vector, for tests and
/// wiring checks without a model artifact.
pub struct FixedClassifier {
    labels: Vec<String>,
    probabilities: Vec<f64>,
}

impl FixedClassifier {
    pub fn new(labels: Vec<String>, probabilities: Vec<f64>) -> Self {
        Self {
            labels,
            probabilities,
        }
    }
}

impl ImageClassifier for FixedClassifier {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn model_name(&self) -> &str {
        "fixed"
    }

    fn predict(&self, _image: &DynamicImage) -> Result<Prediction, PredictError> {
        let index = self
            .probabilities
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .ok_or(PredictError::EmptyOutput)?;

        // Deliberately out-of-range indexes surface as contract
        // violations downstream instead of panicking here.
        let label = self
            .labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("label-{}", index));

        Ok(Prediction {
            label,
            index,
            probabilities: self.probabilities.clone(),
        })
    }
}
