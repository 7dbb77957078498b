// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX classifier wrapper
//!
//! Loads a pretrained classification model plus its label list from disk
//! and exposes [`ImageClassifier`]. The model is an opaque artifact;
//! this wrapper only assumes it takes one NCHW float input and returns
//! one logit per label.

use anyhow::{Context, Result};
use image::DynamicImage;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

use super::{ImageClassifier, PredictError, Prediction};
use crate::vision::preprocess_for_classification;

/// ONNX-based image classifier
///
/// # Thread Safety
/// The session sits behind `Arc<Mutex>` for thread-safe shared access;
/// the label list is immutable after load.
#[derive(Clone)]
pub struct OnnxClassifier {
    /// ONNX Runtime session (wrapped in Arc<Mutex> for thread-safe shared access)
    session: Arc<Mutex<Session>>,

    /// Name of the model's input tensor
    input_name: String,

    /// Ordered class labels, one per model output
    labels: Arc<Vec<String>>,

    /// Model name (file stem), for logging and health reporting
    model_name: String,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("model_name", &self.model_name)
            .field("labels", &self.labels.len())
            .finish_non_exhaustive()
    }
}

impl OnnxClassifier {
    /// Loads the classifier from an ONNX model file and a labels file
    /// (one label per line, list order = model output order).
    ///
    /// # Errors
    /// Returns error if either file is missing, the session cannot be
    /// built, or the labels file is empty.
    pub fn load<P: AsRef<Path>>(model_path: P, labels_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();
        let labels_path = labels_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }
        if !labels_path.exists() {
            anyhow::bail!("Labels file not found: {}", labels_path.display());
        }

        let labels = load_labels(labels_path)?;

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load ONNX model from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .context("Model declares no inputs")?;

        let model_name = model_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("classifier")
            .to_string();

        info!(
            model = %model_name,
            labels = labels.len(),
            "classifier loaded"
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            labels: Arc::new(labels),
            model_name,
        })
    }
}

impl ImageClassifier for OnnxClassifier {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Runs one inference: preprocess to NCHW, run the session, softmax
    /// the first output row, argmax for the winning label.
    fn predict(&self, image: &DynamicImage) -> Result<Prediction, PredictError> {
        let tensor = preprocess_for_classification(image);

        let mut session = self
            .session
            .lock()
            .map_err(|_| PredictError::Inference("session lock poisoned".to_string()))?;

        let input =
            Value::from_array(tensor).map_err(|e| PredictError::Inference(e.to_string()))?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(|e| PredictError::Inference(e.to_string()))?;

        let output = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| PredictError::Inference(e.to_string()))?;

        // First (only) batch row of logits
        let logits: Vec<f32> = output.iter().copied().collect();
        if logits.is_empty() {
            return Err(PredictError::EmptyOutput);
        }

        let probabilities = softmax(&logits);
        let index = probabilities
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .ok_or(PredictError::EmptyOutput)?;

        // Out-of-range argmax is reported downstream as a contract
        // violation; keep the raw index here.
        let label = self
            .labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("label-{}", index));

        Ok(Prediction {
            label,
            index,
            probabilities,
        })
    }
}

fn load_labels(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .context(format!("Failed to read labels file {}", path.display()))?;

    let labels: Vec<String> = raw
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(|l| l.to_string())
        .collect();

    if labels.is_empty() {
        anyhow::bail!("Labels file {} contains no labels", path.display());
    }

    Ok(labels)
}

/// Numerically stable softmax over raw logits.
fn softmax(logits: &[f32]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f64> = logits.iter().map(|&l| ((l - max) as f64).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.iter().map(|e| e / sum.max(f64::MIN_POSITIVE)).collect()
}
