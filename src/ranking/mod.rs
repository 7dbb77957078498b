// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction ranking and formatting
//!
//! Turns a raw [`Prediction`] into a validated, sorted [`Ranking`] that
//! both response representations (JSON payload, HTML card) render from.
//! The pairing of labels with probabilities is positional, so it is
//! validated here instead of assumed; a diverging classifier artifact
//! fails loudly as a [`ContractViolation`] rather than producing a
//! silently misattributed ranking.

pub mod render;

use thiserror::Error;

use crate::classifier::Prediction;

pub use render::classification_card;

/// Broken classifier artifact: the prediction does not line up with the
/// fixed label list. A server-side fault, never a client error.
#[derive(Debug, Error)]
pub enum ContractViolation {
    #[error("classifier returned {got} probabilities for {expected} labels")]
    LengthMismatch { got: usize, expected: usize },

    #[error("predicted label '{0}' is not in the label list")]
    UnknownLabel(String),
}

/// A prediction ranked for presentation: every label paired with its
/// probability, sorted descending, ties in original label-list order.
///
/// The JSON view renders `entries` as-is (predicted label included);
/// the HTML view lists `others()` under the predicted-label caption.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub predicted_label: String,
    pub confidence: f64,
    pub entries: Vec<(String, f64)>,
}

impl Ranking {
    /// Ranked entries with the predicted label excluded (exact string
    /// match). Used by the narrative HTML view only.
    pub fn others(&self) -> impl Iterator<Item = &(String, f64)> {
        self.entries
            .iter()
            .filter(move |(label, _)| *label != self.predicted_label)
    }
}

/// Pair labels with probabilities and sort descending.
///
/// Validates the model contract first: the probability vector must match
/// the label list in length, and the predicted label must sit at the
/// predicted index of the list. A pure function; identical input yields
/// identical output.
pub fn rank(prediction: &Prediction, labels: &[String]) -> Result<Ranking, ContractViolation> {
    if prediction.probabilities.len() != labels.len() {
        return Err(ContractViolation::LengthMismatch {
            got: prediction.probabilities.len(),
            expected: labels.len(),
        });
    }

    let matches_list = labels
        .get(prediction.index)
        .map(|l| *l == prediction.label)
        .unwrap_or(false);
    if !matches_list {
        return Err(ContractViolation::UnknownLabel(prediction.label.clone()));
    }

    let mut entries: Vec<(String, f64)> = labels
        .iter()
        .cloned()
        .zip(prediction.probabilities.iter().copied())
        .collect();

    // sort_by is stable: ties keep label-list order
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    Ok(Ranking {
        predicted_label: prediction.label.clone(),
        confidence: prediction.probabilities[prediction.index],
        entries,
    })
}

/// Format a probability as a percentage with two decimal places.
///
/// Uses Rust's `{:.2}` formatting (round half to even), applied
/// uniformly across both views: `0.8734` renders as `"87.34"`.
pub fn format_percent(probability: f64) -> String {
    format!("{:.2}", probability * 100.0)
}
