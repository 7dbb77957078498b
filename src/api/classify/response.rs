// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classification response payload

use serde::{Deserialize, Serialize};

use crate::ranking::Ranking;

/// JSON body returned by POST /classify-upload.
///
/// `class_probabilities` holds every label (predicted one included),
/// sorted descending by probability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub predicted_class: String,
    pub class_probabilities: Vec<(String, f64)>,
}

impl From<&Ranking> for ClassifyResponse {
    fn from(ranking: &Ranking) -> Self {
        Self {
            predicted_class: ranking.predicted_label.clone(),
            class_probabilities: ranking.entries.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_nested_arrays() {
        let response = ClassifyResponse {
            predicted_class: "deer".to_string(),
            class_probabilities: vec![
                ("deer".to_string(), 0.7),
                ("other".to_string(), 0.2),
                ("boar".to_string(), 0.1),
            ],
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(
            json,
            r#"{"predicted_class":"deer","class_probabilities":[["deer",0.7],["other",0.2],["boar",0.1]]}"#
        );
    }

    #[test]
    fn test_built_from_ranking() {
        let ranking = Ranking {
            predicted_label: "boar".to_string(),
            confidence: 0.9,
            entries: vec![("boar".to_string(), 0.9), ("deer".to_string(), 0.1)],
        };
        let response = ClassifyResponse::from(&ranking);
        assert_eq!(response.predicted_class, "boar");
        assert_eq!(response.class_probabilities.len(), 2);
    }
}
