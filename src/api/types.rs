//! Wire and domain types for the prediction service endpoints.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Flat numeric record posted to the prediction endpoint, keyed by feature name.
pub type FeatureRecord = BTreeMap<String, f64>;

/// Errors the client surfaces to the UI.
///
/// Two kinds only: the server answered but signalled failure, or the exchange
/// itself failed (network trouble or a malformed body). Precondition checks in
/// the controller reuse the same error banner and need no kind of their own.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server responded with a non-success status payload.
    #[error("{0}")]
    Rejected(String),
    /// The request never completed or the response could not be understood.
    #[error("{0}")]
    Transport(String),
}

/// A successful prediction: class label, confidence, per-class probabilities.
#[derive(Clone, Debug)]
pub struct PredictionOutcome {
    pub prediction: String,
    /// Confidence in `[0,1]`.
    pub confidence: f64,
    pub probabilities: BTreeMap<String, f64>,
}

/// Per-feature statistical summary used to bound random sample generation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct FeatureRange {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
    pub std: f64,
}

/// A named, fixed set of feature values with a known expected class.
#[derive(Clone, Debug, Deserialize)]
pub struct Preset {
    pub id: u32,
    pub name: String,
    pub description: String,
    #[serde(rename = "expectedClass")]
    pub expected_class: String,
    pub features: BTreeMap<String, f64>,
}

/// Presets plus feature ranges, fetched once per session and cached.
#[derive(Clone, Debug)]
pub struct SampleBundle {
    pub total_samples: usize,
    pub presets: Vec<Preset>,
    pub feature_ranges: BTreeMap<String, FeatureRange>,
}

impl SampleBundle {
    /// Look up a preset by id.
    pub fn preset(&self, id: u32) -> Option<&Preset> {
        self.presets.iter().find(|preset| preset.id == id)
    }
}

/// Service health as reported by `/api/health`.
#[derive(Clone, Debug, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub service: String,
    #[serde(default)]
    pub model_loaded: bool,
}

impl HealthReport {
    /// Whether the service considers itself ready to predict.
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy" && self.model_loaded
    }
}

/// Model metadata as reported by `/api/model`.
#[derive(Clone, Debug)]
pub struct ModelReport {
    pub model_type: String,
    pub classes: Vec<String>,
    pub n_features: usize,
}
