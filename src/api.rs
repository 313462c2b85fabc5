//! Typed client for the wine-quality prediction service.

mod client;
mod types;

pub use client::{check_health, fetch_model_info, fetch_samples, predict};
pub use types::{
    ApiError, FeatureRange, FeatureRecord, HealthReport, ModelReport, PredictionOutcome, Preset,
    SampleBundle,
};
