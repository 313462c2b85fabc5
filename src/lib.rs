//! Library exports for reuse in integration tests.
/// Typed client for the prediction service.
pub mod api;
/// Application directory helpers.
pub mod app_dirs;
/// Configuration loading and saving.
pub mod config;
/// Shared egui UI modules.
pub mod egui_app;
/// Known feature keys and labels.
pub mod features;
mod http_client;
/// Logging setup.
pub mod logging;
/// Bounded random draws for sample generation.
pub mod sampling;
