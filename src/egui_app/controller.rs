//! Maintains app state and bridges the prediction service to the egui UI.

mod jobs;

use egui::Color32;
use rand::Rng;

use crate::api::{
    ApiError, FeatureRecord, HealthReport, ModelReport, PredictionOutcome, SampleBundle,
};
use crate::config::AppConfig;
use crate::egui_app::state::*;
use crate::egui_app::view_model;
use crate::sampling;

use jobs::{ControllerJobs, JobMessage};

const NOT_LOADED_MESSAGE: &str = "Sample data not loaded yet. Please try again.";

/// Owns the form lifecycle, the cached sample bundle, and the preset selection.
///
/// Every UI transition goes through exactly one method here; the renderer
/// only reads `ui` and calls these methods.
pub struct PredictionController {
    pub ui: UiState,
    samples: Option<SampleBundle>,
    current_preset: Option<u32>,
    base_url: String,
    jobs: ControllerJobs,
}

impl PredictionController {
    pub fn new(config: AppConfig) -> Self {
        let mut controller = Self {
            ui: UiState::default(),
            samples: None,
            current_preset: None,
            base_url: config.server.base_url,
            jobs: ControllerJobs::new(),
        };
        controller.set_status(
            "Enter wine chemistry values and predict",
            StatusTone::Idle,
        );
        controller
    }

    /// Kick off the fire-and-forget startup requests: sample bundle + health.
    pub fn start_background_tasks(&mut self) {
        self.jobs.begin_samples_fetch(self.base_url.clone());
        self.jobs.begin_health_check(self.base_url.clone());
        self.set_status("Contacting prediction service", StatusTone::Busy);
    }

    /// Drain finished background work into UI state. Called every frame.
    pub fn poll_background_jobs(&mut self) {
        while let Ok(message) = self.jobs.try_recv_message() {
            match message {
                JobMessage::SamplesFetched(result) => self.apply_samples_result(result),
                JobMessage::PredictionFinished(result) => self.apply_prediction_result(result),
                JobMessage::HealthChecked(result) => self.apply_health_result(result),
                JobMessage::ModelInfoFetched(result) => self.apply_model_info_result(result),
            }
        }
    }

    /// True while any background request is outstanding; drives repaint scheduling.
    pub fn background_work_active(&self) -> bool {
        self.jobs.any_in_progress()
    }

    /// Submit the form: serialize every field and post one prediction request.
    pub fn submit(&mut self) {
        if self.jobs.prediction_in_progress() {
            return;
        }
        self.ui.result.visible = false;
        self.ui.error.message = None;
        self.ui.loading = true;
        let record = self.feature_record();
        self.jobs.begin_prediction(self.base_url.clone(), record);
        self.set_status("Predicting quality", StatusTone::Busy);
    }

    /// Build the posted record from the form: every field key, parsed as float.
    ///
    /// Non-numeric text parses to NaN; there is deliberately no validation.
    pub fn feature_record(&self) -> FeatureRecord {
        self.ui
            .form
            .fields
            .iter()
            .map(|field| {
                let value = field.text.trim().parse::<f64>().unwrap_or(f64::NAN);
                (field.name.to_string(), value)
            })
            .collect()
    }

    /// Handle a finished sample-bundle fetch. Failure is logged, never shown.
    pub fn apply_samples_result(&mut self, result: Result<SampleBundle, ApiError>) {
        self.jobs.clear_samples_fetch();
        match result {
            Ok(bundle) => {
                tracing::info!("Sample data loaded: {} presets", bundle.total_samples);
                self.samples = Some(bundle);
            }
            Err(err) => {
                tracing::warn!("Failed to load sample data: {err}");
            }
        }
    }

    /// Handle a finished prediction exchange.
    pub fn apply_prediction_result(&mut self, result: Result<PredictionOutcome, ApiError>) {
        self.jobs.clear_prediction();
        self.ui.loading = false;
        match result {
            Ok(outcome) => {
                self.display_results(&outcome);
                self.set_status(
                    format!("Predicted {}", outcome.prediction),
                    StatusTone::Info,
                );
            }
            Err(err) => {
                self.show_error(error_banner_text(&err));
                self.set_status("Prediction failed", StatusTone::Error);
            }
        }
    }

    /// Handle the startup health probe; reported in the status bar only.
    pub fn apply_health_result(&mut self, result: Result<HealthReport, ApiError>) {
        self.jobs.clear_health_check();
        match result {
            Ok(report) if report.is_healthy() => {
                self.set_status(format!("{} ready", report.service), StatusTone::Info);
            }
            Ok(report) => {
                self.set_status(
                    format!("{} degraded: model not loaded", report.service),
                    StatusTone::Warning,
                );
            }
            Err(err) => {
                tracing::warn!("Health check failed: {err}");
                self.set_status("Prediction service unreachable", StatusTone::Warning);
            }
        }
    }

    /// Handle a finished model info fetch.
    pub fn apply_model_info_result(&mut self, result: Result<ModelReport, ApiError>) {
        self.jobs.clear_model_info();
        match result {
            Ok(report) => {
                self.ui.model_info.lines = view_model::model_lines(&report);
                self.ui.model_info.open = true;
            }
            Err(err) => {
                self.show_error(error_banner_text(&err));
            }
        }
    }

    fn display_results(&mut self, outcome: &PredictionOutcome) {
        self.ui.result.prediction = outcome.prediction.clone();
        self.ui.result.confidence_label = view_model::confidence_label(outcome.confidence);
        self.ui.result.bars = view_model::probability_bars(&outcome.probabilities);
        // Rebuilt from scratch on every render so stale comparisons cannot linger.
        self.ui.result.comparison = None;
        if let (Some(id), Some(bundle)) = (self.current_preset, self.samples.as_ref()) {
            if let Some(preset) = bundle.preset(id) {
                self.ui.result.comparison =
                    Some(view_model::comparison(preset, &outcome.prediction));
            }
        }
        self.ui.result.visible = true;
    }

    /// Fill every known field with a draw from within its valid range.
    pub fn generate_random_sample(&mut self) {
        let Some(bundle) = self.samples.as_ref() else {
            self.show_error(NOT_LOADED_MESSAGE);
            return;
        };
        let mut rng = rand::rng();
        let values: Vec<(String, f64)> = bundle
            .feature_ranges
            .iter()
            .map(|(name, range)| {
                let value = sampling::draw_within(range, rng.random::<f64>());
                (name.clone(), value)
            })
            .collect();
        for (name, value) in values {
            if let Some(field) = self.ui.form.field_mut(&name) {
                field.text = format!("{value:.2}");
            }
        }
        self.current_preset = None;
        self.show_indicator("Random sample generated");
        self.ui.ranges.open = false;
    }

    /// Copy a preset's values into the form and remember it as current.
    pub fn load_preset(&mut self, id: u32) {
        let Some(bundle) = self.samples.as_ref() else {
            self.show_error(NOT_LOADED_MESSAGE);
            return;
        };
        let Some(preset) = bundle.preset(id).cloned() else {
            self.show_error("Preset not found.");
            return;
        };
        for (name, value) in &preset.features {
            if let Some(field) = self.ui.form.field_mut(name) {
                field.text = view_model::field_value_text(*value);
            }
        }
        self.current_preset = Some(id);
        self.show_indicator(format!(
            "{} loaded (Expected: {})",
            preset.name, preset.expected_class
        ));
        self.ui.preset_modal.open = false;
    }

    /// Open the preset modal, rebuilt from the cached bundle.
    pub fn open_preset_modal(&mut self) {
        let Some(bundle) = self.samples.as_ref() else {
            self.show_error(NOT_LOADED_MESSAGE);
            return;
        };
        self.ui.preset_modal.rows = view_model::preset_rows(&bundle.presets);
        self.ui.preset_modal.open = true;
    }

    pub fn close_preset_modal(&mut self) {
        self.ui.preset_modal.open = false;
    }

    /// Open the ranges panel, rebuilt from the cached bundle.
    pub fn open_ranges_panel(&mut self) {
        let Some(bundle) = self.samples.as_ref() else {
            self.show_error(NOT_LOADED_MESSAGE);
            return;
        };
        self.ui.ranges.rows = view_model::range_rows(&bundle.feature_ranges);
        self.ui.ranges.open = true;
    }

    pub fn close_ranges_panel(&mut self) {
        self.ui.ranges.open = false;
    }

    /// Fetch model metadata in the background.
    pub fn request_model_info(&mut self) {
        self.jobs.begin_model_info(self.base_url.clone());
    }

    pub fn close_model_info(&mut self) {
        self.ui.model_info.open = false;
    }

    /// A manual field edit breaks the link between the form and any sample.
    pub fn note_manual_edit(&mut self) {
        self.ui.indicator.message = None;
        self.current_preset = None;
    }

    /// Clear the form and every transient panel.
    pub fn reset_form(&mut self) {
        for field in &mut self.ui.form.fields {
            field.text.clear();
        }
        self.ui.result.visible = false;
        self.ui.error.message = None;
        self.ui.indicator.message = None;
        self.current_preset = None;
    }

    pub fn dismiss_error(&mut self) {
        self.ui.error.message = None;
    }

    /// Preset currently mirrored by the form, if any.
    pub fn current_preset(&self) -> Option<u32> {
        self.current_preset
    }

    /// Whether the sample bundle has arrived.
    pub fn samples_loaded(&self) -> bool {
        self.samples.is_some()
    }

    fn show_error(&mut self, message: impl Into<String>) {
        self.ui.error.message = Some(message.into());
    }

    fn show_indicator(&mut self, message: impl Into<String>) {
        self.ui.indicator.message = Some(message.into());
    }

    fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        let (label, color) = status_badge(tone);
        self.ui.status.text = text.into();
        self.ui.status.badge_label = label;
        self.ui.status.badge_color = color;
    }
}

/// Banner text for a failed exchange: application errors verbatim, transport
/// failures with the connection prefix.
fn error_banner_text(err: &ApiError) -> String {
    match err {
        ApiError::Rejected(message) => message.clone(),
        ApiError::Transport(message) => format!("Connection error: {message}"),
    }
}

#[derive(Clone, Copy, Debug)]
pub enum StatusTone {
    Idle,
    Busy,
    Info,
    Warning,
    Error,
}

fn status_badge(tone: StatusTone) -> (String, Color32) {
    match tone {
        StatusTone::Idle => ("Idle".into(), Color32::from_rgb(42, 42, 42)),
        StatusTone::Busy => ("Working".into(), Color32::from_rgb(31, 139, 255)),
        StatusTone::Info => ("Info".into(), Color32::from_rgb(64, 140, 112)),
        StatusTone::Warning => ("Warning".into(), Color32::from_rgb(192, 138, 43)),
        StatusTone::Error => ("Error".into(), Color32::from_rgb(192, 57, 43)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FeatureRange, Preset};
    use std::collections::BTreeMap;

    fn controller() -> PredictionController {
        PredictionController::new(AppConfig::default())
    }

    fn bundle() -> SampleBundle {
        SampleBundle {
            total_samples: 1,
            presets: vec![Preset {
                id: 1,
                name: "Wine Sample 1".into(),
                description: "High quality profile".into(),
                expected_class: "High".into(),
                features: BTreeMap::from([
                    ("Alcohol".to_string(), 13.2),
                    ("Proline".to_string(), 1065.0),
                ]),
            }],
            feature_ranges: BTreeMap::from([
                (
                    "Alcohol".to_string(),
                    FeatureRange {
                        min: 11.03,
                        mean: 13.0,
                        max: 14.83,
                        std: 0.81,
                    },
                ),
                (
                    "Proline".to_string(),
                    FeatureRange {
                        min: 278.0,
                        mean: 746.89,
                        max: 1680.0,
                        std: 314.9,
                    },
                ),
            ]),
        }
    }

    #[test]
    fn new_controller_reports_idle_status() {
        let controller = controller();
        assert_eq!(controller.ui.status.badge_label, "Idle");
        assert_eq!(
            controller.ui.status.text,
            "Enter wine chemistry values and predict"
        );
    }

    #[test]
    fn record_contains_every_field_key_with_parsed_floats() {
        let mut controller = controller();
        for field in &mut controller.ui.form.fields {
            field.text = "1.5".into();
        }
        let record = controller.feature_record();
        assert_eq!(record.len(), controller.ui.form.fields.len());
        for field in &controller.ui.form.fields {
            assert_eq!(record.get(field.name).copied(), Some(1.5));
        }
    }

    #[test]
    fn non_numeric_text_parses_to_nan() {
        let mut controller = controller();
        controller.ui.form.field_mut("Alcohol").unwrap().text = "plenty".into();
        let record = controller.feature_record();
        assert!(record["Alcohol"].is_nan());
    }

    #[test]
    fn sample_actions_before_load_error_without_mutation() {
        let mut controller = controller();
        controller.ui.form.field_mut("Alcohol").unwrap().text = "12.0".into();

        controller.generate_random_sample();
        assert_eq!(
            controller.ui.error.message.as_deref(),
            Some(NOT_LOADED_MESSAGE)
        );
        assert_eq!(controller.ui.form.field_text("Alcohol"), Some("12.0"));

        controller.dismiss_error();
        controller.load_preset(1);
        assert_eq!(
            controller.ui.error.message.as_deref(),
            Some(NOT_LOADED_MESSAGE)
        );
        assert_eq!(controller.ui.form.field_text("Alcohol"), Some("12.0"));

        controller.dismiss_error();
        controller.open_preset_modal();
        assert!(!controller.ui.preset_modal.open);
        assert!(controller.ui.error.message.is_some());

        controller.dismiss_error();
        controller.open_ranges_panel();
        assert!(!controller.ui.ranges.open);
        assert!(controller.ui.error.message.is_some());
    }

    #[test]
    fn random_sample_stays_within_clamped_band() {
        let mut controller = controller();
        controller.apply_samples_result(Ok(bundle()));
        controller.generate_random_sample();

        let ranges = bundle().feature_ranges;
        for (name, range) in &ranges {
            let text = controller.ui.form.field_text(name).unwrap();
            let value: f64 = text.parse().unwrap();
            let (low, high) = crate::sampling::draw_bounds(range);
            // Two-decimal rounding may nudge past the bound by half a cent.
            assert!(value >= low - 0.005 && value <= high + 0.005, "{name}: {value}");
        }
        assert_eq!(
            controller.ui.indicator.message.as_deref(),
            Some("Random sample generated")
        );
        assert_eq!(controller.current_preset(), None);
    }

    #[test]
    fn random_sample_clears_preset_and_ranges_panel() {
        let mut controller = controller();
        controller.apply_samples_result(Ok(bundle()));
        controller.load_preset(1);
        controller.open_ranges_panel();
        controller.generate_random_sample();
        assert_eq!(controller.current_preset(), None);
        assert!(!controller.ui.ranges.open);
    }

    #[test]
    fn load_preset_fills_fields_verbatim_and_sets_selection() {
        let mut controller = controller();
        controller.apply_samples_result(Ok(bundle()));
        controller.load_preset(1);
        assert_eq!(controller.current_preset(), Some(1));
        assert_eq!(controller.ui.form.field_text("Alcohol"), Some("13.2"));
        assert_eq!(controller.ui.form.field_text("Proline"), Some("1065"));
        assert_eq!(
            controller.ui.indicator.message.as_deref(),
            Some("Wine Sample 1 loaded (Expected: High)")
        );
    }

    #[test]
    fn unknown_preset_shows_not_found() {
        let mut controller = controller();
        controller.apply_samples_result(Ok(bundle()));
        controller.load_preset(99);
        assert_eq!(
            controller.ui.error.message.as_deref(),
            Some("Preset not found.")
        );
        assert_eq!(controller.current_preset(), None);
    }

    #[test]
    fn manual_edit_clears_indicator_and_preset() {
        let mut controller = controller();
        controller.apply_samples_result(Ok(bundle()));
        controller.load_preset(1);
        controller.note_manual_edit();
        assert_eq!(controller.current_preset(), None);
        assert!(controller.ui.indicator.message.is_none());
    }

    #[test]
    fn rejected_prediction_shows_message_verbatim() {
        let mut controller = controller();
        controller.ui.loading = true;
        controller
            .apply_prediction_result(Err(ApiError::Rejected("Missing Features".into())));
        assert!(!controller.ui.loading);
        assert_eq!(
            controller.ui.error.message.as_deref(),
            Some("Missing Features")
        );
        assert!(!controller.ui.result.visible);
    }

    #[test]
    fn transport_failure_gets_connection_prefix() {
        let mut controller = controller();
        controller.ui.loading = true;
        controller.apply_prediction_result(Err(ApiError::Transport("timed out".into())));
        assert_eq!(
            controller.ui.error.message.as_deref(),
            Some("Connection error: timed out")
        );
    }

    #[test]
    fn failed_samples_fetch_is_silent() {
        let mut controller = controller();
        controller.apply_samples_result(Err(ApiError::Transport("refused".into())));
        assert!(controller.ui.error.message.is_none());
        assert!(!controller.samples_loaded());
    }
}
