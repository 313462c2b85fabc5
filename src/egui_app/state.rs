//! Shared state types for the egui UI.
//!
//! Every panel the renderer draws is bound here as an explicit struct with
//! its own "shown" state; the renderer never reaches into domain data.

use egui::Color32;

use crate::features;

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug)]
pub struct UiState {
    pub status: StatusBarState,
    pub form: FormState,
    /// True while a prediction request is in flight; disables the submit button.
    pub loading: bool,
    pub error: ErrorBannerState,
    pub result: ResultPanelState,
    pub preset_modal: PresetModalState,
    pub ranges: RangesPanelState,
    pub indicator: SampleIndicatorState,
    pub model_info: ModelInfoState,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: StatusBarState::default(),
            form: FormState::with_known_features(),
            loading: false,
            error: ErrorBannerState::default(),
            result: ResultPanelState::default(),
            preset_modal: PresetModalState::default(),
            ranges: RangesPanelState::default(),
            indicator: SampleIndicatorState::default(),
            model_info: ModelInfoState::default(),
        }
    }
}

/// Status badge + text shown in the footer; the controller fills it in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusBarState {
    pub text: String,
    pub badge_label: String,
    pub badge_color: Color32,
}

/// The numeric input form, one field per known feature.
#[derive(Clone, Debug)]
pub struct FormState {
    pub fields: Vec<FieldState>,
}

impl FormState {
    /// Build the form from the fixed feature list.
    pub fn with_known_features() -> Self {
        let fields = features::FEATURE_NAMES
            .iter()
            .map(|&name| FieldState {
                name,
                label: features::display_label(name),
                text: String::new(),
            })
            .collect();
        Self { fields }
    }

    /// Mutable handle to the field bound to a feature name, if any.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut FieldState> {
        self.fields.iter_mut().find(|field| field.name == name)
    }

    /// Field text for a feature name, if the field exists.
    pub fn field_text(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.text.as_str())
    }
}

/// One numeric input bound to a feature name.
#[derive(Clone, Debug)]
pub struct FieldState {
    /// Feature key as the service knows it.
    pub name: &'static str,
    /// Human-facing label.
    pub label: String,
    /// Raw text the user (or a sample action) typed.
    pub text: String,
}

/// Dismissable error banner; `None` means hidden.
#[derive(Clone, Debug, Default)]
pub struct ErrorBannerState {
    pub message: Option<String>,
}

/// Rendered prediction result.
#[derive(Clone, Debug, Default)]
pub struct ResultPanelState {
    pub visible: bool,
    pub prediction: String,
    pub confidence_label: String,
    /// One bar per class, sorted by probability descending.
    pub bars: Vec<ProbabilityBarView>,
    /// Expected-vs-actual block, present only when a preset was loaded.
    pub comparison: Option<ComparisonView>,
}

/// Display data for a single probability bar.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbabilityBarView {
    pub label: String,
    /// Bar fill in `[0,1]`.
    pub fraction: f32,
    /// Percentage with one decimal, e.g. "70.0%".
    pub percent_label: String,
}

/// Expected-vs-actual comparison for a preset-backed prediction.
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonView {
    pub expected: String,
    pub actual: String,
    pub matches: bool,
}

/// Modal listing the preset samples.
#[derive(Clone, Debug, Default)]
pub struct PresetModalState {
    pub open: bool,
    pub rows: Vec<PresetRowView>,
}

/// Display data for one preset card.
#[derive(Clone, Debug)]
pub struct PresetRowView {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub expected_class: String,
}

/// Panel listing valid per-feature ranges.
#[derive(Clone, Debug, Default)]
pub struct RangesPanelState {
    pub open: bool,
    pub rows: Vec<RangeRowView>,
}

/// Min/mean/max display for one feature, formatted to two decimals.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeRowView {
    pub label: String,
    pub min: String,
    pub mean: String,
    pub max: String,
}

/// Banner naming the sample that currently fills the form; `None` means hidden.
#[derive(Clone, Debug, Default)]
pub struct SampleIndicatorState {
    pub message: Option<String>,
}

/// Small panel with model metadata fetched on demand.
#[derive(Clone, Debug, Default)]
pub struct ModelInfoState {
    pub open: bool,
    pub lines: Vec<String>,
}
