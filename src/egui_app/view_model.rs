//! Helpers to convert domain data into egui-facing view structs.

use std::collections::BTreeMap;

use crate::api::{FeatureRange, ModelReport, Preset};
use crate::egui_app::state::{ComparisonView, PresetRowView, ProbabilityBarView, RangeRowView};
use crate::features;

/// Build probability bars sorted by probability descending.
///
/// Ties break by class label so rendering stays deterministic.
pub fn probability_bars(probabilities: &BTreeMap<String, f64>) -> Vec<ProbabilityBarView> {
    let mut entries: Vec<(&String, f64)> = probabilities
        .iter()
        .map(|(label, prob)| (label, *prob))
        .collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .map(|(label, prob)| ProbabilityBarView {
            label: label.clone(),
            fraction: (prob as f32).clamp(0.0, 1.0),
            percent_label: format!("{:.1}%", prob * 100.0),
        })
        .collect()
}

/// Confidence line shown under the predicted class.
pub fn confidence_label(confidence: f64) -> String {
    format!("Confidence: {:.1}%", confidence * 100.0)
}

/// Expected-vs-actual comparison for a preset-backed prediction.
pub fn comparison(preset: &Preset, actual: &str) -> ComparisonView {
    ComparisonView {
        expected: preset.expected_class.clone(),
        actual: actual.to_string(),
        matches: preset.expected_class == actual,
    }
}

/// Convert presets into modal rows.
pub fn preset_rows(presets: &[Preset]) -> Vec<PresetRowView> {
    presets
        .iter()
        .map(|preset| PresetRowView {
            id: preset.id,
            name: preset.name.clone(),
            description: preset.description.clone(),
            expected_class: preset.expected_class.clone(),
        })
        .collect()
}

/// Convert feature ranges into display rows, two decimals each.
pub fn range_rows(ranges: &BTreeMap<String, FeatureRange>) -> Vec<RangeRowView> {
    ranges
        .iter()
        .map(|(name, range)| RangeRowView {
            label: features::display_label(name),
            min: format!("{:.2}", range.min),
            mean: format!("{:.2}", range.mean),
            max: format!("{:.2}", range.max),
        })
        .collect()
}

/// Field text for a preset value, written verbatim.
pub fn field_value_text(value: f64) -> String {
    format!("{value}")
}

/// Summary lines for the model info panel.
pub fn model_lines(report: &ModelReport) -> Vec<String> {
    vec![
        format!("Model: {}", report.model_type),
        format!("Classes: {}", report.classes.join(", ")),
        format!("Features: {}", report.n_features),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_sort_descending_with_one_decimal_labels() {
        let probabilities = BTreeMap::from([
            ("A".to_string(), 0.2),
            ("B".to_string(), 0.7),
            ("C".to_string(), 0.1),
        ]);
        let bars = probability_bars(&probabilities);
        let labels: Vec<&str> = bars.iter().map(|bar| bar.label.as_str()).collect();
        assert_eq!(labels, ["B", "A", "C"]);
        let percents: Vec<&str> = bars.iter().map(|bar| bar.percent_label.as_str()).collect();
        assert_eq!(percents, ["70.0%", "20.0%", "10.0%"]);
        assert!((bars[0].fraction - 0.7).abs() < 1e-6);
    }

    #[test]
    fn tied_probabilities_order_by_label() {
        let probabilities = BTreeMap::from([
            ("Medium".to_string(), 0.5),
            ("High".to_string(), 0.5),
        ]);
        let bars = probability_bars(&probabilities);
        assert_eq!(bars[0].label, "High");
        assert_eq!(bars[1].label, "Medium");
    }

    #[test]
    fn confidence_renders_one_decimal() {
        assert_eq!(confidence_label(0.6137), "Confidence: 61.4%");
        assert_eq!(confidence_label(1.0), "Confidence: 100.0%");
    }

    #[test]
    fn comparison_flags_matching_class() {
        let preset = Preset {
            id: 1,
            name: "Wine Sample 1".into(),
            description: "High quality profile".into(),
            expected_class: "High".into(),
            features: BTreeMap::new(),
        };
        assert!(comparison(&preset, "High").matches);
        assert!(!comparison(&preset, "Low").matches);
    }

    #[test]
    fn range_rows_format_two_decimals_and_spaces() {
        let ranges = BTreeMap::from([(
            "Malic_Acid".to_string(),
            FeatureRange {
                min: 0.74,
                mean: 2.336_348,
                max: 5.8,
                std: 1.117,
            },
        )]);
        let rows = range_rows(&ranges);
        assert_eq!(rows[0].label, "Malic Acid");
        assert_eq!(rows[0].min, "0.74");
        assert_eq!(rows[0].mean, "2.34");
        assert_eq!(rows[0].max, "5.80");
    }

    #[test]
    fn preset_values_write_verbatim() {
        assert_eq!(field_value_text(13.2), "13.2");
        assert_eq!(field_value_text(1065.0), "1065");
    }
}
