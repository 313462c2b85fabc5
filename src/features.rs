//! The fixed set of chemistry features the prediction service expects.
//!
//! Keys match the feature names used by the service in `featureRanges` and
//! preset `features` maps; the form is built from this list so that sample
//! data can be written back into fields by name.

/// Feature keys in the order the form presents them.
pub const FEATURE_NAMES: [&str; 13] = [
    "Alcohol",
    "Malic_Acid",
    "Ash",
    "Ash_Alcanity",
    "Magnesium",
    "Total_Phenols",
    "Flavanoids",
    "Nonflavanoid_Phenols",
    "Proanthocyanins",
    "Color_Intensity",
    "Hue",
    "OD280",
    "Proline",
];

/// Human-facing label for a feature key (underscores become spaces).
pub fn display_label(name: &str) -> String {
    name.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_replace_all_underscores() {
        assert_eq!(display_label("Nonflavanoid_Phenols"), "Nonflavanoid Phenols");
        assert_eq!(display_label("Alcohol"), "Alcohol");
    }

    #[test]
    fn feature_keys_are_unique() {
        let mut names: Vec<&str> = FEATURE_NAMES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FEATURE_NAMES.len());
    }
}
