//! Case conventions for token display names.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameCase {
    /// `colorsBluePrimary`
    Camel,
    /// `colors-blue-primary`
    Kebab,
    /// `colors_blue_primary`
    Snake,
    /// `COLORS_BLUE_PRIMARY`
    Constant,
    /// `ColorsBluePrimary`
    Pascal,
}

impl NameCase {
    pub const ALL: [NameCase; 5] = [
        NameCase::Camel,
        NameCase::Kebab,
        NameCase::Snake,
        NameCase::Constant,
        NameCase::Pascal,
    ];

    /// Joins path segments in this case. Each segment is lower-cased and
    /// stripped of non-alphanumerics first; segments left empty are dropped.
    pub fn apply<S: AsRef<str>>(self, segments: &[S]) -> String {
        let words: Vec<String> = segments
            .iter()
            .map(|s| normalize_segment(s.as_ref()))
            .filter(|s| !s.is_empty())
            .collect();

        match self {
            NameCase::Kebab => words.join("-"),
            NameCase::Snake => words.join("_"),
            NameCase::Constant => words.join("_").to_uppercase(),
            NameCase::Pascal => words.iter().map(|w| capitalize(w)).collect(),
            NameCase::Camel => words
                .iter()
                .enumerate()
                .map(|(i, w)| if i == 0 { w.clone() } else { capitalize(w) })
                .collect(),
        }
    }
}

fn normalize_segment(segment: &str) -> String {
    segment
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_cases() {
        let path = ["colors", "Blue", "500"];
        assert_eq!(NameCase::Camel.apply(&path), "colorsBlue500");
        assert_eq!(NameCase::Kebab.apply(&path), "colors-blue-500");
        assert_eq!(NameCase::Snake.apply(&path), "colors_blue_500");
        assert_eq!(NameCase::Constant.apply(&path), "COLORS_BLUE_500");
        assert_eq!(NameCase::Pascal.apply(&path), "ColorsBlue500");
    }

    #[test]
    fn test_segments_are_stripped_not_split() {
        let path = ["button", "primary-hover", "bg"];
        assert_eq!(NameCase::Camel.apply(&path), "buttonPrimaryhoverBg");
        assert_eq!(NameCase::Kebab.apply(&["--", "gap"]), "gap");
    }

    proptest! {
        #[test]
        fn test_kebab_names_are_css_safe(segments in prop::collection::vec("[ -~]{0,12}", 1..5)) {
            let name = NameCase::Kebab.apply(&segments);
            prop_assert!(!name.starts_with('-') && !name.ends_with('-'));
            prop_assert!(!name.contains("--"));
            prop_assert!(name.chars().all(|c| c == '-' || c.is_alphanumeric()));
        }
    }
}
