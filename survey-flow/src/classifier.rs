//! Keyword-based question classification.

use survey_flow_types::{ChoiceOption, Classifier, Kind};

const MULTI_CHOICE_TYPES: &[&str] = &["multichoice", "multiple_choice", "checkbox"];
const SINGLE_CHOICE_TYPES: &[&str] = &["choice", "single_choice", "radio"];

/// Phrases that mark "select all that apply" questions in legacy, untagged data.
pub const DEFAULT_MULTI_CHOICE_KEYWORDS: &[&str] = &[
    "отметьте все подходящие",
    "выберите все подходящие",
    "выберите несколько",
    "несколько вариантов",
    "можно выбрать несколько",
    "социальными сетями",
    "социальные сети",
    "ijtimoiy tarmoqlar",
    "bir nechta",
    "barchasini belgilang",
    "hammasini tanlang",
    "select all that apply",
    "check all that apply",
];

/// The default classifier.
///
/// Priority is strict: explicit type tags, then keywords in the prompt text,
/// then the presence of options, then the raw type itself.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    keywords: Vec<String>,
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_MULTI_CHOICE_KEYWORDS.iter().copied())
    }
}

impl KeywordClassifier {
    /// Create a classifier with the given multi-choice keywords.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .filter(|k| !k.trim().is_empty())
                .collect(),
        }
    }

    fn mentions_keyword(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }
}

impl Classifier for KeywordClassifier {
    fn classify(&self, text: &str, raw_type: Option<&str>, options: &[ChoiceOption]) -> Kind {
        let tag = raw_type.map(|t| t.trim().to_lowercase());

        if let Some(tag) = tag.as_deref() {
            if MULTI_CHOICE_TYPES.contains(&tag) {
                return Kind::MultiChoice;
            }
            if SINGLE_CHOICE_TYPES.contains(&tag) {
                return Kind::SingleChoice;
            }
        }

        if self.mentions_keyword(text) {
            return Kind::MultiChoice;
        }

        if !options.is_empty() {
            return Kind::SingleChoice;
        }

        match raw_type {
            Some(raw) => Kind::from_raw_type(raw),
            None => Kind::Text,
        }
    }
}
