//! "Write your own answer" options and the in-progress free-text override.

use std::collections::HashMap;

use survey_flow_types::{Question, QuestionId};

const DEFAULT_PHRASES: &[(&str, &[&str])] = &[
    (
        "en",
        &[
            "other (write your own)",
            "write your own",
            "other (please specify)",
        ],
    ),
    (
        "ru",
        &[
            "другое (напишите свой вариант)",
            "свой вариант",
            "напишите свой",
            "другое (укажите)",
        ],
    ),
    (
        "uz",
        &[
            "boshqa (o'z variantingizni yozing)",
            "o'z variantingiz",
            "o‘z variantingiz",
            "boshqa (yozing)",
        ],
    ),
];

/// Known "write your own" phrases per language, lower-cased.
pub fn default_phrases() -> HashMap<String, Vec<String>> {
    DEFAULT_PHRASES
        .iter()
        .map(|(lang, phrases)| {
            (
                lang.to_string(),
                phrases.iter().map(|p| p.to_string()).collect(),
            )
        })
        .collect()
}

/// Recognizes custom-input options by their display text in one language.
#[derive(Debug, Clone, Default)]
pub struct CustomInputMatcher {
    phrases: Vec<String>,
}

impl CustomInputMatcher {
    /// Create a matcher over the given phrases.
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phrases: phrases
                .into_iter()
                .map(|p| p.into().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Matcher for `language`, picked out of a phrase table.
    ///
    /// Language keys compare case-insensitively. Unknown languages match nothing.
    pub fn for_language(table: &HashMap<String, Vec<String>>, language: &str) -> Self {
        let language = language.trim().to_lowercase();
        match table.iter().find(|(key, _)| key.trim().to_lowercase() == language) {
            Some((_, phrases)) => Self::new(phrases.iter().cloned()),
            None => Self::default(),
        }
    }

    /// Check if an option with this display text opens a free-text override.
    pub fn is_custom_input(&self, display: &str) -> bool {
        let display = display.trim().to_lowercase();
        self.phrases.iter().any(|p| display.contains(p.as_str()))
    }
}

/// How a committed custom text is written into the answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CommitMode {
    /// Replace the scalar answer.
    Replace,

    /// Drop the sentinel value from the list and append the text.
    Append { sentinel: String },
}

impl CommitMode {
    pub(crate) fn for_option(question: &Question, option_index: usize) -> Self {
        if question.kind().is_multi() {
            let sentinel = question
                .option(option_index)
                .map(|o| o.value.clone())
                .unwrap_or_default();
            Self::Append { sentinel }
        } else {
            Self::Replace
        }
    }
}

/// A free-text override in progress. At most one is active per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomInputState {
    pub question_id: QuestionId,
    pub option_index: usize,
    pub value: String,
    pub(crate) mode: CommitMode,
}

impl CustomInputState {
    pub(crate) fn new(question: &Question, option_index: usize) -> Self {
        Self {
            question_id: question.id().clone(),
            option_index,
            value: String::new(),
            mode: CommitMode::for_option(question, option_index),
        }
    }
}
