use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::branching::{BranchEvaluator, SkipTargetStrategy};
use crate::classifier::{DEFAULT_MULTI_CHOICE_KEYWORDS, KeywordClassifier};
use crate::custom_input::{CustomInputMatcher, default_phrases};
use crate::flow::BackNavigation;

/// Error type for loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid flow configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings for a survey session.
///
/// Every field has a default, so a partial JSON document (or `{}`) is a valid
/// configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Active survey language, selects the custom-input phrases.
    pub language: String,

    /// Which skip rule supplies the jump target.
    pub skip_target: SkipTargetStrategy,

    /// How `retreat` picks the previous question.
    pub back_navigation: BackNavigation,

    /// Prompt phrases that mark untagged multi-choice questions.
    pub multi_choice_keywords: Vec<String>,

    /// "Write your own" option phrases, per language.
    pub custom_input_phrases: HashMap<String, Vec<String>>,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            language: "ru".to_string(),
            skip_target: SkipTargetStrategy::default(),
            back_navigation: BackNavigation::default(),
            multi_choice_keywords: DEFAULT_MULTI_CHOICE_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            custom_input_phrases: default_phrases(),
        }
    }
}

impl FlowConfig {
    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the active language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the skip target strategy.
    pub fn with_skip_target(mut self, strategy: SkipTargetStrategy) -> Self {
        self.skip_target = strategy;
        self
    }

    /// Set the back navigation mode.
    pub fn with_back_navigation(mut self, mode: BackNavigation) -> Self {
        self.back_navigation = mode;
        self
    }

    /// Build the classifier for these keywords.
    pub fn classifier(&self) -> KeywordClassifier {
        KeywordClassifier::new(self.multi_choice_keywords.iter().cloned())
    }

    /// Build the custom-input matcher for the active language.
    pub fn custom_input_matcher(&self) -> CustomInputMatcher {
        CustomInputMatcher::for_language(&self.custom_input_phrases, &self.language)
    }

    /// Build the branch evaluator.
    pub fn evaluator(&self) -> BranchEvaluator {
        BranchEvaluator::new(self.skip_target)
    }
}
