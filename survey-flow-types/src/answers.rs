use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{AnswerValue, QuestionId};

/// Error type for typed answer access.
#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    #[error("Missing answer for question: {0}")]
    MissingAnswer(QuestionId),

    #[error("Type mismatch for question '{id}': expected {expected}, got {actual}")]
    TypeMismatch {
        id: QuestionId,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Answers collected during a survey session, keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers {
    values: HashMap<QuestionId, AnswerValue>,
}

impl Answers {
    /// Create a new empty answer set.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Insert an answer, replacing any previous one for the same question.
    pub fn insert(&mut self, id: impl Into<QuestionId>, value: impl Into<AnswerValue>) {
        self.values.insert(id.into(), value.into());
    }

    /// Get the answer for a question.
    pub fn get(&self, id: &QuestionId) -> Option<&AnswerValue> {
        self.values.get(id)
    }

    /// Check if a question has an answer.
    pub fn contains(&self, id: &QuestionId) -> bool {
        self.values.contains_key(id)
    }

    /// Remove the answer for a question.
    pub fn remove(&mut self, id: &QuestionId) -> Option<AnswerValue> {
        self.values.remove(id)
    }

    /// Get an iterator over all id-value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &AnswerValue)> {
        self.values.iter()
    }

    /// Get the number of answered questions.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if nothing has been answered.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    // === Convenience accessors ===

    /// Get a scalar answer.
    pub fn get_scalar(&self, id: &QuestionId) -> Result<&str, AnswerError> {
        match self.get(id) {
            Some(AnswerValue::Scalar(s)) => Ok(s),
            Some(other) => Err(AnswerError::TypeMismatch {
                id: id.clone(),
                expected: "Scalar",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::MissingAnswer(id.clone())),
        }
    }

    /// Get a list answer.
    pub fn get_list(&self, id: &QuestionId) -> Result<&[String], AnswerError> {
        match self.get(id) {
            Some(AnswerValue::List(items)) => Ok(items),
            Some(other) => Err(AnswerError::TypeMismatch {
                id: id.clone(),
                expected: "List",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::MissingAnswer(id.clone())),
        }
    }

    /// Check if a question has a non-empty answer.
    ///
    /// Returns `false` if the answer is missing, an empty (or whitespace-only)
    /// string, or an empty list.
    pub fn has_value(&self, id: &QuestionId) -> bool {
        match self.get(id) {
            Some(AnswerValue::Scalar(s)) => !s.trim().is_empty(),
            Some(AnswerValue::List(items)) => !items.is_empty(),
            None => false,
        }
    }
}

impl IntoIterator for Answers {
    type Item = (QuestionId, AnswerValue);
    type IntoIter = std::collections::hash_map::IntoIter<QuestionId, AnswerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Answers {
    type Item = (&'a QuestionId, &'a AnswerValue);
    type IntoIter = std::collections::hash_map::Iter<'a, QuestionId, AnswerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut answers = Answers::new();
        answers.insert("name", "Alice");
        answers.insert("channels", vec!["Telegram", "Instagram"]);

        assert_eq!(answers.get_scalar(&QuestionId::new("name")).unwrap(), "Alice");
        assert_eq!(
            answers.get_list(&QuestionId::new("channels")).unwrap(),
            ["Telegram", "Instagram"]
        );
    }

    #[test]
    fn insert_replaces() {
        let mut answers = Answers::new();
        answers.insert("q1", "A");
        answers.insert("q1", "B");
        assert_eq!(answers.len(), 1);
        assert_eq!(answers.get_scalar(&QuestionId::new("q1")).unwrap(), "B");
    }

    #[test]
    fn type_mismatch_error() {
        let mut answers = Answers::new();
        answers.insert("channels", vec!["Telegram"]);

        let result = answers.get_scalar(&QuestionId::new("channels"));
        assert!(matches!(result, Err(AnswerError::TypeMismatch { .. })));
    }

    #[test]
    fn has_value_treats_blank_as_missing() {
        let mut answers = Answers::new();
        answers.insert("blank", "   ");
        answers.insert("empty_list", AnswerValue::empty_list());
        answers.insert("filled", "x");

        assert!(!answers.has_value(&QuestionId::new("blank")));
        assert!(!answers.has_value(&QuestionId::new("empty_list")));
        assert!(!answers.has_value(&QuestionId::new("absent")));
        assert!(answers.has_value(&QuestionId::new("filled")));
    }

    #[test]
    fn serializes_as_flat_object() {
        let mut answers = Answers::new();
        answers.insert("q1", "A");
        let json = serde_json::to_value(&answers).unwrap();
        assert_eq!(json, serde_json::json!({ "q1": "A" }));
    }
}
