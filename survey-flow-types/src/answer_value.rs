use serde::{Deserialize, Serialize};

/// A single answer value collected for a question.
///
/// Choice, text and numeric answers are scalars; multi-choice answers are lists.
/// Serialized untagged, so a finalized answer set is a plain JSON object of
/// strings and string arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// A single value (single-choice, free text, numeric).
    Scalar(String),

    /// The selected values of a multi-choice question, in selection order.
    List(Vec<String>),
}

impl AnswerValue {
    /// An empty multi-choice answer.
    pub fn empty_list() -> Self {
        Self::List(Vec::new())
    }

    /// Try to get this value as a scalar string.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::List(_) => None,
        }
    }

    /// Try to get this value as a list.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            Self::Scalar(_) => None,
        }
    }

    /// Whether this is a scalar equal to `other`.
    pub fn is_scalar_eq(&self, other: &str) -> bool {
        self.as_scalar() == Some(other)
    }

    /// Whether this is a list containing `item`.
    pub fn list_contains(&self, item: &str) -> bool {
        self.as_list()
            .is_some_and(|items| items.iter().any(|i| i == item))
    }

    /// Get the type name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "Scalar",
            Self::List(_) => "List",
        }
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        Self::Scalar(s)
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        Self::Scalar(s.to_string())
    }
}

impl From<i64> for AnswerValue {
    fn from(i: i64) -> Self {
        Self::Scalar(i.to_string())
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for AnswerValue {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_equality_ignores_lists() {
        let list = AnswerValue::from(vec!["A"]);
        assert!(!list.is_scalar_eq("A"));
        assert!(AnswerValue::from("A").is_scalar_eq("A"));
    }

    #[test]
    fn numbers_become_scalars() {
        assert_eq!(AnswerValue::from(42), AnswerValue::Scalar("42".into()));
    }

    #[test]
    fn untagged_json_shape() {
        let json = serde_json::to_string(&AnswerValue::from(vec!["a", "b"])).unwrap();
        assert_eq!(json, r#"["a","b"]"#);
        let json = serde_json::to_string(&AnswerValue::from("x")).unwrap();
        assert_eq!(json, r#""x""#);
    }
}
