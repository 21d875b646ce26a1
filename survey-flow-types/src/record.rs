//! Wire shapes of question sets as delivered by a question provider.
//!
//! Providers are loose about types: ids may be numbers, options may be plain
//! values or `{value, text}` objects, and most logic fields accept either a
//! single item or a list. These records accept all of that; `survey-flow`
//! normalizes them into [`Question`](crate::Question)s.

use serde::{Deserialize, Serialize};

/// A JSON scalar accepted wherever the provider sends a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    /// The string form used for all answer comparisons.
    pub fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

/// Either a single item or a list of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

/// One question as sent by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: Scalar,

    #[serde(default, alias = "question", alias = "title")]
    pub text: Option<String>,

    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    #[serde(default)]
    pub options: Option<Vec<OptionRecord>>,

    #[serde(default)]
    pub required: Option<bool>,

    #[serde(default)]
    pub logic: Option<LogicRecord>,
}

impl QuestionRecord {
    /// A bare record with only id and text, for building fallback sets in code.
    pub fn new(id: impl Into<Scalar>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: Some(text.into()),
            kind: None,
            options: None,
            required: None,
            logic: None,
        }
    }
}

/// An option: a plain value or a `{value, text}` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionRecord {
    Labeled {
        value: Scalar,
        #[serde(default, alias = "label")]
        text: Option<String>,
    },
    Plain(Scalar),
}

/// The `logic` object of a question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogicRecord {
    #[serde(default, alias = "endIf")]
    pub end_if: Option<OneOrMany<Scalar>>,

    #[serde(default)]
    pub skip: Option<OneOrMany<SkipRecord>>,
}

/// A single skip condition with its target hints.
///
/// Exactly one of `answer`, `answers` or `condition` is expected; when several
/// are present they are consulted in that order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkipRecord {
    #[serde(default)]
    pub answer: Option<Scalar>,

    #[serde(default)]
    pub answers: Option<Vec<Scalar>>,

    #[serde(default)]
    pub condition: Option<String>,

    #[serde(default)]
    pub value: Option<Scalar>,

    #[serde(default, alias = "skipTo")]
    pub skip_to: Option<Scalar>,

    #[serde(default, alias = "skipCount")]
    pub skip_count: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_mixed_option_shapes() {
        let record: QuestionRecord = serde_json::from_str(
            r#"{
                "id": 7,
                "question": "Pick one",
                "options": ["A", 2, {"value": "c", "text": "C"}, {"value": "d", "label": "D"}]
            }"#,
        )
        .unwrap();

        assert_eq!(record.id, Scalar::Int(7));
        assert_eq!(record.text.as_deref(), Some("Pick one"));
        let options = record.options.unwrap();
        assert_eq!(options[0], OptionRecord::Plain(Scalar::Text("A".into())));
        assert_eq!(options[1], OptionRecord::Plain(Scalar::Int(2)));
        assert_eq!(
            options[3],
            OptionRecord::Labeled {
                value: Scalar::Text("d".into()),
                text: Some("D".into()),
            }
        );
    }

    #[test]
    fn logic_accepts_single_or_list() {
        let logic: LogicRecord = serde_json::from_str(
            r#"{"endIf": "No", "skip": {"answer": "A", "skipTo": "q3"}}"#,
        )
        .unwrap();

        assert_eq!(
            logic.end_if.unwrap().into_vec(),
            vec![Scalar::Text("No".into())]
        );
        let skip = logic.skip.unwrap().into_vec();
        assert_eq!(skip.len(), 1);
        assert_eq!(skip[0].skip_to, Some(Scalar::Text("q3".into())));
    }

    #[test]
    fn null_fields_are_absent() {
        let record: QuestionRecord =
            serde_json::from_str(r#"{"id": "q1", "text": "Hi", "options": null, "logic": null}"#)
                .unwrap();
        assert!(record.options.is_none());
        assert!(record.logic.is_none());
    }
}
