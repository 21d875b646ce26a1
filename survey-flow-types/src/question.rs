use crate::QuestionId;

/// A single normalized question in a survey.
///
/// Built once when a question set is ingested and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    /// The id this question's answer is stored under.
    id: QuestionId,

    /// The prompt text shown to the user.
    text: String,

    /// The explicit type hint from the provider, if any.
    raw_type: Option<String>,

    /// The semantic kind (determines input widget and validation rule).
    kind: Kind,

    /// Ordered answer options (empty for free-form questions).
    options: Vec<ChoiceOption>,

    /// Whether an answer is needed before moving forward.
    required: bool,

    /// Skip and end-of-survey rules evaluated after this question.
    logic: BranchLogic,
}

impl Question {
    /// Create a new optional question without options or branching.
    pub fn new(id: impl Into<QuestionId>, text: impl Into<String>, kind: Kind) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            raw_type: None,
            kind,
            options: Vec::new(),
            required: false,
            logic: BranchLogic::default(),
        }
    }

    /// Set the options.
    pub fn with_options(mut self, options: Vec<ChoiceOption>) -> Self {
        self.options = options;
        self
    }

    /// Set the raw type hint.
    pub fn with_raw_type(mut self, raw_type: impl Into<String>) -> Self {
        self.raw_type = Some(raw_type.into());
        self
    }

    /// Mark the question as required or optional.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the branching rules.
    pub fn with_logic(mut self, logic: BranchLogic) -> Self {
        self.logic = logic;
        self
    }

    /// Get the question id.
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    /// Get the prompt text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the raw type hint.
    pub fn raw_type(&self) -> Option<&str> {
        self.raw_type.as_deref()
    }

    /// Get the question kind.
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Get the options.
    pub fn options(&self) -> &[ChoiceOption] {
        &self.options
    }

    /// Get the option at `index`.
    pub fn option(&self, index: usize) -> Option<&ChoiceOption> {
        self.options.get(index)
    }

    /// Check if the question must be answered.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Get the branching rules.
    pub fn logic(&self) -> &BranchLogic {
        &self.logic
    }

    /// Check if `value` is one of this question's option values.
    pub fn has_option_value(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }

    /// Check if any option opens a free-text override.
    pub fn has_custom_input_option(&self) -> bool {
        self.options.iter().any(|o| o.custom_input)
    }
}

/// The semantic category of a question.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Pick exactly one option.
    SingleChoice,

    /// Pick any number of options. Answers are always lists.
    MultiChoice,

    /// Free text.
    Text,

    /// A number, stored in its string form.
    Numeric,

    /// An unrecognized explicit type, kept verbatim. Validated like free text.
    Other(String),
}

impl Kind {
    /// Map a raw type hint that is neither a choice nor multi-choice alias.
    pub fn from_raw_type(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "" | "text" | "textarea" | "string" => Self::Text,
            "number" | "numeric" | "integer" | "int" | "float" | "decimal" => Self::Numeric,
            _ => Self::Other(raw.to_string()),
        }
    }

    /// Check if this is the multi-choice kind.
    pub fn is_multi(&self) -> bool {
        matches!(self, Self::MultiChoice)
    }

    /// Short name for logs and error messages.
    pub fn name(&self) -> &str {
        match self {
            Self::SingleChoice => "single_choice",
            Self::MultiChoice => "multi_choice",
            Self::Text => "text",
            Self::Numeric => "numeric",
            Self::Other(raw) => raw,
        }
    }
}

/// An answer option, normalized from either a plain value or a `{value, text}` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    /// The value recorded as the answer.
    pub value: String,

    /// The text shown to the user.
    pub display: String,

    /// Whether selecting this option opens a free-text override
    /// instead of recording `value`.
    pub custom_input: bool,
}

impl ChoiceOption {
    /// Create an option with separate value and display text.
    pub fn new(value: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            display: display.into(),
            custom_input: false,
        }
    }

    /// Create an option whose display text is its value.
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            display: value.clone(),
            value,
            custom_input: false,
        }
    }

    /// Mark this option as a custom-input option.
    pub fn with_custom_input(mut self, custom_input: bool) -> Self {
        self.custom_input = custom_input;
        self
    }
}

/// Per-question branching rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BranchLogic {
    /// Answers that end the survey after this question.
    pub end_if: Vec<String>,

    /// Skip rules, evaluated in order.
    pub skip: Vec<SkipRule>,
}

impl BranchLogic {
    /// Create empty logic.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the end-of-survey values.
    pub fn with_end_if<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.end_if = values.into_iter().map(Into::into).collect();
        self
    }

    /// Append a skip rule.
    pub fn with_skip(mut self, rule: SkipRule) -> Self {
        self.skip.push(rule);
        self
    }

    /// Check if there are no rules at all.
    pub fn is_empty(&self) -> bool {
        self.end_if.is_empty() && self.skip.is_empty()
    }
}

/// A skip condition together with the jump target it declares.
#[derive(Debug, Clone, PartialEq)]
pub struct SkipRule {
    pub condition: SkipCondition,
    pub target: SkipTarget,
}

impl SkipRule {
    /// Create a rule.
    pub fn new(condition: SkipCondition, target: SkipTarget) -> Self {
        Self { condition, target }
    }

    /// Rule that jumps to `target` when the answer equals `answer`.
    pub fn on_answer(answer: impl Into<String>, target: SkipTarget) -> Self {
        Self::new(SkipCondition::Answer(answer.into()), target)
    }
}

/// The test part of a skip rule.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipCondition {
    /// `{answer: X}`: the answer equals X.
    Answer(String),

    /// `{answers: [...]}`: the answer is one of the listed values.
    AnyOf(Vec<String>),

    /// `{condition: "equals", value}`.
    Equals(String),

    /// `{condition: "not_equals", value}`. A missing answer is not equal.
    NotEquals(String),

    /// `{condition: "contains", value}`: the answer is a list containing value.
    Contains(String),

    /// `{condition: "not_contains", value}`: the answer is not a list, or a
    /// list without value.
    NotContains(String),

    /// A condition object of unknown shape. Never matches.
    Unrecognized,
}

/// Where a matched skip rule sends the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SkipTarget {
    /// `skip_to`: jump to the question with this id.
    Question(QuestionId),

    /// `skip_count`: skip this many questions after the current one.
    Offset(i64),

    /// No target hint: skip exactly one question.
    #[default]
    Default,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_type_mapping() {
        assert_eq!(Kind::from_raw_type("TEXT"), Kind::Text);
        assert_eq!(Kind::from_raw_type("number"), Kind::Numeric);
        assert_eq!(Kind::from_raw_type("date"), Kind::Other("date".into()));
    }

    #[test]
    fn plain_option_displays_value() {
        let option = ChoiceOption::plain("Yes");
        assert_eq!(option.value, "Yes");
        assert_eq!(option.display, "Yes");
        assert!(!option.custom_input);
    }

    #[test]
    fn option_lookup() {
        let question = Question::new("q1", "Pick one", Kind::SingleChoice).with_options(vec![
            ChoiceOption::plain("A"),
            ChoiceOption::new("other", "Other (write your own)").with_custom_input(true),
        ]);

        assert!(question.has_option_value("A"));
        assert!(!question.has_option_value("Other (write your own)"));
        assert!(question.has_custom_input_option());
        assert_eq!(question.option(1).map(|o| o.value.as_str()), Some("other"));
    }
}
