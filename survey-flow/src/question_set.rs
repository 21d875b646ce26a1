//! Normalizing provider records into an immutable question set.

use std::ops::Index;

use survey_flow_types::record::{LogicRecord, OptionRecord, Scalar, SkipRecord};
use survey_flow_types::{
    BranchLogic, ChoiceOption, Classifier, Question, QuestionId, QuestionRecord, QuestionSource,
    SkipCondition, SkipRule, SkipTarget,
};
use tracing::{debug, warn};

use crate::FlowConfig;
use crate::custom_input::CustomInputMatcher;

/// The ordered questions of one survey, normalized once at load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Wrap already-normalized questions.
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Normalize provider records with the classifier and matcher from `config`.
    pub fn from_records(records: Vec<QuestionRecord>, config: &FlowConfig) -> Self {
        Self::from_records_with(records, &config.classifier(), &config.custom_input_matcher())
    }

    /// Normalize provider records with an explicit classifier and matcher.
    pub fn from_records_with(
        records: Vec<QuestionRecord>,
        classifier: &dyn Classifier,
        matcher: &CustomInputMatcher,
    ) -> Self {
        let questions = records
            .into_iter()
            .map(|record| normalize(record, classifier, matcher))
            .collect();
        Self { questions }
    }

    /// Parse a JSON array of question records and normalize it.
    pub fn from_json_str(json: &str, config: &FlowConfig) -> Result<Self, serde_json::Error> {
        let records: Vec<QuestionRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records, config))
    }

    /// Fetch the records for `survey_id`, falling back to `fallback` if the
    /// source fails. Never errors.
    pub async fn load<S: QuestionSource>(
        source: &S,
        survey_id: &str,
        fallback: Vec<QuestionRecord>,
        config: &FlowConfig,
    ) -> Self {
        let records = match source.fetch(survey_id).await {
            Ok(records) => {
                debug!(survey_id, count = records.len(), "question set fetched");
                records
            }
            Err(err) => {
                let err: anyhow::Error = err.into();
                warn!(survey_id, error = %err, "question set fetch failed, using fallback");
                fallback
            }
        };
        Self::from_records(records, config)
    }

    /// Get the questions.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Get the question at `index`.
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Find the index of the question with this id.
    pub fn position(&self, id: &QuestionId) -> Option<usize> {
        self.questions.iter().position(|q| q.id() == id)
    }

    /// Get the number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Check if the set has no questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

impl Index<usize> for QuestionSet {
    type Output = Question;

    fn index(&self, index: usize) -> &Self::Output {
        &self.questions[index]
    }
}

impl From<Vec<Question>> for QuestionSet {
    fn from(questions: Vec<Question>) -> Self {
        Self::new(questions)
    }
}

fn normalize(
    record: QuestionRecord,
    classifier: &dyn Classifier,
    matcher: &CustomInputMatcher,
) -> Question {
    let text = record.text.unwrap_or_default();
    let options: Vec<ChoiceOption> = record
        .options
        .unwrap_or_default()
        .into_iter()
        .map(|option| {
            let option = normalize_option(option);
            let custom = matcher.is_custom_input(&option.display);
            option.with_custom_input(custom)
        })
        .collect();

    let kind = classifier.classify(&text, record.kind.as_deref(), &options);
    let id = QuestionId::new(record.id.into_string());
    let logic = record
        .logic
        .map(|logic| normalize_logic(&id, logic))
        .unwrap_or_default();

    let mut question = Question::new(id, text, kind)
        .with_options(options)
        .with_required(record.required.unwrap_or(false))
        .with_logic(logic);
    if let Some(raw) = record.kind {
        question = question.with_raw_type(raw);
    }
    question
}

fn normalize_option(option: OptionRecord) -> ChoiceOption {
    match option {
        OptionRecord::Plain(value) => ChoiceOption::plain(value.into_string()),
        OptionRecord::Labeled { value, text } => {
            let value = value.into_string();
            match text {
                Some(text) => ChoiceOption::new(value, text),
                None => ChoiceOption::plain(value),
            }
        }
    }
}

fn normalize_logic(id: &QuestionId, logic: LogicRecord) -> BranchLogic {
    let end_if = logic
        .end_if
        .map(|values| values.into_vec().into_iter().map(Scalar::into_string).collect())
        .unwrap_or_default();
    let skip = logic
        .skip
        .map(|rules| {
            rules
                .into_vec()
                .into_iter()
                .map(|rule| normalize_skip(id, rule))
                .collect()
        })
        .unwrap_or_default();

    BranchLogic { end_if, skip }
}

fn normalize_skip(id: &QuestionId, rule: SkipRecord) -> SkipRule {
    let condition = if let Some(answer) = rule.answer {
        SkipCondition::Answer(answer.into_string())
    } else if let Some(answers) = rule.answers {
        SkipCondition::AnyOf(answers.into_iter().map(Scalar::into_string).collect())
    } else {
        match (rule.condition.as_deref(), rule.value) {
            (Some("equals"), Some(value)) => SkipCondition::Equals(value.into_string()),
            (Some("not_equals"), Some(value)) => SkipCondition::NotEquals(value.into_string()),
            (Some("contains"), Some(value)) => SkipCondition::Contains(value.into_string()),
            (Some("not_contains"), Some(value)) => SkipCondition::NotContains(value.into_string()),
            (condition, _) => {
                warn!(question = %id, ?condition, "unrecognized skip condition, it will never match");
                SkipCondition::Unrecognized
            }
        }
    };

    let target = match (rule.skip_to, rule.skip_count) {
        (Some(to), _) => SkipTarget::Question(QuestionId::new(to.into_string())),
        (None, Some(count)) => SkipTarget::Offset(count),
        (None, None) => SkipTarget::Default,
    };

    SkipRule::new(condition, target)
}
