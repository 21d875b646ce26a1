//! The flow controller: one survey session from first question to submission.

use serde::{Deserialize, Serialize};
use survey_flow_types::{
    AnswerValue, Answers, FlowError, Question, SubmissionReceipt, SubmissionSink,
};
use tracing::{debug, info, warn};

use crate::branching::{BranchEvaluator, NextStep};
use crate::custom_input::CustomInputState;
use crate::gate;
use crate::store::AnswerStore;
use crate::{FlowConfig, QuestionSet};

/// How `retreat` picks the question to return to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackNavigation {
    /// Return to the question visited before this one, following skips in reverse.
    #[default]
    History,

    /// Return to `index - 1`, which may re-enter a question that was skipped.
    Linear,
}

/// Session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// Showing the question at this index.
    InProgress(usize),

    /// Answers were accepted by the sink. Terminal.
    Completed,
}

/// Result of a forward navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// The current answer does not satisfy the question; nothing changed.
    Blocked,

    /// Moved to another question.
    Moved { from: usize, to: usize },

    /// The survey ended and the answers were submitted.
    Completed(SubmissionReceipt),
}

/// A single survey session.
///
/// Owns the question set, the answer store and the navigation history. All
/// edits apply to the current question.
#[derive(Debug, Clone)]
pub struct SurveyFlow {
    survey_id: String,
    questions: QuestionSet,
    store: AnswerStore,
    state: FlowState,
    history: Vec<usize>,
    evaluator: BranchEvaluator,
    back: BackNavigation,
}

impl SurveyFlow {
    /// Start a session at the first question with no answers.
    pub fn new(survey_id: impl Into<String>, questions: impl Into<QuestionSet>, config: &FlowConfig) -> Self {
        Self {
            survey_id: survey_id.into(),
            questions: questions.into(),
            store: AnswerStore::new(),
            state: FlowState::InProgress(0),
            history: Vec::new(),
            evaluator: config.evaluator(),
            back: config.back_navigation,
        }
    }

    /// Get the survey id.
    pub fn survey_id(&self) -> &str {
        &self.survey_id
    }

    /// Get the question set.
    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    /// Get the session state.
    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Check if the session was submitted.
    pub fn is_completed(&self) -> bool {
        self.state == FlowState::Completed
    }

    /// Index of the current question, if the session is still running.
    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            FlowState::InProgress(index) => Some(index),
            FlowState::Completed => None,
        }
    }

    /// The question being shown.
    pub fn current_question(&self) -> Option<&Question> {
        self.current_index().and_then(|index| self.questions.get(index))
    }

    /// The committed answer to the current question.
    pub fn current_answer(&self) -> Option<&AnswerValue> {
        self.current_question().and_then(|q| self.store.get(q.id()))
    }

    /// One-based position and total, for progress display.
    pub fn progress(&self) -> (usize, usize) {
        let total = self.questions.len();
        match self.state {
            FlowState::InProgress(index) => ((index + 1).min(total), total),
            FlowState::Completed => (total, total),
        }
    }

    /// Get the answer store.
    pub fn store(&self) -> &AnswerStore {
        &self.store
    }

    /// Get the committed answers.
    pub fn answers(&self) -> &Answers {
        self.store.answers()
    }

    /// The free-text override in progress, if any.
    pub fn pending_custom_input(&self) -> Option<&CustomInputState> {
        self.store.pending()
    }

    // === Editing the current question ===

    fn editable(&self) -> Result<Option<&Question>, FlowError> {
        match self.state {
            FlowState::InProgress(index) => Ok(self.questions.get(index)),
            FlowState::Completed => Err(FlowError::Completed),
        }
    }

    /// Pick the option at `option_index`.
    ///
    /// Custom-input options open a free-text override instead of recording
    /// their value. Other options replace the answer (single choice) or are
    /// toggled (multi-choice). Out-of-range indices are ignored.
    pub fn select_option(&mut self, option_index: usize) -> Result<(), FlowError> {
        let Some(question) = self.editable()?.cloned() else {
            return Ok(());
        };
        let Some(option) = question.option(option_index) else {
            return Ok(());
        };

        if option.custom_input {
            self.store.activate_custom_input(&question, option_index);
            return Ok(());
        }

        if question.kind().is_multi() {
            self.store.toggle_in_list(question.id(), &option.value);
        } else {
            self.store.discard_pending();
            self.store.set(question.id().clone(), option.value.as_str());
        }
        Ok(())
    }

    /// Set the answer to the current question directly.
    ///
    /// Multi-choice questions always hold a list, so a single value is wrapped.
    /// A list given for any other kind is ignored.
    pub fn set_answer(&mut self, value: impl Into<AnswerValue>) -> Result<(), FlowError> {
        let Some(question) = self.editable()? else {
            return Ok(());
        };
        let id = question.id().clone();
        let value = match (question.kind().is_multi(), value.into()) {
            (true, AnswerValue::Scalar(s)) => AnswerValue::List(vec![s]),
            (false, AnswerValue::List(_)) => {
                debug!(question = %id, kind = question.kind().name(), "list answer ignored");
                return Ok(());
            }
            (_, value) => value,
        };
        self.store.set(id, value);
        Ok(())
    }

    /// Toggle `value` in the current multi-choice answer. Other kinds are left alone.
    pub fn toggle_value(&mut self, value: &str) -> Result<(), FlowError> {
        let Some(question) = self.editable()? else {
            return Ok(());
        };
        if !question.kind().is_multi() {
            return Ok(());
        }
        let id = question.id().clone();
        self.store.toggle_in_list(&id, value);
        Ok(())
    }

    /// Forget the answer to the current question.
    pub fn clear_answer(&mut self) -> Result<(), FlowError> {
        let Some(id) = self.editable()?.map(|q| q.id().clone()) else {
            return Ok(());
        };
        self.store.clear(&id);
        Ok(())
    }

    /// Update the text of the open free-text override. Returns `false` if none is open.
    pub fn type_custom_input(&mut self, text: impl Into<String>) -> Result<bool, FlowError> {
        self.editable()?;
        Ok(self.store.edit_custom_input(text))
    }

    /// Commit the open free-text override (the input lost focus).
    /// Returns `true` if an answer was written.
    pub fn commit_custom_input(&mut self) -> Result<bool, FlowError> {
        self.editable()?;
        Ok(self.store.commit_pending())
    }

    /// Check if the current answer allows moving forward.
    ///
    /// Pending custom text counts as if it were committed.
    pub fn can_advance(&self) -> bool {
        let Some(question) = self.current_question() else {
            return !self.is_completed();
        };
        if self.store.pending().is_some_and(|p| p.question_id == *question.id()) {
            let mut preview = self.store.clone();
            preview.commit_pending();
            return gate::can_advance(question, preview.answers());
        }
        gate::can_advance(question, self.store.answers())
    }

    // === Navigation ===

    /// Move forward from the current question, submitting when the survey ends.
    ///
    /// A submission failure is returned as an error and leaves the session on
    /// the current question with all answers intact.
    pub async fn advance<S: SubmissionSink>(&mut self, sink: &S) -> Result<Advance, FlowError> {
        let FlowState::InProgress(current) = self.state else {
            return Err(FlowError::Completed);
        };

        self.store.commit_pending();

        if let Some(question) = self.questions.get(current)
            && !gate::can_advance(question, self.store.answers())
        {
            debug!(question = %question.id(), "advance blocked by validation");
            return Ok(Advance::Blocked);
        }

        match self
            .evaluator
            .next_step(current, self.questions.questions(), self.store.answers())
        {
            NextStep::Question(to) => {
                self.history.push(current);
                self.state = FlowState::InProgress(to);
                debug!(from = current, to, "moved");
                Ok(Advance::Moved { from: current, to })
            }
            step @ (NextStep::End | NextStep::Exhausted) => {
                debug!(at = current, ?step, "survey finished");
                let receipt = self.submit(sink).await?;
                Ok(Advance::Completed(receipt))
            }
        }
    }

    /// Move back one question. Answers are kept.
    ///
    /// Returns the new index, or `None` when already at the start.
    pub fn retreat(&mut self) -> Result<Option<usize>, FlowError> {
        let FlowState::InProgress(current) = self.state else {
            return Err(FlowError::Completed);
        };

        self.store.commit_pending();

        let previous = match self.back {
            BackNavigation::History => self.history.pop(),
            BackNavigation::Linear => current.checked_sub(1),
        };
        if let Some(to) = previous {
            self.state = FlowState::InProgress(to);
            debug!(from = current, to, "moved back");
        }
        Ok(previous)
    }

    /// Submit the answers collected so far.
    ///
    /// On success the session is completed and its answers are dropped. On
    /// failure nothing changes, so the caller may retry.
    pub async fn submit<S: SubmissionSink>(&mut self, sink: &S) -> Result<SubmissionReceipt, FlowError> {
        if self.is_completed() {
            return Err(FlowError::Completed);
        }

        let answers = self.store.finalize();
        match sink.submit(&self.survey_id, &answers).await {
            Ok(receipt) => {
                info!(survey_id = %self.survey_id, answered = answers.len(), "survey submitted");
                self.state = FlowState::Completed;
                self.store = AnswerStore::new();
                self.history.clear();
                Ok(receipt)
            }
            Err(err) => {
                let err: anyhow::Error = err.into();
                warn!(survey_id = %self.survey_id, error = %err, "survey submission failed");
                Err(FlowError::Submission(err))
            }
        }
    }

    /// Abandon the session. Answers and pending input are discarded.
    pub fn close(self) {
        debug!(
            survey_id = %self.survey_id,
            completed = self.is_completed(),
            "survey session closed"
        );
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use survey_flow_types::{BranchLogic, ChoiceOption, Kind, SkipRule, SkipTarget};

    use super::*;
    use crate::TestSink;

    fn question(id: &str, kind: Kind) -> Question {
        Question::new(id, format!("Question {id}"), kind).with_required(true)
    }

    fn branching_set() -> Vec<Question> {
        vec![
            question("q1", Kind::SingleChoice)
                .with_options(vec![ChoiceOption::plain("A"), ChoiceOption::plain("B")])
                .with_logic(BranchLogic::new().with_skip(SkipRule::on_answer(
                    "A",
                    SkipTarget::Question("q4".into()),
                ))),
            question("q2", Kind::Text),
            question("q3", Kind::Text),
            question("q4", Kind::Text),
        ]
    }

    #[test]
    fn blocked_until_answered() {
        let mut flow = SurveyFlow::new("s1", branching_set(), &FlowConfig::default());
        let sink = TestSink::new();

        assert!(!flow.can_advance());
        assert_eq!(block_on(flow.advance(&sink)).unwrap(), Advance::Blocked);
        assert_eq!(flow.current_index(), Some(0));
    }

    #[test]
    fn history_retreat_follows_skips_back() {
        let mut flow = SurveyFlow::new("s1", branching_set(), &FlowConfig::default());
        let sink = TestSink::new();

        flow.select_option(0).unwrap();
        assert_eq!(
            block_on(flow.advance(&sink)).unwrap(),
            Advance::Moved { from: 0, to: 3 }
        );
        assert_eq!(flow.retreat().unwrap(), Some(0));
        assert_eq!(flow.current_answer(), Some(&AnswerValue::from("A")));
        assert_eq!(flow.retreat().unwrap(), None);
    }

    #[test]
    fn linear_retreat_reenters_skipped_question() {
        let config = FlowConfig::default().with_back_navigation(BackNavigation::Linear);
        let mut flow = SurveyFlow::new("s1", branching_set(), &config);
        let sink = TestSink::new();

        flow.select_option(0).unwrap();
        block_on(flow.advance(&sink)).unwrap();
        assert_eq!(flow.retreat().unwrap(), Some(2));
    }

    #[test]
    fn last_question_submits() {
        let mut flow = SurveyFlow::new("s1", vec![question("only", Kind::Text)], &FlowConfig::default());
        let sink = TestSink::new();

        flow.set_answer("done").unwrap();
        let advance = block_on(flow.advance(&sink)).unwrap();

        assert!(matches!(advance, Advance::Completed(_)));
        assert!(flow.is_completed());
        assert!(flow.answers().is_empty());
        let submissions = sink.submissions();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].0, "s1");
        assert_eq!(submissions[0].1.get_scalar(&"only".into()).unwrap(), "done");
    }

    #[test]
    fn failed_submission_keeps_session() {
        let mut flow = SurveyFlow::new("s1", vec![question("only", Kind::Text)], &FlowConfig::default());
        let sink = TestSink::failing("backend down");

        flow.set_answer("done").unwrap();
        let err = block_on(flow.advance(&sink)).unwrap_err();

        assert!(matches!(err, FlowError::Submission(_)));
        assert_eq!(flow.state(), FlowState::InProgress(0));
        assert_eq!(flow.current_answer(), Some(&AnswerValue::from("done")));
    }

    #[test]
    fn completed_session_rejects_edits() {
        let mut flow = SurveyFlow::new("s1", vec![question("only", Kind::Text)], &FlowConfig::default());
        let sink = TestSink::new();
        flow.set_answer("done").unwrap();
        block_on(flow.advance(&sink)).unwrap();

        assert!(flow.set_answer("again").unwrap_err().is_completed());
        assert!(flow.retreat().unwrap_err().is_completed());
        assert!(block_on(flow.submit(&sink)).unwrap_err().is_completed());
        assert_eq!(flow.progress(), (1, 1));
    }

    #[test]
    fn empty_survey_submits_immediately() {
        let mut flow = SurveyFlow::new("s1", Vec::<Question>::new(), &FlowConfig::default());
        let sink = TestSink::new();

        assert!(flow.can_advance());
        assert!(matches!(
            block_on(flow.advance(&sink)).unwrap(),
            Advance::Completed(_)
        ));
    }

    #[test]
    fn multi_choice_select_toggles() {
        let questions = vec![
            question("q1", Kind::MultiChoice)
                .with_options(vec![ChoiceOption::plain("A"), ChoiceOption::plain("B")]),
        ];
        let mut flow = SurveyFlow::new("s1", questions, &FlowConfig::default());

        flow.select_option(0).unwrap();
        flow.select_option(1).unwrap();
        flow.select_option(0).unwrap();
        flow.select_option(7).unwrap();

        assert_eq!(flow.current_answer(), Some(&AnswerValue::from(vec!["B"])));
    }

    #[test]
    fn multi_choice_answers_stay_lists() {
        let questions = vec![
            question("q1", Kind::MultiChoice)
                .with_options(vec![ChoiceOption::plain("A"), ChoiceOption::plain("B")]),
        ];
        let mut flow = SurveyFlow::new("s1", questions, &FlowConfig::default());

        flow.set_answer("A").unwrap();
        assert_eq!(flow.current_answer(), Some(&AnswerValue::from(vec!["A"])));
        assert!(flow.can_advance());

        flow.toggle_value("B").unwrap();
        assert_eq!(flow.current_answer(), Some(&AnswerValue::from(vec!["A", "B"])));
    }

    #[test]
    fn single_value_kinds_reject_lists() {
        let questions = vec![
            question("q1", Kind::SingleChoice)
                .with_options(vec![ChoiceOption::plain("A"), ChoiceOption::plain("B")]),
        ];
        let mut flow = SurveyFlow::new("s1", questions, &FlowConfig::default());

        flow.toggle_value("A").unwrap();
        assert!(flow.current_answer().is_none());

        flow.set_answer(vec!["A"]).unwrap();
        assert!(flow.current_answer().is_none());

        flow.set_answer("B").unwrap();
        flow.toggle_value("A").unwrap();
        assert_eq!(flow.current_answer(), Some(&AnswerValue::from("B")));
    }

    #[test]
    fn pending_custom_text_counts_for_gate() {
        let questions = vec![question("q1", Kind::SingleChoice).with_options(vec![
            ChoiceOption::plain("A"),
            ChoiceOption::plain("Other (write your own)").with_custom_input(true),
        ])];
        let mut flow = SurveyFlow::new("s1", questions, &FlowConfig::default());

        flow.select_option(1).unwrap();
        assert!(!flow.can_advance());
        flow.type_custom_input("mine").unwrap();
        assert!(flow.can_advance());
        assert!(flow.current_answer().is_none());
    }
}
