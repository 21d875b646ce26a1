//! The answer store owned by a survey session.

use survey_flow_types::{AnswerValue, Answers, Question, QuestionId};

use crate::custom_input::{CommitMode, CustomInputState};

/// Per-question answers plus the single pending custom-input slot.
///
/// Reads see writes immediately. No operation fails; edits that make no sense
/// (blank custom text, committing with nothing pending) are no-ops.
#[derive(Debug, Clone, Default)]
pub struct AnswerStore {
    answers: Answers,
    pending: Option<CustomInputState>,
}

impl AnswerStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the answer for a question.
    pub fn get(&self, id: &QuestionId) -> Option<&AnswerValue> {
        self.answers.get(id)
    }

    /// Record an answer, replacing any previous one.
    pub fn set(&mut self, id: impl Into<QuestionId>, value: impl Into<AnswerValue>) {
        self.answers.insert(id, value);
    }

    /// Forget the answer for a question.
    pub fn clear(&mut self, id: &QuestionId) -> Option<AnswerValue> {
        self.answers.remove(id)
    }

    /// Add `value` to a multi-choice answer if absent, remove it if present.
    ///
    /// Untouched entries keep their order. A missing or scalar answer is
    /// treated as an empty list.
    pub fn toggle_in_list(&mut self, id: &QuestionId, value: &str) {
        let mut items = match self.answers.remove(id) {
            Some(AnswerValue::List(items)) => items,
            _ => Vec::new(),
        };

        if let Some(pos) = items.iter().position(|item| item == value) {
            items.remove(pos);
        } else {
            items.push(value.to_string());
        }

        self.answers.insert(id.clone(), AnswerValue::List(items));
    }

    /// Write free text in place of the custom-input option at `option_index`.
    ///
    /// Multi-choice questions get the option's value replaced by `text` in the
    /// list; all other kinds get their scalar answer replaced. Returns `false`
    /// and changes nothing when `text` is blank.
    pub fn commit_custom_input(&mut self, question: &Question, option_index: usize, text: &str) -> bool {
        let mode = CommitMode::for_option(question, option_index);
        self.apply_custom_text(question.id(), &mode, text)
    }

    fn apply_custom_text(&mut self, id: &QuestionId, mode: &CommitMode, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        match mode {
            CommitMode::Replace => {
                self.answers.insert(id.clone(), text);
            }
            CommitMode::Append { sentinel } => {
                let mut items = match self.answers.remove(id) {
                    Some(AnswerValue::List(items)) => items,
                    _ => Vec::new(),
                };
                items.retain(|item| item != sentinel);
                if !items.iter().any(|item| item == text) {
                    items.push(text.to_string());
                }
                self.answers.insert(id.clone(), AnswerValue::List(items));
            }
        }
        true
    }

    // === Pending custom input ===

    /// Open a free-text override for the option at `option_index`.
    ///
    /// Any other override still pending is committed first (or dropped if blank).
    /// Re-activating the override that is already open keeps its text.
    pub fn activate_custom_input(&mut self, question: &Question, option_index: usize) {
        if let Some(current) = &self.pending
            && current.question_id == *question.id()
            && current.option_index == option_index
        {
            return;
        }

        self.commit_pending();
        self.pending = Some(CustomInputState::new(question, option_index));
    }

    /// Replace the text of the pending override. Returns `false` if none is open.
    pub fn edit_custom_input(&mut self, text: impl Into<String>) -> bool {
        match &mut self.pending {
            Some(state) => {
                state.value = text.into();
                true
            }
            None => false,
        }
    }

    /// Commit the pending override into the answers and close it.
    ///
    /// Returns `true` if an answer was written. Blank text is discarded.
    pub fn commit_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(state) => self.apply_custom_text(&state.question_id, &state.mode, &state.value),
            None => false,
        }
    }

    /// Close the pending override without writing anything.
    pub fn discard_pending(&mut self) -> Option<CustomInputState> {
        self.pending.take()
    }

    /// The override in progress, if any.
    pub fn pending(&self) -> Option<&CustomInputState> {
        self.pending.as_ref()
    }

    /// Commit anything pending and return a snapshot of all answers.
    pub fn finalize(&mut self) -> Answers {
        self.commit_pending();
        self.answers.clone()
    }

    /// Get the committed answers.
    pub fn answers(&self) -> &Answers {
        &self.answers
    }
}
