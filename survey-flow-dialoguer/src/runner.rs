//! Dialoguer runner driving a `SurveyFlow` one prompt at a time.

use dialoguer::{
    Confirm, Input, MultiSelect, Select,
    theme::{ColorfulTheme, SimpleTheme, Theme},
};
use survey_flow::{
    Advance, AnswerValue, FlowError, Kind, Question, SubmissionReceipt, SubmissionSink, SurveyFlow,
};
use thiserror::Error;
use tracing::debug;

/// Label of the extra item that moves back one question.
const BACK_ITEM: &str = "<- Back";

/// Typed into a text prompt to move back one question.
const BACK_COMMAND: &str = ":back";

/// Error type for the Dialoguer runner.
#[derive(Debug, Error)]
pub enum DialoguerError {
    /// User cancelled the survey (e.g., pressed Ctrl+C or Escape).
    #[error("Survey cancelled by user")]
    Cancelled,

    /// An I/O error occurred during prompting.
    #[error("Dialoguer error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// The session refused an operation or the submission failed.
    #[error(transparent)]
    Flow(#[from] FlowError),
}

/// Helper to check if a dialoguer error is a cancellation (Ctrl+C / Escape)
fn is_cancelled(err: &dialoguer::Error) -> bool {
    matches!(err, dialoguer::Error::IO(io_err) if io_err.kind() == std::io::ErrorKind::Interrupted)
}

fn prompt_result<T>(result: dialoguer::Result<T>) -> Result<T, DialoguerError> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if is_cancelled(&e) => Err(DialoguerError::Cancelled),
        Err(e) => Err(DialoguerError::Dialoguer(e)),
    }
}

/// What the user did at a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Answered,
    Back,
}

/// Dialoguer runner for interactive CLI surveys.
///
/// Presents the current question of a [`SurveyFlow`], writes the answer back
/// into the session and advances until the survey is submitted.
#[derive(Debug, Default, Clone)]
pub struct DialoguerRunner {
    /// Use colorful theme for prompts.
    colorful: bool,
}

impl DialoguerRunner {
    /// Create a new runner with default (colorful) theme.
    pub fn new() -> Self {
        Self { colorful: true }
    }

    /// Create a runner with plain (no color) theme.
    pub fn plain() -> Self {
        Self { colorful: false }
    }

    fn theme(&self) -> Box<dyn Theme> {
        if self.colorful {
            Box::new(ColorfulTheme::default())
        } else {
            Box::new(SimpleTheme)
        }
    }

    /// Run the session to completion.
    ///
    /// A failed submission offers a retry; declining it returns the error with
    /// the session still on the last question.
    pub async fn run<S: SubmissionSink>(
        &self,
        flow: &mut SurveyFlow,
        sink: &S,
    ) -> Result<SubmissionReceipt, DialoguerError> {
        if flow.questions().is_empty() {
            // Nothing to ask: submit right away.
            return Ok(flow.submit(sink).await?);
        }

        loop {
            let Some(question) = flow.current_question().cloned() else {
                return Err(FlowError::Completed.into());
            };
            let (position, total) = flow.progress();
            let can_go_back = position > 1;
            let prompt = format!("[{position}/{total}] {}", question.text());

            if self.ask(flow, &question, &prompt, can_go_back)? == Step::Back {
                flow.retreat()?;
                continue;
            }

            match flow.advance(sink).await {
                Ok(Advance::Blocked) => eprintln!("Error: an answer is required"),
                Ok(Advance::Moved { from, to }) => debug!(from, to, "next question"),
                Ok(Advance::Completed(receipt)) => return Ok(receipt),
                Err(FlowError::Submission(err)) => {
                    eprintln!("Error: {err:#}");
                    if !self.confirm_retry()? {
                        return Err(FlowError::Submission(err).into());
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn ask(
        &self,
        flow: &mut SurveyFlow,
        question: &Question,
        prompt: &str,
        can_go_back: bool,
    ) -> Result<Step, DialoguerError> {
        if question.options().is_empty() {
            return self.ask_text(flow, question, prompt, can_go_back);
        }
        match question.kind() {
            Kind::SingleChoice => self.ask_single(flow, question, prompt, can_go_back),
            Kind::MultiChoice => self.ask_multi(flow, question, prompt, can_go_back),
            Kind::Text | Kind::Numeric | Kind::Other(_) => {
                self.ask_text(flow, question, prompt, can_go_back)
            }
        }
    }

    fn ask_single(
        &self,
        flow: &mut SurveyFlow,
        question: &Question,
        prompt: &str,
        can_go_back: bool,
    ) -> Result<Step, DialoguerError> {
        let mut items = option_labels(question);
        if can_go_back {
            items.push(BACK_ITEM.to_string());
        }

        let theme = self.theme();
        let mut builder = Select::with_theme(theme.as_ref())
            .with_prompt(prompt)
            .items(&items);
        if let Some(selected) = selected_option(question, flow.current_answer()) {
            builder = builder.default(selected);
        }
        let picked = prompt_result(builder.interact())?;

        if picked >= question.options().len() {
            return Ok(Step::Back);
        }

        flow.select_option(picked)?;
        if question.options()[picked].custom_input {
            let initial = custom_text(question, flow.current_answer());
            let text = self.ask_custom_text(&initial)?;
            flow.type_custom_input(text)?;
            flow.commit_custom_input()?;
        }
        Ok(Step::Answered)
    }

    fn ask_multi(
        &self,
        flow: &mut SurveyFlow,
        question: &Question,
        prompt: &str,
        can_go_back: bool,
    ) -> Result<Step, DialoguerError> {
        let mut items = option_labels(question);
        let mut defaults = multi_defaults(question, flow.current_answer());
        if can_go_back {
            items.push(BACK_ITEM.to_string());
            defaults.push(false);
        }

        let theme = self.theme();
        let picked = prompt_result(
            MultiSelect::with_theme(theme.as_ref())
                .with_prompt(prompt)
                .items(&items)
                .defaults(&defaults)
                .interact(),
        )?;

        if picked.iter().any(|&i| i >= question.options().len()) {
            return Ok(Step::Back);
        }

        let previous_custom = custom_text(question, flow.current_answer());
        let mut custom = None;
        let mut values = Vec::new();
        for &index in &picked {
            let option = &question.options()[index];
            if option.custom_input {
                custom = Some(index);
            } else {
                values.push(option.value.clone());
            }
        }

        flow.set_answer(values)?;
        if let Some(index) = custom {
            flow.select_option(index)?;
            let text = self.ask_custom_text(&previous_custom)?;
            flow.type_custom_input(text)?;
            flow.commit_custom_input()?;
        }
        Ok(Step::Answered)
    }

    fn ask_text(
        &self,
        flow: &mut SurveyFlow,
        question: &Question,
        prompt: &str,
        can_go_back: bool,
    ) -> Result<Step, DialoguerError> {
        let prompt = if can_go_back {
            format!("{prompt} ({BACK_COMMAND} to go back)")
        } else {
            prompt.to_string()
        };
        let numeric = question.kind() == &Kind::Numeric;

        let theme = self.theme();
        let mut builder = Input::<String>::with_theme(theme.as_ref())
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(AnswerValue::Scalar(current)) = flow.current_answer() {
            builder = builder.with_initial_text(current.clone());
        }
        if numeric {
            builder = builder.validate_with(|input: &String| -> Result<(), String> {
                if is_back_command(input) {
                    return Ok(());
                }
                validate_numeric(input)
            });
        }
        let value = prompt_result(builder.interact_text())?;

        if can_go_back && is_back_command(&value) {
            return Ok(Step::Back);
        }

        let value = value.trim();
        if value.is_empty() {
            flow.clear_answer()?;
        } else {
            flow.set_answer(value)?;
        }
        Ok(Step::Answered)
    }

    fn ask_custom_text(&self, initial: &str) -> Result<String, DialoguerError> {
        let theme = self.theme();
        let mut builder = Input::<String>::with_theme(theme.as_ref())
            .with_prompt("Your answer")
            .allow_empty(true);
        if !initial.is_empty() {
            builder = builder.with_initial_text(initial);
        }
        prompt_result(builder.interact_text())
    }

    fn confirm_retry(&self) -> Result<bool, DialoguerError> {
        let theme = self.theme();
        prompt_result(
            Confirm::with_theme(theme.as_ref())
                .with_prompt("Submission failed. Try again?")
                .default(true)
                .interact(),
        )
    }
}

fn option_labels(question: &Question) -> Vec<String> {
    question.options().iter().map(|o| o.display.clone()).collect()
}

/// Index of the option matching a single-choice answer.
///
/// Text that matches no option value was typed into the custom-input option.
fn selected_option(question: &Question, answer: Option<&AnswerValue>) -> Option<usize> {
    let value = answer?.as_scalar()?;
    question
        .options()
        .iter()
        .position(|o| !o.custom_input && o.value == value)
        .or_else(|| question.options().iter().position(|o| o.custom_input))
}

fn multi_defaults(question: &Question, answer: Option<&AnswerValue>) -> Vec<bool> {
    let has_custom = !custom_text(question, answer).is_empty();
    question
        .options()
        .iter()
        .map(|o| {
            if o.custom_input {
                has_custom
            } else {
                answer.is_some_and(|a| a.list_contains(&o.value) || a.is_scalar_eq(&o.value))
            }
        })
        .collect()
}

/// The part of an answer that came from free text rather than an option.
fn custom_text(question: &Question, answer: Option<&AnswerValue>) -> String {
    if !question.has_custom_input_option() {
        return String::new();
    }
    let is_option = |v: &str| question.has_option_value(v);
    match answer {
        Some(AnswerValue::Scalar(s)) if !is_option(s) => s.clone(),
        Some(AnswerValue::List(items)) => items
            .iter()
            .filter(|v| !is_option(v))
            .cloned()
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    }
}

fn is_back_command(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case(BACK_COMMAND)
}

fn validate_numeric(input: &str) -> Result<(), String> {
    let input = input.trim();
    if input.is_empty() || input.parse::<f64>().is_ok() {
        Ok(())
    } else {
        Err(format!("'{input}' is not a number"))
    }
}
