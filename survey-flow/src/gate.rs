//! Whether the current answer allows moving forward.

use survey_flow_types::{AnswerValue, Answers, Kind, Question};

/// Check if `question` is answered well enough to advance past it.
///
/// Optional questions always pass. Numeric answers are only checked for
/// presence; range and format validation belong to the frontend.
pub fn can_advance(question: &Question, answers: &Answers) -> bool {
    if !question.is_required() {
        return true;
    }

    let answer = answers.get(question.id());

    match question.kind() {
        Kind::MultiChoice => answer
            .and_then(AnswerValue::as_list)
            .is_some_and(|items| !items.is_empty()),
        Kind::Numeric => match answer {
            Some(AnswerValue::Scalar(s)) => !s.is_empty(),
            Some(AnswerValue::List(items)) => !items.is_empty(),
            None => false,
        },
        Kind::SingleChoice | Kind::Text if !question.options().is_empty() => {
            let Some(value) = answer.and_then(AnswerValue::as_scalar).map(str::trim) else {
                return false;
            };
            // Committed custom text stands in for the custom-input option.
            !value.is_empty() && (question.has_option_value(value) || question.has_custom_input_option())
        }
        Kind::SingleChoice | Kind::Text | Kind::Other(_) => answer
            .and_then(AnswerValue::as_scalar)
            .is_some_and(|s| !s.trim().is_empty()),
    }
}
