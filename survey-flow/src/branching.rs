//! Skip and end-of-survey evaluation.

use serde::{Deserialize, Serialize};
use survey_flow_types::{AnswerValue, Answers, Question, SkipCondition, SkipRule, SkipTarget};
use tracing::{debug, warn};

/// Where navigation goes after the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// Move to the question at this index.
    Question(usize),

    /// An `end_if` rule fired: the survey ends after this question.
    End,

    /// The current question is the last one.
    Exhausted,
}

/// Which rule's target hints are used once some skip rule matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipTargetStrategy {
    /// Always the first rule in the list, whichever rule matched.
    /// This is how existing survey content has been authored against.
    #[default]
    FirstRule,

    /// The rule that matched.
    MatchedRule,
}

/// Computes the next step from the current question's answer and rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchEvaluator {
    strategy: SkipTargetStrategy,
}

impl BranchEvaluator {
    /// Create an evaluator with the given target strategy.
    pub fn new(strategy: SkipTargetStrategy) -> Self {
        Self { strategy }
    }

    /// Decide where to go after the question at `current`.
    ///
    /// `end_if` is checked before any skip rule. Skip rules are evaluated in
    /// order and the first match wins.
    pub fn next_step(&self, current: usize, questions: &[Question], answers: &Answers) -> NextStep {
        let Some(last) = questions.len().checked_sub(1) else {
            return NextStep::Exhausted;
        };
        if current >= last {
            return NextStep::Exhausted;
        }

        let question = &questions[current];
        let answer = answers.get(question.id());
        let logic = question.logic();

        if let Some(AnswerValue::Scalar(value)) = answer
            && logic.end_if.iter().any(|end| end == value)
        {
            debug!(question = %question.id(), answer = %value, "end_if matched");
            return NextStep::End;
        }

        let Some(matched) = logic
            .skip
            .iter()
            .position(|rule| condition_matches(&rule.condition, answer))
        else {
            return NextStep::Question(current + 1);
        };

        let rule = match self.strategy {
            SkipTargetStrategy::FirstRule => &logic.skip[0],
            SkipTargetStrategy::MatchedRule => &logic.skip[matched],
        };
        let target = resolve_target(rule, current, last, questions);
        debug!(
            question = %question.id(),
            rule = matched,
            from = current,
            to = target,
            "skip rule matched"
        );
        NextStep::Question(target)
    }
}

/// Check one skip condition against the current answer.
pub fn condition_matches(condition: &SkipCondition, answer: Option<&AnswerValue>) -> bool {
    let scalar_eq = |expected: &str| answer.is_some_and(|a| a.is_scalar_eq(expected));

    match condition {
        SkipCondition::Answer(expected) | SkipCondition::Equals(expected) => scalar_eq(expected),
        SkipCondition::AnyOf(values) => values.iter().any(|v| scalar_eq(v)),
        SkipCondition::NotEquals(expected) => !scalar_eq(expected),
        SkipCondition::Contains(item) => answer.is_some_and(|a| a.list_contains(item)),
        SkipCondition::NotContains(item) => !answer.is_some_and(|a| a.list_contains(item)),
        SkipCondition::Unrecognized => false,
    }
}

fn resolve_target(rule: &SkipRule, current: usize, last: usize, questions: &[Question]) -> usize {
    match &rule.target {
        SkipTarget::Question(id) => match questions.iter().position(|q| q.id() == id) {
            Some(index) => index,
            None => {
                warn!(skip_to = %id, "skip_to names an unknown question, advancing by one");
                current + 1
            }
        },
        SkipTarget::Offset(count) => {
            let count = usize::try_from(*count).unwrap_or(0);
            current.saturating_add(count).saturating_add(1).min(last)
        }
        SkipTarget::Default => (current + 2).min(last),
    }
}

#[cfg(test)]
mod tests {
    use survey_flow_types::{BranchLogic, Kind};

    use super::*;

    fn linear(count: usize) -> Vec<Question> {
        (1..=count)
            .map(|i| Question::new(format!("q{i}"), format!("Question {i}"), Kind::Text))
            .collect()
    }

    fn with_logic(mut questions: Vec<Question>, index: usize, logic: BranchLogic) -> Vec<Question> {
        questions[index] = questions[index].clone().with_logic(logic);
        questions
    }

    fn answered(id: &str, value: impl Into<AnswerValue>) -> Answers {
        let mut answers = Answers::new();
        answers.insert(id, value);
        answers
    }

    #[test]
    fn last_question_is_exhausted() {
        let questions = linear(3);
        let evaluator = BranchEvaluator::default();
        assert_eq!(evaluator.next_step(2, &questions, &Answers::new()), NextStep::Exhausted);
        assert_eq!(evaluator.next_step(0, &[], &Answers::new()), NextStep::Exhausted);
    }

    #[test]
    fn no_rules_advance_by_one() {
        let questions = linear(3);
        let evaluator = BranchEvaluator::default();
        assert_eq!(evaluator.next_step(0, &questions, &Answers::new()), NextStep::Question(1));
    }

    #[test]
    fn end_if_preempts_skip() {
        let logic = BranchLogic::new()
            .with_end_if(["X"])
            .with_skip(SkipRule::on_answer("X", SkipTarget::Question("q5".into())));
        let questions = with_logic(linear(5), 0, logic);

        let step = BranchEvaluator::default().next_step(0, &questions, &answered("q1", "X"));
        assert_eq!(step, NextStep::End);
    }

    #[test]
    fn end_if_ignores_list_answers() {
        let logic = BranchLogic::new().with_end_if(["X"]);
        let questions = with_logic(linear(3), 0, logic);

        let step = BranchEvaluator::default().next_step(0, &questions, &answered("q1", vec!["X"]));
        assert_eq!(step, NextStep::Question(1));
    }

    #[test]
    fn skip_to_jumps_to_named_question() {
        let logic = BranchLogic::new().with_skip(SkipRule::on_answer("A", SkipTarget::Question("q4".into())));
        let questions = with_logic(linear(5), 0, logic);

        let evaluator = BranchEvaluator::default();
        assert_eq!(evaluator.next_step(0, &questions, &answered("q1", "A")), NextStep::Question(3));
        assert_eq!(evaluator.next_step(0, &questions, &answered("q1", "B")), NextStep::Question(1));
    }

    #[test]
    fn unknown_skip_to_falls_back_to_next() {
        let logic = BranchLogic::new()
            .with_skip(SkipRule::on_answer("A", SkipTarget::Question("nonexistent".into())));
        let questions = with_logic(linear(4), 1, logic);

        let step = BranchEvaluator::default().next_step(1, &questions, &answered("q2", "A"));
        assert_eq!(step, NextStep::Question(2));
    }

    #[test]
    fn skip_count_is_clamped_to_last() {
        let logic = BranchLogic::new().with_skip(SkipRule::on_answer("A", SkipTarget::Offset(2)));
        let questions = with_logic(linear(6), 0, logic.clone());
        let evaluator = BranchEvaluator::default();
        assert_eq!(evaluator.next_step(0, &questions, &answered("q1", "A")), NextStep::Question(3));

        let questions = with_logic(linear(3), 0, logic);
        assert_eq!(evaluator.next_step(0, &questions, &answered("q1", "A")), NextStep::Question(2));
    }

    #[test]
    fn negative_skip_count_acts_as_zero() {
        let logic = BranchLogic::new().with_skip(SkipRule::on_answer("A", SkipTarget::Offset(-3)));
        let questions = with_logic(linear(4), 1, logic);
        let step = BranchEvaluator::default().next_step(1, &questions, &answered("q2", "A"));
        assert_eq!(step, NextStep::Question(2));
    }

    #[test]
    fn default_target_skips_one_question() {
        let logic = BranchLogic::new().with_skip(SkipRule::on_answer("A", SkipTarget::Default));
        let questions = with_logic(linear(4), 0, logic.clone());
        let evaluator = BranchEvaluator::default();
        assert_eq!(evaluator.next_step(0, &questions, &answered("q1", "A")), NextStep::Question(2));

        let questions = with_logic(linear(2), 0, logic);
        assert_eq!(evaluator.next_step(0, &questions, &answered("q1", "A")), NextStep::Question(1));
    }

    #[test]
    fn condition_semantics() {
        let scalar = AnswerValue::from("A");
        let list = AnswerValue::from(vec!["A", "B"]);

        assert!(condition_matches(&SkipCondition::Answer("A".into()), Some(&scalar)));
        assert!(!condition_matches(&SkipCondition::Answer("A".into()), Some(&list)));
        assert!(condition_matches(
            &SkipCondition::AnyOf(vec!["Z".into(), "A".into()]),
            Some(&scalar)
        ));
        assert!(condition_matches(&SkipCondition::Equals("A".into()), Some(&scalar)));
        assert!(condition_matches(&SkipCondition::NotEquals("B".into()), Some(&scalar)));
        assert!(condition_matches(&SkipCondition::NotEquals("B".into()), None));
        assert!(condition_matches(&SkipCondition::Contains("B".into()), Some(&list)));
        assert!(!condition_matches(&SkipCondition::Contains("A".into()), Some(&scalar)));
        assert!(condition_matches(&SkipCondition::NotContains("A".into()), Some(&scalar)));
        assert!(condition_matches(&SkipCondition::NotContains("C".into()), Some(&list)));
        assert!(!condition_matches(&SkipCondition::NotContains("A".into()), Some(&list)));
        assert!(condition_matches(&SkipCondition::NotContains("A".into()), None));
        assert!(!condition_matches(&SkipCondition::Unrecognized, Some(&scalar)));
    }

    #[test]
    fn first_match_wins() {
        let logic = BranchLogic::new()
            .with_skip(SkipRule::new(
                SkipCondition::Equals("A".into()),
                SkipTarget::Question("q3".into()),
            ))
            .with_skip(SkipRule::new(
                SkipCondition::NotEquals("Z".into()),
                SkipTarget::Question("q5".into()),
            ));
        let questions = with_logic(linear(5), 0, logic);

        let evaluator = BranchEvaluator::new(SkipTargetStrategy::MatchedRule);
        assert_eq!(evaluator.next_step(0, &questions, &answered("q1", "A")), NextStep::Question(2));
    }

    #[test]
    fn target_strategy_decides_which_rule_points_the_way() {
        let logic = BranchLogic::new()
            .with_skip(SkipRule::on_answer("A", SkipTarget::Question("q3".into())))
            .with_skip(SkipRule::on_answer("B", SkipTarget::Question("q5".into())));
        let questions = with_logic(linear(5), 0, logic);
        let answers = answered("q1", "B");

        let first = BranchEvaluator::new(SkipTargetStrategy::FirstRule);
        assert_eq!(first.next_step(0, &questions, &answers), NextStep::Question(2));

        let matched = BranchEvaluator::new(SkipTargetStrategy::MatchedRule);
        assert_eq!(matched.next_step(0, &questions, &answers), NextStep::Question(4));
    }
}
