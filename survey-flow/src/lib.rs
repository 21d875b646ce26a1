//! # survey-flow
//!
//! Survey flow evaluation. Frontend-agnostic.
//!
//! Given a question set, the answers collected so far, and per-question
//! branching rules, this crate decides what kind of input each question takes,
//! which question comes next, whether the current answer allows moving on,
//! and when the survey is finished and submitted.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use survey_flow::{Advance, FlowConfig, QuestionSet, SurveyFlow};
//!
//! let config = FlowConfig::default().with_language("en");
//! let questions = QuestionSet::load(&provider, "onboarding", fallback, &config).await;
//! let mut flow = SurveyFlow::new("onboarding", questions, &config);
//!
//! flow.select_option(0)?;
//! match flow.advance(&sink).await? {
//!     Advance::Blocked => { /* keep the "next" button disabled */ }
//!     Advance::Moved { to, .. } => { /* show question `to` */ }
//!     Advance::Completed(receipt) => { /* thank the user */ }
//! }
//! ```
//!
//! ## Components
//!
//! - `KeywordClassifier` - Type tags, then prompt keywords, then options
//! - `AnswerStore` - Answers plus the pending "write your own" text
//! - `BranchEvaluator` - `end_if` and skip rules
//! - `gate::can_advance` - Required/optional contract per kind
//! - `SurveyFlow` - Forward/backward navigation and submission
//!
//! ## Frontends
//!
//! Frontends are separate crates driving a `SurveyFlow`:
//! - `survey-flow-dialoguer` - terminal prompts via dialoguer

// Re-export all types from survey-flow-types
pub use survey_flow_types::*;

pub mod branching;
pub use branching::{BranchEvaluator, NextStep, SkipTargetStrategy};

pub mod classifier;
pub use classifier::{DEFAULT_MULTI_CHOICE_KEYWORDS, KeywordClassifier};

mod config;
pub use config::{ConfigError, FlowConfig};

pub mod custom_input;
pub use custom_input::{CustomInputMatcher, CustomInputState};

mod flow;
pub use flow::{Advance, BackNavigation, FlowState, SurveyFlow};

pub mod gate;

mod question_set;
pub use question_set::QuestionSet;

mod store;
pub use store::AnswerStore;

// In-memory collaborators for testing sessions without a backend
mod testing;
pub use testing::{FailingSource, StaticSource, TestCollaboratorError, TestSink};
