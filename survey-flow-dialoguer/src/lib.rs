//! # survey-flow-dialoguer
//!
//! Terminal frontend for survey-flow.
//!
//! Questions are presented one at a time using the `dialoguer` library:
//! single choice as a select list, multi-choice as checkboxes, everything
//! else as a line of text. Custom-input options open a follow-up text prompt.
//!
//! ## Example
//!
//! ```rust,ignore
//! use survey_flow::{FlowConfig, QuestionSet, SurveyFlow};
//! use survey_flow_dialoguer::DialoguerRunner;
//!
//! let config = FlowConfig::default();
//! let questions = QuestionSet::load(&source, "onboarding", fallback, &config).await;
//! let mut flow = SurveyFlow::new("onboarding", questions, &config);
//!
//! let receipt = DialoguerRunner::new().run(&mut flow, &sink).await?;
//! ```

mod runner;

pub use runner::{DialoguerError, DialoguerRunner};
