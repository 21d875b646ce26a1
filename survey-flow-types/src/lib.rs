//! Core types for the survey-flow crate.
//!
//! This crate provides the foundational types for running surveys:
//! - `Question`, `Kind` and `ChoiceOption` - Normalized questions
//! - `BranchLogic`, `SkipRule` - Per-question skip and end-of-survey rules
//! - `Answers` and `QuestionId` - Collected answers keyed by question id
//! - `QuestionRecord` and friends - The loose wire shape of question sets
//! - `Classifier`, `QuestionSource` and `SubmissionSink` traits - The seams
//!   to classification strategies and external collaborators

mod question_id;
pub use question_id::QuestionId;

mod answer_value;
pub use answer_value::AnswerValue;

mod answers;
pub use answers::{AnswerError, Answers};

mod question;
pub use question::{BranchLogic, ChoiceOption, Kind, Question, SkipCondition, SkipRule, SkipTarget};

pub mod record;
pub use record::QuestionRecord;

mod error;
pub use error::FlowError;

mod traits;
pub use traits::{Classifier, QuestionSource, SubmissionReceipt, SubmissionSink};
