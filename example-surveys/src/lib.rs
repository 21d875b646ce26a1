//! Sample question sets in the provider's wire format.
//!
//! - `onboarding` - English; explicit type tags, `end_if`, a `not_contains`
//!   skip and custom-input options in both single and multi choice.
//! - `rewards_ru` - Russian legacy data; numeric ids, untagged multi-choice
//!   detected by keywords, camelCase target hints.

use survey_flow_types::QuestionRecord;

pub const ONBOARDING_JSON: &str = include_str!("../surveys/onboarding.json");

pub const REWARDS_RU_JSON: &str = include_str!("../surveys/rewards_ru.json");

/// Survey ids paired with their JSON, for lookup by name.
pub const ALL: &[(&str, &str)] = &[("onboarding", ONBOARDING_JSON), ("rewards_ru", REWARDS_RU_JSON)];

/// The onboarding survey records.
pub fn onboarding() -> Result<Vec<QuestionRecord>, serde_json::Error> {
    serde_json::from_str(ONBOARDING_JSON)
}

/// The Russian rewards survey records.
pub fn rewards_ru() -> Result<Vec<QuestionRecord>, serde_json::Error> {
    serde_json::from_str(REWARDS_RU_JSON)
}

/// Look up a bundled survey by id.
pub fn by_id(survey_id: &str) -> Option<Result<Vec<QuestionRecord>, serde_json::Error>> {
    ALL.iter()
        .find(|(id, _)| *id == survey_id)
        .map(|(_, json)| serde_json::from_str(json))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_surveys_parse() {
        assert_eq!(onboarding().unwrap().len(), 8);
        assert_eq!(rewards_ru().unwrap().len(), 6);
    }

    #[test]
    fn lookup_by_id() {
        assert!(by_id("onboarding").is_some());
        assert!(by_id("missing").is_none());
    }
}
