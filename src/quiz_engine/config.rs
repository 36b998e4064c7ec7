//! Tuning knobs for question selection.
//!
//! Resolve a [`QuizConfig`] once at startup and hand it to sessions; nothing in
//! the engine reads the environment.

use serde::{Deserialize, Serialize};

use crate::quiz_engine::error::{QuizError, QuizResult};

/// Largest distractor count that keeps a question at five options or fewer.
pub const MAX_DISTRACTORS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Attempts a user needs in total before adaptive targeting kicks in.
    pub adaptive_min_history: u32,
    /// Attempts a category needs before it can count as weak.
    pub weak_min_attempts: u32,
    /// Accuracy strictly below this marks a category weak.
    pub weak_threshold: f64,
    /// Wrong answers offered next to the correct diagnosis.
    pub distractor_count: usize,
    /// Symptoms quoted in symptom-based prompts.
    pub symptom_sample: usize,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            adaptive_min_history: 5,
            weak_min_attempts: 3,
            weak_threshold: 0.6,
            distractor_count: 3,
            symptom_sample: 2,
        }
    }
}

impl QuizConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> QuizResult<Self> {
        let config: QuizConfig = serde_json::from_str(json).map_err(QuizError::ConfigLoad)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> QuizResult<()> {
        if !(self.weak_threshold > 0.0 && self.weak_threshold <= 1.0) {
            return Err(QuizError::InvalidConfig(format!(
                "weak_threshold must be in (0, 1], got {}",
                self.weak_threshold
            )));
        }
        if !(1..=MAX_DISTRACTORS).contains(&self.distractor_count) {
            return Err(QuizError::InvalidConfig(format!(
                "distractor_count must be in 1..={MAX_DISTRACTORS}, got {}",
                self.distractor_count
            )));
        }
        if self.symptom_sample == 0 {
            return Err(QuizError::InvalidConfig(
                "symptom_sample must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config = QuizConfig::from_json("{}").unwrap();
        assert_eq!(config, QuizConfig::default());
    }

    #[test]
    fn partial_json_overrides_only_given_fields() {
        let config = QuizConfig::from_json(r#"{ "weak_threshold": 0.75 }"#).unwrap();
        assert_eq!(config.weak_threshold, 0.75);
        assert_eq!(config.weak_min_attempts, 3);
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let err = QuizConfig::from_json(r#"{ "weak_threshold": 1.5 }"#).unwrap_err();
        assert!(matches!(err, QuizError::InvalidConfig(_)));
    }

    #[test]
    fn zero_distractors_is_rejected() {
        let err = QuizConfig::from_json(r#"{ "distractor_count": 0 }"#).unwrap_err();
        assert!(matches!(err, QuizError::InvalidConfig(_)));
    }

    #[test]
    fn too_many_distractors_is_rejected() {
        let err = QuizConfig::from_json(r#"{ "distractor_count": 5 }"#).unwrap_err();
        assert!(matches!(err, QuizError::InvalidConfig(_)));
        assert!(QuizConfig::from_json(r#"{ "distractor_count": 4 }"#).is_ok());
    }

    #[test]
    fn malformed_json_is_a_load_error() {
        let err = QuizConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, QuizError::ConfigLoad(_)));
    }
}
