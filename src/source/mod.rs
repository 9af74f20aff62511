pub mod fallback;
pub mod opentdb;

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::QuizConfig;

/// One multiple-choice question. Prompt and answers keep whatever markup the
/// trivia API returned; interpretation happens at render time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub prompt: String,
    pub correct_answer: String,
    pub options: Vec<String>,
    pub category: String,
    pub difficulty: String,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[cfg(feature = "network")]
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("trivia API returned HTTP {0}")]
    Status(u16),
    #[error("malformed trivia API response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("trivia API returned no questions")]
    Empty,
    #[cfg(not(feature = "network"))]
    #[error("built without network support")]
    Disabled,
}

/// What the adapter hands to the session: questions to run with, plus the
/// reason the built-in set was substituted, if it was. A failed fetch is
/// never fatal.
#[derive(Debug)]
pub struct SourceOutcome {
    pub questions: Vec<Question>,
    pub fallback_reason: Option<SourceError>,
}

impl SourceOutcome {
    pub fn used_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }
}

pub fn load(config: &QuizConfig, timeout: Duration, rng: &mut impl Rng) -> SourceOutcome {
    match opentdb::fetch(config, timeout, rng) {
        Ok(questions) => SourceOutcome {
            questions,
            fallback_reason: None,
        },
        Err(err) => SourceOutcome {
            questions: fallback::question_set(),
            fallback_reason: Some(err),
        },
    }
}

/// Insert the correct answer at a uniformly random position among the
/// distractors. Non-deterministic unless a seeded rng is injected.
pub fn place_answer(correct: &str, incorrect: &[String], rng: &mut impl Rng) -> Vec<String> {
    let mut options: Vec<String> = incorrect.to_vec();
    let slot = rng.gen_range(0..=options.len());
    options.insert(slot, correct.to_string());
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn distractors() -> Vec<String> {
        vec!["one".to_string(), "two".to_string(), "three".to_string()]
    }

    #[test]
    fn place_answer_contains_correct_exactly_once() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..50 {
            let options = place_answer("right", &distractors(), &mut rng);
            assert_eq!(options.len(), 4);
            assert_eq!(options.iter().filter(|o| *o == "right").count(), 1);
        }
    }

    #[test]
    fn place_answer_reaches_every_slot() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let options = place_answer("right", &distractors(), &mut rng);
            let slot = options.iter().position(|o| o == "right").unwrap();
            seen[slot] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn place_answer_is_deterministic_with_same_seed() {
        let a = place_answer("right", &distractors(), &mut SmallRng::seed_from_u64(3));
        let b = place_answer("right", &distractors(), &mut SmallRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn question_stored_keys_are_camel_case() {
        let question = Question {
            prompt: "2+2=?".to_string(),
            correct_answer: "4".to_string(),
            options: vec!["1".into(), "4".into(), "2".into(), "3".into()],
            category: "Math".to_string(),
            difficulty: "easy".to_string(),
        };
        let json = serde_json::to_string(&question).unwrap();
        assert!(json.contains("\"correctAnswer\":\"4\""));
    }
}
