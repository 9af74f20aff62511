use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::source::Question;

/// Durable summary of a finished or abandoned session. Written once when the
/// session finishes, persisted under `quizResults`, cleared when the user
/// starts over.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub questions: Vec<Question>,
    pub answers: HashMap<usize, String>,
    pub final_score: u32,
    pub total_questions: usize,
    pub completed_questions: usize,
    #[serde(default)]
    pub used_fallback: bool,
    pub completed_at: DateTime<Utc>,
}

impl ResultRecord {
    pub fn answer_for(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn is_correct(&self, index: usize) -> bool {
        match (self.answer_for(index), self.questions.get(index)) {
            (Some(answer), Some(question)) => answer == question.correct_answer,
            _ => false,
        }
    }

    pub fn percentage(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        (self.final_score as f64 / self.total_questions as f64 * 100.0).round() as u32
    }

    pub fn incorrect_count(&self) -> usize {
        self.total_questions - self.final_score as usize
    }

    /// Text handed to the share action.
    pub fn summary_line(&self) -> String {
        format!(
            "I scored {}/{} ({}%) on the quizzed trivia challenge!",
            self.final_score,
            self.total_questions,
            self.percentage()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(score: u32, total: usize) -> ResultRecord {
        ResultRecord {
            questions: Vec::new(),
            answers: HashMap::new(),
            final_score: score,
            total_questions: total,
            completed_questions: total,
            used_fallback: false,
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn test_percentage_rounds() {
        assert_eq!(record(2, 3).percentage(), 67);
        assert_eq!(record(0, 5).percentage(), 0);
        assert_eq!(record(5, 5).percentage(), 100);
    }

    #[test]
    fn test_percentage_of_empty_record_is_zero() {
        assert_eq!(record(0, 0).percentage(), 0);
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(
            record(7, 10).summary_line(),
            "I scored 7/10 (70%) on the quizzed trivia challenge!"
        );
    }

    #[test]
    fn test_stored_keys_are_camel_case() {
        let json = serde_json::to_string(&record(1, 2)).unwrap();
        assert!(json.contains("\"finalScore\":1"));
        assert!(json.contains("\"totalQuestions\":2"));
        assert!(json.contains("\"completedQuestions\":2"));
    }

    #[test]
    fn test_record_without_fallback_field_still_loads() {
        // Records written before the field existed default to false.
        let json = r#"{
            "questions": [],
            "answers": {},
            "finalScore": 0,
            "totalQuestions": 0,
            "completedQuestions": 0,
            "completedAt": "2024-01-01T00:00:00Z"
        }"#;
        let record: ResultRecord = serde_json::from_str(json).unwrap();
        assert!(!record.used_fallback);
    }
}
