use std::time::Duration;

use rand::Rng;
use serde::Deserialize;

use crate::config::QuizConfig;
use crate::source::{Question, SourceError, place_answer};

const API_URL: &str = "https://opentdb.com/api.php";

#[derive(Debug, Deserialize)]
struct ApiResponse {
    results: Vec<ApiQuestion>,
}

#[derive(Debug, Deserialize)]
struct ApiQuestion {
    category: String,
    difficulty: String,
    question: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}

pub fn request_url(config: &QuizConfig) -> String {
    let mut url = format!("{API_URL}?amount={}&type=multiple", config.question_count);
    if let Some(difficulty) = config.difficulty.api_param() {
        url.push_str("&difficulty=");
        url.push_str(difficulty);
    }
    url
}

pub fn fetch(
    config: &QuizConfig,
    timeout: Duration,
    rng: &mut impl Rng,
) -> Result<Vec<Question>, SourceError> {
    let body = fetch_body(&request_url(config), timeout)?;
    parse_response(&body, rng)
}

#[cfg(feature = "network")]
fn fetch_body(url: &str, timeout: Duration) -> Result<String, SourceError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()?;
    let response = client.get(url).send()?;
    if !response.status().is_success() {
        return Err(SourceError::Status(response.status().as_u16()));
    }
    Ok(response.text()?)
}

#[cfg(not(feature = "network"))]
fn fetch_body(_url: &str, _timeout: Duration) -> Result<String, SourceError> {
    Err(SourceError::Disabled)
}

pub fn parse_response(body: &str, rng: &mut impl Rng) -> Result<Vec<Question>, SourceError> {
    let response: ApiResponse = serde_json::from_str(body)?;
    if response.results.is_empty() {
        return Err(SourceError::Empty);
    }
    Ok(response
        .results
        .into_iter()
        .map(|q| normalize(q, rng))
        .collect())
}

fn normalize(q: ApiQuestion, rng: &mut impl Rng) -> Question {
    let options = place_answer(&q.correct_answer, &q.incorrect_answers, rng);
    Question {
        prompt: q.question,
        correct_answer: q.correct_answer,
        options,
        category: q.category,
        difficulty: q.difficulty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Difficulty;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    const SAMPLE_BODY: &str = r#"{
        "response_code": 0,
        "results": [
            {
                "category": "Science: Computers",
                "type": "multiple",
                "difficulty": "easy",
                "question": "What does CPU stand for?",
                "correct_answer": "Central Processing Unit",
                "incorrect_answers": [
                    "Central Process Unit",
                    "Computer Personal Unit",
                    "Central Processor Unit"
                ]
            },
            {
                "category": "Geography",
                "type": "multiple",
                "difficulty": "medium",
                "question": "What is the capital of Mongolia?",
                "correct_answer": "Ulaanbaatar",
                "incorrect_answers": ["Astana", "Bishkek", "Kathmandu"]
            }
        ]
    }"#;

    #[test]
    fn test_request_url_without_difficulty_filter() {
        let config = QuizConfig {
            question_count: 10,
            difficulty: Difficulty::Any,
        };
        assert_eq!(
            request_url(&config),
            "https://opentdb.com/api.php?amount=10&type=multiple"
        );
    }

    #[test]
    fn test_request_url_with_difficulty_filter() {
        let config = QuizConfig {
            question_count: 5,
            difficulty: Difficulty::Hard,
        };
        assert_eq!(
            request_url(&config),
            "https://opentdb.com/api.php?amount=5&type=multiple&difficulty=hard"
        );
    }

    #[test]
    fn test_parse_response_normalizes_questions() {
        let mut rng = SmallRng::seed_from_u64(1);
        let questions = parse_response(SAMPLE_BODY, &mut rng).unwrap();
        assert_eq!(questions.len(), 2);
        for q in &questions {
            assert_eq!(q.options.len(), 4);
            assert_eq!(
                q.options.iter().filter(|o| **o == q.correct_answer).count(),
                1
            );
        }
        assert_eq!(questions[0].prompt, "What does CPU stand for?");
        assert_eq!(questions[1].category, "Geography");
        assert_eq!(questions[1].difficulty, "medium");
    }

    #[test]
    fn test_parse_response_empty_results_is_error() {
        let mut rng = SmallRng::seed_from_u64(1);
        let err = parse_response(r#"{"response_code": 1, "results": []}"#, &mut rng).unwrap_err();
        assert!(matches!(err, SourceError::Empty));
    }

    #[test]
    fn test_parse_response_malformed_body_is_error() {
        let mut rng = SmallRng::seed_from_u64(1);
        let err = parse_response("<html>503</html>", &mut rng).unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[test]
    fn test_markup_is_preserved_verbatim() {
        let body = r#"{
            "response_code": 0,
            "results": [{
                "category": "Entertainment: Film",
                "type": "multiple",
                "difficulty": "easy",
                "question": "Who directed &quot;Jaws&quot;?",
                "correct_answer": "Steven Spielberg",
                "incorrect_answers": ["A", "B", "C"]
            }]
        }"#;
        let mut rng = SmallRng::seed_from_u64(1);
        let questions = parse_response(body, &mut rng).unwrap();
        assert_eq!(questions[0].prompt, "Who directed &quot;Jaws&quot;?");
    }
}
