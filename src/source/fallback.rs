use rust_embed::Embed;

use crate::source::Question;

#[derive(Embed)]
#[folder = "assets/questions/"]
struct QuestionAssets;

/// The built-in set substituted when the trivia API is unavailable.
pub fn question_set() -> Vec<Question> {
    QuestionAssets::get("fallback.json")
        .and_then(|file| serde_json::from_slice(file.data.as_ref()).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_set_has_three_questions() {
        let questions = question_set();
        assert_eq!(questions.len(), 3);
    }

    #[test]
    fn test_fallback_options_contain_correct_exactly_once() {
        for q in question_set() {
            assert_eq!(q.options.len(), 4);
            assert_eq!(
                q.options.iter().filter(|o| **o == q.correct_answer).count(),
                1,
                "bad fallback entry: {}",
                q.prompt
            );
        }
    }
}
