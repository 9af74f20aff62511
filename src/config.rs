use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const QUESTION_COUNTS: [u32; 4] = [5, 10, 15, 20];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Any,
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Any,
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Any => "any",
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Any => "Any Difficulty",
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Query parameter value for the trivia API. `Any` sends no filter.
    pub fn api_param(self) -> Option<&'static str> {
        match self {
            Difficulty::Any => None,
            other => Some(other.as_str()),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(name))
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|d| *d == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let pos = self.position();
        Self::ALL[if pos == 0 { Self::ALL.len() - 1 } else { pos - 1 }]
    }
}

/// Quiz settings chosen on the home screen. Persisted in the key-value store
/// under `quizSettings`, camelCase to match the stored document format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizConfig {
    #[serde(default = "default_question_count")]
    pub question_count: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
}

fn default_question_count() -> u32 {
    10
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_count: default_question_count(),
            difficulty: Difficulty::Any,
        }
    }
}

impl QuizConfig {
    /// Snap a count loaded from disk (or passed on the CLI) to the nearest
    /// allowed value.
    pub fn normalize(&mut self) {
        if !QUESTION_COUNTS.contains(&self.question_count) {
            self.question_count = QUESTION_COUNTS
                .into_iter()
                .min_by_key(|c| c.abs_diff(self.question_count))
                .unwrap_or(default_question_count());
        }
    }

    pub fn cycle_count_forward(&mut self) {
        let idx = QUESTION_COUNTS
            .iter()
            .position(|c| *c == self.question_count)
            .unwrap_or(0);
        self.question_count = QUESTION_COUNTS[(idx + 1) % QUESTION_COUNTS.len()];
    }

    pub fn cycle_count_backward(&mut self) {
        let idx = QUESTION_COUNTS
            .iter()
            .position(|c| *c == self.question_count)
            .unwrap_or(0);
        self.question_count =
            QUESTION_COUNTS[if idx == 0 { QUESTION_COUNTS.len() - 1 } else { idx - 1 }];
    }
}

/// App-level preferences, separate from quiz settings: `config.toml` in the
/// user config dir.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_theme() -> String {
    "terminal-default".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(AppConfig::default())
        }
    }

    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizzed")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_defaults_from_empty() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.theme, "terminal-default");
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_quiz_config_stored_keys_are_camel_case() {
        let config = QuizConfig {
            question_count: 15,
            difficulty: Difficulty::Hard,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"questionCount\":15"));
        assert!(json.contains("\"difficulty\":\"hard\""));
    }

    #[test]
    fn test_quiz_config_defaults_from_empty_document() {
        let config: QuizConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.question_count, 10);
        assert_eq!(config.difficulty, Difficulty::Any);
    }

    #[test]
    fn test_normalize_snaps_to_nearest_allowed_count() {
        let mut config = QuizConfig {
            question_count: 7,
            difficulty: Difficulty::Any,
        };
        config.normalize();
        assert_eq!(config.question_count, 5);

        config.question_count = 99;
        config.normalize();
        assert_eq!(config.question_count, 20);

        config.question_count = 15;
        config.normalize();
        assert_eq!(config.question_count, 15);
    }

    #[test]
    fn test_count_cycle_wraps() {
        let mut config = QuizConfig::default();
        assert_eq!(config.question_count, 10);
        config.cycle_count_forward();
        assert_eq!(config.question_count, 15);
        config.cycle_count_forward();
        config.cycle_count_forward();
        assert_eq!(config.question_count, 5);
        config.cycle_count_backward();
        assert_eq!(config.question_count, 20);
    }

    #[test]
    fn test_difficulty_api_param() {
        assert_eq!(Difficulty::Any.api_param(), None);
        assert_eq!(Difficulty::Medium.api_param(), Some("medium"));
    }

    #[test]
    fn test_difficulty_from_name() {
        assert_eq!(Difficulty::from_name("easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_name("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_name("extreme"), None);
    }

    #[test]
    fn test_difficulty_cycle_covers_all() {
        let mut d = Difficulty::Any;
        let mut seen = Vec::new();
        for _ in 0..Difficulty::ALL.len() {
            seen.push(d);
            d = d.next();
        }
        assert_eq!(d, Difficulty::Any);
        assert_eq!(seen.len(), 4);
        assert_eq!(Difficulty::Easy.prev(), Difficulty::Any);
    }
}
