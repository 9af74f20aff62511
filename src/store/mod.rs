pub mod json_store;

use anyhow::Result;

use crate::config::QuizConfig;
use crate::session::result::ResultRecord;

pub const SETTINGS_KEY: &str = "quizSettings";
pub const RESULT_KEY: &str = "quizResults";
pub const HIGH_SCORE_KEY: &str = "highScore";
pub const TOTAL_QUIZZES_KEY: &str = "totalQuizzes";

/// String key-value persistence. The session and stats code only ever sees
/// this trait, never a concrete store.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
}

pub fn load_settings(store: &impl KvStore) -> Option<QuizConfig> {
    let raw = store.get(SETTINGS_KEY)?;
    let mut config: QuizConfig = serde_json::from_str(&raw).ok()?;
    config.normalize();
    Some(config)
}

pub fn save_settings(store: &impl KvStore, config: &QuizConfig) -> Result<()> {
    store.set(SETTINGS_KEY, &serde_json::to_string(config)?)
}

/// Load the last completed session's record. Returns None when no record
/// exists or it cannot be parsed; both mean "nothing to show".
pub fn load_result(store: &impl KvStore) -> Option<ResultRecord> {
    serde_json::from_str(&store.get(RESULT_KEY)?).ok()
}

pub fn save_result(store: &impl KvStore, record: &ResultRecord) -> Result<()> {
    store.set(RESULT_KEY, &serde_json::to_string_pretty(record)?)
}

pub fn clear_result(store: &impl KvStore) -> Result<()> {
    store.delete(RESULT_KEY)
}
