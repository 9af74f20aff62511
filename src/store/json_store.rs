use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;

use crate::store::KvStore;

/// One file per key under the user data dir. Values are stored as-is: JSON
/// documents for `quizSettings`/`quizResults`, stringified integers for the
/// stat counters.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizzed");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    #[allow(dead_code)] // Used by tests across modules
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", sanitize_key(key)))
    }
}

fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl KvStore for JsonStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.file_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.file_path(key);
        let tmp_path = path.with_extension("tmp");

        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.file_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Difficulty, QuizConfig};
    use crate::store::{self, HIGH_SCORE_KEY};
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_get_missing_key_is_none() {
        let (_dir, store) = make_test_store();
        assert_eq!(store.get(HIGH_SCORE_KEY), None);
    }

    #[test]
    fn test_set_get_delete_round_trip() {
        let (_dir, store) = make_test_store();
        store.set(HIGH_SCORE_KEY, "7").unwrap();
        assert_eq!(store.get(HIGH_SCORE_KEY).as_deref(), Some("7"));

        store.set(HIGH_SCORE_KEY, "9").unwrap();
        assert_eq!(store.get(HIGH_SCORE_KEY).as_deref(), Some("9"));

        store.delete(HIGH_SCORE_KEY).unwrap();
        assert_eq!(store.get(HIGH_SCORE_KEY), None);
    }

    #[test]
    fn test_delete_missing_key_is_ok() {
        let (_dir, store) = make_test_store();
        assert!(store.delete("neverWritten").is_ok());
    }

    #[test]
    fn test_set_leaves_no_tmp_file() {
        let (dir, store) = make_test_store();
        store.set("totalQuizzes", "3").unwrap();
        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty());
    }

    #[test]
    fn test_key_sanitization_keeps_keys_separate() {
        let (_dir, store) = make_test_store();
        store.set("a/b", "one").unwrap();
        assert_eq!(store.get("a_b").as_deref(), Some("one"));
    }

    #[test]
    fn test_settings_round_trip_through_store() {
        let (_dir, store) = make_test_store();
        let config = QuizConfig {
            question_count: 20,
            difficulty: Difficulty::Easy,
        };
        store::save_settings(&store, &config).unwrap();
        assert_eq!(store::load_settings(&store), Some(config));
    }

    #[test]
    fn test_corrupt_settings_load_as_none() {
        let (_dir, store) = make_test_store();
        store.set(store::SETTINGS_KEY, "not json").unwrap();
        assert_eq!(store::load_settings(&store), None);
    }
}
