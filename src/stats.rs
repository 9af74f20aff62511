use crate::store::{HIGH_SCORE_KEY, KvStore, TOTAL_QUIZZES_KEY};

/// Career counters, persisted as stringified integers under `highScore` and
/// `totalQuizzes`. Both only ever go up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub high_score: u32,
    pub total_quizzes: u32,
}

impl Stats {
    pub fn load(store: &impl KvStore) -> Self {
        Self {
            high_score: read_counter(store, HIGH_SCORE_KEY),
            total_quizzes: read_counter(store, TOTAL_QUIZZES_KEY),
        }
    }

    /// Counted the moment a session starts, before its outcome is known, so
    /// an abandoned or crashed session still shows up in the tally. A failed
    /// write must not block the quiz.
    pub fn record_session_start(&mut self, store: &impl KvStore) {
        self.total_quizzes += 1;
        let _ = store.set(TOTAL_QUIZZES_KEY, &self.total_quizzes.to_string());
    }

    /// Returns true when `final_score` sets a new high score. The flag is
    /// display-only.
    pub fn accept_result(&mut self, store: &impl KvStore, final_score: u32) -> bool {
        if final_score > self.high_score {
            self.high_score = final_score;
            let _ = store.set(HIGH_SCORE_KEY, &self.high_score.to_string());
            return true;
        }
        false
    }
}

fn read_counter(store: &impl KvStore, key: &str) -> u32 {
    store
        .get(key)
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::json_store::JsonStore;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_fresh_store_loads_zeroes() {
        let (_dir, store) = make_test_store();
        assert_eq!(Stats::load(&store), Stats::default());
    }

    #[test]
    fn test_session_start_increments_and_persists() {
        let (_dir, store) = make_test_store();
        let mut stats = Stats::load(&store);
        stats.record_session_start(&store);
        stats.record_session_start(&store);
        assert_eq!(stats.total_quizzes, 2);
        assert_eq!(store.get(TOTAL_QUIZZES_KEY).as_deref(), Some("2"));
        assert_eq!(Stats::load(&store).total_quizzes, 2);
    }

    #[test]
    fn test_accept_result_updates_high_score_once_beaten() {
        let (_dir, store) = make_test_store();
        let mut stats = Stats::load(&store);

        assert!(stats.accept_result(&store, 4));
        assert_eq!(store.get(HIGH_SCORE_KEY).as_deref(), Some("4"));

        // Matching the record is not a new record.
        assert!(!stats.accept_result(&store, 4));
        assert!(!stats.accept_result(&store, 2));
        assert_eq!(stats.high_score, 4);

        assert!(stats.accept_result(&store, 9));
        assert_eq!(Stats::load(&store).high_score, 9);
    }

    #[test]
    fn test_garbage_counter_values_read_as_zero() {
        let (_dir, store) = make_test_store();
        store.set(HIGH_SCORE_KEY, "not a number").unwrap();
        assert_eq!(Stats::load(&store).high_score, 0);
    }
}
