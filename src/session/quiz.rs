use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::session::result::ResultRecord;
use crate::source::Question;

pub const QUESTION_SECONDS: u32 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Active,
    Finished,
}

/// What a progression call did. `Finished` means a ResultRecord is waiting in
/// `take_result`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    None,
    Moved,
    Finished,
}

/// Wall-clock driver for the per-question countdown. Started on activation,
/// reset on every index change, dropped the instant the session finishes so
/// no expiry can reference a stale index.
#[derive(Debug)]
struct Countdown {
    last_tick: Instant,
}

impl Countdown {
    fn new() -> Self {
        Self {
            last_tick: Instant::now(),
        }
    }

    fn reset(&mut self) {
        self.last_tick = Instant::now();
    }

    /// Whole seconds elapsed since the last lap, consuming them.
    fn lap(&mut self) -> u32 {
        let mut ticks = 0;
        while self.last_tick.elapsed() >= Duration::from_secs(1) {
            self.last_tick += Duration::from_secs(1);
            ticks += 1;
        }
        ticks
    }
}

/// One quiz attempt: `Loading → Active → Finished`.
///
/// All state is owned here; every progression path (next button, timer
/// expiry, abandon) funnels through phase-guarded transitions, so a call in
/// the wrong phase is a no-op rather than corruption.
pub struct QuizSession {
    questions: Vec<Question>,
    current_index: usize,
    answers: HashMap<usize, String>,
    time_remaining: u32,
    phase: Phase,
    used_fallback: bool,
    countdown: Option<Countdown>,
    result: Option<ResultRecord>,
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            questions: Vec::new(),
            current_index: 0,
            answers: HashMap::new(),
            time_remaining: QUESTION_SECONDS,
            phase: Phase::Loading,
            used_fallback: false,
            countdown: None,
            result: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn used_fallback(&self) -> bool {
        self.used_fallback
    }

    pub fn answer_for(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn is_answered(&self, index: usize) -> bool {
        self.answers.contains_key(&index)
    }

    /// Count of indices whose recorded answer matches that question's correct
    /// answer. Recomputed on every read, never incremented, so changing an
    /// earlier answer can never drift the total.
    pub fn score(&self) -> u32 {
        self.answers
            .iter()
            .filter(|(idx, answer)| {
                self.questions
                    .get(**idx)
                    .is_some_and(|q| q.correct_answer == **answer)
            })
            .count() as u32
    }

    /// `Loading → Active` on delivery of the fetched (or fallback) questions.
    /// An empty set finishes the session on the spot with zero score.
    pub fn activate(&mut self, questions: Vec<Question>, used_fallback: bool) -> Transition {
        if self.phase != Phase::Loading {
            return Transition::None;
        }
        self.questions = questions;
        self.used_fallback = used_fallback;
        if self.questions.is_empty() {
            return self.finish();
        }
        self.phase = Phase::Active;
        self.time_remaining = QUESTION_SECONDS;
        self.countdown = Some(Countdown::new());
        Transition::Moved
    }

    /// Record `choice` for the current question, overwriting any earlier
    /// choice for this index.
    pub fn select_answer(&mut self, choice: &str) {
        if self.phase != Phase::Active || self.current_index >= self.questions.len() {
            return;
        }
        self.answers.insert(self.current_index, choice.to_string());
    }

    /// Move to the next question, or finish on the last one. Ungated here:
    /// the interactive path checks `is_answered` before calling, the timer
    /// path deliberately does not.
    pub fn advance(&mut self) -> Transition {
        if self.phase != Phase::Active {
            return Transition::None;
        }
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            self.reset_countdown();
            Transition::Moved
        } else {
            self.finish()
        }
    }

    /// Revisit the previous question. The answer for the index being left is
    /// kept; the revisited question gets a fresh 30-second window.
    pub fn retreat(&mut self) -> Transition {
        if self.phase != Phase::Active || self.current_index == 0 {
            return Transition::None;
        }
        self.current_index -= 1;
        self.reset_countdown();
        Transition::Moved
    }

    /// Early termination. Scores whatever has been answered so far.
    pub fn abandon(&mut self) -> Transition {
        if self.phase != Phase::Active {
            return Transition::None;
        }
        self.finish()
    }

    /// One second of countdown. At zero the question is force-advanced with
    /// whatever answer state it has, possibly none.
    pub fn tick_second(&mut self) -> Transition {
        if self.phase != Phase::Active {
            return Transition::None;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.advance()
        } else {
            Transition::None
        }
    }

    /// Drain wall-clock time into countdown ticks. Seconds accumulated past
    /// a forced advance are discarded so the new question starts clean.
    pub fn poll_countdown(&mut self) -> Transition {
        let steps = self.countdown.as_mut().map(Countdown::lap).unwrap_or(0);
        for _ in 0..steps {
            let transition = self.tick_second();
            if transition != Transition::None {
                return transition;
            }
        }
        Transition::None
    }

    /// The record emitted by the transition to `Finished`. Yields once.
    pub fn take_result(&mut self) -> Option<ResultRecord> {
        self.result.take()
    }

    fn reset_countdown(&mut self) {
        self.time_remaining = QUESTION_SECONDS;
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.reset();
        }
    }

    fn finish(&mut self) -> Transition {
        let completed_questions = if self.questions.is_empty() {
            0
        } else {
            self.current_index + 1
        };
        self.result = Some(ResultRecord {
            questions: self.questions.clone(),
            answers: self.answers.clone(),
            final_score: self.score(),
            total_questions: self.questions.len(),
            completed_questions,
            used_fallback: self.used_fallback,
            completed_at: Utc::now(),
        });
        self.phase = Phase::Finished;
        self.countdown = None;
        Transition::Finished
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}
