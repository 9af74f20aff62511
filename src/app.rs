use std::io::Write;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use base64::Engine;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::{AppConfig, QuizConfig};
use crate::event::AppEvent;
use crate::session::quiz::{Phase, QuizSession, Transition};
use crate::session::result::ResultRecord;
use crate::source::{self, SourceOutcome};
use crate::stats::Stats;
use crate::store::{self, json_store::JsonStore};
use crate::ui::components::home::{ROW_DIFFICULTY, ROW_QUESTION_COUNT};
use crate::ui::theme::Theme;

const FLASH_SECONDS: u64 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Home,
    Quiz,
    Results,
}

pub struct App {
    pub screen: AppScreen,
    pub config: AppConfig,
    pub quiz_config: QuizConfig,
    pub theme: &'static Theme,
    pub store: Option<JsonStore>,
    pub stats: Stats,
    pub session: Option<QuizSession>,
    pub last_result: Option<ResultRecord>,
    pub new_high_score: bool,
    pub home_selected: usize,
    pub option_cursor: usize,
    pub review_scroll: usize,
    pub abandon_confirm: bool,
    pub flash: Option<(String, Instant)>,
    pub should_quit: bool,
    events_tx: mpsc::Sender<AppEvent>,
    fetch_generation: u64,
}

impl App {
    pub fn new(events_tx: mpsc::Sender<AppEvent>) -> Self {
        let config = AppConfig::load().unwrap_or_default();
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));

        let store = JsonStore::new().ok();
        let (stats, quiz_config, last_result) = if let Some(ref s) = store {
            (
                Stats::load(s),
                store::load_settings(s).unwrap_or_default(),
                store::load_result(s),
            )
        } else {
            (Stats::default(), QuizConfig::default(), None)
        };

        Self {
            screen: AppScreen::Home,
            config,
            quiz_config,
            theme,
            store,
            stats,
            session: None,
            last_result,
            new_high_score: false,
            home_selected: 0,
            option_cursor: 0,
            review_scroll: 0,
            abandon_confirm: false,
            flash: None,
            should_quit: false,
            events_tx,
            fetch_generation: 0,
        }
    }

    pub fn set_theme(&mut self, name: &str) {
        if let Some(theme) = Theme::load(name) {
            let theme: &'static Theme = Box::leak(Box::new(theme));
            self.theme = theme;
        }
    }

    /// Persist the chosen settings, count the attempt, and kick off the
    /// question fetch. The session sits in `Loading` until the fetch thread
    /// reports back through the event channel.
    pub fn start_quiz(&mut self) {
        if let Some(ref store) = self.store {
            let _ = store::save_settings(store, &self.quiz_config);
            self.stats.record_session_start(store);
        } else {
            self.stats.total_quizzes += 1;
        }

        self.session = Some(QuizSession::new());
        self.screen = AppScreen::Quiz;
        self.option_cursor = 0;
        self.abandon_confirm = false;
        self.new_high_score = false;

        self.fetch_generation += 1;
        let generation = self.fetch_generation;
        let config = self.quiz_config;
        let timeout = Duration::from_secs(self.config.request_timeout_secs);
        let tx = self.events_tx.clone();
        thread::spawn(move || {
            let mut rng = SmallRng::from_entropy();
            let outcome = source::load(&config, timeout, &mut rng);
            let _ = tx.send(AppEvent::QuestionsReady(generation, outcome));
        });
    }

    /// Fetch resolved. Ignored unless the current session is still waiting
    /// for this exact fetch; navigating away simply abandons it.
    pub fn on_questions_ready(&mut self, generation: u64, outcome: SourceOutcome) {
        if generation != self.fetch_generation {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.phase() != Phase::Loading {
            return;
        }
        let used_fallback = outcome.used_fallback();
        let transition = session.activate(outcome.questions, used_fallback);
        self.handle_transition(transition);
    }

    pub fn on_tick(&mut self) {
        let flash_expired = self
            .flash
            .as_ref()
            .is_some_and(|(_, since)| since.elapsed() >= Duration::from_secs(FLASH_SECONDS));
        if flash_expired {
            self.flash = None;
        }
        if let Some(session) = self.session.as_mut() {
            let transition = session.poll_countdown();
            if transition == Transition::Moved {
                self.option_cursor = 0;
            }
            self.handle_transition(transition);
        }
    }

    pub fn move_option_cursor_up(&mut self) {
        let len = self.current_option_count();
        if len == 0 {
            return;
        }
        self.option_cursor = if self.option_cursor == 0 {
            len - 1
        } else {
            self.option_cursor - 1
        };
    }

    pub fn move_option_cursor_down(&mut self) {
        let len = self.current_option_count();
        if len == 0 {
            return;
        }
        self.option_cursor = (self.option_cursor + 1) % len;
    }

    /// Record the option under the cursor as the answer for the current
    /// question.
    pub fn choose_cursor_option(&mut self) {
        self.choose_option(self.option_cursor);
    }

    pub fn choose_option(&mut self, index: usize) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(choice) = session
            .current_question()
            .and_then(|q| q.options.get(index))
            .cloned()
        else {
            return;
        };
        self.option_cursor = index;
        session.select_answer(&choice);
    }

    /// Interactive advance, gated on the current question having an answer.
    /// Timer expiry bypasses this gate inside the session.
    pub fn next_question(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.is_answered(session.current_index()) {
            return;
        }
        let transition = session.advance();
        if transition == Transition::Moved {
            self.option_cursor = 0;
        }
        self.handle_transition(transition);
    }

    pub fn previous_question(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.retreat() == Transition::Moved {
            self.option_cursor = 0;
        }
    }

    pub fn request_abandon(&mut self) {
        if self
            .session
            .as_ref()
            .is_some_and(|s| s.phase() == Phase::Active)
        {
            self.abandon_confirm = true;
        }
    }

    pub fn cancel_abandon(&mut self) {
        self.abandon_confirm = false;
    }

    pub fn confirm_abandon(&mut self) {
        self.abandon_confirm = false;
        let transition = self
            .session
            .as_mut()
            .map(|s| s.abandon())
            .unwrap_or(Transition::None);
        self.handle_transition(transition);
    }

    fn handle_transition(&mut self, transition: Transition) {
        if transition == Transition::Finished {
            self.finalize_session();
        }
    }

    /// The session emitted its ResultRecord: persist it, settle the high
    /// score, and move to the results screen.
    fn finalize_session(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        let Some(record) = session.take_result() else {
            return;
        };

        self.new_high_score = if let Some(ref store) = self.store {
            let _ = store::save_result(store, &record);
            self.stats.accept_result(store, record.final_score)
        } else if record.final_score > self.stats.high_score {
            self.stats.high_score = record.final_score;
            true
        } else {
            false
        };

        self.last_result = Some(record);
        self.review_scroll = 0;
        self.abandon_confirm = false;
        self.screen = AppScreen::Results;
    }

    /// Results screen entry point, also reachable by direct link (`--results`
    /// or `r` on the home screen). With no record anywhere, stay Home.
    pub fn open_results(&mut self) {
        if self.last_result.is_none() {
            self.last_result = self.store.as_ref().and_then(|s| store::load_result(s));
        }
        if self.last_result.is_some() {
            self.review_scroll = 0;
            self.screen = AppScreen::Results;
        } else {
            self.screen = AppScreen::Home;
        }
    }

    /// "Take Quiz Again": the stored record is cleared and the user starts
    /// over from the settings screen.
    pub fn take_again(&mut self) {
        if let Some(ref store) = self.store {
            let _ = store::clear_result(store);
        }
        self.last_result = None;
        self.new_high_score = false;
        self.go_home();
    }

    pub fn go_home(&mut self) {
        // Dropping the session kills its countdown with it.
        self.session = None;
        self.abandon_confirm = false;
        self.home_selected = 0;
        self.screen = AppScreen::Home;
    }

    pub fn share_results(&mut self) {
        let Some(ref record) = self.last_result else {
            return;
        };
        osc52_copy(&record.summary_line());
        self.flash = Some(("Results copied to clipboard".to_string(), Instant::now()));
    }

    pub fn scroll_review_down(&mut self) {
        let total = self
            .last_result
            .as_ref()
            .map(|r| r.questions.len())
            .unwrap_or(0);
        if total > 0 {
            self.review_scroll = (self.review_scroll + 1).min(total - 1);
        }
    }

    pub fn scroll_review_up(&mut self) {
        self.review_scroll = self.review_scroll.saturating_sub(1);
    }

    pub fn cycle_home_field_forward(&mut self) {
        match self.home_selected {
            ROW_QUESTION_COUNT => self.quiz_config.cycle_count_forward(),
            ROW_DIFFICULTY => self.quiz_config.difficulty = self.quiz_config.difficulty.next(),
            _ => {}
        }
    }

    pub fn cycle_home_field_backward(&mut self) {
        match self.home_selected {
            ROW_QUESTION_COUNT => self.quiz_config.cycle_count_backward(),
            ROW_DIFFICULTY => self.quiz_config.difficulty = self.quiz_config.difficulty.prev(),
            _ => {}
        }
    }

    fn current_option_count(&self) -> usize {
        self.session
            .as_ref()
            .and_then(|s| s.current_question())
            .map(|q| q.options.len())
            .unwrap_or(0)
    }
}

/// Copy text to the system clipboard via OSC 52 escape sequence. Works in
/// most modern terminals; elsewhere it is a silent no-op.
fn osc52_copy(text: &str) {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    let _ = std::io::stdout().write_all(format!("\x1b]52;c;{encoded}\x07").as_bytes());
    let _ = std::io::stdout().flush();
}
