mod app;
mod config;
mod event;
mod session;
mod source;
mod stats;
mod store;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};

use app::{App, AppScreen};
use config::Difficulty;
use event::{AppEvent, EventHandler};
use session::quiz::Phase;
use ui::components::home::{HOME_ROWS, HomeView, ROW_START};
use ui::components::progress_bar::ProgressBar;
use ui::components::question_card::QuestionCard;
use ui::components::review_list::ReviewList;
use ui::components::summary::ResultsSummary;
use ui::layout::{AppLayout, centered_rect};

#[derive(Parser)]
#[command(name = "quizzed", version, about = "Terminal trivia quiz with timed questions")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Number of questions (5, 10, 15 or 20)")]
    questions: Option<u32>,

    #[arg(short, long, help = "Difficulty (any, easy, medium, hard)")]
    difficulty: Option<String>,

    #[arg(long, help = "Open the last results instead of the home screen")]
    results: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let events = EventHandler::new(Duration::from_millis(100));
    let mut app = App::new(events.sender());

    if let Some(theme_name) = cli.theme {
        app.set_theme(&theme_name);
    }
    if let Some(questions) = cli.questions {
        app.quiz_config.question_count = questions;
        app.quiz_config.normalize();
    }
    if let Some(name) = cli.difficulty {
        if let Some(difficulty) = Difficulty::from_name(&name) {
            app.quiz_config.difficulty = difficulty;
        }
    }
    if cli.results {
        app.open_results();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.on_tick(),
            AppEvent::QuestionsReady(generation, outcome) => {
                app.on_questions_ready(generation, outcome)
            }
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Home => handle_home_key(app, key),
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::Results => handle_results_key(app, key),
    }
}

fn handle_home_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => {
            if app.home_selected > 0 {
                app.home_selected -= 1;
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.home_selected < HOME_ROWS - 1 {
                app.home_selected += 1;
            }
        }
        KeyCode::Left | KeyCode::Char('h') => app.cycle_home_field_backward(),
        KeyCode::Right | KeyCode::Char('l') => app.cycle_home_field_forward(),
        KeyCode::Enter => {
            if app.home_selected == ROW_START {
                app.start_quiz();
            } else {
                app.cycle_home_field_forward();
            }
        }
        KeyCode::Char('s') => app.start_quiz(),
        KeyCode::Char('r') => app.open_results(),
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    // Confirmation dialog takes priority; the countdown keeps running under it
    if app.abandon_confirm {
        match key.code {
            KeyCode::Char('y') => app.confirm_abandon(),
            KeyCode::Char('n') | KeyCode::Esc => app.cancel_abandon(),
            _ => {}
        }
        return;
    }

    let loading = app
        .session
        .as_ref()
        .is_some_and(|s| s.phase() == Phase::Loading);
    if loading {
        // The machine accepts nothing while the fetch is in flight; leaving
        // the screen just abandons it.
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
            app.go_home();
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.request_abandon(),
        KeyCode::Up | KeyCode::Char('k') => app.move_option_cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_option_cursor_down(),
        KeyCode::Enter | KeyCode::Char(' ') => app.choose_cursor_option(),
        KeyCode::Char(ch @ '1'..='4') => {
            app.choose_option(ch as usize - '1' as usize);
        }
        KeyCode::Right | KeyCode::Char('n') => app.next_question(),
        KeyCode::Left | KeyCode::Char('p') => app.previous_question(),
        _ => {}
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.go_home(),
        KeyCode::Char('r') => app.take_again(),
        KeyCode::Char('s') => app.share_results(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_review_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_review_up(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Home => render_home(frame, app),
        AppScreen::Quiz => render_quiz(frame, app),
        AppScreen::Results => render_results(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, info: &str) {
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " quizzed ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info.to_string(),
            Style::default()
                .fg(colors.text_dim())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, hints: &str) {
    let colors = &app.theme.colors;
    let line = if let Some((ref message, _)) = app.flash {
        Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(colors.success()),
        ))
    } else {
        Line::from(Span::styled(
            hints.to_string(),
            Style::default().fg(colors.text_dim()),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_home(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());

    let info = format!(
        " High Score {} | Quizzes {}",
        app.stats.high_score, app.stats.total_quizzes
    );
    render_header(frame, app, layout.header, &info);

    let card_area = centered_rect(60, 90, layout.main);
    let home = HomeView {
        config: &app.quiz_config,
        stats: &app.stats,
        selected: app.home_selected,
        has_last_result: app.last_result.is_some(),
        theme: app.theme,
    };
    frame.render_widget(home, card_area);

    render_footer(frame, app, layout.footer, "");
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let layout = AppLayout::new(frame.area());

    let info = format!(
        " {} questions | {}",
        app.quiz_config.question_count,
        app.quiz_config.difficulty.label()
    );
    render_header(frame, app, layout.header, &info);

    let Some(ref session) = app.session else {
        return;
    };

    match session.phase() {
        Phase::Loading => {
            let loading = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Loading questions...",
                    Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "fetching from the Open Trivia Database",
                    Style::default().fg(colors.text_dim()),
                )),
            ])
            .alignment(Alignment::Center);
            frame.render_widget(loading, centered_rect(50, 30, layout.main));
            render_footer(frame, app, layout.footer, " [Esc] Back");
        }
        Phase::Active => {
            let main_layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(10)])
                .split(layout.main);

            let total = session.questions().len();
            let progress = ProgressBar::new(session.current_index() + 1, total, app.theme);
            frame.render_widget(progress, main_layout[0]);

            let card = QuestionCard::new(session, app.option_cursor, app.theme);
            frame.render_widget(card, main_layout[1]);

            let answered = session.is_answered(session.current_index());
            let hints = if answered {
                " [Right/n] Next  [Left/p] Previous  [1-4/Enter] Change answer  [Esc] Abandon"
            } else {
                " [Up/Down] Highlight  [1-4/Enter] Answer  [Left/p] Previous  [Esc] Abandon"
            };
            render_footer(frame, app, layout.footer, hints);

            if app.abandon_confirm {
                render_abandon_modal(frame, app, session.score(), total);
            }
        }
        Phase::Finished => {}
    }
}

fn render_abandon_modal(frame: &mut ratatui::Frame, app: &App, score: u32, total: usize) {
    let colors = &app.theme.colors;
    let area = centered_rect(40, 25, frame.area());

    frame.render_widget(Clear, area);
    let block = Block::bordered()
        .title(" Abandon Quiz? ")
        .border_style(Style::default().fg(colors.warning()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Your current score of {score}/{total} will be final."),
            Style::default().fg(colors.fg()),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y] Yes, quit    ", Style::default().fg(colors.error())),
            Span::styled("[n] Keep playing", Style::default().fg(colors.success())),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        inner,
    );
}

fn render_results(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());

    render_header(frame, app, layout.header, " Results");

    let Some(ref record) = app.last_result else {
        return;
    };

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(8)])
        .split(layout.main);

    let summary = ResultsSummary::new(record, app.new_high_score, app.theme);
    frame.render_widget(summary, main_layout[0]);

    let review = ReviewList::new(record, app.review_scroll, app.theme);
    frame.render_widget(review, main_layout[1]);

    render_footer(
        frame,
        app,
        layout.footer,
        " [r] Take Quiz Again  [s] Share  [j/k] Scroll  [q] Home",
    );
}
