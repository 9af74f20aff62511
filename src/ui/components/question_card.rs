use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::quiz::QuizSession;
use crate::ui::markup;
use crate::ui::theme::Theme;

const OPTION_LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

/// The active question: badges, countdown, prompt, and the four options with
/// both the keyboard cursor and the recorded answer marked.
pub struct QuestionCard<'a> {
    pub session: &'a QuizSession,
    pub cursor: usize,
    pub theme: &'a Theme,
}

impl<'a> QuestionCard<'a> {
    pub fn new(session: &'a QuizSession, cursor: usize, theme: &'a Theme) -> Self {
        Self {
            session,
            cursor,
            theme,
        }
    }
}

impl Widget for QuestionCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let Some(question) = self.session.current_question() else {
            return;
        };

        let title = format!(
            " Question {} of {} ",
            self.session.current_index() + 1,
            self.session.questions().len()
        );
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(2),
                Constraint::Length(9),
            ])
            .split(inner);

        let time = self.session.time_remaining();
        let timer_color = if time <= 5 {
            colors.error()
        } else {
            colors.success()
        };
        let badge_line = Line::from(vec![
            Span::styled(
                format!(" {} ", question.difficulty),
                Style::default()
                    .fg(colors.bg())
                    .bg(colors.difficulty(&question.difficulty)),
            ),
            Span::styled(
                format!("  {}", markup::short_category(&question.category)),
                Style::default().fg(colors.text_dim()),
            ),
            Span::styled(
                format!("  Score: {}/{}", self.session.score(), self.session.questions().len()),
                Style::default().fg(colors.fg()),
            ),
            Span::styled(
                format!("  Time Left: {time}s"),
                Style::default().fg(timer_color).add_modifier(Modifier::BOLD),
            ),
        ]);
        Paragraph::new(badge_line).render(layout[0], buf);

        if self.session.used_fallback() {
            Paragraph::new(Line::from(Span::styled(
                " Using built-in questions (trivia API unavailable)",
                Style::default().fg(colors.warning()),
            )))
            .render(layout[1], buf);
        }

        Paragraph::new(Line::from(Span::styled(
            markup::decode_entities(&question.prompt),
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )))
        .wrap(Wrap { trim: false })
        .render(layout[2], buf);

        let recorded = self.session.answer_for(self.session.current_index());
        let option_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(1),
            ])
            .split(layout[3]);

        for (i, option) in question.options.iter().enumerate().take(4) {
            let is_cursor = i == self.cursor;
            let is_recorded = recorded == Some(option.as_str());

            let marker = if is_cursor { ">" } else { " " };
            let letter = OPTION_LETTERS.get(i).copied().unwrap_or('?');
            let text = format!(
                " {marker} ({letter}) {}",
                markup::decode_entities(option)
            );

            let style = if is_recorded {
                Style::default()
                    .fg(colors.selection_fg())
                    .bg(colors.selection_bg())
                    .add_modifier(Modifier::BOLD)
            } else if is_cursor {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };

            Paragraph::new(Line::from(Span::styled(text, style)))
                .render(option_layout[i], buf);
        }
    }
}
