use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::result::ResultRecord;
use crate::ui::theme::Theme;

/// Results header: final score, percentage, and the performance columns.
pub struct ResultsSummary<'a> {
    pub result: &'a ResultRecord,
    pub new_high_score: bool,
    pub theme: &'a Theme,
}

impl<'a> ResultsSummary<'a> {
    pub fn new(result: &'a ResultRecord, new_high_score: bool, theme: &'a Theme) -> Self {
        Self {
            result,
            new_high_score,
            theme,
        }
    }
}

impl Widget for ResultsSummary<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Quiz Complete! ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(1),
            ])
            .split(inner);

        let score_line = Line::from(vec![
            Span::styled(
                self.result.final_score.to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" out of ", Style::default().fg(colors.text_dim())),
            Span::styled(
                self.result.total_questions.to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("   {}% Correct", self.result.percentage()),
                Style::default().fg(colors.fg()),
            ),
        ]);
        Paragraph::new(vec![Line::from(""), score_line])
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        if self.new_high_score {
            Paragraph::new(Line::from(Span::styled(
                "New High Score!",
                Style::default()
                    .fg(colors.warning())
                    .add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .render(layout[1], buf);
        }

        if self.result.used_fallback {
            Paragraph::new(Line::from(Span::styled(
                "Played with the built-in question set",
                Style::default().fg(colors.text_dim()),
            )))
            .alignment(Alignment::Center)
            .render(layout[2], buf);
        }

        let answered = self.result.completed_questions;
        let columns = Line::from(vec![
            Span::styled(
                format!("Correct {}", self.result.final_score),
                Style::default().fg(colors.success()),
            ),
            Span::styled("   ", Style::default()),
            Span::styled(
                format!("Incorrect {}", self.result.incorrect_count()),
                Style::default().fg(colors.error()),
            ),
            Span::styled("   ", Style::default()),
            Span::styled(
                format!("Answered {answered}/{}", self.result.total_questions),
                Style::default().fg(colors.fg()),
            ),
            Span::styled("   ", Style::default()),
            Span::styled(
                format!("Accuracy {}%", self.result.percentage()),
                Style::default().fg(colors.accent()),
            ),
        ]);
        Paragraph::new(columns)
            .alignment(Alignment::Center)
            .render(layout[3], buf);
    }
}
