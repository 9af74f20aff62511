use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::config::QuizConfig;
use crate::stats::Stats;
use crate::ui::theme::Theme;

/// Rows on the home screen: question count, difficulty, start.
pub const HOME_ROWS: usize = 3;
pub const ROW_QUESTION_COUNT: usize = 0;
pub const ROW_DIFFICULTY: usize = 1;
pub const ROW_START: usize = 2;

pub struct HomeView<'a> {
    pub config: &'a QuizConfig,
    pub stats: &'a Stats,
    pub selected: usize,
    pub has_last_result: bool,
    pub theme: &'a Theme,
}

impl Widget for HomeView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Length(9),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "quizzed",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Ready to test your knowledge?",
                Style::default().fg(colors.fg()),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        if self.stats.high_score > 0 || self.stats.total_quizzes > 0 {
            let accuracy = (self.stats.high_score as f64 / self.config.question_count as f64
                * 100.0)
                .min(100.0);
            let stats_line = Line::from(vec![
                Span::styled("Best Score ", Style::default().fg(colors.text_dim())),
                Span::styled(
                    self.stats.high_score.to_string(),
                    Style::default()
                        .fg(colors.success())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("   Quizzes Taken ", Style::default().fg(colors.text_dim())),
                Span::styled(
                    self.stats.total_quizzes.to_string(),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("   Best Accuracy ", Style::default().fg(colors.text_dim())),
                Span::styled(
                    format!("{accuracy:.0}%"),
                    Style::default()
                        .fg(colors.warning())
                        .add_modifier(Modifier::BOLD),
                ),
            ]);
            Paragraph::new(vec![Line::from(""), stats_line])
                .alignment(Alignment::Center)
                .render(layout[1], buf);
        }

        let rows: [(String, String); 2] = [
            (
                "Number of Questions".to_string(),
                format!("{} Questions", self.config.question_count),
            ),
            (
                "Difficulty Level".to_string(),
                self.config.difficulty.label().to_string(),
            ),
        ];

        let field_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(layout[2]);

        for (i, (label, value)) in rows.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { " > " } else { "   " };

            let label_style = Style::default()
                .fg(if is_selected { colors.accent() } else { colors.fg() })
                .add_modifier(if is_selected {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                });
            let value_style = Style::default().fg(if is_selected {
                colors.fg()
            } else {
                colors.text_dim()
            });

            let lines = vec![
                Line::from(Span::styled(format!("{indicator}{label}:"), label_style)),
                Line::from(Span::styled(format!("     < {value} >"), value_style)),
            ];
            Paragraph::new(lines).render(field_layout[i], buf);
        }

        let start_selected = self.selected == ROW_START;
        let start_indicator = if start_selected { " > " } else { "   " };
        let start_style = Style::default()
            .fg(if start_selected {
                colors.selection_fg()
            } else {
                colors.accent()
            })
            .bg(if start_selected {
                colors.selection_bg()
            } else {
                colors.bg()
            })
            .add_modifier(Modifier::BOLD);
        Paragraph::new(Line::from(Span::styled(
            format!("{start_indicator}[ Start Quiz ]"),
            start_style,
        )))
        .render(field_layout[2], buf);

        let preview = format!(
            "{} questions, {} min estimated, {}",
            self.config.question_count,
            self.config.question_count as f64 * 0.5,
            self.config.difficulty.label()
        );
        Paragraph::new(Line::from(Span::styled(
            preview,
            Style::default().fg(colors.text_dim()),
        )))
        .alignment(Alignment::Center)
        .render(layout[3], buf);

        let mut hints = vec![Span::styled(
            "  [Enter] Start  [Up/Down] Field  [Left/Right] Change",
            Style::default().fg(colors.text_dim()),
        )];
        if self.has_last_result {
            hints.push(Span::styled(
                "  [r] Last results",
                Style::default().fg(colors.text_dim()),
            ));
        }
        hints.push(Span::styled(
            "  [q] Quit",
            Style::default().fg(colors.text_dim()),
        ));
        Paragraph::new(Line::from(hints)).render(layout[4], buf);
    }
}
