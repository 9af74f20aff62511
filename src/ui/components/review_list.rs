use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::result::ResultRecord;
use crate::ui::markup;
use crate::ui::theme::Theme;

const LINES_PER_ENTRY: usize = 4;

/// Scrollable per-question answer review.
pub struct ReviewList<'a> {
    pub result: &'a ResultRecord,
    pub scroll: usize,
    pub theme: &'a Theme,
}

impl<'a> ReviewList<'a> {
    pub fn new(result: &'a ResultRecord, scroll: usize, theme: &'a Theme) -> Self {
        Self {
            result,
            scroll,
            theme,
        }
    }

    /// Entries that fit in `height` rows, for clamping the scroll offset.
    pub fn visible_entries(height: u16) -> usize {
        (height.saturating_sub(2) as usize / LINES_PER_ENTRY).max(1)
    }
}

impl Widget for ReviewList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let total = self.result.questions.len();

        let visible = Self::visible_entries(area.height);
        let first = self.scroll.min(total.saturating_sub(1));
        let last = (first + visible).min(total);

        let title = if total > visible {
            format!(" Answer Review ({}-{} of {total}) ", first + 1, last)
        } else {
            " Answer Review ".to_string()
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();
        for (idx, question) in self
            .result
            .questions
            .iter()
            .enumerate()
            .skip(first)
            .take(last - first)
        {
            let correct = self.result.is_correct(idx);
            let mark = if correct { "[+]" } else { "[x]" };
            let mark_color = if correct { colors.success() } else { colors.error() };

            lines.push(Line::from(vec![
                Span::styled(
                    format!(" {mark} "),
                    Style::default().fg(mark_color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{}. ", idx + 1),
                    Style::default().fg(colors.text_dim()),
                ),
                Span::styled(
                    markup::decode_entities(&question.prompt),
                    Style::default().fg(colors.fg()),
                ),
            ]));
            lines.push(Line::from(vec![
                Span::styled("     ", Style::default()),
                Span::styled(
                    markup::short_category(&question.category).to_string(),
                    Style::default().fg(colors.text_dim()),
                ),
                Span::styled(
                    format!("  {}", question.difficulty),
                    Style::default().fg(colors.difficulty(&question.difficulty)),
                ),
            ]));

            let your_answer = self
                .result
                .answer_for(idx)
                .map(markup::decode_entities)
                .unwrap_or_else(|| "No answer".to_string());
            let mut answer_spans = vec![
                Span::styled("     Your answer: ", Style::default().fg(colors.text_dim())),
                Span::styled(
                    your_answer,
                    Style::default().fg(if correct {
                        colors.success()
                    } else {
                        colors.error()
                    }),
                ),
            ];
            if !correct {
                answer_spans.push(Span::styled(
                    "   Correct: ",
                    Style::default().fg(colors.text_dim()),
                ));
                answer_spans.push(Span::styled(
                    markup::decode_entities(&question.correct_answer),
                    Style::default().fg(colors.success()),
                ));
            }
            lines.push(Line::from(answer_spans));
            lines.push(Line::from(""));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
