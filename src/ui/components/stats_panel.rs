use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use flashdeck::deck::{Card, Difficulty};
use flashdeck::engine::Stats;

use crate::ui::theme::Theme;

/// Study statistics, as a sidebar or (with `detailed`) as the stats modal.
pub struct StatsPanel<'a> {
    stats: &'a Stats,
    cards: &'a [Card],
    detailed: bool,
    theme: &'a Theme,
}

impl<'a> StatsPanel<'a> {
    pub fn new(stats: &'a Stats, cards: &'a [Card], theme: &'a Theme) -> Self {
        Self {
            stats,
            cards,
            detailed: false,
            theme,
        }
    }

    pub fn detailed(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }
}

fn row<'a>(label: &'a str, value: String, label_style: Style, value_style: Style) -> Line<'a> {
    Line::from(vec![
        Span::styled(label, label_style),
        Span::styled(value, value_style),
    ])
}

impl Widget for StatsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let label = Style::default().fg(colors.fg());
        let accent = Style::default().fg(colors.accent());

        let accuracy_color = if self.stats.accuracy >= 80 {
            colors.success()
        } else if self.stats.accuracy >= 50 {
            colors.warning()
        } else {
            colors.error()
        };

        let mut lines = vec![
            row("Words:    ", self.stats.total_words.to_string(), label, accent),
            row("Today:    ", self.stats.studied_today.to_string(), label, accent),
            row(
                "Streak:   ",
                format!("{} days", self.stats.streak),
                label,
                Style::default().fg(colors.warning()),
            ),
            row(
                "Accuracy: ",
                format!("{}%", self.stats.accuracy),
                label,
                Style::default().fg(accuracy_color),
            ),
        ];

        if self.detailed {
            lines.push(Line::from(""));
            lines.push(row(
                "Best streak: ",
                format!("{} days", self.stats.best_streak),
                label,
                accent,
            ));
            lines.push(row(
                "Answers:     ",
                format!(
                    "{} ({} correct)",
                    self.stats.total_answers, self.stats.correct_answers
                ),
                label,
                accent,
            ));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "By difficulty",
                Style::default()
                    .fg(colors.muted())
                    .add_modifier(Modifier::BOLD),
            )));
            for difficulty in Difficulty::ALL {
                let count = self
                    .cards
                    .iter()
                    .filter(|c| c.difficulty == difficulty)
                    .count();
                lines.push(Line::from(vec![
                    Span::styled(format!("  {difficulty:<8}"), label),
                    Span::styled(
                        count.to_string(),
                        Style::default().fg(colors.difficulty(difficulty)),
                    ),
                ]));
            }
            let never = self.cards.iter().filter(|c| c.times_studied == 0).count();
            lines.push(row(
                "  unseen  ",
                never.to_string(),
                label,
                Style::default().fg(colors.muted()),
            ));
        }

        let title = if self.detailed { " Statistics " } else { " Stats " };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(if self.detailed {
                colors.border_focused()
            } else {
                colors.border()
            }))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
