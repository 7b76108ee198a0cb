use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use flashdeck::engine::FilterCriteria;

use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

/// Search box plus the active category and difficulty filters.
pub struct FilterBar<'a> {
    criteria: &'a FilterCriteria,
    /// Present while the search box has focus.
    editing: Option<&'a LineInput>,
    matches: usize,
    theme: &'a Theme,
}

impl<'a> FilterBar<'a> {
    pub fn new(criteria: &'a FilterCriteria, matches: usize, theme: &'a Theme) -> Self {
        Self {
            criteria,
            editing: None,
            matches,
            theme,
        }
    }

    pub fn editing(mut self, input: Option<&'a LineInput>) -> Self {
        self.editing = input;
        self
    }
}

impl Widget for FilterBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let label = Style::default().fg(colors.muted());
        let value = Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD);

        let mut spans = vec![Span::styled(" Search: ", label)];
        match self.editing {
            Some(input) => {
                let (before, cursor, after) = input.render_parts();
                spans.push(Span::styled(before, Style::default().fg(colors.fg())));
                spans.push(Span::styled(
                    cursor.map(String::from).unwrap_or_else(|| " ".to_string()),
                    Style::default().fg(colors.bg()).bg(colors.fg()),
                ));
                spans.push(Span::styled(after, Style::default().fg(colors.fg())));
            }
            None if self.criteria.search_text.is_empty() => {
                spans.push(Span::styled("[/]", Style::default().fg(colors.accent_dim())));
            }
            None => spans.push(Span::styled(self.criteria.search_text.as_str(), value)),
        }

        spans.push(Span::styled("   Category: ", label));
        spans.push(Span::styled(
            self.criteria.category.as_deref().unwrap_or("all"),
            value,
        ));

        spans.push(Span::styled("   Difficulty: ", label));
        match self.criteria.difficulty {
            Some(d) => spans.push(Span::styled(
                d.as_str(),
                Style::default()
                    .fg(colors.difficulty(d))
                    .add_modifier(Modifier::BOLD),
            )),
            None => spans.push(Span::styled("all", value)),
        }

        spans.push(Span::styled(
            format!("   {} shown", self.matches),
            Style::default().fg(colors.accent()),
        ));

        let border = if self.editing.is_some() {
            colors.border_focused()
        } else {
            colors.border()
        };
        Paragraph::new(Line::from(spans))
            .block(
                Block::bordered()
                    .title(" Filter ")
                    .border_style(Style::default().fg(border)),
            )
            .render(area, buf);
    }
}
