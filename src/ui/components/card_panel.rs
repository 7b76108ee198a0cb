use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use flashdeck::deck::Card;
use flashdeck::session::CardView;

use crate::ui::theme::Theme;

/// The flashcard itself: word on the front, meanings on the back.
pub struct CardPanel<'a> {
    view: CardView<'a>,
    theme: &'a Theme,
}

impl<'a> CardPanel<'a> {
    pub fn new(view: CardView<'a>, theme: &'a Theme) -> Self {
        Self { view, theme }
    }

    fn front_lines(&self, card: &'a Card) -> Vec<Line<'a>> {
        let colors = &self.theme.colors;
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                card.word.as_str(),
                Style::default()
                    .fg(colors.card_front())
                    .add_modifier(Modifier::BOLD),
            )),
        ];
        if let Some(pronunciation) = &card.pronunciation {
            lines.push(Line::from(Span::styled(
                pronunciation.as_str(),
                Style::default().fg(colors.muted()),
            )));
        }
        if let Some(word_type) = &card.word_type {
            lines.push(Line::from(Span::styled(
                format!("({word_type})"),
                Style::default()
                    .fg(colors.muted())
                    .add_modifier(Modifier::ITALIC),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Space to reveal",
            Style::default().fg(colors.accent_dim()),
        )));
        lines
    }

    fn back_lines(&self, card: &'a Card) -> Vec<Line<'a>> {
        let colors = &self.theme.colors;
        let mut lines = vec![
            Line::from(Span::styled(
                card.word.as_str(),
                Style::default().fg(colors.muted()),
            )),
            Line::from(""),
            Line::from(Span::styled(
                card.definition.as_str(),
                Style::default()
                    .fg(colors.card_back())
                    .add_modifier(Modifier::BOLD),
            )),
        ];
        if let Some(secondary) = &card.secondary_definition {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                secondary.as_str(),
                Style::default().fg(colors.fg()),
            )));
        }
        if let Some(example) = &card.example {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("\u{201c}{example}\u{201d}"),
                Style::default()
                    .fg(colors.muted())
                    .add_modifier(Modifier::ITALIC),
            )));
        }
        if self.view.feedback_available {
            lines.push(Line::from(""));
            lines.push(self.feedback_line());
        }
        lines
    }

    fn feedback_line(&self) -> Line<'a> {
        let colors = &self.theme.colors;
        if self.view.advance_pending {
            return Line::from(Span::styled(
                "Recorded. Next card\u{2026}",
                Style::default().fg(colors.muted()),
            ));
        }
        Line::from(vec![
            Span::styled("[1] Easy", Style::default().fg(colors.success())),
            Span::raw("   "),
            Span::styled("[2] Medium", Style::default().fg(colors.warning())),
            Span::raw("   "),
            Span::styled("[3] Hard", Style::default().fg(colors.error())),
        ])
    }
}

impl Widget for CardPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let Some(card) = self.view.card else {
            let block = Block::bordered()
                .border_style(Style::default().fg(colors.border()))
                .style(Style::default().bg(colors.bg()));
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No flashcards to show",
                    Style::default().fg(colors.fg()),
                )),
                Line::from(Span::styled(
                    "Clear the filters or press Ctrl+N to add one",
                    Style::default().fg(colors.muted()),
                )),
            ])
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
            return;
        };

        let face = if self.view.flipped { "Answer" } else { "Word" };
        let mut title = vec![Span::styled(
            format!(" {face} "),
            Style::default().fg(colors.accent()),
        )];
        title.push(Span::styled(
            format!(" {} ", card.category),
            Style::default().fg(colors.bg()).bg(colors.accent_dim()),
        ));
        title.push(Span::raw(" "));
        title.push(Span::styled(
            format!(" {} ", card.difficulty),
            Style::default()
                .fg(colors.bg())
                .bg(colors.difficulty(card.difficulty)),
        ));

        let border = if self.view.flipped {
            colors.border_focused()
        } else {
            colors.border()
        };
        let block = Block::bordered()
            .title(Line::from(title))
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));

        let lines = if self.view.flipped {
            self.back_lines(card)
        } else {
            self.front_lines(card)
        };

        // Vertically center the text inside the card.
        let inner_height = block.inner(area).height as usize;
        let pad = inner_height.saturating_sub(lines.len()) / 2;
        let mut padded = vec![Line::from(""); pad];
        padded.extend(lines);

        Paragraph::new(padded)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}
