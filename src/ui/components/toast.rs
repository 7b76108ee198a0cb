use std::time::{Duration, Instant};

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use flashdeck::sink::{Notice, Severity};

use crate::ui::theme::Theme;

const TOAST_LIFETIME: Duration = Duration::from_secs(3);
const MAX_TOASTS: usize = 3;

/// Recent notices, newest last, each shown for a few seconds.
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Vec<(Notice, Instant)>,
}

impl ToastQueue {
    pub fn push(&mut self, notice: Notice, now: Instant) {
        self.toasts.push((notice, now + TOAST_LIFETIME));
        if self.toasts.len() > MAX_TOASTS {
            self.toasts.remove(0);
        }
    }

    pub fn expire(&mut self, now: Instant) {
        self.toasts.retain(|(_, until)| *until > now);
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.toasts.iter().map(|(notice, _)| notice)
    }
}

pub struct ToastStack<'a> {
    queue: &'a ToastQueue,
    theme: &'a Theme,
}

impl<'a> ToastStack<'a> {
    pub fn new(queue: &'a ToastQueue, theme: &'a Theme) -> Self {
        Self { queue, theme }
    }
}

fn icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "\u{2713}",
        Severity::Error => "\u{2717}",
        Severity::Warning => "!",
        Severity::Info => "i",
    }
}

impl Widget for ToastStack<'_> {
    /// Draws in the top-right corner of `area`.
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let width = area.width.min(44);
        let mut y = area.y;

        for notice in self.queue.notices() {
            if y + 3 > area.y + area.height {
                break;
            }
            let rect = Rect::new(area.x + area.width - width, y, width, 3);
            let color = colors.severity(notice.severity);
            Clear.render(rect, buf);
            Paragraph::new(Line::from(vec![
                Span::styled(
                    format!("{} ", icon(notice.severity)),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(notice.message.as_str(), Style::default().fg(colors.fg())),
            ]))
            .wrap(Wrap { trim: true })
            .block(
                Block::bordered()
                    .border_style(Style::default().fg(color))
                    .style(Style::default().bg(colors.header_bg())),
            )
            .render(rect, buf);
            y += 3;
        }
    }
}
