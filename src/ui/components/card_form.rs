use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use flashdeck::deck::CardDraft;

use crate::ui::line_input::{InputResult, LineInput};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Word,
    Pronunciation,
    Definition,
    SecondaryDefinition,
    Example,
    Category,
    WordType,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Word,
        FormField::Pronunciation,
        FormField::Definition,
        FormField::SecondaryDefinition,
        FormField::Example,
        FormField::Category,
        FormField::WordType,
    ];

    fn label(self) -> &'static str {
        match self {
            FormField::Word => "Word *",
            FormField::Pronunciation => "Pronunciation",
            FormField::Definition => "Definition *",
            FormField::SecondaryDefinition => "Second language",
            FormField::Example => "Example",
            FormField::Category => "Category",
            FormField::WordType => "Word type",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            FormField::Word => "serendipity",
            FormField::Pronunciation => "/ˌser.ənˈdɪp.ə.ti/",
            FormField::Definition => "a happy accident",
            FormField::SecondaryDefinition => "",
            FormField::Example => "",
            FormField::Category => "general",
            FormField::WordType => "noun",
        }
    }

    /// Maps a validation error's field name back to the form.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "word" => Some(FormField::Word),
            "definition" => Some(FormField::Definition),
            _ => None,
        }
    }
}

pub enum FormEvent {
    Editing,
    Submit(CardDraft),
    Cancel,
}

/// State of the add-card modal.
#[derive(Debug, Default)]
pub struct CardForm {
    inputs: [LineInput; 7],
    focused: usize,
    pub error: Option<String>,
}

impl CardForm {
    pub fn focused(&self) -> FormField {
        FormField::ALL[self.focused]
    }

    pub fn focus(&mut self, field: FormField) {
        if let Some(idx) = FormField::ALL.iter().position(|f| *f == field) {
            self.focused = idx;
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        FormField::ALL
            .iter()
            .position(|f| *f == field)
            .map(|idx| self.inputs[idx].value())
            .unwrap_or("")
    }

    pub fn handle(&mut self, key: crossterm::event::KeyEvent) -> FormEvent {
        match self.inputs[self.focused].handle(key) {
            InputResult::Continue => {}
            InputResult::NextField => self.focused = (self.focused + 1) % self.inputs.len(),
            InputResult::PrevField => {
                self.focused = (self.focused + self.inputs.len() - 1) % self.inputs.len();
            }
            InputResult::Submit => return FormEvent::Submit(self.draft()),
            InputResult::Cancel => return FormEvent::Cancel,
        }
        FormEvent::Editing
    }

    pub fn draft(&self) -> CardDraft {
        CardDraft {
            word: self.value(FormField::Word).to_string(),
            pronunciation: self.value(FormField::Pronunciation).to_string(),
            definition: self.value(FormField::Definition).to_string(),
            secondary_definition: self.value(FormField::SecondaryDefinition).to_string(),
            example: self.value(FormField::Example).to_string(),
            category: self.value(FormField::Category).to_string(),
            word_type: self.value(FormField::WordType).to_string(),
        }
    }
}

pub struct CardFormView<'a> {
    form: &'a CardForm,
    theme: &'a Theme,
}

impl<'a> CardFormView<'a> {
    pub fn new(form: &'a CardForm, theme: &'a Theme) -> Self {
        Self { form, theme }
    }
}

impl Widget for CardFormView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        Clear.render(area, buf);
        let block = Block::bordered()
            .title(" Add Flashcard ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut constraints = vec![Constraint::Length(1); FormField::ALL.len()];
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Min(0));
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        for (idx, field) in FormField::ALL.iter().enumerate() {
            let is_focused = idx == self.form.focused;
            let input = &self.form.inputs[idx];
            let label_style = if is_focused {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };

            let mut spans = vec![Span::styled(format!(" {:<16}", field.label()), label_style)];
            if input.value().is_empty() && !is_focused {
                spans.push(Span::styled(
                    field.placeholder(),
                    Style::default().fg(colors.muted()),
                ));
            } else if is_focused {
                let (before, cursor, after) = input.render_parts();
                let cursor_style = Style::default().fg(colors.bg()).bg(colors.fg());
                spans.push(Span::styled(before, Style::default().fg(colors.fg())));
                spans.push(Span::styled(
                    cursor.map(String::from).unwrap_or_else(|| " ".to_string()),
                    cursor_style,
                ));
                spans.push(Span::styled(after, Style::default().fg(colors.fg())));
            } else {
                spans.push(Span::styled(input.value(), Style::default().fg(colors.fg())));
            }
            Paragraph::new(Line::from(spans)).render(rows[idx], buf);
        }

        let status_row = rows[FormField::ALL.len() + 1];
        let status = match &self.form.error {
            Some(error) => Span::styled(format!(" {error}"), Style::default().fg(colors.error())),
            None => Span::styled(
                " [Tab] Next field  [Enter] Save  [Esc] Cancel",
                Style::default().fg(colors.muted()),
            ),
        };
        Paragraph::new(Line::from(status)).render(status_row, buf);
    }
}
