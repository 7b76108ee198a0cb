use std::sync::mpsc;
use std::time::Instant;

use crossterm::event::KeyEvent;

use flashdeck::config::Config;
use flashdeck::deck::{CardId, Difficulty};
use flashdeck::engine::FilterCriteria;
use flashdeck::error::StudyError;
use flashdeck::session::{Direction, SessionOptions, StudySession};
use flashdeck::sink::{Notice, Severity, Speaker};
use flashdeck::store::Persistence;

use crate::input::{Action, map_key};
use crate::ui::components::card_form::{CardForm, FormEvent, FormField};
use crate::ui::components::toast::ToastQueue;
use crate::ui::line_input::{InputResult, LineInput};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Study,
    AddCard,
    Stats,
    ConfirmDelete,
}

pub struct App {
    pub session: StudySession,
    pub screen: Screen,
    /// Search box contents while it has focus.
    pub search: Option<LineInput>,
    pub form: CardForm,
    pub toasts: ToastQueue,
    pub theme: Theme,
    pub should_quit: bool,
    notices: mpsc::Receiver<Notice>,
    pending_delete: Option<(CardId, String)>,
}

impl App {
    pub fn new(
        config: &Config,
        theme: Theme,
        persistence: Box<dyn Persistence>,
        speaker: Box<dyn Speaker>,
    ) -> Self {
        let (tx, notices) = mpsc::channel();
        let session = StudySession::open(
            persistence,
            Box::new(tx),
            speaker,
            SessionOptions {
                timings: config.timings(),
                seed_sample_deck: config.seed_sample_deck,
            },
        );

        let mut app = Self {
            session,
            screen: Screen::Study,
            search: None,
            form: CardForm::default(),
            toasts: ToastQueue::default(),
            theme,
            should_quit: false,
            notices,
            pending_delete: None,
        };
        app.drain_notices(Instant::now());
        app
    }

    /// Periodic housekeeping: deferred session work and toast expiry.
    pub fn tick(&mut self, now: Instant) {
        self.session.tick(now);
        self.drain_notices(now);
        self.toasts.expire(now);
    }

    fn drain_notices(&mut self, now: Instant) {
        while let Ok(notice) = self.notices.try_recv() {
            self.toasts.push(notice, now);
        }
    }

    fn report(&mut self, context: &str, err: &StudyError) {
        log::warn!("{context}: {err}");
        self.toasts.push(
            Notice {
                message: format!("{context}: {err}"),
                severity: Severity::Error,
            },
            Instant::now(),
        );
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != crossterm::event::KeyEventKind::Press {
            return;
        }
        match self.screen {
            Screen::AddCard => self.handle_form_key(key),
            Screen::Stats => {
                if matches!(
                    map_key(key),
                    Some(Action::CloseAll | Action::ShowStats | Action::Quit)
                ) {
                    self.screen = Screen::Study;
                }
            }
            Screen::ConfirmDelete => self.handle_confirm_key(key),
            Screen::Study if self.search.is_some() => self.handle_search_key(key),
            Screen::Study => {
                if let Some(action) = map_key(key) {
                    self.handle_action(action);
                }
            }
        }
        self.drain_notices(Instant::now());
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Previous => self.session.navigate(Direction::Previous),
            Action::Next => self.session.navigate(Direction::Next),
            Action::Flip => {
                self.session.flip();
            }
            Action::OpenAddForm => {
                self.form = CardForm::default();
                self.screen = Screen::AddCard;
            }
            Action::CloseAll => {
                self.screen = Screen::Study;
                self.search = None;
                if self.session.is_study_mode() {
                    self.session.stop_study_mode();
                }
            }
            Action::Rate(rating) => self.rate(rating),
            Action::Speak => self.session.speak_current(),
            Action::Shuffle => self.session.shuffle(),
            Action::ToggleStudyMode => {
                if self.session.is_study_mode() {
                    self.session.stop_study_mode();
                } else {
                    self.session.start_study_mode();
                }
            }
            Action::Search => {
                self.search = Some(LineInput::new(&self.session.criteria().search_text));
            }
            Action::CycleCategory => {
                let mut criteria = self.session.criteria().clone();
                criteria.category = next_in_cycle(&self.session.categories(), criteria.category);
                self.session.list_filtered(criteria);
            }
            Action::CycleDifficulty => {
                let mut criteria = self.session.criteria().clone();
                criteria.difficulty = next_in_cycle(&Difficulty::ALL, criteria.difficulty);
                self.session.list_filtered(criteria);
            }
            Action::ClearFilters => {
                self.session.list_filtered(FilterCriteria::default());
            }
            Action::ShowStats => self.screen = Screen::Stats,
            Action::Delete => {
                if let Some(card) = self.session.current_card() {
                    self.pending_delete = Some((card.id.clone(), card.word.clone()));
                    self.screen = Screen::ConfirmDelete;
                }
            }
            Action::Quit => self.should_quit = true,
        }
    }

    fn rate(&mut self, rating: Difficulty) {
        if !self.session.feedback_available() {
            return;
        }
        if let Err(e) = self.session.submit_feedback(rating) {
            self.report("Could not record answer", &e);
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let Some(input) = self.search.as_mut() else {
            return;
        };
        let result = input.handle(key);
        let text = input.value().to_string();
        match result {
            InputResult::Submit => self.search = None,
            InputResult::Cancel => {
                self.search = None;
                self.apply_search(String::new());
                return;
            }
            _ => {}
        }
        self.apply_search(text);
    }

    fn apply_search(&mut self, text: String) {
        if self.session.criteria().search_text == text {
            return;
        }
        let criteria = FilterCriteria {
            search_text: text,
            ..self.session.criteria().clone()
        };
        self.session.list_filtered(criteria);
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match self.form.handle(key) {
            FormEvent::Editing => {}
            FormEvent::Cancel => self.screen = Screen::Study,
            FormEvent::Submit(draft) => match self.session.create_card(&draft) {
                Ok(_) => {
                    self.form = CardForm::default();
                    self.screen = Screen::Study;
                }
                Err(StudyError::Validation { field }) => {
                    self.form.error = Some("Please fill in at least word and definition".to_string());
                    if let Some(field) = FormField::from_name(field) {
                        self.form.focus(field);
                    }
                }
                Err(e) => {
                    self.form.error = Some(format!("Could not save: {e}"));
                    log::warn!("add card failed: {e}");
                }
            },
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        use crossterm::event::KeyCode;
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                if let Some((id, _)) = self.pending_delete.take()
                    && let Err(e) = self.session.delete_card(&id)
                {
                    self.report("Could not delete flashcard", &e);
                }
                self.screen = Screen::Study;
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.pending_delete = None;
                self.screen = Screen::Study;
            }
            _ => {}
        }
    }

    pub fn pending_delete_word(&self) -> Option<&str> {
        self.pending_delete.as_ref().map(|(_, word)| word.as_str())
    }
}

/// `None -> first -> ... -> last -> None`.
fn next_in_cycle<T: Clone + PartialEq>(options: &[T], current: Option<T>) -> Option<T> {
    match current {
        None => options.first().cloned(),
        Some(current) => options
            .iter()
            .position(|o| *o == current)
            .and_then(|idx| options.get(idx + 1))
            .cloned(),
    }
}
