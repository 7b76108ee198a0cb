use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use flashdeck::deck::Difficulty;

/// What a key press on the study screen asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Previous,
    Next,
    Flip,
    OpenAddForm,
    CloseAll,
    Rate(Difficulty),
    Speak,
    Shuffle,
    ToggleStudyMode,
    Search,
    CycleCategory,
    CycleDifficulty,
    ClearFilters,
    ShowStats,
    Delete,
    Quit,
}

pub fn map_key(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let action = match key.code {
        KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::Char('n') if ctrl => Action::OpenAddForm,
        _ if ctrl => return None,
        KeyCode::Left | KeyCode::Char('h') => Action::Previous,
        KeyCode::Right | KeyCode::Char('l') => Action::Next,
        KeyCode::Char(' ') | KeyCode::Enter => Action::Flip,
        KeyCode::Esc => Action::CloseAll,
        KeyCode::Char('1') => Action::Rate(Difficulty::Easy),
        KeyCode::Char('2') => Action::Rate(Difficulty::Medium),
        KeyCode::Char('3') => Action::Rate(Difficulty::Hard),
        KeyCode::Char('p') => Action::Speak,
        KeyCode::Char('s') => Action::Shuffle,
        KeyCode::Char('m') => Action::ToggleStudyMode,
        KeyCode::Char('/') => Action::Search,
        KeyCode::Char('c') => Action::CycleCategory,
        KeyCode::Char('d') => Action::CycleDifficulty,
        KeyCode::Char('r') => Action::ClearFilters,
        KeyCode::Char('i') => Action::ShowStats,
        KeyCode::Char('x') | KeyCode::Delete => Action::Delete,
        KeyCode::Char('q') => Action::Quit,
        _ => return None,
    };
    Some(action)
}
