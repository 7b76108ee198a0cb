use crate::deck::card::CardId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavState {
    Empty,
    Viewing { index: usize, flipped: bool },
}

/// Position and flip state over the filtered sequence of card ids.
///
/// Invariant: `Viewing { index, .. }` implies `index < sequence.len()`, and
/// `Empty` holds exactly when the sequence is empty.
#[derive(Clone, Debug)]
pub struct Navigator {
    sequence: Vec<CardId>,
    state: NavState,
}

impl Navigator {
    pub fn new(sequence: Vec<CardId>) -> Self {
        let state = if sequence.is_empty() {
            NavState::Empty
        } else {
            NavState::Viewing {
                index: 0,
                flipped: false,
            }
        };
        Self { sequence, state }
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn sequence(&self) -> &[CardId] {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn index(&self) -> Option<usize> {
        match self.state {
            NavState::Viewing { index, .. } => Some(index),
            NavState::Empty => None,
        }
    }

    pub fn is_flipped(&self) -> bool {
        matches!(self.state, NavState::Viewing { flipped: true, .. })
    }

    pub fn current_id(&self) -> Option<&CardId> {
        self.index().and_then(|i| self.sequence.get(i))
    }

    /// `(index + 1, total)` for display; `(0, 0)` when empty.
    pub fn position(&self) -> (usize, usize) {
        match self.index() {
            Some(i) => (i + 1, self.sequence.len()),
            None => (0, 0),
        }
    }

    pub fn next(&mut self) {
        if let NavState::Viewing { index, .. } = self.state {
            self.state = NavState::Viewing {
                index: (index + 1) % self.sequence.len(),
                flipped: false,
            };
        }
    }

    pub fn previous(&mut self) {
        if let NavState::Viewing { index, .. } = self.state {
            let index = if index == 0 {
                self.sequence.len() - 1
            } else {
                index - 1
            };
            self.state = NavState::Viewing {
                index,
                flipped: false,
            };
        }
    }

    /// Returns the new flipped value, or `None` when there is nothing to flip.
    pub fn toggle_flip(&mut self) -> Option<bool> {
        match &mut self.state {
            NavState::Viewing { flipped, .. } => {
                *flipped = !*flipped;
                Some(*flipped)
            }
            NavState::Empty => None,
        }
    }

    pub fn unflip(&mut self) {
        if let NavState::Viewing { flipped, .. } = &mut self.state {
            *flipped = false;
        }
    }

    /// Swap in a new sequence. The current card keeps focus if it is still
    /// present, otherwise the view starts over at index 0.
    pub fn set_sequence(&mut self, sequence: Vec<CardId>) {
        let current = self.current_id().cloned();
        self.sequence = sequence;
        self.state = if self.sequence.is_empty() {
            NavState::Empty
        } else {
            let index = current
                .and_then(|id| self.sequence.iter().position(|s| *s == id))
                .unwrap_or(0);
            NavState::Viewing {
                index,
                flipped: false,
            }
        };
    }

    /// Back to the first card of the sequence, face down.
    pub fn reset(&mut self) {
        if !self.sequence.is_empty() {
            self.state = NavState::Viewing {
                index: 0,
                flipped: false,
            };
        }
    }

    pub fn push(&mut self, id: CardId) {
        self.sequence.push(id);
        if self.state == NavState::Empty {
            self.state = NavState::Viewing {
                index: 0,
                flipped: false,
            };
        }
    }

    /// Drop `id` from the sequence, keeping the index on the same card when
    /// possible and clamped otherwise.
    pub fn remove(&mut self, id: &CardId) -> bool {
        let Some(pos) = self.sequence.iter().position(|s| s == id) else {
            return false;
        };
        self.sequence.remove(pos);

        self.state = match self.state {
            _ if self.sequence.is_empty() => NavState::Empty,
            NavState::Viewing { index, flipped } if pos < index => NavState::Viewing {
                index: index - 1,
                flipped,
            },
            NavState::Viewing { index, .. } if pos == index => NavState::Viewing {
                index: index.min(self.sequence.len() - 1),
                flipped: false,
            },
            other => other,
        };
        true
    }

    /// Restore the exact sequence and state captured earlier.
    pub(crate) fn restore(&mut self, snapshot: Navigator) {
        *self = snapshot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn ids(names: &[&str]) -> Vec<CardId> {
        names.iter().map(|n| CardId::new(*n)).collect()
    }

    fn assert_invariant(nav: &Navigator) {
        match nav.state() {
            NavState::Empty => assert!(nav.is_empty()),
            NavState::Viewing { index, .. } => assert!(index < nav.len()),
        }
    }

    #[test]
    fn test_next_wraps_to_first() {
        let mut nav = Navigator::new(ids(&["a", "b", "c"]));
        nav.next();
        nav.next();
        assert_eq!(nav.index(), Some(2));
        nav.next();
        assert_eq!(nav.index(), Some(0));
        assert_eq!(nav.current_id().unwrap().as_str(), "a");
    }

    #[test]
    fn test_previous_wraps_to_last() {
        let mut nav = Navigator::new(ids(&["a", "b", "c"]));
        nav.previous();
        assert_eq!(nav.index(), Some(2));
    }

    #[test]
    fn test_single_card_wraparound_is_noop() {
        let mut nav = Navigator::new(ids(&["only"]));
        nav.previous();
        assert_eq!(nav.index(), Some(0));
        nav.next();
        assert_eq!(nav.index(), Some(0));
    }

    #[test]
    fn test_navigation_on_empty_is_noop() {
        let mut nav = Navigator::new(Vec::new());
        nav.next();
        nav.previous();
        assert_eq!(nav.state(), NavState::Empty);
        assert_eq!(nav.toggle_flip(), None);
        assert_eq!(nav.position(), (0, 0));
    }

    #[test]
    fn test_navigation_resets_flip() {
        let mut nav = Navigator::new(ids(&["a", "b"]));
        assert_eq!(nav.toggle_flip(), Some(true));
        assert!(nav.is_flipped());
        nav.next();
        assert!(!nav.is_flipped());
        nav.toggle_flip();
        nav.previous();
        assert!(!nav.is_flipped());
    }

    #[test]
    fn test_set_sequence_follows_current_card() {
        let mut nav = Navigator::new(ids(&["a", "b", "c"]));
        nav.next();
        nav.toggle_flip();
        nav.set_sequence(ids(&["c", "b"]));
        assert_eq!(nav.current_id().unwrap().as_str(), "b");
        assert_eq!(nav.index(), Some(1));
        assert!(!nav.is_flipped());
    }

    #[test]
    fn test_set_sequence_resets_when_card_gone() {
        let mut nav = Navigator::new(ids(&["a", "b", "c"]));
        nav.next();
        nav.next();
        nav.set_sequence(ids(&["a", "b"]));
        assert_eq!(nav.index(), Some(0));
        nav.set_sequence(Vec::new());
        assert_eq!(nav.state(), NavState::Empty);
    }

    #[test]
    fn test_remove_before_current_shifts_index() {
        let mut nav = Navigator::new(ids(&["a", "b", "c"]));
        nav.next();
        nav.next();
        assert!(nav.remove(&CardId::new("a")));
        assert_eq!(nav.current_id().unwrap().as_str(), "c");
        assert_eq!(nav.index(), Some(1));
    }

    #[test]
    fn test_remove_current_last_clamps() {
        let mut nav = Navigator::new(ids(&["a", "b", "c"]));
        nav.previous();
        nav.remove(&CardId::new("c"));
        assert_eq!(nav.index(), Some(1));
        nav.remove(&CardId::new("a"));
        nav.remove(&CardId::new("b"));
        assert_eq!(nav.state(), NavState::Empty);
        assert!(!nav.remove(&CardId::new("zzz")));
    }

    #[test]
    fn test_push_leaves_empty_state() {
        let mut nav = Navigator::new(Vec::new());
        nav.push(CardId::new("new"));
        assert_eq!(nav.index(), Some(0));
        assert_eq!(nav.position(), (1, 1));
    }

    #[test]
    fn test_invariant_holds_under_random_operations() {
        let mut rng = SmallRng::seed_from_u64(99);
        let pool = ids(&["a", "b", "c", "d", "e", "f"]);
        let mut nav = Navigator::new(pool.clone());
        for _ in 0..2_000 {
            match rng.gen_range(0..5) {
                0 => nav.next(),
                1 => nav.previous(),
                2 => {
                    let n = rng.gen_range(0..=pool.len());
                    nav.set_sequence(pool[..n].to_vec());
                }
                3 => {
                    let victim = &pool[rng.gen_range(0..pool.len())];
                    nav.remove(victim);
                }
                _ => {
                    nav.toggle_flip();
                }
            }
            assert_invariant(&nav);
        }
    }
}
