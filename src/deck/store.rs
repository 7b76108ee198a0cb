use chrono::{DateTime, Utc};

use crate::deck::card::{Card, CardDraft, CardId, DEFAULT_CATEGORY, Difficulty, optional_field};
use crate::error::{StudyError, StudyResult};

/// The authoritative, insertion-ordered deck.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CardStore {
    cards: Vec<Card>,
}

impl CardStore {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| &c.id == id)
    }

    pub fn get_mut(&mut self, id: &CardId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| &c.id == id)
    }

    pub fn position(&self, id: &CardId) -> Option<usize> {
        self.cards.iter().position(|c| &c.id == id)
    }

    pub fn add(&mut self, draft: &CardDraft, now: DateTime<Utc>) -> StudyResult<&Card> {
        let word = draft.word.trim();
        if word.is_empty() {
            return Err(StudyError::Validation { field: "word" });
        }
        let definition = draft.definition.trim();
        if definition.is_empty() {
            return Err(StudyError::Validation {
                field: "definition",
            });
        }

        let card = Card {
            id: self.next_id(now),
            word: word.to_string(),
            pronunciation: optional_field(&draft.pronunciation),
            definition: definition.to_string(),
            secondary_definition: optional_field(&draft.secondary_definition),
            example: optional_field(&draft.example),
            category: optional_field(&draft.category)
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            word_type: optional_field(&draft.word_type),
            difficulty: Difficulty::Medium,
            times_studied: 0,
            correct_count: 0,
            incorrect_count: 0,
            last_studied: None,
            created: now,
        };
        self.cards.push(card);
        Ok(&self.cards[self.cards.len() - 1])
    }

    /// Removes a card, returning it with its former position.
    pub fn remove(&mut self, id: &CardId) -> StudyResult<(usize, Card)> {
        let idx = self
            .position(id)
            .ok_or_else(|| StudyError::NotFound(id.clone()))?;
        Ok((idx, self.cards.remove(idx)))
    }

    /// Puts a previously removed card back where it was.
    pub(crate) fn restore(&mut self, idx: usize, card: Card) {
        let idx = idx.min(self.cards.len());
        self.cards.insert(idx, card);
    }

    pub(crate) fn pop(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Replace a card in place (same id). Used to roll back a failed save.
    pub(crate) fn replace(&mut self, card: Card) {
        if let Some(slot) = self.get_mut(&card.id) {
            *slot = card;
        }
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }

    // Creation time in milliseconds, bumped past any id already in use.
    fn next_id(&self, now: DateTime<Utc>) -> CardId {
        let mut millis = now.timestamp_millis();
        loop {
            let candidate = CardId::new(millis.to_string());
            if self.get(&candidate).is_none() {
                return candidate;
            }
            millis += 1;
        }
    }
}
