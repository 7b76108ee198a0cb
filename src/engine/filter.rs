use rand::Rng;

use crate::deck::card::{Card, CardId, Difficulty};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search_text: String,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.search_text.is_empty() && self.category.is_none() && self.difficulty.is_none()
    }

    pub fn matches(&self, card: &Card) -> bool {
        let needle = self.search_text.to_lowercase();
        let matches_search = needle.is_empty()
            || card
                .searchable_text()
                .any(|text| text.to_lowercase().contains(&needle));

        let matches_category = self
            .category
            .as_deref()
            .is_none_or(|category| card.category == category);

        let matches_difficulty = self.difficulty.is_none_or(|d| card.difficulty == d);

        matches_search && matches_category && matches_difficulty
    }
}

/// Ids of the matching cards, in deck order. An empty result stays empty.
pub fn apply(cards: &[Card], criteria: &FilterCriteria) -> Vec<CardId> {
    cards
        .iter()
        .filter(|card| criteria.matches(card))
        .map(|card| card.id.clone())
        .collect()
}

/// Fisher-Yates over a copy of `items`.
pub fn shuffled<T: Clone, R: Rng>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = rng.gen_range(0..=i);
        out.swap(i, j);
    }
    out
}

/// Distinct categories in first-seen deck order.
pub fn categories(cards: &[Card]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for card in cards {
        if !out.iter().any(|c| c == &card.category) {
            out.push(card.category.clone());
        }
    }
    out
}
