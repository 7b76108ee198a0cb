use chrono::{DateTime, Utc};
use rust_embed::Embed;
use serde::Deserialize;

use crate::deck::card::{Card, CardId, Difficulty, optional_field};

#[derive(Embed)]
#[folder = "assets/decks/"]
struct DeckAssets;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SampleEntry {
    word: String,
    #[serde(default)]
    pronunciation: String,
    definition: String,
    #[serde(default)]
    secondary_definition: String,
    #[serde(default)]
    example: String,
    category: String,
    #[serde(default)]
    word_type: String,
    #[serde(default)]
    difficulty: Difficulty,
}

/// The bundled starter deck, seeded on first run. Ids are the 1-based
/// positions in the bundled file.
pub fn sample_cards(now: DateTime<Utc>) -> Vec<Card> {
    let Some(file) = DeckAssets::get("sample.json") else {
        return Vec::new();
    };
    let entries: Vec<SampleEntry> = match serde_json::from_slice(file.data.as_ref()) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("bundled sample deck is unreadable: {e}");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(i, e)| Card {
            id: CardId::new((i + 1).to_string()),
            word: e.word,
            pronunciation: optional_field(&e.pronunciation),
            definition: e.definition,
            secondary_definition: optional_field(&e.secondary_definition),
            example: optional_field(&e.example),
            category: e.category,
            word_type: optional_field(&e.word_type),
            difficulty: e.difficulty,
            times_studied: 0,
            correct_count: 0,
            incorrect_count: 0,
            last_studied: None,
            created: now,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_deck_loads_with_unique_ids() {
        let cards = sample_cards(Utc::now());
        assert!(!cards.is_empty());
        let ids: HashSet<_> = cards.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids.len(), cards.len());
        assert!(cards.iter().all(|c| !c.word.is_empty() && !c.definition.is_empty()));
        assert!(cards.iter().all(|c| c.times_studied == 0));
    }
}
