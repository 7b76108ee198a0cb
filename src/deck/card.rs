use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY: &str = "general";

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Whether feedback at this level counts as a correct answer.
    pub fn is_correct(self) -> bool {
        !matches!(self, Difficulty::Hard)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub word: String,
    #[serde(default)]
    pub pronunciation: Option<String>,
    pub definition: String,
    #[serde(default, alias = "vietnameseDefinition")]
    pub secondary_definition: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub word_type: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub times_studied: u32,
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default)]
    pub incorrect_count: u32,
    #[serde(default)]
    pub last_studied: Option<DateTime<Utc>>,
    pub created: DateTime<Utc>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Raw field values for a card that has not been added to a deck yet.
#[derive(Clone, Debug, Default)]
pub struct CardDraft {
    pub word: String,
    pub pronunciation: String,
    pub definition: String,
    pub secondary_definition: String,
    pub example: String,
    pub category: String,
    pub word_type: String,
}

impl Card {
    /// Every piece of text a search query is matched against.
    pub fn searchable_text(&self) -> impl Iterator<Item = &str> {
        [
            Some(self.word.as_str()),
            Some(self.definition.as_str()),
            self.secondary_definition.as_deref(),
            self.example.as_deref(),
        ]
        .into_iter()
        .flatten()
    }

    pub fn is_consistent(&self) -> bool {
        self.times_studied == self.correct_count + self.incorrect_count
    }
}

pub(crate) fn optional_field(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
