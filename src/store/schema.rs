use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::deck::card::Card;
use crate::engine::stats::Stats;

pub const FLASHCARDS_KEY: &str = "flashcards";
pub const STATS_KEY: &str = "flashcardStats";
pub const LAST_STUDY_DATE_KEY: &str = "lastStudyDate";

pub const ALL_KEYS: [&str; 3] = [FLASHCARDS_KEY, STATS_KEY, LAST_STUDY_DATE_KEY];

pub const EXPORT_VERSION: u32 = 1;

/// Single-file bundle of everything `flashdeck --export` writes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportData {
    pub flashdeck_export_version: u32,
    pub exported_at: DateTime<Utc>,
    pub flashcards: Vec<Card>,
    pub stats: Stats,
    #[serde(default)]
    pub last_study_date: Option<NaiveDate>,
}
