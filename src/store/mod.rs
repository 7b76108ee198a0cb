pub mod json_store;
pub mod schema;

use chrono::NaiveDate;

use crate::deck::card::Card;
use crate::engine::stats::Stats;
use crate::error::StudyResult;

/// What a successful load hands back.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub cards: Vec<Card>,
    pub stats: Stats,
    /// False when no deck record exists yet (first run).
    pub has_deck: bool,
}

/// Durable storage for the deck, the stats and the last study date.
///
/// `save` is all-or-nothing from the caller's point of view: on error, the
/// previously stored deck and stats are left as they were.
pub trait Persistence {
    fn load(&self) -> StudyResult<Snapshot>;
    fn save(&self, cards: &[Card], stats: &Stats) -> StudyResult<()>;
    fn load_last_study_date(&self) -> StudyResult<Option<NaiveDate>>;
    fn save_last_study_date(&self, date: NaiveDate) -> StudyResult<()>;
}
