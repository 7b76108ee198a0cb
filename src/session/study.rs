use std::time::Instant;

use chrono::{DateTime, Local, NaiveDate, Utc};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::deck::card::{Card, CardDraft, CardId, Difficulty};
use crate::deck::sample::sample_cards;
use crate::deck::store::CardStore;
use crate::engine::feedback::record_feedback;
use crate::engine::filter::{self, FilterCriteria};
use crate::engine::stats::Stats;
use crate::engine::streak::compute_daily_streak;
use crate::error::{StudyError, StudyResult};
use crate::session::navigator::Navigator;
use crate::session::timer::{Deferred, Scheduler, TaskId, Timings};
use crate::sink::{Notifier, Severity, Speaker};
use crate::store::{Persistence, Snapshot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionOptions {
    pub timings: Timings,
    pub seed_sample_deck: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            timings: Timings::default(),
            seed_sample_deck: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipOutcome {
    /// Carries the new face: `true` when the answer side is showing.
    Flipped(bool),
    /// Arrived inside the debounce window.
    Dropped,
    NothingToFlip,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedbackOutcome {
    Recorded { card: CardId, advance_at: Instant },
    /// An auto-advance from earlier feedback is still pending.
    Dropped,
    NoCard,
}

/// Everything a renderer needs for the current frame.
#[derive(Clone, Copy, Debug)]
pub struct CardView<'a> {
    pub card: Option<&'a Card>,
    /// `(index + 1, total)`, or `(0, 0)` when empty.
    pub position: (usize, usize),
    pub flipped: bool,
    pub study_mode: bool,
    pub feedback_available: bool,
    pub advance_pending: bool,
}

/// The application context: deck, filter, navigation, stats and the
/// deferred tasks that tie them together. All mutation goes through here.
pub struct StudySession {
    store: CardStore,
    stats: Stats,
    criteria: FilterCriteria,
    navigator: Navigator,
    study_mode: bool,
    scheduler: Scheduler,
    flip_guard: Option<TaskId>,
    pending_advance: Option<TaskId>,
    timings: Timings,
    rng: SmallRng,
    persistence: Box<dyn Persistence>,
    notifier: Box<dyn Notifier>,
    speaker: Box<dyn Speaker>,
}

impl StudySession {
    pub fn open(
        persistence: Box<dyn Persistence>,
        notifier: Box<dyn Notifier>,
        speaker: Box<dyn Speaker>,
        options: SessionOptions,
    ) -> Self {
        Self::open_with(
            persistence,
            notifier,
            speaker,
            options,
            Local::now().date_naive(),
            SmallRng::from_entropy(),
        )
    }

    /// Load the deck, fall back to defaults on corrupt data, seed the sample
    /// deck on first run and run the once-per-open streak check.
    pub fn open_with(
        persistence: Box<dyn Persistence>,
        mut notifier: Box<dyn Notifier>,
        speaker: Box<dyn Speaker>,
        options: SessionOptions,
        today: NaiveDate,
        rng: SmallRng,
    ) -> Self {
        let (snapshot, usable) = match persistence.load() {
            Ok(snapshot) => (snapshot, true),
            Err(e) => {
                log::warn!("falling back to an empty deck: {e}");
                notifier.notify(
                    "Saved flashcards could not be read. Starting with an empty deck.",
                    Severity::Error,
                );
                (Snapshot::default(), false)
            }
        };
        let loaded_stats = snapshot.stats.clone();
        let seed = usable && !snapshot.has_deck && options.seed_sample_deck;
        let cards = if seed {
            sample_cards(Utc::now())
        } else {
            snapshot.cards
        };
        let mut stats = snapshot.stats;

        let last_study_date = persistence.load_last_study_date().unwrap_or_else(|e| {
            log::warn!("ignoring unreadable last study date: {e}");
            None
        });
        let update = compute_daily_streak(today, last_study_date, stats.studied_today, stats.streak);
        stats.streak = update.streak;
        stats.best_streak = stats.best_streak.max(update.streak);
        if update.record_today
            && last_study_date != Some(today)
            && let Err(e) = persistence.save_last_study_date(today)
        {
            log::warn!("could not record study date: {e}");
        }
        stats.roll_over(today);
        stats.total_words = cards.len();
        stats.recompute_accuracy();

        let store = CardStore::new(cards);
        let criteria = FilterCriteria::default();
        let navigator = Navigator::new(filter::apply(store.cards(), &criteria));

        let mut session = Self {
            store,
            stats,
            criteria,
            navigator,
            study_mode: false,
            scheduler: Scheduler::default(),
            flip_guard: None,
            pending_advance: None,
            timings: options.timings,
            rng,
            persistence,
            notifier,
            speaker,
        };

        if seed || session.stats != loaded_stats {
            if let Err(e) = session.persist() {
                log::warn!("could not write initial state: {e}");
            }
        }
        log::info!(
            "opened deck: {} cards, streak {}{}",
            session.store.len(),
            session.stats.streak,
            if seed { " (sample deck seeded)" } else { "" }
        );
        session
    }

    pub fn cards(&self) -> &[Card] {
        self.store.cards()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn categories(&self) -> Vec<String> {
        filter::categories(self.store.cards())
    }

    pub fn is_study_mode(&self) -> bool {
        self.study_mode
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.navigator.current_id().and_then(|id| self.store.get(id))
    }

    pub fn feedback_available(&self) -> bool {
        self.study_mode && self.navigator.is_flipped()
    }

    pub fn view(&self) -> CardView<'_> {
        CardView {
            card: self.current_card(),
            position: self.navigator.position(),
            flipped: self.navigator.is_flipped(),
            study_mode: self.study_mode,
            feedback_available: self.feedback_available(),
            advance_pending: self.pending_advance.is_some(),
        }
    }

    pub fn stats(&self) -> Stats {
        let mut stats = self.stats.clone();
        stats.total_words = self.store.len();
        stats
    }

    /// Cards of the active sequence, in navigation order.
    pub fn filtered_cards(&self) -> Vec<&Card> {
        self.navigator
            .sequence()
            .iter()
            .filter_map(|id| self.store.get(id))
            .collect()
    }

    pub fn create_card(&mut self, draft: &CardDraft) -> StudyResult<CardId> {
        let card = self.store.add(draft, Utc::now())?;
        let id = card.id.clone();
        let matches = self.criteria.matches(card);

        let before = self.navigator.clone();
        if matches {
            self.navigator.push(id.clone());
        }
        if let Err(e) = self.persist() {
            self.store.pop();
            self.navigator.restore(before);
            return Err(e);
        }
        self.notifier
            .notify("Flashcard added successfully!", Severity::Success);
        Ok(id)
    }

    pub fn delete_card(&mut self, id: &CardId) -> StudyResult<Card> {
        let before = self.navigator.clone();
        let was_current = self.navigator.current_id() == Some(id);
        let (position, card) = self.store.remove(id)?;
        self.navigator.remove(id);

        if let Err(e) = self.persist() {
            self.store.restore(position, card);
            self.navigator.restore(before);
            return Err(e);
        }
        if was_current {
            self.clear_flip_guard();
            self.cancel_advance();
        }
        self.notifier
            .notify("Flashcard deleted successfully!", Severity::Success);
        Ok(card)
    }

    /// Delete the card on screen. `Ok(None)` when nothing is showing.
    pub fn delete_current(&mut self) -> StudyResult<Option<Card>> {
        let Some(id) = self.navigator.current_id().cloned() else {
            return Ok(None);
        };
        self.delete_card(&id).map(Some)
    }

    /// Apply new criteria and return the resulting sequence. An empty match
    /// leaves the navigator empty rather than showing the whole deck.
    pub fn list_filtered(&mut self, criteria: FilterCriteria) -> Vec<&Card> {
        self.criteria = criteria;
        let sequence = filter::apply(self.store.cards(), &self.criteria);
        self.replace_sequence(sequence);
        self.filtered_cards()
    }

    pub fn shuffle(&mut self) {
        self.reshuffle();
        self.notifier.notify("Cards shuffled!", Severity::Info);
    }

    fn reshuffle(&mut self) {
        let sequence = filter::shuffled(self.navigator.sequence(), &mut self.rng);
        self.replace_sequence(sequence);
        self.navigator.reset();
    }

    fn replace_sequence(&mut self, sequence: Vec<CardId>) {
        self.navigator.set_sequence(sequence);
        self.clear_flip_guard();
        self.cancel_advance();
    }

    pub fn navigate(&mut self, direction: Direction) {
        self.cancel_advance();
        self.clear_flip_guard();
        match direction {
            Direction::Previous => self.navigator.previous(),
            Direction::Next => self.navigator.next(),
        }
    }

    pub fn flip(&mut self) -> FlipOutcome {
        self.flip_at(Instant::now())
    }

    pub fn flip_at(&mut self, now: Instant) -> FlipOutcome {
        if self.flip_guard.is_some() {
            log::debug!("flip dropped inside debounce window");
            return FlipOutcome::Dropped;
        }
        match self.navigator.toggle_flip() {
            Some(face_up) => {
                let at = now + self.timings.flip_debounce;
                self.flip_guard = Some(self.scheduler.schedule(at, Deferred::FlipSettled));
                FlipOutcome::Flipped(face_up)
            }
            None => FlipOutcome::NothingToFlip,
        }
    }

    pub fn submit_feedback(&mut self, rating: Difficulty) -> StudyResult<FeedbackOutcome> {
        self.submit_feedback_at(rating, Instant::now(), Utc::now())
    }

    /// Rate the current card, persist, then schedule the advance.
    pub fn submit_feedback_at(
        &mut self,
        rating: Difficulty,
        now: Instant,
        stamp: DateTime<Utc>,
    ) -> StudyResult<FeedbackOutcome> {
        if self.pending_advance.is_some() {
            log::debug!("feedback dropped while an advance is pending");
            return Ok(FeedbackOutcome::Dropped);
        }
        let Some(id) = self.navigator.current_id().cloned() else {
            return Ok(FeedbackOutcome::NoCard);
        };
        let today = stamp.with_timezone(&Local).date_naive();

        let stats_before = self.stats.clone();
        let Some(card) = self.store.get_mut(&id) else {
            return Err(StudyError::NotFound(id));
        };
        let card_before = card.clone();
        record_feedback(card, &mut self.stats, rating, stamp, today);

        if let Err(e) = self.persist() {
            self.store.replace(card_before);
            self.stats = stats_before;
            return Err(e);
        }

        let advance_at = now + self.timings.advance_delay;
        self.pending_advance = Some(self.scheduler.schedule(advance_at, Deferred::Advance));
        Ok(FeedbackOutcome::Recorded {
            card: id,
            advance_at,
        })
    }

    /// Run deferred work that has come due.
    pub fn tick(&mut self, now: Instant) {
        for (id, task) in self.scheduler.take_due(now) {
            match task {
                Deferred::FlipSettled => {
                    if self.flip_guard == Some(id) {
                        self.flip_guard = None;
                    }
                }
                Deferred::Advance => {
                    if self.pending_advance == Some(id) {
                        self.pending_advance = None;
                        self.clear_flip_guard();
                        self.navigator.next();
                    }
                }
            }
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    pub fn start_study_mode(&mut self) {
        self.study_mode = true;
        self.reshuffle();
        self.notifier.notify(
            "Study mode started! Rate your knowledge after each card.",
            Severity::Info,
        );
    }

    pub fn stop_study_mode(&mut self) {
        self.study_mode = false;
        self.cancel_advance();
    }

    /// Read the current word aloud. Missing speech support only warns.
    pub fn speak_current(&mut self) {
        let Some(word) = self.current_card().map(|c| c.word.clone()) else {
            return;
        };
        match self.speaker.speak(&word) {
            Ok(()) => {}
            Err(StudyError::CapabilityUnavailable(what)) => {
                log::info!("speech unavailable: {what}");
                self.notifier.notify(
                    "Speech synthesis is not available on this system",
                    Severity::Warning,
                );
            }
            Err(e) => {
                log::warn!("speech failed: {e}");
                self.notifier
                    .notify(&format!("Could not play audio: {e}"), Severity::Warning);
            }
        }
    }

    pub fn save(&mut self) -> StudyResult<()> {
        self.persist()
    }

    fn persist(&mut self) -> StudyResult<()> {
        self.stats.total_words = self.store.len();
        self.persistence
            .save(self.store.cards(), &self.stats)
            .inspect_err(|e| log::error!("save failed: {e}"))
    }

    fn clear_flip_guard(&mut self) {
        if let Some(id) = self.flip_guard.take() {
            self.scheduler.cancel(id);
        }
    }

    fn cancel_advance(&mut self) {
        if let Some(id) = self.pending_advance.take() {
            self.scheduler.cancel(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{Notice, Silent};
    use chrono::TimeZone;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::sync::mpsc;
    use std::time::Duration;

    #[derive(Default)]
    struct Shared {
        snapshot: RefCell<Option<(Vec<Card>, Stats)>>,
        last_study_date: Cell<Option<NaiveDate>>,
        fail_saves: Cell<bool>,
        saves: Cell<usize>,
        corrupt: Cell<bool>,
    }

    #[derive(Clone, Default)]
    struct MemoryStore(Rc<Shared>);

    impl Persistence for MemoryStore {
        fn load(&self) -> StudyResult<Snapshot> {
            if self.0.corrupt.get() {
                return Err(StudyError::CorruptState {
                    key: "flashcards",
                    reason: "bad".to_string(),
                });
            }
            Ok(match self.0.snapshot.borrow().clone() {
                Some((cards, stats)) => Snapshot {
                    cards,
                    stats,
                    has_deck: true,
                },
                None => Snapshot::default(),
            })
        }

        fn save(&self, cards: &[Card], stats: &Stats) -> StudyResult<()> {
            if self.0.fail_saves.get() {
                return Err(StudyError::Io(std::io::Error::other("disk full")));
            }
            self.0.saves.set(self.0.saves.get() + 1);
            *self.0.snapshot.borrow_mut() = Some((cards.to_vec(), stats.clone()));
            Ok(())
        }

        fn load_last_study_date(&self) -> StudyResult<Option<NaiveDate>> {
            Ok(self.0.last_study_date.get())
        }

        fn save_last_study_date(&self, date: NaiveDate) -> StudyResult<()> {
            self.0.last_study_date.set(Some(date));
            Ok(())
        }
    }

    struct NoSpeech;

    impl Speaker for NoSpeech {
        fn speak(&mut self, _text: &str) -> StudyResult<()> {
            Err(StudyError::CapabilityUnavailable("speech synthesis".to_string()))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn draft(word: &str, category: &str) -> CardDraft {
        CardDraft {
            word: word.to_string(),
            definition: format!("meaning of {word}"),
            category: category.to_string(),
            ..CardDraft::default()
        }
    }

    fn open(store: &MemoryStore) -> StudySession {
        StudySession::open_with(
            Box::new(store.clone()),
            Box::new(Silent),
            Box::new(NoSpeech),
            SessionOptions {
                timings: Timings::default(),
                seed_sample_deck: false,
            },
            today(),
            SmallRng::seed_from_u64(3),
        )
    }

    fn session_with(words: &[&str]) -> (MemoryStore, StudySession) {
        let store = MemoryStore::default();
        let mut session = open(&store);
        for w in words {
            session.create_card(&draft(w, "general")).unwrap();
        }
        (store, session)
    }

    fn current_word(session: &StudySession) -> &str {
        session.current_card().map(|c| c.word.as_str()).unwrap_or("")
    }

    #[test]
    fn test_first_run_seeds_sample_deck() {
        let store = MemoryStore::default();
        let session = StudySession::open_with(
            Box::new(store.clone()),
            Box::new(Silent),
            Box::new(NoSpeech),
            SessionOptions::default(),
            today(),
            SmallRng::seed_from_u64(1),
        );
        assert!(!session.cards().is_empty());
        assert_eq!(session.view().position, (1, session.cards().len()));
        assert!(store.0.snapshot.borrow().is_some());
    }

    #[test]
    fn test_stored_empty_deck_is_not_reseeded() {
        let store = MemoryStore::default();
        *store.0.snapshot.borrow_mut() = Some((Vec::new(), Stats::default()));
        let session = StudySession::open_with(
            Box::new(store.clone()),
            Box::new(Silent),
            Box::new(NoSpeech),
            SessionOptions::default(),
            today(),
            SmallRng::seed_from_u64(1),
        );
        assert!(session.cards().is_empty());
        assert!(session.current_card().is_none());
    }

    #[test]
    fn test_corrupt_state_falls_back_and_notifies_once() {
        let store = MemoryStore::default();
        store.0.corrupt.set(true);
        let (tx, rx) = mpsc::channel::<Notice>();
        let session = StudySession::open_with(
            Box::new(store.clone()),
            Box::new(tx),
            Box::new(NoSpeech),
            SessionOptions::default(),
            today(),
            SmallRng::seed_from_u64(1),
        );
        assert!(session.cards().is_empty());
        assert_eq!(session.stats(), Stats {
            study_day: Some(today()),
            ..Stats::default()
        });
        let notices: Vec<Notice> = rx.try_iter().collect();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].severity, Severity::Error);
    }

    #[test]
    fn test_add_card_appends_with_defaults() {
        let (store, mut session) = session_with(&["alpha"]);
        let before = session.cards().len();
        let id = session
            .create_card(&CardDraft {
                word: "Test".to_string(),
                definition: "A test".to_string(),
                ..CardDraft::default()
            })
            .unwrap();
        assert_eq!(session.cards().len(), before + 1);
        let card = session.cards().iter().find(|c| c.id == id).unwrap();
        assert_eq!(card.times_studied, 0);
        assert_eq!(card.difficulty, Difficulty::Medium);
        assert_eq!(session.view().position, (1, 2));
        assert_eq!(store.0.snapshot.borrow().as_ref().unwrap().0.len(), 2);
    }

    #[test]
    fn test_invalid_card_changes_nothing() {
        let (store, mut session) = session_with(&["alpha"]);
        let saves = store.0.saves.get();
        let err = session.create_card(&draft("", "general")).unwrap_err();
        assert!(matches!(err, StudyError::Validation { field: "word" }));
        assert_eq!(session.cards().len(), 1);
        assert_eq!(store.0.saves.get(), saves);
    }

    #[test]
    fn test_failed_save_rolls_back_add() {
        let (store, mut session) = session_with(&["alpha"]);
        store.0.fail_saves.set(true);
        assert!(session.create_card(&draft("beta", "general")).is_err());
        assert_eq!(session.cards().len(), 1);
        assert_eq!(session.view().position, (1, 1));
    }

    #[test]
    fn test_added_card_outside_filter_is_not_navigable() {
        let (_store, mut session) = session_with(&["alpha"]);
        session.list_filtered(FilterCriteria {
            category: Some("general".to_string()),
            ..Default::default()
        });
        session.create_card(&draft("bolt", "technical")).unwrap();
        assert_eq!(session.view().position, (1, 1));
        session.create_card(&draft("gamma", "general")).unwrap();
        assert_eq!(session.view().position, (1, 2));
    }

    #[test]
    fn test_delete_unknown_card_is_not_found() {
        let (_store, mut session) = session_with(&["alpha"]);
        let err = session.delete_card(&CardId::new("missing")).unwrap_err();
        assert!(matches!(err, StudyError::NotFound(_)));
        assert_eq!(session.cards().len(), 1);
    }

    #[test]
    fn test_delete_last_card_clamps_index() {
        let (_store, mut session) = session_with(&["a", "b", "c"]);
        session.navigate(Direction::Previous);
        assert_eq!(current_word(&session), "c");
        session.delete_current().unwrap();
        assert_eq!(current_word(&session), "b");
        assert_eq!(session.view().position, (2, 2));
        assert_eq!(session.stats().total_words, 2);
    }

    #[test]
    fn test_failed_save_rolls_back_delete() {
        let (store, mut session) = session_with(&["a", "b", "c"]);
        session.navigate(Direction::Next);
        store.0.fail_saves.set(true);
        assert!(session.delete_current().is_err());
        let words: Vec<_> = session.cards().iter().map(|c| c.word.as_str()).collect();
        assert_eq!(words, vec!["a", "b", "c"]);
        assert_eq!(current_word(&session), "b");
    }

    #[test]
    fn test_next_wraps_from_last_to_first() {
        let (_store, mut session) = session_with(&["A", "B", "C"]);
        session.navigate(Direction::Next);
        session.navigate(Direction::Next);
        assert_eq!(session.view().position, (3, 3));
        session.navigate(Direction::Next);
        assert_eq!(current_word(&session), "A");
    }

    #[test]
    fn test_empty_filter_result_stays_empty() {
        let (_store, mut session) = session_with(&["alpha", "beta"]);
        let result = session.list_filtered(FilterCriteria {
            search_text: "zzz".to_string(),
            ..Default::default()
        });
        assert!(result.is_empty());
        let view = session.view();
        assert!(view.card.is_none());
        assert_eq!(view.position, (0, 0));
        session.navigate(Direction::Next);
        assert_eq!(session.flip(), FlipOutcome::NothingToFlip);

        let result = session.list_filtered(FilterCriteria::default());
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_flip_debounce_drops_rapid_flips() {
        let (_store, mut session) = session_with(&["alpha", "beta"]);
        let t0 = Instant::now();
        assert_eq!(session.flip_at(t0), FlipOutcome::Flipped(true));
        assert_eq!(
            session.flip_at(t0 + Duration::from_millis(100)),
            FlipOutcome::Dropped
        );
        assert!(session.view().flipped);

        session.tick(t0 + Duration::from_millis(600));
        assert_eq!(
            session.flip_at(t0 + Duration::from_millis(650)),
            FlipOutcome::Flipped(false)
        );
    }

    #[test]
    fn test_navigation_clears_flip_and_guard() {
        let (_store, mut session) = session_with(&["alpha", "beta"]);
        let t0 = Instant::now();
        session.flip_at(t0);
        session.navigate(Direction::Next);
        assert!(!session.view().flipped);
        assert_eq!(
            session.flip_at(t0 + Duration::from_millis(10)),
            FlipOutcome::Flipped(true)
        );
    }

    #[test]
    fn test_feedback_available_only_flipped_in_study_mode() {
        let (_store, mut session) = session_with(&["alpha", "beta"]);
        let t0 = Instant::now();
        session.flip_at(t0);
        assert!(!session.feedback_available());
        session.start_study_mode();
        assert!(!session.feedback_available());
        session.flip_at(t0 + Duration::from_secs(1));
        assert!(session.feedback_available());
    }

    #[test]
    fn test_hard_feedback_on_easy_card() {
        let (store, mut session) = session_with(&["alpha", "beta"]);
        let t0 = Instant::now();
        session.submit_feedback_at(Difficulty::Easy, t0, Utc::now()).unwrap();
        session.navigate(Direction::Next);
        session.navigate(Direction::Previous);
        assert_eq!(current_word(&session), "alpha");
        assert_eq!(session.current_card().unwrap().difficulty, Difficulty::Easy);

        let before = session.stats();
        let outcome = session
            .submit_feedback_at(Difficulty::Hard, t0, Utc::now())
            .unwrap();
        assert!(matches!(outcome, FeedbackOutcome::Recorded { .. }));
        let card = session.current_card().unwrap();
        assert_eq!(card.difficulty, Difficulty::Hard);
        assert_eq!(card.incorrect_count, 1);
        assert!(card.is_consistent());
        let after = session.stats();
        assert_eq!(after.total_answers, before.total_answers + 1);
        assert_eq!(after.correct_answers, before.correct_answers);
        assert_eq!(after.accuracy, 50);

        let saved = store.0.snapshot.borrow().clone().unwrap();
        assert_eq!(saved.1.total_answers, 2);
    }

    #[test]
    fn test_feedback_advances_after_delay() {
        let (_store, mut session) = session_with(&["alpha", "beta"]);
        let t0 = Instant::now();
        let outcome = session
            .submit_feedback_at(Difficulty::Medium, t0, Utc::now())
            .unwrap();
        let FeedbackOutcome::Recorded { advance_at, .. } = outcome else {
            panic!("feedback not recorded: {outcome:?}");
        };
        assert_eq!(advance_at, t0 + Duration::from_millis(500));

        session.tick(t0 + Duration::from_millis(499));
        assert_eq!(current_word(&session), "alpha");
        assert!(session.view().advance_pending);
        session.tick(advance_at);
        assert_eq!(current_word(&session), "beta");
        assert!(!session.view().advance_pending);
    }

    #[test]
    fn test_second_feedback_before_advance_is_dropped() {
        let (_store, mut session) = session_with(&["alpha", "beta"]);
        let t0 = Instant::now();
        session.submit_feedback_at(Difficulty::Easy, t0, Utc::now()).unwrap();
        let second = session
            .submit_feedback_at(Difficulty::Hard, t0, Utc::now())
            .unwrap();
        assert_eq!(second, FeedbackOutcome::Dropped);
        assert_eq!(session.stats().total_answers, 1);
    }

    #[test]
    fn test_navigation_cancels_pending_advance() {
        let (_store, mut session) = session_with(&["a", "b", "c"]);
        let t0 = Instant::now();
        session.submit_feedback_at(Difficulty::Easy, t0, Utc::now()).unwrap();
        session.navigate(Direction::Previous);
        assert_eq!(current_word(&session), "c");
        session.tick(t0 + Duration::from_secs(2));
        assert_eq!(current_word(&session), "c");
    }

    #[test]
    fn test_failed_save_rolls_back_feedback() {
        let (store, mut session) = session_with(&["alpha"]);
        store.0.fail_saves.set(true);
        let before_card = session.current_card().unwrap().clone();
        let before_stats = session.stats();
        assert!(
            session
                .submit_feedback_at(Difficulty::Hard, Instant::now(), Utc::now())
                .is_err()
        );
        assert_eq!(session.current_card().unwrap(), &before_card);
        assert_eq!(session.stats(), before_stats);
        assert!(!session.view().advance_pending);
    }

    #[test]
    fn test_feedback_with_no_card() {
        let (_store, mut session) = session_with(&[]);
        let outcome = session.submit_feedback(Difficulty::Easy).unwrap();
        assert_eq!(outcome, FeedbackOutcome::NoCard);
    }

    #[test]
    fn test_shuffle_resets_to_first_and_keeps_cards() {
        let (_store, mut session) = session_with(&["a", "b", "c", "d", "e"]);
        session.navigate(Direction::Next);
        session.shuffle();
        assert_eq!(session.view().position, (1, 5));
        let mut words: Vec<_> = session
            .filtered_cards()
            .iter()
            .map(|c| c.word.clone())
            .collect();
        words.sort();
        assert_eq!(words, vec!["a", "b", "c", "d", "e"]);
        let deck: Vec<_> = session.cards().iter().map(|c| c.word.as_str()).collect();
        assert_eq!(deck, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_streak_increments_when_last_study_was_yesterday() {
        let store = MemoryStore::default();
        let yesterday = today().pred_opt().unwrap();
        *store.0.snapshot.borrow_mut() = Some((
            Vec::new(),
            Stats {
                streak: 4,
                studied_today: 3,
                study_day: Some(yesterday),
                ..Default::default()
            },
        ));
        store.0.last_study_date.set(Some(yesterday));

        let session = open(&store);
        assert_eq!(session.stats().streak, 5);
        assert_eq!(session.stats().best_streak, 5);
        assert_eq!(session.stats().studied_today, 0);
        assert_eq!(store.0.last_study_date.get(), Some(today()));

        let reopened = open(&store);
        assert_eq!(reopened.stats().streak, 5);
    }

    #[test]
    fn test_streak_stable_across_reopens_without_study() {
        let store = MemoryStore::default();
        let yesterday = today().pred_opt().unwrap();
        *store.0.snapshot.borrow_mut() = Some((
            Vec::new(),
            Stats {
                streak: 2,
                best_streak: 2,
                studied_today: 0,
                study_day: Some(today()),
                ..Default::default()
            },
        ));
        store.0.last_study_date.set(Some(yesterday));

        let first = open(&store).stats().streak;
        let second = open(&store).stats().streak;
        let third = open(&store).stats().streak;
        assert_eq!(first, 3);
        assert_eq!(second, first);
        assert_eq!(third, first);
        assert_eq!(store.0.last_study_date.get(), Some(today()));
    }

    #[test]
    fn test_delete_current_on_empty_view_is_none() {
        let (store, mut session) = session_with(&["a"]);
        session.list_filtered(FilterCriteria {
            search_text: "zzz".to_string(),
            ..Default::default()
        });
        let saves = store.0.saves.get();
        assert!(session.delete_current().unwrap().is_none());
        assert_eq!(session.cards().len(), 1);
        assert_eq!(store.0.saves.get(), saves);
    }

    #[test]
    fn test_speech_unavailable_is_a_warning() {
        let store = MemoryStore::default();
        let (tx, rx) = mpsc::channel::<Notice>();
        let mut session = StudySession::open_with(
            Box::new(store),
            Box::new(tx),
            Box::new(NoSpeech),
            SessionOptions::default(),
            today(),
            SmallRng::seed_from_u64(1),
        );
        session.speak_current();
        let notice = rx.try_iter().last().unwrap();
        assert_eq!(notice.severity, Severity::Warning);
    }

    #[test]
    fn test_feedback_records_timestamp() {
        let (_store, mut session) = session_with(&["alpha"]);
        let stamp = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        session
            .submit_feedback_at(Difficulty::Medium, Instant::now(), stamp)
            .unwrap();
        assert_eq!(session.current_card().unwrap().last_studied, Some(stamp));
    }
}
