use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Aggregate study statistics. Missing fields in stored data fall back to
/// their defaults, so older records load cleanly.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub total_words: usize,
    pub studied_today: u32,
    pub streak: u32,
    pub accuracy: u8,
    pub correct_answers: u32,
    pub total_answers: u32,
    pub best_streak: u32,
    /// Calendar day that `studied_today` counts for.
    pub study_day: Option<NaiveDate>,
}

impl Stats {
    pub fn recompute_accuracy(&mut self) {
        self.accuracy = accuracy_percent(self.correct_answers, self.total_answers);
    }

    /// Reset the daily counter when it belongs to an earlier day.
    pub fn roll_over(&mut self, today: NaiveDate) {
        if self.study_day != Some(today) {
            self.studied_today = 0;
            self.study_day = Some(today);
        }
    }
}

pub fn accuracy_percent(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = correct.min(total);
    (100.0 * correct as f64 / total as f64).round() as u8
}
