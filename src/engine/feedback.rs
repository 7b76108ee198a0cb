use chrono::{DateTime, NaiveDate, Utc};

use crate::deck::card::{Card, Difficulty};
use crate::engine::stats::Stats;

/// Apply one self-rating to a card and the aggregate stats.
///
/// Every rating bumps exactly one of `correct_count` / `incorrect_count`, so
/// `times_studied == correct_count + incorrect_count` holds afterwards.
pub fn record_feedback(
    card: &mut Card,
    stats: &mut Stats,
    rating: Difficulty,
    now: DateTime<Utc>,
    today: NaiveDate,
) {
    card.times_studied += 1;
    card.last_studied = Some(now);

    match rating {
        Difficulty::Easy => {
            card.correct_count += 1;
            card.difficulty = Difficulty::Easy;
        }
        Difficulty::Medium => {
            card.correct_count += 1;
        }
        Difficulty::Hard => {
            card.incorrect_count += 1;
            card.difficulty = Difficulty::Hard;
        }
    }

    stats.roll_over(today);
    stats.total_answers += 1;
    if rating.is_correct() {
        stats.correct_answers += 1;
    }
    stats.studied_today += 1;
    stats.recompute_accuracy();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::card::CardId;

    fn card(difficulty: Difficulty) -> Card {
        Card {
            id: CardId::new("1"),
            word: "Partial".to_string(),
            pronunciation: None,
            definition: "Not complete".to_string(),
            secondary_definition: None,
            example: None,
            category: "general".to_string(),
            word_type: None,
            difficulty,
            times_studied: 0,
            correct_count: 0,
            incorrect_count: 0,
            last_studied: None,
            created: Utc::now(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    #[test]
    fn test_hard_on_easy_card() {
        let mut c = card(Difficulty::Easy);
        let mut stats = Stats::default();
        let now = Utc::now();
        record_feedback(&mut c, &mut stats, Difficulty::Hard, now, today());

        assert_eq!(c.difficulty, Difficulty::Hard);
        assert_eq!(c.incorrect_count, 1);
        assert_eq!(c.correct_count, 0);
        assert_eq!(c.times_studied, 1);
        assert_eq!(c.last_studied, Some(now));
        assert_eq!(stats.total_answers, 1);
        assert_eq!(stats.correct_answers, 0);
        assert_eq!(stats.accuracy, 0);
    }

    #[test]
    fn test_easy_marks_card_easy() {
        let mut c = card(Difficulty::Hard);
        let mut stats = Stats::default();
        record_feedback(&mut c, &mut stats, Difficulty::Easy, Utc::now(), today());
        assert_eq!(c.difficulty, Difficulty::Easy);
        assert_eq!(c.correct_count, 1);
        assert_eq!(stats.correct_answers, 1);
        assert_eq!(stats.accuracy, 100);
    }

    #[test]
    fn test_medium_counts_correct_keeps_difficulty() {
        let mut c = card(Difficulty::Hard);
        let mut stats = Stats::default();
        record_feedback(&mut c, &mut stats, Difficulty::Medium, Utc::now(), today());
        assert_eq!(c.difficulty, Difficulty::Hard);
        assert_eq!(c.correct_count, 1);
        assert_eq!(stats.correct_answers, 1);
    }

    #[test]
    fn test_counters_stay_consistent() {
        let mut c = card(Difficulty::Medium);
        let mut stats = Stats::default();
        let ratings = [
            Difficulty::Easy,
            Difficulty::Hard,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Easy,
        ];
        for rating in ratings {
            record_feedback(&mut c, &mut stats, rating, Utc::now(), today());
            assert!(c.is_consistent());
        }
        assert_eq!(stats.total_answers, 5);
        assert_eq!(stats.correct_answers, 3);
        assert_eq!(stats.studied_today, 5);
        assert_eq!(stats.accuracy, 60);
    }

    #[test]
    fn test_studied_today_restarts_on_new_day() {
        let mut c = card(Difficulty::Medium);
        let mut stats = Stats {
            studied_today: 12,
            study_day: Some(today()),
            ..Default::default()
        };
        let tomorrow = today().succ_opt().unwrap();
        record_feedback(&mut c, &mut stats, Difficulty::Medium, Utc::now(), tomorrow);
        assert_eq!(stats.studied_today, 1);
        assert_eq!(stats.study_day, Some(tomorrow));
    }
}
