use chrono::NaiveDate;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreakUpdate {
    pub streak: u32,
    /// Whether `today` should be stored as the last study date.
    pub record_today: bool,
}

/// Daily streak check, run once when a session opens.
///
/// Same day leaves the streak alone, yesterday extends it by one, and any
/// longer gap (or no record at all) restarts it at 1 if anything has been
/// studied, otherwise 0. Applying the result (recording today when asked)
/// makes a second check on the same day a no-op.
pub fn compute_daily_streak(
    today: NaiveDate,
    last_study_date: Option<NaiveDate>,
    studied_today: u32,
    streak: u32,
) -> StreakUpdate {
    let studied = studied_today > 0;
    let yesterday = today.pred_opt();

    let updated = match last_study_date {
        Some(last) if last == today => streak,
        Some(last) if Some(last) == yesterday => streak + 1,
        _ => u32::from(studied),
    };

    // A changed streak must be pinned to today, or the next open on the same
    // day would apply the change again.
    StreakUpdate {
        streak: updated,
        record_today: studied || updated != streak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_same_day_is_unchanged() {
        let today = day(2025, 3, 10);
        let update = compute_daily_streak(today, Some(today), 3, 6);
        assert_eq!(update.streak, 6);
        assert!(update.record_today);
    }

    #[test]
    fn test_yesterday_increments_by_one() {
        let today = day(2025, 3, 10);
        let update = compute_daily_streak(today, Some(day(2025, 3, 9)), 2, 4);
        assert_eq!(update.streak, 5);
        assert!(update.record_today);
    }

    #[test]
    fn test_yesterday_across_month_boundary() {
        let update = compute_daily_streak(day(2025, 3, 1), Some(day(2025, 2, 28)), 1, 1);
        assert_eq!(update.streak, 2);
    }

    #[test]
    fn test_gap_restarts() {
        let today = day(2025, 3, 10);
        assert_eq!(compute_daily_streak(today, Some(day(2025, 3, 7)), 1, 9).streak, 1);
        assert_eq!(compute_daily_streak(today, Some(day(2025, 3, 7)), 0, 9).streak, 0);
    }

    #[test]
    fn test_never_studied() {
        let update = compute_daily_streak(day(2025, 3, 10), None, 0, 0);
        assert_eq!(update.streak, 0);
        assert!(!update.record_today);
    }

    #[test]
    fn test_yesterday_without_study_still_records_today() {
        let today = day(2025, 3, 10);
        let first = compute_daily_streak(today, Some(day(2025, 3, 9)), 0, 4);
        assert_eq!(first.streak, 5);
        assert!(first.record_today);
        let second = compute_daily_streak(today, Some(today), 0, first.streak);
        assert_eq!(second.streak, 5);
    }

    #[test]
    fn test_idempotent_within_a_day() {
        let today = day(2025, 3, 10);
        let first = compute_daily_streak(today, Some(day(2025, 3, 9)), 1, 2);
        let stored = if first.record_today { Some(today) } else { None };
        let second = compute_daily_streak(today, stored, 1, first.streak);
        assert_eq!(first.streak, second.streak);
    }
}
