//! Practice streaks derived from session dates.
//!
//! Days are UTC calendar days. The current streak is the run ending on the
//! most recent practice day, so the result does not depend on the wall clock.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Streak statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakStats {
    /// Consecutive practice days ending on the latest session day
    pub current_streak_days: u32,
    /// Longest run of consecutive practice days
    pub best_streak_days: u32,
    /// Distinct days with at least one session
    pub active_days: u32,
}

/// Calculate streaks from completion timestamps (any order)
pub fn calculate_streaks<I>(dates: I) -> StreakStats
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let mut days: Vec<NaiveDate> = dates.into_iter().map(|d| d.date_naive()).collect();
    days.sort();
    days.dedup();

    if days.is_empty() {
        return StreakStats::default();
    }

    let mut best = 1u32;
    let mut run = 1u32;
    for pair in days.windows(2) {
        if is_next_day(pair[0], pair[1]) {
            run += 1;
            best = best.max(run);
        } else {
            run = 1;
        }
    }

    StreakStats {
        // `run` ends on the last day after the scan
        current_streak_days: run,
        best_streak_days: best,
        active_days: days.len() as u32,
    }
}

fn is_next_day(earlier: NaiveDate, later: NaiveDate) -> bool {
    earlier.succ_opt() == Some(later)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, d, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_streaks() {
        let stats = calculate_streaks(Vec::new());
        assert_eq!(stats, StreakStats::default());
    }

    #[test]
    fn test_same_day_sessions_count_once() {
        let stats = calculate_streaks(vec![day(5, 9), day(5, 21)]);
        assert_eq!(stats.active_days, 1);
        assert_eq!(stats.best_streak_days, 1);
        assert_eq!(stats.current_streak_days, 1);
    }

    #[test]
    fn test_consecutive_days_most_recent_first() {
        let stats = calculate_streaks(vec![day(7, 10), day(6, 10), day(5, 10)]);
        assert_eq!(stats.active_days, 3);
        assert_eq!(stats.best_streak_days, 3);
        assert_eq!(stats.current_streak_days, 3);
    }

    #[test]
    fn test_broken_streak() {
        // 1,2,3 then gap then 10,11
        let stats = calculate_streaks(vec![day(11, 8), day(10, 8), day(3, 8), day(2, 8), day(1, 8)]);
        assert_eq!(stats.active_days, 5);
        assert_eq!(stats.best_streak_days, 3);
        assert_eq!(stats.current_streak_days, 2);
    }

    #[test]
    fn test_streak_across_month_boundary() {
        let jan31 = Utc.with_ymd_and_hms(2026, 1, 31, 12, 0, 0).unwrap();
        let feb1 = Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap();
        let stats = calculate_streaks(vec![feb1, jan31]);
        assert_eq!(stats.best_streak_days, 2);
    }
}
