//! Session source seam and persisted-summary comparison.
//!
//! The session store is external. It hands over the history and, separately,
//! a coarse persisted summary ([`UserStats`]). The two are never merged:
//! [`compare_with_persisted`] reports where they disagree and leaves the
//! decision to the caller.

use crate::error::EngineError;
use crate::session::SessionRecord;
use crate::stats::StatsSnapshot;
use serde::{Deserialize, Serialize};

/// Tolerance when comparing averages (score points)
const AVERAGE_TOLERANCE: f64 = 0.5;

/// Tolerance when comparing win rates
const WIN_RATE_TOLERANCE: f64 = 0.005;

/// Coarse summary kept by the session store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(default)]
    pub total_sessions: usize,
    #[serde(default)]
    pub average_score: f64,
    #[serde(default)]
    pub win_rate: f64,
    #[serde(default)]
    pub streak_days: u32,
}

/// Read-only provider of session data
pub trait SessionSource {
    /// Sessions ordered most-recent-first
    fn history(&self) -> Result<Vec<SessionRecord>, EngineError>;

    /// Persisted summary, if the store keeps one
    fn persisted_stats(&self) -> Result<Option<UserStats>, EngineError>;
}

/// Source backed by owned vectors
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    sessions: Vec<SessionRecord>,
    stats: Option<UserStats>,
}

impl InMemorySource {
    /// Sessions may be in any order; they are stored most-recent-first
    pub fn new(mut sessions: Vec<SessionRecord>) -> Self {
        sessions.sort_by(|a, b| b.date.cmp(&a.date));
        Self { sessions, stats: None }
    }

    pub fn with_stats(mut self, stats: UserStats) -> Self {
        self.stats = Some(stats);
        self
    }
}

impl SessionSource for InMemorySource {
    fn history(&self) -> Result<Vec<SessionRecord>, EngineError> {
        Ok(self.sessions.clone())
    }

    fn persisted_stats(&self) -> Result<Option<UserStats>, EngineError> {
        Ok(self.stats.clone())
    }
}

/// A field where the persisted summary and the fresh snapshot differ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsDiscrepancy {
    pub field: &'static str,
    pub persisted: f64,
    pub computed: f64,
}

/// List the fields where `persisted` disagrees with `snapshot`
pub fn compare_with_persisted(snapshot: &StatsSnapshot, persisted: &UserStats) -> Vec<StatsDiscrepancy> {
    let mut out = Vec::new();

    if persisted.total_sessions != snapshot.total_sessions {
        out.push(StatsDiscrepancy {
            field: "total_sessions",
            persisted: persisted.total_sessions as f64,
            computed: snapshot.total_sessions as f64,
        });
    }
    if (persisted.average_score - snapshot.overall_average_score).abs() > AVERAGE_TOLERANCE {
        out.push(StatsDiscrepancy {
            field: "average_score",
            persisted: persisted.average_score,
            computed: snapshot.overall_average_score,
        });
    }
    if (persisted.win_rate - snapshot.win_rate).abs() > WIN_RATE_TOLERANCE {
        out.push(StatsDiscrepancy {
            field: "win_rate",
            persisted: persisted.win_rate,
            computed: snapshot.win_rate,
        });
    }
    if persisted.streak_days != snapshot.streaks.current_streak_days {
        out.push(StatsDiscrepancy {
            field: "streak_days",
            persisted: persisted.streak_days as f64,
            computed: snapshot.streaks.current_streak_days as f64,
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_in_memory_source_orders_most_recent_first() {
        let old = SessionRecord::new("old", "t", Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(), 50);
        let new = SessionRecord::new("new", "t", Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(), 70);
        let source = InMemorySource::new(vec![old, new]);
        let history = source.history().unwrap();
        assert_eq!(history[0].id, "new");
        assert_eq!(history[1].id, "old");
        assert!(source.persisted_stats().unwrap().is_none());
    }

    #[test]
    fn test_matching_summary_has_no_discrepancies() {
        let snapshot = StatsSnapshot {
            total_sessions: 3,
            overall_average_score: 70.2,
            win_rate: 2.1,
            ..Default::default()
        };
        let persisted = UserStats {
            total_sessions: 3,
            average_score: 70.0,
            win_rate: 2.1,
            streak_days: 0,
        };
        assert!(compare_with_persisted(&snapshot, &persisted).is_empty());
    }

    #[test]
    fn test_discrepancies_reported_per_field() {
        let snapshot = StatsSnapshot {
            total_sessions: 5,
            overall_average_score: 80.0,
            win_rate: 3.5,
            ..Default::default()
        };
        let persisted = UserStats {
            total_sessions: 4,
            average_score: 78.0,
            win_rate: 3.5,
            streak_days: 0,
        };
        let diffs = compare_with_persisted(&snapshot, &persisted);
        let fields: Vec<_> = diffs.iter().map(|d| d.field).collect();
        assert_eq!(fields, vec!["total_sessions", "average_score"]);
    }
}
