//! Session statistics aggregation.
//!
//! Turns a most-recent-first session history into a [`StatsSnapshot`]. Every
//! rounding rule lives here so callers display the numbers as-is. Rounding is
//! half-up (ties toward positive infinity), which keeps negative improvement
//! rates identical to the web client's `Math.round`.

use crate::error::EngineError;
use crate::session::{Dimension, SessionRecord};
use crate::streaks::{calculate_streaks, StreakStats};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default number of recent sessions used for dimension averages
pub const DEFAULT_RECENT_WINDOW: usize = 10;

/// Win contribution credited per session
const WIN_CONTRIBUTION: f64 = 0.7;

/// Minimum history length before an improvement rate is shown
pub const MIN_SESSIONS_FOR_IMPROVEMENT: usize = 4;

/// Rounded per-dimension averages over the recent window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionAverages {
    pub vocabulary: u32,
    pub clarity: u32,
    pub persuasion: u32,
}

impl DimensionAverages {
    pub fn get(&self, dimension: Dimension) -> u32 {
        match dimension {
            Dimension::Vocabulary => self.vocabulary,
            Dimension::Clarity => self.clarity,
            Dimension::Persuasion => self.persuasion,
        }
    }
}

/// Why the improvement rate has the value it has
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImprovementStatus {
    /// Rate computed from both halves of the history
    Computed,
    /// Fewer than four sessions; no indicator is shown
    #[default]
    InsufficientHistory,
    /// Older half averages 0, so the percentage has no finite value
    Undefined,
}

/// Derived statistics for one history. Recomputed on every query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_sessions: usize,
    /// Exact mean of all scores, 0 when there are no sessions
    pub overall_average_score: f64,
    /// Session-count placeholder, not a win/loss ratio
    pub win_rate: f64,
    /// Signed percentage change, recent half vs older half
    pub improvement_rate_percent: i64,
    pub improvement_status: ImprovementStatus,
    pub recent_averages: DimensionAverages,
    /// Highest single session score, 0 when there are no sessions
    pub best_score: u8,
    pub total_duration_seconds: u64,
    pub streaks: StreakStats,
}

impl StatsSnapshot {
    /// Whether the presentation layer should show a trend indicator
    pub fn has_improvement_indicator(&self) -> bool {
        self.improvement_status == ImprovementStatus::Computed
    }

    /// Improvement rate that refuses to hide the undefined case.
    ///
    /// Insufficient history still yields 0, matching the lenient value.
    pub fn strict_improvement_rate(&self) -> Result<i64, EngineError> {
        match self.improvement_status {
            ImprovementStatus::Undefined => Err(EngineError::UndefinedMetric(
                "cannot calculate improvement rate: older sessions average 0".to_string(),
            )),
            _ => Ok(self.improvement_rate_percent),
        }
    }
}

/// Compute the stats snapshot for a most-recent-first history
pub fn compute_stats(history: &[SessionRecord], recent_window: usize) -> Result<StatsSnapshot, EngineError> {
    if recent_window == 0 {
        return Err(EngineError::InvalidArgument(
            "recent_window must be at least 1".to_string(),
        ));
    }
    validate_history(history)?;

    let (improvement_rate_percent, improvement_status) = improvement_rate(history);

    Ok(StatsSnapshot {
        total_sessions: history.len(),
        overall_average_score: mean_score(history),
        win_rate: win_rate(history.len()),
        improvement_rate_percent,
        improvement_status,
        recent_averages: recent_averages(history, recent_window),
        best_score: history.iter().map(|s| s.score).max().unwrap_or(0),
        total_duration_seconds: history
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.duration_seconds)),
        streaks: calculate_streaks(history.iter().map(|s| s.date)),
    })
}

fn validate_history(history: &[SessionRecord]) -> Result<(), EngineError> {
    for session in history {
        if let Some((field, value)) = session.out_of_range_field() {
            return Err(EngineError::InvalidArgument(format!(
                "session {}: {} {} is outside 0-100",
                session.id, field, value
            )));
        }
    }
    Ok(())
}

/// `round(n * 0.7 * 100) / 100`, non-decreasing in `n`
pub fn win_rate(total_sessions: usize) -> f64 {
    round_half_up(total_sessions as f64 * WIN_CONTRIBUTION * 100.0) / 100.0
}

/// Improvement of the recent half over the older half.
///
/// The split point is `len / 2`, so for odd lengths the older half holds the
/// extra session.
pub fn improvement_rate(history: &[SessionRecord]) -> (i64, ImprovementStatus) {
    if history.len() < MIN_SESSIONS_FOR_IMPROVEMENT {
        return (0, ImprovementStatus::InsufficientHistory);
    }

    let (recent_half, older_half) = history.split_at(history.len() / 2);
    let recent_avg = mean_score(recent_half);
    let older_avg = mean_score(older_half);

    if older_avg == 0.0 {
        warn!(
            sessions = history.len(),
            "older half averages 0, improvement rate is undefined"
        );
        return (0, ImprovementStatus::Undefined);
    }

    let percent = round_half_up((recent_avg - older_avg) / older_avg * 100.0);
    (percent as i64, ImprovementStatus::Computed)
}

/// Dimension averages over the first `window` sessions.
///
/// Missing sub-scores add 0 to the sum but still count in the divisor.
pub fn recent_averages(history: &[SessionRecord], window: usize) -> DimensionAverages {
    let recent = &history[..window.min(history.len())];
    if recent.is_empty() {
        return DimensionAverages::default();
    }

    let average = |dimension: Dimension| -> u32 {
        let sum: u32 = recent
            .iter()
            .map(|s| s.dimension_score(dimension).unwrap_or(0) as u32)
            .sum();
        round_half_up(sum as f64 / recent.len() as f64) as u32
    };

    DimensionAverages {
        vocabulary: average(Dimension::Vocabulary),
        clarity: average(Dimension::Clarity),
        persuasion: average(Dimension::Persuasion),
    }
}

fn mean_score(sessions: &[SessionRecord]) -> f64 {
    if sessions.is_empty() {
        return 0.0;
    }
    let sum: u64 = sessions.iter().map(|s| s.score as u64).sum();
    sum as f64 / sessions.len() as f64
}

pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
