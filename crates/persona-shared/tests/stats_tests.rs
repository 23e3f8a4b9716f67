//! Tests for session statistics aggregation.

use chrono::{DateTime, Duration, TimeZone, Utc};
use persona_shared::stats::{compute_stats, improvement_rate, recent_averages, win_rate};
use persona_shared::{EngineError, ImprovementStatus, SessionRecord};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 20, 19, 0, 0).unwrap()
}

/// Sessions one day apart, most recent first
fn history(scores: &[u8]) -> Vec<SessionRecord> {
    scores
        .iter()
        .enumerate()
        .map(|(i, score)| {
            SessionRecord::new(&format!("s{}", i), "Motion", base() - Duration::days(i as i64), *score)
        })
        .collect()
}

#[test]
fn test_empty_history_defaults() {
    let stats = compute_stats(&[], 10).unwrap();
    assert_eq!(stats.total_sessions, 0);
    assert_eq!(stats.overall_average_score, 0.0);
    assert_eq!(stats.win_rate, 0.0);
    assert_eq!(stats.improvement_rate_percent, 0);
    assert_eq!(stats.improvement_status, ImprovementStatus::InsufficientHistory);
    assert_eq!(stats.recent_averages.vocabulary, 0);
    assert_eq!(stats.recent_averages.clarity, 0);
    assert_eq!(stats.recent_averages.persuasion, 0);
    assert_eq!(stats.best_score, 0);
    assert_eq!(stats.streaks.active_days, 0);
    assert!(!stats.has_improvement_indicator());
}

#[test]
fn test_overall_average_is_exact_mean() {
    let stats = compute_stats(&history(&[90, 75, 62]), 10).unwrap();
    assert!((stats.overall_average_score - 227.0 / 3.0).abs() < 1e-9);
    assert_eq!(stats.best_score, 90);
}

#[test]
fn test_win_rate_matches_formula() {
    for n in 0..40usize {
        let scores = vec![50u8; n];
        let stats = compute_stats(&history(&scores), 10).unwrap();
        let expected = ((n as f64 * 0.7 * 100.0) + 0.5).floor() / 100.0;
        assert!((stats.win_rate - expected).abs() < 1e-9, "n = {}", n);
        assert!((stats.win_rate - win_rate(n)).abs() < 1e-12);
    }
}

#[test]
fn test_short_history_has_no_improvement() {
    for len in 0..4 {
        let scores = vec![10u8; len];
        let (rate, status) = improvement_rate(&history(&scores));
        assert_eq!(rate, 0);
        assert_eq!(status, ImprovementStatus::InsufficientHistory);
    }
}

#[test]
fn test_improvement_example() {
    let stats = compute_stats(&history(&[80, 60, 40, 20]), 10).unwrap();
    assert_eq!(stats.improvement_rate_percent, 133);
    assert_eq!(stats.improvement_status, ImprovementStatus::Computed);
    assert!(stats.has_improvement_indicator());
}

#[test]
fn test_decline_is_negative() {
    // recent 30, older 70 -> -57.14
    let (rate, status) = improvement_rate(&history(&[20, 40, 60, 80]));
    assert_eq!(rate, -57);
    assert_eq!(status, ImprovementStatus::Computed);
}

#[test]
fn test_negative_half_rounds_toward_positive() {
    // recent 39.5, older 40 -> -1.25
    let (rate, _) = improvement_rate(&history(&[39, 40, 40, 40]));
    assert_eq!(rate, -1);
}

#[test]
fn test_odd_history_gives_older_half_the_extra_session() {
    // mid = 2: recent [90, 90] avg 90, older [60, 60, 30] avg 50 -> 80%
    let (rate, status) = improvement_rate(&history(&[90, 90, 60, 60, 30]));
    assert_eq!(status, ImprovementStatus::Computed);
    assert_eq!(rate, 80);
}

#[test]
fn test_zero_older_average_is_undefined() {
    let stats = compute_stats(&history(&[50, 70, 0, 0]), 10).unwrap();
    assert_eq!(stats.improvement_rate_percent, 0);
    assert_eq!(stats.improvement_status, ImprovementStatus::Undefined);
    assert!(!stats.has_improvement_indicator());
    assert!(matches!(
        stats.strict_improvement_rate(),
        Err(EngineError::UndefinedMetric(_))
    ));
}

#[test]
fn test_strict_rate_passes_through_computed_values() {
    let stats = compute_stats(&history(&[80, 60, 40, 20]), 10).unwrap();
    assert_eq!(stats.strict_improvement_rate().unwrap(), 133);
    let short = compute_stats(&history(&[80]), 10).unwrap();
    assert_eq!(short.strict_improvement_rate().unwrap(), 0);
}

#[test]
fn test_recent_average_counts_missing_in_divisor() {
    let mut sessions = history(&[70, 70, 70]);
    sessions[0].vocabulary_score = Some(90);
    sessions[2].vocabulary_score = Some(60);
    let averages = recent_averages(&sessions, 3);
    assert_eq!(averages.vocabulary, 50);
    assert_eq!(averages.clarity, 0);
}

#[test]
fn test_recent_window_limits_sessions() {
    let mut sessions = history(&[70, 70, 70, 70]);
    sessions[0].clarity_score = Some(80);
    sessions[1].clarity_score = Some(60);
    sessions[2].clarity_score = Some(10);
    sessions[3].clarity_score = Some(10);
    let stats = compute_stats(&sessions, 2).unwrap();
    assert_eq!(stats.recent_averages.clarity, 70);
}

#[test]
fn test_window_larger_than_history_uses_history_length() {
    let mut sessions = history(&[70, 70]);
    sessions[0].persuasion_score = Some(81);
    sessions[1].persuasion_score = Some(80);
    let stats = compute_stats(&sessions, 10).unwrap();
    // 80.5 rounds up
    assert_eq!(stats.recent_averages.persuasion, 81);
}

#[test]
fn test_zero_window_is_invalid() {
    let err = compute_stats(&history(&[50]), 0).unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));
}

#[test]
fn test_out_of_range_score_is_invalid() {
    let mut sessions = history(&[50, 60]);
    sessions[1].vocabulary_score = Some(120);
    let err = compute_stats(&sessions, 10).unwrap_err();
    match err {
        EngineError::InvalidArgument(msg) => {
            assert!(msg.contains("s1"));
            assert!(msg.contains("vocabulary_score"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_duration_and_streaks() {
    let sessions: Vec<SessionRecord> = history(&[60, 60, 60])
        .into_iter()
        .map(|s| s.with_duration(600))
        .collect();
    let stats = compute_stats(&sessions, 10).unwrap();
    assert_eq!(stats.total_duration_seconds, 1800);
    assert_eq!(stats.streaks.best_streak_days, 3);
    assert_eq!(stats.streaks.current_streak_days, 3);
}

#[test]
fn test_snapshot_serializes_snake_case() {
    let stats = compute_stats(&history(&[80, 60, 40, 20]), 10).unwrap();
    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["improvement_rate_percent"], 133);
    assert_eq!(json["improvement_status"], "computed");
    assert!(json["recent_averages"]["vocabulary"].is_number());
}
