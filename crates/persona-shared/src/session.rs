//! Practice session records.
//!
//! Records are produced by the session-completion flow and are read-only here.
//! Histories are always ordered most-recent-first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Highest value any score may take
pub const MAX_SCORE: u8 = 100;

/// One completed practice session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque unique identifier
    pub id: String,
    /// Debate topic (free text)
    pub topic: String,
    /// Completion time
    pub date: DateTime<Utc>,
    /// Session length in seconds
    #[serde(default)]
    pub duration_seconds: u64,
    /// Overall score (0-100)
    pub score: u8,
    /// Vocabulary sub-score, absent when not measured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary_score: Option<u8>,
    /// Clarity sub-score, absent when not measured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarity_score: Option<u8>,
    /// Persuasion sub-score, absent when not measured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persuasion_score: Option<u8>,
}

impl SessionRecord {
    /// Create a record with no sub-scores
    pub fn new(id: &str, topic: &str, date: DateTime<Utc>, score: u8) -> Self {
        Self {
            id: id.to_string(),
            topic: topic.to_string(),
            date,
            duration_seconds: 0,
            score,
            vocabulary_score: None,
            clarity_score: None,
            persuasion_score: None,
        }
    }

    pub fn with_duration(mut self, seconds: u64) -> Self {
        self.duration_seconds = seconds;
        self
    }

    pub fn with_vocabulary(mut self, score: u8) -> Self {
        self.vocabulary_score = Some(score);
        self
    }

    pub fn with_clarity(mut self, score: u8) -> Self {
        self.clarity_score = Some(score);
        self
    }

    pub fn with_persuasion(mut self, score: u8) -> Self {
        self.persuasion_score = Some(score);
        self
    }

    /// Sub-score for a dimension, `None` when not measured
    pub fn dimension_score(&self, dimension: Dimension) -> Option<u8> {
        match dimension {
            Dimension::Vocabulary => self.vocabulary_score,
            Dimension::Clarity => self.clarity_score,
            Dimension::Persuasion => self.persuasion_score,
        }
    }

    /// First score field outside 0-100, if any
    pub(crate) fn out_of_range_field(&self) -> Option<(&'static str, u8)> {
        if self.score > MAX_SCORE {
            return Some(("score", self.score));
        }
        Dimension::ALL.iter().find_map(|d| {
            self.dimension_score(*d)
                .filter(|v| *v > MAX_SCORE)
                .map(|v| (d.field_name(), v))
        })
    }
}

/// Scored skill dimension of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Vocabulary,
    Clarity,
    Persuasion,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Vocabulary, Dimension::Clarity, Dimension::Persuasion];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Vocabulary => "vocabulary",
            Dimension::Clarity => "clarity",
            Dimension::Persuasion => "persuasion",
        }
    }

    fn field_name(&self) -> &'static str {
        match self {
            Dimension::Vocabulary => "vocabulary_score",
            Dimension::Clarity => "clarity_score",
            Dimension::Persuasion => "persuasion_score",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_missing_sub_scores_deserialize_as_none() {
        let json = r#"{"id":"s1","topic":"Free trade","date":"2026-03-01T18:00:00Z","score":72}"#;
        let record: SessionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.score, 72);
        assert_eq!(record.duration_seconds, 0);
        assert!(record.vocabulary_score.is_none());
        assert!(record.dimension_score(Dimension::Clarity).is_none());
    }

    #[test]
    fn test_absent_sub_scores_not_serialized() {
        let record = SessionRecord::new("s1", "Nuclear energy", at(2), 80).with_clarity(70);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("clarity_score"));
        assert!(!json.contains("vocabulary_score"));
    }

    #[test]
    fn test_out_of_range_field() {
        let ok = SessionRecord::new("s1", "t", at(1), 100).with_persuasion(100);
        assert!(ok.out_of_range_field().is_none());

        let bad = SessionRecord::new("s2", "t", at(1), 90).with_clarity(101);
        assert_eq!(bad.out_of_range_field(), Some(("clarity_score", 101)));

        let bad_score = SessionRecord::new("s3", "t", at(1), 150);
        assert_eq!(bad_score.out_of_range_field(), Some(("score", 150)));
    }
}
