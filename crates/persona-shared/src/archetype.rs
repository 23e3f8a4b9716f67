//! Archetype catalog: debating-style profiles and their unlock rules.
//!
//! Unlock rules are data. Each [`UnlockRequirement`] pairs a display label with
//! a predicate from a closed set of kinds, so catalogs can be shipped as TOML
//! or JSON. [`RequirementKind::Custom`] wraps an in-process function for rules
//! the closed set does not cover; it cannot be loaded from a file.

use crate::error::EngineError;
use crate::session::{Dimension, SessionRecord};
use crate::stats::{ImprovementStatus, StatsSnapshot};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::sync::Arc;

type PredicateFn = dyn Fn(&StatsSnapshot, &[SessionRecord]) -> bool + Send + Sync;

/// Pluggable predicate for `RequirementKind::Custom`.
///
/// Two custom predicates are equal only if they share the same function.
/// Serializes as its label.
#[derive(Clone)]
pub struct CustomPredicate {
    pub label: String,
    check: Arc<PredicateFn>,
}

impl CustomPredicate {
    pub fn new<F>(label: &str, check: F) -> Self
    where
        F: Fn(&StatsSnapshot, &[SessionRecord]) -> bool + Send + Sync + 'static,
    {
        Self {
            label: label.to_string(),
            check: Arc::new(check),
        }
    }

    pub fn check(&self, stats: &StatsSnapshot, history: &[SessionRecord]) -> bool {
        (self.check)(stats, history)
    }
}

impl std::fmt::Debug for CustomPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomPredicate").field("label", &self.label).finish()
    }
}

impl PartialEq for CustomPredicate {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && Arc::ptr_eq(&self.check, &other.check)
    }
}

impl Serialize for CustomPredicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label)
    }
}

/// Predicate kinds an unlock requirement can use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequirementKind {
    /// At least `count` sessions in the history
    MinSessionCount { count: usize },
    /// Overall average score of at least `score`
    MinAverageScore { score: f64 },
    /// Computed improvement rate of at least `percent`
    MinImprovementRate { percent: i64 },
    MinWinRate { rate: f64 },
    /// Recent-window average for one dimension of at least `score`
    MinRecentAverage { dimension: Dimension, score: u32 },
    /// Any single session scoring at least `score`
    MinBestScore { score: u8 },
    /// Best practice streak of at least `days`
    MinPracticeStreak { days: u32 },
    MinTotalPracticeMinutes { minutes: u64 },
    #[serde(skip_deserializing)]
    Custom { predicate: CustomPredicate },
}

impl RequirementKind {
    /// Evaluate against a snapshot and the history it was computed from
    pub fn is_met(&self, stats: &StatsSnapshot, history: &[SessionRecord]) -> bool {
        match self {
            RequirementKind::MinSessionCount { count } => history.len() >= *count,
            RequirementKind::MinAverageScore { score } => stats.overall_average_score >= *score,
            RequirementKind::MinImprovementRate { percent } => {
                stats.improvement_status == ImprovementStatus::Computed
                    && stats.improvement_rate_percent >= *percent
            }
            RequirementKind::MinWinRate { rate } => stats.win_rate >= *rate,
            RequirementKind::MinRecentAverage { dimension, score } => {
                stats.recent_averages.get(*dimension) >= *score
            }
            RequirementKind::MinBestScore { score } => history.iter().any(|s| s.score >= *score),
            RequirementKind::MinPracticeStreak { days } => stats.streaks.best_streak_days >= *days,
            RequirementKind::MinTotalPracticeMinutes { minutes } => {
                stats.total_duration_seconds / 60 >= *minutes
            }
            RequirementKind::Custom { predicate } => predicate.check(stats, history),
        }
    }
}

/// One gate on an archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlockRequirement {
    /// Human-readable text shown on the lock overlay
    pub label: String,
    pub rule: RequirementKind,
}

impl UnlockRequirement {
    pub fn new(label: &str, rule: RequirementKind) -> Self {
        Self { label: label.to_string(), rule }
    }

    pub fn is_met(&self, stats: &StatsSnapshot, history: &[SessionRecord]) -> bool {
        self.rule.is_met(stats, history)
    }
}

/// Target dimension averages an archetype represents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionProfile {
    pub vocabulary: f64,
    pub clarity: f64,
    pub persuasion: f64,
}

impl DimensionProfile {
    pub const fn new(vocabulary: f64, clarity: f64, persuasion: f64) -> Self {
        Self { vocabulary, clarity, persuasion }
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Vocabulary => self.vocabulary,
            Dimension::Clarity => self.clarity,
            Dimension::Persuasion => self.persuasion,
        }
    }
}

/// Archetype as configured in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeDefinition {
    pub id: String,
    pub name: String,
    /// Icon identifier resolved by the presentation layer
    pub icon: String,
    pub color: String,
    pub description: String,
    /// Checked in order; all must hold to unlock
    #[serde(default)]
    pub requirements: Vec<UnlockRequirement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ideal_profile: Option<DimensionProfile>,
}

impl ArchetypeDefinition {
    pub fn new(id: &str, name: &str, icon: &str, color: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            description: description.to_string(),
            requirements: Vec::new(),
            ideal_profile: None,
        }
    }

    pub fn require(mut self, label: &str, rule: RequirementKind) -> Self {
        self.requirements.push(UnlockRequirement::new(label, rule));
        self
    }

    pub fn with_profile(mut self, profile: DimensionProfile) -> Self {
        self.ideal_profile = Some(profile);
        self
    }
}

/// Ordered archetype list; order is display order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeCatalog {
    #[serde(default)]
    pub archetypes: Vec<ArchetypeDefinition>,
}

impl ArchetypeCatalog {
    pub fn new(archetypes: Vec<ArchetypeDefinition>) -> Self {
        Self { archetypes }
    }

    /// Parse and validate a TOML catalog (`[[archetypes]]` tables)
    pub fn from_toml_str(contents: &str) -> Result<Self, EngineError> {
        let catalog: ArchetypeCatalog =
            toml::from_str(contents).map_err(|e| EngineError::Catalog(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse and validate a JSON catalog
    pub fn from_json_str(contents: &str) -> Result<Self, EngineError> {
        let catalog: ArchetypeCatalog = serde_json::from_str(contents)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn to_toml_string(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self).map_err(|e| EngineError::Catalog(e.to_string()))
    }

    /// Ids must be non-empty and unique
    pub fn validate(&self) -> Result<(), EngineError> {
        let mut seen = HashSet::new();
        for archetype in &self.archetypes {
            if archetype.id.trim().is_empty() {
                return Err(EngineError::Catalog(format!(
                    "archetype '{}' has an empty id",
                    archetype.name
                )));
            }
            if !seen.insert(archetype.id.as_str()) {
                return Err(EngineError::Catalog(format!(
                    "duplicate archetype id '{}'",
                    archetype.id
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&ArchetypeDefinition> {
        self.archetypes.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }
}

/// Built-in debate archetypes
pub fn default_catalog() -> ArchetypeCatalog {
    use RequirementKind::*;

    ArchetypeCatalog::new(vec![
        ArchetypeDefinition::new(
            "novice",
            "The Novice",
            "mic",
            "#94a3b8",
            "Every debater starts here. Finish sessions to discover your style.",
        ),
        ArchetypeDefinition::new(
            "wordsmith",
            "The Wordsmith",
            "book-open",
            "#8b5cf6",
            "Rich, precise vocabulary that makes every argument land.",
        )
        .require("Complete 3 sessions", MinSessionCount { count: 3 })
        .require(
            "Average 70+ vocabulary over recent sessions",
            MinRecentAverage { dimension: Dimension::Vocabulary, score: 70 },
        )
        .with_profile(DimensionProfile::new(85.0, 65.0, 60.0)),
        ArchetypeDefinition::new(
            "clear_communicator",
            "The Clear Communicator",
            "message-circle",
            "#0ea5e9",
            "Structured, easy-to-follow arguments the judges never lose track of.",
        )
        .require("Complete 3 sessions", MinSessionCount { count: 3 })
        .require(
            "Average 70+ clarity over recent sessions",
            MinRecentAverage { dimension: Dimension::Clarity, score: 70 },
        )
        .with_profile(DimensionProfile::new(60.0, 85.0, 65.0)),
        ArchetypeDefinition::new(
            "persuader",
            "The Persuader",
            "target",
            "#ef4444",
            "Wins the room by moving people, not just informing them.",
        )
        .require("Complete 3 sessions", MinSessionCount { count: 3 })
        .require(
            "Average 70+ persuasion over recent sessions",
            MinRecentAverage { dimension: Dimension::Persuasion, score: 70 },
        )
        .with_profile(DimensionProfile::new(60.0, 65.0, 85.0)),
        ArchetypeDefinition::new(
            "rising_star",
            "The Rising Star",
            "trending-up",
            "#f59e0b",
            "Improving fast. Recent sessions clearly beat the early ones.",
        )
        .require("Complete 4 sessions", MinSessionCount { count: 4 })
        .require("Improve your scores by 10% or more", MinImprovementRate { percent: 10 })
        .with_profile(DimensionProfile::new(70.0, 70.0, 70.0)),
        ArchetypeDefinition::new(
            "veteran",
            "The Seasoned Veteran",
            "award",
            "#10b981",
            "Hours at the podium and consistently strong results.",
        )
        .require("Complete 20 sessions", MinSessionCount { count: 20 })
        .require("Keep an average score of 75+", MinAverageScore { score: 75.0 })
        .require("Practice for 120 minutes in total", MinTotalPracticeMinutes { minutes: 120 })
        .with_profile(DimensionProfile::new(80.0, 80.0, 80.0)),
        ArchetypeDefinition::new(
            "iron_will",
            "Iron Will",
            "flame",
            "#f97316",
            "Shows up every day. Discipline is its own debating skill.",
        )
        .require("Practice 7 days in a row", MinPracticeStreak { days: 7 })
        .require("Score 90+ in a single session", MinBestScore { score: 90 })
        .with_profile(DimensionProfile::new(75.0, 75.0, 75.0)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_valid() {
        let catalog = default_catalog();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.archetypes[0].id, "novice");
        assert!(catalog.archetypes[0].requirements.is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let catalog = ArchetypeCatalog::new(vec![
            ArchetypeDefinition::new("a", "A", "x", "#000", ""),
            ArchetypeDefinition::new("a", "A again", "x", "#000", ""),
        ]);
        assert!(matches!(catalog.validate(), Err(EngineError::Catalog(_))));
    }

    #[test]
    fn test_toml_round_trip_of_default_catalog() {
        let catalog = default_catalog();
        let text = catalog.to_toml_string().unwrap();
        let parsed = ArchetypeCatalog::from_toml_str(&text).unwrap();
        assert_eq!(parsed, catalog);
    }

    #[test]
    fn test_toml_catalog() {
        let text = r##"
[[archetypes]]
id = "closer"
name = "The Closer"
icon = "lock"
color = "#111111"
description = "Finishes strong."

[[archetypes.requirements]]
label = "Score 95+ once"
rule = { type = "min_best_score", score = 95 }

[[archetypes.requirements]]
label = "Recent persuasion 80+"
rule = { type = "min_recent_average", dimension = "persuasion", score = 80 }
"##;
        let catalog = ArchetypeCatalog::from_toml_str(text).unwrap();
        let closer = catalog.get("closer").unwrap();
        assert_eq!(closer.requirements.len(), 2);
        assert_eq!(closer.requirements[0].rule, RequirementKind::MinBestScore { score: 95 });
        assert!(closer.ideal_profile.is_none());
    }

    #[test]
    fn test_custom_rule_cannot_be_loaded() {
        let json = r#"{"archetypes":[{"id":"x","name":"X","icon":"i","color":"c","description":"d",
            "requirements":[{"label":"l","rule":{"type":"custom","predicate":"l"}}]}]}"#;
        assert!(ArchetypeCatalog::from_json_str(json).is_err());
    }

    #[test]
    fn test_custom_predicate_serializes_as_label() {
        let rule = RequirementKind::Custom {
            predicate: CustomPredicate::new("weekend warrior", |_, _| true),
        };
        let json = serde_json::to_string(&rule).unwrap();
        assert_eq!(json, r#"{"type":"custom","predicate":"weekend warrior"}"#);
    }

    #[test]
    fn test_custom_predicate_equality_is_by_function() {
        let a = CustomPredicate::new("same", |_, _| true);
        let b = CustomPredicate::new("same", |_, _| true);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
