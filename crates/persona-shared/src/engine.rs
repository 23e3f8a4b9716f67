//! Engine entry point: stats aggregation followed by classification.

use crate::archetype::ArchetypeDefinition;
use crate::classifier::{classify, ArchetypeState, MatchScorer, ProfileDistanceScorer};
use crate::error::EngineError;
use crate::session::SessionRecord;
use crate::stats::{compute_stats, StatsSnapshot, DEFAULT_RECENT_WINDOW};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Engine settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Sessions used for the recent dimension averages
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,
}

fn default_recent_window() -> usize {
    DEFAULT_RECENT_WINDOW
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            recent_window: DEFAULT_RECENT_WINDOW,
        }
    }
}

/// Combined result handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub stats: StatsSnapshot,
    /// One state per catalog entry, catalog order
    pub archetypes: Vec<ArchetypeState>,
}

impl Evaluation {
    /// The best-matching unlocked archetype, if any
    pub fn active(&self) -> Option<&ArchetypeState> {
        self.archetypes.iter().find(|a| a.is_active)
    }

    pub fn unlocked(&self) -> impl Iterator<Item = &ArchetypeState> {
        self.archetypes.iter().filter(|a| !a.is_locked)
    }
}

/// Evaluate with the default profile-distance scorer
pub fn evaluate(
    history: &[SessionRecord],
    catalog: &[ArchetypeDefinition],
    config: &EngineConfig,
) -> Result<Evaluation, EngineError> {
    evaluate_with(history, catalog, config, &ProfileDistanceScorer)
}

/// Evaluate with a caller-supplied best-match scorer
pub fn evaluate_with(
    history: &[SessionRecord],
    catalog: &[ArchetypeDefinition],
    config: &EngineConfig,
    scorer: &dyn MatchScorer,
) -> Result<Evaluation, EngineError> {
    let stats = compute_stats(history, config.recent_window)?;
    let archetypes = classify(history, &stats, catalog, scorer);

    debug!(
        sessions = history.len(),
        archetypes = archetypes.len(),
        unlocked = archetypes.iter().filter(|a| !a.is_locked).count(),
        active = archetypes.iter().find(|a| a.is_active).map(|a| a.archetype_id.as_str()),
        "persona evaluation complete"
    );

    Ok(Evaluation { stats, archetypes })
}
