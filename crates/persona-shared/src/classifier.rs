//! Persona classification.
//!
//! Evaluates every catalog archetype's unlock requirements and marks one
//! unlocked archetype as active. Output order is catalog order. The active
//! archetype is the unlocked one with the highest [`MatchScorer`] score; ties
//! and NaN scores resolve to the earliest archetype in the catalog.

use crate::archetype::{ArchetypeDefinition, UnlockRequirement};
use crate::session::{Dimension, SessionRecord};
use crate::stats::StatsSnapshot;
use serde::Serialize;

/// Lock state of one archetype for one query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchetypeState {
    pub archetype_id: String,
    pub is_locked: bool,
    /// Unmet requirements in catalog order
    pub unmet_requirements: Vec<UnlockRequirement>,
    pub is_active: bool,
    pub requirements_met: usize,
    pub requirements_total: usize,
    /// Best-match score; `None` while locked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
}

impl ArchetypeState {
    /// Fraction of requirements met, 1.0 for requirement-free archetypes
    pub fn progress(&self) -> f64 {
        if self.requirements_total == 0 {
            1.0
        } else {
            self.requirements_met as f64 / self.requirements_total as f64
        }
    }
}

/// Ranks unlocked archetypes. Higher is a better match.
pub trait MatchScorer {
    fn score(&self, archetype: &ArchetypeDefinition, stats: &StatsSnapshot) -> f64;
}

impl<F> MatchScorer for F
where
    F: Fn(&ArchetypeDefinition, &StatsSnapshot) -> f64,
{
    fn score(&self, archetype: &ArchetypeDefinition, stats: &StatsSnapshot) -> f64 {
        self(archetype, stats)
    }
}

/// Negative Euclidean distance between recent dimension averages and the
/// archetype's ideal profile. Archetypes without a profile score -inf.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileDistanceScorer;

impl MatchScorer for ProfileDistanceScorer {
    fn score(&self, archetype: &ArchetypeDefinition, stats: &StatsSnapshot) -> f64 {
        let Some(profile) = archetype.ideal_profile else {
            return f64::NEG_INFINITY;
        };
        let squared: f64 = Dimension::ALL
            .iter()
            .map(|d| {
                let diff = stats.recent_averages.get(*d) as f64 - profile.get(*d);
                diff * diff
            })
            .sum();
        -squared.sqrt()
    }
}

/// Classify a history against a catalog
pub fn classify(
    history: &[SessionRecord],
    stats: &StatsSnapshot,
    catalog: &[ArchetypeDefinition],
    scorer: &dyn MatchScorer,
) -> Vec<ArchetypeState> {
    let mut states: Vec<ArchetypeState> = catalog
        .iter()
        .map(|archetype| evaluate_archetype(archetype, history, stats, scorer))
        .collect();

    if let Some(best) = best_match(&states) {
        states[best].is_active = true;
    }
    states
}

fn evaluate_archetype(
    archetype: &ArchetypeDefinition,
    history: &[SessionRecord],
    stats: &StatsSnapshot,
    scorer: &dyn MatchScorer,
) -> ArchetypeState {
    let unmet: Vec<UnlockRequirement> = archetype
        .requirements
        .iter()
        .filter(|r| !r.is_met(stats, history))
        .cloned()
        .collect();
    let is_locked = !unmet.is_empty();
    let total = archetype.requirements.len();

    ArchetypeState {
        archetype_id: archetype.id.clone(),
        is_locked,
        requirements_met: total - unmet.len(),
        requirements_total: total,
        unmet_requirements: unmet,
        is_active: false,
        match_score: (!is_locked).then(|| scorer.score(archetype, stats)),
    }
}

/// Index of the highest-scoring unlocked state, first wins on ties
fn best_match(states: &[ArchetypeState]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, state) in states.iter().enumerate() {
        let Some(raw) = state.match_score else { continue };
        let score = if raw.is_nan() { f64::NEG_INFINITY } else { raw };
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((idx, score)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Ids unlocked in `current` that were locked or missing in `previous`
pub fn newly_unlocked<'a>(previous: &[ArchetypeState], current: &'a [ArchetypeState]) -> Vec<&'a str> {
    current
        .iter()
        .filter(|state| !state.is_locked)
        .filter(|state| {
            !previous
                .iter()
                .any(|old| old.archetype_id == state.archetype_id && !old.is_locked)
        })
        .map(|state| state.archetype_id.as_str())
        .collect()
}
