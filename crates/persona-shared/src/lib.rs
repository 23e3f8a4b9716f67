//! Session analytics and persona classification for debate practice.
//!
//! Turns a most-recent-first session history into aggregate statistics and a
//! set of archetype lock states. Everything here is a pure function of its
//! inputs; nothing is cached or persisted between calls.

pub mod archetype;
pub mod cache;
pub mod classifier;
pub mod engine;
pub mod error;
pub mod error_category;
pub mod session;
pub mod source;
pub mod stats;
pub mod streaks;

pub use archetype::{
    default_catalog, ArchetypeCatalog, ArchetypeDefinition, CustomPredicate, DimensionProfile,
    RequirementKind, UnlockRequirement,
};
pub use cache::EvaluationCache;
pub use classifier::{classify, newly_unlocked, ArchetypeState, MatchScorer, ProfileDistanceScorer};
pub use engine::{evaluate, evaluate_with, EngineConfig, Evaluation};
pub use error::EngineError;
pub use error_category::{categorize, ErrorCategory};
pub use session::{Dimension, SessionRecord};
pub use source::{compare_with_persisted, InMemorySource, SessionSource, StatsDiscrepancy, UserStats};
pub use stats::{compute_stats, DimensionAverages, ImprovementStatus, StatsSnapshot};
pub use streaks::StreakStats;
