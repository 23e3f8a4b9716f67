//! Command implementations. Each returns the rendered output so `main` only prints.

use crate::config::{OutputFormat, PersonaConfig};
use crate::history::JsonFileSource;
use anyhow::{Context, Result};
use persona_shared::{
    categorize, compare_with_persisted, default_catalog, evaluate, ArchetypeCatalog, Evaluation,
    ImprovementStatus, SessionSource, StatsDiscrepancy, StatsSnapshot,
};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Evaluation plus any disagreement with the store's persisted summary
#[derive(Debug, Serialize)]
pub struct EvaluationReport {
    #[serde(flatten)]
    pub evaluation: Evaluation,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub discrepancies: Vec<StatsDiscrepancy>,
}

#[derive(Serialize)]
struct CategoryReport<'a> {
    category: persona_shared::ErrorCategory,
    title: &'a str,
    message: &'a str,
}

/// Load a catalog file, or the built-in catalog when no path is given.
/// `.json` files are parsed as JSON, anything else as TOML.
pub fn load_catalog(path: Option<&Path>) -> Result<ArchetypeCatalog> {
    let Some(path) = path else {
        return Ok(default_catalog());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    let is_json = path.extension().map(|ext| ext == "json").unwrap_or(false);
    let catalog = if is_json {
        ArchetypeCatalog::from_json_str(&contents)
    } else {
        ArchetypeCatalog::from_toml_str(&contents)
    }
    .with_context(|| format!("Invalid catalog {}", path.display()))?;
    info!(path = %path.display(), archetypes = catalog.len(), "loaded catalog");
    Ok(catalog)
}

/// Evaluate a history file against the configured catalog
pub fn build_report(history_path: &Path, config: &PersonaConfig) -> Result<(EvaluationReport, ArchetypeCatalog)> {
    let catalog = load_catalog(config.catalog_path.as_deref())?;
    let source = JsonFileSource::open(history_path).context("Failed to load session history")?;
    let history = source.history().context("Failed to load session history")?;
    let persisted = source.persisted_stats().context("Failed to load persisted stats")?;

    let evaluation = evaluate(&history, &catalog.archetypes, &config.engine)
        .context("Failed to calculate persona")?;

    let discrepancies = persisted
        .map(|stats| compare_with_persisted(&evaluation.stats, &stats))
        .unwrap_or_default();
    for d in &discrepancies {
        warn!(field = d.field, persisted = d.persisted, computed = d.computed, "persisted stats disagree with history");
    }

    Ok((EvaluationReport { evaluation, discrepancies }, catalog))
}

pub fn evaluate_command(history_path: &Path, config: &PersonaConfig) -> Result<String> {
    let (report, catalog) = build_report(history_path, config)?;
    match config.output.format {
        OutputFormat::Json => to_json(&report),
        OutputFormat::Text => {
            let mut out = render_stats(&report.evaluation.stats);
            out.push('\n');
            out.push_str(&render_archetypes(&report.evaluation, &catalog));
            for d in &report.discrepancies {
                let _ = writeln!(
                    out,
                    "warning: stored {} is {} but history gives {}",
                    d.field, d.persisted, d.computed
                );
            }
            Ok(out)
        }
    }
}

pub fn stats_command(history_path: &Path, config: &PersonaConfig) -> Result<String> {
    let (report, _) = build_report(history_path, config)?;
    match config.output.format {
        OutputFormat::Json => to_json(&report.evaluation.stats),
        OutputFormat::Text => Ok(render_stats(&report.evaluation.stats)),
    }
}

/// Print the effective catalog as TOML
pub fn catalog_command(config: &PersonaConfig) -> Result<String> {
    let catalog = load_catalog(config.catalog_path.as_deref())?;
    catalog.to_toml_string().context("Failed to render catalog")
}

pub fn categorize_command(message: &str, format: OutputFormat) -> Result<String> {
    let category = categorize(message);
    match format {
        OutputFormat::Json => to_json(&CategoryReport {
            category,
            title: category.title(),
            message: category.message(),
        }),
        OutputFormat::Text => Ok(format!("{}: {}\n{}\n", category, category.title(), category.message())),
    }
}

pub fn config_command(config: &PersonaConfig) -> Result<String> {
    config.to_toml()
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    out.push('\n');
    Ok(out)
}

fn render_stats(stats: &StatsSnapshot) -> String {
    let improvement = match stats.improvement_status {
        ImprovementStatus::Computed => format!("{:+}%", stats.improvement_rate_percent),
        ImprovementStatus::InsufficientHistory => "n/a (needs 4+ sessions)".to_string(),
        ImprovementStatus::Undefined => "n/a (older sessions average 0)".to_string(),
    };
    let avg = &stats.recent_averages;

    let mut out = String::new();
    let _ = writeln!(out, "Sessions:         {}", stats.total_sessions);
    let _ = writeln!(out, "Average score:    {:.1}", stats.overall_average_score);
    let _ = writeln!(out, "Best score:       {}", stats.best_score);
    let _ = writeln!(out, "Win rate:         {:.2}", stats.win_rate);
    let _ = writeln!(out, "Improvement:      {}", improvement);
    let _ = writeln!(
        out,
        "Recent averages:  vocabulary {}  clarity {}  persuasion {}",
        avg.vocabulary, avg.clarity, avg.persuasion
    );
    let _ = writeln!(out, "Practice time:    {} min", stats.total_duration_seconds / 60);
    let _ = writeln!(
        out,
        "Streak:           {}d current, {}d best, {} active days",
        stats.streaks.current_streak_days, stats.streaks.best_streak_days, stats.streaks.active_days
    );
    out
}

fn render_archetypes(evaluation: &Evaluation, catalog: &ArchetypeCatalog) -> String {
    let mut out = String::from("Archetypes:\n");
    for (state, def) in evaluation.archetypes.iter().zip(&catalog.archetypes) {
        let marker = if state.is_active { "*" } else { " " };
        let status = if state.is_locked {
            format!("locked {}/{}", state.requirements_met, state.requirements_total)
        } else if state.is_active {
            "unlocked (active)".to_string()
        } else {
            "unlocked".to_string()
        };
        let _ = writeln!(out, "  {} {:<26} {}", marker, def.name, status);
        for requirement in &state.unmet_requirements {
            let _ = writeln!(out, "      - {}", requirement.label);
        }
    }
    out
}
