//! One sleep-cycle pass, per project: detect and apply, deprecate, reclassify.

use std::time::Instant;

use tracing::{debug, error, info, warn};

use reverie_core::config::{SleepCycleConfig, SupersessionConfig};
use reverie_core::errors::ReverieResult;
use reverie_core::models::{ApplyOutcome, CycleSummary, SupersessionCandidate};
use reverie_observability::cycle_span;

use crate::engine::ConsolidationEngine;

/// Run a pass over `project`, or over every project in the store.
///
/// Only the detection read is fatal. Individual write failures are logged and
/// the pass moves on, so a rerun picks up where this one stopped.
pub fn run_cycle(
    engine: &ConsolidationEngine,
    config: &SleepCycleConfig,
    project: Option<&str>,
) -> ReverieResult<CycleSummary> {
    let start = Instant::now();
    let span = cycle_span!(config.cycle_type);
    let _guard = span.enter();

    let projects = match project {
        Some(p) => vec![p.to_string()],
        None => engine.store().list_projects()?,
    };
    debug!(
        projects = projects.len(),
        supersession = config.supersession_enabled,
        threshold = config.supersession_threshold,
        lookback_days = config.supersession_lookback_days,
        dry_run = config.dry_run,
        "sleep cycle starting"
    );

    let supersession = SupersessionConfig {
        min_confidence: config.supersession_threshold,
        ..engine.config().supersession.clone()
    };
    let detector = engine.detector_with(&supersession, &config.priority);

    let mut summary = CycleSummary::default();
    for project in &projects {
        if config.supersession_enabled {
            let result = detector.detect_batch(
                project,
                config.supersession_lookback_days,
                config.max_observations_per_cycle,
            )?;
            summary.observations_processed += result.processed_count;
            summary.candidates_detected += result.candidates.len();

            for candidate in &result.candidates {
                apply_candidate(engine, candidate, config.dry_run, &mut summary);
            }
        } else {
            debug!(project = %project, "supersession detection disabled for this cycle");
        }

        if config.deprecation_enabled {
            match engine.applier().deprecate_old_superseded(
                Some(project),
                config.deprecate_after_days,
                config.dry_run,
            ) {
                Ok(count) => summary.memories_deprecated += count,
                Err(e) => error!(project = %project, error = %e, "deprecation step failed"),
            }
        }

        if config.memory_tier.reclassification_active() {
            reclassify(engine, config, project, &mut summary);
        }
    }

    summary.projects = projects;
    summary.duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    info!(
        cycle_type = %config.cycle_type,
        projects = summary.projects.len(),
        processed = summary.observations_processed,
        detected = summary.candidates_detected,
        applied = summary.supersessions_applied,
        deprecated = summary.memories_deprecated,
        tier_updates = summary.memory_tier_updates,
        duration_ms = summary.duration_ms,
        "sleep cycle complete"
    );
    Ok(summary)
}

fn apply_candidate(
    engine: &ConsolidationEngine,
    candidate: &SupersessionCandidate,
    dry_run: bool,
    summary: &mut CycleSummary,
) {
    match engine.applier().apply_supersession(candidate, dry_run) {
        ApplyOutcome::Applied => {
            summary.supersessions_applied += 1;
            summary.by_priority_tier.increment(candidate.priority_tier);
            // Newer gains a reference, older is touched.
            if let Err(e) = engine.tiers().increment_reference_count(candidate.newer_id) {
                warn!(observation_id = candidate.newer_id, error = %e, "failed to bump reference count");
            }
            if let Err(e) = engine.tiers().update_last_accessed(candidate.older_id) {
                warn!(observation_id = candidate.older_id, error = %e, "failed to touch observation");
            }
        }
        ApplyOutcome::DryRun => {
            summary.supersessions_applied += 1;
            summary.by_priority_tier.increment(candidate.priority_tier);
        }
        ApplyOutcome::AlreadySuperseded | ApplyOutcome::Failed => {}
    }
}

fn reclassify(
    engine: &ConsolidationEngine,
    config: &SleepCycleConfig,
    project: &str,
    summary: &mut CycleSummary,
) {
    match engine.tiers().stats(project) {
        Ok(stats) => summary.by_memory_tier.merge(&stats),
        Err(e) => error!(project, error = %e, "failed to read memory tier stats"),
    }
    if config.dry_run {
        debug!(project, "dry run: skipping memory tier reclassification");
        return;
    }
    match engine.tiers().batch_classify_with(project, &config.memory_tier) {
        Ok(updated) => summary.memory_tier_updates += updated,
        Err(e) => error!(project, error = %e, "memory tier reclassification failed"),
    }
}
