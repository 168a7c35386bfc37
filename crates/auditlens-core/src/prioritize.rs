//! Deterministic task prioritizer
//!
//! Turns every failed check into a remediation task using the check's
//! [`TaskProfile`], ranks the tasks and keeps the top `max_tasks`. This is the
//! fallback path of the orchestrator and is always available.

use std::collections::BTreeMap;

use tracing::warn;

use crate::catalog::{Catalog, TaskProfile};
use crate::types::{Category, CategoryResult, CheckStatus, PrioritizedTask};

/// Default hard cap on the number of tasks returned
pub const DEFAULT_MAX_TASKS: usize = 10;

/// Ranked tasks for all failed checks, at most `max_tasks` of them
///
/// Warnings produce no task. A failure without a recommendation is logged and
/// dropped.
pub fn prioritize(
    results: &BTreeMap<Category, CategoryResult>,
    catalog: &Catalog,
    max_tasks: usize,
) -> Vec<PrioritizedTask> {
    let mut tasks = Vec::new();

    // BTreeMap iterates categories in declaration order
    for (&category, result) in results {
        for point in &result.points {
            if point.outcome.status != CheckStatus::Fail {
                continue;
            }
            let Some(description) = point.outcome.recommendation.as_deref() else {
                warn!(check = %point.id, "failed check has no recommendation, no task created");
                continue;
            };

            let profile = catalog
                .get(&point.id)
                .map_or(TaskProfile::DEFAULT, |check| check.task);

            tasks.push(PrioritizedTask {
                priority: profile.priority_in(category),
                category,
                description: description.to_string(),
                impact: profile.impact.min(100),
                effort: profile.effort,
                estimated_time: profile.estimated_time.to_string(),
                dependencies: Vec::new(),
                check_id: Some(point.id.clone()),
            });
        }
    }

    rank(&mut tasks);
    tasks.truncate(max_tasks);
    tasks
}

/// Sort by priority, then impact, both descending
///
/// The sort is stable, so equal tasks keep their input order.
pub fn rank(tasks: &mut [PrioritizedTask]) {
    tasks.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.impact.cmp(&a.impact))
    });
}
