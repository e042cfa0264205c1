//! Help text presence.

use crate::models::{MetricFamily, Problem};

/// Detects issues related to the help text for a metric.
///
/// Only a structurally missing help field is flagged; an empty help string
/// still counts as present.
pub fn lint_help(mf: &MetricFamily) -> Vec<Problem> {
    let mut problems = Vec::new();

    // Expect all metrics to have help text available.
    if mf.help.is_none() {
        problems.push(Problem::new(&mf.name, "no help text"));
    }

    problems
}
