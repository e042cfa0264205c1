//! Counter naming conventions.

use crate::models::{MetricFamily, MetricType, Problem};

/// Detects issues specific to counters, as well as patterns that should
/// only be used with counters.
pub fn lint_counter(mf: &MetricFamily) -> Vec<Problem> {
    let mut problems = Vec::new();

    let is_counter = mf.metric_type == MetricType::Counter;
    let is_untyped = matches!(mf.metric_type, MetricType::Untyped | MetricType::Unknown);
    let has_total_suffix = mf.name.ends_with("_total");

    match (is_counter, is_untyped, has_total_suffix) {
        (true, _, false) => problems.push(Problem::new(
            &mf.name,
            "counter metrics should have \"_total\" suffix",
        )),
        (false, false, true) => problems.push(Problem::new(
            &mf.name,
            "non-counter metrics should not have \"_total\" suffix",
        )),
        _ => {}
    }

    problems
}
