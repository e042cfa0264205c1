//! Reserved histogram and summary names and labels.

use crate::models::{MetricFamily, MetricType, Problem};

/// Detects histogram- and summary-reserved suffixes and labels used on
/// metrics of other types.
pub fn lint_histogram_summary_reserved(mf: &MetricFamily) -> Vec<Problem> {
    let mut problems = Vec::new();

    // These rules do not apply to untyped metrics.
    if matches!(mf.metric_type, MetricType::Untyped | MetricType::Unknown) {
        return problems;
    }

    let is_histogram = mf.metric_type == MetricType::Histogram;
    let is_summary = mf.metric_type == MetricType::Summary;

    if !is_histogram && mf.name.ends_with("_bucket") {
        problems.push(Problem::new(
            &mf.name,
            "non-histogram metrics should not have \"_bucket\" suffix",
        ));
    }
    if !is_histogram && !is_summary && mf.name.ends_with("_count") {
        problems.push(Problem::new(
            &mf.name,
            "non-histogram and non-summary metrics should not have \"_count\" suffix",
        ));
    }
    if !is_histogram && !is_summary && mf.name.ends_with("_sum") {
        problems.push(Problem::new(
            &mf.name,
            "non-histogram and non-summary metrics should not have \"_sum\" suffix",
        ));
    }

    for sample in &mf.samples {
        for label in &sample.labels {
            if !is_histogram && label.name == "le" {
                problems.push(Problem::new(
                    &mf.name,
                    "non-histogram metrics should not have \"le\" label",
                ));
            }
            if !is_summary && label.name == "quantile" {
                problems.push(Problem::new(
                    &mf.name,
                    "non-summary metrics should not have \"quantile\" label",
                ));
            }
        }
    }

    problems
}
