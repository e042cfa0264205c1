//! Built-in lint rules for metric family metadata.
//!
//! A rule is a pure function from one metric family to the problems it
//! finds. Rules carry no name or identity, so registering the same function
//! twice runs it twice.

pub mod counter;
pub mod help;
pub mod histogram;

use crate::models::{MetricFamily, Problem};

/// A lint rule. Rules must be total: they never fail, they only report.
pub type Validation = Box<dyn Fn(&MetricFamily) -> Vec<Problem> + Send + Sync>;

/// The built-in rule set, in the order the engine applies it.
pub fn default_validations() -> Vec<Validation> {
    vec![
        Box::new(help::lint_help),
        Box::new(counter::lint_counter),
        Box::new(histogram::lint_histogram_summary_reserved),
    ]
}
