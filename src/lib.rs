#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cognitive_complexity)]
#![warn(clippy::too_many_lines)]
#![warn(clippy::too_many_arguments)]
// Allow some common patterns that are fine in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! metlint checks Prometheus metric family metadata for issues with names,
//! types, and help text, and reports every finding in deterministic order.
//!
//! A [`Linter`] reads families either from a byte stream in the text
//! exposition format, linting each family as it is decoded, or from an
//! in-memory collection gathered elsewhere. Callers can append their own
//! rules with [`Linter::add_custom_validations`]; the extension surface is
//! strictly additive and built-in rules cannot be disabled.

pub mod decode;
pub mod models;
pub mod rules;

use std::io::{BufRead, BufReader, Read};

use anyhow::Result;
use tracing::debug;

use crate::decode::TextDecoder;
use crate::models::{MetricFamily, Problem};
use crate::rules::{default_validations, Validation};

/// Where a linter instance draws its metric families from. Chosen once at
/// construction so a single instance can never process both.
enum Source {
    Stream(Box<dyn BufRead>),
    Families(Vec<MetricFamily>),
}

/// A metrics metadata linter.
///
/// Each instance holds exactly one source of metric families and an ordered
/// list of custom rules. The lint pass itself is stateless; two instances
/// configured the same way produce identical output for identical input.
pub struct Linter {
    source: Source,
    default_validations: Vec<Validation>,
    custom_validations: Vec<Validation>,
}

impl Linter {
    /// Creates a linter that decodes metric families from a stream in the
    /// Prometheus text exposition format.
    pub fn new(reader: impl Read + 'static) -> Self {
        Self {
            source: Source::Stream(Box::new(BufReader::new(reader))),
            default_validations: default_validations(),
            custom_validations: Vec::new(),
        }
    }

    /// Creates a linter over already-materialized metric families, typically
    /// the output of a registry gather.
    pub fn with_metric_families(families: Vec<MetricFamily>) -> Self {
        Self {
            source: Source::Families(families),
            default_validations: default_validations(),
            custom_validations: Vec::new(),
        }
    }

    /// Appends custom rules to this instance, preserving call order.
    ///
    /// Custom rules run after all built-in rules, for every family. There is
    /// no deduplication: appending the same rule twice runs it twice.
    pub fn add_custom_validations<I>(&mut self, validations: I)
    where
        I: IntoIterator<Item = Validation>,
    {
        self.custom_validations.extend(validations);
    }

    /// Performs a linting pass, returning every problem found in the
    /// configured source, sorted by metric name and issue description.
    ///
    /// In streaming mode a decode failure aborts the whole pass; no partial
    /// problem list is ever returned.
    pub fn lint(&mut self) -> Result<Vec<Problem>> {
        let mut problems = Vec::new();
        let Self {
            source,
            default_validations,
            custom_validations,
        } = self;

        match source {
            Source::Stream(reader) => {
                let mut decoder = TextDecoder::new(reader);
                let mut decoded = 0_usize;
                while let Some(family) = decoder.next_family()? {
                    lint_family(
                        &family,
                        default_validations,
                        custom_validations,
                        &mut problems,
                    );
                    decoded += 1;
                }
                debug!("linted {decoded} families from stream");
            }
            Source::Families(families) => {
                for family in families.iter() {
                    lint_family(family, default_validations, custom_validations, &mut problems);
                }
                debug!("linted {} in-memory families", families.len());
            }
        }

        // Ensure deterministic output. Vec::sort_by is stable, so problems
        // equal in both keys keep their accumulation order.
        problems.sort_by(|a, b| a.metric.cmp(&b.metric).then_with(|| a.text.cmp(&b.text)));

        Ok(problems)
    }
}

/// Runs every built-in rule, then every custom rule, against one family.
fn lint_family(
    family: &MetricFamily,
    default_validations: &[Validation],
    custom_validations: &[Validation],
    problems: &mut Vec<Problem>,
) {
    for validation in default_validations {
        problems.extend(validation(family));
    }
    for validation in custom_validations {
        problems.extend(validation(family));
    }
}
