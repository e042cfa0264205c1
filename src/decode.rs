//! Incremental decoder for the Prometheus text exposition format.
//!
//! Yields one `MetricFamily` at a time so a lint pass never has to buffer
//! the whole stream. Clean end of input is reported as `Ok(None)`, never as
//! an error; any `Err` means the stream is malformed and must abort the
//! caller's pass.

use std::io::BufRead;

use thiserror::Error;
use tracing::debug;

use crate::models::{LabelPair, MetricFamily, MetricType, Sample};

/// Errors produced while decoding a text exposition stream.
///
/// Every syntax variant carries the 1-based line number of the offending
/// input line.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {keyword} comment is missing a metric name")]
    MissingMetricName { line: usize, keyword: &'static str },
    #[error("line {line}: unknown metric type {token:?}")]
    UnknownType { line: usize, token: String },
    #[error("line {line}: malformed sample line")]
    MalformedSample { line: usize },
    #[error("line {line}: malformed label set")]
    MalformedLabels { line: usize },
    #[error("line {line}: invalid sample value {token:?}")]
    InvalidValue { line: usize, token: String },
    #[error("line {line}: invalid timestamp {token:?}")]
    InvalidTimestamp { line: usize, token: String },
}

/// One parsed line of exposition text.
enum Line {
    Comment,
    Help { name: String, text: String },
    Type { name: String, metric_type: MetricType },
    Sample { name: String, sample: Sample },
}

/// Streaming decoder over a buffered reader.
pub struct TextDecoder<R> {
    reader: R,
    line: usize,
    /// Line read past the end of the current family, re-served on the next
    /// call. Always the most recently read line, so `self.line` stays valid.
    pending: Option<String>,
}

impl<R: BufRead> TextDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            pending: None,
        }
    }

    /// Decodes the next metric family, or `Ok(None)` on clean end of input.
    ///
    /// A family's lines are expected to be contiguous: the first `HELP`,
    /// `TYPE`, or sample line for a different name ends the current family.
    /// Histogram and summary samples may use the `_bucket`, `_sum`, and
    /// `_count` suffixes of the family name.
    pub fn next_family(&mut self) -> Result<Option<MetricFamily>, DecodeError> {
        let mut family: Option<MetricFamily> = None;

        while let Some(raw) = self.next_line()? {
            let text = raw.trim();
            if text.is_empty() {
                continue;
            }

            match parse_line(text, self.line)? {
                Line::Comment => {}
                Line::Help { name, text } => match family.as_mut() {
                    None => {
                        let mut started = MetricFamily::new(name, MetricType::Unknown);
                        started.help = Some(text);
                        family = Some(started);
                    }
                    Some(current) if current.name == name => current.help = Some(text),
                    Some(_) => {
                        self.pending = Some(raw);
                        break;
                    }
                },
                Line::Type { name, metric_type } => match family.as_mut() {
                    None => family = Some(MetricFamily::new(name, metric_type)),
                    Some(current) if current.name == name => {
                        current.metric_type = metric_type;
                    }
                    Some(_) => {
                        self.pending = Some(raw);
                        break;
                    }
                },
                Line::Sample { name, sample } => match family.as_mut() {
                    None => {
                        let mut started = MetricFamily::new(name, MetricType::Unknown);
                        started.samples.push(sample);
                        family = Some(started);
                    }
                    Some(current) if owns_sample(current, &name) => {
                        current.samples.push(sample);
                    }
                    Some(_) => {
                        self.pending = Some(raw);
                        break;
                    }
                },
            }
        }

        if let Some(current) = &family {
            debug!(
                family = %current.name,
                samples = current.samples.len(),
                "decoded metric family"
            );
        }
        Ok(family)
    }

    fn next_line(&mut self) -> Result<Option<String>, DecodeError> {
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }

        let mut buf = String::new();
        if self.reader.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        self.line += 1;
        Ok(Some(buf))
    }
}

/// True when a sample line with `sample_name` belongs to `family`.
fn owns_sample(family: &MetricFamily, sample_name: &str) -> bool {
    if sample_name == family.name {
        return true;
    }
    let Some(suffix) = sample_name.strip_prefix(family.name.as_str()) else {
        return false;
    };
    match family.metric_type {
        MetricType::Histogram => matches!(suffix, "_bucket" | "_sum" | "_count"),
        MetricType::Summary => matches!(suffix, "_sum" | "_count"),
        _ => false,
    }
}

fn parse_line(text: &str, line: usize) -> Result<Line, DecodeError> {
    if let Some(comment) = text.strip_prefix('#') {
        return parse_comment(comment.trim_start(), line);
    }
    parse_sample(text, line)
}

fn parse_comment(comment: &str, line: usize) -> Result<Line, DecodeError> {
    let mut parts = comment.splitn(2, char::is_whitespace);
    let keyword = parts.next().unwrap_or("");
    let rest = parts.next().unwrap_or("");

    match keyword {
        "HELP" => {
            let mut fields = rest.splitn(2, ' ');
            let name = fields.next().unwrap_or("").trim();
            if name.is_empty() {
                return Err(DecodeError::MissingMetricName {
                    line,
                    keyword: "HELP",
                });
            }
            Ok(Line::Help {
                name: name.to_string(),
                text: unescape_help(fields.next().unwrap_or("")),
            })
        }
        "TYPE" => {
            let mut fields = rest.split_whitespace();
            let name = fields.next().unwrap_or("");
            if name.is_empty() {
                return Err(DecodeError::MissingMetricName {
                    line,
                    keyword: "TYPE",
                });
            }
            let token = fields.next().unwrap_or("");
            let metric_type = token.parse().map_err(|()| DecodeError::UnknownType {
                line,
                token: token.to_string(),
            })?;
            Ok(Line::Type {
                name: name.to_string(),
                metric_type,
            })
        }
        // Anything else after '#' is a free-form comment.
        _ => Ok(Line::Comment),
    }
}

/// Resolves the `\\` and `\n` escapes allowed in help text.
fn unescape_help(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn parse_sample(text: &str, line: usize) -> Result<Line, DecodeError> {
    let name_end = text
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == ':'))
        .unwrap_or(text.len());
    if name_end == 0 {
        return Err(DecodeError::MalformedSample { line });
    }
    let name = &text[..name_end];
    let mut rest = &text[name_end..];

    let mut labels = Vec::new();
    if let Some(body) = rest.strip_prefix('{') {
        let (parsed, tail) = parse_labels(body, line)?;
        labels = parsed;
        rest = tail;
    }

    let mut tokens = rest.split_whitespace();
    let value_token = tokens.next().ok_or(DecodeError::MalformedSample { line })?;
    let value: f64 = value_token.parse().map_err(|_| DecodeError::InvalidValue {
        line,
        token: value_token.to_string(),
    })?;

    let timestamp_ms = match tokens.next() {
        Some(token) => Some(token.parse().map_err(|_| DecodeError::InvalidTimestamp {
            line,
            token: token.to_string(),
        })?),
        None => None,
    };
    if tokens.next().is_some() {
        return Err(DecodeError::MalformedSample { line });
    }

    Ok(Line::Sample {
        name: name.to_string(),
        sample: Sample {
            labels,
            value,
            timestamp_ms,
        },
    })
}

/// Parses a label set starting just past the opening brace; returns the
/// labels and the remainder of the line past the closing brace.
fn parse_labels<'a>(
    body: &'a str,
    line: usize,
) -> Result<(Vec<LabelPair>, &'a str), DecodeError> {
    let mut labels = Vec::new();
    let mut rest = body.trim_start();

    loop {
        if let Some(tail) = rest.strip_prefix('}') {
            return Ok((labels, tail));
        }

        let eq = rest.find('=').ok_or(DecodeError::MalformedLabels { line })?;
        let name = rest[..eq].trim();
        if name.is_empty() {
            return Err(DecodeError::MalformedLabels { line });
        }

        let after_eq = rest[eq + 1..].trim_start();
        let quoted = after_eq
            .strip_prefix('"')
            .ok_or(DecodeError::MalformedLabels { line })?;
        let (value, tail) =
            take_quoted(quoted).ok_or(DecodeError::MalformedLabels { line })?;

        labels.push(LabelPair {
            name: name.to_string(),
            value,
        });

        rest = tail.trim_start();
        if let Some(tail) = rest.strip_prefix(',') {
            rest = tail.trim_start();
        } else if !rest.starts_with('}') {
            return Err(DecodeError::MalformedLabels { line });
        }
    }
}

/// Consumes an escaped label value up to its closing quote; returns the
/// unescaped value and the remainder after the quote.
fn take_quoted(body: &str) -> Option<(String, &str)> {
    let mut value = String::new();
    let mut chars = body.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some((value, &body[i + 1..])),
            '\\' => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, '\\')) => value.push('\\'),
                Some((_, '"')) => value.push('"'),
                Some((_, other)) => {
                    value.push('\\');
                    value.push(other);
                }
                None => return None,
            },
            _ => value.push(c),
        }
    }
    None
}
