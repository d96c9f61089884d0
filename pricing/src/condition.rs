use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Which sub-grammar a raw condition string is parsed under.
///
/// The catalog's string-valued dimensions do not share one numeric domain:
/// capture delay mixes keywords with day counts, volume magnitudes carry
/// `k`/`m` suffixes, and fraud levels are ratios that authors often write as
/// percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Capture delay: a keyword (`immediate`, `manual`) or a day-count expression.
    Delay,
    /// Monthly volume: plain magnitudes, `k`/`m` suffixes allowed.
    Volume,
    /// Fraud level: ratio units, `%` suffix allowed.
    Ratio,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConditionError {
    #[error("unrecognized condition syntax {raw:?}")]
    Unrecognized { raw: String },

    #[error("invalid numeric token {token:?} in condition {raw:?}")]
    InvalidNumber { token: String, raw: String },

    #[error("percentage is not valid for a {kind:?} condition: {raw:?}")]
    PercentNotAllowed { kind: FieldKind, raw: String },

    #[error("inverted range {raw:?}: lower bound exceeds upper bound")]
    InvertedRange { raw: String },
}

/// One end of a numeric interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Unbounded,
    Inclusive(f64),
    Exclusive(f64),
}

/// Numeric interval with independently closed, open or missing bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub min: Bound,
    pub max: Bound,
}

impl NumericRange {
    /// Interval inclusive at both ends, as written `"A-B"`.
    pub fn closed(min: f64, max: f64) -> Self {
        Self {
            min: Bound::Inclusive(min),
            max: Bound::Inclusive(max),
        }
    }

    /// Strictly-greater-than interval, as written `">X"`.
    pub fn above(min: f64) -> Self {
        Self {
            min: Bound::Exclusive(min),
            max: Bound::Unbounded,
        }
    }

    /// Strictly-less-than interval, as written `"<X"`.
    pub fn below(max: f64) -> Self {
        Self {
            min: Bound::Unbounded,
            max: Bound::Exclusive(max),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        let above_min = match self.min {
            Bound::Unbounded => true,
            Bound::Inclusive(min) => value >= min,
            Bound::Exclusive(min) => value > min,
        };
        let below_max = match self.max {
            Bound::Unbounded => true,
            Bound::Inclusive(max) => value <= max,
            Bound::Exclusive(max) => value < max,
        };
        above_min && below_max
    }
}

/// A fully resolved rule predicate for one field.
///
/// A condition is either absent (a wildcard, represented by its omission) or
/// resolved here at parse time; nothing is re-parsed during matching.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Categorical keyword, compared by exact equality.
    Exact(String),
    /// Membership in an enumerated list; an empty list matches anything.
    AnyOf(Vec<String>),
    /// Membership in a numeric code list; an empty list matches anything.
    Codes(Vec<i64>),
    /// Numeric interval containment.
    Range(NumericRange),
    /// Boolean equality; the wildcard case is expressed by omission.
    Flag(bool),
}

// Scalar token: decimal number plus an optional scale suffix.
static SCALAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+(?:\.[0-9]+)?)\s*(k|m|%)?$").expect("scalar regex"));

/// Parse one raw condition string under the given field kind.
///
/// Empty and `null` input is a wildcard and comes back as `Ok(None)`; only
/// syntactically malformed input fails. The grammar is case-insensitive and
/// whitespace-trimmed.
pub fn parse(kind: FieldKind, raw: &str) -> Result<Option<Condition>, ConditionError> {
    let text = raw.trim().to_ascii_lowercase();
    if text.is_empty() || text == "null" {
        return Ok(None);
    }

    if let Some(rest) = text.strip_prefix('>') {
        let min = scalar(kind, rest, raw)?;
        return Ok(Some(Condition::Range(NumericRange::above(min))));
    }
    if let Some(rest) = text.strip_prefix('<') {
        let max = scalar(kind, rest, raw)?;
        return Ok(Some(Condition::Range(NumericRange::below(max))));
    }

    // An interior dash makes this a two-sided range. Each bound runs through
    // the same scalar pipeline, so suffix scaling applies to both ends of
    // `"7.7%-8.3%"` alike.
    if let Some((lo, hi)) = split_range(&text) {
        let min = scalar(kind, lo, raw)?;
        let max = scalar(kind, hi, raw)?;
        if min > max {
            return Err(ConditionError::InvertedRange {
                raw: raw.trim().to_string(),
            });
        }
        return Ok(Some(Condition::Range(NumericRange::closed(min, max))));
    }

    if SCALAR_RE.is_match(&text) {
        // A bare number is an exact numeric match.
        let value = scalar(kind, &text, raw)?;
        return Ok(Some(Condition::Range(NumericRange::closed(value, value))));
    }

    if kind == FieldKind::Delay && text.chars().all(|c| c.is_ascii_alphabetic()) {
        return Ok(Some(Condition::Exact(text)));
    }

    Err(ConditionError::Unrecognized {
        raw: raw.trim().to_string(),
    })
}

// Split at the first dash that is not the leading character.
fn split_range(text: &str) -> Option<(&str, &str)> {
    text.char_indices()
        .skip(1)
        .find(|&(_, ch)| ch == '-')
        .map(|(dash, _)| (&text[..dash], &text[dash + 1..]))
}

fn scalar(kind: FieldKind, token: &str, raw: &str) -> Result<f64, ConditionError> {
    let token = token.trim();
    let caps = SCALAR_RE
        .captures(token)
        .ok_or_else(|| ConditionError::InvalidNumber {
            token: token.to_string(),
            raw: raw.trim().to_string(),
        })?;

    let value: f64 = caps[1].parse().map_err(|_| ConditionError::InvalidNumber {
        token: token.to_string(),
        raw: raw.trim().to_string(),
    })?;

    match caps.get(2).map(|m| m.as_str()) {
        Some("k") => Ok(value * 1_000.0),
        Some("m") => Ok(value * 1_000_000.0),
        Some("%") => {
            if kind != FieldKind::Ratio {
                return Err(ConditionError::PercentNotAllowed {
                    kind,
                    raw: raw.trim().to_string(),
                });
            }
            Ok(value / 100.0)
        }
        _ => Ok(value),
    }
}
