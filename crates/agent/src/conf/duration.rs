//! Elapsed-time config values with a lenient fallback cascade.
//!
//! A duration may be written as a literal (`"1h30m"`), a bare integer of
//! seconds (`45`) or a float of seconds (`2.5`). A value none of those accept
//! leaves the previous duration in place.

use std::fmt;
use std::time::Duration as StdDuration;

use serde::{Deserialize, Deserializer};

/// Longest representable duration, `i64::MAX` nanoseconds (about 292 years).
const MAX_NANOS: u128 = i64::MAX as u128;

/// Wraps [`std::time::Duration`] so config files can use any accepted form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(pub StdDuration);

/// Outcome of [`Duration::apply`].
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationParse {
    Updated,
    KeptPrevious,
}

impl Duration {
    pub const fn from_secs(secs: u64) -> Self {
        Self(StdDuration::from_secs(secs))
    }

    pub const fn from_millis(millis: u64) -> Self {
        Self(StdDuration::from_millis(millis))
    }

    pub fn as_std(&self) -> StdDuration {
        self.0
    }

    /// Apply a raw config token, trying in order: a duration literal with
    /// surrounding single quotes stripped, the same literal after unquoting
    /// a quoted string, whole seconds, fractional seconds.
    pub fn apply(&mut self, raw: &[u8]) -> DurationParse {
        let trimmed = trim_single_quotes(raw);
        let Ok(text) = std::str::from_utf8(trimmed) else {
            return DurationParse::KeptPrevious;
        };

        let parsed = parse_literal(text)
            .or_else(|| unquote(text).and_then(parse_literal))
            .or_else(|| text.parse::<i64>().ok().and_then(from_secs_i64))
            .or_else(|| text.parse::<f64>().ok().and_then(from_secs_f64));
        self.update(parsed)
    }

    /// Apply a parsed TOML value. Strings go to the literal step only, so a
    /// quoted bare number (`"45"`) keeps the previous value.
    pub fn apply_value(&mut self, value: &toml::Value) -> DurationParse {
        let parsed = match value {
            toml::Value::String(s) => parse_literal(s),
            toml::Value::Integer(i) => from_secs_i64(*i),
            toml::Value::Float(f) => from_secs_f64(*f),
            _ => None,
        };
        let outcome = self.update(parsed);
        let blank = matches!(value, toml::Value::String(s) if s.is_empty());
        if outcome == DurationParse::KeptPrevious && !blank {
            tracing::warn!(value = %value, previous = ?self.0, "Could not parse duration, keeping previous value");
        }
        outcome
    }

    fn update(&mut self, parsed: Option<StdDuration>) -> DurationParse {
        match parsed {
            Some(d) => {
                self.0 = d;
                DurationParse::Updated
            }
            None => DurationParse::KeptPrevious,
        }
    }
}

impl From<StdDuration> for Duration {
    fn from(d: StdDuration) -> Self {
        Self(d)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = toml::Value::deserialize(deserializer)?;
        let mut d = Duration::default();
        let _ = d.apply_value(&value);
        Ok(d)
    }
}

/// Deserialize an optional duration that stays unset when the value cannot
/// be parsed. Use with `#[serde(default, deserialize_with = ...)]`.
pub fn deserialize_optional<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Duration>, D::Error> {
    let value = toml::Value::deserialize(deserializer)?;
    let mut d = Duration::default();
    Ok(match d.apply_value(&value) {
        DurationParse::Updated => Some(d),
        DurationParse::KeptPrevious => None,
    })
}

fn within_range(d: StdDuration) -> Option<StdDuration> {
    (d.as_nanos() <= MAX_NANOS).then_some(d)
}

/// Parse a literal such as `300ms`, `1h30m` or `2h 45m`.
fn parse_literal(text: &str) -> Option<StdDuration> {
    if text.trim().is_empty() {
        return None;
    }
    humantime::parse_duration(text).ok().and_then(within_range)
}

fn from_secs_i64(secs: i64) -> Option<StdDuration> {
    let secs = u64::try_from(secs).ok()?;
    within_range(StdDuration::from_secs(secs))
}

fn from_secs_f64(secs: f64) -> Option<StdDuration> {
    StdDuration::try_from_secs_f64(secs).ok().and_then(within_range)
}

fn trim_single_quotes(raw: &[u8]) -> &[u8] {
    let start = raw.iter().position(|&b| b != b'\'').unwrap_or(raw.len());
    let end = raw.iter().rposition(|&b| b != b'\'').map_or(start, |i| i + 1);
    &raw[start..end]
}

/// Strip double-quote or backtick quoting.
fn unquote(text: &str) -> Option<&str> {
    ['"', '`'].into_iter().find_map(|q| {
        text.strip_prefix(q)
            .and_then(|t| t.strip_suffix(q))
            .filter(|inner| !inner.contains(q))
    })
}
