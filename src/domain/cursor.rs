//! Scroll cursor and keep-alive types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Scroll keep-alive in Elasticsearch time-unit notation (`30s`, `5m`, ...)
///
/// The original text is forwarded to the cluster verbatim; the parsed
/// duration is used locally to bound write retries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScrollTimeout {
    raw: String,
    duration: Duration,
}

impl ScrollTimeout {
    /// The keep-alive as sent on the wire
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The keep-alive as a duration
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Default for ScrollTimeout {
    fn default() -> Self {
        Self {
            raw: "30s".to_string(),
            duration: Duration::from_secs(30),
        }
    }
}

impl FromStr for ScrollTimeout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let split = raw
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| format!("Scroll timeout '{raw}' is missing a time unit"))?;
        let (amount, unit) = raw.split_at(split);

        let amount: u64 = amount
            .parse()
            .map_err(|_| format!("Scroll timeout '{raw}' must start with a whole number"))?;
        if amount == 0 {
            return Err(format!("Scroll timeout '{raw}' must be positive"));
        }

        let seconds = |factor: u64| {
            amount
                .checked_mul(factor)
                .map(Duration::from_secs)
                .ok_or_else(|| format!("Scroll timeout '{raw}' is too large"))
        };

        let duration = match unit {
            "d" => seconds(86_400)?,
            "h" => seconds(3_600)?,
            "m" => seconds(60)?,
            "s" => Duration::from_secs(amount),
            "ms" => Duration::from_millis(amount),
            "micros" => Duration::from_micros(amount),
            "nanos" => Duration::from_nanos(amount),
            other => {
                return Err(format!(
                    "Unknown time unit '{other}' in scroll timeout '{raw}'. \
                     Must be one of: d, h, m, s, ms, micros, nanos"
                ))
            }
        };

        Ok(Self {
            raw: raw.to_string(),
            duration,
        })
    }
}

impl TryFrom<String> for ScrollTimeout {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ScrollTimeout> for String {
    fn from(value: ScrollTimeout) -> Self {
        value.raw
    }
}

impl fmt::Display for ScrollTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Current position of an open scroll
///
/// Every page response carries a token that replaces the previous one; the
/// token is forwarded verbatim and never merged or reused.
#[derive(Debug, Clone)]
pub struct ScanCursor {
    token: String,
    keep_alive: ScrollTimeout,
    issued_at: Instant,
}

impl ScanCursor {
    /// Create a cursor from a freshly received scroll id
    pub fn new(token: impl Into<String>, keep_alive: ScrollTimeout) -> Self {
        Self {
            token: token.into(),
            keep_alive,
            issued_at: Instant::now(),
        }
    }

    /// Replace this cursor with the token from the latest page response
    pub fn refresh(self, token: impl Into<String>) -> Self {
        Self::new(token, self.keep_alive)
    }

    /// The scroll id to send with the next request
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Keep-alive requested for this cursor
    pub fn keep_alive(&self) -> &ScrollTimeout {
        &self.keep_alive
    }

    /// Time since the token was received
    pub fn age(&self) -> Duration {
        self.issued_at.elapsed()
    }
}
