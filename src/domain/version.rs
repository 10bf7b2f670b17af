//! Cluster protocol version

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Major/minor version of an Elasticsearch cluster
///
/// Accepts `major`, `major.minor` or `major.minor.patch`; the patch level is
/// ignored since it never changes the request dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClusterVersion {
    pub major: u32,
    pub minor: u32,
}

impl ClusterVersion {
    /// Create a version
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Clusters before 5.0 support `search_type=scan` and `fields`
    pub fn supports_scan_search_type(&self) -> bool {
        self.major < 5
    }

    /// Clusters from 7.0 on report `hits.total` as an object and drop types from URLs
    pub fn is_typeless(&self) -> bool {
        self.major >= 7
    }
}

impl Default for ClusterVersion {
    fn default() -> Self {
        Self::new(2, 3)
    }
}

impl FromStr for ClusterVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut parts = trimmed.split('.');

        let major = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| format!("Invalid cluster version '{trimmed}'"))?
            .parse::<u32>()
            .map_err(|_| format!("Invalid major version in '{trimmed}'"))?;

        let minor = match parts.next() {
            Some(p) => p
                .parse::<u32>()
                .map_err(|_| format!("Invalid minor version in '{trimmed}'"))?,
            None => 0,
        };

        if major == 0 {
            return Err(format!("Unsupported cluster version '{trimmed}'"));
        }

        Ok(Self { major, minor })
    }
}

impl TryFrom<String> for ClusterVersion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClusterVersion> for String {
    fn from(value: ClusterVersion) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ClusterVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
