//! Upgrade strategy types
//!
//! An UpgradeStrategy is supplied by the caller and stays fixed for the
//! lifetime of one upgrade run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Concurrency policy: how many nodes may be unavailable at once
///
/// Serializes like a Kubernetes int-or-string: `2` or `"25%"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaxUnavailable {
    /// Absolute number of nodes
    Count(u32),
    /// Percentage of the population, e.g. `"25%"`
    Percent(String),
}

impl MaxUnavailable {
    pub fn percent(value: u32) -> Self {
        MaxUnavailable::Percent(format!("{}%", value))
    }
}

impl Default for MaxUnavailable {
    fn default() -> Self {
        MaxUnavailable::Count(1)
    }
}

impl fmt::Display for MaxUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxUnavailable::Count(n) => write!(f, "{}", n),
            MaxUnavailable::Percent(s) => write!(f, "{}", s),
        }
    }
}

/// Error parsing a policy or strategy kind from user input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StrategyParseError {
    #[error("invalid maxUnavailable value: {0:?} (expected a count or a percentage like \"25%\")")]
    InvalidMaxUnavailable(String),

    #[error("unknown strategy kind: {0:?}")]
    UnknownKind(String),
}

impl FromStr for MaxUnavailable {
    type Err = StrategyParseError;

    /// Parses user input strictly. Percent strings are kept verbatim and
    /// interpreted later, so only the overall shape is checked here.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.ends_with('%') {
            return Ok(MaxUnavailable::Percent(s.to_string()));
        }
        s.parse::<u32>()
            .map(MaxUnavailable::Count)
            .map_err(|_| StrategyParseError::InvalidMaxUnavailable(s.to_string()))
    }
}

/// How the next batch of nodes is picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Balance concurrency per availability zone
    #[serde(rename = "uniformAcrossAzUpdate")]
    UniformAcrossAz,

    /// One global pool, no AZ balancing
    #[default]
    #[serde(rename = "randomUpdate")]
    Unconstrained,

    /// A strategy kind this version does not know about
    #[serde(other)]
    Unknown,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::UniformAcrossAz => "uniformAcrossAzUpdate",
            StrategyKind::Unconstrained => "randomUpdate",
            StrategyKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

impl FromStr for StrategyKind {
    type Err = StrategyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uniform-across-az" | "uniformacrossazupdate" | "uniform" => {
                Ok(StrategyKind::UniformAcrossAz)
            }
            "unconstrained" | "randomupdate" | "random" => Ok(StrategyKind::Unconstrained),
            other => Err(StrategyParseError::UnknownKind(other.to_string())),
        }
    }
}

/// Strategy for one upgrade run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeStrategy {
    /// Selection strategy
    #[serde(rename = "type", default)]
    pub kind: StrategyKind,

    /// Concurrency policy
    #[serde(default)]
    pub max_unavailable: MaxUnavailable,
}

impl UpgradeStrategy {
    pub fn new(kind: StrategyKind, max_unavailable: MaxUnavailable) -> Self {
        Self {
            kind,
            max_unavailable,
        }
    }

    pub fn uniform_across_az(max_unavailable: MaxUnavailable) -> Self {
        Self::new(StrategyKind::UniformAcrossAz, max_unavailable)
    }

    pub fn unconstrained(max_unavailable: MaxUnavailable) -> Self {
        Self::new(StrategyKind::Unconstrained, max_unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_unavailable_deserializes_int_or_string() {
        let count: MaxUnavailable = serde_json::from_str("3").unwrap();
        assert_eq!(count, MaxUnavailable::Count(3));

        let percent: MaxUnavailable = serde_json::from_str("\"25%\"").unwrap();
        assert_eq!(percent, MaxUnavailable::Percent("25%".into()));
    }

    #[test]
    fn test_max_unavailable_from_str() {
        assert_eq!("10".parse::<MaxUnavailable>().unwrap(), MaxUnavailable::Count(10));
        assert_eq!(
            "50%".parse::<MaxUnavailable>().unwrap(),
            MaxUnavailable::Percent("50%".into())
        );
        assert!("ten".parse::<MaxUnavailable>().is_err());
    }

    #[test]
    fn test_unknown_strategy_kind_deserializes() {
        let strategy: UpgradeStrategy =
            serde_json::from_str(r#"{"type":"someFutureStrategy","maxUnavailable":"20%"}"#)
                .unwrap();
        assert_eq!(strategy.kind, StrategyKind::Unknown);
        assert_eq!(strategy.max_unavailable, MaxUnavailable::percent(20));
    }

    #[test]
    fn test_strategy_defaults() {
        let strategy: UpgradeStrategy = serde_json::from_str("{}").unwrap();
        assert_eq!(strategy.kind, StrategyKind::Unconstrained);
        assert_eq!(strategy.max_unavailable, MaxUnavailable::Count(1));
    }

    #[test]
    fn test_strategy_kind_from_str() {
        assert_eq!(
            "uniform-across-az".parse::<StrategyKind>().unwrap(),
            StrategyKind::UniformAcrossAz
        );
        assert_eq!(
            "randomUpdate".parse::<StrategyKind>().unwrap(),
            StrategyKind::Unconstrained
        );
        assert!("canary".parse::<StrategyKind>().is_err());
    }
}
