//! Read error handling policy for block copies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What to do when the disc returns fewer blocks than requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorStrategy {
    /// Stop the copy and fail the operation.
    #[serde(rename = "abort", alias = "a")]
    Abort,
    /// Write one zero block in place of the first unreadable block, then
    /// retry the rest of the request.
    #[serde(rename = "skip-block", alias = "b", alias = "skip-one-block")]
    SkipOneBlock,
    /// Write zero blocks for the whole unread remainder of the request.
    #[default]
    #[serde(rename = "skip-run", alias = "m", alias = "skip-multiblock")]
    SkipRun,
    /// Use the title set's cell tables to tell unreferenced gaps from real
    /// errors. Gaps are filled per [`GapFill`]; real errors fall back to
    /// [`ErrorStrategy::SkipRun`].
    #[serde(rename = "skip-unused", alias = "u", alias = "skip-unreferenced")]
    SkipUnreferenced,
}

/// All strategies in the order they are listed to users.
const ALL_STRATEGIES: &[ErrorStrategy] = &[
    ErrorStrategy::Abort,
    ErrorStrategy::SkipOneBlock,
    ErrorStrategy::SkipRun,
    ErrorStrategy::SkipUnreferenced,
];

impl ErrorStrategy {
    pub fn all() -> &'static [ErrorStrategy] {
        ALL_STRATEGIES
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Abort => "abort",
            Self::SkipOneBlock => "skip-block",
            Self::SkipRun => "skip-run",
            Self::SkipUnreferenced => "skip-unused",
        }
    }

    /// Single-letter aliases accepted for compatibility with older tools.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Abort => &["a"],
            Self::SkipOneBlock => &["b", "skip-one-block"],
            Self::SkipRun => &["m", "skip-multiblock"],
            Self::SkipUnreferenced => &["u", "skip-unreferenced"],
        }
    }
}

impl fmt::Display for ErrorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Error returned when parsing a strategy or gap fill name fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyParseError(pub String);

impl fmt::Display for StrategyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value '{}'", self.0)
    }
}

impl std::error::Error for StrategyParseError {}

impl FromStr for ErrorStrategy {
    type Err = StrategyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ALL_STRATEGIES
            .iter()
            .find(|strategy| {
                strategy.short_name() == lower || strategy.aliases().contains(&lower.as_str())
            })
            .copied()
            .ok_or_else(|| StrategyParseError(s.to_string()))
    }
}

/// How unreferenced gaps are written under
/// [`ErrorStrategy::SkipUnreferenced`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GapFill {
    /// Write one MPEG stuffing pack per block, so players see valid packs.
    #[default]
    Stuffing,
    /// Seek over the gap, leaving a hole (sparse file where supported).
    Seek,
}

impl GapFill {
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Stuffing => "stuffing",
            Self::Seek => "seek",
        }
    }
}

impl fmt::Display for GapFill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for GapFill {
    type Err = StrategyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stuffing" | "pad" => Ok(Self::Stuffing),
            "seek" => Ok(Self::Seek),
            _ => Err(StrategyParseError(s.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "tests/strategy_tests.rs"]
mod tests;
