//! Maven dependency scope

use std::fmt;

/// Maven dependency scope
///
/// Recognised scopes carry a fixed priority used when several occurrences of
/// the same artifact disagree: `compile > provided > system > runtime >
/// import > test`. Unrecognised scopes never outrank a recognised one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Compile,
    Provided,
    System,
    Runtime,
    Import,
    Test,
    Other(String),
}

impl Scope {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "compile" => Self::Compile,
            "provided" => Self::Provided,
            "system" => Self::System,
            "runtime" => Self::Runtime,
            "import" => Self::Import,
            "test" => Self::Test,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Compile => "compile",
            Self::Provided => "provided",
            Self::System => "system",
            Self::Runtime => "runtime",
            Self::Import => "import",
            Self::Test => "test",
            Self::Other(value) => value,
        }
    }

    /// Priority rank (0 = highest), `None` for unrecognised scopes
    pub fn rank(&self) -> Option<u8> {
        match self {
            Self::Compile => Some(0),
            Self::Provided => Some(1),
            Self::System => Some(2),
            Self::Runtime => Some(3),
            Self::Import => Some(4),
            Self::Test => Some(5),
            Self::Other(_) => None,
        }
    }

    /// Whether this scope should replace `current` as the aggregated scope
    pub fn outranks(&self, current: Option<&Scope>) -> bool {
        let Some(rank) = self.rank() else {
            return false;
        };
        match current.and_then(Scope::rank) {
            Some(current_rank) => rank < current_rank,
            None => true,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
