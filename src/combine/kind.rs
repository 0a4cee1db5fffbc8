use crate::combine::error::CombineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the samples falling in one window are folded into a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CombinationKind {
    Min,
    Max,
    Range,
    Add,
    Concat,
    HazardConcat,
    WeatherConcat,
}

impl CombinationKind {
    pub const ALL: [CombinationKind; 7] = [
        CombinationKind::Min,
        CombinationKind::Max,
        CombinationKind::Range,
        CombinationKind::Add,
        CombinationKind::Concat,
        CombinationKind::HazardConcat,
        CombinationKind::WeatherConcat,
    ];

    /// Kinds a series may be switched to after construction.
    pub const REASSIGNABLE: [CombinationKind; 5] = [
        CombinationKind::Min,
        CombinationKind::Max,
        CombinationKind::Range,
        CombinationKind::Concat,
        CombinationKind::Add,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CombinationKind::Min => "min",
            CombinationKind::Max => "max",
            CombinationKind::Range => "range",
            CombinationKind::Add => "add",
            CombinationKind::Concat => "concat",
            CombinationKind::HazardConcat => "hazardConcat",
            CombinationKind::WeatherConcat => "weatherConcat",
        }
    }

    /// Whether values must go through a category decoder.
    pub fn is_categorical(&self) -> bool {
        matches!(
            self,
            CombinationKind::HazardConcat | CombinationKind::WeatherConcat
        )
    }

    pub fn is_reassignable(&self) -> bool {
        Self::REASSIGNABLE.contains(self)
    }
}

impl fmt::Display for CombinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CombinationKind {
    type Err = CombineError;

    /// Case-insensitive, so `hazardconcat` and `hazardConcat` are the same kind.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CombineError::UnrecognizedCombinationKind(s.to_string()))
    }
}

impl TryFrom<String> for CombinationKind {
    type Error = CombineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CombinationKind> for String {
    fn from(kind: CombinationKind) -> Self {
        kind.as_str().to_string()
    }
}
