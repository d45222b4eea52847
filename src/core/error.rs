use std::fmt;

/// Fatal conditions. Everything else degrades to a fallback grid.
#[derive(Debug)]
pub enum SieveError {
    MalformedTask { index: usize, reason: String },
    InvalidBudget(f64),
    EmptyTraining,
    EmptyTest,
    RaggedGrid { row: usize, expected: usize, got: usize },
    Json(serde_json::Error),
}

impl fmt::Display for SieveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedTask { index, reason } => write!(f, "malformed task #{}: {}", index, reason),
            Self::InvalidBudget(b) => write!(f, "invalid time budget: {}", b),
            Self::EmptyTraining => write!(f, "task has no training pairs"),
            Self::EmptyTest => write!(f, "task has no test inputs"),
            Self::RaggedGrid { row, expected, got } => {
                write!(f, "ragged grid: row {} has {} cells, expected {}", row, got, expected)
            }
            Self::Json(e) => write!(f, "json: {}", e),
        }
    }
}

impl std::error::Error for SieveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SieveError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

pub type Result<T> = std::result::Result<T, SieveError>;

/// Why an operator produced no candidate for a given input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inapplicable {
    EmptyGrid,
    ShapeMismatch { expected: (usize, usize), got: (usize, usize) },
}

impl fmt::Display for Inapplicable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "empty grid"),
            Self::ShapeMismatch { expected, got } => write!(
                f,
                "shape mismatch: expected {}x{}, got {}x{}",
                expected.0, expected.1, got.0, got.1
            ),
        }
    }
}

impl std::error::Error for Inapplicable {}

pub type OpResult<T> = std::result::Result<T, Inapplicable>;
