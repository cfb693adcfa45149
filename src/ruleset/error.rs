use std::error::Error;
use std::fmt::Display;

/// Error returned when a ruleset's backing table does not match the
/// declared tile/relation counts.
///
/// Indicates a caller-input-shape problem (the table was built for a
/// different universe size or relation arity) rather than an internal
/// invariant violation, so it is surfaced as a `Result` rather than an
/// assertion.
#[derive(Debug)]
pub enum RulesetError {
    DenseTableShapeMismatch {
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    },
    LabelTableShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
}

impl Display for RulesetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RulesetError::DenseTableShapeMismatch { expected, actual } => write!(
                f,
                "dense ruleset table has shape {actual:?}, expected {expected:?} (tile_count, tile_count, relation_count)"
            ),
            RulesetError::LabelTableShapeMismatch { expected, actual } => write!(
                f,
                "label table has shape {actual:?}, expected {expected:?} (tile_count, relation_count)"
            ),
        }
    }
}

impl Error for RulesetError {}
