use std::fmt;

use super::Item;
use super::streaming_growth::ProcessingPhase;

/// Errors surfaced by the miner.
///
/// Structural bugs inside the tree (a support bump on the root, a cyclic
/// item link) are not represented here; those panic.
#[derive(Debug)]
pub enum FpError {
    /// Absolute threshold that is negative or not finite.
    InvalidThreshold(f64),
    /// Relative support outside `[0, 1]`.
    InvalidSupport(f64),
    /// A projection was requested without any prefix path to project.
    EmptyProjection,
    /// Prefix paths handed to one projection end in different items.
    MixedSeed { seed: Item, found: Item },
    /// The search descended past the configured number of nested trees.
    DepthExceeded { limit: usize },
    /// A mining session call made in the wrong phase.
    Phase {
        operation: &'static str,
        phase: ProcessingPhase,
    },
    /// A malformed line in a transaction database.
    Parse { line: usize, message: String },
    Io(std::io::Error),
}

impl fmt::Display for FpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FpError::InvalidThreshold(epsilon) => {
                write!(f, "Invalid support threshold: {} (must be finite and >= 0)", epsilon)
            }
            FpError::InvalidSupport(min_support) => {
                write!(f, "Invalid minimum support: {} (must be within [0, 1])", min_support)
            }
            FpError::EmptyProjection => write!(f, "Cannot project an empty set of prefix paths"),
            FpError::MixedSeed { seed, found } => {
                write!(f, "Prefix path ends in item {} while projecting item {}", found, seed)
            }
            FpError::DepthExceeded { limit } => {
                write!(f, "Search depth exceeded: more than {} nested conditional trees", limit)
            }
            FpError::Phase { operation, phase } => {
                write!(f, "Cannot {} in phase {:?}", operation, phase)
            }
            FpError::Parse { line, message } => write!(f, "Parse error on line {}: {}", line, message),
            FpError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for FpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FpError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FpError {
    fn from(err: std::io::Error) -> Self {
        FpError::Io(err)
    }
}
