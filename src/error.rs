use thiserror::Error;

/// Errors surfaced while drawing from a generator or selecting an
/// interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A filtering generator rejected every candidate it drew.
    #[error("gave up after {attempts} attempts to satisfy filter: {label}")]
    Exhausted { label: &'static str, attempts: usize },

    /// Recursive generators nested deeper than the limit without bottoming out.
    #[error("gave up after {limit} levels of recursion")]
    DepthExceeded { limit: usize },

    /// A uniform choice was asked to pick among zero alternatives, such as a
    /// union without members or a literal without values.
    #[error("cannot choose among zero alternatives")]
    NoAlternatives,

    #[error("no interpretation registered under {0:?}")]
    UnknownInterpretation(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
