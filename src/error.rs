use thiserror::Error;

/// The error type for everything that can fail in this crate.
///
/// Merge incompatibility during induction is deliberately *not* represented
/// here. It is an expected outcome of the trial-merge search and is handled
/// internally with transactional rollback, so the merge routines signal it
/// with `None` instead of an error.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed automaton or sample text. `line` is 1-based and refers to
    /// the physical input line, comments and blanks included.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A sample contains the same symbol sequence with conflicting labels,
    /// or PTA construction would mark a state both accepting and error.
    #[error("inconsistent sample: {0}")]
    Inconsistent(String),

    /// Caller bug: out-of-range index, cross-automaton reference, or a
    /// transition that would break a structural invariant.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, Error>;
