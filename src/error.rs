//! Error types for command installation and dispatch.
//!
//! `DuplicateName` only ever surfaces from installation. The argument errors
//! (`Arity`, `NotANumber`, `OutOfRange`) are the type-error class and come
//! from invoking an entry point with the wrong shape of arguments.

use thiserror::Error;

/// Result type alias for abacus operations.
pub type Result<T> = std::result::Result<T, AbacusError>;

/// Errors raised by the registry and by entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbacusError {
    /// A canonical name or alias collides with one already installed.
    #[error("duplicate command name: {0}")]
    DuplicateName(String),

    /// An entry point was called with the wrong number of arguments.
    #[error("{command}() takes {} but {given} were given", expected_args(.min, .max))]
    Arity {
        /// Name the entry point was invoked by
        command: String,
        /// Fewest arguments accepted
        min: usize,
        /// Most arguments accepted
        max: usize,
        /// Arguments actually passed
        given: usize,
    },

    /// An argument could not be read as an integer.
    #[error("{command}(): {value:?} is not a number")]
    NotANumber {
        /// Name the entry point was invoked by
        command: String,
        /// The offending argument text
        value: String,
    },

    /// An argument is an integer outside the `i64` amount range.
    #[error("{command}(): {value} is outside the i64 range")]
    OutOfRange {
        /// Name the entry point was invoked by
        command: String,
        /// The offending argument text
        value: String,
    },

    /// No entry point is installed under this name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

fn expected_args(min: &usize, max: &usize) -> String {
    match (*min, *max) {
        (min, max) if min == max => format!("{} argument(s)", min),
        (0, max) => format!("at most {} argument(s)", max),
        (min, max) => format!("{} to {} arguments", min, max),
    }
}

impl AbacusError {
    /// True for argument-shape errors raised by the underlying operation.
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            AbacusError::Arity { .. }
                | AbacusError::NotANumber { .. }
                | AbacusError::OutOfRange { .. }
        )
    }
}
