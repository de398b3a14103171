//! # Error Types
//!
//! Error handling for the refactoring engine.
//! Every error from the locator/navigator/mutator pipeline propagates
//! unchanged to the CLI boundary; the engine never retries and never
//! partially applies a transformation.

use std::fmt;

/// Errors that can occur while resolving a target and applying a refactoring.
///
/// The first four variants are user errors and are reported as a one-line
/// `kind: message` diagnostic. `MutationConflict` indicates a bug in a
/// recipe's use of the mutation primitives and carries the offending byte
/// spans for debugging.
#[derive(Debug)]
pub enum RefactorError {
    /// The addressing string is syntactically malformed
    Addressing(String),
    /// The address is valid but does not resolve to any node in the file
    TargetNotFound(String),
    /// The transformation would introduce a name already present in the
    /// destination scope
    NameConflict {
        name: String,
        /// 1-based line of the existing definition
        line: u32,
    },
    /// Two edits in one transformation plan overlap in source position
    MutationConflict {
        first: (usize, usize),
        second: (usize, usize),
    },
    /// The input file is not valid Python
    Parse {
        line: u32,
        column: u32,
        message: String,
    },
    /// I/O error reading or writing the target file
    Io(std::io::Error),
}

impl fmt::Display for RefactorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefactorError::Addressing(msg) => write!(f, "addressing error: {msg}"),
            RefactorError::TargetNotFound(msg) => write!(f, "target not found: {msg}"),
            RefactorError::NameConflict { name, line } => {
                write!(f, "name conflict: '{name}' already exists at line {line}")
            }
            RefactorError::MutationConflict { first, second } => write!(
                f,
                "mutation conflict: edit at bytes {}..{} overlaps edit at bytes {}..{}",
                first.0, first.1, second.0, second.1
            ),
            RefactorError::Parse {
                line,
                column,
                message,
            } => write!(f, "parse error at {line}:{column}: {message}"),
            RefactorError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for RefactorError {}

impl From<std::io::Error> for RefactorError {
    fn from(err: std::io::Error) -> Self {
        RefactorError::Io(err)
    }
}

impl RefactorError {
    /// Process exit code for this error kind. Success is 0; each kind gets a
    /// distinct non-zero code so scripts can branch on the failure class.
    pub fn exit_code(&self) -> i32 {
        match self {
            RefactorError::Addressing(_) => 2,
            RefactorError::TargetNotFound(_) => 3,
            RefactorError::NameConflict { .. } => 4,
            RefactorError::MutationConflict { .. } => 5,
            RefactorError::Parse { .. } => 6,
            RefactorError::Io(_) => 7,
        }
    }
}

pub type Result<T> = std::result::Result<T, RefactorError>;
