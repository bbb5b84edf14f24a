//! Error types for mode selection and XPath evaluation.

use std::fmt;

/// Errors raised while choosing between find and exec mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeError {
    /// Neither `--find` nor `--exec` was given.
    Missing,
    /// Both `--find` and `--exec` were given.
    Conflicting,
}

impl fmt::Display for ModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeError::Missing => write!(f, "Please indicate an XPath expression"),
            ModeError::Conflicting => {
                write!(f, "Please indicate either --find or --exec, but not both")
            }
        }
    }
}

impl std::error::Error for ModeError {}

/// Errors that can occur while compiling or evaluating an XPath expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The expression is not valid XPath.
    Compile(String),
    /// The expression contains nothing to evaluate.
    Empty,
    /// Evaluation failed, e.g. an unknown function or unbound prefix.
    Evaluate(String),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::Compile(message) => write!(f, "{}", message),
            QueryError::Empty => write!(f, "expression is empty"),
            QueryError::Evaluate(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for QueryError {}
