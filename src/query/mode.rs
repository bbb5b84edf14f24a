//! Selection between find and exec mode.

use super::error::ModeError;

/// What to do with the expression given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Select nodes and print their text or XML.
    Find(String),
    /// Evaluate an expression and print its result by type.
    Exec(String),
}

impl Mode {
    /// Picks the mode from the `--find` and `--exec` flag values.
    ///
    /// An empty string counts as not given. Exactly one of the two must be
    /// present.
    ///
    /// # Examples
    ///
    /// ```
    /// use xq::{Mode, ModeError};
    ///
    /// assert_eq!(Mode::from_flags(Some("//a"), None), Ok(Mode::Find("//a".to_string())));
    /// assert_eq!(Mode::from_flags(None, None), Err(ModeError::Missing));
    /// ```
    pub fn from_flags(find: Option<&str>, exec: Option<&str>) -> Result<Self, ModeError> {
        let find = find.filter(|expr| !expr.is_empty());
        let exec = exec.filter(|expr| !expr.is_empty());

        match (find, exec) {
            (None, None) => Err(ModeError::Missing),
            (Some(_), Some(_)) => Err(ModeError::Conflicting),
            (Some(expr), None) => Ok(Mode::Find(expr.to_string())),
            (None, Some(expr)) => Ok(Mode::Exec(expr.to_string())),
        }
    }
}
