//! Output redirection (`>` and `>>`).

use std::fmt;

use crate::errors::{Error, Result};

const TRUNCATE_OPERATOR: &str = ">";
const APPEND_OPERATOR: &str = ">>";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RedirectMode {
    /// `>`: create the target or truncate it.
    Truncate,
    /// `>>`: create the target or append to it.
    Append,
}

/// Redirect the child's stdout to `path`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redirect {
    pub path: String,
    pub mode: RedirectMode,
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let operator = match self.mode {
            RedirectMode::Truncate => TRUNCATE_OPERATOR,
            RedirectMode::Append => APPEND_OPERATOR,
        };
        write!(f, "{} {}", operator, self.path)
    }
}

/// Scans `argv` for the first redirection operator.
///
/// Redirection is expected at the end of a command, so the returned vector is
/// `argv` cut off at the operator; anything after the target is dropped. Only
/// the first operator is honored.
pub fn resolve(argv: &[String]) -> Result<(Vec<String>, Option<Redirect>)> {
    let position = argv
        .iter()
        .position(|arg| arg == TRUNCATE_OPERATOR || arg == APPEND_OPERATOR);

    let index = match position {
        Some(index) => index,
        None => return Ok((argv.to_vec(), None)),
    };

    let operator = &argv[index];
    let path = argv.get(index + 1).ok_or_else(|| {
        Error::syntax(format!("expected filename after {}", operator))
    })?;

    let mode = if operator == APPEND_OPERATOR {
        RedirectMode::Append
    } else {
        RedirectMode::Truncate
    };

    let redirect = Redirect {
        path: path.clone(),
        mode,
    };
    Ok((argv[..index].to_vec(), Some(redirect)))
}
