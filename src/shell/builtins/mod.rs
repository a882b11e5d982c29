//! imcsh builtins
//!
//! This module includes the implementations of the shell's builtin commands.
//! Builtins run inside the shell process and never fork.

use self::prelude::*;

use self::dirs::Cd;
use self::exit::Exit;
use self::help::{GlobalUsage, Help};
use self::jobs::Jobs;

pub mod prelude {
    pub use std::io::Write;
    pub use std::process::ExitStatus;

    pub use crate::errors::{Error, ErrorKind, Result};
    pub use crate::shell::Shell;
    pub use crate::util::ImcshExitStatusExt;
}

mod dirs;
mod exit;
mod help;
mod jobs;

const CD_NAME: &str = "cd";
const EXIT_NAME: &str = "exit";
const GLOBALUSAGE_NAME: &str = "globalusage";
const HELP_NAME: &str = "help";
const JOBS_NAME: &str = "jobs";
const QUIT_NAME: &str = "quit";

/// Represents an imcsh builtin command such as cd or help.
pub trait BuiltinCommand {
    /// The NAME of the command.
    const NAME: &'static str;
    /// The help string to display to the user.
    const HELP: &'static str;
    /// The usage string to display to the user.
    fn usage() -> &'static str {
        Self::HELP.lines().next().unwrap_or(Self::NAME)
    }
    /// Runs the command with the given arguments in the `shell` environment.
    fn run(shell: &mut Shell, args: &[String], stdout: &mut dyn Write) -> Result<()>;
}

const NAMES: [&str; 6] = [
    CD_NAME,
    EXIT_NAME,
    GLOBALUSAGE_NAME,
    HELP_NAME,
    JOBS_NAME,
    QUIT_NAME,
];

/// Every name that resolves to a builtin.
pub fn names() -> &'static [&'static str] {
    &NAMES
}

pub fn is_builtin<T: AsRef<str>>(program: T) -> bool {
    NAMES.contains(&program.as_ref())
}

/// precondition: command is a builtin.
/// Returns (`exit_status`, `builtin_result`)
pub fn run<T: AsRef<str>>(
    shell: &mut Shell,
    program: T,
    args: &[String],
    stdout: &mut dyn Write,
) -> (ExitStatus, Result<()>) {
    debug_assert!(is_builtin(&program));

    let result = match program.as_ref() {
        CD_NAME => Cd::run(shell, args, stdout),
        EXIT_NAME | QUIT_NAME => Exit::run(shell, args, stdout),
        GLOBALUSAGE_NAME => GlobalUsage::run(shell, args, stdout),
        HELP_NAME => Help::run(shell, args, stdout),
        JOBS_NAME => Jobs::run(shell, args, stdout),
        _ => unreachable!(),
    };

    let exit_status = get_builtin_exit_status(&result);
    (exit_status, result)
}

/// Full help text for `name`, if it is a builtin.
fn help_text(name: &str) -> Option<&'static str> {
    match name {
        CD_NAME => Some(Cd::HELP),
        EXIT_NAME | QUIT_NAME => Some(Exit::HELP),
        GLOBALUSAGE_NAME => Some(GlobalUsage::HELP),
        HELP_NAME => Some(Help::HELP),
        JOBS_NAME => Some(Jobs::HELP),
        _ => None,
    }
}

/// Usage lines of every builtin, in the order `help` prints them.
fn all_usages() -> Vec<&'static str> {
    vec![
        Cd::usage(),
        Exit::usage(),
        GlobalUsage::usage(),
        Help::usage(),
        Jobs::usage(),
    ]
}

pub(crate) fn get_builtin_exit_status(result: &Result<()>) -> ExitStatus {
    let status = if let Err(ref e) = *result {
        match *e.kind() {
            ErrorKind::BuiltinCommand(_, code) => code,
            ErrorKind::Syntax(_) => 2,
            _ => 1,
        }
    } else {
        0
    };

    ExitStatus::from_status(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_builtin() {
        for name in &["cd", "exit", "globalusage", "help", "jobs", "quit"] {
            assert!(is_builtin(name), "{} should be a builtin", name);
        }
        assert!(!is_builtin("exec"));
        assert!(!is_builtin("ls"));
        assert!(!is_builtin("Exit"));
    }

    #[test]
    fn test_builtin_exit_status() {
        assert!(get_builtin_exit_status(&Ok(())).success());
        assert_eq!(
            get_builtin_exit_status(&Err(Error::builtin_command("cd: HOME not set", 1))).code(),
            Some(1)
        );
        assert_eq!(
            get_builtin_exit_status(&Err(Error::syntax("bad"))).code(),
            Some(2)
        );
    }

    #[test]
    fn test_every_builtin_has_help() {
        for name in &["cd", "exit", "globalusage", "help", "jobs", "quit"] {
            assert!(help_text(name).is_some(), "{} has no help", name);
        }
        assert_eq!(all_usages().len(), 5);
    }
}
