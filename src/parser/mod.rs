//! imcsh Parser
//!
//! Turns a raw command line into either a builtin invocation or an external
//! program invocation ready for the launcher.

pub use self::redirect::{Redirect, RedirectMode};
pub use self::tokenizer::tokenize;

use crate::errors::{Error, Result};
use crate::shell::builtins;

pub mod redirect;
pub mod tokenizer;

const BACKGROUND_OPERATOR: &str = "&";
const EXEC_NAME: &str = "exec";
const EXEC_USAGE: &str = "exec: usage: exec <program> [args ...]";

/// An external program invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct Invocation {
    /// Command line, used for messages
    pub input: String,
    /// Finalized argument vector; `argv[0]` is the program. Never contains
    /// the background or redirection tokens.
    pub argv: Vec<String>,
    pub redirect: Option<Redirect>,
    /// Run the command in the background, defaults to false
    pub background: bool,
    /// Report the child's pid once a foreground run finishes (set by `exec`).
    pub report_completion: bool,
}

impl Invocation {
    pub fn program(&self) -> &str {
        &self.argv[0]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Builtin { name: String, args: Vec<String> },
    External(Invocation),
}

impl Command {
    /// Classifies `input`. Returns `None` when the line has no tokens.
    pub fn parse(input: &str) -> Result<Option<Command>> {
        let tokens = tokenize(input);
        let (program, rest) = match tokens.split_first() {
            Some(split) => split,
            None => return Ok(None),
        };

        if builtins::is_builtin(program) {
            return Ok(Some(Command::Builtin {
                name: program.clone(),
                args: rest.to_vec(),
            }));
        }

        let (tokens, report_completion) = if program == EXEC_NAME {
            if rest.is_empty() {
                return Err(Error::builtin_command(EXEC_USAGE, 2));
            }
            (rest, true)
        } else {
            (&tokens[..], false)
        };

        let background =
            tokens.len() > 1 && tokens.last().map(String::as_str) == Some(BACKGROUND_OPERATOR);
        let tokens = if background {
            &tokens[..tokens.len() - 1]
        } else {
            tokens
        };

        let (argv, redirect) = redirect::resolve(tokens)?;
        if argv.is_empty() {
            return Err(Error::syntax(format!("expected command before '{}'", tokens[0])));
        }

        Ok(Some(Command::External(Invocation {
            input: input.trim().to_string(),
            argv,
            redirect,
            background,
            report_completion,
        })))
    }
}
