//! imcsh - Interactive Command Shell
//!
//! A small interactive shell that runs programs in the foreground or the
//! background, tracks background jobs, and reconciles them with the user
//! before shutting down.
#![recursion_limit = "1024"]
#![deny(
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces
)]

#[macro_use]
extern crate error_chain;

/// Logs the error of a `Result` without propagating it.
macro_rules! log_if_err {
    ($result:expr, $msg:expr) => {
        if let Err(ref e) = $result {
            log::error!("{}: {}", $msg, e);
        }
    };
    ($result:expr, $fmt:expr, $($arg:tt)+) => {
        if let Err(ref e) = $result {
            log::error!("{}: {}", format_args!($fmt, $($arg)+), e);
        }
    };
}

mod editor;
pub mod errors;
pub mod execute_command;
pub mod job;
pub mod parser;
pub mod shell;
pub mod util;

pub use crate::shell::{Shell, ShellConfig, DEFAULT_MAX_JOBS, MAX_LINE_LENGTH};
pub use crate::util::ImcshExitStatusExt;
