//! Reconciles outstanding background jobs with the user before the shell exits.

use std::io::Write;

use log::info;

use super::job_table::JobTable;
use crate::errors::Result;

pub const CONFIRM_PROMPT: &str = "Wait for background processes? (y/n): ";

/// What the shell should do after an exit request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shutdown {
    /// Every job has been resolved; the shell may terminate.
    Exit,
    /// The user declined to exit; every job is still tracked.
    Abort,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Response {
    Wait,
    Terminate,
    Abort,
}

impl Response {
    /// Only the first non-blank character counts. End of input and anything
    /// unrecognized mean abort.
    fn parse(answer: Option<&str>) -> Response {
        match answer.and_then(|a| a.trim_start().chars().next()) {
            Some('y') | Some('Y') => Response::Wait,
            Some('n') | Some('N') => Response::Terminate,
            _ => Response::Abort,
        }
    }
}

/// Drives an exit request.
///
/// With no tracked jobs the answer is `Exit` without asking. Otherwise
/// finished jobs are reaped first, and if any remain the user is shown the
/// list and asked through `ask`, which receives the question and returns the
/// answer (`None` at end of input).
pub fn coordinate<F>(job_table: &mut JobTable, ask: F, stdout: &mut dyn Write) -> Result<Shutdown>
where
    F: FnOnce(&str) -> Result<Option<String>>,
{
    if job_table.is_empty() {
        return Ok(Shutdown::Exit);
    }

    job_table.reap_completed(stdout)?;
    if job_table.is_empty() {
        return Ok(Shutdown::Exit);
    }

    writeln!(
        stdout,
        "There are {} background processes running.",
        job_table.len()
    )?;
    for (i, job) in job_table.list().enumerate() {
        writeln!(stdout, "[{}] {}", i + 1, job)?;
    }
    stdout.flush()?;

    let answer = ask(CONFIRM_PROMPT)?;
    match Response::parse(answer.as_deref()) {
        Response::Wait => {
            info!("waiting for {} jobs before exiting", job_table.len());
            job_table.wait_all(stdout)?;
            Ok(Shutdown::Exit)
        }
        Response::Terminate => {
            info!("killing {} jobs before exiting", job_table.len());
            job_table.kill_all(stdout)?;
            Ok(Shutdown::Exit)
        }
        Response::Abort => {
            writeln!(stdout, "Invalid choice. Returning to the shell.")?;
            Ok(Shutdown::Abort)
        }
    }
}
