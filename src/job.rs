use std::fmt;

use nix::unistd::Pid;

use crate::shell::MAX_LINE_LENGTH;
use crate::util;

/// A process running in the background that the shell is responsible for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Job {
    pid: Pid,
    /// The original command string entered, bounded to `MAX_LINE_LENGTH`.
    command: String,
}

impl Job {
    pub fn new<S: AsRef<str>>(pid: Pid, command: S) -> Job {
        Job {
            pid,
            command: util::truncate_chars(command.as_ref(), MAX_LINE_LENGTH).to_string(),
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PID: {} Command: {}", self.pid, self.command)
    }
}
