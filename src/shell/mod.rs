//! imcsh - Shell Module
//!
//! The Shell owns the job table and the line editor, and runs the
//! read-evaluate loop.

pub use self::shell::Shell;

pub mod builtins;
pub mod job_table;
#[allow(clippy::module_inception)]
mod shell;
pub mod shutdown;

/// Default bound on the number of background jobs tracked at once.
pub const DEFAULT_MAX_JOBS: usize = 128;

/// Longest accepted input line, in characters. Longer lines are truncated.
pub const MAX_LINE_LENGTH: usize = 255;

/// Policy object to control a Shell's behavior
#[derive(Debug, Copy, Clone)]
pub struct ShellConfig {
    /// Maximum number of background jobs tracked at once.
    max_jobs: usize,

    /// Determines if the shell ignores SIGINT and SIGQUIT while reading input
    /// and waiting on a foreground child, so that ^C only reaches the child.
    /// Only honored when stdin is a terminal.
    ignore_interrupts: bool,

    /// Determines if some messages (e.g. the end of input notice) should be displayed.
    display_messages: bool,
}

impl ShellConfig {
    /// Creates an interactive shell configuration.
    ///
    /// # Complete List
    /// - At most `max_jobs` background jobs are tracked
    /// - ^C and ^\ are left to the foreground child
    /// - Some additional messages are displayed
    pub fn interactive(max_jobs: usize) -> ShellConfig {
        ShellConfig {
            max_jobs,
            ignore_interrupts: true,
            display_messages: true,
        }
    }

    /// Creates a noninteractive shell configuration, e.g. for `-c`.
    ///
    /// # Complete List
    /// - At most `max_jobs` background jobs are tracked
    /// - Signal dispositions are left alone
    /// - Fewer messages are displayed
    pub fn noninteractive(max_jobs: usize) -> ShellConfig {
        ShellConfig {
            max_jobs,
            ..Default::default()
        }
    }

    pub fn max_jobs(&self) -> usize {
        self.max_jobs
    }
}

impl Default for ShellConfig {
    fn default() -> ShellConfig {
        ShellConfig {
            max_jobs: DEFAULT_MAX_JOBS,
            ignore_interrupts: false,
            display_messages: false,
        }
    }
}
