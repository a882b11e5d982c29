use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use nix::sys::wait::WaitStatus;

/// imcsh Utility Extensions for `ExitStatus`
pub trait ImcshExitStatusExt {
    /// Create an ExitStatus to indicate *successful* program execution.
    fn from_success() -> Self;

    /// Create an ExitStatus to indicate *unsuccessful* program execution.
    fn from_failure() -> Self;

    /// Create an ExitStatus from a status code
    fn from_status(code: i32) -> Self;
}

impl ImcshExitStatusExt for ExitStatus {
    /// # Examples
    /// ```rust
    /// use imcsh::ImcshExitStatusExt;
    /// use std::process::ExitStatus;
    /// assert!(ExitStatus::from_success().success());
    /// ```
    fn from_success() -> Self {
        ExitStatus::from_status(0)
    }

    /// # Examples
    /// ```rust
    /// use imcsh::ImcshExitStatusExt;
    /// use std::process::ExitStatus;
    /// assert!(!ExitStatus::from_failure().success());
    /// ```
    fn from_failure() -> Self {
        ExitStatus::from_status(1)
    }

    /// # Examples
    /// ```rust
    /// use imcsh::ImcshExitStatusExt;
    /// use std::process::ExitStatus;
    /// assert!(ExitStatus::from_status(0).success());
    /// assert_eq!(ExitStatus::from_status(85).code(), Some(85));
    /// ```
    fn from_status(code: i32) -> Self {
        ExitStatus::from_raw(code << 8)
    }
}

/// Converts a terminal `WaitStatus` into the shell's notion of an exit status.
/// A child killed by a signal reports `128 + signal`, like bash.
///
/// Returns `None` for non-terminal statuses (stopped, continued, still alive).
pub fn exit_status_of(wait_status: &WaitStatus) -> Option<ExitStatus> {
    match *wait_status {
        WaitStatus::Exited(_, code) => Some(ExitStatus::from_status(code)),
        WaitStatus::Signaled(_, signal, _) => Some(ExitStatus::from_status(128 + signal as i32)),
        _ => None,
    }
}

/// Truncates `s` to at most `max_chars` characters, respecting char boundaries.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Normalizes an exit code into 0-255, the way bash does.
pub fn normalize_exit_code(code: i32) -> i32 {
    if code < 0 {
        (256 + code % 256) % 256
    } else {
        code % 256
    }
}
