//! Process launching.
//!
//! Every external command goes through [`launch`]: fork, set up the child's
//! stdout, replace the child's image with the program, and in the parent
//! either wait for the child or hand it to the job table.

use std::ffi::{CStr, CString};
use std::io::{self, Write};
use std::process::ExitStatus;

use log::{debug, info, warn};
use nix::errno::Errno;
use nix::fcntl::{self, OFlag};
use nix::libc;
use nix::sys::signal::{self, SigHandler, Signal};
use nix::sys::stat::Mode;
use nix::sys::wait;
use nix::unistd::{self, ForkResult, Pid};

use crate::errors::{Error, ErrorKind, Result};
use crate::job::Job;
use crate::parser::{Invocation, RedirectMode};
use crate::shell::job_table::JobTable;
use crate::util;

/// Child could not open its redirection target.
pub const REDIRECT_FAILURE_EXIT_STATUS: i32 = 1;
/// Program exists but could not be executed.
pub const EXEC_FAILURE_EXIT_STATUS: i32 = 126;
pub const COMMAND_NOT_FOUND_EXIT_STATUS: i32 = 127;

const REDIRECT_FILE_MODE: libc::mode_t = 0o644;

/// Outcome of a successful launch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Launched {
    /// The child ran to completion.
    Foreground { pid: Pid, status: ExitStatus },
    /// The child is running and tracked by the job table.
    Background { pid: Pid },
}

/// Everything the child needs after fork, built beforehand so the child
/// never touches the allocator.
struct ChildImage {
    program: CString,
    argv: Vec<CString>,
    redirect: Option<(CString, OFlag)>,
    background: bool,
    redirect_failure_prefix: Vec<u8>,
    exec_failure_prefix: Vec<u8>,
}

impl ChildImage {
    fn new(invocation: &Invocation) -> Result<ChildImage> {
        let argv = invocation
            .argv
            .iter()
            .map(|arg| CString::new(arg.as_bytes()))
            .collect::<::std::result::Result<Vec<_>, _>>()?;
        let program = argv
            .first()
            .cloned()
            .ok_or_else(|| Error::syntax("empty command"))?;

        let redirect = match invocation.redirect {
            Some(ref redirect) => {
                let mode_flag = match redirect.mode {
                    RedirectMode::Truncate => OFlag::O_TRUNC,
                    RedirectMode::Append => OFlag::O_APPEND,
                };
                let flags = OFlag::O_WRONLY | OFlag::O_CREAT | mode_flag;
                Some((CString::new(redirect.path.as_bytes())?, flags))
            }
            None => None,
        };

        let redirect_failure_prefix = invocation
            .redirect
            .as_ref()
            .map(|r| format!("imcsh: failed to open {} for redirection: ", r.path))
            .unwrap_or_default()
            .into_bytes();

        Ok(ChildImage {
            program,
            argv,
            redirect,
            background: invocation.background,
            redirect_failure_prefix,
            exec_failure_prefix: format!("imcsh: {}: ", invocation.program()).into_bytes(),
        })
    }

    /// Runs in the child. Never returns.
    fn exec(&self) -> ! {
        // The shell may be ignoring these, and ignored dispositions survive exec.
        unsafe {
            let _ = signal::signal(Signal::SIGINT, SigHandler::SigDfl);
            let _ = signal::signal(Signal::SIGQUIT, SigHandler::SigDfl);
        }

        // Keep background jobs out of the terminal's process group so that
        // ^C at the prompt does not reach them.
        if self.background {
            let _ = unistd::setpgid(Pid::from_raw(0), Pid::from_raw(0));
        }

        if let Some((ref path, flags)) = self.redirect {
            if let Err(errno) = redirect_stdout(path, flags) {
                exit_child(
                    &self.redirect_failure_prefix,
                    errno,
                    REDIRECT_FAILURE_EXIT_STATUS,
                );
            }
        }

        let errno = match unistd::execvp(&self.program, &self.argv) {
            Ok(never) => match never {},
            Err(errno) => errno,
        };
        let code = if errno == Errno::ENOENT {
            COMMAND_NOT_FOUND_EXIT_STATUS
        } else {
            EXEC_FAILURE_EXIT_STATUS
        };
        exit_child(&self.exec_failure_prefix, errno, code)
    }
}

fn redirect_stdout(path: &CStr, flags: OFlag) -> nix::Result<()> {
    let fd = fcntl::open(path, flags, Mode::from_bits_truncate(REDIRECT_FILE_MODE))?;
    if fd != libc::STDOUT_FILENO {
        unistd::dup2(fd, libc::STDOUT_FILENO)?;
        unistd::close(fd)?;
    }
    Ok(())
}

/// Reports `errno` on stderr and terminates the child without running any
/// of the parent's exit handlers.
fn exit_child(prefix: &[u8], errno: Errno, code: i32) -> ! {
    let _ = unistd::write(libc::STDERR_FILENO, prefix);
    let _ = unistd::write(libc::STDERR_FILENO, errno.desc().as_bytes());
    let _ = unistd::write(libc::STDERR_FILENO, b"\n");
    unsafe { libc::_exit(code) }
}

/// Launches `invocation`.
///
/// Foreground commands are waited on. Background commands are added to
/// `job_table`; a full table refuses the launch before any process exists.
pub fn launch(
    invocation: &Invocation,
    job_table: &mut JobTable,
    stdout: &mut dyn Write,
) -> Result<Launched> {
    if invocation.background && job_table.is_full() {
        bail!(ErrorKind::JobTableFull(job_table.capacity()));
    }

    let image = ChildImage::new(invocation)?;

    // Anything still buffered would be written once by each process.
    stdout.flush()?;
    io::stdout().flush()?;
    io::stderr().flush()?;

    debug!("forking for '{}'", invocation.input);
    let fork_result = unsafe { unistd::fork() }
        .map_err(|e| format!("failed to create child process: {}", e))?;

    match fork_result {
        ForkResult::Child => image.exec(),
        ForkResult::Parent { child } => {
            if invocation.background {
                track_background_child(invocation, child, job_table, stdout)
            } else {
                let status = wait_for_process(child)?;
                debug!("{} ({}) finished with {}", child, invocation.input, status);
                if invocation.report_completion {
                    writeln!(stdout, "Child process with PID {} finished.", child)?;
                }
                Ok(Launched::Foreground { pid: child, status })
            }
        }
    }
}

fn track_background_child(
    invocation: &Invocation,
    child: Pid,
    job_table: &mut JobTable,
    stdout: &mut dyn Write,
) -> Result<Launched> {
    if let Err(e) = job_table.insert(Job::new(child, &invocation.input)) {
        warn!("unable to track {} ({}), killing it: {}", child, invocation.input, e);
        log_if_err!(signal::kill(child, Signal::SIGKILL), "failed to kill {}", child);
        log_if_err!(wait_for_process(child), "failed to reap {}", child);
        return Err(e);
    }

    info!("started background job {} ({})", child, invocation.input);
    writeln!(
        stdout,
        "Started background process with PID {}: {}",
        child, invocation.input
    )?;
    Ok(Launched::Background { pid: child })
}

/// Blocks until `pid` exits or is killed by a signal.
pub fn wait_for_process(pid: Pid) -> nix::Result<ExitStatus> {
    loop {
        match wait::waitpid(pid, None) {
            Ok(wait_status) => {
                if let Some(status) = util::exit_status_of(&wait_status) {
                    return Ok(status);
                }
            }
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(e),
        }
    }
}
