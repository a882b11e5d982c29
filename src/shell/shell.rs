use std::env;
use std::fmt;
use std::io::{self, Write};
use std::process::{self, ExitStatus};

use log::{debug, info, warn};
use nix::sys::signal::{self, SigHandler, Signal};
use nix::unistd;

use crate::editor::Editor;
use crate::errors::{ErrorKind, Result};
use crate::execute_command::{self, Launched};
use crate::parser::Command;
use crate::shell::{
    builtins,
    job_table::JobTable,
    shutdown::{self, Shutdown},
    ShellConfig, MAX_LINE_LENGTH,
};
use crate::util::{self, ImcshExitStatusExt};

const SYNTAX_ERROR_EXIT_STATUS: i32 = 2;

/// imcsh Shell
pub struct Shell {
    /// Responsible for readline and history.
    editor: Editor,
    job_table: JobTable,
    /// Exit status of last command executed.
    last_exit_status: ExitStatus,
    config: ShellConfig,
    user: String,
    hostname: String,
    /// Set once an exit request has been confirmed.
    exit_requested: bool,
    /// Status given to `exit n`, if any.
    exit_status: Option<ExitStatus>,
}

impl Shell {
    /// Constructs a new Shell with an empty job table.
    pub fn new(config: ShellConfig) -> Result<Shell> {
        let hostname = unistd::gethostname()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|e| {
                warn!("unable to get hostname: {}", e);
                String::new()
            });

        let shell = Shell {
            editor: Editor::new(),
            job_table: JobTable::with_capacity(config.max_jobs),
            last_exit_status: ExitStatus::from_success(),
            config,
            user: env::var("USER").unwrap_or_default(),
            hostname,
            exit_requested: false,
            exit_status: None,
        };

        if config.ignore_interrupts && isatty() {
            // Children restore the default dispositions before exec.
            unsafe {
                signal::signal(Signal::SIGINT, SigHandler::SigIgn)?;
                signal::signal(Signal::SIGQUIT, SigHandler::SigIgn)?;
            }
        }

        info!("imcsh started up (max jobs: {})", config.max_jobs);
        Ok(shell)
    }

    /// The prompt shown before each line.
    pub fn prompt_string(&self) -> String {
        match env::current_dir() {
            Ok(cwd) => format!("{}@{}~{}> ", self.user, self.hostname, cwd.display()),
            Err(e) => {
                debug!("unable to get current directory: {}", e);
                format!("{}@{}> ", self.user, self.hostname)
            }
        }
    }

    /// Custom prompt to output to the user.
    /// Returns `None` when end of file is reached.
    pub fn prompt(&mut self) -> Result<Option<String>> {
        let prompt = self.prompt_string();
        let line = match self.editor.readline(&prompt)? {
            Some(line) => line,
            None => return Ok(None),
        };

        let truncated = util::truncate_chars(&line, MAX_LINE_LENGTH);
        if truncated.len() < line.len() {
            warn!("input line truncated to {} characters", MAX_LINE_LENGTH);
            eprintln!(
                "imcsh: input line too long, truncated to {} characters",
                MAX_LINE_LENGTH
            );
        }

        if !truncated.trim().is_empty() {
            self.editor.add_history_entry(truncated);
        }
        Ok(Some(truncated.to_owned()))
    }

    /// Runs one command line. Errors are reported on stderr and recorded in
    /// the last exit status; they never end the shell.
    pub fn execute_command_string(&mut self, input: &str) {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        self.execute_command_string_to(input, &mut handle);
    }

    pub(crate) fn execute_command_string_to(&mut self, input: &str, stdout: &mut dyn Write) {
        if let Err(e) = self.execute_command(input, stdout) {
            let status = match *e.kind() {
                ErrorKind::Syntax(_) => ExitStatus::from_status(SYNTAX_ERROR_EXIT_STATUS),
                ErrorKind::BuiltinCommand(_, code) => ExitStatus::from_status(code),
                _ => ExitStatus::from_failure(),
            };
            debug!("'{}' failed with {}: {}", input, status, e);
            eprintln!("imcsh: {}", e);
            self.last_exit_status = status;
        }
        log_if_err!(stdout.flush(), "failed to flush stdout");
    }

    fn execute_command(&mut self, input: &str, stdout: &mut dyn Write) -> Result<()> {
        let command = match Command::parse(input)? {
            Some(command) => command,
            None => return Ok(()),
        };

        match command {
            Command::Builtin { name, args } => {
                let (status, result) = builtins::run(self, &name, &args, stdout);
                result?;
                self.last_exit_status = status;
            }
            Command::External(invocation) => {
                match execute_command::launch(&invocation, &mut self.job_table, stdout)? {
                    Launched::Foreground { status, .. } => self.last_exit_status = status,
                    Launched::Background { .. } => {
                        self.last_exit_status = ExitStatus::from_success()
                    }
                }
            }
        }

        Ok(())
    }

    /// Runs command lines from the editor until an exit is confirmed or
    /// end of input is reached.
    pub fn execute_from_stdin(&mut self) {
        while !self.exit_requested {
            // Report background jobs that finished since the last prompt.
            let temp_result = self.job_table.reap_completed(&mut io::stdout());
            log_if_err!(temp_result, "reap_completed");

            let input = match self.prompt() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    if self.config.display_messages {
                        println!();
                    }
                    break;
                }
                Err(e) => {
                    eprintln!("imcsh: {}", e);
                    break;
                }
            };

            self.execute_command_string(&input);
        }

        self.wait_for_jobs();
    }

    /// Waits for every tracked background job. Nobody can be asked at this
    /// point, so nothing is abandoned.
    pub fn wait_for_jobs(&mut self) {
        if self.job_table.is_empty() {
            return;
        }

        info!("waiting for {} jobs before exiting", self.job_table.len());
        let temp_result = self.job_table.wait_all(&mut io::stdout());
        log_if_err!(temp_result, "wait_all");
    }

    /// Reconciles outstanding jobs with the user. On confirmation the shell
    /// stops reading input and will exit with `status`, or with the last
    /// status if `status` is `None`.
    pub fn request_exit(&mut self, status: Option<ExitStatus>, stdout: &mut dyn Write) -> Result<()> {
        let editor = &mut self.editor;
        let decision = shutdown::coordinate(&mut self.job_table, |p| editor.readline(p), stdout)?;

        match decision {
            Shutdown::Exit => {
                self.exit_requested = true;
                self.exit_status = status;
            }
            Shutdown::Abort => debug!("exit aborted"),
        }
        Ok(())
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// The code the shell exits with, between 0 and 255.
    pub fn exit_code(&self) -> i32 {
        let status = self.exit_status.unwrap_or(self.last_exit_status);
        util::normalize_exit_code(status.code().unwrap_or(1))
    }

    pub fn last_exit_status(&self) -> ExitStatus {
        self.last_exit_status
    }

    pub fn job_table(&self) -> &JobTable {
        &self.job_table
    }

    pub fn job_table_mut(&mut self) -> &mut JobTable {
        &mut self.job_table
    }

    /// Exit the shell.
    ///
    /// Valid exit codes are between 0 and 255. Like bash, out of range codes
    /// wrap around.
    pub fn exit(&mut self) -> ! {
        let code = self.exit_code();
        info!("imcsh has shut down with {}", code);
        process::exit(code);
    }
}

impl fmt::Debug for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}\n{:?}", self.job_table, self.editor)
    }
}

fn isatty() -> bool {
    let temp_result = unistd::isatty(nix::libc::STDIN_FILENO);
    log_if_err!(temp_result, "unistd::isatty");
    temp_result.unwrap_or(false)
}
