use crate::shell::builtins::{self, prelude::*};

pub struct Jobs;

impl builtins::BuiltinCommand for Jobs {
    const NAME: &'static str = builtins::JOBS_NAME;

    const HELP: &'static str = "\
jobs: jobs
    Display status of jobs.

    Lists the background processes the shell is tracking, in the order they
    were started, with their process IDs and command lines.

    Exit Status:
    Returns success unless an error occurs.";

    fn run(shell: &mut Shell, _args: &[String], stdout: &mut dyn Write) -> Result<()> {
        for (i, job) in shell.job_table().list().enumerate() {
            writeln!(stdout, "[{}] {}", i + 1, job)?;
        }

        Ok(())
    }
}
