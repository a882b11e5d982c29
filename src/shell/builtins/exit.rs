use crate::shell::builtins::{self, prelude::*};

pub struct Exit;

impl builtins::BuiltinCommand for Exit {
    const NAME: &'static str = builtins::EXIT_NAME;

    const HELP: &'static str = "\
exit: exit [n]
    Exit the shell with a status of N. If N is omitted, the exit status
    is that of the last command executed. `quit' is a synonym.

    If background processes are still running, asks whether to wait for
    them or to terminate them first. Any other answer cancels the exit.";

    fn run(shell: &mut Shell, args: &[String], stdout: &mut dyn Write) -> Result<()> {
        let status = match args.first() {
            Some(arg) => match arg.parse::<i32>() {
                Ok(code) => Some(ExitStatus::from_status(code)),
                Err(_) => {
                    return Err(Error::builtin_command(
                        format!("exit: {}: numeric argument required", arg),
                        2,
                    ))
                }
            },
            None => None,
        };

        shell.request_exit(status, stdout)
    }
}
