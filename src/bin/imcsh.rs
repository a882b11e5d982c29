use std::path::PathBuf;
use std::process;

use docopt::Docopt;
use imcsh::errors::Error;
use imcsh::{Shell, ShellConfig};
use log::{debug, error};
use nix::unistd::Pid;
use serde_derive::Deserialize;

const LOG_FILE_NAME: &str = ".imcsh_log";
const FATAL_EXIT_STATUS: i32 = 1;
const USAGE_EXIT_STATUS: i32 = 2;

const USAGE: &str = "
imcsh.

Usage:
    imcsh [options]
    imcsh [options] -c <command>
    imcsh (-h | --help)
    imcsh --version

Options:
    -h --help         Show this screen.
    --version         Show version.
    -c                Run the command line given as the first non-option argument,
                          then exit.
    --log=<path>      File to write log to, defaults to ~/.imcsh_log
    --max-jobs=<n>    Maximum number of background processes [default: 128].
";

/// Docopts input arguments.
#[derive(Debug, Deserialize)]
struct Args {
    arg_command: Option<String>,
    flag_version: bool,
    flag_c: bool,
    flag_log: Option<String>,
    flag_max_jobs: usize,
}

fn main() {
    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    if args.flag_max_jobs == 0 {
        eprintln!("imcsh: --max-jobs must be at least 1");
        process::exit(USAGE_EXIT_STATUS);
    }

    init_logger(&args.flag_log);
    debug!("{:?}", args);

    if args.flag_version {
        println!("imcsh version {}", env!("CARGO_PKG_VERSION"));
    } else if let Some(ref command) = args.arg_command {
        execute_from_command_string(command, args.flag_max_jobs);
    } else {
        execute_from_stdin(args.flag_max_jobs);
    }
}

/// Logging is best effort: the shell runs on without it.
fn init_logger(path: &Option<String>) {
    let log_path = match path.clone().map(PathBuf::from).or_else(default_log_path) {
        Some(log_path) => log_path,
        None => {
            eprintln!("imcsh: warning: no home directory, logging disabled");
            return;
        }
    };

    let log_file = match fern::log_file(&log_path) {
        Ok(log_file) => log_file,
        Err(e) => {
            eprintln!(
                "imcsh: warning: unable to open log file {}: {}",
                log_path.display(),
                e
            );
            return;
        }
    };

    let pid = Pid::this();
    let result = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                pid,
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Trace)
        .chain(log_file)
        .apply();
    if let Err(e) = result {
        eprintln!("imcsh: warning: unable to start logger: {}", e);
    }
}

fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(LOG_FILE_NAME))
}

fn execute_from_command_string(command: &str, max_jobs: usize) -> ! {
    let shell_config = ShellConfig::noninteractive(max_jobs);
    let mut shell = Shell::new(shell_config).unwrap_or_else(|e| display_error_and_exit(&e));
    shell.execute_command_string(command);
    shell.wait_for_jobs();
    shell.exit()
}

fn execute_from_stdin(max_jobs: usize) -> ! {
    let shell_config = ShellConfig::interactive(max_jobs);
    let mut shell = Shell::new(shell_config).unwrap_or_else(|e| display_error_and_exit(&e));
    shell.execute_from_stdin();
    shell.exit()
}

fn display_error_and_exit(error: &Error) -> ! {
    error!("failed to create shell: {}", error);
    eprintln!("imcsh: {}", error);
    process::exit(FATAL_EXIT_STATUS);
}
