use crate::shell::builtins::{self, prelude::*};

pub struct Help;

impl builtins::BuiltinCommand for Help {
    const NAME: &'static str = builtins::HELP_NAME;

    const HELP: &'static str = "\
help: help [command ...]
    Display helpful information about builtin commands. If COMMAND is specified,
    gives detailed help on all commands matching COMMAND, otherwise a list of the
    builtins is printed.

    Any other command is looked up on $PATH and run as a program. A trailing
    `&' runs it in the background, and `> file' or `>> file' redirects its
    standard output. `exec program [args ...]' runs PROGRAM and reports its
    process ID when it finishes.";

    fn run(_shell: &mut Shell, args: &[String], stdout: &mut dyn Write) -> Result<()> {
        if args.is_empty() {
            writeln!(stdout, "Commands:")?;
            for usage in builtins::all_usages() {
                writeln!(stdout, "\t{}", usage)?;
            }
            writeln!(stdout, "\texec: exec program [args ...]")?;
            return Ok(());
        }

        let mut all_invalid = true;
        for arg in args {
            if let Some(text) = builtins::help_text(arg) {
                writeln!(stdout, "{}", text)?;
                all_invalid = false;
            }
        }

        if all_invalid {
            let topic = args.last().map(String::as_str).unwrap_or_default();
            return Err(Error::builtin_command(
                format!("help: no help topics match {}", topic),
                1,
            ));
        }

        Ok(())
    }
}

pub struct GlobalUsage;

impl builtins::BuiltinCommand for GlobalUsage {
    const NAME: &'static str = builtins::GLOBALUSAGE_NAME;

    const HELP: &'static str = "\
globalusage: globalusage
    Display the shell's version.";

    fn run(_shell: &mut Shell, _args: &[String], stdout: &mut dyn Write) -> Result<()> {
        writeln!(stdout, "{}", version_banner())?;
        Ok(())
    }
}

fn version_banner() -> String {
    let authors = env!("CARGO_PKG_AUTHORS");
    let mut banner = format!(
        "IMCSH Version {}.{}",
        env!("CARGO_PKG_VERSION_MAJOR"),
        env!("CARGO_PKG_VERSION_MINOR")
    );
    if !authors.is_empty() {
        banner.push_str(" created by ");
        banner.push_str(&authors.replace(':', ", "));
    }
    banner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::builtins::BuiltinCommand;
    use crate::shell::ShellConfig;

    fn run<B: BuiltinCommand>(args: &[&str]) -> (Result<()>, String) {
        let mut shell = Shell::new(ShellConfig::noninteractive(1)).unwrap();
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let mut stdout = Vec::new();
        let result = B::run(&mut shell, &args, &mut stdout);
        (result, String::from_utf8(stdout).unwrap())
    }

    #[test]
    fn test_help_lists_every_builtin() {
        let (result, output) = run::<Help>(&[]);
        assert!(result.is_ok());
        assert!(output.starts_with("Commands:\n"));
        for usage in &["cd: cd [dir]", "exit: exit [n]", "globalusage", "help:", "jobs: jobs", "exec:"] {
            assert!(output.contains(usage), "missing {} in {}", usage, output);
        }
    }

    #[test]
    fn test_help_topic() {
        let (result, output) = run::<Help>(&["quit"]);
        assert!(result.is_ok());
        assert!(output.starts_with("exit: exit [n]\n"));
    }

    #[test]
    fn test_help_unknown_topic() {
        let (result, output) = run::<Help>(&["bogus"]);
        assert_eq!(
            result.unwrap_err().to_string(),
            "help: no help topics match bogus"
        );
        assert!(output.is_empty());
    }

    #[test]
    fn test_globalusage() {
        let (result, output) = run::<GlobalUsage>(&[]);
        assert!(result.is_ok());
        assert_eq!(
            output,
            format!(
                "IMCSH Version {}.{} created by mssevov, bbkanev\n",
                env!("CARGO_PKG_VERSION_MAJOR"),
                env!("CARGO_PKG_VERSION_MINOR")
            )
        );
    }
}
