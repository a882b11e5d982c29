//! Error module. See the [error-chain](https://crates.io/crates/error-chain) crate for details.

error_chain! {
    foreign_links {
        Io(::std::io::Error);
        Nix(::nix::Error);
        Nul(::std::ffi::NulError);
        Readline(::rustyline::error::ReadlineError);
    }

    errors {
        /// Malformed command line, e.g. a redirection operator without a target.
        Syntax(message: String) {
            description("syntax error")
            display("syntax error: {}", message)
        }

        /// A builtin failed; `code` becomes the shell's last exit status.
        BuiltinCommand(message: String, code: i32) {
            description("builtin command error")
            display("{}", message)
        }

        JobTableFull(capacity: usize) {
            description("job table full")
            display(
                "maximum background processes reached ({}), cannot start a new background process",
                capacity
            )
        }

        DuplicateJob(pid: i32) {
            description("duplicate job")
            display("process {} is already tracked", pid)
        }
    }
}

impl Error {
    pub(crate) fn syntax<T: AsRef<str>>(message: T) -> Error {
        ErrorKind::Syntax(message.as_ref().to_string()).into()
    }

    pub(crate) fn builtin_command<T: AsRef<str>>(message: T, code: i32) -> Error {
        ErrorKind::BuiltinCommand(message.as_ref().to_string(), code).into()
    }
}
