//! Integration Tests

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use assert_cli::Assert;
use lazy_static::lazy_static;
use tempdir::TempDir;

trait AssertExt {
    fn exit_status_is(self, exit_status: i32) -> Self;
}

impl AssertExt for Assert {
    fn exit_status_is(self, exit_status: i32) -> Self {
        if exit_status == 0 {
            self.succeeds()
        } else {
            self.fails_with(exit_status)
        }
    }
}

struct CommandData<'a> {
    pub stdout: &'a str,
    pub exit_status: i32,
}

lazy_static! {
    static ref COMMAND_STRINGS_MAP: HashMap<&'static str, CommandData<'static>> = {
        let mut map = HashMap::new();
        map.insert("echo test", CommandData { stdout: "test\n", exit_status: 0 });
        map.insert("   ", CommandData { stdout: "", exit_status: 0 });
        map.insert("false", CommandData { stdout: "", exit_status: 1 });
        map.insert("exit 85", CommandData { stdout: "", exit_status: 85 });
        map.insert("exit 500", CommandData { stdout: "", exit_status: 244 });
        map.insert("exit -12", CommandData { stdout: "", exit_status: 244 });
        map.insert("exit nope", CommandData { stdout: "", exit_status: 2 });
        map.insert("exec", CommandData { stdout: "", exit_status: 2 });
        map.insert("echo test >", CommandData { stdout: "", exit_status: 2 });
        map.insert("no-such-program-imcsh", CommandData { stdout: "", exit_status: 127 });
        map.insert("help bogus", CommandData { stdout: "", exit_status: 1 });
        map
    };
}

fn generate_temp_directory() -> io::Result<TempDir> {
    // Because of limitation in `assert_cli`, temporary directory must be
    // subdirectory of directory containing Cargo.toml
    let temp_root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests");
    TempDir::new_in(temp_root, "temp")
}

/// Runs imcsh inside `dir`, logging into the directory instead of $HOME.
fn imcsh(dir: &Path, args: &[&str]) -> Assert {
    let log_flag = format!("--log={}", dir.join("imcsh.log").display());
    let mut all_args = vec![log_flag.as_str()];
    all_args.extend_from_slice(args);
    Assert::cargo_binary("imcsh")
        .current_dir(dir)
        .with_args(&all_args)
}

#[test]
fn test_command_strings() {
    for (command, expected) in COMMAND_STRINGS_MAP.iter() {
        let temp_dir = generate_temp_directory().expect("unable to generate temp dir");
        imcsh(temp_dir.path(), &["-c", command])
            .stdout()
            .is(expected.stdout)
            .exit_status_is(expected.exit_status)
            .unwrap();
    }
}

#[test]
fn test_version() {
    let temp_dir = generate_temp_directory().expect("unable to generate temp dir");
    imcsh(temp_dir.path(), &["--version"])
        .stdout()
        .is(format!("imcsh version {}\n", env!("CARGO_PKG_VERSION")).as_str())
        .unwrap();
}

#[test]
fn test_zero_max_jobs_is_rejected() {
    let temp_dir = generate_temp_directory().expect("unable to generate temp dir");
    imcsh(temp_dir.path(), &["--max-jobs=0", "-c", "true"])
        .fails_with(2)
        .stderr()
        .contains("--max-jobs")
        .unwrap();
}

#[test]
fn test_redirect_truncates_then_appends() {
    let temp_dir = generate_temp_directory().expect("unable to generate temp dir");
    fs::write(temp_dir.path().join("out.txt"), "stale contents\n").unwrap();

    imcsh(temp_dir.path(), &[])
        .stdin("echo hi > out.txt\necho there >> out.txt\nexit\n")
        .succeeds()
        .unwrap();

    let contents = fs::read_to_string(temp_dir.path().join("out.txt")).unwrap();
    assert_eq!(contents, "hi\nthere\n");
}

#[test]
fn test_cd_then_exec() {
    let temp_dir = generate_temp_directory().expect("unable to generate temp dir");
    fs::create_dir(temp_dir.path().join("sub")).unwrap();

    imcsh(temp_dir.path(), &[])
        .stdin("cd sub\nexec pwd\ncd nowhere\nexit\n")
        .stdout()
        .contains("/sub\nChild process with PID ")
        .stderr()
        .contains("cd: nowhere: ")
        .succeeds()
        .unwrap();
}

#[test]
fn test_background_job_terminated_on_exit() {
    let temp_dir = generate_temp_directory().expect("unable to generate temp dir");
    imcsh(temp_dir.path(), &[])
        .stdin("sleep 30 &\njobs\nexit\nn\n")
        .stdout()
        .contains("Started background process with PID ")
        .stdout()
        .contains("Command: sleep 30 &\n")
        .stdout()
        .contains("There are 1 background processes running.\n")
        .stdout()
        .contains("(sleep 30 &).\n")
        .succeeds()
        .unwrap();
}

#[test]
fn test_invalid_shutdown_answer_returns_to_shell() {
    let temp_dir = generate_temp_directory().expect("unable to generate temp dir");
    imcsh(temp_dir.path(), &[])
        .stdin("sleep 30 &\nexit\nmaybe\njobs\nquit\nN\n")
        .stdout()
        .contains("Invalid choice. Returning to the shell.\n")
        .stdout()
        .contains("[1] PID: ")
        .stdout()
        .contains("Terminated background process with PID ")
        .succeeds()
        .unwrap();
}

#[test]
fn test_background_job_waited_on_exit() {
    let temp_dir = generate_temp_directory().expect("unable to generate temp dir");
    imcsh(temp_dir.path(), &[])
        .stdin("sleep 1 &\nexit\ny\n")
        .stdout()
        .contains("(sleep 1 &) finished.\n")
        .succeeds()
        .unwrap();
}

#[test]
fn test_end_of_input_waits_for_jobs() {
    let temp_dir = generate_temp_directory().expect("unable to generate temp dir");
    imcsh(temp_dir.path(), &[])
        .stdin("sleep 1 &\n")
        .stdout()
        .contains("(sleep 1 &) finished.\n")
        .succeeds()
        .unwrap();
}

#[test]
fn test_finished_job_reported_at_next_prompt() {
    let temp_dir = generate_temp_directory().expect("unable to generate temp dir");
    imcsh(temp_dir.path(), &[])
        .stdin("sleep 0.2 &\nsleep 1\njobs\nexit\n")
        .stdout()
        .contains("(sleep 0.2 &) finished.\n")
        .stdout()
        .doesnt_contain("[1] PID: ")
        .stdout()
        .doesnt_contain("There are ")
        .succeeds()
        .unwrap();
}

#[test]
fn test_job_table_capacity() {
    let temp_dir = generate_temp_directory().expect("unable to generate temp dir");
    imcsh(temp_dir.path(), &["--max-jobs=1"])
        .stdin("sleep 30 &\nsleep 30 &\njobs\nexit\nn\n")
        .stderr()
        .contains("maximum background processes reached (1)")
        .stdout()
        .contains("[1] PID: ")
        .succeeds()
        .unwrap();
}

#[test]
fn test_globalusage() {
    let temp_dir = generate_temp_directory().expect("unable to generate temp dir");
    imcsh(temp_dir.path(), &["-c", "globalusage"])
        .stdout()
        .contains(
            format!(
                "IMCSH Version {}.{} created by mssevov, bbkanev\n",
                env!("CARGO_PKG_VERSION_MAJOR"),
                env!("CARGO_PKG_VERSION_MINOR")
            )
            .as_str(),
        )
        .succeeds()
        .unwrap();
}
