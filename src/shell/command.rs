//! Subprocess invocation against the composed environment.
//!
//! Programs are invoked directly by resolved path or name with an explicit
//! argument vector (never through `sh -c` string splicing), and always with
//! the composed [`ExecutionEnvironment`] installed, so a tool installed
//! moments ago is visible without any shell restart.
//!
//! A command that cannot even be launched (program missing, spawn refused)
//! is reported as a failed [`CommandResult`], not an `Err`: callers treat
//! "couldn't run" and "ran and failed" through the same exit path.
//!
//! Subprocess execution carries no timeout. A hung installer blocks the
//! whole bootstrap, which is acceptable for an interactive tool.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::env::ExecutionEnvironment;

/// Result of executing a subprocess.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by a signal or never launched).
    pub exit_code: Option<i32>,

    /// Captured standard output (empty when inherited).
    pub stdout: String,

    /// Captured standard error, or the launch failure message.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether the command ran and exited 0.
    pub success: bool,
}

impl CommandResult {
    fn from_output(output: std::process::Output, duration: Duration) -> Self {
        Self {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            duration,
            success: output.status.success(),
        }
    }

    fn not_launched(message: String, duration: Duration) -> Self {
        Self {
            exit_code: None,
            stdout: String::new(),
            stderr: message,
            duration,
            success: false,
        }
    }
}

/// Render a program + args invocation for log and error messages.
pub fn display_command<S: AsRef<OsStr>>(program: impl AsRef<OsStr>, args: &[S]) -> String {
    let mut parts = vec![program.as_ref().to_string_lossy().into_owned()];
    parts.extend(args.iter().map(|a| a.as_ref().to_string_lossy().into_owned()));
    parts.join(" ")
}

fn base_command(
    program: impl AsRef<OsStr>,
    args: impl IntoIterator<Item = impl AsRef<OsStr>>,
    cwd: Option<&Path>,
    env: &ExecutionEnvironment,
) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(cwd) = cwd {
        cmd.current_dir(cwd);
    }
    env.configure(&mut cmd);
    cmd
}

/// Run a command with stdout/stderr captured.
pub fn run_captured(
    program: impl AsRef<OsStr>,
    args: impl IntoIterator<Item = impl AsRef<OsStr>>,
    cwd: Option<&Path>,
    env: &ExecutionEnvironment,
) -> CommandResult {
    let start = Instant::now();
    let mut cmd = base_command(program, args, cwd, env);
    cmd.stdin(Stdio::null());

    match cmd.output() {
        Ok(output) => CommandResult::from_output(output, start.elapsed()),
        Err(e) => CommandResult::not_launched(format!("failed to launch: {}", e), start.elapsed()),
    }
}

/// Run a command with stdio inherited, streaming output live to the
/// operator. Used for long-running work (dependency installs, builds) where
/// captured-and-silent would look like a hang.
pub fn run_streamed(
    program: impl AsRef<OsStr>,
    args: impl IntoIterator<Item = impl AsRef<OsStr>>,
    cwd: Option<&Path>,
    env: &ExecutionEnvironment,
) -> CommandResult {
    let start = Instant::now();
    let mut cmd = base_command(program, args, cwd, env);
    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    match cmd.status() {
        Ok(status) => CommandResult {
            exit_code: status.code(),
            stdout: String::new(),
            stderr: String::new(),
            duration: start.elapsed(),
            success: status.success(),
        },
        Err(e) => CommandResult::not_launched(format!("failed to launch: {}", e), start.elapsed()),
    }
}
