//! Process invocation for synthesized command lines.

use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::lexing::split_command_line;

/// Failure to run a command line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvocationError {
    /// The process could not be started (empty or malformed command line,
    /// binary missing, ...).
    #[error("failed to start `{program}`: {reason}")]
    Launch { program: String, reason: String },

    /// The process started but did not exit successfully.
    #[error("{message}")]
    Execution { exit_code: Option<i32>, message: String },
}

impl InvocationError {
    pub fn launch(program: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Launch {
            program: program.into(),
            reason: reason.into(),
        }
    }

    fn from_status(status: ExitStatus) -> Self {
        let exit_code = status.code();
        let message = match exit_code {
            Some(code) => format!("exit status {code}"),
            None => "process terminated by signal".to_string(),
        };
        Self::Execution { exit_code, message }
    }

    /// Exit code carried by an execution failure, when one is known.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Execution { exit_code, .. } => *exit_code,
            Self::Launch { .. } => None,
        }
    }
}

/// Output captured from one invocation.
///
/// Lines captured before a failure are kept alongside the failure itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
    pub status: Result<(), InvocationError>,
}

impl Default for ProcessOutput {
    fn default() -> Self {
        Self {
            stdout: Vec::new(),
            stderr: Vec::new(),
            status: Ok(()),
        }
    }
}

/// Runs a command line to completion.
///
/// Implementations block the calling task until the command finishes; there is
/// no timeout and no cancellation.
#[async_trait]
pub trait ProcessInvoker: Send + Sync {
    async fn invoke(&self, command_line: &str) -> ProcessOutput;
}

/// Invoker that spawns real processes.
///
/// The command line is split with [`split_command_line`] and executed
/// directly, without a shell. stdout and stderr are read line by line
/// concurrently.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemInvoker;

#[async_trait]
impl ProcessInvoker for SystemInvoker {
    async fn invoke(&self, command_line: &str) -> ProcessOutput {
        let argv = match split_command_line(command_line) {
            Ok(argv) => argv,
            Err(error) => {
                warn!(%command_line, %error, "refusing to run malformed command line");
                return ProcessOutput {
                    status: Err(InvocationError::launch(command_line, error.to_string())),
                    ..Default::default()
                };
            }
        };
        let Some((program, args)) = argv.split_first() else {
            return ProcessOutput {
                status: Err(InvocationError::launch("", "empty command line")),
                ..Default::default()
            };
        };

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(error) => {
                warn!(%program, %error, "failed to spawn command");
                return ProcessOutput {
                    status: Err(InvocationError::launch(program.as_str(), error.to_string())),
                    ..Default::default()
                };
            }
        };

        let (stdout, stderr) = tokio::join!(collect_lines(child.stdout.take()), collect_lines(child.stderr.take()));
        let status = match child.wait().await {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(InvocationError::from_status(status)),
            Err(error) => Err(InvocationError::Execution {
                exit_code: None,
                message: error.to_string(),
            }),
        };
        debug!(%program, ok = status.is_ok(), stdout_lines = stdout.len(), stderr_lines = stderr.len(), "command finished");

        ProcessOutput { stdout, stderr, status }
    }
}

/// Invoker that never spawns anything and echoes the command line as stdout.
///
/// Useful for previews and for exercising the HTTP surface without side
/// effects.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopInvoker;

#[async_trait]
impl ProcessInvoker for NoopInvoker {
    async fn invoke(&self, command_line: &str) -> ProcessOutput {
        ProcessOutput {
            stdout: vec![command_line.to_string()],
            ..Default::default()
        }
    }
}

async fn collect_lines<R>(reader: Option<R>) -> Vec<String>
where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else {
        return Vec::new();
    };
    let mut reader = BufReader::new(reader);
    let mut lines = Vec::new();
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        match reader.read_until(b'\n', &mut buffer).await {
            Ok(0) => break,
            Ok(_) => {
                if buffer.last() == Some(&b'\n') {
                    buffer.pop();
                    if buffer.last() == Some(&b'\r') {
                        buffer.pop();
                    }
                }
                lines.push(String::from_utf8_lossy(&buffer).into_owned());
            }
            Err(error) => {
                warn!(%error, "stopped reading command output");
                break;
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_command_line_is_a_launch_error() {
        let output = SystemInvoker.invoke("   ").await;
        assert!(matches!(output.status, Err(InvocationError::Launch { .. })));
        assert!(output.stdout.is_empty());
    }

    #[tokio::test]
    async fn missing_binary_is_a_launch_error() {
        let output = SystemInvoker.invoke("cmdrest-definitely-not-a-binary --flag").await;
        let err = output.status.unwrap_err();
        assert_eq!(err.exit_code(), None);
        assert!(err.to_string().contains("cmdrest-definitely-not-a-binary"), "{err}");
    }

    #[tokio::test]
    async fn unbalanced_quote_is_a_launch_error() {
        let output = SystemInvoker.invoke("echo it's").await;
        assert_eq!(
            output.status,
            Err(InvocationError::launch("echo it's", "unterminated single quote"))
        );
        assert!(output.stdout.is_empty());
    }

    #[tokio::test]
    async fn trailing_backslash_is_a_launch_error() {
        let output = SystemInvoker.invoke("echo dir\\").await;
        let err = output.status.unwrap_err();
        assert_eq!(err.exit_code(), None);
        assert_eq!(err.to_string(), "failed to start `echo dir\\`: dangling escape at end of input");
    }

    #[tokio::test]
    async fn noop_invoker_echoes_the_command() {
        let output = NoopInvoker.invoke("ls -l /tmp").await;
        assert_eq!(output.stdout, vec!["ls -l /tmp"]);
        assert!(output.status.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_stdout_lines() {
        let output = SystemInvoker.invoke("printf 'one\\ntwo\\n'").await;
        assert!(output.status.is_ok(), "{:?}", output.status);
        assert_eq!(output.stdout, vec!["one", "two"]);
        assert!(output.stderr.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_carries_the_code() {
        let output = SystemInvoker.invoke("sh -c 'echo oops >&2; exit 3'").await;
        let err = output.status.unwrap_err();
        assert_eq!(err.exit_code(), Some(3));
        assert_eq!(err.to_string(), "exit status 3");
        assert_eq!(output.stderr, vec!["oops"]);
    }
}
