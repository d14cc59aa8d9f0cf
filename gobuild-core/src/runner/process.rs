//! External tool execution

use crate::models::{Invocation, ProcessOutput};
use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// Failures that prevent a process from producing an exit status
#[derive(Debug, Error)]
pub enum RunError {
    #[error("{program} not found")]
    NotFound { program: String },

    #[error("Working directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to wait for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{command} timed out after {seconds} seconds")]
    Timeout { command: String, seconds: u64 },
}

/// Trait for executing tool invocations
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run the invocation to completion or until its timeout expires
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, RunError>;
}

/// Runs invocations as tokio child processes
#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

async fn read_all<R: AsyncRead + Unpin>(mut reader: R) -> String {
    let mut buf = Vec::new();
    if let Err(e) = reader.read_to_end(&mut buf).await {
        tracing::debug!(error = %e, bytes = buf.len(), "Output stream read failed; keeping partial output");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

async fn collect(task: Option<&mut JoinHandle<String>>) -> String {
    match task {
        Some(task) => task.await.unwrap_or_default(),
        None => String::new(),
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, RunError> {
        let start_time = Instant::now();
        let program = invocation.program.clone();

        // Spawning in a missing directory also reports NotFound
        if !invocation.cwd.is_dir() {
            return Err(RunError::MissingDirectory(invocation.cwd.clone()));
        }

        tracing::debug!(
            command = %invocation.command_line(),
            cwd = %invocation.cwd.display(),
            "Spawning process"
        );

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(if invocation.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => RunError::NotFound {
                    program: program.clone(),
                },
                _ => RunError::Spawn {
                    program: program.clone(),
                    source,
                },
            })?;

        if let (Some(input), Some(mut stdin)) = (invocation.stdin.clone(), child.stdin.take()) {
            tokio::spawn(async move {
                // The child may exit without draining stdin
                let _ = stdin.write_all(input.as_bytes()).await;
            });
        }

        let mut stdout_task = child.stdout.take().map(|out| tokio::spawn(read_all(out)));
        let mut stderr_task = child.stderr.take().map(|err| tokio::spawn(read_all(err)));

        // The deadline covers draining the pipes too: a background process
        // can keep them open after the child itself has exited
        let finished = timeout(invocation.timeout, async {
            let status = child.wait().await?;
            let stdout = collect(stdout_task.as_mut()).await;
            let stderr = collect(stderr_task.as_mut()).await;
            Ok::<_, io::Error>((status, stdout, stderr))
        })
        .await;

        match finished {
            Ok(Ok((status, stdout, stderr))) => {
                let output = ProcessOutput {
                    exit_code: status.code(),
                    stdout,
                    stderr,
                    duration_ms: start_time.elapsed().as_millis() as u64,
                };
                tracing::debug!(
                    command = %invocation.command_line(),
                    exit_code = ?output.exit_code,
                    duration_ms = output.duration_ms,
                    "Process finished"
                );
                Ok(output)
            }
            Ok(Err(source)) => Err(RunError::Wait { program, source }),
            Err(_) => {
                let _ = child.kill().await;
                for task in [stdout_task, stderr_task].into_iter().flatten() {
                    task.abort();
                }

                tracing::warn!(
                    command = %invocation.command_line(),
                    timeout_secs = invocation.timeout.as_secs(),
                    "Process timed out"
                );
                Err(RunError::Timeout {
                    command: invocation.command_line(),
                    seconds: invocation.timeout.as_secs(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sh(script: &str) -> Invocation {
        Invocation::new("sh", ["-c", script], std::env::temp_dir())
            .with_timeout(Duration::from_secs(10))
    }

    #[tokio::test]
    async fn test_runner_captures_output() {
        let runner = TokioProcessRunner::new();
        let output = runner
            .run(&sh("echo hello && echo oops >&2"))
            .await
            .unwrap();

        assert!(output.success());
        assert_eq!(output.stdout, "hello\n");
        assert_eq!(output.stderr, "oops\n");
    }

    #[tokio::test]
    async fn test_runner_failure_exit_code() {
        let output = TokioProcessRunner::new().run(&sh("exit 3")).await.unwrap();
        assert!(!output.success());
        assert_eq!(output.exit_code, Some(3));
    }

    #[tokio::test]
    async fn test_runner_feeds_stdin() {
        let invocation = Invocation::new("cat", Vec::<String>::new(), std::env::temp_dir())
            .with_stdin("package main\n");
        let output = TokioProcessRunner::new().run(&invocation).await.unwrap();
        assert_eq!(output.stdout, "package main\n");
    }

    #[tokio::test]
    async fn test_runner_timeout() {
        let invocation = sh("sleep 10").with_timeout(Duration::from_secs(1));
        let err = TokioProcessRunner::new().run(&invocation).await.unwrap_err();
        assert!(matches!(err, RunError::Timeout { seconds: 1, .. }));
    }

    #[tokio::test]
    async fn test_runner_timeout_covers_inherited_pipes() {
        // The backgrounded sleep keeps stdout open after sh exits
        let invocation = sh("sleep 6 & echo hi").with_timeout(Duration::from_secs(1));
        let started = Instant::now();
        let err = TokioProcessRunner::new().run(&invocation).await.unwrap_err();

        assert!(matches!(err, RunError::Timeout { seconds: 1, .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_runner_missing_program() {
        let invocation = Invocation::new(
            "gobuild-definitely-missing-tool",
            Vec::<String>::new(),
            std::env::temp_dir(),
        );
        let err = TokioProcessRunner::new().run(&invocation).await.unwrap_err();
        assert!(matches!(err, RunError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_runner_missing_directory() {
        let invocation = Invocation::new("sh", ["-c", "true"], "/nonexistent/gobuild/dir");
        let err = TokioProcessRunner::new().run(&invocation).await.unwrap_err();
        assert!(matches!(err, RunError::MissingDirectory(_)));
    }
}
