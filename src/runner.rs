//! Child-process execution for provisioning commands.
//!
//! Every external command the tool runs (clone, install, build, launch) goes
//! through the [`ProcessRunner`] trait. The production implementation spawns
//! the command with piped stdio and relays its output line-by-line, so the
//! user sees install/build progress as it happens. Tests inject recording
//! fakes instead of spawning anything.

use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// A fully resolved external command: program, arguments, working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl CommandSpec {
    /// Build a spec from a flat argv vector (program first).
    pub fn from_argv(argv: &[String], cwd: impl Into<PathBuf>) -> Result<Self> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| anyhow::anyhow!("command is empty"))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            cwd: cwd.into(),
        })
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("Command '{command}' not found. Please ensure it is installed and in your PATH.")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Command '{command}' failed with exit code {code}")]
    Failed { command: String, code: i32 },
    #[error("Command '{command}' was terminated by a signal")]
    Killed { command: String },
    #[error("Failed to read command output: {0}")]
    Io(#[from] std::io::Error),
}

impl RunnerError {
    /// The child's exit code, when the command ran and exited non-zero.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            RunnerError::Failed { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Runs one external command to completion.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Execute `command`, relaying its stdout and stderr to this process's
    /// stdout and stderr as lines arrive. Resolves once the child has exited
    /// with status 0; any other outcome is a [`RunnerError`].
    async fn run(&self, command: &CommandSpec) -> Result<(), RunnerError>;
}

/// Production runner backed by `tokio::process::Command`.
#[derive(Debug, Default)]
pub struct CommandRunner;

impl CommandRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for CommandRunner {
    async fn run(&self, command: &CommandSpec) -> Result<(), RunnerError> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .current_dir(&command.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| RunnerError::Spawn {
            command: command.program.clone(),
            source,
        })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "Failed to capture stdout")
        })?;
        let stderr = child.stderr.take().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "Failed to capture stderr")
        })?;

        let mut stdout_lines = BufReader::new(stdout).lines();
        let mut stderr_lines = BufReader::new(stderr).lines();

        let mut stdout_done = false;
        let mut stderr_done = false;

        // Drain both streams concurrently to avoid backpressure deadlock.
        while !stdout_done || !stderr_done {
            tokio::select! {
                line = stdout_lines.next_line(), if !stdout_done => {
                    match line? {
                        Some(line) => println!("{}", line),
                        None => stdout_done = true,
                    }
                }
                line = stderr_lines.next_line(), if !stderr_done => {
                    match line? {
                        Some(line) => eprintln!("{}", line),
                        None => stderr_done = true,
                    }
                }
            }
        }

        let status = child.wait().await?;

        if status.success() {
            return Ok(());
        }

        match status.code() {
            Some(code) => Err(RunnerError::Failed {
                command: command.to_string(),
                code,
            }),
            None => Err(RunnerError::Killed {
                command: command.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str, cwd: &std::path::Path) -> CommandSpec {
        CommandSpec {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            cwd: cwd.to_path_buf(),
        }
    }

    #[test]
    fn test_from_argv_splits_program_and_args() {
        let argv = vec![
            "npm".to_string(),
            "install".to_string(),
            "--silent".to_string(),
        ];
        let spec = CommandSpec::from_argv(&argv, "/tmp").unwrap();
        assert_eq!(spec.program, "npm");
        assert_eq!(spec.args, vec!["install", "--silent"]);
        assert_eq!(spec.to_string(), "npm install --silent");
    }

    #[test]
    fn test_from_argv_rejects_empty_vector() {
        let result = CommandSpec::from_argv(&[], "/tmp");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_run_succeeds_on_zero_exit() {
        let dir = tempfile::TempDir::new().unwrap();
        let runner = CommandRunner::new();
        let result = runner.run(&sh("exit 0", dir.path())).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_run_reports_nonzero_exit_code() {
        let dir = tempfile::TempDir::new().unwrap();
        let runner = CommandRunner::new();
        let err = runner.run(&sh("exit 7", dir.path())).await.unwrap_err();
        assert_eq!(err.exit_code(), Some(7));
        assert!(matches!(err, RunnerError::Failed { code: 7, .. }));
    }

    #[tokio::test]
    async fn test_run_reports_signal_death_as_killed() {
        let dir = tempfile::TempDir::new().unwrap();
        let runner = CommandRunner::new();

        // The child SIGKILLs itself, so it exits without a status code.
        let err = runner
            .run(&sh("kill -9 $$", dir.path()))
            .await
            .unwrap_err();
        assert!(matches!(err, RunnerError::Killed { .. }));
        assert_eq!(err.exit_code(), None);
    }

    #[tokio::test]
    async fn test_run_reports_missing_program_as_spawn_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let runner = CommandRunner::new();
        let spec = CommandSpec {
            program: "definitely-not-a-real-binary-1a2b3c".to_string(),
            args: vec![],
            cwd: dir.path().to_path_buf(),
        };
        let err = runner.run(&spec).await.unwrap_err();
        assert!(matches!(err, RunnerError::Spawn { .. }));
        assert!(err.to_string().contains("not found"));
        assert_eq!(err.exit_code(), None);
    }

    #[tokio::test]
    async fn test_run_uses_working_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let runner = CommandRunner::new();
        runner
            .run(&sh("touch marker_file", dir.path()))
            .await
            .unwrap();
        assert!(dir.path().join("marker_file").exists());
    }
}
