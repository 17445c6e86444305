use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::core::error::{LauncherError, LauncherResult};

use super::stage::{Stage, StageCommand};

/// How a finished processor is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionPolicy {
    /// Any termination completes the stage; the exit code is only logged.
    #[default]
    AnyExit,
    /// A non-zero or missing exit code fails the install.
    RequireSuccess,
}

/// Exit status reported by a [`ProcessRunner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageExit {
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl StageExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl CompletionPolicy {
    pub fn check(self, stage: Stage, exit: StageExit) -> LauncherResult<()> {
        match self {
            CompletionPolicy::AnyExit => Ok(()),
            CompletionPolicy::RequireSuccess if exit.success() => Ok(()),
            CompletionPolicy::RequireSuccess => Err(LauncherError::StageFailed {
                stage: stage.to_string(),
                code: exit.code,
            }),
        }
    }
}

/// Runs one processor command and resolves once the process has exited.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, command: &StageCommand) -> LauncherResult<StageExit>;
}

/// Runs processors under a real Java executable.
pub struct JavaProcessRunner {
    java_bin: PathBuf,
    working_dir: Option<PathBuf>,
}

impl JavaProcessRunner {
    pub fn new(java_bin: impl Into<PathBuf>) -> Self {
        Self {
            java_bin: java_bin.into(),
            working_dir: None,
        }
    }

    pub fn with_working_dir(mut self, dir: &Path) -> Self {
        self.working_dir = Some(dir.to_path_buf());
        self
    }
}

#[async_trait]
impl ProcessRunner for JavaProcessRunner {
    async fn run(&self, command: &StageCommand) -> LauncherResult<StageExit> {
        let mut cmd = Command::new(&self.java_bin);
        cmd.args(&command.tokens)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        debug!("Command: {:?} {}", self.java_bin, command.tokens.join(" "));

        let mut child = cmd
            .spawn()
            .map_err(|e| LauncherError::JavaExecution(format!("{}: {}", self.java_bin.display(), e)))?;

        let stage = command.stage;
        let stdout = child.stdout.take().map(|out| tokio::spawn(forward_lines(stage, "stdout", out)));
        let stderr = child.stderr.take().map(|err| tokio::spawn(forward_lines(stage, "stderr", err)));

        let status = child
            .wait()
            .await
            .map_err(|e| LauncherError::JavaExecution(e.to_string()))?;

        for task in [stdout, stderr].into_iter().flatten() {
            let _ = task.await;
        }

        info!("Processor {} exited with {:?}", stage, status.code());
        Ok(StageExit {
            code: status.code(),
        })
    }
}

async fn forward_lines<R>(stage: Stage, stream: &'static str, reader: R)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        debug!(target: "modloader_install::processor", "[{} {}] {}", stage, stream, line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_exit_accepts_failures() {
        let exit = StageExit { code: Some(1) };
        assert!(CompletionPolicy::AnyExit
            .check(Stage::JarSplitter, exit)
            .is_ok());
        assert!(CompletionPolicy::AnyExit
            .check(Stage::JarSplitter, StageExit { code: None })
            .is_ok());
    }

    #[test]
    fn require_success_rejects_non_zero_exit() {
        let err = CompletionPolicy::RequireSuccess
            .check(Stage::BinaryPatcher, StageExit { code: Some(3) })
            .unwrap_err();
        assert!(matches!(
            err,
            LauncherError::StageFailed { ref stage, code: Some(3) } if stage == "binarypatcher"
        ));
        assert!(CompletionPolicy::RequireSuccess
            .check(Stage::BinaryPatcher, StageExit { code: Some(0) })
            .is_ok());
    }

    #[tokio::test]
    async fn missing_java_binary_is_an_execution_error() {
        let runner = JavaProcessRunner::new(std::env::temp_dir().join(format!(
            "no-such-java-{}",
            uuid::Uuid::new_v4()
        )));
        let command = StageCommand {
            stage: Stage::InstallerTools,
            tokens: vec!["-version".into()],
        };

        let err = runner.run(&command).await.unwrap_err();
        assert!(matches!(err, LauncherError::JavaExecution(_)));
    }
}
