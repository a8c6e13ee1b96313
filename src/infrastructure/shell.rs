//! Command executor for running shell commands
//!
//! Used after a project is generated to initialize version control and
//! install the project's dependencies.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::core::{Error, Result};

/// Trait for executing shell commands
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Execute a shell command in the given working directory
    async fn execute(&self, command: &str, working_dir: &Path) -> Result<CommandResult>;
}

/// Result of command execution
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    /// Check if the command was successful
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Default command executor using tokio::process
pub struct ShellCommandExecutor;

impl ShellCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ShellCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandExecutor for ShellCommandExecutor {
    async fn execute(&self, command: &str, working_dir: &Path) -> Result<CommandResult> {
        let (shell, shell_arg) = if cfg!(target_os = "windows") {
            ("cmd", "/C")
        } else {
            ("sh", "-c")
        };

        debug!(command, dir = %working_dir.display(), "Running command");
        let output = Command::new(shell)
            .arg(shell_arg)
            .arg(command)
            .current_dir(working_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::external(command, format!("failed to start: {e}")))?;

        Ok(CommandResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Run `command` and turn a non-zero exit into [`Error::External`]
pub async fn run_checked(
    executor: &dyn CommandExecutor,
    command: &str,
    working_dir: &Path,
) -> Result<CommandResult> {
    let result = executor.execute(command, working_dir).await?;
    if !result.is_success() {
        let detail = result.stderr.trim();
        let message = if detail.is_empty() {
            format!("exit code {}", result.exit_code)
        } else {
            format!("exit code {}: {detail}", result.exit_code)
        };
        return Err(Error::external(command, message));
    }
    info!(command, "Command finished");
    Ok(result)
}

/// Command executor returning canned results, recording every command it sees
#[cfg(test)]
#[derive(Default)]
pub struct MockCommandExecutor {
    results: std::collections::HashMap<String, CommandResult>,
    executed: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockCommandExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(
        mut self,
        command: &str,
        exit_code: i32,
        stdout: &str,
        stderr: &str,
    ) -> Self {
        self.results.insert(
            command.to_string(),
            CommandResult {
                exit_code,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        );
        self
    }

    /// Commands executed so far, in order
    pub fn executed(&self) -> Vec<String> {
        self.executed
            .lock()
            .map(|commands| commands.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[async_trait]
impl CommandExecutor for MockCommandExecutor {
    async fn execute(&self, command: &str, _working_dir: &Path) -> Result<CommandResult> {
        if let Ok(mut executed) = self.executed.lock() {
            executed.push(command.to_string());
        }
        self.results.get(command).cloned().ok_or_else(|| {
            Error::external(command, "mock executor has no result for this command")
        })
    }
}
