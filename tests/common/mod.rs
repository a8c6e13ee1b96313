//! Helpers shared by the integration tests

use async_trait::async_trait;
use mcp_scaffold::core::{Error, Result};
use mcp_scaffold::infrastructure::{CommandExecutor, CommandResult};
use std::path::Path;

/// Executor for files-only generation: any command it receives is a failure
pub struct NoCommands;

#[async_trait]
impl CommandExecutor for NoCommands {
    async fn execute(&self, command: &str, _working_dir: &Path) -> Result<CommandResult> {
        Err(Error::external(command, "no commands expected"))
    }
}
