//! Infrastructure layer - process execution for post-generation steps

pub mod shell;

pub use shell::{CommandExecutor, CommandResult, ShellCommandExecutor, run_checked};
