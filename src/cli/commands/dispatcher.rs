//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command against the given UI, returning the outcome and
    /// the process exit code to use.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Forward an exit code verbatim from a child process.
    pub fn forwarded(exit_code: i32) -> Self {
        Self {
            success: exit_code == 0,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Dispatch and execute a command.
    ///
    /// With no subcommand, a terminal gets the interactive menu and
    /// anything else (CI, pipes) gets a plain setup run.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Setup) => {
                let cmd = super::setup::SetupCommand::new(&self.project_root);
                cmd.execute(ui)
            }
            Some(Commands::Run(args)) => {
                let cmd = super::run::RunCommand::new(&self.project_root, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Status(args)) => {
                let cmd = super::status::StatusCommand::new(&self.project_root, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Rebuild) => {
                let cmd = super::rebuild::RebuildCommand::new(&self.project_root);
                cmd.execute(ui)
            }
            Some(Commands::Reinstall) => {
                let cmd = super::reinstall::ReinstallCommand::new(&self.project_root);
                cmd.execute(ui)
            }
            Some(Commands::Menu) => {
                let cmd = super::menu::MenuCommand::new(&self.project_root);
                cmd.execute(ui)
            }
            Some(Commands::Completions(args)) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
            None => {
                if ui.is_interactive() {
                    let cmd = super::menu::MenuCommand::new(&self.project_root);
                    cmd.execute(ui)
                } else {
                    let cmd = super::setup::SetupCommand::new(&self.project_root);
                    cmd.execute(ui)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn forwarded_code_keeps_value() {
        let result = CommandResult::forwarded(42);
        assert!(!result.success);
        assert_eq!(result.exit_code, 42);

        let zero = CommandResult::forwarded(0);
        assert!(zero.success);
    }

    #[test]
    fn dispatcher_remembers_root() {
        let dispatcher = CommandDispatcher::new(PathBuf::from("/work/app"));
        assert_eq!(dispatcher.project_root(), Path::new("/work/app"));
    }
}
