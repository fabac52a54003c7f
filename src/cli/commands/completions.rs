//! The `completions` command.

use clap::CommandFactory;
use clap_complete::generate;

use crate::cli::args::{Cli, CompletionsArgs};
use crate::cli::{Command, CommandResult};
use crate::error::Result;
use crate::ui::UserInterface;

/// Generates shell completion scripts on stdout.
pub struct CompletionsCommand {
    args: CompletionsArgs,
}

impl CompletionsCommand {
    pub fn new(args: CompletionsArgs) -> Self {
        Self { args }
    }
}

impl Command for CompletionsCommand {
    fn execute(&self, _ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(self.args.shell, &mut cmd, name, &mut std::io::stdout());
        Ok(CommandResult::success())
    }
}
