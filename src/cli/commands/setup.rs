//! The `setup` command: run the full bootstrap.

use std::path::Path;

use crate::cli::commands::bootstrap_project;
use crate::cli::{Command, CommandResult};
use crate::error::Result;
use crate::project::Project;
use crate::ui::UserInterface;

/// Runs all bootstrap stages and reports the outcome.
pub struct SetupCommand {
    project: Project,
}

impl SetupCommand {
    pub fn new(project_root: &Path) -> Self {
        Self {
            project: Project::new(project_root),
        }
    }
}

impl Command for SetupCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header("Basecamp");
        ui.message(&format!("Project: {}", self.project.root().display()));

        let (report, _env) = bootstrap_project(&self.project, ui);

        if report.is_ready() {
            ui.success("Setup complete. Ready to run.");
            Ok(CommandResult::success())
        } else {
            if let crate::bootstrap::BootstrapState::Failed { stage, reason } = &report.state {
                ui.error(&format!("Setup failed at {}: {}", stage, reason));
            }
            Ok(CommandResult::failure(1))
        }
    }
}
