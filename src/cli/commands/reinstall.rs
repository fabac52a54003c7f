//! The `reinstall` command: wipe dependencies, then install and build again.

use std::path::Path;

use crate::cli::commands::bootstrap_project;
use crate::cli::{Command, CommandResult};
use crate::error::Result;
use crate::project::Project;
use crate::ui::UserInterface;

/// Removes the dependency store so the orchestrator's install stage runs
/// again, which also forces a rebuild, marker or no marker.
pub struct ReinstallCommand {
    project: Project,
}

impl ReinstallCommand {
    pub fn new(project_root: &Path) -> Self {
        Self {
            project: Project::new(project_root),
        }
    }
}

impl Command for ReinstallCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let store = self.project.dependency_store();
        if store.is_dir() {
            ui.message(&format!("Removing {}", store.display()));
            std::fs::remove_dir_all(&store)?;
        }

        let (report, _env) = bootstrap_project(&self.project, ui);
        if report.is_ready() {
            ui.success("Dependencies reinstalled");
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}
