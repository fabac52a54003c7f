//! The `run` command: bootstrap if needed, then forward to the app.

use std::path::Path;

use crate::bootstrap::run_app;
use crate::cli::args::RunArgs;
use crate::cli::commands::bootstrap_project;
use crate::cli::{Command, CommandResult};
use crate::error::Result;
use crate::project::Project;
use crate::ui::UserInterface;

/// Bootstraps, then forwards its trailing arguments to the wrapped
/// application and exits with the child's code verbatim.
pub struct RunCommand {
    project: Project,
    args: RunArgs,
}

impl RunCommand {
    pub fn new(project_root: &Path, args: RunArgs) -> Self {
        Self {
            project: Project::new(project_root),
            args,
        }
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (report, env) = bootstrap_project(&self.project, ui);
        if !report.is_ready() {
            ui.error("Bootstrap failed; not running the application");
            return Ok(CommandResult::failure(1));
        }

        let code = run_app(&self.project, &env, &self.args.args)?;
        Ok(CommandResult::forwarded(code))
    }
}
