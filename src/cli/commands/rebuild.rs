//! The `rebuild` command: run the build pipeline unconditionally.

use std::path::Path;

use crate::bootstrap::{default_pipeline, run_pipeline, subprocess_runner};
use crate::cli::{Command, CommandResult};
use crate::env::ExecutionEnvironment;
use crate::error::Result;
use crate::project::Project;
use crate::toolchain::{probe_tool, ToolStatus};
use crate::ui::UserInterface;

/// Re-runs the build pipeline regardless of marker state. Assumes the
/// toolchain is already bootstrapped; if it isn't, fails with a pointer to
/// `setup` instead of silently installing things.
pub struct RebuildCommand {
    project: Project,
}

impl RebuildCommand {
    pub fn new(project_root: &Path) -> Self {
        Self {
            project: Project::new(project_root),
        }
    }
}

impl Command for RebuildCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let env = ExecutionEnvironment::compose(&self.project);

        let pm = self.project.package_manager_tool();
        if !matches!(probe_tool(&pm, &env), ToolStatus::Satisfied { .. }) {
            ui.error("pnpm is not available: run `basecamp setup` first");
            return Ok(CommandResult::failure(1));
        }

        let steps = default_pipeline(&self.project);
        let runner = subprocess_runner(&self.project, &env);
        match run_pipeline(&steps, &runner, ui) {
            Ok(report) => {
                if !report.warnings.is_empty() {
                    ui.warning(&format!(
                        "{} optional step(s) failed: {}",
                        report.warnings.len(),
                        report.warnings.join(", ")
                    ));
                }
                Ok(CommandResult::success())
            }
            Err(e) => {
                ui.error(&e.to_string());
                Ok(CommandResult::failure(1))
            }
        }
    }
}
