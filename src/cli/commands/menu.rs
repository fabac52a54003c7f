//! The interactive main menu.
//!
//! Bootstraps once up front, then loops over the orchestrator's public
//! operations until the user quits. Quit exits 0.

use std::path::Path;

use crate::bootstrap::{run_app, run_script};
use crate::cli::args::StatusArgs;
use crate::cli::commands::bootstrap_project;
use crate::cli::{Command, CommandResult};
use crate::error::Result;
use crate::project::Project;
use crate::ui::UserInterface;

const MENU_ITEMS: &[&str] = &[
    "Start app",
    "Dev mode",
    "Run custom command",
    "Reinstall dependencies",
    "Rebuild project",
    "Show status",
    "Quit",
];

/// Interactive menu over the orchestrator's operations.
pub struct MenuCommand {
    project: Project,
}

impl MenuCommand {
    pub fn new(project_root: &Path) -> Self {
        Self {
            project: Project::new(project_root),
        }
    }
}

impl Command for MenuCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header("Basecamp");
        ui.message(&format!("Project: {}", self.project.root().display()));

        let (report, mut env) = bootstrap_project(&self.project, ui);
        if !report.is_ready() {
            ui.error("Setup failed. Fix the errors above and try again.");
            return Ok(CommandResult::failure(1));
        }
        ui.success("Setup complete. Ready to run.");

        let items: Vec<String> = MENU_ITEMS.iter().map(|s| s.to_string()).collect();
        loop {
            let choice = ui.select("Main menu", &items)?;
            match choice {
                Some(0) => {
                    let code = run_app(&self.project, &env, &[])?;
                    if code != 0 {
                        ui.warning(&format!("app exited with code {}", code));
                    }
                }
                Some(1) => {
                    let code = run_script(&self.project, &env, "dev", &[])?;
                    if code != 0 {
                        ui.warning(&format!("dev exited with code {}", code));
                    }
                }
                Some(2) => {
                    let line = ui.input("app arguments")?;
                    let args: Vec<String> =
                        line.split_whitespace().map(String::from).collect();
                    if !args.is_empty() {
                        let code = run_app(&self.project, &env, &args)?;
                        if code != 0 {
                            ui.warning(&format!("app exited with code {}", code));
                        }
                    }
                }
                Some(3) => {
                    let store = self.project.dependency_store();
                    if store.is_dir() {
                        std::fs::remove_dir_all(&store)?;
                    }
                    let (report, fresh_env) = bootstrap_project(&self.project, ui);
                    if report.is_ready() {
                        env = fresh_env;
                        ui.success("Dependencies reinstalled");
                    } else {
                        ui.error("Reinstall failed");
                    }
                }
                Some(4) => {
                    let rebuild = super::rebuild::RebuildCommand::new(self.project.root());
                    rebuild.execute(ui)?;
                }
                Some(5) => {
                    let status = super::status::StatusCommand::new(
                        self.project.root(),
                        StatusArgs::default(),
                    );
                    status.execute(ui)?;
                }
                // Quit, Escape, or a non-interactive backend.
                Some(_) | None => return Ok(CommandResult::success()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The menu drives the real bootstrap wiring, so end-to-end coverage
    // lives in the integration tests with substituted collaborators; here
    // only the static shape is asserted.

    #[test]
    fn menu_lists_expected_entries() {
        assert_eq!(MENU_ITEMS.len(), 7);
        assert_eq!(MENU_ITEMS[0], "Start app");
        assert_eq!(*MENU_ITEMS.last().unwrap(), "Quit");
    }
}
