//! The `status` command: read-only report of tools and markers.

use std::path::Path;

use serde::Serialize;

use crate::cli::args::StatusArgs;
use crate::cli::{Command, CommandResult};
use crate::env::ExecutionEnvironment;
use crate::error::Result;
use crate::project::Project;
use crate::toolchain::{probe_tool, ToolStatus};
use crate::ui::UserInterface;

/// Reports resolved tool paths/versions and marker state without mutating
/// anything.
pub struct StatusCommand {
    project: Project,
    args: StatusArgs,
}

#[derive(Debug, Serialize)]
struct ToolReport {
    name: String,
    state: &'static str,
    path: Option<String>,
    version: Option<String>,
}

#[derive(Debug, Serialize)]
struct MarkerReport {
    path: String,
    satisfied: bool,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    project_root: String,
    runtime: ToolReport,
    package_manager: ToolReport,
    dependency_store: MarkerReport,
    build_output: MarkerReport,
    ready: bool,
}

fn tool_report(name: &str, status: &ToolStatus) -> ToolReport {
    let (state, path, version) = match status {
        ToolStatus::Satisfied { path, version } => (
            "satisfied",
            Some(path.display().to_string()),
            Some(version.to_string()),
        ),
        ToolStatus::TooOld { path, found, .. } => (
            "too-old",
            Some(path.display().to_string()),
            Some(found.to_string()),
        ),
        ToolStatus::Unresponsive { path } => {
            ("unresponsive", Some(path.display().to_string()), None)
        }
        ToolStatus::NotFound => ("not-found", None, None),
    };
    ToolReport {
        name: name.to_string(),
        state,
        path,
        version,
    }
}

impl StatusCommand {
    pub fn new(project_root: &Path, args: StatusArgs) -> Self {
        Self {
            project: Project::new(project_root),
            args,
        }
    }

    fn collect(&self) -> StatusReport {
        let env = ExecutionEnvironment::compose(&self.project);

        let runtime_tool = self.project.runtime_tool();
        let pm_tool = self.project.package_manager_tool();
        let runtime = probe_tool(&runtime_tool, &env);
        let package_manager = probe_tool(&pm_tool, &env);

        let deps = self.project.dependency_store();
        let build = self.project.build_output();

        let ready = runtime.is_satisfied()
            && package_manager.is_satisfied()
            && deps.is_dir()
            && build.is_dir();

        StatusReport {
            project_root: self.project.root().display().to_string(),
            runtime: tool_report(runtime_tool.name, &runtime),
            package_manager: tool_report(pm_tool.name, &package_manager),
            dependency_store: MarkerReport {
                path: deps.display().to_string(),
                satisfied: deps.is_dir(),
            },
            build_output: MarkerReport {
                path: build.display().to_string(),
                satisfied: build.is_dir(),
            },
            ready,
        }
    }
}

impl Command for StatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let report = self.collect();

        if self.args.json {
            let rendered =
                serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?;
            println!("{}", rendered);
            return Ok(CommandResult::success());
        }

        ui.show_header("Basecamp status");
        ui.message(&format!("Project: {}", report.project_root));

        for tool in [&report.runtime, &report.package_manager] {
            let line = match (&tool.path, &tool.version) {
                (Some(path), Some(version)) => {
                    format!("{} {} ({}): {}", tool.name, version, path, tool.state)
                }
                (Some(path), None) => format!("{} ({}): {}", tool.name, path, tool.state),
                _ => format!("{}: {}", tool.name, tool.state),
            };
            if tool.state == "satisfied" {
                ui.success(&line);
            } else {
                ui.warning(&line);
            }
        }

        for (label, marker) in [
            ("dependency store", &report.dependency_store),
            ("build output", &report.build_output),
        ] {
            if marker.satisfied {
                ui.success(&format!("{}: {}", label, marker.path));
            } else {
                ui.warning(&format!("{}: missing ({})", label, marker.path));
            }
        }

        if report.ready {
            ui.success("Ready: nothing to do");
        } else {
            ui.message("Run `basecamp setup` to complete the bootstrap");
        }

        Ok(CommandResult::success())
    }
}
