//! CLI subcommand implementations.

pub mod completions;
pub mod dispatcher;
pub mod menu;
pub mod rebuild;
pub mod reinstall;
pub mod run;
pub mod setup;
pub mod status;

use crate::bootstrap::{
    default_pipeline, run_pipeline, subprocess_runner, BootstrapContext, BootstrapReport,
    Bootstrapper, BuildReport,
};
use crate::env::ExecutionEnvironment;
use crate::error::Result;
use crate::project::{ManagedTool, Project};
use crate::shell::run_streamed;
use crate::toolchain::installers::{package_manager_strategies, runtime_strategies};
use crate::toolchain::{locate, probe_tool};
use crate::ui::UserInterface;

/// Run the full bootstrap against the real world: live probes, real
/// installs, streamed subprocesses. Returns the report and the final
/// composed environment for any follow-on app invocation.
pub(crate) fn bootstrap_project(
    project: &Project,
    ui: &mut dyn UserInterface,
) -> (BootstrapReport, ExecutionEnvironment) {
    let probe =
        |tool: &ManagedTool, env: &ExecutionEnvironment| probe_tool(tool, env);
    let recompose = || ExecutionEnvironment::compose(project);

    let install_dependencies = |env: &ExecutionEnvironment, ui: &mut dyn UserInterface| -> bool {
        let pm = project.package_manager_tool();
        let Some(pnpm) = locate(&pm, env) else {
            ui.error("pnpm disappeared between verification and install");
            return false;
        };
        run_streamed(&pnpm, ["install"], Some(project.root()), env).success
    };

    let run_build =
        |env: &ExecutionEnvironment, ui: &mut dyn UserInterface| -> Result<BuildReport> {
            let steps = default_pipeline(project);
            let runner = subprocess_runner(project, env);
            run_pipeline(&steps, &runner, ui)
        };

    let ctx = BootstrapContext {
        probe: &probe,
        recompose: &recompose,
        install_dependencies: &install_dependencies,
        run_build: &run_build,
    };

    let env = ExecutionEnvironment::compose(project);
    let mut bootstrapper = Bootstrapper::new(
        project,
        env,
        ctx,
        runtime_strategies(project),
        package_manager_strategies(project),
    );

    let report = bootstrapper.run(ui);
    (report, bootstrapper.into_env())
}
