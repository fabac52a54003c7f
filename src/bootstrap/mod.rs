//! The bootstrap orchestrator.
//!
//! A strict four-stage sequence (runtime, package manager, project
//! dependencies, build artifacts) where each stage's success redefines the
//! execution environment consumed by the next, so the order is a hard
//! dependency chain and is never parallelized. Any stage failure ends the
//! run in `Failed` without attempting later stages.
//!
//! Idempotence comes from two mechanisms: the strategy chain short-circuits
//! on an already-satisfied tool, and the two filesystem stages consult
//! [`SetupMarker`]s (directory-presence proxies for prior completion). One
//! deliberate exception: a fresh dependency install always forces a rebuild,
//! even when a build marker exists, because freshly changed dependencies
//! invalidate any prior build.

pub mod build;

pub use build::{default_pipeline, run_pipeline, subprocess_runner, BuildReport, BuildStep, StepKind};

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::env::ExecutionEnvironment;
use crate::error::Result;
use crate::project::{Project, APP_SCRIPT};
use crate::shell::run_streamed;
use crate::toolchain::{ensure, locate, ChainContext, InstallStrategy, ToolStatus};
use crate::ui::UserInterface;

/// A filesystem-presence proxy for "this step already completed".
#[derive(Debug, Clone)]
pub struct SetupMarker {
    name: &'static str,
    path: PathBuf,
}

impl SetupMarker {
    /// Create a marker backed by a directory path.
    pub fn new(name: &'static str, path: PathBuf) -> Self {
        Self { name, path }
    }

    /// Whether the step this marker stands for has already completed.
    pub fn is_satisfied(&self) -> bool {
        self.path.is_dir()
    }

    /// The marker's display name.
    pub fn name(&self) -> &str {
        self.name
    }

    /// The backing path.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

/// Orchestrator stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Runtime,
    PackageManager,
    ProjectDependencies,
    BuildArtifacts,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Runtime => "runtime",
            Stage::PackageManager => "package manager",
            Stage::ProjectDependencies => "project dependencies",
            Stage::BuildArtifacts => "build artifacts",
        };
        f.write_str(label)
    }
}

/// Terminal state of a bootstrap run.
#[derive(Debug)]
pub enum BootstrapState {
    /// All stages satisfied; the wrapped application can run.
    Ready,
    /// A stage failed; later stages were not attempted.
    Failed { stage: Stage, reason: String },
}

/// Per-stage record in the final report.
#[derive(Debug)]
pub struct StageResult {
    pub stage: Stage,
    /// Whether the stage did real work (install/build) vs. being satisfied.
    pub performed_work: bool,
    pub detail: String,
}

/// Outcome of a full bootstrap run.
#[derive(Debug)]
pub struct BootstrapReport {
    pub state: BootstrapState,
    pub stages: Vec<StageResult>,
    pub duration: Duration,
}

impl BootstrapReport {
    /// Whether the run ended in `Ready`.
    pub fn is_ready(&self) -> bool {
        matches!(self.state, BootstrapState::Ready)
    }

    /// The failed stage, if any.
    pub fn failed_stage(&self) -> Option<Stage> {
        match &self.state {
            BootstrapState::Failed { stage, .. } => Some(*stage),
            BootstrapState::Ready => None,
        }
    }
}

/// Injectable collaborators for the orchestrator.
///
/// Production wires these to the real probe, composer, package-manager
/// install, and build pipeline; tests wire them to fabricated state so the
/// full stage machine runs without subprocesses or network.
pub struct BootstrapContext<'a> {
    /// Probe a managed tool against an environment.
    pub probe: &'a dyn Fn(&crate::project::ManagedTool, &ExecutionEnvironment) -> ToolStatus,
    /// Rebuild the execution environment from current state.
    pub recompose: &'a dyn Fn() -> ExecutionEnvironment,
    /// Install project dependencies; output streamed live. True on success.
    pub install_dependencies: &'a dyn Fn(&ExecutionEnvironment, &mut dyn UserInterface) -> bool,
    /// Run the build pipeline. `Err` means the mandatory step failed.
    pub run_build:
        &'a dyn Fn(&ExecutionEnvironment, &mut dyn UserInterface) -> Result<BuildReport>,
}

/// Sequences the bootstrap stages over a project.
pub struct Bootstrapper<'a> {
    project: &'a Project,
    ctx: BootstrapContext<'a>,
    runtime_strategies: Vec<Box<dyn InstallStrategy>>,
    package_manager_strategies: Vec<Box<dyn InstallStrategy>>,
    env: ExecutionEnvironment,
}

impl<'a> Bootstrapper<'a> {
    /// Create an orchestrator with explicit strategy chains.
    pub fn new(
        project: &'a Project,
        env: ExecutionEnvironment,
        ctx: BootstrapContext<'a>,
        runtime_strategies: Vec<Box<dyn InstallStrategy>>,
        package_manager_strategies: Vec<Box<dyn InstallStrategy>>,
    ) -> Self {
        Self {
            project,
            ctx,
            runtime_strategies,
            package_manager_strategies,
            env,
        }
    }

    /// The current execution environment (refreshed by installs).
    pub fn env(&self) -> &ExecutionEnvironment {
        &self.env
    }

    /// Take the final environment, for running the app after bootstrap.
    pub fn into_env(self) -> ExecutionEnvironment {
        self.env
    }

    /// The dependency-store marker for this project.
    pub fn dependency_marker(&self) -> SetupMarker {
        SetupMarker::new("dependency store", self.project.dependency_store())
    }

    /// The build-output marker for this project.
    pub fn build_marker(&self) -> SetupMarker {
        SetupMarker::new("build output", self.project.build_output())
    }

    /// Run all stages in order. Never panics or returns `Err`; the report
    /// carries the terminal state.
    pub fn run(&mut self, ui: &mut dyn UserInterface) -> BootstrapReport {
        let start = Instant::now();
        let mut stages = Vec::new();

        let failed = |stage: Stage, reason: String, stages: Vec<StageResult>, start: Instant| {
            tracing::error!(stage = %stage, reason = %reason, "bootstrap failed");
            BootstrapReport {
                state: BootstrapState::Failed { stage, reason },
                stages,
                duration: start.elapsed(),
            }
        };

        // Stage 1: runtime.
        let runtime = self.project.runtime_tool();
        let chain_ctx = ChainContext {
            probe: self.ctx.probe,
            recompose: self.ctx.recompose,
        };
        match ensure(
            &runtime,
            &self.runtime_strategies,
            &mut self.env,
            &chain_ctx,
            ui,
        ) {
            Ok(outcome) => stages.push(StageResult {
                stage: Stage::Runtime,
                performed_work: !outcome.was_already_satisfied(),
                detail: outcome.status.describe(runtime.name),
            }),
            Err(e) => return failed(Stage::Runtime, e.to_string(), stages, start),
        }

        // Stage 2: package manager. Its strategies may depend on the
        // runtime's companion tools (npm, corepack) resolving: that is a
        // precondition, not a retry.
        let pm = self.project.package_manager_tool();
        match ensure(
            &pm,
            &self.package_manager_strategies,
            &mut self.env,
            &chain_ctx,
            ui,
        ) {
            Ok(outcome) => stages.push(StageResult {
                stage: Stage::PackageManager,
                performed_work: !outcome.was_already_satisfied(),
                detail: outcome.status.describe(pm.name),
            }),
            Err(e) => return failed(Stage::PackageManager, e.to_string(), stages, start),
        }

        // Stage 3: project dependencies.
        let deps_marker = self.dependency_marker();
        let mut deps_freshly_installed = false;
        if deps_marker.is_satisfied() {
            ui.success("Dependencies already installed");
            stages.push(StageResult {
                stage: Stage::ProjectDependencies,
                performed_work: false,
                detail: format!("{} present", deps_marker.name()),
            });
        } else {
            ui.message("Installing project dependencies (this can take a few minutes)...");
            if (self.ctx.install_dependencies)(&self.env, ui) {
                deps_freshly_installed = true;
                stages.push(StageResult {
                    stage: Stage::ProjectDependencies,
                    performed_work: true,
                    detail: "installed".to_string(),
                });
            } else {
                return failed(
                    Stage::ProjectDependencies,
                    "dependency install exited non-zero".to_string(),
                    stages,
                    start,
                );
            }
        }

        // Stage 4: build artifacts. A fresh dependency install always
        // forces a rebuild, marker or no marker.
        let build_marker = self.build_marker();
        if deps_freshly_installed || !build_marker.is_satisfied() {
            match (self.ctx.run_build)(&self.env, ui) {
                Ok(report) => stages.push(StageResult {
                    stage: Stage::BuildArtifacts,
                    performed_work: true,
                    detail: if report.warnings.is_empty() {
                        format!("{} steps", report.steps_run)
                    } else {
                        format!(
                            "{} steps, {} warning(s)",
                            report.steps_run,
                            report.warnings.len()
                        )
                    },
                }),
                Err(e) => return failed(Stage::BuildArtifacts, e.to_string(), stages, start),
            }
        } else {
            ui.success("Build output already present");
            stages.push(StageResult {
                stage: Stage::BuildArtifacts,
                performed_work: false,
                detail: format!("{} present", build_marker.name()),
            });
        }

        BootstrapReport {
            state: BootstrapState::Ready,
            stages,
            duration: start.elapsed(),
        }
    }
}

/// Run a package.json script through the package manager, stdio inherited,
/// cwd fixed at the project root. Returns the child's exit code verbatim.
pub fn run_script(
    project: &Project,
    env: &ExecutionEnvironment,
    script: &str,
    args: &[String],
) -> Result<i32> {
    let pm = project.package_manager_tool();
    let pnpm = locate(&pm, env).ok_or_else(|| crate::error::BasecampError::ToolNotFound {
        tool: pm.name.to_string(),
    })?;

    let mut full_args = vec!["run".to_string(), script.to_string()];
    full_args.extend(args.iter().cloned());

    let result = run_streamed(&pnpm, &full_args, Some(project.root()), env);
    // Killed by a signal reports no code; treat as a generic failure.
    Ok(result.exit_code.unwrap_or(1))
}

/// Forward arguments to the wrapped application.
pub fn run_app(project: &Project, env: &ExecutionEnvironment, args: &[String]) -> Result<i32> {
    run_script(project, env, APP_SCRIPT, args)
}
