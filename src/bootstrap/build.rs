//! The build pipeline.
//!
//! Three tiers of steps with different failure policies:
//!
//! 1. An optional pre-bundling step: failure is a warning.
//! 2. The compilation step: failure aborts the whole bootstrap.
//! 3. A fixed sequence of post-build steps, each run independently; one
//!    failing does not stop the ones after it.

use std::path::Path;

use crate::env::ExecutionEnvironment;
use crate::error::{BasecampError, Result};
use crate::project::Project;
use crate::shell::run_streamed;
use crate::toolchain::find_tool_on_path;
use crate::ui::UserInterface;

/// Failure policy tier of a build step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Optional preparation before compilation; failure downgrades to a warning.
    PreBundle,
    /// Mandatory compilation; failure aborts.
    Compile,
    /// Independent post-build step; failure downgrades to a warning.
    Post,
}

/// One step of the build pipeline.
#[derive(Debug, Clone)]
pub struct BuildStep {
    /// Display name for log lines.
    pub name: String,
    /// Logical tool to invoke ("node" or "pnpm").
    pub tool: &'static str,
    /// Arguments passed to the tool.
    pub args: Vec<String>,
    /// Failure policy.
    pub kind: StepKind,
}

/// Outcome of a pipeline run that did not abort.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Number of steps executed.
    pub steps_run: usize,
    /// Names of optional steps that failed.
    pub warnings: Vec<String>,
}

/// The project's build pipeline, derived from which script files exist.
///
/// Compilation is unconditional; the pre-bundle and post-build entries only
/// appear when the project ships the corresponding script.
pub fn default_pipeline(project: &Project) -> Vec<BuildStep> {
    let mut steps = Vec::new();
    let root = project.root();

    let prebundle = "scripts/prebundle.mjs";
    if root.join(prebundle).exists() {
        steps.push(BuildStep {
            name: "prebundle".to_string(),
            tool: "node",
            args: vec![prebundle.to_string()],
            kind: StepKind::PreBundle,
        });
    }

    steps.push(BuildStep {
        name: "compile".to_string(),
        tool: "pnpm",
        args: ["exec", "tsc", "-p", "tsconfig.json"]
            .map(String::from)
            .to_vec(),
        kind: StepKind::Compile,
    });

    for script in [
        "scripts/copy-assets.ts",
        "scripts/copy-hook-metadata.ts",
        "scripts/write-build-info.ts",
    ] {
        if root.join(script).exists() {
            let name = Path::new(script)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| script.to_string());
            steps.push(BuildStep {
                name,
                tool: "node",
                args: vec!["--import".to_string(), "tsx".to_string(), script.to_string()],
                kind: StepKind::Post,
            });
        }
    }

    steps
}

/// Run a pipeline, applying each step's failure policy.
///
/// `runner` executes a single step and reports success; it is injected so
/// tests can exercise the policy matrix without real subprocesses.
pub fn run_pipeline(
    steps: &[BuildStep],
    runner: &dyn Fn(&BuildStep) -> bool,
    ui: &mut dyn UserInterface,
) -> Result<BuildReport> {
    let mut report = BuildReport::default();

    for step in steps {
        ui.message(&format!("Running {}...", step.name));
        report.steps_run += 1;

        if runner(step) {
            continue;
        }

        match step.kind {
            StepKind::Compile => {
                return Err(BasecampError::BuildStepFailed {
                    step: step.name.clone(),
                    message: "compilation exited non-zero".to_string(),
                });
            }
            StepKind::PreBundle | StepKind::Post => {
                ui.warning(&format!("{} failed, continuing", step.name));
                report.warnings.push(step.name.clone());
            }
        }
    }

    ui.success("Build complete");
    Ok(report)
}

/// Step runner that actually spawns the step's tool, output streamed.
pub fn subprocess_runner<'a>(
    project: &'a Project,
    env: &'a ExecutionEnvironment,
) -> impl Fn(&BuildStep) -> bool + 'a {
    move |step: &BuildStep| {
        let Some(program) = find_tool_on_path(step.tool, env) else {
            tracing::warn!(tool = step.tool, step = %step.name, "build tool not resolvable");
            return false;
        };
        run_streamed(&program, &step.args, Some(project.root()), env).success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    fn step(name: &str, kind: StepKind) -> BuildStep {
        BuildStep {
            name: name.to_string(),
            tool: "node",
            args: vec![],
            kind,
        }
    }

    #[test]
    fn all_steps_run_in_order_on_success() {
        let steps = vec![
            step("prebundle", StepKind::PreBundle),
            step("compile", StepKind::Compile),
            step("post-a", StepKind::Post),
        ];
        let order = RefCell::new(Vec::new());
        let runner = |s: &BuildStep| {
            order.borrow_mut().push(s.name.clone());
            true
        };
        let mut ui = MockUI::new();

        let report = run_pipeline(&steps, &runner, &mut ui).unwrap();
        assert_eq!(report.steps_run, 3);
        assert!(report.warnings.is_empty());
        assert_eq!(order.borrow().as_slice(), ["prebundle", "compile", "post-a"]);
    }

    #[test]
    fn compile_failure_aborts_pipeline() {
        let steps = vec![
            step("compile", StepKind::Compile),
            step("post-a", StepKind::Post),
        ];
        let ran = RefCell::new(Vec::new());
        let runner = |s: &BuildStep| {
            ran.borrow_mut().push(s.name.clone());
            s.name != "compile"
        };
        let mut ui = MockUI::new();

        let err = run_pipeline(&steps, &runner, &mut ui).unwrap_err();
        assert!(matches!(err, BasecampError::BuildStepFailed { .. }));
        assert_eq!(ran.borrow().as_slice(), ["compile"]);
    }

    #[test]
    fn failed_post_step_does_not_stop_later_post_steps() {
        let steps = vec![
            step("compile", StepKind::Compile),
            step("post-a", StepKind::Post),
            step("post-b", StepKind::Post),
        ];
        let runner = |s: &BuildStep| s.name != "post-a";
        let mut ui = MockUI::new();

        let report = run_pipeline(&steps, &runner, &mut ui).unwrap();
        assert_eq!(report.steps_run, 3);
        assert_eq!(report.warnings, vec!["post-a".to_string()]);
        assert!(ui.has_warning("post-a"));
    }

    #[test]
    fn prebundle_failure_is_a_warning_not_fatal() {
        let steps = vec![
            step("prebundle", StepKind::PreBundle),
            step("compile", StepKind::Compile),
        ];
        let runner = |s: &BuildStep| s.name != "prebundle";
        let mut ui = MockUI::new();

        let report = run_pipeline(&steps, &runner, &mut ui).unwrap();
        assert_eq!(report.warnings, vec!["prebundle".to_string()]);
    }

    #[test]
    fn default_pipeline_always_compiles() {
        let temp = TempDir::new().unwrap();
        let project = Project::new(temp.path());
        let steps = default_pipeline(&project);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].kind, StepKind::Compile);
        assert_eq!(steps[0].tool, "pnpm");
    }

    #[test]
    fn default_pipeline_includes_present_scripts_only() {
        let temp = TempDir::new().unwrap();
        let scripts = temp.path().join("scripts");
        fs::create_dir_all(&scripts).unwrap();
        fs::write(scripts.join("prebundle.mjs"), "").unwrap();
        fs::write(scripts.join("write-build-info.ts"), "").unwrap();

        let project = Project::new(temp.path());
        let steps = default_pipeline(&project);

        let names: Vec<_> = steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["prebundle", "compile", "write-build-info"]);
        assert_eq!(steps[0].kind, StepKind::PreBundle);
        assert_eq!(steps[2].kind, StepKind::Post);
    }

    #[test]
    fn post_steps_run_through_tsx_loader() {
        let temp = TempDir::new().unwrap();
        let scripts = temp.path().join("scripts");
        fs::create_dir_all(&scripts).unwrap();
        fs::write(scripts.join("copy-assets.ts"), "").unwrap();

        let project = Project::new(temp.path());
        let steps = default_pipeline(&project);
        let post = steps.iter().find(|s| s.kind == StepKind::Post).unwrap();
        assert_eq!(post.tool, "node");
        assert!(post.args.contains(&"tsx".to_string()));
    }
}
