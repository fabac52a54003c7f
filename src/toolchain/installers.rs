//! Concrete install strategies for the managed tools.
//!
//! Ordering rationale, encoded in the factory functions at the bottom:
//! prefer the host's own package management (cleanest, survives across
//! projects), fall back to a self-contained portable install scoped to this
//! project (no privileges, no registry assumptions), and only then reach for
//! a third-party installer script fetched at runtime.

use std::path::PathBuf;

use crate::env::ExecutionEnvironment;
use crate::error::{BasecampError, Result};
use crate::fetch::{extract_archive, Downloader};
use crate::project::{Platform, Project};
use crate::shell::{display_command, run_captured};
use crate::toolchain::locate::find_tool_on_path;
use crate::toolchain::strategy::{InstallStrategy, Precondition};
use crate::ui::progress::download_bar;

fn run_tool(
    tool: &str,
    args: &[&str],
    env: &ExecutionEnvironment,
) -> Result<()> {
    // Preconditions guarantee resolvability, but resolve again so the
    // invocation uses the exact binary the probe saw.
    let program = find_tool_on_path(tool, env)
        .map(|p| p.into_os_string())
        .unwrap_or_else(|| tool.into());

    let result = run_captured(&program, args, None, env);
    if result.success {
        Ok(())
    } else {
        tracing::debug!(stderr = %result.stderr.trim(), "installer command failed");
        Err(BasecampError::CommandFailed {
            command: display_command(&program, args),
            code: result.exit_code,
        })
    }
}

/// Install through the host's system-wide package manager.
pub struct SystemPackageInstall {
    label: &'static str,
    tool: &'static str,
    args: Vec<&'static str>,
}

impl SystemPackageInstall {
    /// The runtime install command for a platform.
    pub fn for_runtime(platform: Platform) -> Self {
        match platform {
            Platform::Windows => Self {
                label: "winget",
                tool: "winget",
                args: vec![
                    "install",
                    "-e",
                    "--id",
                    "OpenJS.NodeJS.LTS",
                    "--accept-source-agreements",
                    "--accept-package-agreements",
                ],
            },
            Platform::MacOs => Self {
                label: "homebrew",
                tool: "brew",
                args: vec!["install", "node@22"],
            },
            Platform::Linux => Self {
                label: "apt",
                tool: "apt-get",
                args: vec!["install", "-y", "nodejs"],
            },
        }
    }
}

impl InstallStrategy for SystemPackageInstall {
    fn name(&self) -> &str {
        self.label
    }

    fn precondition(&self) -> Precondition {
        Precondition::ToolResolvable(self.tool)
    }

    fn attempt(&self, env: &ExecutionEnvironment) -> Result<()> {
        if self.tool == "apt-get" {
            // Unprivileged invocation fails immediately; route through sudo.
            let mut args = vec![self.tool];
            args.extend(self.args.iter().copied());
            return run_tool("sudo", &args, env);
        }
        run_tool(self.tool, &self.args, env)
    }
}

/// Download the pinned runtime dist archive and unpack it under the
/// project root.
pub struct PortableRuntimeInstall {
    url: String,
    install_dir: PathBuf,
}

impl PortableRuntimeInstall {
    pub fn new(project: &Project) -> Self {
        Self {
            url: project.portable_runtime_url(),
            install_dir: project.portable_runtime_dir(),
        }
    }
}

impl InstallStrategy for PortableRuntimeInstall {
    fn name(&self) -> &str {
        "portable archive"
    }

    fn attempt(&self, _env: &ExecutionEnvironment) -> Result<()> {
        let filename = self
            .url
            .rsplit('/')
            .next()
            .unwrap_or("runtime-archive")
            .to_string();
        let archive_path = self.install_dir.join(&filename);

        let bar = download_bar(&filename);
        Downloader::new().download(&self.url, &archive_path, &|done, total| {
            if let Some(total) = total {
                bar.set_length(total);
            }
            bar.set_position(done);
        })?;
        bar.finish_and_clear();

        extract_archive(&archive_path, &self.install_dir)?;
        // The archive has served its purpose; a leftover failure here is
        // harmless.
        let _ = std::fs::remove_file(&archive_path);
        Ok(())
    }
}

/// `npm install -g pnpm`: the common path when a runtime is present.
pub struct NpmGlobalInstall {
    package: &'static str,
}

impl NpmGlobalInstall {
    pub fn new(package: &'static str) -> Self {
        Self { package }
    }
}

impl InstallStrategy for NpmGlobalInstall {
    fn name(&self) -> &str {
        "npm global install"
    }

    fn precondition(&self) -> Precondition {
        Precondition::ToolResolvable("npm")
    }

    fn attempt(&self, env: &ExecutionEnvironment) -> Result<()> {
        run_tool("npm", &["install", "-g", self.package], env)
    }
}

/// Activate the package manager through the runtime's bundled corepack.
pub struct CorepackActivate {
    spec: &'static str,
}

impl CorepackActivate {
    pub fn new(spec: &'static str) -> Self {
        Self { spec }
    }
}

impl InstallStrategy for CorepackActivate {
    fn name(&self) -> &str {
        "corepack"
    }

    fn precondition(&self) -> Precondition {
        Precondition::ToolResolvable("corepack")
    }

    fn attempt(&self, env: &ExecutionEnvironment) -> Result<()> {
        // `enable` fails on read-only install prefixes but `prepare` can
        // still succeed, so its outcome is advisory.
        let _ = run_tool("corepack", &["enable"], env);
        run_tool("corepack", &["prepare", self.spec, "--activate"], env)
    }
}

/// Last resort: the vendor's installer script fetched at runtime.
pub struct InstallerScript {
    platform: Platform,
}

impl InstallerScript {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

impl InstallStrategy for InstallerScript {
    fn name(&self) -> &str {
        "installer script"
    }

    fn precondition(&self) -> Precondition {
        match self.platform {
            Platform::Windows => Precondition::ToolResolvable("powershell"),
            Platform::MacOs | Platform::Linux => Precondition::ToolResolvable("curl"),
        }
    }

    fn attempt(&self, env: &ExecutionEnvironment) -> Result<()> {
        match self.platform {
            Platform::Windows => run_tool(
                "powershell",
                &[
                    "-NoProfile",
                    "-Command",
                    "iwr https://get.pnpm.io/install.ps1 -useb | iex",
                ],
                env,
            ),
            Platform::MacOs | Platform::Linux => run_tool(
                "sh",
                &["-c", "curl -fsSL https://get.pnpm.io/install.sh | sh -"],
                env,
            ),
        }
    }
}

/// The runtime's strategy chain, in declared priority order.
pub fn runtime_strategies(project: &Project) -> Vec<Box<dyn InstallStrategy>> {
    vec![
        Box::new(SystemPackageInstall::for_runtime(project.platform())),
        Box::new(PortableRuntimeInstall::new(project)),
    ]
}

/// The package manager's strategy chain, in declared priority order.
pub fn package_manager_strategies(project: &Project) -> Vec<Box<dyn InstallStrategy>> {
    vec![
        Box::new(NpmGlobalInstall::new("pnpm")),
        Box::new(CorepackActivate::new("pnpm@latest")),
        Box::new(InstallerScript::new(project.platform())),
    ]
}
