//! Composed execution environment for probes and subprocess calls.
//!
//! Install strategies drop executables into directories the inherited PATH
//! has never heard of: a portable install under the project root, the npm
//! global bin, the package manager's own home. A shell would pick these up on
//! its next login; this process never will. So every probe and every
//! subprocess call runs against a composed search path built from known
//! install locations plus the inherited PATH.
//!
//! The environment is a plain value. It is rebuilt from scratch, never
//! appended to, after any action that may have installed something, so
//! stale entries cannot accumulate, and composing twice against unchanged
//! state yields the same sequence. The process environment itself is never
//! mutated; tests compose against an injected variable reader.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use crate::project::{npm_global_dirs, pnpm_home_dir, runtime_system_dirs, Project};
use crate::toolchain::locate::find_in_dirs;

/// Ordered search path plus fixed variable overrides, applied to every
/// subprocess this program spawns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionEnvironment {
    path_entries: Vec<PathBuf>,
    overrides: Vec<(String, String)>,
    removals: Vec<String>,
}

/// Split a PATH-style variable into entries.
pub fn parse_path_var(value: &str) -> Vec<PathBuf> {
    std::env::split_paths(value).collect()
}

impl ExecutionEnvironment {
    /// Compose the environment from the real process environment.
    pub fn compose(project: &Project) -> Self {
        Self::compose_with(project, &|key| std::env::var(key).ok())
    }

    /// Compose with an injected environment-variable reader.
    ///
    /// Deterministic given the reader and current filesystem state; calling
    /// twice with neither changed yields an identical value.
    pub fn compose_with(project: &Project, env_fn: &dyn Fn(&str) -> Option<String>) -> Self {
        let inherited: Vec<PathBuf> = env_fn("PATH")
            .map(|p| parse_path_var(&p))
            .unwrap_or_default();

        let mut entries: Vec<PathBuf> = Vec::new();
        let push = |entry: PathBuf, entries: &mut Vec<PathBuf>| {
            if !entries.contains(&entry) {
                entries.push(entry);
            }
        };

        // 1. Portable, self-managed runtime install.
        let portable = project.portable_runtime_bin();
        if portable.is_dir() {
            push(portable, &mut entries);
        }

        // 2. Wherever the currently resolvable runtime lives.
        if let Some(node) = find_in_dirs("node", &inherited) {
            if let Some(dir) = node.parent() {
                push(dir.to_path_buf(), &mut entries);
            }
        }

        // 3. npm global bin (the usual landing spot for `npm install -g`).
        for dir in npm_global_dirs(project.platform()) {
            if dir.is_dir() {
                push(dir, &mut entries);
            }
        }

        // 4. The package manager's own home.
        if let Some(dir) = pnpm_home_dir(project.platform()) {
            if dir.is_dir() {
                push(dir, &mut entries);
            }
        }

        // 5. Platform-standard install directories that actually hold the runtime.
        for dir in runtime_system_dirs(project.platform()) {
            if find_in_dirs("node", std::slice::from_ref(&dir)).is_some() {
                push(dir, &mut entries);
            }
        }

        // 6. Inherited PATH last, so managed installs win over system ones.
        for dir in inherited {
            push(dir, &mut entries);
        }

        Self {
            path_entries: entries,
            overrides: vec![("FORCE_COLOR".to_string(), "1".to_string())],
            removals: vec!["NO_COLOR".to_string()],
        }
    }

    /// Build an environment directly from parts (tests).
    pub fn from_parts(path_entries: Vec<PathBuf>, overrides: Vec<(String, String)>) -> Self {
        Self {
            path_entries,
            overrides,
            removals: Vec::new(),
        }
    }

    /// The composed search path, in priority order.
    pub fn path_entries(&self) -> &[PathBuf] {
        &self.path_entries
    }

    /// The fixed variable overrides.
    pub fn overrides(&self) -> &[(String, String)] {
        &self.overrides
    }

    /// Render the search path as a PATH variable value.
    pub fn path_var(&self) -> OsString {
        std::env::join_paths(&self.path_entries).unwrap_or_else(|_| {
            // A stray separator inside an entry: fall back to joining lossily.
            let sep = if cfg!(windows) { ";" } else { ":" };
            OsString::from(
                self.path_entries
                    .iter()
                    .map(|p| p.to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join(sep),
            )
        })
    }

    /// Install this environment into a command about to be spawned.
    pub fn configure(&self, cmd: &mut Command) {
        cmd.env("PATH", self.path_var());
        for (key, value) in &self.overrides {
            cmd.env(key, value);
        }
        for key in &self.removals {
            cmd.env_remove(key);
        }
    }
}
