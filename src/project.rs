//! Project layout and managed-tool configuration.
//!
//! Everything here is immutable configuration, built once at process start:
//! the project root and its marker directories, the managed tools with their
//! version floors, and the per-platform tables of fixed install directories
//! and portable-dist archives. The resolution and install machinery is
//! platform-neutral; this module is the only place that knows platform
//! specifics.

use std::env;
use std::path::{Path, PathBuf};

use crate::toolchain::Version;

/// Minimum acceptable runtime version.
pub const RUNTIME_MIN_VERSION: Version = Version::new(22, 12, 0);

/// Pinned version used for portable (self-contained) runtime installs.
pub const RUNTIME_PORTABLE_VERSION: &str = "22.13.0";

/// package.json script that launches the wrapped application.
pub const APP_SCRIPT: &str = "app";

/// Directory under the project root holding a portable runtime install.
pub const PORTABLE_DIR_NAME: &str = "node_portable";

/// The platform this process runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// Detect the current platform.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }

    /// nodejs.org dist platform tag (e.g. `win-x64`, `darwin-arm64`).
    pub fn dist_tag(&self) -> String {
        let os = match self {
            Platform::Windows => "win",
            Platform::MacOs => "darwin",
            Platform::Linux => "linux",
        };
        let arch = if cfg!(target_arch = "aarch64") {
            "arm64"
        } else {
            "x64"
        };
        format!("{}-{}", os, arch)
    }

    /// Archive extension the dist server uses for this platform.
    pub fn archive_extension(&self) -> &'static str {
        match self {
            Platform::Windows => "zip",
            Platform::MacOs | Platform::Linux => "tar.gz",
        }
    }
}

/// An external tool whose presence and version this process guarantees
/// before proceeding.
#[derive(Debug, Clone)]
pub struct ManagedTool {
    /// Logical name, also the executable name ("node", "pnpm").
    pub name: &'static str,
    /// Minimum admissible version, if any.
    pub min_version: Option<Version>,
    /// Install directories to probe when the search path misses.
    pub fixed_dirs: Vec<PathBuf>,
}

/// The wrapped project: root directory plus everything derived from it.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    platform: Platform,
}

impl Project {
    /// Create a project rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            platform: Platform::current(),
        }
    }

    /// Create a project with an explicit platform (tests exercise foreign
    /// platform tables this way).
    pub fn with_platform(root: impl Into<PathBuf>, platform: Platform) -> Self {
        Self {
            root: root.into(),
            platform,
        }
    }

    /// The project root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The platform this project resolves tools for.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Directory holding a portable runtime install, if one was made.
    pub fn portable_runtime_dir(&self) -> PathBuf {
        self.root.join(PORTABLE_DIR_NAME)
    }

    /// Directory inside the portable install that contains the executables.
    ///
    /// The dist archive unpacks to `node-v<version>-<tag>/`; unix archives
    /// put binaries under a further `bin/`.
    pub fn portable_runtime_bin(&self) -> PathBuf {
        let unpacked = self.portable_runtime_dir().join(format!(
            "node-v{}-{}",
            RUNTIME_PORTABLE_VERSION,
            self.platform.dist_tag()
        ));
        match self.platform {
            Platform::Windows => unpacked,
            Platform::MacOs | Platform::Linux => unpacked.join("bin"),
        }
    }

    /// URL of the portable runtime dist archive for this platform.
    pub fn portable_runtime_url(&self) -> String {
        format!(
            "https://nodejs.org/dist/v{v}/node-v{v}-{tag}.{ext}",
            v = RUNTIME_PORTABLE_VERSION,
            tag = self.platform.dist_tag(),
            ext = self.platform.archive_extension()
        )
    }

    /// Project-local dependency store, used as the install marker.
    pub fn dependency_store(&self) -> PathBuf {
        self.root.join("node_modules")
    }

    /// Build output directory, used as the build marker.
    pub fn build_output(&self) -> PathBuf {
        self.root.join("dist")
    }

    /// The managed runtime dependency.
    pub fn runtime_tool(&self) -> ManagedTool {
        let mut fixed = vec![self.portable_runtime_bin()];
        fixed.extend(runtime_system_dirs(self.platform));
        ManagedTool {
            name: "node",
            min_version: Some(RUNTIME_MIN_VERSION),
            fixed_dirs: fixed,
        }
    }

    /// The managed package-manager dependency.
    pub fn package_manager_tool(&self) -> ManagedTool {
        let mut fixed = Vec::new();
        fixed.extend(npm_global_dirs(self.platform));
        fixed.extend(pnpm_home_dir(self.platform));
        ManagedTool {
            name: "pnpm",
            min_version: None,
            fixed_dirs: fixed,
        }
    }
}

/// Platform-standard directories where a system runtime install lands.
pub fn runtime_system_dirs(platform: Platform) -> Vec<PathBuf> {
    match platform {
        Platform::Windows => {
            let mut candidates = Vec::new();
            if let Ok(pf) = env::var("ProgramFiles") {
                candidates.push(PathBuf::from(pf).join("nodejs"));
            }
            if let Ok(pf86) = env::var("ProgramFiles(x86)") {
                candidates.push(PathBuf::from(pf86).join("nodejs"));
            }
            if let Some(home) = dirs::home_dir() {
                candidates.push(home.join("AppData").join("Local").join("Programs").join("nodejs"));
            }
            candidates
        }
        Platform::MacOs => vec![
            PathBuf::from("/opt/homebrew/bin"),
            PathBuf::from("/usr/local/bin"),
        ],
        Platform::Linux => vec![
            PathBuf::from("/usr/local/bin"),
            PathBuf::from("/usr/bin"),
            PathBuf::from("/home/linuxbrew/.linuxbrew/bin"),
        ],
    }
}

/// Directories where `npm install -g` places executables.
pub fn npm_global_dirs(platform: Platform) -> Vec<PathBuf> {
    let Some(home) = dirs::home_dir() else {
        return Vec::new();
    };
    match platform {
        Platform::Windows => vec![home.join("AppData").join("Roaming").join("npm")],
        Platform::MacOs | Platform::Linux => {
            vec![home.join(".npm-global").join("bin"), home.join(".local/bin")]
        }
    }
}

/// The package manager's own home directory (standalone installs land here).
pub fn pnpm_home_dir(platform: Platform) -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(match platform {
        Platform::Windows => home.join("AppData").join("Local").join("pnpm"),
        Platform::MacOs => home.join("Library").join("pnpm"),
        Platform::Linux => home.join(".local").join("share").join("pnpm"),
    })
}
