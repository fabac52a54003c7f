//! Executable location across the composed search path and fixed directories.
//!
//! Resolution happens in two passes. The composed search path covers every
//! location this process can see; the fixed known directories cover installs
//! that only a *new* shell would see. Some installers (notably system package
//! managers) register their install directory with the shell's startup files,
//! so a freshly installed tool is invisible to this process's inherited
//! environment until the terminal restarts. Probing the fixed directories
//! directly sidesteps that shell-lifecycle dependency.

use std::path::{Path, PathBuf};

use crate::env::ExecutionEnvironment;
use crate::project::ManagedTool;

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Filename variants to try for a logical tool name.
///
/// Node-ecosystem tools on Windows are `.cmd` shims next to a `.exe`; the
/// shim is the canonical entry point, so it is tried first.
pub fn executable_names(tool: &str) -> Vec<String> {
    if cfg!(windows) {
        vec![
            format!("{}.cmd", tool),
            format!("{}.exe", tool),
            tool.to_string(),
        ]
    } else {
        vec![tool.to_string()]
    }
}

/// Find a tool in an ordered list of directories.
///
/// Returns the first existing, executable match. Does NOT shell out to
/// `which`: its behavior varies across systems and it resolves against the
/// inherited PATH rather than the composed one.
pub fn find_in_dirs(tool: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    let names = executable_names(tool);
    for dir in dirs {
        for name in &names {
            let candidate = dir.join(name);
            if candidate.is_file() && is_executable(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

/// Resolve a tool by name against the composed search path only.
///
/// Used for strategy preconditions ("npm itself must be resolvable"), where
/// the fixed directories of the tool being installed are irrelevant.
pub fn find_tool_on_path(tool: &str, env: &ExecutionEnvironment) -> Option<PathBuf> {
    find_in_dirs(tool, env.path_entries())
}

/// Resolve a managed tool: composed search path first, then its fixed
/// known install directories, in priority order.
pub fn locate(tool: &ManagedTool, env: &ExecutionEnvironment) -> Option<PathBuf> {
    find_in_dirs(tool.name, env.path_entries())
        .or_else(|| find_in_dirs(tool.name, &tool.fixed_dirs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_fake_binary(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    #[cfg(unix)]
    fn create_non_executable_file(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "not executable").unwrap();
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o644)).unwrap();
    }

    fn managed(name: &'static str, fixed: Vec<PathBuf>) -> ManagedTool {
        ManagedTool {
            name,
            min_version: None,
            fixed_dirs: fixed,
        }
    }

    #[test]
    fn find_in_dirs_returns_first_match() {
        let temp = TempDir::new().unwrap();
        let dir_a = temp.path().join("a");
        let dir_b = temp.path().join("b");
        create_fake_binary(&dir_a.join("node"));
        create_fake_binary(&dir_b.join("node"));

        let result = find_in_dirs("node", &[dir_a.clone(), dir_b]);
        assert_eq!(result, Some(dir_a.join("node")));
    }

    #[test]
    fn find_in_dirs_returns_none_when_absent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("empty");
        fs::create_dir_all(&dir).unwrap();

        assert!(find_in_dirs("node", &[dir]).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn find_in_dirs_skips_non_executable() {
        let temp = TempDir::new().unwrap();
        let dir_a = temp.path().join("a");
        let dir_b = temp.path().join("b");
        create_non_executable_file(&dir_a.join("node"));
        create_fake_binary(&dir_b.join("node"));

        let result = find_in_dirs("node", &[dir_a, dir_b.clone()]);
        assert_eq!(result, Some(dir_b.join("node")));
    }

    #[test]
    fn locate_prefers_search_path_over_fixed_dirs() {
        let temp = TempDir::new().unwrap();
        let on_path = temp.path().join("on_path");
        let fixed = temp.path().join("fixed");
        create_fake_binary(&on_path.join("node"));
        create_fake_binary(&fixed.join("node"));

        let env = ExecutionEnvironment::from_parts(vec![on_path.clone()], vec![]);
        let tool = managed("node", vec![fixed]);

        assert_eq!(locate(&tool, &env), Some(on_path.join("node")));
    }

    #[test]
    fn locate_falls_back_to_fixed_dirs_off_the_path() {
        let temp = TempDir::new().unwrap();
        let empty = temp.path().join("empty");
        let fixed = temp.path().join("fixed");
        fs::create_dir_all(&empty).unwrap();
        create_fake_binary(&fixed.join("node"));

        let env = ExecutionEnvironment::from_parts(vec![empty], vec![]);
        let tool = managed("node", vec![fixed.clone()]);

        assert_eq!(locate(&tool, &env), Some(fixed.join("node")));
    }

    #[test]
    fn locate_returns_none_when_nowhere() {
        let temp = TempDir::new().unwrap();
        let env = ExecutionEnvironment::from_parts(vec![temp.path().to_path_buf()], vec![]);
        let tool = managed("node", vec![temp.path().join("missing")]);

        assert!(locate(&tool, &env).is_none());
    }

    #[test]
    fn find_tool_on_path_ignores_fixed_dirs() {
        let temp = TempDir::new().unwrap();
        let fixed = temp.path().join("fixed");
        create_fake_binary(&fixed.join("npm"));

        let env = ExecutionEnvironment::from_parts(vec![], vec![]);
        assert!(find_tool_on_path("npm", &env).is_none());
    }

    #[test]
    fn executable_names_include_platform_variants() {
        let names = executable_names("pnpm");
        if cfg!(windows) {
            assert_eq!(names[0], "pnpm.cmd");
            assert!(names.contains(&"pnpm.exe".to_string()));
        } else {
            assert_eq!(names, vec!["pnpm".to_string()]);
        }
    }

    #[test]
    fn is_executable_returns_false_for_nonexistent_file() {
        assert!(!is_executable(Path::new("/nonexistent/path/to/file")));
    }
}
