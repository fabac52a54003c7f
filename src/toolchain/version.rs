//! Version extraction and gating.
//!
//! Managed tools self-report their version through a `--version` invocation.
//! The output format varies wildly (`v22.13.0`, `node version 22.12.0
//! (stable)`, bare `9.15.4`), so extraction scans for the first
//! `MAJOR.MINOR.PATCH` numeric triple anywhere in the text rather than
//! parsing a fixed format. Output with no triple at all parses as `0.0.0`,
//! which always fails a version gate without ever being an error.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::env::ExecutionEnvironment;
use crate::project::ManagedTool;
use crate::shell::{run_captured, CommandResult};
use crate::toolchain::locate::locate;

/// A `MAJOR.MINOR.PATCH` version triple.
///
/// Ordering is component-wise: major, then minor, then patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// The zero version, reported when no triple can be extracted.
    pub const ZERO: Version = Version::new(0, 0, 0);

    /// Create a version from its components.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

fn triple_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+)\.(\d+)\.(\d+)").expect("static pattern"))
}

/// Extract the first `MAJOR.MINOR.PATCH` triple found anywhere in `text`.
///
/// Tolerant of a leading `v` and arbitrary surrounding text. Returns
/// [`Version::ZERO`] when no triple is present.
pub fn extract_version(text: &str) -> Version {
    let Some(caps) = triple_pattern().captures(text) else {
        return Version::ZERO;
    };

    // Component overflow (e.g. a 40-digit "version") degrades to 0, which
    // fails the gate rather than aborting the probe.
    let part = |i: usize| caps[i].parse::<u32>().unwrap_or(0);
    Version::new(part(1), part(2), part(3))
}

/// The result of probing a single managed tool.
///
/// `NotFound` and `TooOld` are reported distinctly because they drive
/// different messaging and strategy choices downstream: an absent tool is
/// installed from scratch, a stale one is upgraded in place.
#[derive(Debug, Clone)]
pub enum ToolStatus {
    /// Tool resolved and passed its version gate (or has none).
    Satisfied { path: PathBuf, version: Version },

    /// Tool resolved but reports a version below the floor.
    TooOld {
        path: PathBuf,
        found: Version,
        required: Version,
    },

    /// Tool resolved but its version query failed to run or exited non-zero.
    Unresponsive { path: PathBuf },

    /// Tool is not resolvable anywhere.
    NotFound,
}

impl ToolStatus {
    /// Whether the tool is present and admissible.
    pub fn is_satisfied(&self) -> bool {
        matches!(self, ToolStatus::Satisfied { .. })
    }

    /// Short human-readable description for status lines and logs.
    pub fn describe(&self, tool: &str) -> String {
        match self {
            ToolStatus::Satisfied { version, .. } => format!("{} {}", tool, version),
            ToolStatus::TooOld {
                found, required, ..
            } => format!("{} {} < required {}", tool, found, required),
            ToolStatus::Unresponsive { path } => {
                format!("{} at {} did not answer --version", tool, path.display())
            }
            ToolStatus::NotFound => format!("{} not found", tool),
        }
    }
}

/// Check a managed tool against its version floor.
///
/// `query` runs the tool's version-query invocation and returns its captured
/// stdout on success. It is injected so tests can gate against fabricated
/// version strings without spawning processes.
pub fn check_tool(
    tool: &ManagedTool,
    env: &ExecutionEnvironment,
    query: &dyn Fn(&Path) -> Option<String>,
) -> ToolStatus {
    let Some(path) = locate(tool, env) else {
        return ToolStatus::NotFound;
    };

    let Some(output) = query(&path) else {
        return ToolStatus::Unresponsive { path };
    };

    let version = extract_version(&output);
    match tool.min_version {
        Some(required) if version < required => ToolStatus::TooOld {
            path,
            found: version,
            required,
        },
        _ => ToolStatus::Satisfied { path, version },
    }
}

/// Probe a managed tool by actually invoking `<tool> --version`.
///
/// This is the production probe; the orchestrator and strategy chain take it
/// as a `&dyn Fn` so tests can substitute their own.
pub fn probe_tool(tool: &ManagedTool, env: &ExecutionEnvironment) -> ToolStatus {
    check_tool(tool, env, &|path| query_reported_version(path, env))
}

/// Run the version-query invocation, captured, and return stdout on exit 0.
fn query_reported_version(path: &Path, env: &ExecutionEnvironment) -> Option<String> {
    let result: CommandResult = run_captured(path, ["--version"], None, env);
    if result.success {
        Some(result.stdout)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_plain_triple() {
        assert_eq!(extract_version("22.13.0"), Version::new(22, 13, 0));
    }

    #[test]
    fn extracts_v_prefixed_triple() {
        assert_eq!(extract_version("v22.13.0"), Version::new(22, 13, 0));
    }

    #[test]
    fn extracts_triple_from_surrounding_text() {
        assert_eq!(
            extract_version("node version 22.12.0 (stable)"),
            Version::new(22, 12, 0)
        );
    }

    #[test]
    fn extracts_first_triple_when_several_present() {
        assert_eq!(
            extract_version("9.15.4 (compatible with node 22.13.0)"),
            Version::new(9, 15, 4)
        );
    }

    #[test]
    fn no_triple_reports_zero_not_error() {
        assert_eq!(extract_version("unknown"), Version::ZERO);
        assert_eq!(extract_version(""), Version::ZERO);
        assert_eq!(extract_version("22.13"), Version::ZERO);
    }

    #[test]
    fn comparison_is_lexicographic_over_components() {
        assert!(Version::new(22, 12, 0) < Version::new(22, 12, 1));
        assert!(Version::new(22, 12, 1) < Version::new(22, 13, 0));
        assert!(Version::new(22, 13, 0) < Version::new(23, 0, 0));
    }

    #[test]
    fn zero_fails_any_floor() {
        assert!(Version::ZERO < Version::new(0, 0, 1));
    }

    #[test]
    fn display_round_trips_through_extract() {
        let v = Version::new(22, 13, 0);
        assert_eq!(extract_version(&v.to_string()), v);
    }

    #[test]
    fn overlong_component_degrades_to_zero() {
        let v = extract_version("99999999999999999999.1.2");
        assert_eq!(v, Version::new(0, 1, 2));
    }

    mod gating {
        use super::*;
        use crate::env::ExecutionEnvironment;
        use crate::project::ManagedTool;
        use std::fs;
        use tempfile::TempDir;

        fn fake_tool_in(dir: &Path, name: &str) {
            fs::write(dir.join(name), "#!/bin/sh\n").unwrap();
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(dir.join(name), fs::Permissions::from_mode(0o755)).unwrap();
            }
        }

        fn env_with(dir: &Path) -> ExecutionEnvironment {
            ExecutionEnvironment::from_parts(vec![dir.to_path_buf()], vec![])
        }

        fn tool(min: Option<Version>) -> ManagedTool {
            ManagedTool {
                name: "node",
                min_version: min,
                fixed_dirs: vec![],
            }
        }

        #[test]
        fn unresolvable_tool_is_not_found() {
            let temp = TempDir::new().unwrap();
            let status = check_tool(
                &tool(Some(Version::new(22, 12, 0))),
                &env_with(temp.path()),
                &|_| Some("v22.13.0".into()),
            );
            assert!(matches!(status, ToolStatus::NotFound));
        }

        #[test]
        fn version_below_floor_is_too_old() {
            let temp = TempDir::new().unwrap();
            fake_tool_in(temp.path(), "node");
            let status = check_tool(
                &tool(Some(Version::new(22, 12, 0))),
                &env_with(temp.path()),
                &|_| Some("v20.9.0".into()),
            );
            match status {
                ToolStatus::TooOld {
                    found, required, ..
                } => {
                    assert_eq!(found, Version::new(20, 9, 0));
                    assert_eq!(required, Version::new(22, 12, 0));
                }
                other => panic!("expected TooOld, got {:?}", other),
            }
        }

        #[test]
        fn version_at_floor_is_satisfied() {
            let temp = TempDir::new().unwrap();
            fake_tool_in(temp.path(), "node");
            let status = check_tool(
                &tool(Some(Version::new(22, 12, 0))),
                &env_with(temp.path()),
                &|_| Some("v22.12.0".into()),
            );
            assert!(status.is_satisfied());
        }

        #[test]
        fn unparseable_output_fails_gate_without_error() {
            let temp = TempDir::new().unwrap();
            fake_tool_in(temp.path(), "node");
            let status = check_tool(
                &tool(Some(Version::new(22, 12, 0))),
                &env_with(temp.path()),
                &|_| Some("not a version at all".into()),
            );
            match status {
                ToolStatus::TooOld { found, .. } => assert_eq!(found, Version::ZERO),
                other => panic!("expected TooOld, got {:?}", other),
            }
        }

        #[test]
        fn no_floor_passes_on_any_reported_version() {
            let temp = TempDir::new().unwrap();
            fake_tool_in(temp.path(), "node");
            let status = check_tool(&tool(None), &env_with(temp.path()), &|_| {
                Some("9.15.4".into())
            });
            assert!(status.is_satisfied());
        }

        #[test]
        fn failed_query_is_unresponsive_not_satisfied() {
            let temp = TempDir::new().unwrap();
            fake_tool_in(temp.path(), "node");
            let status = check_tool(&tool(None), &env_with(temp.path()), &|_| None);
            assert!(matches!(status, ToolStatus::Unresponsive { .. }));
            assert!(!status.is_satisfied());
        }

        #[test]
        fn describe_distinguishes_not_found_from_too_old() {
            let not_found = ToolStatus::NotFound.describe("node");
            let too_old = ToolStatus::TooOld {
                path: PathBuf::from("/usr/bin/node"),
                found: Version::new(20, 0, 0),
                required: Version::new(22, 12, 0),
            }
            .describe("node");
            assert!(not_found.contains("not found"));
            assert!(too_old.contains("required"));
            assert_ne!(not_found, too_old);
        }
    }
}
