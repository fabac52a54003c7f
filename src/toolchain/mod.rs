//! Managed-tool resolution, version gating, and install strategies.

pub mod installers;
pub mod locate;
pub mod strategy;
pub mod version;

pub use locate::{find_tool_on_path, locate};
pub use strategy::{ensure, ChainContext, EnsureOutcome, InstallStrategy, Precondition};
pub use version::{check_tool, extract_version, probe_tool, ToolStatus, Version};
