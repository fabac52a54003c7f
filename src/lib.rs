//! Basecamp - zero-touch bootstrap and launcher for Node.js applications.
//!
//! Basecamp detects, and if absent installs, the Node.js runtime and the
//! pnpm package manager, resolves their executables across a fragmented set
//! of install locations, installs project dependencies, and drives the build
//! pipeline: idempotently, so repeated invocations converge instead of
//! repeating work. Once bootstrapped it forwards commands to the wrapped
//! application and returns its exit code verbatim.
//!
//! # Modules
//!
//! - [`bootstrap`] - Stage orchestration, setup markers, build pipeline
//! - [`cli`] - Command-line interface and argument parsing
//! - [`env`] - Composed execution environment (search path + overrides)
//! - [`error`] - Error types and result aliases
//! - [`fetch`] - Archive download and extraction
//! - [`project`] - Project layout and managed-tool configuration
//! - [`shell`] - Subprocess execution
//! - [`toolchain`] - Tool location, version gating, install strategies
//! - [`ui`] - Terminal output, prompts, and progress
//!
//! # Example
//!
//! ```
//! use basecamp::toolchain::{extract_version, Version};
//!
//! // Version gating tolerates arbitrary surrounding text.
//! let v = extract_version("node version 22.12.0 (stable)");
//! assert_eq!(v, Version::new(22, 12, 0));
//! ```

pub mod bootstrap;
pub mod cli;
pub mod env;
pub mod error;
pub mod fetch;
pub mod project;
pub mod shell;
pub mod toolchain;
pub mod ui;

pub use error::{BasecampError, Result};
