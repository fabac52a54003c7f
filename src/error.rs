//! Error types for Basecamp operations.
//!
//! This module defines [`BasecampError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `BasecampError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `BasecampError::Other`) for unexpected errors
//! - Individual install-strategy failures never surface as errors: the chain
//!   logs them and falls through to the next strategy
//! - Subprocess launch failures are reported as failed command results, not
//!   raised as errors

use std::path::PathBuf;
use thiserror::Error;

use crate::toolchain::Version;

/// Core error type for Basecamp operations.
#[derive(Debug, Error)]
pub enum BasecampError {
    /// A managed tool could not be resolved anywhere.
    #[error("'{tool}' not found on the search path or in any known install location")]
    ToolNotFound { tool: String },

    /// A managed tool resolved but reports a version below the floor.
    #[error("'{tool}' {found} is below the required minimum {required}")]
    VersionTooLow {
        tool: String,
        found: Version,
        required: Version,
    },

    /// Every install strategy for a dependency failed verification.
    #[error("All install strategies for '{tool}' failed ({attempted} attempted)")]
    ChainExhausted { tool: String, attempted: usize },

    /// Shell command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// Archive download failed.
    #[error("Download failed for {url}: {message}")]
    DownloadFailed { url: String, message: String },

    /// Archive extraction failed.
    #[error("Failed to extract {archive}: {message}")]
    ExtractFailed { archive: PathBuf, message: String },

    /// A mandatory build step failed.
    #[error("Build step '{step}' failed: {message}")]
    BuildStepFailed { step: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Basecamp operations.
pub type Result<T> = std::result::Result<T, BasecampError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_not_found_displays_tool() {
        let err = BasecampError::ToolNotFound {
            tool: "node".into(),
        };
        assert!(err.to_string().contains("node"));
    }

    #[test]
    fn version_too_low_displays_both_versions() {
        let err = BasecampError::VersionTooLow {
            tool: "node".into(),
            found: Version::new(20, 9, 0),
            required: Version::new(22, 12, 0),
        };
        let msg = err.to_string();
        assert!(msg.contains("20.9.0"));
        assert!(msg.contains("22.12.0"));
    }

    #[test]
    fn chain_exhausted_displays_tool_and_count() {
        let err = BasecampError::ChainExhausted {
            tool: "pnpm".into(),
            attempted: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("pnpm"));
        assert!(msg.contains('3'));
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = BasecampError::CommandFailed {
            command: "pnpm install".into(),
            code: Some(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("pnpm install"));
        assert!(msg.contains('1'));
    }

    #[test]
    fn download_failed_displays_url() {
        let err = BasecampError::DownloadFailed {
            url: "https://nodejs.org/dist/x.zip".into(),
            message: "HTTP 404".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("nodejs.org"));
        assert!(msg.contains("404"));
    }

    #[test]
    fn build_step_failed_displays_step() {
        let err = BasecampError::BuildStepFailed {
            step: "compile".into(),
            message: "tsc exited with 2".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("compile"));
        assert!(msg.contains("tsc"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: BasecampError = io_err.into();
        assert!(matches!(err, BasecampError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(BasecampError::ToolNotFound { tool: "x".into() })
        }
        assert!(returns_error().is_err());
    }
}
