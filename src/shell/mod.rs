//! Subprocess execution.

pub mod command;

pub use command::{display_command, run_captured, run_streamed, CommandResult};
