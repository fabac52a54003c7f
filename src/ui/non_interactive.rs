//! Non-interactive UI for CI and headless environments.
//!
//! Prompts never block: confirms resolve to their default, selections
//! report "backed out", and inputs come back empty.

use crate::error::Result;

use super::{OutputMode, UserInterface};

/// UI implementation that answers every prompt without blocking.
pub struct NonInteractiveUI {
    mode: OutputMode,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("ok: {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("warning: {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("error: {}", msg);
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("== {} ==", title);
        }
    }

    fn confirm(&mut self, _question: &str, default: bool) -> Result<bool> {
        Ok(default)
    }

    fn select(&mut self, _title: &str, _items: &[String]) -> Result<Option<usize>> {
        Ok(None)
    }

    fn input(&mut self, _prompt: &str) -> Result<String> {
        Ok(String::new())
    }

    fn is_interactive(&self) -> bool {
        false
    }
}
