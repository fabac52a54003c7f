//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. Prompt answers are scripted up front.
//!
//! # Example
//!
//! ```
//! use basecamp::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.push_select_response(Some(2));
//!
//! ui.success("Done!");
//! assert!(ui.has_success("Done!"));
//! ```

use std::collections::VecDeque;

use crate::error::Result;

use super::{OutputMode, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    confirms_shown: Vec<String>,
    selects_shown: Vec<String>,
    inputs_shown: Vec<String>,
    confirm_responses: VecDeque<bool>,
    select_responses: VecDeque<Option<usize>>,
    input_responses: VecDeque<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self {
            mode: OutputMode::Normal,
            ..Default::default()
        }
    }

    /// Set whether this mock behaves as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// Queue an answer for the next `confirm` call.
    pub fn push_confirm_response(&mut self, answer: bool) {
        self.confirm_responses.push_back(answer);
    }

    /// Queue an answer for the next `select` call.
    pub fn push_select_response(&mut self, answer: Option<usize>) {
        self.select_responses.push_back(answer);
    }

    /// Queue an answer for the next `input` call.
    pub fn push_input_response(&mut self, answer: &str) {
        self.input_responses.push_back(answer.to_string());
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Get all captured warning messages.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get all captured error messages.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get all captured headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Get all confirm prompts shown (by question).
    pub fn confirms_shown(&self) -> &[String] {
        &self.confirms_shown
    }

    /// Get all select prompts shown (by title).
    pub fn selects_shown(&self) -> &[String] {
        &self.selects_shown
    }

    /// Get all input prompts shown (by prompt text).
    pub fn inputs_shown(&self) -> &[String] {
        &self.inputs_shown
    }

    /// Check if a message containing `msg` was shown.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    /// Check if a success containing `msg` was shown.
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    /// Check if a warning containing `msg` was shown.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    /// Check if an error containing `msg` was shown.
    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        self.confirms_shown.push(question.to_string());
        Ok(self.confirm_responses.pop_front().unwrap_or(default))
    }

    fn select(&mut self, title: &str, _items: &[String]) -> Result<Option<usize>> {
        self.selects_shown.push(title.to_string());
        Ok(self.select_responses.pop_front().unwrap_or(None))
    }

    fn input(&mut self, prompt: &str) -> Result<String> {
        self.inputs_shown.push(prompt.to_string());
        Ok(self.input_responses.pop_front().unwrap_or_default())
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_all_message_kinds() {
        let mut ui = MockUI::new();
        ui.message("info");
        ui.success("yay");
        ui.warning("careful");
        ui.error("boom");
        ui.show_header("Title");

        assert!(ui.has_message("info"));
        assert!(ui.has_success("yay"));
        assert!(ui.has_warning("careful"));
        assert!(ui.has_error("boom"));
        assert_eq!(ui.headers(), ["Title".to_string()]);
    }

    #[test]
    fn scripted_confirm_responses_pop_in_order() {
        let mut ui = MockUI::new();
        ui.push_confirm_response(false);
        ui.push_confirm_response(true);

        assert!(!ui.confirm("first?", true).unwrap());
        assert!(ui.confirm("second?", false).unwrap());
        // Queue exhausted: falls back to the default.
        assert!(ui.confirm("third?", true).unwrap());
    }

    #[test]
    fn scripted_select_responses() {
        let mut ui = MockUI::new();
        ui.push_select_response(Some(1));

        let items = vec!["a".to_string(), "b".to_string()];
        assert_eq!(ui.select("pick", &items).unwrap(), Some(1));
        assert_eq!(ui.select("pick again", &items).unwrap(), None);
        assert_eq!(ui.selects_shown().len(), 2);
    }

    #[test]
    fn scripted_input_responses() {
        let mut ui = MockUI::new();
        ui.push_input_response("doctor --verbose");
        assert_eq!(ui.input("args").unwrap(), "doctor --verbose");
        assert_eq!(ui.input("args").unwrap(), "");
    }

    #[test]
    fn interactivity_is_configurable() {
        let mut ui = MockUI::new();
        assert!(!ui.is_interactive());
        ui.set_interactive(true);
        assert!(ui.is_interactive());
    }
}
