//! Trigger-line detection and prompt extraction.

use regex::Regex;

/// The literal word that introduces an inline command.
pub const TRIGGER_WORD: &str = "ollama";

/// Matches `ollama <prompt>` trigger lines and extracts the prompt.
pub struct Trigger {
    pattern: Regex,
}

impl Trigger {
    /// Compile the trigger pattern.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"^ollama\s+(.+)$").expect("valid regex"),
        }
    }

    /// Extract the prompt from an explicit-invocation trigger line.
    ///
    /// `"ollama summarize this"` yields `"summarize this"`. A line without
    /// the prefix, or with the prefix and no prompt after it, yields
    /// `None`.
    pub fn inline_prompt<'l>(&self, line: &'l str) -> Option<&'l str> {
        self.pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Extract the prompt for the Enter-keypress path.
    ///
    /// The line is trimmed first: the trigger may be indented, but the
    /// prompt is whatever follows `ollama `.
    pub fn enter_prompt<'l>(&self, line: &'l str) -> Option<&'l str> {
        let trimmed = line.trim();
        if !trimmed.starts_with("ollama ") {
            return None;
        }
        self.inline_prompt(trimmed)
    }
}

impl Default for Trigger {
    fn default() -> Self {
        Self::new()
    }
}
