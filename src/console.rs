//! Interactive console prompts

use crate::error::{Result, ShelfError};
use dialoguer::console::Term;
use dialoguer::Input;

/// Line-oriented user interaction used while processing discs
pub trait Console {
    /// Ask a yes/no question until a recognizable answer is given
    fn confirm(&self, prompt: &str) -> Result<bool>;

    /// Ask for free text; blank input falls back to `default` when given
    fn ask(&self, prompt: &str, default: Option<&str>) -> Result<String>;

    /// Show an informational line to the user
    fn say(&self, message: &str);
}

/// Interpret a yes/no answer
pub fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer {
        "y" | "Y" | "yes" | "Yes" | "YES" => Some(true),
        "n" | "N" | "no" | "No" | "NO" => Some(false),
        _ => None,
    }
}

/// Resolve a typed answer against its default; `None` means ask again
pub fn resolve_answer(answer: &str, default: Option<&str>) -> Option<String> {
    let answer = answer.trim();
    if !answer.is_empty() {
        Some(answer.to_string())
    } else {
        default.map(str::to_string)
    }
}

/// [`Console`] on the terminal's stderr
#[derive(Debug)]
pub struct TermConsole {
    term: Term,
}

impl TermConsole {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    fn read_line(&self, prompt: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text_on(&self.term)
            .map_err(|e| ShelfError::Console(e.to_string()))
    }
}

impl Default for TermConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TermConsole {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        loop {
            if let Some(answer) = parse_yes_no(self.read_line(prompt)?.trim()) {
                return Ok(answer);
            }
        }
    }

    fn ask(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        loop {
            if let Some(answer) = resolve_answer(&self.read_line(prompt)?, default) {
                return Ok(answer);
            }
        }
    }

    fn say(&self, message: &str) {
        let _ = self.term.write_line(message);
    }
}
