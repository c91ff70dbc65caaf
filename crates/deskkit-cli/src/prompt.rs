//! Interactive prompts

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// The user aborted a prompt (Ctrl-C or end of input)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl std::fmt::Display for Cancelled {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Operation cancelled")
    }
}

impl std::error::Error for Cancelled {}

/// Source of answers for the scaffolding questions
pub trait Prompter {
    /// Ask for one line of text, pre-filled with `initial`
    fn text(&mut self, message: &str, initial: &str) -> Result<String, Cancelled>;

    /// Ask a yes/no question
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool, Cancelled>;

    /// Ask until `validate` accepts the (trimmed) answer
    fn text_validated(
        &mut self,
        message: &str,
        initial: &str,
        validate: &dyn Fn(&str) -> Result<(), String>,
    ) -> Result<String, Cancelled> {
        loop {
            let answer = self.text(message, initial)?;
            let answer = answer.trim();
            let answer = if answer.is_empty() { initial } else { answer };
            match validate(answer) {
                Ok(()) => return Ok(answer.to_string()),
                Err(reason) => eprintln!("  {}", reason),
            }
        }
    }
}

/// Line editor backed prompter used on a terminal
pub struct RustylinePrompter {
    editor: DefaultEditor,
}

impl RustylinePrompter {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }

    fn read(&mut self, prompt: &str, initial: &str) -> Result<String, Cancelled> {
        match self.editor.readline_with_initial(prompt, (initial, "")) {
            Ok(line) => Ok(line),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Err(Cancelled),
            Err(e) => {
                tracing::warn!(error = %e, "prompt failed");
                Err(Cancelled)
            }
        }
    }
}

impl Prompter for RustylinePrompter {
    fn text(&mut self, message: &str, initial: &str) -> Result<String, Cancelled> {
        self.read(&format!("? {}: ", message), initial)
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool, Cancelled> {
        let hint = if default { "Y/n" } else { "y/N" };
        let answer = self.read(&format!("? {} ({}) ", message, hint), "")?;
        Ok(parse_yes_no(&answer).unwrap_or(default))
    }
}

/// `Some(true)` for y/yes, `Some(false)` for n/no, `None` otherwise
pub fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}
