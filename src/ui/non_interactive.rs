//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::Result;

use super::theme::MilaidyTheme;
use super::{parse_bool_answer, OutputMode, Prompt, SpinnerHandle, UserInterface};

/// Prefix for environment variables that answer prompts ahead of time.
pub const PROMPT_ENV_PREFIX: &str = "MILAIDY_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `MILAIDY_PROMPT_<KEY>` when set, and from the
/// prompt's default otherwise.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
    theme: MilaidyTheme,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self::with_overrides(mode, env_overrides)
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
            theme: MilaidyTheme::plain(),
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn message(&mut self, msg: &str) {
        println!("{}", msg);
    }

    fn success(&mut self, msg: &str) {
        println!("{}", self.theme.format_success(msg));
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_warning(msg));
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }

    fn hint(&mut self, msg: &str) {
        if self.mode.shows_hints() {
            println!("  {}", msg);
        }
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        let env_key = format!("{}{}", PROMPT_ENV_PREFIX, prompt.key.to_uppercase());
        let answer = self
            .env_overrides
            .get(&env_key)
            .and_then(|value| parse_bool_answer(value))
            .unwrap_or(prompt.default);
        tracing::debug!("Answered '{}' non-interactively: {}", prompt.key, answer);
        Ok(answer)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_details() {
            println!("{}", message);
        }
        Box::new(NoopSpinner {
            theme: self.theme.clone(),
            quiet: !self.mode.shows_spinners(),
        })
    }
}

/// Spinner stand-in that prints only the final line.
struct NoopSpinner {
    theme: MilaidyTheme,
    quiet: bool,
}

impl SpinnerHandle for NoopSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if !self.quiet {
            println!("{}", self.theme.format_success(msg));
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }

    fn finish_clear(&mut self) {}
}
