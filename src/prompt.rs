use dialoguer::console::Term;
use dialoguer::{Input, Select};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt failed: {0}")]
    Terminal(#[from] dialoguer::Error),

    #[error("no options to choose from")]
    NoOptions,
}

/// Blocking operator input
pub trait Prompter {
    /// Ask the operator to pick one of `options`; returns the chosen option
    fn prompt_choice(&mut self, label: &str, options: &[&str]) -> Result<String, PromptError>;

    /// Ask for free text
    fn prompt_text(&mut self, label: &str) -> Result<String, PromptError>;
}

/// Interactive prompts on stderr
pub struct DialoguerPrompter {
    term: Term,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self { term: Term::stderr() }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn prompt_choice(&mut self, label: &str, options: &[&str]) -> Result<String, PromptError> {
        if options.is_empty() {
            return Err(PromptError::NoOptions);
        }

        let index = Select::new()
            .with_prompt(label)
            .items(options)
            .default(0)
            .interact_on(&self.term)?;

        log::debug!("[prompt] choice: label={:?} selected={:?}", label, options[index]);
        Ok(options[index].to_string())
    }

    fn prompt_text(&mut self, label: &str) -> Result<String, PromptError> {
        let answer: String = Input::new()
            .with_prompt(label)
            .interact_text_on(&self.term)?;

        log::debug!("[prompt] text: label={:?} answer={:?}", label, answer);
        Ok(answer)
    }
}
