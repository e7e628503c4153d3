//! Command surface used to force a renderer choice

use thiserror::Error;

use crate::backend::BackendId;
use crate::selection::SelectionState;

/// Command execution errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Blank command line
    #[error("Empty command")]
    Empty,

    /// No handler for the command
    #[error("Unknown command: {0}")]
    Unknown(String),

    /// The command needs an argument
    #[error("Command '{0}' needs an argument")]
    MissingArgument(String),

    /// The renderer mode is not known
    #[error("Unknown renderer mode: {0}")]
    UnknownMode(String),
}

/// Executes textual commands against the selection state
pub trait CommandSurface {
    /// Execute one command line
    fn execute(&mut self, command: &str, state: &mut SelectionState) -> Result<(), CommandError>;
}

/// Console understanding `renderer <mode>`
#[derive(Debug, Default)]
pub struct RendererConsole {
    history: Vec<String>,
}

impl RendererConsole {
    /// Create a console with empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Successfully executed commands, oldest first
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl CommandSurface for RendererConsole {
    fn execute(&mut self, command: &str, state: &mut SelectionState) -> Result<(), CommandError> {
        let mut words = command.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?;

        match name {
            "renderer" => {
                let arg = words
                    .next()
                    .ok_or_else(|| CommandError::MissingArgument(name.to_string()))?;
                let mode = BackendId::from_mode_name(arg)
                    .ok_or_else(|| CommandError::UnknownMode(arg.to_string()))?;
                state.request(mode);
                log::info!("renderer set to {}", mode);
            }
            other => return Err(CommandError::Unknown(other.to_string())),
        }

        self.history.push(command.trim().to_string());
        Ok(())
    }
}
