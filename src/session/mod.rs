//! Assembly session tools
//!
//! One [`Session`] backs the whole server: the working set, the instruction
//! and the selected model. Each submodule implements one MCP tool as an
//! `execute(session, arguments)` function returning the tool's text result.

pub mod edit_file;
pub mod generate_prompt;
pub mod get_budget;
pub mod list_files;
pub mod load_files;
pub mod select_model;
pub mod set_instruction;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use eyre::Result;
use serde_json::Value;

use crate::config::Config;
use crate::error::AssemblerError;
use crate::models::ModelSpec;
use crate::prompt::PromptAssembler;
use crate::tokens::{BpeCounter, TokenCounter};

pub struct Session {
    assembler: PromptAssembler,
    model: Mutex<ModelSpec>,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        let counter = Arc::new(BpeCounter::new(config.model.encoding));
        Self::with_counter(config.model.clone(), counter, config.debounce, &config.instruction)
    }

    pub fn with_counter(
        model: ModelSpec,
        counter: Arc<dyn TokenCounter>,
        debounce: Duration,
        instruction: &str,
    ) -> Self {
        let assembler = PromptAssembler::new(counter).with_debounce(debounce);
        assembler.set_instruction(instruction);

        Self {
            assembler,
            model: Mutex::new(model),
        }
    }

    pub fn assembler(&self) -> &PromptAssembler {
        &self.assembler
    }

    pub fn model(&self) -> ModelSpec {
        self.model
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Switch the budget model; counts are redone when the encoding changes.
    pub fn set_model(&self, model: ModelSpec) -> Result<(), AssemblerError> {
        model.validate()?;

        let mut current = self.model.lock().unwrap_or_else(PoisonError::into_inner);
        if current.encoding != model.encoding {
            log::info!("Switching token encoding to {}", model.encoding);
            self.assembler
                .set_counter(Arc::new(BpeCounter::new(model.encoding)));
        }
        *current = model;
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("assembler", &self.assembler)
            .field("model", &self.model())
            .finish()
    }
}

/// Read the required `index` argument
pub(crate) fn index_arg(arguments: &Value) -> Result<usize> {
    arguments["index"]
        .as_u64()
        .map(|i| i as usize)
        .ok_or_else(|| eyre::eyre!("Missing or invalid 'index' argument"))
}
