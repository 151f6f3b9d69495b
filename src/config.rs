//! Server configuration
//!
//! Read once from the environment at startup:
//!
//! | variable | default |
//! |---|---|
//! | `REPO_PROMPT_MODEL` | `gpt-4` |
//! | `REPO_PROMPT_MAX_TOKENS` | the model's context size |
//! | `REPO_PROMPT_DEBOUNCE_MS` | `500` |
//! | `REPO_PROMPT_INSTRUCTION` | the built-in instruction |

use std::time::Duration;

use eyre::{Result, WrapErr};

use crate::models::{self, ModelSpec};
use crate::prompt::assembler::DEFAULT_DEBOUNCE;
use crate::prompt::DEFAULT_INSTRUCTION;

pub const DEFAULT_MODEL: &str = "gpt-4";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub model: ModelSpec,
    pub debounce: Duration,
    pub instruction: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelSpec::new("GPT-4", 8_192),
            debounce: DEFAULT_DEBOUNCE,
            instruction: DEFAULT_INSTRUCTION.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; used by `from_env` and tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Config::default();

        let model_id = lookup("REPO_PROMPT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        config.model = models::lookup(&model_id)?;

        if let Some(raw) = lookup("REPO_PROMPT_MAX_TOKENS") {
            let max_tokens: i64 = raw
                .trim()
                .parse()
                .wrap_err_with(|| format!("REPO_PROMPT_MAX_TOKENS is not an integer: {raw}"))?;
            config.model = ModelSpec::parse(config.model.name.clone(), max_tokens)?
                .with_encoding(config.model.encoding);
        }

        if let Some(raw) = lookup("REPO_PROMPT_DEBOUNCE_MS") {
            let millis: u64 = raw
                .trim()
                .parse()
                .wrap_err_with(|| format!("REPO_PROMPT_DEBOUNCE_MS is not an integer: {raw}"))?;
            config.debounce = Duration::from_millis(millis);
        }

        if let Some(instruction) = lookup("REPO_PROMPT_INSTRUCTION") {
            config.instruction = instruction;
        }

        Ok(config)
    }
}
