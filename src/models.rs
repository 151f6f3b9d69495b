//! Model registry
//!
//! A model is just a display name, a context budget and the encoding used to
//! count tokens against it.

use serde::Serialize;

use crate::error::{AssemblerError, Result};
use crate::tokens::Encoding;

/// Model the prompt is budgeted against
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSpec {
    pub name: String,
    pub max_tokens: u64,
    pub encoding: Encoding,
}

impl ModelSpec {
    pub fn new(name: impl Into<String>, max_tokens: u64) -> Self {
        let name = name.into();
        let encoding = Encoding::for_model(&name);
        Self {
            name,
            max_tokens,
            encoding,
        }
    }

    /// Build a spec from untrusted input, rejecting non-positive budgets.
    pub fn parse(name: impl Into<String>, max_tokens: i64) -> Result<Self> {
        let name = name.into();
        if max_tokens <= 0 {
            return Err(AssemblerError::InvalidModel { name, max_tokens });
        }
        Ok(Self::new(name, max_tokens as u64))
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_tokens == 0 {
            return Err(AssemblerError::InvalidModel {
                name: self.name.clone(),
                max_tokens: 0,
            });
        }
        Ok(())
    }
}

struct KnownModel {
    id: &'static str,
    name: &'static str,
    max_tokens: u64,
    encoding: Encoding,
}

const KNOWN_MODELS: &[KnownModel] = &[
    KnownModel {
        id: "gpt-3.5-turbo",
        name: "GPT-3.5 Turbo",
        max_tokens: 4_096,
        encoding: Encoding::Cl100kBase,
    },
    KnownModel {
        id: "gpt-3.5-turbo-16k",
        name: "GPT-3.5 Turbo 16k",
        max_tokens: 16_384,
        encoding: Encoding::Cl100kBase,
    },
    KnownModel {
        id: "gpt-4",
        name: "GPT-4",
        max_tokens: 8_192,
        encoding: Encoding::Cl100kBase,
    },
    KnownModel {
        id: "gpt-4-32k",
        name: "GPT-4 32k",
        max_tokens: 32_768,
        encoding: Encoding::Cl100kBase,
    },
    KnownModel {
        id: "gpt-4-turbo",
        name: "GPT-4 Turbo",
        max_tokens: 128_000,
        encoding: Encoding::Cl100kBase,
    },
    KnownModel {
        id: "gpt-4o",
        name: "GPT-4o",
        max_tokens: 128_000,
        encoding: Encoding::O200kBase,
    },
    KnownModel {
        id: "gpt-4o-mini",
        name: "GPT-4o mini",
        max_tokens: 128_000,
        encoding: Encoding::O200kBase,
    },
];

/// Look up a built-in model by id (case-insensitive)
pub fn lookup(id: &str) -> Result<ModelSpec> {
    KNOWN_MODELS
        .iter()
        .find(|m| m.id.eq_ignore_ascii_case(id))
        .map(|m| ModelSpec {
            name: m.name.to_string(),
            max_tokens: m.max_tokens,
            encoding: m.encoding,
        })
        .ok_or_else(|| AssemblerError::UnknownModel(id.to_string()))
}

/// Ids of all built-in models, in registry order
pub fn known_model_ids() -> Vec<&'static str> {
    KNOWN_MODELS.iter().map(|m| m.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let model = lookup("GPT-4").unwrap();
        assert_eq!(model.name, "GPT-4");
        assert_eq!(model.max_tokens, 8_192);
        assert_eq!(model.encoding, Encoding::Cl100kBase);
    }

    #[test]
    fn lookup_unknown_model_fails() {
        assert_eq!(
            lookup("llama-9000"),
            Err(AssemblerError::UnknownModel("llama-9000".to_string()))
        );
    }

    #[test]
    fn parse_rejects_non_positive_budget() {
        assert!(ModelSpec::parse("gpt-4", 0).is_err());
        assert!(ModelSpec::parse("gpt-4", -5).is_err());
        assert_eq!(ModelSpec::parse("gpt-4", 10).unwrap().max_tokens, 10);
    }

    #[test]
    fn validate_catches_zero_budget() {
        assert!(ModelSpec::new("custom", 0).validate().is_err());
        assert!(ModelSpec::new("custom", 1).validate().is_ok());
    }

    #[test]
    fn every_known_model_resolves() {
        for id in known_model_ids() {
            let model = lookup(id).unwrap();
            assert!(model.validate().is_ok(), "{id} has no budget");
        }
    }
}
