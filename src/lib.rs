//! Prompt assembly and token budgeting for repository-sized LLM prompts.
//!
//! Files and an instruction are serialized into a fixed `----`/`--END--`
//! framing while token usage is tracked against a model's budget. The
//! binary exposes one assembly session over MCP (stdio).

pub mod common;
pub mod config;
pub mod error;
pub mod handler;
pub mod language;
pub mod loader;
pub mod mcp_types;
pub mod models;
pub mod prompt;
pub mod session;
pub mod tokens;
pub mod tools;

pub use error::AssemblerError;
pub use prompt::{FileEntry, PromptAssembler, SourceFile};
