//! Prompt assembly
//!
//! - `template`: the fixed framing of the final prompt
//! - `assembler`: the working set, debounced token accounting and rendering

pub mod assembler;
pub mod template;

use serde::{Deserialize, Serialize};

pub use assembler::PromptAssembler;

/// Default instruction a new session starts with
pub const DEFAULT_INSTRUCTION: &str =
    "Write me a ...\nOutput the filename and code block, which contain the content of files.";

/// A file as handed over by a source loader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    pub name: String,
    pub content: String,
}

impl SourceFile {
    /// Build a record whose name is the last path segment.
    pub fn from_path(path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or_default().to_string();
        Self {
            path,
            name,
            content: content.into(),
        }
    }
}

/// Identity of a working-set entry that survives deletions of its neighbours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntryId(u64);

/// One file in the working set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub id: EntryId,
    pub path: String,
    pub name: String,
    pub content: String,
    pub is_expanded: bool,
    pub token_used: usize,
}
