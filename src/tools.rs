//! MCP Tool definitions and implementations
//!
//! This module defines all the tools provided by the repo-prompt-mcp server
//! using the rust-mcp-sdk macros and conventions.

use rust_mcp_sdk::macros::{mcp_tool, JsonSchema};
use rust_mcp_sdk::schema::{schema_utils::CallToolError, CallToolResult};
use rust_mcp_sdk::tool_box;

use crate::mcp_types::tool_error;
use crate::session::{
    edit_file, generate_prompt, get_budget, list_files, load_files, select_model,
    set_instruction, Session,
};

/// A file record supplied by an external loader
#[derive(Debug, ::serde::Deserialize, ::serde::Serialize, JsonSchema)]
pub struct FileRecord {
    /// Repository-relative path, used as the section header in the prompt
    pub path: String,
    /// Base name of the file (defaults to the last path segment)
    #[serde(default)]
    pub name: Option<String>,
    /// Full file content
    pub content: String,
}

/// Start a new working set from file records or a local directory
#[mcp_tool(
    name = "load_files",
    description = "Start a new prompt working set. Pass either 'files' (an ordered array of {path, name, content} records) or 'path' (a local file or directory, optionally filtered by a glob 'pattern'). Replaces any previous files, counts tokens for every file, and returns the per-file token usage. File order is the order files appear in the generated prompt."
)]
#[derive(Debug, ::serde::Deserialize, ::serde::Serialize, JsonSchema)]
pub struct LoadFilesTool {
    /// Ordered file records to assemble
    #[serde(default)]
    pub files: Option<Vec<FileRecord>>,
    /// Local file or directory to load instead of inline records
    #[serde(default)]
    pub path: Option<String>,
    /// Glob pattern to filter loaded files (e.g., "src/**/*.rs")
    #[serde(default)]
    pub pattern: Option<String>,
    /// Skip files larger than this many bytes (default: 524288)
    #[serde(default)]
    pub max_file_bytes: Option<u64>,
}

/// List the files of the working set with their token usage
#[mcp_tool(
    name = "list_files",
    description = "List the files in the prompt working set in prompt order. Each entry has its index, path, editor language, token count and expanded flag. Content is included for expanded files, or for every file when include_content is true. Also reports whether a token recount is still pending after a recent edit."
)]
#[derive(Debug, ::serde::Deserialize, ::serde::Serialize, JsonSchema)]
pub struct ListFilesTool {
    /// Include the content of collapsed files too (default: false)
    #[serde(default)]
    pub include_content: Option<bool>,
}

/// Replace the content of one file
#[mcp_tool(
    name = "edit_file",
    description = "Replace the content of the file at 'index'. The new content is used by the prompt immediately; the file's token count is refreshed after a short debounce delay. Only the most recently edited file gets its count refreshed."
)]
#[derive(Debug, ::serde::Deserialize, ::serde::Serialize, JsonSchema)]
pub struct EditFileTool {
    /// Position of the file in the working set (0-indexed)
    pub index: u64,
    /// New full content of the file
    pub content: String,
}

/// Remove one file from the working set
#[mcp_tool(
    name = "delete_file",
    description = "Remove the file at 'index' from the prompt working set. Files after it shift down by one position."
)]
#[derive(Debug, ::serde::Deserialize, ::serde::Serialize, JsonSchema)]
pub struct DeleteFileTool {
    /// Position of the file in the working set (0-indexed)
    pub index: u64,
}

/// Expand or collapse one file
#[mcp_tool(
    name = "toggle_expand",
    description = "Toggle whether the file at 'index' is expanded. Expanded files show their content in list_files. Has no effect on token usage or the generated prompt."
)]
#[derive(Debug, ::serde::Deserialize, ::serde::Serialize, JsonSchema)]
pub struct ToggleExpandTool {
    /// Position of the file in the working set (0-indexed)
    pub index: u64,
}

/// Replace the instruction that follows the repository text
#[mcp_tool(
    name = "set_instruction",
    description = "Set the free-text instruction placed after --END-- in the generated prompt. Returns the instruction's token count."
)]
#[derive(Debug, ::serde::Deserialize, ::serde::Serialize, JsonSchema)]
pub struct SetInstructionTool {
    /// Instruction text
    pub instruction: String,
}

/// Choose the model the prompt is budgeted against
#[mcp_tool(
    name = "select_model",
    description = "Select the target model by id (e.g., 'gpt-4', 'gpt-4o', 'gpt-3.5-turbo'). Sets the token budget and the tokenizer used for counting. Optionally override the model's maximum tokens."
)]
#[derive(Debug, ::serde::Deserialize, ::serde::Serialize, JsonSchema)]
pub struct SelectModelTool {
    /// Model id from the built-in registry
    pub model: String,
    /// Override for the model's token budget (must be > 0)
    #[serde(default)]
    pub max_tokens: Option<i64>,
}

/// Report token usage against the model's budget
#[mcp_tool(
    name = "get_budget",
    description = "Report the prompt's token usage: per-part token counts (files, instruction, template), total, the model's maximum, utilization percentage, status ('active' or 'exception') and whether generation is allowed."
)]
#[derive(Debug, ::serde::Deserialize, ::serde::Serialize, JsonSchema)]
pub struct GetBudgetTool {}

/// Render the final prompt
#[mcp_tool(
    name = "generate_prompt",
    description = "Render the working set and instruction into the final prompt text. Fails when the prompt uses 100% or more of the selected model's token budget."
)]
#[derive(Debug, ::serde::Deserialize, ::serde::Serialize, JsonSchema)]
pub struct GeneratePromptTool {}

// Implement tool execution logic for each tool
impl LoadFilesTool {
    pub fn call_tool(&self, session: &Session) -> Result<CallToolResult, CallToolError> {
        let args = serde_json::json!({
            "files": self.files,
            "path": self.path,
            "pattern": self.pattern,
            "max_file_bytes": self.max_file_bytes
        });

        load_files::execute(session, &args).map_err(tool_error)
    }
}

impl ListFilesTool {
    pub fn call_tool(&self, session: &Session) -> Result<CallToolResult, CallToolError> {
        let args = serde_json::json!({
            "include_content": self.include_content.unwrap_or(false)
        });

        list_files::execute(session, &args).map_err(tool_error)
    }
}

impl EditFileTool {
    pub fn call_tool(&self, session: &Session) -> Result<CallToolResult, CallToolError> {
        let args = serde_json::json!({
            "index": self.index,
            "content": self.content
        });

        edit_file::execute(session, &args).map_err(tool_error)
    }
}

impl DeleteFileTool {
    pub fn call_tool(&self, session: &Session) -> Result<CallToolResult, CallToolError> {
        let args = serde_json::json!({ "index": self.index });

        edit_file::execute_delete(session, &args).map_err(tool_error)
    }
}

impl ToggleExpandTool {
    pub fn call_tool(&self, session: &Session) -> Result<CallToolResult, CallToolError> {
        let args = serde_json::json!({ "index": self.index });

        edit_file::execute_toggle(session, &args).map_err(tool_error)
    }
}

impl SetInstructionTool {
    pub fn call_tool(&self, session: &Session) -> Result<CallToolResult, CallToolError> {
        let args = serde_json::json!({ "instruction": self.instruction });

        set_instruction::execute(session, &args).map_err(tool_error)
    }
}

impl SelectModelTool {
    pub fn call_tool(&self, session: &Session) -> Result<CallToolResult, CallToolError> {
        let args = serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens
        });

        select_model::execute(session, &args).map_err(tool_error)
    }
}

impl GetBudgetTool {
    pub fn call_tool(&self, session: &Session) -> Result<CallToolResult, CallToolError> {
        get_budget::execute(session, &serde_json::Value::Null).map_err(tool_error)
    }
}

impl GeneratePromptTool {
    pub fn call_tool(&self, session: &Session) -> Result<CallToolResult, CallToolError> {
        generate_prompt::execute(session, &serde_json::Value::Null).map_err(tool_error)
    }
}

// Generate an enum with all tools
tool_box!(
    PromptTools,
    [
        LoadFilesTool,
        ListFilesTool,
        EditFileTool,
        DeleteFileTool,
        ToggleExpandTool,
        SetInstructionTool,
        SelectModelTool,
        GetBudgetTool,
        GeneratePromptTool
    ]
);
