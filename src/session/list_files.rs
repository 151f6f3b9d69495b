//! List Files Tool
//!
//! Snapshot of the working set for rendering per-file cards.

use eyre::Result;
use serde_json::{json, Value};

use super::Session;
use crate::common::format::format_thousands;
use crate::language::detect_language;
use crate::mcp_types::{CallToolResult, CallToolResultExt};

/// Execute the list_files tool
///
/// Content is included for expanded files, or for all files when
/// `include_content` is true.
pub fn execute(session: &Session, arguments: &Value) -> Result<CallToolResult> {
    let include_content = arguments["include_content"].as_bool().unwrap_or(false);
    let assembler = session.assembler();

    let files: Vec<Value> = assembler
        .entries()
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let mut file = json!({
                "index": index,
                "path": entry.path,
                "name": entry.name,
                "language": detect_language(&entry.name).editor_id(),
                "token_used": entry.token_used,
                "token_used_display": format_thousands(entry.token_used as u64),
                "is_expanded": entry.is_expanded,
            });
            if include_content || entry.is_expanded {
                file["content"] = Value::String(entry.content);
            }
            file
        })
        .collect();

    let response = json!({
        "files": files,
        "instruction_token_used": assembler.instruction_tokens(),
        "recount_pending": assembler.has_pending_recount(),
    });

    Ok(CallToolResult::success(response.to_string()))
}
