//! Working-set mutation tools: edit, delete and expand/collapse one file.

use eyre::Result;
use serde_json::{json, Value};

use super::{index_arg, Session};
use crate::mcp_types::{CallToolResult, CallToolResultExt};

/// Replace a file's content; its token count refreshes after the debounce.
pub fn execute(session: &Session, arguments: &Value) -> Result<CallToolResult> {
    let index = index_arg(arguments)?;
    let content = arguments["content"]
        .as_str()
        .ok_or_else(|| eyre::eyre!("Missing or invalid 'content' argument"))?;

    let assembler = session.assembler();
    let entry = assembler.edit_content(index, content)?;

    let response = json!({
        "index": index,
        "path": entry.path,
        "token_used": entry.token_used,
        "recount_pending": assembler.has_pending_recount(),
        "recount_delay_ms": assembler.debounce().as_millis() as u64,
    });

    Ok(CallToolResult::success(response.to_string()))
}

/// Remove a file from the working set.
pub fn execute_delete(session: &Session, arguments: &Value) -> Result<CallToolResult> {
    let index = index_arg(arguments)?;
    let assembler = session.assembler();
    let removed = assembler.delete_file(index)?;

    let response = json!({
        "removed": removed.path,
        "remaining": assembler.len(),
    });

    Ok(CallToolResult::success(response.to_string()))
}

/// Expand or collapse a file card.
pub fn execute_toggle(session: &Session, arguments: &Value) -> Result<CallToolResult> {
    let index = index_arg(arguments)?;
    let is_expanded = session.assembler().toggle_expand(index)?;

    let response = json!({
        "index": index,
        "is_expanded": is_expanded,
    });

    Ok(CallToolResult::success(response.to_string()))
}
