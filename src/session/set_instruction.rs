use eyre::Result;
use serde_json::{json, Value};

use super::Session;
use crate::mcp_types::{CallToolResult, CallToolResultExt};

/// Replace the instruction appended after `--END--`.
pub fn execute(session: &Session, arguments: &Value) -> Result<CallToolResult> {
    let instruction = arguments["instruction"]
        .as_str()
        .ok_or_else(|| eyre::eyre!("Missing or invalid 'instruction' argument"))?;

    let assembler = session.assembler();
    assembler.set_instruction(instruction);

    let response = json!({
        "instruction_token_used": assembler.instruction_tokens(),
    });

    Ok(CallToolResult::success(response.to_string()))
}
