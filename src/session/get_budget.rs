//! Get Budget Tool
//!
//! Token usage of the prompt as it would be rendered right now.

use eyre::Result;
use serde_json::{json, Value};

use super::Session;
use crate::mcp_types::{CallToolResult, CallToolResultExt};

pub fn execute(session: &Session, _arguments: &Value) -> Result<CallToolResult> {
    let model = session.model();
    let budget = session.assembler().compute_budget(&model)?;

    let response = json!({
        "model": model.name,
        "budget": budget,
        "can_submit": budget.can_submit(),
        "remaining": budget.remaining(),
        "summary": budget.summary(&model.name),
    });

    Ok(CallToolResult::success(response.to_string()))
}
