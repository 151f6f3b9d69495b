//! Generate Prompt Tool
//!
//! Renders the final prompt. Generation is refused once the budget is used
//! up (utilization at or above 100 %).

use eyre::Result;
use serde_json::Value;

use super::Session;
use crate::mcp_types::{CallToolResult, CallToolResultExt};

pub fn execute(session: &Session, _arguments: &Value) -> Result<CallToolResult> {
    let model = session.model();
    let assembler = session.assembler();
    let budget = assembler.compute_budget(&model)?;

    if budget.is_exhausted() {
        log::warn!(
            "Refusing to generate prompt: {:.1}% of budget used",
            budget.utilization
        );
        eyre::bail!(
            "Prompt exceeds the token budget ({}); remove files or shorten the instruction",
            budget.summary(&model.name)
        );
    }

    let prompt = assembler.render_prompt();
    log::info!(
        "Generated prompt for {} files ({})",
        assembler.len(),
        budget.summary(&model.name)
    );

    Ok(CallToolResult::success(prompt))
}
