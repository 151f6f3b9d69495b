//! Select Model Tool
//!
//! Picks the model the prompt is budgeted against from the built-in
//! registry, optionally overriding its token budget.

use eyre::Result;
use serde_json::{json, Value};

use super::Session;
use crate::mcp_types::{CallToolResult, CallToolResultExt};
use crate::models::{self, ModelSpec};

pub fn execute(session: &Session, arguments: &Value) -> Result<CallToolResult> {
    let model_id = arguments["model"]
        .as_str()
        .ok_or_else(|| eyre::eyre!("Missing or invalid 'model' argument"))?;

    let registered = models::lookup(model_id).map_err(|e| {
        eyre::eyre!("{e}; known models: {}", models::known_model_ids().join(", "))
    })?;

    let model = match arguments["max_tokens"].as_i64() {
        Some(max_tokens) => {
            ModelSpec::parse(registered.name, max_tokens)?.with_encoding(registered.encoding)
        }
        None => registered,
    };

    session.set_model(model.clone())?;
    log::info!("Selected model {} ({} tokens)", model.name, model.max_tokens);

    let response = json!({
        "name": model.name,
        "max_tokens": model.max_tokens,
        "encoding": model.encoding.name(),
    });

    Ok(CallToolResult::success(response.to_string()))
}
