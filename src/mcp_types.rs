//! MCP types re-export
//!
//! This module re-exports MCP types from rust-mcp-sdk for use in the session tools.

pub use rust_mcp_sdk::schema::{CallToolResult, TextContent};

use rust_mcp_sdk::schema::schema_utils::CallToolError;

// Helper extension trait for CallToolResult
pub trait CallToolResultExt {
    fn success(text: String) -> Self;
}

impl CallToolResultExt for CallToolResult {
    fn success(text: String) -> Self {
        CallToolResult::text_content(vec![TextContent::from(text)])
    }
}

/// Convert a tool failure into the error reported to the MCP client
pub fn tool_error(err: eyre::Report) -> CallToolError {
    CallToolError::new(std::io::Error::other(format!("{err:#}")))
}
