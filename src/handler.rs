//! MCP Server Handler Implementation
//!
//! This module implements the ServerHandler trait to handle MCP protocol messages
//! and route tool calls to the shared assembly session.

use async_trait::async_trait;
use rust_mcp_sdk::schema::{
    schema_utils::CallToolError, CallToolRequestParams, CallToolResult, ListToolsResult,
    PaginatedRequestParams, RpcError,
};
use rust_mcp_sdk::{mcp_server::ServerHandler, McpServer};
use std::sync::Arc;

use crate::session::Session;
use crate::tools::PromptTools;

/// Handler owning the server's single assembly session
pub struct PromptServerHandler {
    session: Arc<Session>,
}

impl PromptServerHandler {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl ServerHandler for PromptServerHandler {
    async fn handle_list_tools_request(
        &self,
        _params: Option<PaginatedRequestParams>,
        _runtime: Arc<dyn McpServer>,
    ) -> Result<ListToolsResult, RpcError> {
        Ok(ListToolsResult {
            tools: PromptTools::tools(),
            meta: None,
            next_cursor: None,
        })
    }

    async fn handle_call_tool_request(
        &self,
        params: CallToolRequestParams,
        _runtime: Arc<dyn McpServer>,
    ) -> Result<CallToolResult, CallToolError> {
        log::info!("Calling tool: {}", params.name);

        // Convert request params into the PromptTools enum
        let tool: PromptTools = PromptTools::try_from(params)?;
        let session = &self.session;

        match tool {
            PromptTools::LoadFilesTool(t) => t.call_tool(session),
            PromptTools::ListFilesTool(t) => t.call_tool(session),
            PromptTools::EditFileTool(t) => t.call_tool(session),
            PromptTools::DeleteFileTool(t) => t.call_tool(session),
            PromptTools::ToggleExpandTool(t) => t.call_tool(session),
            PromptTools::SetInstructionTool(t) => t.call_tool(session),
            PromptTools::SelectModelTool(t) => t.call_tool(session),
            PromptTools::GetBudgetTool(t) => t.call_tool(session),
            PromptTools::GeneratePromptTool(t) => t.call_tool(session),
        }
    }
}
