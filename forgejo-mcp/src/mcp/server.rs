//! MCP server exposing the Forgejo tools

use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{Error as McpError, RoleServer, ServerHandler};
use serde_json::{Map, Value};
use std::sync::Arc;

use super::tool_registry::{register_all_tools, ToolContext, ToolRegistry};
use crate::client::{ForgejoClient, Transport};
use crate::config::Config;
use crate::Result;

const INSTRUCTIONS: &str = "An MCP server to interact with repositories on a Forgejo/Gitea instance. \
Call gitea_manual first to discover the available actions, resources and their parameters.";

/// MCP server for a Forgejo/Gitea instance
#[derive(Clone)]
pub struct McpServer {
    tool_registry: Arc<ToolRegistry>,
    /// Tool context containing shared state for tool execution
    pub tool_context: Arc<ToolContext>,
}

impl McpServer {
    /// Create a server talking HTTP to the configured instance
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let client = ForgejoClient::from_config(config)?;
        tracing::debug!("Serving Forgejo instance at {}", config.base_url);
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Create a server over any transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self::with_client(Arc::new(ForgejoClient::new(transport)))
    }

    fn with_client(client: Arc<ForgejoClient>) -> Self {
        let mut tool_registry = ToolRegistry::new();
        register_all_tools(&mut tool_registry);

        Self {
            tool_registry: Arc::new(tool_registry),
            tool_context: Arc::new(ToolContext::new(client)),
        }
    }

    /// Names of every exposed tool, sorted
    pub fn tool_names(&self) -> Vec<String> {
        self.tool_registry.list_tool_names()
    }

    /// Tool definitions as advertised by `tools/list`
    pub fn tools(&self) -> Vec<Tool> {
        self.tool_registry.list_tools()
    }

    /// Run a tool by name outside of an MCP session
    pub async fn call_tool_by_name(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> std::result::Result<CallToolResult, McpError> {
        match self.tool_registry.get_tool(name) {
            Some(tool) => {
                tracing::debug!("Calling tool {}", name);
                tool.execute(arguments, &self.tool_context).await
            }
            None => Err(McpError::invalid_request(
                format!("Unknown tool: {name}"),
                None,
            )),
        }
    }

    fn capabilities() -> ServerCapabilities {
        ServerCapabilities {
            prompts: None,
            tools: Some(ToolsCapability {
                list_changed: Some(false),
            }),
            resources: None,
            logging: None,
            completions: None,
            experimental: None,
        }
    }

    fn implementation() -> Implementation {
        Implementation {
            name: "forgejo-mcp".into(),
            version: crate::VERSION.into(),
        }
    }
}

impl ServerHandler for McpServer {
    async fn initialize(
        &self,
        request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<InitializeResult, McpError> {
        tracing::info!(
            "MCP client connecting: {} v{}",
            request.client_info.name,
            request.client_info.version
        );

        Ok(InitializeResult {
            protocol_version: ProtocolVersion::default(),
            capabilities: Self::capabilities(),
            instructions: Some(INSTRUCTIONS.into()),
            server_info: Self::implementation(),
        })
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_registry.list_tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        self.call_tool_by_name(&request.name, request.arguments.unwrap_or_default())
            .await
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: Self::capabilities(),
            server_info: Self::implementation(),
            instructions: Some(INSTRUCTIONS.into()),
        }
    }
}
