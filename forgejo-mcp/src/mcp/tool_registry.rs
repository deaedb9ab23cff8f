//! Tool registry for MCP operations
//!
//! Every tool the server exposes implements [`McpTool`] and is stored in a
//! [`ToolRegistry`] keyed by name. The server looks tools up here for both
//! `tools/list` and `tools/call`.

use rmcp::model::{Annotated, CallToolResult, RawContent, RawTextContent, Tool, ToolAnnotations};
use rmcp::Error as McpError;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::registry::Registry;
use crate::client::ForgejoClient;

/// Context shared by all tools during execution
#[derive(Clone, Debug)]
pub struct ToolContext {
    /// API client for the configured instance
    pub client: Arc<ForgejoClient>,
    /// Documentation registry used for validation and enrichment
    pub registry: &'static Registry,
}

impl ToolContext {
    /// Create a new tool context over the built-in registry
    pub fn new(client: Arc<ForgejoClient>) -> Self {
        Self {
            client,
            registry: super::registry::registry(),
        }
    }
}

/// Trait defining the interface for all MCP tools
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Get the tool's name
    fn name(&self) -> &'static str;

    /// Get the tool's description
    fn description(&self) -> &'static str;

    /// Get the tool's JSON schema for arguments
    fn schema(&self) -> serde_json::Value;

    /// Behavioral hints advertised to clients
    fn annotations(&self) -> Option<ToolAnnotations> {
        None
    }

    /// Execute the tool with the given arguments and context
    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError>;
}

/// Registry for managing MCP tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn McpTool>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool in the registry
    pub fn register<T: McpTool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        self.tools.insert(name, Box::new(tool));
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<&dyn McpTool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    /// List all registered tool names, sorted
    pub fn list_tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Get all registered tools as Tool objects for MCP list_tools response
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools
            .values()
            .map(|tool| {
                let schema_map = match tool.schema() {
                    serde_json::Value::Object(map) => map,
                    _ => serde_json::Map::new(),
                };

                Tool {
                    name: tool.name().into(),
                    description: Some(tool.description().into()),
                    input_schema: Arc::new(schema_map),
                    annotations: tool.annotations(),
                }
            })
            .collect()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Base implementation providing common utility methods for MCP tools
pub struct BaseToolImpl;

impl BaseToolImpl {
    /// Parse tool arguments from a JSON map into a typed struct
    pub fn parse_arguments<T: serde::de::DeserializeOwned>(
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> std::result::Result<T, McpError> {
        serde_json::from_value(serde_json::Value::Object(arguments))
            .map_err(|e| McpError::invalid_request(format!("Invalid arguments: {e}"), None))
    }

    /// Create a success response with text content
    pub fn create_success_response<T: Into<String>>(content: T) -> CallToolResult {
        CallToolResult {
            content: vec![Annotated::new(
                RawContent::Text(RawTextContent {
                    text: content.into(),
                }),
                None,
            )],
            is_error: Some(false),
        }
    }

    /// Create an error response with the given error message
    ///
    /// # Arguments
    ///
    /// * `error` - The error message
    /// * `details` - Optional additional details
    pub fn create_error_response<T: Into<String>>(
        error: T,
        details: Option<String>,
    ) -> CallToolResult {
        let error_text = match details {
            Some(details) => format!("{}: {}", error.into(), details),
            None => error.into(),
        };

        CallToolResult {
            content: vec![Annotated::new(
                RawContent::Text(RawTextContent { text: error_text }),
                None,
            )],
            is_error: Some(true),
        }
    }

    /// Hints for a tool
    pub fn annotations(
        title: &str,
        read_only: bool,
        destructive: bool,
        idempotent: bool,
    ) -> ToolAnnotations {
        ToolAnnotations {
            title: Some(title.to_string()),
            read_only_hint: Some(read_only),
            destructive_hint: Some(destructive),
            idempotent_hint: Some(idempotent),
            open_world_hint: Some(!read_only),
        }
    }
}

/// Concatenated text of a tool result
pub fn result_text(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|content| match &content.raw {
            RawContent::Text(text) => Some(text.text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Register every tool the server exposes
pub fn register_all_tools(registry: &mut ToolRegistry) {
    use super::tools;

    tools::manual::register_manual_tools(registry);
    tools::create::register_create_tools(registry);
    tools::get::register_get_tools(registry);
    tools::list::register_list_tools(registry);
    tools::edit::register_edit_tools(registry);
    tools::delete::register_delete_tools(registry);
    tools::link::register_link_tools(registry);
    tools::unlink::register_unlink_tools(registry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockTransport;

    /// Mock tool for testing
    struct MockTool {
        name: &'static str,
        description: &'static str,
    }

    #[async_trait::async_trait]
    impl McpTool for MockTool {
        fn name(&self) -> &'static str {
            self.name
        }

        fn description(&self) -> &'static str {
            self.description
        }

        fn schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "test_param": {
                        "type": "string",
                        "description": "A test parameter"
                    }
                }
            })
        }

        async fn execute(
            &self,
            _arguments: serde_json::Map<String, serde_json::Value>,
            _context: &ToolContext,
        ) -> std::result::Result<CallToolResult, McpError> {
            Ok(BaseToolImpl::create_success_response(format!(
                "Mock tool {} executed",
                self.name
            )))
        }
    }

    fn context() -> ToolContext {
        ToolContext::new(Arc::new(ForgejoClient::new(Arc::new(MockTransport::new()))))
    }

    #[test]
    fn test_tool_registry_creation() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_tool_registration() {
        let mut registry = ToolRegistry::new();
        registry.register(MockTool {
            name: "test_tool",
            description: "A test tool",
        });

        assert_eq!(registry.len(), 1);
        assert!(registry.get_tool("test_tool").is_some());
        assert!(registry.get_tool("nonexistent").is_none());
    }

    #[test]
    fn test_list_tools_carries_schema() {
        let mut registry = ToolRegistry::new();
        registry.register(MockTool {
            name: "test_tool",
            description: "A test tool",
        });

        let tools = registry.list_tools();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "test_tool");
        assert_eq!(tools[0].description.as_deref(), Some("A test tool"));
        assert!(tools[0].input_schema.contains_key("properties"));
        assert!(tools[0].annotations.is_none());
    }

    #[tokio::test]
    async fn test_tool_execution() {
        let tool = MockTool {
            name: "exec_test",
            description: "Execution test tool",
        };

        let result = tool
            .execute(serde_json::Map::new(), &context())
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(false));
        assert_eq!(result_text(&result), "Mock tool exec_test executed");
    }

    #[test]
    fn test_all_tools_registered() {
        let mut registry = ToolRegistry::new();
        register_all_tools(&mut registry);

        assert_eq!(
            registry.list_tool_names(),
            vec![
                "create_gitea",
                "delete_gitea",
                "edit_gitea",
                "get_gitea",
                "gitea_manual",
                "link_gitea",
                "list_gitea",
                "unlink_gitea",
            ]
        );
        for tool in registry.list_tools() {
            assert!(tool.annotations.is_some(), "{}", tool.name);
        }
    }

    #[test]
    fn test_error_response_with_details() {
        let result = BaseToolImpl::create_error_response("failed", Some("because".into()));
        assert_eq!(result.is_error, Some(true));
        assert_eq!(result_text(&result), "failed: because");
    }

    #[test]
    fn test_parse_arguments_reports_invalid_input() {
        #[derive(serde::Deserialize)]
        #[allow(dead_code)]
        struct Args {
            count: u32,
        }

        let mut arguments = serde_json::Map::new();
        arguments.insert("count".into(), serde_json::json!("many"));
        assert!(BaseToolImpl::parse_arguments::<Args>(arguments).is_err());
    }
}
