//! `gitea_manual`: progressive documentation lookup over the registry

use async_trait::async_trait;
use rmcp::model::{CallToolResult, ToolAnnotations};
use rmcp::Error as McpError;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::mcp::manual::render_manual;
use crate::mcp::registry::{Registry, Verb};
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext, ToolRegistry};

/// Arguments of a manual lookup; all optional
#[derive(Debug, Default, Deserialize)]
pub struct ManualRequest {
    /// Verb to look up
    pub action: Option<String>,
    /// Resource kind for ordinary verbs
    pub resource: Option<String>,
    /// Relationship type for link/unlink
    #[serde(rename = "type")]
    pub link_type: Option<String>,
}

impl ManualRequest {
    /// The kind to document: `type` wins for link/unlink, `resource` otherwise
    pub fn kind(&self) -> Option<&str> {
        let relationship = self
            .action
            .as_deref()
            .and_then(|action| action.parse::<Verb>().ok())
            .is_some_and(|verb| verb.is_relationship());

        let (first, second) = if relationship {
            (&self.link_type, &self.resource)
        } else {
            (&self.resource, &self.link_type)
        };
        first
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| second.as_deref().filter(|s| !s.is_empty()))
    }
}

/// Tool for reading the operation manual
#[derive(Default)]
pub struct GiteaManualTool;

impl GiteaManualTool {
    /// Creates a new instance of the GiteaManualTool
    pub fn new() -> Self {
        Self
    }

    /// Render the manual for a request against `registry`
    pub fn lookup(registry: &Registry, request: &ManualRequest) -> CallToolResult {
        match render_manual(registry, request.action.as_deref(), request.kind()) {
            Ok(text) => BaseToolImpl::create_success_response(text),
            Err(err) => {
                tracing::debug!("Manual lookup failed: {}", err);
                BaseToolImpl::create_error_response(err.to_string(), None)
            }
        }
    }
}

#[async_trait]
impl McpTool for GiteaManualTool {
    fn name(&self) -> &'static str {
        "gitea_manual"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> Value {
        let actions: Vec<&str> = Verb::ALL.iter().map(Verb::as_str).collect();
        json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "description": "Action to look up: create, get, list, edit, delete, link, unlink",
                    "enum": actions,
                },
                "resource": {
                    "type": "string",
                    "description": "Resource type (for create/get/list/edit/delete actions)",
                },
                "type": {
                    "type": "string",
                    "description": "Link type (for link/unlink actions): issue_label, issue_dependency, issue_blocking",
                    "enum": Registry::link_kinds(),
                }
            },
            "required": []
        })
    }

    fn annotations(&self) -> Option<ToolAnnotations> {
        Some(BaseToolImpl::annotations("Gitea Documentation", true, false, true))
    }

    async fn execute(
        &self,
        arguments: Map<String, Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: ManualRequest = BaseToolImpl::parse_arguments(arguments)?;
        Ok(Self::lookup(context.registry, &request))
    }
}

/// Register the manual tool
pub fn register_manual_tools(registry: &mut ToolRegistry) {
    registry.register(GiteaManualTool::new());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ForgejoClient, MockTransport};
    use crate::mcp::tool_registry::result_text;
    use std::sync::Arc;

    fn context() -> ToolContext {
        ToolContext::new(Arc::new(ForgejoClient::new(Arc::new(MockTransport::new()))))
    }

    async fn call(value: Value) -> CallToolResult {
        GiteaManualTool::new()
            .execute(value.as_object().cloned().unwrap_or_default(), &context())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_no_arguments_gives_overview() {
        let result = call(json!({})).await;
        assert_eq!(result.is_error, Some(false));
        let text = result_text(&result);
        assert!(text.starts_with("# Gitea MCP Tools"));
        for verb in Verb::ALL {
            assert!(text.contains(verb.tool_name()));
        }
    }

    #[tokio::test]
    async fn test_action_lists_resources() {
        let text = result_text(&call(json!({"action": "delete"})).await);
        assert!(text.starts_with("# delete_gitea Resources"));
        assert!(text.contains("| `wiki_page` | Delete a wiki page. |"));
    }

    #[tokio::test]
    async fn test_link_entry_accepts_type_or_resource() {
        let by_type = result_text(&call(json!({"action": "link", "type": "issue_blocking"})).await);
        let by_resource =
            result_text(&call(json!({"action": "link", "resource": "issue_blocking"})).await);
        assert!(by_type.starts_with("## link issue_blocking"));
        assert_eq!(by_type, by_resource);
    }

    #[tokio::test]
    async fn test_unknown_action_is_an_error_result() {
        let result = call(json!({"action": "merge"})).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result_text(&result),
            "unknown action 'merge'. Valid actions: [create get list edit delete link unlink]"
        );
    }

    #[tokio::test]
    async fn test_unknown_resource_lists_valid_ones() {
        let result = call(json!({"action": "get", "resource": "label"})).await;
        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).contains("[issue pull_request repository wiki_page]"));
    }

    #[tokio::test]
    async fn test_non_string_action_is_invalid_request() {
        let err = GiteaManualTool::new()
            .execute(
                json!({"action": 3}).as_object().cloned().unwrap_or_default(),
                &context(),
            )
            .await
            .unwrap_err();
        assert!(err.message.contains("Invalid arguments"));
    }

    #[test]
    fn test_kind_prefers_type_for_relationships() {
        let request = ManualRequest {
            action: Some("unlink".into()),
            resource: Some("issue".into()),
            link_type: Some("issue_label".into()),
        };
        assert_eq!(request.kind(), Some("issue_label"));

        let request = ManualRequest {
            action: Some("create".into()),
            resource: Some("issue".into()),
            link_type: Some("issue_label".into()),
        };
        assert_eq!(request.kind(), Some("issue"));
    }
}
