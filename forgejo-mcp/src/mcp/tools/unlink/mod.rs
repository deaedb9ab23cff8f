//! `unlink_gitea`: remove labels from issues and drop issue dependencies

use async_trait::async_trait;
use rmcp::model::{CallToolResult, ToolAnnotations};
use rmcp::Error as McpError;
use serde_json::{Map, Value};

use crate::client::ForgejoClient;
use crate::mcp::args::ArgBag;
use crate::mcp::dispatch::{upstream, HandlerError, VerbHandler};
use crate::mcp::registry::Verb;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext, ToolRegistry};
use crate::mcp::tools::link::LinkKind;
use crate::mcp::tools::{execute_verb, verb_tool_schema};

/// Routes `unlink_gitea` calls to the client
pub struct UnlinkHandler<'a> {
    client: &'a ForgejoClient,
}

impl<'a> UnlinkHandler<'a> {
    /// Handler over a client
    pub fn new(client: &'a ForgejoClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VerbHandler for UnlinkHandler<'_> {
    type Kind = LinkKind;

    fn verb(&self) -> Verb {
        Verb::Unlink
    }

    fn resolve(&self, kind: &str) -> Option<LinkKind> {
        LinkKind::parse(kind)
    }

    async fn handle(&self, kind: LinkKind, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let index = args.required_id("index")?;

        match kind {
            LinkKind::IssueLabel => {
                let label_id = args.required_id("label_id")?;
                self.client
                    .remove_issue_label(owner, repo, index, label_id)
                    .await
                    .map_err(upstream("remove label"))?;
                Ok(format!("Label {label_id} removed from issue #{index}"))
            }
            LinkKind::IssueDependency => {
                let dependency = args.required_id("dependency_index")?;
                self.client
                    .remove_issue_dependency(owner, repo, index, dependency)
                    .await
                    .map_err(upstream("remove dependency"))?;
                Ok(format!(
                    "Issue #{index} no longer depends on issue #{dependency}"
                ))
            }
            LinkKind::IssueBlocking => {
                let blocked = args.required_id("blocked_index")?;
                self.client
                    .remove_issue_blocking(owner, repo, index, blocked)
                    .await
                    .map_err(upstream("remove blocking relationship"))?;
                Ok(format!("Issue #{index} no longer blocks issue #{blocked}"))
            }
        }
    }
}

/// Tool for removing relationships
#[derive(Default)]
pub struct UnlinkGiteaTool;

impl UnlinkGiteaTool {
    /// Creates a new instance of the UnlinkGiteaTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for UnlinkGiteaTool {
    fn name(&self) -> &'static str {
        "unlink_gitea"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> Value {
        verb_tool_schema(crate::mcp::registry::registry(), Verb::Unlink)
    }

    fn annotations(&self) -> Option<ToolAnnotations> {
        Some(BaseToolImpl::annotations(
            "Unlink Gitea Resources",
            false,
            true,
            true,
        ))
    }

    async fn execute(
        &self,
        arguments: Map<String, Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let handler = UnlinkHandler::new(&context.client);
        Ok(execute_verb(context.registry, &handler, &arguments).await)
    }
}

/// Register the unlink tool
pub fn register_unlink_tools(registry: &mut ToolRegistry) {
    registry.register(UnlinkGiteaTool::new());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockTransport;
    use crate::mcp::tool_registry::result_text;
    use serde_json::json;
    use std::sync::Arc;

    fn setup() -> (Arc<MockTransport>, ToolContext) {
        let mock = Arc::new(MockTransport::new());
        let client = Arc::new(ForgejoClient::new(mock.clone()));
        (mock, ToolContext::new(client))
    }

    async fn call(context: &ToolContext, value: Value) -> String {
        let result = UnlinkGiteaTool::new()
            .execute(value.as_object().cloned().unwrap_or_default(), context)
            .await
            .unwrap();
        result_text(&result)
    }

    #[tokio::test]
    async fn test_remove_label() {
        let (mock, context) = setup();
        let text = call(
            &context,
            json!({"type": "issue_label", "owner": "org", "repo": "project", "index": 42, "label_id": 1}),
        )
        .await;

        assert_eq!(text, "Label 1 removed from issue #42");
        assert_eq!(
            mock.last_request().unwrap().route(),
            "DELETE repos/org/project/issues/42/labels/1"
        );
    }

    #[tokio::test]
    async fn test_remove_dependency_sends_issue_meta() {
        let (mock, context) = setup();
        let text = call(
            &context,
            json!({
                "type": "issue_dependency",
                "owner": "org",
                "repo": "project",
                "index": 42,
                "dependency_index": 10
            }),
        )
        .await;

        assert_eq!(text, "Issue #42 no longer depends on issue #10");
        let request = mock.last_request().unwrap();
        assert_eq!(request.route(), "DELETE repos/org/project/issues/42/dependencies");
        assert_eq!(
            request.body,
            Some(json!({"owner": "org", "repo": "project", "index": 10}))
        );
    }

    #[tokio::test]
    async fn test_remove_blocking() {
        let (_mock, context) = setup();
        let text = call(
            &context,
            json!({
                "type": "issue_blocking",
                "owner": "org",
                "repo": "project",
                "index": 42,
                "blocked_index": 50
            }),
        )
        .await;
        assert_eq!(text, "Issue #42 no longer blocks issue #50");
    }

    #[tokio::test]
    async fn test_unknown_link_type() {
        let (_mock, context) = setup();
        let text = call(
            &context,
            json!({"type": "pr_reviewer", "owner": "org", "repo": "project"}),
        )
        .await;
        assert_eq!(
            text,
            "unknown type 'pr_reviewer'. Valid types: [issue_label issue_dependency issue_blocking]. \
             Use gitea_manual(action=\"unlink\") for details."
        );
    }

    #[tokio::test]
    async fn test_missing_label_id() {
        let (mock, context) = setup();
        let text = call(
            &context,
            json!({"type": "issue_label", "owner": "org", "repo": "project", "index": 42}),
        )
        .await;
        assert!(text.starts_with("Error: label_id is required"));
        assert!(text.contains("## unlink issue_label"));
        assert_eq!(mock.request_count(), 0);
    }
}
