//! `link_gitea`: attach labels to issues and record issue dependencies

use async_trait::async_trait;
use rmcp::model::{CallToolResult, ToolAnnotations};
use rmcp::Error as McpError;
use serde_json::{Map, Value};

use crate::client::ForgejoClient;
use crate::mcp::args::ArgBag;
use crate::mcp::dispatch::{upstream, HandlerError, VerbHandler};
use crate::mcp::registry::Verb;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext, ToolRegistry};
use crate::mcp::tools::{execute_verb, verb_tool_schema};
use crate::render::render_list;

/// Relationships between issues and other resources
///
/// Shared by `link_gitea` and `unlink_gitea`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Labels on an issue
    IssueLabel,
    /// `index` cannot close before `dependency_index`
    IssueDependency,
    /// `blocked_index` cannot close before `index`
    IssueBlocking,
}

impl LinkKind {
    /// Parse a `type` discriminator
    pub fn parse(kind: &str) -> Option<Self> {
        Some(match kind {
            "issue_label" => Self::IssueLabel,
            "issue_dependency" => Self::IssueDependency,
            "issue_blocking" => Self::IssueBlocking,
            _ => return None,
        })
    }
}

/// Routes `link_gitea` calls to the client
pub struct LinkHandler<'a> {
    client: &'a ForgejoClient,
}

impl<'a> LinkHandler<'a> {
    /// Handler over a client
    pub fn new(client: &'a ForgejoClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VerbHandler for LinkHandler<'_> {
    type Kind = LinkKind;

    fn verb(&self) -> Verb {
        Verb::Link
    }

    fn resolve(&self, kind: &str) -> Option<LinkKind> {
        LinkKind::parse(kind)
    }

    async fn handle(&self, kind: LinkKind, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let index = args.required_id("index")?;

        match kind {
            LinkKind::IssueLabel => {
                let label_ids = args.required_id_array("labels")?;
                let labels = self
                    .client
                    .add_issue_labels(owner, repo, index, &label_ids)
                    .await
                    .map_err(upstream("add labels"))?;
                Ok(format!(
                    "Labels added to issue #{index}\n\n{}",
                    render_list(&labels)
                ))
            }
            LinkKind::IssueDependency => {
                let dependency = args.required_id("dependency_index")?;
                self.client
                    .add_issue_dependency(owner, repo, index, dependency)
                    .await
                    .map_err(upstream("add dependency"))?;
                Ok(format!(
                    "Issue #{index} now depends on issue #{dependency} (must close #{dependency} first)"
                ))
            }
            LinkKind::IssueBlocking => {
                let blocked = args.required_id("blocked_index")?;
                self.client
                    .add_issue_blocking(owner, repo, index, blocked)
                    .await
                    .map_err(upstream("add blocking relationship"))?;
                Ok(format!(
                    "Issue #{index} now blocks issue #{blocked} (must close #{index} first)"
                ))
            }
        }
    }
}

/// Tool for creating relationships
#[derive(Default)]
pub struct LinkGiteaTool;

impl LinkGiteaTool {
    /// Creates a new instance of the LinkGiteaTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for LinkGiteaTool {
    fn name(&self) -> &'static str {
        "link_gitea"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> Value {
        verb_tool_schema(crate::mcp::registry::registry(), Verb::Link)
    }

    fn annotations(&self) -> Option<ToolAnnotations> {
        Some(BaseToolImpl::annotations(
            "Link Gitea Resources",
            false,
            false,
            true,
        ))
    }

    async fn execute(
        &self,
        arguments: Map<String, Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let handler = LinkHandler::new(&context.client);
        Ok(execute_verb(context.registry, &handler, &arguments).await)
    }
}

/// Register the link tool
pub fn register_link_tools(registry: &mut ToolRegistry) {
    registry.register(LinkGiteaTool::new());
}
