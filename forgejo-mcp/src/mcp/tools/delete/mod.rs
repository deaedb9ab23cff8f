//! `delete_gitea`: irreversible removal of repository resources

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

/// Kinds `delete_gitea` can remove
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum DeleteKind {
    IssueComment,
    IssueAttachment,
    Label,
    Milestone,
    Release,
    ReleaseAttachment,
    WikiPage,
}

impl DeleteKind {
    fn parse(kind: &str) -> Option<Self> {
        Some(match kind {
            "issue_comment" => Self::IssueComment,
            "issue_attachment" => Self::IssueAttachment,
            "label" => Self::Label,
            "milestone" => Self::Milestone,
            "release" => Self::Release,
            "release_attachment" => Self::ReleaseAttachment,
            "wiki_page" => Self::WikiPage,
            _ => return None,
        })
    }
}

/// Routes `delete_gitea` calls to the client
pub struct DeleteHandler<'a> {
    client: &'a ForgejoClient,
}

impl<'a> DeleteHandler<'a> {
    /// Handler over a client
    pub fn new(client: &'a ForgejoClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VerbHandler for DeleteHandler<'_> {
    type Kind = DeleteKind;

    fn verb(&self) -> Verb {
        Verb::Delete
    }

    fn resolve(&self, kind: &str) -> Option<DeleteKind> {
        DeleteKind::parse(kind)
    }

    async fn handle(&self, kind: DeleteKind, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let client = self.client;

        let confirmation = match kind {
            DeleteKind::IssueComment => {
                let id = args.required_id("id")?;
                client
                    .delete_issue_comment(owner, repo, id)
                    .await
                    .map_err(upstream("delete comment"))?;
                format!("Comment {id} successfully deleted.")
            }
            DeleteKind::IssueAttachment => {
                let index = args.required_id("index")?;
                let attachment_id = args.required_id("attachment_id")?;
                client
                    .delete_issue_attachment(owner, repo, index, attachment_id)
                    .await
                    .map_err(upstream("delete attachment"))?;
                format!("Attachment {attachment_id} successfully deleted from issue #{index}.")
            }
            DeleteKind::Label => {
                let id = args.required_id("id")?;
                client
                    .delete_label(owner, repo, id)
                    .await
                    .map_err(upstream("delete label"))?;
                format!("Label {id} successfully deleted.")
            }
            DeleteKind::Milestone => {
                let id = args.required_id("id")?;
                client
                    .delete_milestone(owner, repo, id)
                    .await
                    .map_err(upstream("delete milestone"))?;
                format!("Milestone {id} successfully deleted.")
            }
            DeleteKind::Release => {
                let id = args.required_id("id")?;
                client
                    .delete_release(owner, repo, id)
                    .await
                    .map_err(upstream("delete release"))?;
                format!("Release {id} successfully deleted.")
            }
            DeleteKind::ReleaseAttachment => {
                let id = args.required_id("id")?;
                let attachment_id = args.required_id("attachment_id")?;
                client
                    .delete_release_attachment(owner, repo, id, attachment_id)
                    .await
                    .map_err(upstream("delete release attachment"))?;
                format!("Attachment {attachment_id} successfully deleted from release {id}.")
            }
            DeleteKind::WikiPage => {
                let page_name = args.required_str("page_name")?;
                client
                    .delete_wiki_page(owner, repo, page_name)
                    .await
                    .map_err(upstream("delete wiki page"))?;
                format!("Wiki page '{page_name}' successfully deleted.")
            }
        };

        tracing::info!("Deleted {} in {}/{}", kind_label(kind), owner, repo);
        Ok(confirmation)
    }
}

fn kind_label(kind: DeleteKind) -> &'static str {
    match kind {
        DeleteKind::IssueComment => "issue_comment",
        DeleteKind::IssueAttachment => "issue_attachment",
        DeleteKind::Label => "label",
        DeleteKind::Milestone => "milestone",
        DeleteKind::Release => "release",
        DeleteKind::ReleaseAttachment => "release_attachment",
        DeleteKind::WikiPage => "wiki_page",
    }
}

/// Tool for deleting resources
#[derive(Default)]
pub struct DeleteGiteaTool;

impl DeleteGiteaTool {
    /// Creates a new instance of the DeleteGiteaTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for DeleteGiteaTool {
    fn name(&self) -> &'static str {
        "delete_gitea"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> Value {
        verb_tool_schema(crate::mcp::registry::registry(), Verb::Delete)
    }

    fn annotations(&self) -> Option<ToolAnnotations> {
        Some(BaseToolImpl::annotations(
            "Delete Gitea Resource",
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
        let handler = DeleteHandler::new(&context.client);
        Ok(execute_verb(context.registry, &handler, &arguments).await)
    }
}

/// Register the delete tool
pub fn register_delete_tools(registry: &mut ToolRegistry) {
    registry.register(DeleteGiteaTool::new());
}
