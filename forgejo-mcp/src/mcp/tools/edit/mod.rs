//! `edit_gitea`: partial updates of existing resources
//!
//! Only the fields present in the call are sent; everything else is left as
//! the server has it.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rmcp::model::{CallToolResult, ToolAnnotations};
use rmcp::Error as McpError;
use serde_json::{Map, Value};

use crate::client::options::{
    EditIssueOption, EditLabelOption, EditMilestoneOption, EditReleaseOption, WikiPageOption,
};
use crate::client::ForgejoClient;
use crate::mcp::args::ArgBag;
use crate::mcp::dispatch::{upstream, HandlerError, VerbHandler};
use crate::mcp::registry::Verb;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext, ToolRegistry};
use crate::mcp::tools::{execute_verb, verb_tool_schema};
use crate::render::ToMarkdown;

/// Kinds `edit_gitea` can update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum EditKind {
    Issue,
    IssueComment,
    IssueAttachment,
    Label,
    Milestone,
    Release,
    ReleaseAttachment,
    WikiPage,
}

impl EditKind {
    fn parse(kind: &str) -> Option<Self> {
        Some(match kind {
            "issue" => Self::Issue,
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

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

/// Routes `edit_gitea` calls to the client
pub struct EditHandler<'a> {
    client: &'a ForgejoClient,
}

impl<'a> EditHandler<'a> {
    /// Handler over a client
    pub fn new(client: &'a ForgejoClient) -> Self {
        Self { client }
    }

    async fn issue(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let index = args.required_id("index")?;
        let option = EditIssueOption {
            title: owned(args.opt_str("title")),
            body: owned(args.opt_str("body")),
            state: owned(args.opt_enum("state", &["open", "closed"])?),
            assignees: args.opt_string_array("assignees"),
            milestone: args.opt_positive_int("milestone"),
            due_date: args.opt_timestamp("due_date")?,
        };
        let issue = self
            .client
            .edit_issue(owner, repo, index, &option)
            .await
            .map_err(upstream("edit issue"))?;
        Ok(issue.to_markdown())
    }

    async fn issue_comment(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let id = args.required_id("id")?;
        let body = args.required_str("body")?;
        let comment = self
            .client
            .edit_issue_comment(owner, repo, id, body)
            .await
            .map_err(upstream("edit comment"))?;
        Ok(comment.to_markdown())
    }

    async fn issue_attachment(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let index = args.required_id("index")?;
        let attachment_id = args.required_id("attachment_id")?;
        let name = args.required_str("name")?;
        let attachment = self
            .client
            .edit_issue_attachment(owner, repo, index, attachment_id, name)
            .await
            .map_err(upstream("edit attachment"))?;
        Ok(attachment.to_markdown())
    }

    async fn label(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let id = args.required_id("id")?;
        let option = EditLabelOption {
            name: owned(args.opt_str("name")),
            color: owned(args.opt_str("color")),
            description: owned(args.opt_str("description")),
        };
        let label = self
            .client
            .edit_label(owner, repo, id, &option)
            .await
            .map_err(upstream("edit label"))?;
        Ok(label.to_markdown())
    }

    async fn milestone(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let id = args.required_id("id")?;
        let option = EditMilestoneOption {
            title: owned(args.opt_str("title")),
            description: owned(args.opt_str("description")),
            due_on: args.opt_timestamp("due_date")?,
            state: owned(args.opt_enum("state", &["open", "closed"])?),
        };
        let milestone = self
            .client
            .edit_milestone(owner, repo, id, &option)
            .await
            .map_err(upstream("edit milestone"))?;
        Ok(milestone.to_markdown())
    }

    async fn release(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let id = args.required_id("id")?;
        let option = EditReleaseOption {
            tag_name: owned(args.opt_str("tag_name")),
            name: owned(args.opt_str("name")),
            body: owned(args.opt_str("body")),
            target_commitish: owned(args.opt_str("target_commitish")),
            draft: args.opt_bool("draft"),
            prerelease: args.opt_bool("prerelease"),
        };
        let release = self
            .client
            .edit_release(owner, repo, id, &option)
            .await
            .map_err(upstream("edit release"))?;
        Ok(release.to_markdown())
    }

    async fn release_attachment(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let id = args.required_id("id")?;
        let attachment_id = args.required_id("attachment_id")?;
        let name = args.required_str("name")?;
        let attachment = self
            .client
            .edit_release_attachment(owner, repo, id, attachment_id, name)
            .await
            .map_err(upstream("edit release attachment"))?;
        Ok(attachment.to_markdown())
    }

    async fn wiki_page(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let page_name = args.required_str("page_name")?;
        let content = args.required_str("content")?;
        // Keeps the current name unless a new title is given
        let option = WikiPageOption {
            title: args.opt_str("title").unwrap_or(page_name).to_string(),
            content_base64: STANDARD.encode(content),
            message: owned(args.opt_str("message")),
        };
        let page = self
            .client
            .edit_wiki_page(owner, repo, page_name, &option)
            .await
            .map_err(upstream("edit wiki page"))?;
        Ok(page.to_markdown())
    }
}

#[async_trait]
impl VerbHandler for EditHandler<'_> {
    type Kind = EditKind;

    fn verb(&self) -> Verb {
        Verb::Edit
    }

    fn resolve(&self, kind: &str) -> Option<EditKind> {
        EditKind::parse(kind)
    }

    async fn handle(&self, kind: EditKind, args: ArgBag<'_>) -> Result<String, HandlerError> {
        match kind {
            EditKind::Issue => self.issue(args).await,
            EditKind::IssueComment => self.issue_comment(args).await,
            EditKind::IssueAttachment => self.issue_attachment(args).await,
            EditKind::Label => self.label(args).await,
            EditKind::Milestone => self.milestone(args).await,
            EditKind::Release => self.release(args).await,
            EditKind::ReleaseAttachment => self.release_attachment(args).await,
            EditKind::WikiPage => self.wiki_page(args).await,
        }
    }
}

/// Tool for editing resources
#[derive(Default)]
pub struct EditGiteaTool;

impl EditGiteaTool {
    /// Creates a new instance of the EditGiteaTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for EditGiteaTool {
    fn name(&self) -> &'static str {
        "edit_gitea"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> Value {
        verb_tool_schema(crate::mcp::registry::registry(), Verb::Edit)
    }

    fn annotations(&self) -> Option<ToolAnnotations> {
        Some(BaseToolImpl::annotations(
            "Edit Gitea Resource",
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
        let handler = EditHandler::new(&context.client);
        Ok(execute_verb(context.registry, &handler, &arguments).await)
    }
}

/// Register the edit tool
pub fn register_edit_tools(registry: &mut ToolRegistry) {
    registry.register(EditGiteaTool::new());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Method, MockTransport};
    use crate::mcp::tool_registry::result_text;
    use serde_json::json;
    use std::sync::Arc;

    fn setup() -> (Arc<MockTransport>, ToolContext) {
        let mock = Arc::new(MockTransport::new());
        let client = Arc::new(ForgejoClient::new(mock.clone()));
        (mock, ToolContext::new(client))
    }

    async fn call(context: &ToolContext, value: Value) -> CallToolResult {
        EditGiteaTool::new()
            .execute(value.as_object().cloned().unwrap_or_default(), context)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_edit_issue_sends_only_given_fields() {
        let (mock, context) = setup();
        mock.set_response(
            Method::Patch,
            "repos/org/project/issues/42",
            json!({"number": 42, "title": "Crash", "state": "closed"}),
        );

        let result = call(
            &context,
            json!({
                "resource": "issue",
                "owner": "org",
                "repo": "project",
                "index": 42,
                "state": "closed"
            }),
        )
        .await;

        assert_eq!(result.is_error, Some(false));
        assert!(result_text(&result).contains("- **State**: closed"));
        let request = mock.last_request().unwrap();
        assert_eq!(request.body, Some(json!({"state": "closed"})));
    }

    #[tokio::test]
    async fn test_edit_wiki_page_defaults_title_to_page_name() {
        let (mock, context) = setup();
        call(
            &context,
            json!({
                "resource": "wiki_page",
                "owner": "org",
                "repo": "project",
                "page_name": "Home",
                "content": "# Updated"
            }),
        )
        .await;

        let request = mock.last_request().unwrap();
        assert_eq!(request.method, Method::Patch);
        let body = request.body.unwrap();
        assert_eq!(body["title"], "Home");
        assert_eq!(body["content_base64"], STANDARD.encode("# Updated"));
    }

    #[tokio::test]
    async fn test_edit_release_keeps_explicit_false() {
        let (mock, context) = setup();
        call(
            &context,
            json!({
                "resource": "release",
                "owner": "org",
                "repo": "project",
                "id": 1,
                "prerelease": false
            }),
        )
        .await;

        let request = mock.last_request().unwrap();
        assert_eq!(request.body, Some(json!({"prerelease": false})));
    }

    #[tokio::test]
    async fn test_edit_attachment_requires_attachment_id() {
        let (mock, context) = setup();
        let result = call(
            &context,
            json!({
                "resource": "release_attachment",
                "owner": "org",
                "repo": "project",
                "id": 1,
                "name": "app.zip"
            }),
        )
        .await;

        assert_eq!(result.is_error, Some(true));
        let text = result_text(&result);
        assert!(text.starts_with("Error: attachment_id is required"));
        assert!(text.contains("## edit release_attachment"));
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_edit_comment_failure() {
        let (mock, context) = setup();
        mock.fail_with(403, "forbidden");
        let result = call(
            &context,
            json!({
                "resource": "issue_comment",
                "owner": "org",
                "repo": "project",
                "id": 5,
                "body": "Updated"
            }),
        )
        .await;

        assert_eq!(
            result_text(&result),
            "failed to edit comment: API error (403): forbidden"
        );
    }
}
