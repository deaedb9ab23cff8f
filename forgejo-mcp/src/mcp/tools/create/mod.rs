//! `create_gitea`: create issues, comments, labels, milestones, releases,
//! wiki pages and pull requests

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rmcp::model::{CallToolResult, ToolAnnotations};
use rmcp::Error as McpError;
use serde_json::{Map, Value};

use crate::client::options::{
    CreateIssueOption, CreateLabelOption, CreateMilestoneOption, CreatePullRequestOption,
    CreateReleaseOption, WikiPageOption,
};
use crate::client::ForgejoClient;
use crate::mcp::args::ArgBag;
use crate::mcp::dispatch::{upstream, HandlerError, VerbHandler};
use crate::mcp::registry::Verb;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext, ToolRegistry};
use crate::mcp::tools::{execute_verb, verb_tool_schema};
use crate::render::ToMarkdown;

/// Kinds `create_gitea` can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum CreateKind {
    Issue,
    IssueComment,
    Label,
    Milestone,
    Release,
    WikiPage,
    PullRequest,
}

impl CreateKind {
    fn parse(kind: &str) -> Option<Self> {
        Some(match kind {
            "issue" => Self::Issue,
            "issue_comment" => Self::IssueComment,
            "label" => Self::Label,
            "milestone" => Self::Milestone,
            "release" => Self::Release,
            "wiki_page" => Self::WikiPage,
            "pull_request" => Self::PullRequest,
            _ => return None,
        })
    }
}

/// Routes `create_gitea` calls to the client
pub struct CreateHandler<'a> {
    client: &'a ForgejoClient,
}

impl<'a> CreateHandler<'a> {
    /// Handler over a client
    pub fn new(client: &'a ForgejoClient) -> Self {
        Self { client }
    }

    async fn issue(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let option = CreateIssueOption {
            title: args.required_str("title")?.to_string(),
            body: args.required_str("body")?.to_string(),
            assignees: args.opt_string_array("assignees").unwrap_or_default(),
            milestone: args.opt_positive_int("milestone"),
            labels: args.opt_id_array("labels").unwrap_or_default(),
            due_date: args.opt_timestamp("due_date")?,
        };
        let issue = self
            .client
            .create_issue(owner, repo, &option)
            .await
            .map_err(upstream("create issue"))?;
        Ok(issue.to_markdown())
    }

    async fn issue_comment(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let index = args.required_id("index")?;
        let body = args.required_str("body")?;
        let comment = self
            .client
            .create_issue_comment(owner, repo, index, body)
            .await
            .map_err(upstream("create comment"))?;
        Ok(comment.to_markdown())
    }

    async fn label(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let option = CreateLabelOption {
            name: args.required_str("name")?.to_string(),
            color: args.required_str("color")?.to_string(),
            description: args.opt_str("description").map(str::to_string),
        };
        let label = self
            .client
            .create_label(owner, repo, &option)
            .await
            .map_err(upstream("create label"))?;
        Ok(label.to_markdown())
    }

    async fn milestone(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let option = CreateMilestoneOption {
            title: args.required_str("title")?.to_string(),
            description: args.opt_str("description").map(str::to_string),
            due_on: args.opt_timestamp("due_date")?,
            state: args
                .opt_enum("state", &["open", "closed"])?
                .map(str::to_string),
        };
        let milestone = self
            .client
            .create_milestone(owner, repo, &option)
            .await
            .map_err(upstream("create milestone"))?;
        Ok(milestone.to_markdown())
    }

    async fn release(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let option = CreateReleaseOption {
            tag_name: args.required_str("tag_name")?.to_string(),
            name: args.required_str("name")?.to_string(),
            body: args.opt_str("body").map(str::to_string),
            target_commitish: args.opt_str("target_commitish").map(str::to_string),
            draft: args.opt_bool("draft").unwrap_or(false),
            prerelease: args.opt_bool("prerelease").unwrap_or(false),
        };
        let release = self
            .client
            .create_release(owner, repo, &option)
            .await
            .map_err(upstream("create release"))?;
        Ok(release.to_markdown())
    }

    async fn wiki_page(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let title = args.required_str("title")?;
        let content = args.required_str("content")?;
        let option = WikiPageOption {
            title: title.to_string(),
            content_base64: STANDARD.encode(content),
            message: args.opt_str("message").map(str::to_string),
        };
        let page = self
            .client
            .create_wiki_page(owner, repo, &option)
            .await
            .map_err(upstream("create wiki page"))?;
        Ok(page.to_markdown())
    }

    async fn pull_request(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let option = CreatePullRequestOption {
            title: args.required_str("title")?.to_string(),
            head: args.required_str("head")?.to_string(),
            base: args.required_str("base")?.to_string(),
            body: args.opt_str("body").map(str::to_string),
            assignees: args.opt_string_array("assignees").unwrap_or_default(),
            milestone: args.opt_positive_int("milestone"),
            labels: args.opt_id_array("labels").unwrap_or_default(),
        };
        let pr = self
            .client
            .create_pull_request(owner, repo, &option)
            .await
            .map_err(upstream("create pull request"))?;
        Ok(pr.to_markdown())
    }
}

#[async_trait]
impl VerbHandler for CreateHandler<'_> {
    type Kind = CreateKind;

    fn verb(&self) -> Verb {
        Verb::Create
    }

    fn resolve(&self, kind: &str) -> Option<CreateKind> {
        CreateKind::parse(kind)
    }

    async fn handle(&self, kind: CreateKind, args: ArgBag<'_>) -> Result<String, HandlerError> {
        match kind {
            CreateKind::Issue => self.issue(args).await,
            CreateKind::IssueComment => self.issue_comment(args).await,
            CreateKind::Label => self.label(args).await,
            CreateKind::Milestone => self.milestone(args).await,
            CreateKind::Release => self.release(args).await,
            CreateKind::WikiPage => self.wiki_page(args).await,
            CreateKind::PullRequest => self.pull_request(args).await,
        }
    }
}

/// Tool for creating resources
#[derive(Default)]
pub struct CreateGiteaTool;

impl CreateGiteaTool {
    /// Creates a new instance of the CreateGiteaTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for CreateGiteaTool {
    fn name(&self) -> &'static str {
        "create_gitea"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> Value {
        verb_tool_schema(crate::mcp::registry::registry(), Verb::Create)
    }

    fn annotations(&self) -> Option<ToolAnnotations> {
        Some(BaseToolImpl::annotations(
            "Create Gitea Resource",
            false,
            false,
            false,
        ))
    }

    async fn execute(
        &self,
        arguments: Map<String, Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let handler = CreateHandler::new(&context.client);
        Ok(execute_verb(context.registry, &handler, &arguments).await)
    }
}

/// Register the create tool
pub fn register_create_tools(registry: &mut ToolRegistry) {
    registry.register(CreateGiteaTool::new());
}
