//! `get_gitea`: fetch a single issue, wiki page, pull request or repository

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
use crate::render::ToMarkdown;

/// Kinds `get_gitea` can fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum GetKind {
    Issue,
    WikiPage,
    PullRequest,
    Repository,
}

impl GetKind {
    fn parse(kind: &str) -> Option<Self> {
        Some(match kind {
            "issue" => Self::Issue,
            "wiki_page" => Self::WikiPage,
            "pull_request" => Self::PullRequest,
            "repository" => Self::Repository,
            _ => return None,
        })
    }
}

/// Routes `get_gitea` calls to the client
pub struct GetHandler<'a> {
    client: &'a ForgejoClient,
}

impl<'a> GetHandler<'a> {
    /// Handler over a client
    pub fn new(client: &'a ForgejoClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VerbHandler for GetHandler<'_> {
    type Kind = GetKind;

    fn verb(&self) -> Verb {
        Verb::Get
    }

    fn resolve(&self, kind: &str) -> Option<GetKind> {
        GetKind::parse(kind)
    }

    async fn handle(&self, kind: GetKind, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let rendered = match kind {
            GetKind::Issue => {
                let index = args.required_id("index")?;
                self.client
                    .get_issue(owner, repo, index)
                    .await
                    .map_err(upstream("get issue"))?
                    .to_markdown()
            }
            GetKind::WikiPage => {
                let page_name = args.required_str("page_name")?;
                self.client
                    .get_wiki_page(owner, repo, page_name)
                    .await
                    .map_err(upstream("get wiki page"))?
                    .to_markdown()
            }
            GetKind::PullRequest => {
                let index = args.required_id("index")?;
                self.client
                    .get_pull_request(owner, repo, index)
                    .await
                    .map_err(upstream("get pull request"))?
                    .to_markdown()
            }
            GetKind::Repository => self
                .client
                .get_repository(owner, repo)
                .await
                .map_err(upstream("get repository"))?
                .to_markdown(),
        };
        Ok(rendered)
    }
}

/// Tool for fetching one resource
#[derive(Default)]
pub struct GetGiteaTool;

impl GetGiteaTool {
    /// Creates a new instance of the GetGiteaTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for GetGiteaTool {
    fn name(&self) -> &'static str {
        "get_gitea"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> Value {
        verb_tool_schema(crate::mcp::registry::registry(), Verb::Get)
    }

    fn annotations(&self) -> Option<ToolAnnotations> {
        Some(BaseToolImpl::annotations("Get Gitea Resource", true, false, true))
    }

    async fn execute(
        &self,
        arguments: Map<String, Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let handler = GetHandler::new(&context.client);
        Ok(execute_verb(context.registry, &handler, &arguments).await)
    }
}

/// Register the get tool
pub fn register_get_tools(registry: &mut ToolRegistry) {
    registry.register(GetGiteaTool::new());
}
