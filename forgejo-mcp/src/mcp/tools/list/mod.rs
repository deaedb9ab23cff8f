//! `list_gitea`: filtered listings of repository resources
//!
//! Every listing starts with a `Found {n} ...` heading, or an explanatory
//! sentence when nothing matched. Repository listings are the only ones not
//! scoped to a single repository; they take a `scope` of `my`, `org` or
//! `search` instead of `owner` and `repo`.

use async_trait::async_trait;
use rmcp::model::{CallToolResult, ToolAnnotations};
use rmcp::Error as McpError;
use serde_json::{Map, Value};

use super::found;
use crate::client::options::{
    ListIssuesQuery, ListMilestonesQuery, ListPullRequestsQuery, Page, SearchReposQuery,
    TimeWindow,
};
use crate::client::ForgejoClient;
use crate::mcp::args::ArgBag;
use crate::mcp::dispatch::{upstream, HandlerError, VerbHandler};
use crate::mcp::registry::Verb;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext, ToolRegistry};
use crate::mcp::tools::{execute_verb, verb_tool_schema};
use crate::models::Repository;
use crate::render::{render_list, ToMarkdown};

const STATES: [&str; 3] = ["open", "closed", "all"];

/// Kinds `list_gitea` can enumerate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ListKind {
    Issue,
    IssueComment,
    IssueAttachment,
    Label,
    Milestone,
    Release,
    ReleaseAttachment,
    WikiPage,
    PullRequest,
    Repository,
    ActionTask,
    IssueDependency,
    IssueBlocking,
}

impl ListKind {
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
            "pull_request" => Self::PullRequest,
            "repository" => Self::Repository,
            "action_task" => Self::ActionTask,
            "issue_dependency" => Self::IssueDependency,
            "issue_blocking" => Self::IssueBlocking,
            _ => return None,
        })
    }
}

/// Where repository listings look
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RepoScope {
    Mine,
    Org,
    Search,
}

fn page(args: ArgBag<'_>) -> Page {
    Page::new(args.opt_positive_int("page"), args.opt_positive_int("limit"))
}

/// `Found` heading, or `empty` when there is nothing to show
fn listing<T: ToMarkdown>(items: &[T], things: &str, empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        found(items.len(), things, &render_list(items))
    }
}

/// Routes `list_gitea` calls to the client
pub struct ListHandler<'a> {
    client: &'a ForgejoClient,
}

impl<'a> ListHandler<'a> {
    /// Handler over a client
    pub fn new(client: &'a ForgejoClient) -> Self {
        Self { client }
    }

    async fn issues(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let query = ListIssuesQuery {
            state: args.opt_enum("state", &STATES)?.map(str::to_string),
            labels: args.opt_csv("labels").unwrap_or_default(),
            milestones: args.opt_csv("milestones").unwrap_or_default(),
            assigned_by: args.opt_str("assignees").map(str::to_string),
            keyword: args.opt_str("q").map(str::to_string),
            sort: args
                .opt_enum("sort", &["created", "updated", "comments"])?
                .map(str::to_string),
            order: args.opt_enum("order", &["asc", "desc"])?.map(str::to_string),
            since: args.opt_timestamp("since")?,
            before: args.opt_timestamp("before")?,
            page: page(args),
        };
        let issues = self
            .client
            .list_issues(owner, repo, &query)
            .await
            .map_err(upstream("list issues"))?;
        Ok(found(issues.len(), "issues", &render_list(&issues)))
    }

    async fn issue_comments(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let index = args.required_id("index")?;
        let window = TimeWindow {
            since: args.opt_timestamp("since")?,
            before: args.opt_timestamp("before")?,
        };
        let comments = self
            .client
            .list_issue_comments(owner, repo, index, window)
            .await
            .map_err(upstream("list comments"))?;
        if comments.is_empty() {
            return Ok("No comments found for this issue.".to_string());
        }
        let body: String = comments
            .iter()
            .map(|comment| format!("{}\n\n---\n\n", comment.to_markdown()))
            .collect();
        Ok(found(comments.len(), "comments", &body))
    }

    async fn issue_attachments(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let index = args.required_id("index")?;
        let attachments = self
            .client
            .list_issue_attachments(owner, repo, index)
            .await
            .map_err(upstream("list attachments"))?;
        Ok(listing(
            &attachments,
            "attachments",
            "No attachments found for this issue.",
        ))
    }

    async fn labels(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let labels = self
            .client
            .list_labels(owner, repo)
            .await
            .map_err(upstream("list labels"))?;
        Ok(listing(&labels, "labels", "No labels found in this repository."))
    }

    async fn milestones(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let query = ListMilestonesQuery {
            state: args.opt_enum("state", &STATES)?.map(str::to_string),
            name: args.opt_str("name").map(str::to_string),
            page: page(args),
        };
        let milestones = self
            .client
            .list_milestones(owner, repo, &query)
            .await
            .map_err(upstream("list milestones"))?;
        Ok(listing(
            &milestones,
            "milestones",
            "No milestones found in this repository.",
        ))
    }

    async fn releases(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let releases = self
            .client
            .list_releases(owner, repo, page(args))
            .await
            .map_err(upstream("list releases"))?;
        Ok(listing(
            &releases,
            "releases",
            "No releases found in this repository.",
        ))
    }

    async fn release_attachments(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let id = args.required_id("id")?;
        let attachments = self
            .client
            .list_release_attachments(owner, repo, id)
            .await
            .map_err(upstream("list release attachments"))?;
        Ok(listing(
            &attachments,
            "attachments",
            "No attachments found for this release.",
        ))
    }

    async fn wiki_pages(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let pages = self
            .client
            .list_wiki_pages(owner, repo)
            .await
            .map_err(upstream("list wiki pages"))?;
        Ok(listing(
            &pages,
            "wiki pages",
            "No wiki pages found in this repository.",
        ))
    }

    async fn pull_requests(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let query = ListPullRequestsQuery {
            state: args.opt_enum("state", &STATES)?.map(str::to_string),
            sort: args
                .opt_enum(
                    "sort",
                    &[
                        "oldest",
                        "recentupdate",
                        "leastupdate",
                        "mostcomment",
                        "leastcomment",
                        "priority",
                    ],
                )?
                .map(str::to_string),
            milestone: args.opt_positive_int("milestone"),
            labels: args.opt_id_array("labels").unwrap_or_default(),
            page: page(args),
        };
        let prs = self
            .client
            .list_pull_requests(owner, repo, &query)
            .await
            .map_err(upstream("list pull requests"))?;
        Ok(listing(
            &prs,
            "pull requests",
            "No pull requests found in this repository.",
        ))
    }

    async fn repositories(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let scope = match args.opt_str("scope") {
            None => return Err("scope is required ('my', 'org', or 'search')".to_string().into()),
            Some("my") => RepoScope::Mine,
            Some("org") => RepoScope::Org,
            Some("search") => RepoScope::Search,
            Some(_) => return Err("scope must be 'my', 'org', or 'search'".to_string().into()),
        };

        match scope {
            RepoScope::Mine => {
                let repos = self
                    .client
                    .list_my_repositories(page(args))
                    .await
                    .map_err(upstream("list my repositories"))?;
                Ok(listing(
                    &repos,
                    "repositories",
                    "No repositories found for the authenticated user.",
                ))
            }
            RepoScope::Org => {
                let org = args
                    .opt_str("org")
                    .ok_or_else(|| "org is required for scope='org'".to_string())?;
                let repos = self
                    .client
                    .list_org_repositories(org, page(args))
                    .await
                    .map_err(upstream("list organization repositories"))?;
                Ok(org_listing(org, &repos))
            }
            RepoScope::Search => {
                let query = SearchReposQuery {
                    keyword: args.opt_str("q").map(str::to_string),
                    topic: args.opt_bool("topic"),
                    include_desc: args.opt_bool("include_desc"),
                    template: args.opt_bool("template"),
                    archived: args.opt_bool("archived"),
                    private: args.opt_bool("private"),
                    page: page(args),
                };
                let repos = self
                    .client
                    .search_repositories(&query)
                    .await
                    .map_err(upstream("search repositories"))?;
                Ok(listing(
                    &repos,
                    "repositories",
                    "No repositories found matching the search criteria.",
                ))
            }
        }
    }

    async fn action_tasks(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let tasks = self
            .client
            .list_action_tasks(owner, repo, page(args))
            .await
            .map_err(upstream("list action tasks"))?;
        if tasks.total_count == 0 || tasks.workflow_runs.is_empty() {
            return Ok("No action tasks found in this repository.".to_string());
        }
        Ok(found(
            tasks.total_count as usize,
            "action tasks",
            &tasks.to_markdown(),
        ))
    }

    async fn dependencies(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let index = args.required_id("index")?;
        let issues = self
            .client
            .list_issue_dependencies(owner, repo, index)
            .await
            .map_err(upstream("list dependencies"))?;
        Ok(relationship_listing(
            &format!("Issues that block #{index}"),
            &issues,
        ))
    }

    async fn blocking(&self, args: ArgBag<'_>) -> Result<String, HandlerError> {
        let (owner, repo) = args.owner_repo()?;
        let index = args.required_id("index")?;
        let issues = self
            .client
            .list_issue_blocks(owner, repo, index)
            .await
            .map_err(upstream("list blocking issues"))?;
        Ok(relationship_listing(
            &format!("Issues blocked by #{index}"),
            &issues,
        ))
    }
}

fn org_listing(org: &str, repos: &[Repository]) -> String {
    if repos.is_empty() {
        format!("No repositories found for organization '{org}'.")
    } else {
        found(
            repos.len(),
            &format!("repositories for '{org}'"),
            &render_list(repos),
        )
    }
}

fn relationship_listing<T: ToMarkdown>(heading: &str, issues: &[T]) -> String {
    let body = if issues.is_empty() {
        "None".to_string()
    } else {
        render_list(issues)
    };
    format!("## {heading}\n\n{body}")
}

#[async_trait]
impl VerbHandler for ListHandler<'_> {
    type Kind = ListKind;

    fn verb(&self) -> Verb {
        Verb::List
    }

    fn resolve(&self, kind: &str) -> Option<ListKind> {
        ListKind::parse(kind)
    }

    async fn handle(&self, kind: ListKind, args: ArgBag<'_>) -> Result<String, HandlerError> {
        match kind {
            ListKind::Issue => self.issues(args).await,
            ListKind::IssueComment => self.issue_comments(args).await,
            ListKind::IssueAttachment => self.issue_attachments(args).await,
            ListKind::Label => self.labels(args).await,
            ListKind::Milestone => self.milestones(args).await,
            ListKind::Release => self.releases(args).await,
            ListKind::ReleaseAttachment => self.release_attachments(args).await,
            ListKind::WikiPage => self.wiki_pages(args).await,
            ListKind::PullRequest => self.pull_requests(args).await,
            ListKind::Repository => self.repositories(args).await,
            ListKind::ActionTask => self.action_tasks(args).await,
            ListKind::IssueDependency => self.dependencies(args).await,
            ListKind::IssueBlocking => self.blocking(args).await,
        }
    }
}

/// Tool for listing resources
#[derive(Default)]
pub struct ListGiteaTool;

impl ListGiteaTool {
    /// Creates a new instance of the ListGiteaTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for ListGiteaTool {
    fn name(&self) -> &'static str {
        "list_gitea"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> Value {
        verb_tool_schema(crate::mcp::registry::registry(), Verb::List)
    }

    fn annotations(&self) -> Option<ToolAnnotations> {
        Some(BaseToolImpl::annotations(
            "List Gitea Resources",
            true,
            false,
            true,
        ))
    }

    async fn execute(
        &self,
        arguments: Map<String, Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let handler = ListHandler::new(&context.client);
        Ok(execute_verb(context.registry, &handler, &arguments).await)
    }
}

/// Register the list tool
pub fn register_list_tools(registry: &mut ToolRegistry) {
    registry.register(ListGiteaTool::new());
}
