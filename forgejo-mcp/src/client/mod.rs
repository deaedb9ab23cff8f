//! Typed Forgejo/Gitea API client
//!
//! [`ForgejoClient`] turns each operation into an [`ApiRequest`] and decodes
//! the response. The network sits behind the [`Transport`] trait so handlers
//! can be exercised against [`MockTransport`].

mod http;
mod mock;
pub mod options;
mod transport;

pub use http::HttpTransport;
pub use mock::MockTransport;
pub use transport::{ApiPath, ApiRequest, Method, Transport};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::models::{
    ActionTaskList, Attachment, Comment, Issue, IssueMeta, Label, Milestone, PullRequest, Release,
    Repository, SearchResults, WikiPage, WikiPageMeta,
};
use options::{
    CreateIssueOption, CreateLabelOption, CreateMilestoneOption, CreatePullRequestOption,
    CreateReleaseOption, EditIssueOption, EditLabelOption, EditMilestoneOption, EditReleaseOption,
    ListIssuesQuery, ListMilestonesQuery, ListPullRequestsQuery, Page, SearchReposQuery,
    TimeWindow, WikiPageOption,
};

/// Decode a response body; an empty body yields the default value
fn decode<T: DeserializeOwned + Default>(value: Value) -> Result<T> {
    if value.is_null() {
        Ok(T::default())
    } else {
        Ok(serde_json::from_value(value)?)
    }
}

fn to_body<T: Serialize>(option: &T) -> Result<Value> {
    Ok(serde_json::to_value(option)?)
}

fn paged(request: ApiRequest, page: Page) -> ApiRequest {
    request
        .query_opt("page", page.page)
        .query_opt("limit", page.limit)
}

fn join(values: &[String]) -> Option<String> {
    (!values.is_empty()).then(|| values.join(","))
}

/// Client for one Forgejo/Gitea instance
#[derive(Clone)]
pub struct ForgejoClient {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ForgejoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForgejoClient").finish_non_exhaustive()
    }
}

impl ForgejoClient {
    /// A client over any transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// A client talking HTTP to the configured server
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    async fn send<T: DeserializeOwned + Default>(&self, request: ApiRequest) -> Result<T> {
        decode(self.transport.send(request).await?)
    }

    async fn send_empty(&self, request: ApiRequest) -> Result<()> {
        self.transport.send(request).await.map(|_| ())
    }

    // Issues

    /// Create an issue
    pub async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        option: &CreateIssueOption,
    ) -> Result<Issue> {
        let path = ApiPath::repo(owner, repo).push("issues");
        self.send(ApiRequest::post(path, to_body(option)?)).await
    }

    /// Fetch one issue
    pub async fn get_issue(&self, owner: &str, repo: &str, index: i64) -> Result<Issue> {
        let path = ApiPath::repo(owner, repo).push("issues").push(index);
        self.send(ApiRequest::get(path)).await
    }

    /// Update an issue
    pub async fn edit_issue(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        option: &EditIssueOption,
    ) -> Result<Issue> {
        let path = ApiPath::repo(owner, repo).push("issues").push(index);
        self.send(ApiRequest::patch(path, to_body(option)?)).await
    }

    /// List issues, excluding pull requests
    pub async fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        query: &ListIssuesQuery,
    ) -> Result<Vec<Issue>> {
        let request = ApiRequest::get(ApiPath::repo(owner, repo).push("issues"))
            .query("type", "issues")
            .query_opt("state", query.state.as_deref())
            .query_opt("labels", join(&query.labels))
            .query_opt("milestones", join(&query.milestones))
            .query_opt("assigned_by", query.assigned_by.as_deref())
            .query_opt("q", query.keyword.as_deref())
            .query_opt("sort", query.sort.as_deref())
            .query_opt("order", query.order.as_deref())
            .query_opt("since", query.since.map(|t| t.to_rfc3339()))
            .query_opt("before", query.before.map(|t| t.to_rfc3339()));
        self.send(paged(request, query.page)).await
    }

    // Issue comments

    /// Comment on an issue
    pub async fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        body: &str,
    ) -> Result<Comment> {
        let path = ApiPath::repo(owner, repo)
            .push("issues")
            .push(index)
            .push("comments");
        self.send(ApiRequest::post(path, serde_json::json!({ "body": body })))
            .await
    }

    /// List comments on an issue
    pub async fn list_issue_comments(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        window: TimeWindow,
    ) -> Result<Vec<Comment>> {
        let path = ApiPath::repo(owner, repo)
            .push("issues")
            .push(index)
            .push("comments");
        let request = ApiRequest::get(path)
            .query_opt("since", window.since.map(|t| t.to_rfc3339()))
            .query_opt("before", window.before.map(|t| t.to_rfc3339()));
        self.send(request).await
    }

    /// Replace a comment's body
    pub async fn edit_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        id: i64,
        body: &str,
    ) -> Result<Comment> {
        let path = ApiPath::repo(owner, repo)
            .push("issues")
            .push("comments")
            .push(id);
        self.send(ApiRequest::patch(path, serde_json::json!({ "body": body })))
            .await
    }

    /// Remove a comment
    pub async fn delete_issue_comment(&self, owner: &str, repo: &str, id: i64) -> Result<()> {
        let path = ApiPath::repo(owner, repo)
            .push("issues")
            .push("comments")
            .push(id);
        self.send_empty(ApiRequest::delete(path)).await
    }

    // Issue attachments

    fn issue_assets(owner: &str, repo: &str, index: i64) -> ApiPath {
        ApiPath::repo(owner, repo)
            .push("issues")
            .push(index)
            .push("assets")
    }

    /// List files attached to an issue
    pub async fn list_issue_attachments(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
    ) -> Result<Vec<Attachment>> {
        self.send(ApiRequest::get(Self::issue_assets(owner, repo, index)))
            .await
    }

    /// Rename an issue attachment
    pub async fn edit_issue_attachment(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        attachment_id: i64,
        name: &str,
    ) -> Result<Attachment> {
        let path = Self::issue_assets(owner, repo, index).push(attachment_id);
        self.send(ApiRequest::patch(path, serde_json::json!({ "name": name })))
            .await
    }

    /// Remove an issue attachment
    pub async fn delete_issue_attachment(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        attachment_id: i64,
    ) -> Result<()> {
        let path = Self::issue_assets(owner, repo, index).push(attachment_id);
        self.send_empty(ApiRequest::delete(path)).await
    }

    // Labels

    /// Create a repository label
    pub async fn create_label(
        &self,
        owner: &str,
        repo: &str,
        option: &CreateLabelOption,
    ) -> Result<Label> {
        let path = ApiPath::repo(owner, repo).push("labels");
        self.send(ApiRequest::post(path, to_body(option)?)).await
    }

    /// List repository labels
    pub async fn list_labels(&self, owner: &str, repo: &str) -> Result<Vec<Label>> {
        self.send(ApiRequest::get(ApiPath::repo(owner, repo).push("labels")))
            .await
    }

    /// Update a label
    pub async fn edit_label(
        &self,
        owner: &str,
        repo: &str,
        id: i64,
        option: &EditLabelOption,
    ) -> Result<Label> {
        let path = ApiPath::repo(owner, repo).push("labels").push(id);
        self.send(ApiRequest::patch(path, to_body(option)?)).await
    }

    /// Remove a label
    pub async fn delete_label(&self, owner: &str, repo: &str, id: i64) -> Result<()> {
        let path = ApiPath::repo(owner, repo).push("labels").push(id);
        self.send_empty(ApiRequest::delete(path)).await
    }

    // Milestones

    /// Create a milestone
    pub async fn create_milestone(
        &self,
        owner: &str,
        repo: &str,
        option: &CreateMilestoneOption,
    ) -> Result<Milestone> {
        let path = ApiPath::repo(owner, repo).push("milestones");
        self.send(ApiRequest::post(path, to_body(option)?)).await
    }

    /// List milestones
    pub async fn list_milestones(
        &self,
        owner: &str,
        repo: &str,
        query: &ListMilestonesQuery,
    ) -> Result<Vec<Milestone>> {
        let request = ApiRequest::get(ApiPath::repo(owner, repo).push("milestones"))
            .query_opt("state", query.state.as_deref())
            .query_opt("name", query.name.as_deref());
        self.send(paged(request, query.page)).await
    }

    /// Update a milestone
    pub async fn edit_milestone(
        &self,
        owner: &str,
        repo: &str,
        id: i64,
        option: &EditMilestoneOption,
    ) -> Result<Milestone> {
        let path = ApiPath::repo(owner, repo).push("milestones").push(id);
        self.send(ApiRequest::patch(path, to_body(option)?)).await
    }

    /// Remove a milestone
    pub async fn delete_milestone(&self, owner: &str, repo: &str, id: i64) -> Result<()> {
        let path = ApiPath::repo(owner, repo).push("milestones").push(id);
        self.send_empty(ApiRequest::delete(path)).await
    }

    // Releases

    /// Create a release
    pub async fn create_release(
        &self,
        owner: &str,
        repo: &str,
        option: &CreateReleaseOption,
    ) -> Result<Release> {
        let path = ApiPath::repo(owner, repo).push("releases");
        self.send(ApiRequest::post(path, to_body(option)?)).await
    }

    /// List releases
    pub async fn list_releases(&self, owner: &str, repo: &str, page: Page) -> Result<Vec<Release>> {
        let request = ApiRequest::get(ApiPath::repo(owner, repo).push("releases"));
        self.send(paged(request, page)).await
    }

    /// Update a release
    pub async fn edit_release(
        &self,
        owner: &str,
        repo: &str,
        id: i64,
        option: &EditReleaseOption,
    ) -> Result<Release> {
        let path = ApiPath::repo(owner, repo).push("releases").push(id);
        self.send(ApiRequest::patch(path, to_body(option)?)).await
    }

    /// Remove a release
    pub async fn delete_release(&self, owner: &str, repo: &str, id: i64) -> Result<()> {
        let path = ApiPath::repo(owner, repo).push("releases").push(id);
        self.send_empty(ApiRequest::delete(path)).await
    }

    // Release attachments

    fn release_assets(owner: &str, repo: &str, id: i64) -> ApiPath {
        ApiPath::repo(owner, repo)
            .push("releases")
            .push(id)
            .push("assets")
    }

    /// List files attached to a release
    pub async fn list_release_attachments(
        &self,
        owner: &str,
        repo: &str,
        id: i64,
    ) -> Result<Vec<Attachment>> {
        self.send(ApiRequest::get(Self::release_assets(owner, repo, id)))
            .await
    }

    /// Rename a release attachment
    pub async fn edit_release_attachment(
        &self,
        owner: &str,
        repo: &str,
        id: i64,
        attachment_id: i64,
        name: &str,
    ) -> Result<Attachment> {
        let path = Self::release_assets(owner, repo, id).push(attachment_id);
        self.send(ApiRequest::patch(path, serde_json::json!({ "name": name })))
            .await
    }

    /// Remove a release attachment
    pub async fn delete_release_attachment(
        &self,
        owner: &str,
        repo: &str,
        id: i64,
        attachment_id: i64,
    ) -> Result<()> {
        let path = Self::release_assets(owner, repo, id).push(attachment_id);
        self.send_empty(ApiRequest::delete(path)).await
    }

    // Wiki

    /// Create a wiki page
    pub async fn create_wiki_page(
        &self,
        owner: &str,
        repo: &str,
        option: &WikiPageOption,
    ) -> Result<WikiPage> {
        let path = ApiPath::repo(owner, repo).push("wiki").push("new");
        self.send(ApiRequest::post(path, to_body(option)?)).await
    }

    /// Fetch a wiki page with content
    pub async fn get_wiki_page(&self, owner: &str, repo: &str, page_name: &str) -> Result<WikiPage> {
        let path = ApiPath::repo(owner, repo)
            .push("wiki")
            .push("page")
            .push(page_name);
        self.send(ApiRequest::get(path)).await
    }

    /// Replace a wiki page
    pub async fn edit_wiki_page(
        &self,
        owner: &str,
        repo: &str,
        page_name: &str,
        option: &WikiPageOption,
    ) -> Result<WikiPage> {
        let path = ApiPath::repo(owner, repo)
            .push("wiki")
            .push("page")
            .push(page_name);
        self.send(ApiRequest::patch(path, to_body(option)?)).await
    }

    /// Remove a wiki page
    pub async fn delete_wiki_page(&self, owner: &str, repo: &str, page_name: &str) -> Result<()> {
        let path = ApiPath::repo(owner, repo)
            .push("wiki")
            .push("page")
            .push(page_name);
        self.send_empty(ApiRequest::delete(path)).await
    }

    /// List wiki pages
    pub async fn list_wiki_pages(&self, owner: &str, repo: &str) -> Result<Vec<WikiPageMeta>> {
        let path = ApiPath::repo(owner, repo).push("wiki").push("pages");
        self.send(ApiRequest::get(path)).await
    }

    // Pull requests

    /// Open a pull request
    pub async fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        option: &CreatePullRequestOption,
    ) -> Result<PullRequest> {
        let path = ApiPath::repo(owner, repo).push("pulls");
        self.send(ApiRequest::post(path, to_body(option)?)).await
    }

    /// Fetch one pull request
    pub async fn get_pull_request(&self, owner: &str, repo: &str, index: i64) -> Result<PullRequest> {
        let path = ApiPath::repo(owner, repo).push("pulls").push(index);
        self.send(ApiRequest::get(path)).await
    }

    /// List pull requests
    pub async fn list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        query: &ListPullRequestsQuery,
    ) -> Result<Vec<PullRequest>> {
        let mut request = ApiRequest::get(ApiPath::repo(owner, repo).push("pulls"))
            .query_opt("state", query.state.as_deref())
            .query_opt("sort", query.sort.as_deref())
            .query_opt("milestone", query.milestone);
        for label in &query.labels {
            request = request.query("labels", label);
        }
        self.send(paged(request, query.page)).await
    }

    // Repositories

    /// Fetch one repository
    pub async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository> {
        self.send(ApiRequest::get(ApiPath::repo(owner, repo))).await
    }

    /// Repositories of the authenticated user
    pub async fn list_my_repositories(&self, page: Page) -> Result<Vec<Repository>> {
        let request = ApiRequest::get(ApiPath::root("user").push("repos"));
        self.send(paged(request, page)).await
    }

    /// Repositories of an organization
    pub async fn list_org_repositories(&self, org: &str, page: Page) -> Result<Vec<Repository>> {
        let request = ApiRequest::get(ApiPath::root("orgs").push(org).push("repos"));
        self.send(paged(request, page)).await
    }

    /// Search all visible repositories
    pub async fn search_repositories(&self, query: &SearchReposQuery) -> Result<Vec<Repository>> {
        let request = ApiRequest::get(ApiPath::root("repos").push("search"))
            .query_opt("q", query.keyword.as_deref())
            .query_opt("topic", query.topic)
            .query_opt("includeDesc", query.include_desc)
            .query_opt("template", query.template)
            .query_opt("archived", query.archived)
            .query_opt("is_private", query.private);
        let results: SearchResults = self.send(paged(request, query.page)).await?;
        Ok(results.data)
    }

    // Actions

    /// Forgejo Actions runs of a repository
    pub async fn list_action_tasks(
        &self,
        owner: &str,
        repo: &str,
        page: Page,
    ) -> Result<ActionTaskList> {
        let path = ApiPath::repo(owner, repo).push("actions").push("tasks");
        self.send(paged(ApiRequest::get(path), page)).await
    }

    // Issue relationships

    fn issue_relation(owner: &str, repo: &str, index: i64, relation: &str) -> ApiPath {
        ApiPath::repo(owner, repo)
            .push("issues")
            .push(index)
            .push(relation)
    }

    fn issue_meta(owner: &str, repo: &str, index: i64) -> Result<Value> {
        to_body(&IssueMeta {
            owner: owner.to_string(),
            repo: repo.to_string(),
            index,
        })
    }

    /// Issues that must close before `index` can
    pub async fn list_issue_dependencies(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
    ) -> Result<Vec<Issue>> {
        let path = Self::issue_relation(owner, repo, index, "dependencies");
        self.send(ApiRequest::get(path)).await
    }

    /// Make `index` depend on `dependency` in the same repository
    pub async fn add_issue_dependency(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        dependency: i64,
    ) -> Result<()> {
        let path = Self::issue_relation(owner, repo, index, "dependencies");
        let body = Self::issue_meta(owner, repo, dependency)?;
        self.send_empty(ApiRequest::post(path, body)).await
    }

    /// Drop the dependency of `index` on `dependency`
    pub async fn remove_issue_dependency(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        dependency: i64,
    ) -> Result<()> {
        let path = Self::issue_relation(owner, repo, index, "dependencies");
        let body = Self::issue_meta(owner, repo, dependency)?;
        self.send_empty(ApiRequest::delete(path).with_body(body))
            .await
    }

    /// Issues that cannot close before `index` does
    pub async fn list_issue_blocks(&self, owner: &str, repo: &str, index: i64) -> Result<Vec<Issue>> {
        let path = Self::issue_relation(owner, repo, index, "blocks");
        self.send(ApiRequest::get(path)).await
    }

    /// Make `index` block `blocked`
    pub async fn add_issue_blocking(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        blocked: i64,
    ) -> Result<()> {
        let path = Self::issue_relation(owner, repo, index, "blocks");
        let body = Self::issue_meta(owner, repo, blocked)?;
        self.send_empty(ApiRequest::post(path, body)).await
    }

    /// Stop `index` from blocking `blocked`
    pub async fn remove_issue_blocking(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        blocked: i64,
    ) -> Result<()> {
        let path = Self::issue_relation(owner, repo, index, "blocks");
        let body = Self::issue_meta(owner, repo, blocked)?;
        self.send_empty(ApiRequest::delete(path).with_body(body))
            .await
    }

    // Issue labels

    /// Attach labels to an issue; returns the issue's labels afterwards
    pub async fn add_issue_labels(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        labels: &[i64],
    ) -> Result<Vec<Label>> {
        let path = Self::issue_relation(owner, repo, index, "labels");
        self.send(ApiRequest::post(path, serde_json::json!({ "labels": labels })))
            .await
    }

    /// Detach one label from an issue
    pub async fn remove_issue_label(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        label_id: i64,
    ) -> Result<()> {
        let path = Self::issue_relation(owner, repo, index, "labels").push(label_id);
        self.send_empty(ApiRequest::delete(path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForgeMcpError;
    use serde_json::json;

    fn client() -> (Arc<MockTransport>, ForgejoClient) {
        let mock = Arc::new(MockTransport::new());
        (mock.clone(), ForgejoClient::new(mock))
    }

    #[tokio::test]
    async fn test_get_issue_decodes_response() {
        let (mock, client) = client();
        mock.set_response(
            Method::Get,
            "repos/org/project/issues/42",
            json!({"number": 42, "title": "Crash"}),
        );

        let issue = client.get_issue("org", "project", 42).await.unwrap();
        assert_eq!(issue.number, 42);
        assert_eq!(issue.title, "Crash");
    }

    #[tokio::test]
    async fn test_null_body_decodes_to_default() {
        let (_mock, client) = client();
        let labels = client.list_labels("org", "project").await.unwrap();
        assert!(labels.is_empty());
    }

    #[tokio::test]
    async fn test_list_issues_query() {
        let (mock, client) = client();
        let query = ListIssuesQuery {
            state: Some("open".into()),
            labels: vec!["bug".into(), "ui".into()],
            keyword: Some("crash".into()),
            page: Page::new(Some(2), None),
            ..ListIssuesQuery::default()
        };
        client.list_issues("org", "project", &query).await.unwrap();

        let request = mock.last_request().unwrap();
        assert_eq!(request.route(), "GET repos/org/project/issues");
        assert_eq!(request.query_value("type"), Some("issues"));
        assert_eq!(request.query_value("state"), Some("open"));
        assert_eq!(request.query_value("labels"), Some("bug,ui"));
        assert_eq!(request.query_value("q"), Some("crash"));
        assert_eq!(request.query_value("page"), Some("2"));
        assert_eq!(request.query_value("limit"), None);
        assert_eq!(request.query_value("milestones"), None);
    }

    #[tokio::test]
    async fn test_dependency_body_is_issue_meta() {
        let (mock, client) = client();
        client
            .add_issue_dependency("org", "project", 42, 10)
            .await
            .unwrap();

        let request = mock.last_request().unwrap();
        assert_eq!(request.route(), "POST repos/org/project/issues/42/dependencies");
        assert_eq!(
            request.body,
            Some(json!({"owner": "org", "repo": "project", "index": 10}))
        );
    }

    #[tokio::test]
    async fn test_search_unwraps_envelope() {
        let (mock, client) = client();
        mock.set_response(
            Method::Get,
            "repos/search",
            json!({"ok": true, "data": [{"full_name": "org/a"}, {"full_name": "org/b"}]}),
        );
        let query = SearchReposQuery {
            keyword: Some("mcp".into()),
            include_desc: Some(true),
            ..SearchReposQuery::default()
        };
        let repos = client.search_repositories(&query).await.unwrap();
        assert_eq!(repos.len(), 2);

        let request = mock.last_request().unwrap();
        assert_eq!(request.query_value("includeDesc"), Some("true"));
        assert_eq!(request.query_value("topic"), None);
    }

    #[tokio::test]
    async fn test_transport_errors_propagate() {
        let (mock, client) = client();
        mock.fail_with(404, "not found");
        let err = client.get_repository("org", "missing").await.unwrap_err();
        assert!(matches!(err, ForgeMcpError::Api { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_malformed_response_is_json_error() {
        let (mock, client) = client();
        mock.set_default_response(json!("unexpected"));
        let err = client.get_issue("org", "project", 1).await.unwrap_err();
        assert!(matches!(err, ForgeMcpError::Json(_)));
    }
}
