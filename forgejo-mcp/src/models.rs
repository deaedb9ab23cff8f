//! Forgejo API payloads
//!
//! Only the fields the server renders are modelled. Every struct tolerates
//! missing fields and explicit `null`s, since Forgejo omits or nulls many of
//! them depending on version and permissions.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize `null` as the type's default
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A user or organization account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    /// Account id
    pub id: i64,
    /// Login name
    #[serde(deserialize_with = "null_default")]
    pub login: String,
    /// Display name
    #[serde(deserialize_with = "null_default")]
    pub full_name: String,
}

/// A repository label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Label {
    /// Label id
    pub id: i64,
    /// Label name
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    /// Hex color without `#`
    #[serde(deserialize_with = "null_default")]
    pub color: String,
    /// Free-text description
    #[serde(deserialize_with = "null_default")]
    pub description: String,
}

/// A repository milestone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Milestone {
    /// Milestone id
    pub id: i64,
    /// Title
    #[serde(deserialize_with = "null_default")]
    pub title: String,
    /// Description
    #[serde(deserialize_with = "null_default")]
    pub description: String,
    /// `open` or `closed`
    #[serde(deserialize_with = "null_default")]
    pub state: String,
    /// Open issues assigned to the milestone
    pub open_issues: i64,
    /// Closed issues assigned to the milestone
    pub closed_issues: i64,
    /// Due date
    pub due_on: Option<DateTime<Utc>>,
}

/// An issue, or the issue side of a pull request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Issue {
    /// Global id
    pub id: i64,
    /// Per-repository number
    pub number: i64,
    /// Title
    #[serde(deserialize_with = "null_default")]
    pub title: String,
    /// Markdown body
    #[serde(deserialize_with = "null_default")]
    pub body: String,
    /// `open` or `closed`
    #[serde(deserialize_with = "null_default")]
    pub state: String,
    /// Author
    pub user: Option<User>,
    /// Attached labels
    #[serde(deserialize_with = "null_default")]
    pub labels: Vec<Label>,
    /// Assigned users
    #[serde(deserialize_with = "null_default")]
    pub assignees: Vec<User>,
    /// Milestone
    pub milestone: Option<Milestone>,
    /// Number of comments
    pub comments: i64,
    /// Owning repository, present on cross-repository listings
    pub repository: Option<RepositoryMeta>,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time
    pub updated_at: Option<DateTime<Utc>>,
    /// Due date
    pub due_date: Option<DateTime<Utc>>,
    /// Web URL
    #[serde(deserialize_with = "null_default")]
    pub html_url: String,
}

/// Short repository reference embedded in issues
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryMeta {
    /// Repository id
    pub id: i64,
    /// `owner/name`
    #[serde(deserialize_with = "null_default")]
    pub full_name: String,
}

/// An issue comment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    /// Comment id
    pub id: i64,
    /// Markdown body
    #[serde(deserialize_with = "null_default")]
    pub body: String,
    /// Author
    pub user: Option<User>,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time
    pub updated_at: Option<DateTime<Utc>>,
    /// Web URL
    #[serde(deserialize_with = "null_default")]
    pub html_url: String,
}

/// A file attached to an issue or release
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attachment {
    /// Attachment id
    pub id: i64,
    /// File name
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    /// Size in bytes
    pub size: i64,
    /// Number of downloads
    pub download_count: i64,
    /// Direct download URL
    #[serde(deserialize_with = "null_default")]
    pub browser_download_url: String,
    /// Upload time
    pub created_at: Option<DateTime<Utc>>,
}

/// A tagged release
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Release {
    /// Release id
    pub id: i64,
    /// Git tag
    #[serde(deserialize_with = "null_default")]
    pub tag_name: String,
    /// Branch or commit the tag is created from
    #[serde(deserialize_with = "null_default")]
    pub target_commitish: String,
    /// Title
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    /// Release notes
    #[serde(deserialize_with = "null_default")]
    pub body: String,
    /// Not yet published
    pub draft: bool,
    /// Marked as prerelease
    pub prerelease: bool,
    /// Publisher
    pub author: Option<User>,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Publication time
    pub published_at: Option<DateTime<Utc>>,
    /// Uploaded files
    #[serde(deserialize_with = "null_default")]
    pub assets: Vec<Attachment>,
    /// Web URL
    #[serde(deserialize_with = "null_default")]
    pub html_url: String,
}

/// Author information of a wiki commit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitUser {
    /// Name
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    /// Email
    #[serde(deserialize_with = "null_default")]
    pub email: String,
    /// Commit date as sent by the server
    #[serde(deserialize_with = "null_default")]
    pub date: String,
}

/// The most recent commit touching a wiki page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiCommit {
    /// Commit hash
    #[serde(deserialize_with = "null_default")]
    pub sha: String,
    /// Commit message
    #[serde(deserialize_with = "null_default")]
    pub message: String,
    /// Author
    pub author: Option<CommitUser>,
}

/// Wiki page listing entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiPageMeta {
    /// Page title
    #[serde(deserialize_with = "null_default")]
    pub title: String,
    /// Web URL
    #[serde(deserialize_with = "null_default")]
    pub html_url: String,
    /// URL-safe page name
    #[serde(deserialize_with = "null_default")]
    pub sub_url: String,
    /// Last commit
    pub last_commit: Option<WikiCommit>,
}

/// A wiki page with content
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiPage {
    /// Page title
    #[serde(deserialize_with = "null_default")]
    pub title: String,
    /// Base64-encoded markdown
    #[serde(deserialize_with = "null_default")]
    pub content_base64: String,
    /// Number of commits touching the page
    pub commit_count: i64,
    /// Web URL
    #[serde(deserialize_with = "null_default")]
    pub html_url: String,
    /// URL-safe page name
    #[serde(deserialize_with = "null_default")]
    pub sub_url: String,
    /// Last commit
    pub last_commit: Option<WikiCommit>,
}

impl WikiPage {
    /// Decoded page content; invalid base64 or UTF-8 is returned as-is
    pub fn content(&self) -> String {
        STANDARD
            .decode(self.content_base64.trim())
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .unwrap_or_else(|| self.content_base64.clone())
    }
}

/// Head or base of a pull request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrBranch {
    /// `owner:branch` label
    #[serde(deserialize_with = "null_default")]
    pub label: String,
    /// Branch name
    #[serde(rename = "ref", deserialize_with = "null_default")]
    pub branch: String,
    /// Commit hash
    #[serde(deserialize_with = "null_default")]
    pub sha: String,
}

/// A pull request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequest {
    /// Global id
    pub id: i64,
    /// Per-repository number
    pub number: i64,
    /// Title
    #[serde(deserialize_with = "null_default")]
    pub title: String,
    /// Description
    #[serde(deserialize_with = "null_default")]
    pub body: String,
    /// `open` or `closed`
    #[serde(deserialize_with = "null_default")]
    pub state: String,
    /// Author
    pub user: Option<User>,
    /// Attached labels
    #[serde(deserialize_with = "null_default")]
    pub labels: Vec<Label>,
    /// Assigned users
    #[serde(deserialize_with = "null_default")]
    pub assignees: Vec<User>,
    /// Milestone
    pub milestone: Option<Milestone>,
    /// Source branch
    pub head: Option<PrBranch>,
    /// Target branch
    pub base: Option<PrBranch>,
    /// Whether it has been merged
    pub merged: bool,
    /// Whether it can be merged cleanly
    pub mergeable: bool,
    /// Number of comments
    pub comments: i64,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time
    pub updated_at: Option<DateTime<Utc>>,
    /// Web URL
    #[serde(deserialize_with = "null_default")]
    pub html_url: String,
}

/// A repository
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    /// Repository id
    pub id: i64,
    /// Short name
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    /// `owner/name`
    #[serde(deserialize_with = "null_default")]
    pub full_name: String,
    /// Description
    #[serde(deserialize_with = "null_default")]
    pub description: String,
    /// Owning account
    pub owner: Option<User>,
    /// Private visibility
    pub private: bool,
    /// Is a fork
    pub fork: bool,
    /// Is archived
    pub archived: bool,
    /// Is a template
    pub template: bool,
    /// Default branch
    #[serde(deserialize_with = "null_default")]
    pub default_branch: String,
    /// Star count
    pub stars_count: i64,
    /// Fork count
    pub forks_count: i64,
    /// Open issue count
    pub open_issues_count: i64,
    /// Web URL
    #[serde(deserialize_with = "null_default")]
    pub html_url: String,
    /// HTTPS clone URL
    #[serde(deserialize_with = "null_default")]
    pub clone_url: String,
    /// Last update time
    pub updated_at: Option<DateTime<Utc>>,
}

/// Envelope returned by repository search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResults {
    /// Whether the search succeeded
    pub ok: bool,
    /// Matching repositories
    #[serde(deserialize_with = "null_default")]
    pub data: Vec<Repository>,
}

/// One Forgejo Actions run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionTask {
    /// Task id
    pub id: i64,
    /// Job name
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    /// Title shown in the UI
    #[serde(deserialize_with = "null_default")]
    pub display_title: String,
    /// Branch the run is for
    #[serde(deserialize_with = "null_default")]
    pub head_branch: String,
    /// Commit the run is for
    #[serde(deserialize_with = "null_default")]
    pub head_sha: String,
    /// Sequential run number
    pub run_number: i64,
    /// Triggering event
    #[serde(deserialize_with = "null_default")]
    pub event: String,
    /// Status such as `success` or `failure`
    #[serde(deserialize_with = "null_default")]
    pub status: String,
    /// Workflow file
    #[serde(deserialize_with = "null_default")]
    pub workflow_id: String,
    /// Web URL
    #[serde(deserialize_with = "null_default")]
    pub url: String,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Start time
    pub run_started_at: Option<DateTime<Utc>>,
}

/// A page of Actions runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionTaskList {
    /// Total runs across all pages
    pub total_count: i64,
    /// Runs on this page
    #[serde(deserialize_with = "null_default")]
    pub workflow_runs: Vec<ActionTask>,
}

/// Identifies an issue in possibly another repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueMeta {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Issue number
    pub index: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_issue_tolerates_nulls_and_missing_fields() {
        let issue: Issue = serde_json::from_value(json!({
            "number": 7,
            "title": "Crash on start",
            "body": null,
            "labels": null,
            "assignees": null,
            "created_at": "2025-03-01T10:00:00+08:00"
        }))
        .unwrap();

        assert_eq!(issue.number, 7);
        assert_eq!(issue.body, "");
        assert!(issue.labels.is_empty());
        assert!(issue.assignees.is_empty());
        assert!(issue.milestone.is_none());
        assert_eq!(
            issue.created_at.unwrap().to_rfc3339(),
            "2025-03-01T02:00:00+00:00"
        );
    }

    #[test]
    fn test_pull_request_branch_ref() {
        let pr: PullRequest = serde_json::from_value(json!({
            "number": 3,
            "head": {"ref": "feature-x", "label": "me:feature-x"},
            "base": {"ref": "main"}
        }))
        .unwrap();
        assert_eq!(pr.head.unwrap().branch, "feature-x");
        assert_eq!(pr.base.unwrap().branch, "main");
    }

    #[test]
    fn test_wiki_page_content_decoding() {
        let page = WikiPage {
            content_base64: STANDARD.encode("# Welcome"),
            ..WikiPage::default()
        };
        assert_eq!(page.content(), "# Welcome");

        let broken = WikiPage {
            content_base64: "not base64!".into(),
            ..WikiPage::default()
        };
        assert_eq!(broken.content(), "not base64!");
    }

    #[test]
    fn test_search_results_envelope() {
        let results: SearchResults = serde_json::from_value(json!({
            "ok": true,
            "data": [{"full_name": "org/project"}]
        }))
        .unwrap();
        assert!(results.ok);
        assert_eq!(results.data[0].full_name, "org/project");
    }
}
