//! Request bodies and query filters for [`super::ForgejoClient`]
//!
//! Field names mirror the Forgejo API.

#![allow(missing_docs)]

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// Pagination shared by list endpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number
    pub page: Option<i64>,
    /// Page size
    pub limit: Option<i64>,
}

impl Page {
    /// Pagination from optional values
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self { page, limit }
    }
}

/// `POST /repos/{owner}/{repo}/issues`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateIssueOption {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<FixedOffset>>,
}

/// `PATCH /repos/{owner}/{repo}/issues/{index}`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EditIssueOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<FixedOffset>>,
}

/// Filters for `GET /repos/{owner}/{repo}/issues`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListIssuesQuery {
    pub state: Option<String>,
    pub labels: Vec<String>,
    pub milestones: Vec<String>,
    pub assigned_by: Option<String>,
    pub keyword: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub since: Option<DateTime<FixedOffset>>,
    pub before: Option<DateTime<FixedOffset>>,
    pub page: Page,
}

/// Time window for comment listings
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeWindow {
    pub since: Option<DateTime<FixedOffset>>,
    pub before: Option<DateTime<FixedOffset>>,
}

/// `POST /repos/{owner}/{repo}/labels`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateLabelOption {
    pub name: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `PATCH /repos/{owner}/{repo}/labels/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EditLabelOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `POST /repos/{owner}/{repo}/milestones`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateMilestoneOption {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// `PATCH /repos/{owner}/{repo}/milestones/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EditMilestoneOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Filters for `GET /repos/{owner}/{repo}/milestones`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListMilestonesQuery {
    pub state: Option<String>,
    pub name: Option<String>,
    pub page: Page,
}

/// `POST /repos/{owner}/{repo}/releases`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateReleaseOption {
    pub tag_name: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_commitish: Option<String>,
    pub draft: bool,
    pub prerelease: bool,
}

/// `PATCH /repos/{owner}/{repo}/releases/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EditReleaseOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_commitish: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prerelease: Option<bool>,
}

/// Body for wiki page creation and edits; content must already be base64
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WikiPageOption {
    pub title: String,
    pub content_base64: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `POST /repos/{owner}/{repo}/pulls`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreatePullRequestOption {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub head: String,
    pub base: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<i64>,
}

/// Filters for `GET /repos/{owner}/{repo}/pulls`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListPullRequestsQuery {
    pub state: Option<String>,
    pub sort: Option<String>,
    pub milestone: Option<i64>,
    pub labels: Vec<i64>,
    pub page: Page,
}

/// Filters for `GET /repos/search`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchReposQuery {
    pub keyword: Option<String>,
    pub topic: Option<bool>,
    pub include_desc: Option<bool>,
    pub template: Option<bool>,
    pub archived: Option<bool>,
    pub private: Option<bool>,
    pub page: Page,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_issue_option_skips_empty_fields() {
        let option = CreateIssueOption {
            title: "Bug".into(),
            body: "Details".into(),
            ..CreateIssueOption::default()
        };
        assert_eq!(
            serde_json::to_value(option).unwrap(),
            json!({"title": "Bug", "body": "Details"})
        );
    }

    #[test]
    fn test_due_date_serializes_as_rfc3339() {
        let due = DateTime::parse_from_rfc3339("2025-06-30T00:00:00Z").unwrap();
        let option = EditMilestoneOption {
            due_on: Some(due),
            ..EditMilestoneOption::default()
        };
        let value = serde_json::to_value(option).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        let sent = object["due_on"].as_str().unwrap();
        assert_eq!(DateTime::parse_from_rfc3339(sent).unwrap(), due);
    }
}
