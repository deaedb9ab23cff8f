//! Built-in manual entries for every operation the server implements

use super::{ManualEntry, ParamKind, ParamSpec, Verb};

use ParamKind::{Array, Boolean, Integer, String as Str};

fn req(name: &str, kind: ParamKind, description: &str) -> ParamSpec {
    ParamSpec::required(name, kind, description)
}

fn opt(name: &str, kind: ParamKind, description: &str) -> ParamSpec {
    ParamSpec::optional(name, kind, description)
}

/// `owner` and `repo` followed by operation-specific parameters
fn repo_params(extra: Vec<ParamSpec>) -> Vec<ParamSpec> {
    let mut params = vec![
        req("owner", Str, "Repository owner (username or organization)"),
        req("repo", Str, "Repository name"),
    ];
    params.extend(extra);
    params
}

fn entry(
    verb: Verb,
    kind: &str,
    description: &str,
    params: Vec<ParamSpec>,
    example: &str,
) -> ManualEntry {
    ManualEntry::new(verb, kind, description, params, example)
}

/// Every built-in entry, grouped by verb
pub fn builtin_entries() -> Vec<ManualEntry> {
    let mut entries = Vec::with_capacity(45);
    entries.extend(create_entries());
    entries.extend(get_entries());
    entries.extend(list_entries());
    entries.extend(edit_entries());
    entries.extend(delete_entries());
    entries.extend(link_entries());
    entries.extend(unlink_entries());
    entries
}

fn create_entries() -> Vec<ManualEntry> {
    use Verb::Create;
    vec![
        entry(
            Create,
            "issue",
            "Create a new issue in a repository.",
            repo_params(vec![
                req("title", Str, "Issue title"),
                req("body", Str, "Issue body (markdown)"),
                opt("assignees", Array, "Usernames to assign"),
                opt("milestone", Integer, "Milestone ID"),
                opt("labels", Array, "Label IDs to attach"),
                opt("due_date", Str, "Due date (RFC3339 format)"),
            ]),
            r#"create_gitea(resource="issue", owner="org", repo="project", title="Bug report", body="Description...")"#,
        ),
        entry(
            Create,
            "issue_comment",
            "Add a comment to an issue.",
            repo_params(vec![
                req("index", Integer, "Issue number"),
                req("body", Str, "Comment body (markdown)"),
            ]),
            r#"create_gitea(resource="issue_comment", owner="org", repo="project", index=42, body="Thanks!")"#,
        ),
        entry(
            Create,
            "label",
            "Create a new label in a repository.",
            repo_params(vec![
                req("name", Str, "Label name"),
                req("color", Str, "Hex color (without #, e.g., 'ff0000')"),
                opt("description", Str, "Label description"),
            ]),
            r#"create_gitea(resource="label", owner="org", repo="project", name="bug", color="ff0000")"#,
        ),
        entry(
            Create,
            "milestone",
            "Create a new milestone in a repository.",
            repo_params(vec![
                req("title", Str, "Milestone title"),
                opt("description", Str, "Milestone description"),
                opt("due_date", Str, "Due date (RFC3339 format)"),
                opt("state", Str, "State: 'open' or 'closed'").with_values(&["open", "closed"]),
            ]),
            r#"create_gitea(resource="milestone", owner="org", repo="project", title="v1.0")"#,
        ),
        entry(
            Create,
            "release",
            "Create a new release in a repository.",
            repo_params(vec![
                req("tag_name", Str, "Git tag name"),
                req("name", Str, "Release title"),
                opt("body", Str, "Release notes (markdown)"),
                opt("target_commitish", Str, "Target branch or commit SHA"),
                opt("draft", Boolean, "Is draft release"),
                opt("prerelease", Boolean, "Is prerelease"),
            ]),
            r#"create_gitea(resource="release", owner="org", repo="project", tag_name="v1.0.0", name="Version 1.0")"#,
        ),
        entry(
            Create,
            "wiki_page",
            "Create a new wiki page in a repository.",
            repo_params(vec![
                req("title", Str, "Page title"),
                req("content", Str, "Page content (markdown)"),
                opt("message", Str, "Commit message"),
            ]),
            r##"create_gitea(resource="wiki_page", owner="org", repo="project", title="Home", content="# Welcome")"##,
        ),
        entry(
            Create,
            "pull_request",
            "Create a new pull request.",
            repo_params(vec![
                req("title", Str, "PR title"),
                opt("body", Str, "PR description (markdown)"),
                req("head", Str, "Source branch (or 'user:branch' for forks)"),
                req("base", Str, "Target branch"),
                opt("assignees", Array, "Usernames to assign"),
                opt("milestone", Integer, "Milestone ID"),
                opt("labels", Array, "Label IDs"),
            ]),
            r#"create_gitea(resource="pull_request", owner="org", repo="project", title="Feature X", head="feature-x", base="main")"#,
        ),
    ]
}

fn get_entries() -> Vec<ManualEntry> {
    use Verb::Get;
    vec![
        entry(
            Get,
            "issue",
            "Get details of a specific issue.",
            repo_params(vec![req("index", Integer, "Issue number")]),
            r#"get_gitea(resource="issue", owner="org", repo="project", index=42)"#,
        ),
        entry(
            Get,
            "wiki_page",
            "Get content of a specific wiki page.",
            repo_params(vec![req("page_name", Str, "Wiki page name")]),
            r#"get_gitea(resource="wiki_page", owner="org", repo="project", page_name="Home")"#,
        ),
        entry(
            Get,
            "pull_request",
            "Get details of a specific pull request.",
            repo_params(vec![req("index", Integer, "PR number")]),
            r#"get_gitea(resource="pull_request", owner="org", repo="project", index=42)"#,
        ),
        entry(
            Get,
            "repository",
            "Get details of a specific repository.",
            repo_params(Vec::new()),
            r#"get_gitea(resource="repository", owner="org", repo="project")"#,
        ),
    ]
}

fn list_entries() -> Vec<ManualEntry> {
    use Verb::List;
    let page = || opt("page", Integer, "Page number");
    let limit = || opt("limit", Integer, "Results per page");
    let open_closed_all = || opt("state", Str, "Filter by state").with_values(&["open", "closed", "all"]);

    vec![
        entry(
            List,
            "issue",
            "List issues in a repository with optional filtering.",
            repo_params(vec![
                open_closed_all(),
                opt("labels", Str, "Comma-separated label names"),
                opt("milestones", Str, "Comma-separated milestone names/IDs"),
                opt("assignees", Str, "Comma-separated usernames"),
                opt("q", Str, "Search query"),
                opt("sort", Str, "Sort field").with_values(&["created", "updated", "comments"]),
                opt("order", Str, "Sort order").with_values(&["asc", "desc"]),
                page(),
                opt("limit", Integer, "Results per page (max 50)"),
                opt("since", Str, "Only issues updated after (RFC3339)"),
                opt("before", Str, "Only issues updated before (RFC3339)"),
            ]),
            r#"list_gitea(resource="issue", owner="org", repo="project", state="open", labels="bug")"#,
        ),
        entry(
            List,
            "issue_comment",
            "List comments on an issue.",
            repo_params(vec![
                req("index", Integer, "Issue number"),
                opt("since", Str, "Only comments after (RFC3339)"),
                opt("before", Str, "Only comments before (RFC3339)"),
            ]),
            r#"list_gitea(resource="issue_comment", owner="org", repo="project", index=42)"#,
        ),
        entry(
            List,
            "issue_attachment",
            "List attachments on an issue.",
            repo_params(vec![req("index", Integer, "Issue number")]),
            r#"list_gitea(resource="issue_attachment", owner="org", repo="project", index=42)"#,
        ),
        entry(
            List,
            "label",
            "List all labels in a repository.",
            repo_params(Vec::new()),
            r#"list_gitea(resource="label", owner="org", repo="project")"#,
        ),
        entry(
            List,
            "milestone",
            "List milestones in a repository.",
            repo_params(vec![
                open_closed_all(),
                opt("name", Str, "Filter by name"),
                page(),
                limit(),
            ]),
            r#"list_gitea(resource="milestone", owner="org", repo="project", state="open")"#,
        ),
        entry(
            List,
            "release",
            "List releases in a repository.",
            repo_params(vec![page(), limit()]),
            r#"list_gitea(resource="release", owner="org", repo="project")"#,
        ),
        entry(
            List,
            "release_attachment",
            "List attachments on a release.",
            repo_params(vec![req("id", Integer, "Release ID")]),
            r#"list_gitea(resource="release_attachment", owner="org", repo="project", id=1)"#,
        ),
        entry(
            List,
            "wiki_page",
            "List all wiki pages in a repository.",
            repo_params(Vec::new()),
            r#"list_gitea(resource="wiki_page", owner="org", repo="project")"#,
        ),
        entry(
            List,
            "pull_request",
            "List pull requests in a repository.",
            repo_params(vec![
                open_closed_all(),
                opt("sort", Str, "Sort field").with_values(&[
                    "oldest",
                    "recentupdate",
                    "leastupdate",
                    "mostcomment",
                    "leastcomment",
                    "priority",
                ]),
                opt("milestone", Integer, "Milestone ID"),
                opt("labels", Array, "Label IDs"),
                page(),
                limit(),
            ]),
            r#"list_gitea(resource="pull_request", owner="org", repo="project", state="open")"#,
        ),
        entry(
            List,
            "repository",
            "List repositories. Use 'scope' to choose: 'my' (authenticated user), 'org' (organization), or 'search' (search all).",
            vec![
                req("scope", Str, "Listing scope").with_values(&["my", "org", "search"]),
                opt("org", Str, "Organization name (required for scope='org')"),
                opt("q", Str, "Search query (for scope='search')"),
                opt("topic", Boolean, "Search in topics (for scope='search')"),
                opt("include_desc", Boolean, "Search in description (for scope='search')"),
                opt("template", Boolean, "Only templates (for scope='search')"),
                opt("archived", Boolean, "Only archived (for scope='search')"),
                opt("private", Boolean, "Only private (for scope='search')"),
                page(),
                limit(),
            ],
            r#"list_gitea(resource="repository", scope="my")"#,
        ),
        entry(
            List,
            "action_task",
            "List Forgejo Actions tasks (CI/CD runs).",
            repo_params(vec![page(), limit()]),
            r#"list_gitea(resource="action_task", owner="org", repo="project")"#,
        ),
        entry(
            List,
            "issue_dependency",
            "List issues that block this issue (dependencies).",
            repo_params(vec![req("index", Integer, "Issue number")]),
            r#"list_gitea(resource="issue_dependency", owner="org", repo="project", index=42)"#,
        ),
        entry(
            List,
            "issue_blocking",
            "List issues that are blocked by this issue.",
            repo_params(vec![req("index", Integer, "Issue number")]),
            r#"list_gitea(resource="issue_blocking", owner="org", repo="project", index=42)"#,
        ),
    ]
}

fn edit_entries() -> Vec<ManualEntry> {
    use Verb::Edit;
    vec![
        entry(
            Edit,
            "issue",
            "Edit an existing issue.",
            repo_params(vec![
                req("index", Integer, "Issue number"),
                opt("title", Str, "New title"),
                opt("body", Str, "New body"),
                opt("state", Str, "New state").with_values(&["open", "closed"]),
                opt("assignees", Array, "New assignees"),
                opt("milestone", Integer, "New milestone ID"),
                opt("due_date", Str, "New due date (RFC3339)"),
            ]),
            r#"edit_gitea(resource="issue", owner="org", repo="project", index=42, state="closed")"#,
        ),
        entry(
            Edit,
            "issue_comment",
            "Edit an issue comment.",
            repo_params(vec![
                req("id", Integer, "Comment ID"),
                req("body", Str, "New comment body"),
            ]),
            r#"edit_gitea(resource="issue_comment", owner="org", repo="project", id=123, body="Updated comment")"#,
        ),
        entry(
            Edit,
            "issue_attachment",
            "Edit an issue attachment's name.",
            repo_params(vec![
                req("index", Integer, "Issue number"),
                req("attachment_id", Integer, "Attachment ID"),
                req("name", Str, "New filename"),
            ]),
            r#"edit_gitea(resource="issue_attachment", owner="org", repo="project", index=42, attachment_id=1, name="new_name.png")"#,
        ),
        entry(
            Edit,
            "label",
            "Edit a label.",
            repo_params(vec![
                req("id", Integer, "Label ID"),
                opt("name", Str, "New name"),
                opt("color", Str, "New color (hex without #)"),
                opt("description", Str, "New description"),
            ]),
            r#"edit_gitea(resource="label", owner="org", repo="project", id=1, color="00ff00")"#,
        ),
        entry(
            Edit,
            "milestone",
            "Edit a milestone.",
            repo_params(vec![
                req("id", Integer, "Milestone ID"),
                opt("title", Str, "New title"),
                opt("description", Str, "New description"),
                opt("due_date", Str, "New due date (RFC3339)"),
                opt("state", Str, "New state").with_values(&["open", "closed"]),
            ]),
            r#"edit_gitea(resource="milestone", owner="org", repo="project", id=1, state="closed")"#,
        ),
        entry(
            Edit,
            "release",
            "Edit a release.",
            repo_params(vec![
                req("id", Integer, "Release ID"),
                opt("tag_name", Str, "New tag name"),
                opt("name", Str, "New title"),
                opt("body", Str, "New release notes"),
                opt("target_commitish", Str, "New target"),
                opt("draft", Boolean, "Is draft"),
                opt("prerelease", Boolean, "Is prerelease"),
            ]),
            r#"edit_gitea(resource="release", owner="org", repo="project", id=1, prerelease=false)"#,
        ),
        entry(
            Edit,
            "release_attachment",
            "Edit a release attachment's name.",
            repo_params(vec![
                req("id", Integer, "Release ID"),
                req("attachment_id", Integer, "Attachment ID"),
                req("name", Str, "New filename"),
            ]),
            r#"edit_gitea(resource="release_attachment", owner="org", repo="project", id=1, attachment_id=2, name="app-v1.0.zip")"#,
        ),
        entry(
            Edit,
            "wiki_page",
            "Edit a wiki page.",
            repo_params(vec![
                req("page_name", Str, "Current page name"),
                opt("title", Str, "New title"),
                req("content", Str, "New content"),
                opt("message", Str, "Commit message"),
            ]),
            r##"edit_gitea(resource="wiki_page", owner="org", repo="project", page_name="Home", content="# Updated")"##,
        ),
    ]
}

fn delete_entries() -> Vec<ManualEntry> {
    use Verb::Delete;
    vec![
        entry(
            Delete,
            "issue_comment",
            "Delete an issue comment.",
            repo_params(vec![req("id", Integer, "Comment ID")]),
            r#"delete_gitea(resource="issue_comment", owner="org", repo="project", id=123)"#,
        ),
        entry(
            Delete,
            "issue_attachment",
            "Delete an issue attachment.",
            repo_params(vec![
                req("index", Integer, "Issue number"),
                req("attachment_id", Integer, "Attachment ID"),
            ]),
            r#"delete_gitea(resource="issue_attachment", owner="org", repo="project", index=42, attachment_id=1)"#,
        ),
        entry(
            Delete,
            "label",
            "Delete a label from a repository.",
            repo_params(vec![req("id", Integer, "Label ID")]),
            r#"delete_gitea(resource="label", owner="org", repo="project", id=1)"#,
        ),
        entry(
            Delete,
            "milestone",
            "Delete a milestone.",
            repo_params(vec![req("id", Integer, "Milestone ID")]),
            r#"delete_gitea(resource="milestone", owner="org", repo="project", id=1)"#,
        ),
        entry(
            Delete,
            "release",
            "Delete a release.",
            repo_params(vec![req("id", Integer, "Release ID")]),
            r#"delete_gitea(resource="release", owner="org", repo="project", id=1)"#,
        ),
        entry(
            Delete,
            "release_attachment",
            "Delete a release attachment.",
            repo_params(vec![
                req("id", Integer, "Release ID"),
                req("attachment_id", Integer, "Attachment ID"),
            ]),
            r#"delete_gitea(resource="release_attachment", owner="org", repo="project", id=1, attachment_id=2)"#,
        ),
        entry(
            Delete,
            "wiki_page",
            "Delete a wiki page.",
            repo_params(vec![req("page_name", Str, "Page name to delete")]),
            r#"delete_gitea(resource="wiki_page", owner="org", repo="project", page_name="OldPage")"#,
        ),
    ]
}

fn link_entries() -> Vec<ManualEntry> {
    use Verb::Link;
    vec![
        entry(
            Link,
            "issue_label",
            "Add labels to an issue.",
            repo_params(vec![
                req("index", Integer, "Issue number"),
                req("labels", Array, "Label IDs to add"),
            ]),
            r#"link_gitea(type="issue_label", owner="org", repo="project", index=42, labels=[1, 2])"#,
        ),
        entry(
            Link,
            "issue_dependency",
            "Add a dependency: issue cannot be closed until dependency_index is closed.",
            repo_params(vec![
                req("index", Integer, "Dependent issue number"),
                req("dependency_index", Integer, "Issue that blocks this one"),
            ]),
            r#"link_gitea(type="issue_dependency", owner="org", repo="project", index=42, dependency_index=10)"#,
        ),
        entry(
            Link,
            "issue_blocking",
            "Add a blocking relationship: blocked_index cannot be closed until index is closed.",
            repo_params(vec![
                req("index", Integer, "Blocking issue number"),
                req("blocked_index", Integer, "Issue that will be blocked"),
            ]),
            r#"link_gitea(type="issue_blocking", owner="org", repo="project", index=42, blocked_index=50)"#,
        ),
    ]
}

fn unlink_entries() -> Vec<ManualEntry> {
    use Verb::Unlink;
    vec![
        entry(
            Unlink,
            "issue_label",
            "Remove a label from an issue.",
            repo_params(vec![
                req("index", Integer, "Issue number"),
                req("label_id", Integer, "Label ID to remove"),
            ]),
            r#"unlink_gitea(type="issue_label", owner="org", repo="project", index=42, label_id=1)"#,
        ),
        entry(
            Unlink,
            "issue_dependency",
            "Remove a dependency relationship.",
            repo_params(vec![
                req("index", Integer, "Dependent issue number"),
                req("dependency_index", Integer, "Dependency to remove"),
            ]),
            r#"unlink_gitea(type="issue_dependency", owner="org", repo="project", index=42, dependency_index=10)"#,
        ),
        entry(
            Unlink,
            "issue_blocking",
            "Remove a blocking relationship.",
            repo_params(vec![
                req("index", Integer, "Blocking issue number"),
                req("blocked_index", Integer, "Issue to unblock"),
            ]),
            r#"unlink_gitea(type="issue_blocking", owner="org", repo="project", index=42, blocked_index=50)"#,
        ),
    ]
}
