//! Markdown rendering of API payloads for the calling agent

use chrono::{DateTime, Utc};
use std::fmt::Write as _;

use crate::models::{
    ActionTask, ActionTaskList, Attachment, Comment, Issue, Label, Milestone, PullRequest,
    Release, Repository, User, WikiPage, WikiPageMeta,
};

/// Renders a value as compact markdown
pub trait ToMarkdown {
    /// Full rendering
    fn to_markdown(&self) -> String;

    /// One-line rendering used inside lists
    fn to_markdown_line(&self) -> String {
        self.to_markdown()
    }
}

/// Render each item on its own line
pub fn render_list<T: ToMarkdown>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item.to_markdown_line()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn date(value: &Option<DateTime<Utc>>) -> Option<String> {
    value.map(|d| d.format("%Y-%m-%d %H:%M UTC").to_string())
}

fn login(user: &Option<User>) -> &str {
    user.as_ref().map(|u| u.login.as_str()).unwrap_or("unknown")
}

fn label_names(labels: &[Label]) -> String {
    labels
        .iter()
        .map(|l| format!("`{}`", l.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn user_logins(users: &[User]) -> String {
    users
        .iter()
        .map(|u| format!("@{}", u.login))
        .collect::<Vec<_>>()
        .join(", ")
}

fn push_field(out: &mut String, name: &str, value: &str) {
    if !value.is_empty() {
        let _ = writeln!(out, "- **{name}**: {value}");
    }
}

fn push_body(out: &mut String, body: &str) {
    if !body.trim().is_empty() {
        out.push('\n');
        out.push_str(body.trim_end());
        out.push('\n');
    }
}

impl ToMarkdown for User {
    fn to_markdown(&self) -> String {
        if self.full_name.is_empty() {
            format!("@{}", self.login)
        } else {
            format!("@{} ({})", self.login, self.full_name)
        }
    }
}

impl ToMarkdown for Label {
    fn to_markdown(&self) -> String {
        let mut line = format!("`{}` (id {}, #{})", self.name, self.id, self.color);
        if !self.description.is_empty() {
            let _ = write!(line, ": {}", self.description);
        }
        line
    }
}

impl ToMarkdown for Milestone {
    fn to_markdown(&self) -> String {
        let mut out = format!("## Milestone {}: {}\n\n", self.id, self.title);
        push_field(&mut out, "State", &self.state);
        let _ = writeln!(
            out,
            "- **Issues**: {} open, {} closed",
            self.open_issues, self.closed_issues
        );
        push_field(&mut out, "Due", &date(&self.due_on).unwrap_or_default());
        push_body(&mut out, &self.description);
        out
    }

    fn to_markdown_line(&self) -> String {
        let mut line = format!(
            "**{}** (id {}, {}) {} open / {} closed",
            self.title, self.id, self.state, self.open_issues, self.closed_issues
        );
        if let Some(due) = date(&self.due_on) {
            let _ = write!(line, ", due {due}");
        }
        line
    }
}

impl ToMarkdown for Issue {
    fn to_markdown(&self) -> String {
        let mut out = format!("# #{} {}\n\n", self.number, self.title);
        push_field(&mut out, "State", &self.state);
        push_field(&mut out, "Author", &format!("@{}", login(&self.user)));
        push_field(&mut out, "Labels", &label_names(&self.labels));
        push_field(&mut out, "Assignees", &user_logins(&self.assignees));
        if let Some(milestone) = &self.milestone {
            push_field(&mut out, "Milestone", &milestone.title);
        }
        push_field(&mut out, "Due", &date(&self.due_date).unwrap_or_default());
        push_field(&mut out, "Created", &date(&self.created_at).unwrap_or_default());
        push_field(&mut out, "Updated", &date(&self.updated_at).unwrap_or_default());
        let _ = writeln!(out, "- **Comments**: {}", self.comments);
        push_field(&mut out, "URL", &self.html_url);
        push_body(&mut out, &self.body);
        out
    }

    fn to_markdown_line(&self) -> String {
        let mut line = format!("#{} {} [{}]", self.number, self.title, self.state);
        if !self.labels.is_empty() {
            let _ = write!(line, " {}", label_names(&self.labels));
        }
        if let Some(repository) = &self.repository {
            let _ = write!(line, " in {}", repository.full_name);
        }
        line
    }
}

impl ToMarkdown for Comment {
    fn to_markdown(&self) -> String {
        let mut out = format!("**Comment {}** by @{}", self.id, login(&self.user));
        if let Some(created) = date(&self.created_at) {
            let _ = write!(out, " on {created}");
        }
        out.push('\n');
        push_body(&mut out, &self.body);
        out
    }
}

impl ToMarkdown for Attachment {
    fn to_markdown(&self) -> String {
        format!(
            "`{}` (id {}, {} bytes, {} downloads) {}",
            self.name, self.id, self.size, self.download_count, self.browser_download_url
        )
        .trim_end()
        .to_string()
    }
}

impl ToMarkdown for Release {
    fn to_markdown(&self) -> String {
        let mut out = format!("# Release {} ({})\n\n", self.name, self.tag_name);
        let _ = writeln!(out, "- **ID**: {}", self.id);
        push_field(&mut out, "Target", &self.target_commitish);
        let _ = writeln!(
            out,
            "- **Draft**: {}, **Prerelease**: {}",
            self.draft, self.prerelease
        );
        push_field(&mut out, "Author", &format!("@{}", login(&self.author)));
        push_field(&mut out, "Published", &date(&self.published_at).unwrap_or_default());
        push_field(&mut out, "URL", &self.html_url);
        if !self.assets.is_empty() {
            let _ = writeln!(out, "- **Assets**:\n{}", render_list(&self.assets));
        }
        push_body(&mut out, &self.body);
        out
    }

    fn to_markdown_line(&self) -> String {
        let mut line = format!("**{}** `{}` (id {})", self.name, self.tag_name, self.id);
        if self.draft {
            line.push_str(" draft");
        }
        if self.prerelease {
            line.push_str(" prerelease");
        }
        if let Some(published) = date(&self.published_at) {
            let _ = write!(line, ", published {published}");
        }
        line
    }
}

impl ToMarkdown for WikiPageMeta {
    fn to_markdown(&self) -> String {
        let mut line = format!("**{}**", self.title);
        if !self.sub_url.is_empty() && self.sub_url != self.title {
            let _ = write!(line, " (`{}`)", self.sub_url);
        }
        if let Some(commit) = &self.last_commit {
            if let Some(author) = &commit.author {
                let _ = write!(line, " last edited by {}", author.name);
            }
        }
        line
    }
}

impl ToMarkdown for WikiPage {
    fn to_markdown(&self) -> String {
        let mut out = format!("# {}\n\n", self.title);
        let _ = writeln!(out, "- **Commits**: {}", self.commit_count);
        if let Some(commit) = &self.last_commit {
            push_field(&mut out, "Last commit", commit.message.trim());
        }
        push_field(&mut out, "URL", &self.html_url);
        push_body(&mut out, &self.content());
        out
    }
}

impl ToMarkdown for PullRequest {
    fn to_markdown(&self) -> String {
        let mut out = format!("# PR #{} {}\n\n", self.number, self.title);
        let state = if self.merged { "merged" } else { self.state.as_str() };
        push_field(&mut out, "State", state);
        push_field(&mut out, "Author", &format!("@{}", login(&self.user)));
        if let (Some(head), Some(base)) = (&self.head, &self.base) {
            let _ = writeln!(out, "- **Branches**: {} -> {}", head.branch, base.branch);
        }
        if !self.merged && self.state == "open" {
            let _ = writeln!(out, "- **Mergeable**: {}", self.mergeable);
        }
        push_field(&mut out, "Labels", &label_names(&self.labels));
        push_field(&mut out, "Assignees", &user_logins(&self.assignees));
        if let Some(milestone) = &self.milestone {
            push_field(&mut out, "Milestone", &milestone.title);
        }
        push_field(&mut out, "Created", &date(&self.created_at).unwrap_or_default());
        push_field(&mut out, "URL", &self.html_url);
        push_body(&mut out, &self.body);
        out
    }

    fn to_markdown_line(&self) -> String {
        let state = if self.merged { "merged" } else { self.state.as_str() };
        let mut line = format!("#{} {} [{}]", self.number, self.title, state);
        if let (Some(head), Some(base)) = (&self.head, &self.base) {
            let _ = write!(line, " {} -> {}", head.branch, base.branch);
        }
        line
    }
}

impl ToMarkdown for Repository {
    fn to_markdown(&self) -> String {
        let mut out = format!("# {}\n\n", self.full_name);
        push_field(&mut out, "Description", &self.description);
        push_field(&mut out, "Default branch", &self.default_branch);
        let _ = writeln!(
            out,
            "- **Visibility**: {}",
            if self.private { "private" } else { "public" }
        );
        let _ = writeln!(
            out,
            "- **Stars**: {}, **Forks**: {}, **Open issues**: {}",
            self.stars_count, self.forks_count, self.open_issues_count
        );
        let flags: Vec<&str> = [
            (self.fork, "fork"),
            (self.archived, "archived"),
            (self.template, "template"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect();
        push_field(&mut out, "Flags", &flags.join(", "));
        push_field(&mut out, "Updated", &date(&self.updated_at).unwrap_or_default());
        push_field(&mut out, "URL", &self.html_url);
        push_field(&mut out, "Clone", &self.clone_url);
        out
    }

    fn to_markdown_line(&self) -> String {
        let mut line = format!("**{}**", self.full_name);
        if self.private {
            line.push_str(" (private)");
        }
        if self.archived {
            line.push_str(" (archived)");
        }
        if !self.description.is_empty() {
            let _ = write!(line, ": {}", self.description);
        }
        line
    }
}

impl ToMarkdown for ActionTask {
    fn to_markdown(&self) -> String {
        let title = if self.display_title.is_empty() {
            &self.name
        } else {
            &self.display_title
        };
        let mut line = format!(
            "Run #{} **{}** [{}] on `{}` ({})",
            self.run_number, title, self.status, self.head_branch, self.event
        );
        if let Some(started) = date(&self.run_started_at) {
            let _ = write!(line, ", started {started}");
        }
        line
    }
}

impl ToMarkdown for ActionTaskList {
    fn to_markdown(&self) -> String {
        render_list(&self.workflow_runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrBranch;
    use chrono::TimeZone;

    fn issue() -> Issue {
        Issue {
            number: 42,
            title: "Crash on start".into(),
            body: "Steps to reproduce".into(),
            state: "open".into(),
            user: Some(User {
                login: "alice".into(),
                ..User::default()
            }),
            labels: vec![Label {
                id: 1,
                name: "bug".into(),
                color: "ff0000".into(),
                ..Label::default()
            }],
            created_at: Some(Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()),
            ..Issue::default()
        }
    }

    #[test]
    fn test_issue_markdown() {
        let out = issue().to_markdown();
        assert!(out.starts_with("# #42 Crash on start\n\n"));
        assert!(out.contains("- **State**: open\n"));
        assert!(out.contains("- **Author**: @alice\n"));
        assert!(out.contains("- **Labels**: `bug`\n"));
        assert!(out.contains("- **Created**: 2025-01-02 03:04 UTC\n"));
        assert!(out.ends_with("\nSteps to reproduce\n"));
        assert!(!out.contains("Assignees"));
    }

    #[test]
    fn test_render_list_uses_lines() {
        let out = render_list(&[issue(), Issue { number: 43, title: "Next".into(), state: "closed".into(), ..Issue::default() }]);
        assert_eq!(out, "- #42 Crash on start [open] `bug`\n- #43 Next [closed]");
    }

    #[test]
    fn test_render_empty_list() {
        assert_eq!(render_list::<Label>(&[]), "");
    }

    #[test]
    fn test_pull_request_merged_state() {
        let pr = PullRequest {
            number: 5,
            title: "Feature".into(),
            state: "closed".into(),
            merged: true,
            head: Some(PrBranch { branch: "feature".into(), ..PrBranch::default() }),
            base: Some(PrBranch { branch: "main".into(), ..PrBranch::default() }),
            ..PullRequest::default()
        };
        assert_eq!(pr.to_markdown_line(), "#5 Feature [merged] feature -> main");
        assert!(pr.to_markdown().contains("- **Branches**: feature -> main\n"));
    }

    #[test]
    fn test_label_line() {
        let label = Label {
            id: 3,
            name: "docs".into(),
            color: "00ff00".into(),
            description: "Documentation".into(),
        };
        assert_eq!(label.to_markdown(), "`docs` (id 3, #00ff00): Documentation");
    }
}
