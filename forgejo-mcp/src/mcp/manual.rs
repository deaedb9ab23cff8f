//! Markdown rendering of registry entries
//!
//! Three levels of detail are available: an overview of every verb tool, a
//! table of the kinds one verb accepts, and the full entry for one
//! `(verb, kind)` pair. The same entry rendering is embedded in enriched
//! validation errors.

use std::fmt::Write as _;
use thiserror::Error;

use super::registry::{ManualEntry, Registry, Verb};

/// Longest description shown in a kind table before truncation
pub const SUMMARY_MAX_CHARS: usize = 60;

/// Documentation lookups that name something the registry does not know
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManualError {
    /// The action is not one of the seven verbs
    #[error("unknown action '{action}'. Valid actions: {}", format_list(.valid))]
    UnknownVerb {
        /// What the caller asked for
        action: String,
        /// Every verb name
        valid: Vec<String>,
    },

    /// The resource is not registered for the verb
    #[error(
        "unknown resource '{kind}' for action '{verb}'. Valid resources: {}",
        format_list(.valid)
    )]
    UnknownResource {
        /// The verb that was asked about
        verb: Verb,
        /// What the caller asked for
        kind: String,
        /// Kinds registered for the verb
        valid: Vec<String>,
    },

    /// The relationship type is not one of the link kinds
    #[error(
        "unknown link type '{kind}' for action '{verb}'. Valid types: {}",
        format_list(.valid)
    )]
    UnknownLinkType {
        /// The verb that was asked about
        verb: Verb,
        /// What the caller asked for
        kind: String,
        /// The relationship kinds
        valid: Vec<String>,
    },
}

/// Render a list the way valid-value hints show it: `[a b c]`
pub fn format_list<S: AsRef<str>>(items: &[S]) -> String {
    let joined: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
    format!("[{}]", joined.join(" "))
}

/// Render a complete entry: heading, description, parameter table, example
pub fn format_manual_entry(entry: &ManualEntry) -> String {
    let mut out = format!("## {} {}\n\n{}\n\n", entry.verb, entry.kind, entry.description);
    out.push_str("### Parameters\n\n");
    out.push_str("| Name | Type | Required | Description |\n");
    out.push_str("|------|------|----------|-------------|\n");

    for param in &entry.params {
        let required = if param.required { "yes" } else { "no" };
        let mut description = param.description.clone();
        if !param.allowed_values.is_empty() {
            let _ = write!(description, " (values: {})", format_list(&param.allowed_values));
        }
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} |",
            param.name, param.kind, required, description
        );
    }

    let _ = write!(out, "\n### Example\n\n```\n{}\n```\n", entry.example);
    out
}

/// Prefix `reason` with usage documentation for the pair
///
/// Falls back to a short notice when the pair is not registered; never fails.
pub fn format_validation_error(registry: &Registry, verb: Verb, kind: &str, reason: &str) -> String {
    match registry.lookup(verb, kind) {
        Some(entry) => format!(
            "Error: {}\n\nHere's how to use this operation:\n\n{}",
            reason,
            format_manual_entry(entry)
        ),
        None => format!(
            "Error: {}\n\nNo documentation found for {}:{}",
            reason, verb, kind
        ),
    }
}

/// Shorten a description to at most [`SUMMARY_MAX_CHARS`] characters
pub fn truncate_description(description: &str) -> String {
    if description.chars().count() > SUMMARY_MAX_CHARS {
        let head: String = description.chars().take(SUMMARY_MAX_CHARS - 3).collect();
        format!("{head}...")
    } else {
        description.to_string()
    }
}

/// Level 0: every verb tool with a one-line summary and usage hints
pub fn format_overview() -> String {
    let mut out = String::from("# Gitea MCP Tools\n\n");
    out.push_str("This server provides unified tools for Forgejo/Gitea operations.\n\n");
    out.push_str("## Available Actions\n\n");
    out.push_str("| Action | Description |\n");
    out.push_str("|--------|-------------|\n");
    for verb in Verb::ALL {
        let _ = writeln!(out, "| `{}` | {} |", verb.tool_name(), verb.summary());
    }
    out.push('\n');
    out.push_str("## How to Use\n\n");
    out.push_str(
        "Each tool takes a `resource` parameter (or `type` for link/unlink) to specify what you're operating on.\n\n",
    );
    out.push_str("**Examples:**\n");
    out.push_str("```\n");
    out.push_str(
        "create_gitea(resource=\"issue\", owner=\"org\", repo=\"project\", title=\"Bug\", body=\"...\")\n",
    );
    out.push_str("list_gitea(resource=\"label\", owner=\"org\", repo=\"project\")\n");
    out.push_str(
        "link_gitea(type=\"issue_label\", owner=\"org\", repo=\"project\", index=42, labels=[1,2])\n",
    );
    out.push_str("```\n\n");
    out.push_str("Call `gitea_manual(action=\"create\")` to see resources for a specific action.\n");
    out.push_str(
        "Call `gitea_manual(action=\"create\", resource=\"issue\")` for full documentation.\n",
    );
    out
}

/// Level 1: every kind a verb accepts with a truncated description
pub fn format_kinds_for_verb(registry: &Registry, verb: Verb) -> String {
    let (title, column, placeholder) = if verb.is_relationship() {
        ("Link Types", "| Type | Description |\n|------|-------------|\n", "type=\"<type>\"")
    } else {
        (
            "Resources",
            "| Resource | Description |\n|----------|-------------|\n",
            "resource=\"<resource>\"",
        )
    };

    let mut out = format!("# {} {}\n\n", verb.tool_name(), title);
    out.push_str(column);
    for kind in registry.valid_kinds(verb) {
        let description = registry
            .lookup(verb, &kind)
            .map(|entry| truncate_description(&entry.description))
            .unwrap_or_default();
        let _ = writeln!(out, "| `{}` | {} |", kind, description);
    }
    let _ = write!(
        out,
        "\nCall `gitea_manual(action=\"{}\", {})` for full documentation.\n",
        verb, placeholder
    );
    out
}

/// Entry point for the documentation tool
///
/// `kind` is the resource for ordinary verbs and the relationship type for
/// link/unlink.
pub fn render_manual(
    registry: &Registry,
    action: Option<&str>,
    kind: Option<&str>,
) -> Result<String, ManualError> {
    let Some(action) = action.filter(|a| !a.is_empty()) else {
        return Ok(format_overview());
    };

    let verb: Verb = action.parse().map_err(|_| ManualError::UnknownVerb {
        action: action.to_string(),
        valid: Verb::ALL.iter().map(|v| v.to_string()).collect(),
    })?;

    let Some(kind) = kind.filter(|k| !k.is_empty()) else {
        return Ok(format_kinds_for_verb(registry, verb));
    };

    match registry.lookup(verb, kind) {
        Some(entry) => Ok(format_manual_entry(entry)),
        None if verb.is_relationship() => Err(ManualError::UnknownLinkType {
            verb,
            kind: kind.to_string(),
            valid: registry.valid_kinds(verb),
        }),
        None => Err(ManualError::UnknownResource {
            verb,
            kind: kind.to_string(),
            valid: registry.valid_kinds(verb),
        }),
    }
}
