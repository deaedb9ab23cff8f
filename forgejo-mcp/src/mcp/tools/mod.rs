//! MCP tools exposed by the server
//!
//! Seven verb tools share one shape: a discriminator naming the target kind
//! plus a free-form argument bag. Each verb module defines its kind enum and a
//! [`VerbHandler`]; [`execute_verb`] runs the shared dispatch and turns the
//! outcome into a tool result.

pub mod create;
pub mod delete;
pub mod edit;
pub mod get;
pub mod link;
pub mod list;
pub mod manual;
pub mod unlink;

use rmcp::model::CallToolResult;
use serde_json::{json, Map, Value};

use super::dispatch::{dispatch, VerbHandler};
use super::registry::{Registry, Verb};
use super::tool_registry::BaseToolImpl;

/// Input schema for a verb tool, generated from the registry
///
/// `owner` and `repo` are listed as required only when every kind of the
/// verb requires them. Additional properties are always allowed.
pub fn verb_tool_schema(registry: &Registry, verb: Verb) -> Value {
    let discriminator = verb.discriminator();
    let kinds = registry.valid_kinds(verb);
    let noun = if verb.is_relationship() {
        "Relationship type"
    } else {
        "Resource type"
    };

    let mut required = vec![discriminator.to_string()];
    let repo_scoped = registry
        .resource_kinds_for(verb)
        .into_iter()
        .filter_map(|kind| registry.lookup(verb, kind))
        .all(|entry| {
            ["owner", "repo"]
                .iter()
                .all(|name| entry.param(name).is_some_and(|p| p.required))
        });
    if repo_scoped {
        required.push("owner".to_string());
        required.push("repo".to_string());
    }

    let mut properties = Map::new();
    properties.insert(
        discriminator.to_string(),
        json!({
            "type": "string",
            "description": format!("{noun} to {verb}"),
            "enum": kinds,
        }),
    );
    properties.insert(
        "owner".to_string(),
        json!({"type": "string", "description": "Repository owner"}),
    );
    properties.insert(
        "repo".to_string(),
        json!({"type": "string", "description": "Repository name"}),
    );

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": true,
    })
}

/// Dispatch a verb tool call and wrap the outcome
///
/// Rejected calls become error results so the calling agent can read the
/// guidance and retry.
pub async fn execute_verb<H>(
    registry: &Registry,
    handler: &H,
    arguments: &Map<String, Value>,
) -> CallToolResult
where
    H: VerbHandler + ?Sized,
{
    match dispatch(registry, handler, arguments).await {
        Ok(text) => BaseToolImpl::create_success_response(text),
        Err(err) => {
            let message = err.to_string();
            tracing::warn!(
                "{} rejected: {}",
                handler.verb().tool_name(),
                message.lines().next().unwrap_or_default()
            );
            BaseToolImpl::create_error_response(message, None)
        }
    }
}

/// `Found {n} {things}` heading followed by the rendered items
pub(crate) fn found(count: usize, things: &str, body: &str) -> String {
    format!("Found {count} {things}\n\n{body}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::registry::registry;

    #[test]
    fn test_create_schema_requires_owner_and_repo() {
        let schema = verb_tool_schema(registry(), Verb::Create);
        assert_eq!(schema["required"], json!(["resource", "owner", "repo"]));
        assert_eq!(schema["additionalProperties"], json!(true));
        assert_eq!(
            schema["properties"]["resource"]["enum"].as_array().unwrap().len(),
            7
        );
    }

    #[test]
    fn test_list_schema_only_requires_resource() {
        let schema = verb_tool_schema(registry(), Verb::List);
        assert_eq!(schema["required"], json!(["resource"]));
    }

    #[test]
    fn test_link_schema_uses_type() {
        let schema = verb_tool_schema(registry(), Verb::Link);
        assert_eq!(schema["required"], json!(["type", "owner", "repo"]));
        assert_eq!(
            schema["properties"]["type"]["enum"],
            json!(["issue_label", "issue_dependency", "issue_blocking"])
        );
        assert_eq!(
            schema["properties"]["type"]["description"],
            json!("Relationship type to link")
        );
    }
}
