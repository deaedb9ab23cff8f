//! Discriminator validation and routing of verb tool calls
//!
//! A call is checked in a fixed order: the discriminator must be present, the
//! `(verb, kind)` pair must be registered, and only then is the per-verb kind
//! enum resolved and a handler invoked. Each verb tool owns a [`VerbHandler`]
//! that maps discriminator strings onto its closed kind enum.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use super::args::ArgBag;
use super::manual::{format_list, format_validation_error};
use super::registry::{Registry, Verb};
use crate::error::ForgeMcpError;

/// Why a handler could not complete
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The arguments are missing or malformed
    #[error("{0}")]
    Validation(String),

    /// The Forgejo server rejected or failed the request
    #[error("{0}")]
    Upstream(String),
}

impl From<String> for HandlerError {
    fn from(reason: String) -> Self {
        Self::Validation(reason)
    }
}

/// Wrap a client error with the operation that failed
///
/// ```
/// use forgejo_mcp::error::ForgeMcpError;
/// use forgejo_mcp::mcp::dispatch::{upstream, HandlerError};
///
/// let err = upstream("create issue")(ForgeMcpError::api(422, "title is empty"));
/// assert_eq!(err, HandlerError::Upstream("failed to create issue: API error (422): title is empty".into()));
/// ```
pub fn upstream(operation: &'static str) -> impl FnOnce(ForgeMcpError) -> HandlerError {
    move |err| HandlerError::Upstream(format!("failed to {operation}: {err}"))
}

/// A rejected verb tool call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// No discriminator was given
    #[error("{discriminator} is required. Valid {discriminator}s: {}. Use gitea_manual(action=\"{verb}\") for details.", format_list(.valid))]
    MissingDiscriminator {
        /// The verb that was called
        verb: Verb,
        /// `resource` or `type`
        discriminator: &'static str,
        /// Accepted discriminator values
        valid: Vec<String>,
    },

    /// The discriminator names nothing registered for the verb
    #[error("unknown {discriminator} '{kind}'. Valid {discriminator}s: {}. Use gitea_manual(action=\"{verb}\") for details.", format_list(.valid))]
    UnknownResource {
        /// The verb that was called
        verb: Verb,
        /// `resource` or `type`
        discriminator: &'static str,
        /// What the caller sent
        kind: String,
        /// Accepted discriminator values
        valid: Vec<String>,
    },

    /// The pair is documented but no handler serves it; carries the enriched message
    #[error("{0}")]
    NotImplemented(String),

    /// The handler rejected the arguments; carries the enriched message
    #[error("{0}")]
    HandlerValidation(String),

    /// The upstream call failed
    #[error("{0}")]
    HandlerUpstream(String),
}

/// Routes one verb's calls to per-kind handlers
#[async_trait]
pub trait VerbHandler: Send + Sync {
    /// Closed set of kinds this verb can serve
    type Kind: Send;

    /// The verb this handler serves
    fn verb(&self) -> Verb;

    /// Map a registered discriminator onto a kind; `None` means unwired
    fn resolve(&self, kind: &str) -> Option<Self::Kind>;

    /// Run the operation and render a text payload
    async fn handle(&self, kind: Self::Kind, args: ArgBag<'_>) -> Result<String, HandlerError>;
}

/// Validate the discriminator, then route to the handler
pub async fn dispatch<H>(
    registry: &Registry,
    handler: &H,
    arguments: &Map<String, Value>,
) -> Result<String, DispatchError>
where
    H: VerbHandler + ?Sized,
{
    let verb = handler.verb();
    let discriminator = verb.discriminator();

    let kind = match arguments.get(discriminator).and_then(Value::as_str) {
        Some(kind) if !kind.is_empty() => kind,
        _ => {
            return Err(DispatchError::MissingDiscriminator {
                verb,
                discriminator,
                valid: registry.valid_kinds(verb),
            })
        }
    };

    if registry.lookup(verb, kind).is_none() {
        return Err(DispatchError::UnknownResource {
            verb,
            discriminator,
            kind: kind.to_string(),
            valid: registry.valid_kinds(verb),
        });
    }

    let Some(resolved) = handler.resolve(kind) else {
        return Err(DispatchError::NotImplemented(format_validation_error(
            registry,
            verb,
            kind,
            "not implemented",
        )));
    };

    tracing::debug!("Dispatching {}:{}", verb, kind);
    match handler.handle(resolved, ArgBag::new(arguments)).await {
        Ok(payload) => Ok(payload),
        Err(HandlerError::Validation(reason)) => Err(DispatchError::HandlerValidation(
            format_validation_error(registry, verb, kind, &reason),
        )),
        Err(HandlerError::Upstream(reason)) => Err(DispatchError::HandlerUpstream(reason)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::registry::{registry, ManualEntry, ParamKind, ParamSpec};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum FakeKind {
        Wired,
    }

    /// Counts handler invocations; only `wired_kind` resolves
    struct CountingHandler {
        verb: Verb,
        wired_kind: &'static str,
        calls: AtomicUsize,
        outcome: Result<String, HandlerError>,
    }

    impl CountingHandler {
        fn new(verb: Verb, wired_kind: &'static str) -> Self {
            Self {
                verb,
                wired_kind,
                calls: AtomicUsize::new(0),
                outcome: Ok("done".to_string()),
            }
        }

        fn failing(mut self, err: HandlerError) -> Self {
            self.outcome = Err(err);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl VerbHandler for CountingHandler {
        type Kind = FakeKind;

        fn verb(&self) -> Verb {
            self.verb
        }

        fn resolve(&self, kind: &str) -> Option<FakeKind> {
            (kind == self.wired_kind).then_some(FakeKind::Wired)
        }

        async fn handle(&self, kind: FakeKind, _args: ArgBag<'_>) -> Result<String, HandlerError> {
            assert_eq!(kind, FakeKind::Wired);
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_empty_discriminator_is_missing() {
        let handler = CountingHandler::new(Verb::Create, "issue");
        let err = dispatch(registry(), &handler, &args(json!({"resource": ""})))
            .await
            .unwrap_err();

        let DispatchError::MissingDiscriminator { ref valid, .. } = err else {
            panic!("expected MissingDiscriminator, got {err:?}");
        };
        for kind in [
            "issue",
            "label",
            "milestone",
            "release",
            "wiki_page",
            "pull_request",
            "issue_comment",
        ] {
            assert!(valid.iter().any(|v| v == kind));
            assert!(err.to_string().contains(kind));
        }
        assert!(err.to_string().starts_with("resource is required. Valid resources: ["));
        assert_eq!(handler.calls(), 0);
    }

    #[tokio::test]
    async fn test_non_string_discriminator_is_missing() {
        let handler = CountingHandler::new(Verb::Get, "issue");
        for bad in [json!({}), json!({"resource": 7}), json!({"resource": null})] {
            let err = dispatch(registry(), &handler, &args(bad)).await.unwrap_err();
            assert!(matches!(err, DispatchError::MissingDiscriminator { .. }));
        }
        assert_eq!(handler.calls(), 0);
    }

    #[tokio::test]
    async fn test_link_verbs_use_type_discriminator() {
        let handler = CountingHandler::new(Verb::Unlink, "issue_label");
        let err = dispatch(registry(), &handler, &args(json!({"resource": "issue_label"})))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "type is required. Valid types: [issue_label issue_dependency issue_blocking]. \
             Use gitea_manual(action=\"unlink\") for details."
        );
    }

    #[tokio::test]
    async fn test_unknown_resource_lists_all_valid_kinds() {
        let handler = CountingHandler::new(Verb::List, "issue");
        let err = dispatch(registry(), &handler, &args(json!({"resource": "bogus"})))
            .await
            .unwrap_err();

        let DispatchError::UnknownResource { ref kind, ref valid, .. } = err else {
            panic!("expected UnknownResource, got {err:?}");
        };
        assert_eq!(kind, "bogus");
        assert_eq!(valid.len(), 13);
        for kind in registry().resource_kinds_for(Verb::List) {
            assert!(err.to_string().contains(kind));
        }
        assert!(err.to_string().starts_with("unknown resource 'bogus'."));
        assert_eq!(handler.calls(), 0);
    }

    #[tokio::test]
    async fn test_kind_registered_under_other_verb_is_unknown() {
        let handler = CountingHandler::new(Verb::Get, "label");
        let err = dispatch(registry(), &handler, &args(json!({"resource": "label"})))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::UnknownResource { .. }));
        assert_eq!(handler.calls(), 0);
    }

    #[tokio::test]
    async fn test_registered_but_unwired_is_not_implemented() {
        let handler = CountingHandler::new(Verb::Get, "issue");
        let err = dispatch(registry(), &handler, &args(json!({"resource": "wiki_page"})))
            .await
            .unwrap_err();

        let DispatchError::NotImplemented(message) = err else {
            panic!("expected NotImplemented");
        };
        assert!(message.starts_with("Error: not implemented\n\nHere's how to use this operation:"));
        assert!(message.contains("## get wiki_page"));
        assert_eq!(handler.calls(), 0);
    }

    #[tokio::test]
    async fn test_success_passes_payload_through() {
        let handler = CountingHandler::new(Verb::Link, "issue_label");
        let payload = dispatch(
            registry(),
            &handler,
            &args(json!({
                "type": "issue_label",
                "owner": "o",
                "repo": "r",
                "index": 5,
                "labels": [1, 2]
            })),
        )
        .await
        .unwrap();
        assert_eq!(payload, "done");
        assert_eq!(handler.calls(), 1);
    }

    #[tokio::test]
    async fn test_validation_failure_is_enriched() {
        let handler = CountingHandler::new(Verb::Create, "issue")
            .failing(HandlerError::Validation("title is required".into()));
        let err = dispatch(registry(), &handler, &args(json!({"resource": "issue"})))
            .await
            .unwrap_err();

        let DispatchError::HandlerValidation(message) = err else {
            panic!("expected HandlerValidation");
        };
        let entry = registry().lookup(Verb::Create, "issue").unwrap();
        assert!(message.contains("title is required"));
        assert!(message.contains(&entry.description));
        assert!(message.contains(&entry.example));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_passed_through() {
        let handler = CountingHandler::new(Verb::Create, "issue")
            .failing(HandlerError::Upstream("failed to create issue: timeout".into()));
        let err = dispatch(registry(), &handler, &args(json!({"resource": "issue"})))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DispatchError::HandlerUpstream("failed to create issue: timeout".into())
        );
    }

    #[tokio::test]
    async fn test_custom_registry_routes_new_kinds() {
        let custom = Registry::from_entries(vec![ManualEntry::new(
            Verb::Get,
            "gadget",
            "Get a gadget.",
            vec![ParamSpec::required("id", ParamKind::Integer, "Gadget ID")],
            "get_gitea(resource=\"gadget\", id=1)",
        )])
        .unwrap();

        let handler = CountingHandler::new(Verb::Get, "gadget");
        let payload = dispatch(&custom, &handler, &args(json!({"resource": "gadget"})))
            .await
            .unwrap();
        assert_eq!(payload, "done");

        let err = dispatch(&custom, &handler, &args(json!({"resource": "issue"})))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown resource 'issue'. Valid resources: [gadget]. Use gitea_manual(action=\"get\") for details."
        );
    }

    #[test]
    fn test_upstream_helper_prefixes_operation() {
        let err = upstream("delete label")(ForgeMcpError::api(404, "not found"));
        assert_eq!(
            err,
            HandlerError::Upstream("failed to delete label: API error (404): not found".into())
        );
    }
}
