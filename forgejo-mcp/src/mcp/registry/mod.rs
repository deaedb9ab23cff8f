//! The self-documenting command registry
//!
//! Every operation the server exposes is described by a [`ManualEntry`] keyed by
//! `(verb, kind)`. The same table drives discriminator validation in the
//! dispatcher, the `gitea_manual` documentation tool and the error messages
//! returned when a call is malformed. The table is built once, on first use,
//! and only ever read afterwards.

mod entries;

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use entries::builtin_entries;

/// Relationship kinds accepted by `link` and `unlink`, in display order
pub const LINK_KINDS: [&str; 3] = ["issue_label", "issue_dependency", "issue_blocking"];

/// The operation categories exposed as `<verb>_gitea` tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    /// Create a resource
    Create,
    /// Fetch a single resource
    Get,
    /// List resources
    List,
    /// Modify a resource
    Edit,
    /// Remove a resource
    Delete,
    /// Create a relationship between resources
    Link,
    /// Remove a relationship between resources
    Unlink,
}

impl Verb {
    /// All verbs in display order
    pub const ALL: [Verb; 7] = [
        Verb::Create,
        Verb::Get,
        Verb::List,
        Verb::Edit,
        Verb::Delete,
        Verb::Link,
        Verb::Unlink,
    ];

    /// Lowercase name used in registry keys and documentation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Create => "create",
            Verb::Get => "get",
            Verb::List => "list",
            Verb::Edit => "edit",
            Verb::Delete => "delete",
            Verb::Link => "link",
            Verb::Unlink => "unlink",
        }
    }

    /// Name of the MCP tool serving this verb
    pub fn tool_name(&self) -> &'static str {
        match self {
            Verb::Create => "create_gitea",
            Verb::Get => "get_gitea",
            Verb::List => "list_gitea",
            Verb::Edit => "edit_gitea",
            Verb::Delete => "delete_gitea",
            Verb::Link => "link_gitea",
            Verb::Unlink => "unlink_gitea",
        }
    }

    /// One-line summary shown in the documentation overview
    pub fn summary(&self) -> &'static str {
        match self {
            Verb::Create => "Create resources (issues, labels, milestones, etc.)",
            Verb::Get => "Get a single resource by ID/name",
            Verb::List => "List resources with filtering",
            Verb::Edit => "Edit existing resources",
            Verb::Delete => "Delete resources",
            Verb::Link => "Create relationships (labels to issues, dependencies)",
            Verb::Unlink => "Remove relationships",
        }
    }

    /// Whether this verb addresses relationship kinds rather than resources
    pub fn is_relationship(&self) -> bool {
        matches!(self, Verb::Link | Verb::Unlink)
    }

    /// Argument field naming the target kind: `type` for link/unlink,
    /// `resource` otherwise
    pub fn discriminator(&self) -> &'static str {
        if self.is_relationship() {
            "type"
        } else {
            "resource"
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a [`Verb`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action '{0}'. Valid actions: [create get list edit delete link unlink]")]
pub struct UnknownVerb(pub String);

impl FromStr for Verb {
    type Err = UnknownVerb;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Verb::ALL
            .into_iter()
            .find(|verb| verb.as_str() == s)
            .ok_or_else(|| UnknownVerb(s.to_string()))
    }
}

/// JSON shape of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// A JSON string
    String,
    /// A JSON number holding a whole value
    Integer,
    /// A JSON boolean
    Boolean,
    /// A JSON array
    Array,
}

impl ParamKind {
    /// Name used in documentation tables and JSON schemas
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
            ParamKind::Boolean => "boolean",
            ParamKind::Array => "array",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative description of one operation parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamSpec {
    /// Argument name as sent by the caller
    pub name: String,
    /// Expected JSON shape
    pub kind: ParamKind,
    /// Whether the handler rejects calls without it
    pub required: bool,
    /// Free-text description
    pub description: String,
    /// Enumerated values, in display order; empty when not enumerated
    pub allowed_values: Vec<String>,
}

impl ParamSpec {
    /// A parameter the handler requires
    pub fn required(name: &str, kind: ParamKind, description: &str) -> Self {
        Self::new(name, kind, true, description)
    }

    /// A parameter the handler accepts but does not require
    pub fn optional(name: &str, kind: ParamKind, description: &str) -> Self {
        Self::new(name, kind, false, description)
    }

    fn new(name: &str, kind: ParamKind, required: bool, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required,
            description: description.to_string(),
            allowed_values: Vec::new(),
        }
    }

    /// Restrict the parameter to the given values
    pub fn with_values(mut self, values: &[&str]) -> Self {
        self.allowed_values = values.iter().map(|v| v.to_string()).collect();
        self
    }
}

/// Documentation for one `(verb, kind)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManualEntry {
    /// The operation category
    pub verb: Verb,
    /// Resource kind, or relationship kind for link/unlink
    pub kind: String,
    /// Human-readable description
    pub description: String,
    /// Parameters in display order
    pub params: Vec<ParamSpec>,
    /// One literal usage example
    pub example: String,
}

impl ManualEntry {
    /// Create an entry
    pub fn new(
        verb: Verb,
        kind: &str,
        description: &str,
        params: Vec<ParamSpec>,
        example: &str,
    ) -> Self {
        Self {
            verb,
            kind: kind.to_string(),
            description: description.to_string(),
            params,
            example: example.to_string(),
        }
    }

    /// The key this entry is stored under
    pub fn key(&self) -> RegistryKey {
        RegistryKey::new(self.verb, &self.kind)
    }

    /// Look up a parameter by name
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Parameters the handler rejects calls without
    pub fn required_params(&self) -> impl Iterator<Item = &ParamSpec> {
        self.params.iter().filter(|p| p.required)
    }
}

/// The unique lookup key of a [`ManualEntry`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistryKey {
    /// The operation category
    pub verb: Verb,
    /// Resource or relationship kind
    pub kind: String,
}

impl RegistryKey {
    /// Create a key
    pub fn new(verb: Verb, kind: &str) -> Self {
        Self {
            verb,
            kind: kind.to_string(),
        }
    }
}

impl fmt::Display for RegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.verb, self.kind)
    }
}

/// Reasons a set of entries cannot form a [`Registry`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// Two entries share a key
    #[error("duplicate manual entry for {0}")]
    DuplicateKey(RegistryKey),

    /// An entry has a blank description
    #[error("manual entry {0} has an empty description")]
    EmptyDescription(RegistryKey),

    /// An entry has a blank example
    #[error("manual entry {0} has an empty example")]
    EmptyExample(RegistryKey),

    /// An entry declares the same parameter twice
    #[error("manual entry {key} declares parameter '{param}' more than once")]
    DuplicateParam {
        /// The offending entry
        key: RegistryKey,
        /// The repeated parameter name
        param: String,
    },
}

/// Immutable map from `(verb, kind)` to [`ManualEntry`]
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: BTreeMap<Verb, BTreeMap<String, ManualEntry>>,
}

impl Registry {
    /// Build a registry, rejecting duplicate keys and incomplete entries
    pub fn from_entries<I>(entries: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = ManualEntry>,
    {
        let mut registry = Self::default();

        for entry in entries {
            let key = entry.key();
            if entry.description.trim().is_empty() {
                return Err(RegistryError::EmptyDescription(key));
            }
            if entry.example.trim().is_empty() {
                return Err(RegistryError::EmptyExample(key));
            }

            let mut seen = HashSet::new();
            if let Some(param) = entry.params.iter().find(|p| !seen.insert(p.name.as_str())) {
                return Err(RegistryError::DuplicateParam {
                    param: param.name.clone(),
                    key,
                });
            }

            let by_kind = registry.entries.entry(entry.verb).or_default();
            if by_kind.contains_key(&entry.kind) {
                return Err(RegistryError::DuplicateKey(key));
            }
            by_kind.insert(entry.kind.clone(), entry);
        }

        Ok(registry)
    }

    /// The registry describing every operation this server implements
    ///
    /// The built-in table is checked by the test suite, so a later entry
    /// sharing a key simply replaces the earlier one here.
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        for entry in builtin_entries() {
            registry
                .entries
                .entry(entry.verb)
                .or_default()
                .insert(entry.kind.clone(), entry);
        }
        registry
    }

    /// Find the entry for a verb and kind
    pub fn lookup(&self, verb: Verb, kind: &str) -> Option<&ManualEntry> {
        self.entries.get(&verb)?.get(kind)
    }

    /// Every kind registered for a verb, sorted
    pub fn resource_kinds_for(&self, verb: Verb) -> Vec<&str> {
        self.entries
            .get(&verb)
            .map(|by_kind| by_kind.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// The fixed relationship kinds used by link/unlink
    pub fn link_kinds() -> &'static [&'static str] {
        &LINK_KINDS
    }

    /// The discriminator values a caller may use with `verb`
    pub fn valid_kinds(&self, verb: Verb) -> Vec<String> {
        if verb.is_relationship() {
            Self::link_kinds().iter().map(|k| k.to_string()).collect()
        } else {
            self.resource_kinds_for(verb)
                .into_iter()
                .map(str::to_string)
                .collect()
        }
    }

    /// All entries, grouped by verb then sorted by kind
    pub fn entries(&self) -> impl Iterator<Item = &ManualEntry> {
        self.entries.values().flat_map(|by_kind| by_kind.values())
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    /// Whether the registry has no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::builtin);

/// The process-wide built-in registry
pub fn registry() -> &'static Registry {
    &REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn sample(verb: Verb, kind: &str) -> ManualEntry {
        ManualEntry::new(
            verb,
            kind,
            "Sample entry.",
            vec![ParamSpec::required("owner", ParamKind::String, "Owner")],
            "sample_gitea()",
        )
    }

    #[test]
    fn test_builtin_entries_form_a_valid_registry() {
        let checked = Registry::from_entries(builtin_entries()).unwrap();
        assert_eq!(checked.len(), builtin_entries().len());
        assert_eq!(checked.len(), registry().len());
    }

    #[test]
    fn test_entry_counts_per_verb() {
        let expected = [
            (Verb::Create, 7),
            (Verb::Get, 4),
            (Verb::List, 13),
            (Verb::Edit, 8),
            (Verb::Delete, 7),
            (Verb::Link, 3),
            (Verb::Unlink, 3),
        ];
        for (verb, count) in expected {
            assert_eq!(registry().resource_kinds_for(verb).len(), count, "{verb}");
        }
        assert_eq!(registry().len(), 45);
    }

    #[test]
    fn test_every_entry_has_description_and_example() {
        for entry in registry().entries() {
            assert!(!entry.description.trim().is_empty(), "{}", entry.key());
            assert!(!entry.example.trim().is_empty(), "{}", entry.key());
            assert!(
                entry.example.starts_with(entry.verb.tool_name()),
                "example for {} should call {}",
                entry.key(),
                entry.verb.tool_name()
            );
            assert!(
                entry
                    .example
                    .contains(&format!("{}=\"{}\"", entry.verb.discriminator(), entry.kind)),
                "example for {} should name its kind",
                entry.key()
            );
        }
    }

    #[test]
    fn test_owner_and_repo_required_except_repository_listing() {
        for entry in registry().entries() {
            let is_repo_listing = entry.verb == Verb::List && entry.kind == "repository";
            for name in ["owner", "repo"] {
                let param = entry.param(name);
                if is_repo_listing {
                    assert!(param.is_none(), "{} should not take {name}", entry.key());
                } else {
                    assert!(param.is_some_and(|p| p.required), "{} needs {name}", entry.key());
                }
            }
        }
    }

    #[test]
    fn test_lookup_create_issue() {
        let entry = registry().lookup(Verb::Create, "issue").unwrap();
        assert_eq!(entry.description, "Create a new issue in a repository.");
        assert!(entry.param("title").is_some_and(|p| p.required));
        assert!(entry.param("body").is_some_and(|p| p.required));
        assert!(entry.param("labels").is_some_and(|p| !p.required));
    }

    #[test]
    fn test_lookup_missing_is_none() {
        assert!(registry().lookup(Verb::Create, "bogus").is_none());
        assert!(registry().lookup(Verb::Get, "label").is_none());
        assert!(registry().lookup(Verb::Link, "issue").is_none());
    }

    #[test]
    fn test_resource_kinds_for_matches_lookup() {
        for verb in Verb::ALL {
            let kinds = registry().resource_kinds_for(verb);
            for kind in &kinds {
                assert!(registry().lookup(verb, kind).is_some());
            }
            let from_entries: BTreeSet<&str> = registry()
                .entries()
                .filter(|e| e.verb == verb)
                .map(|e| e.kind.as_str())
                .collect();
            assert_eq!(kinds.iter().copied().collect::<BTreeSet<_>>(), from_entries);
        }
    }

    #[test]
    fn test_resource_kinds_are_sorted() {
        let kinds = registry().resource_kinds_for(Verb::Delete);
        let mut sorted = kinds.clone();
        sorted.sort_unstable();
        assert_eq!(kinds, sorted);
    }

    #[test]
    fn test_link_kinds_match_registered_relationships() {
        assert_eq!(
            Registry::link_kinds(),
            &["issue_label", "issue_dependency", "issue_blocking"]
        );
        for verb in [Verb::Link, Verb::Unlink] {
            let registered: BTreeSet<&str> =
                registry().resource_kinds_for(verb).into_iter().collect();
            let fixed: BTreeSet<&str> = Registry::link_kinds().iter().copied().collect();
            assert_eq!(registered, fixed);
        }
    }

    #[test]
    fn test_valid_kinds_uses_link_kinds_for_relationships() {
        assert_eq!(
            registry().valid_kinds(Verb::Unlink),
            vec!["issue_label", "issue_dependency", "issue_blocking"]
        );
        assert_eq!(registry().valid_kinds(Verb::Get).len(), 4);
    }

    #[test]
    fn test_enumerated_params_are_strings() {
        for entry in registry().entries() {
            for param in entry.params.iter().filter(|p| !p.allowed_values.is_empty()) {
                assert_eq!(param.kind, ParamKind::String, "{} {}", entry.key(), param.name);
            }
        }
    }

    #[test]
    fn test_from_entries_rejects_duplicates() {
        let err = Registry::from_entries(vec![
            sample(Verb::Get, "thing"),
            sample(Verb::Get, "thing"),
        ])
        .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateKey(RegistryKey::new(Verb::Get, "thing")));
        assert_eq!(err.to_string(), "duplicate manual entry for get:thing");
    }

    #[test]
    fn test_from_entries_rejects_empty_fields() {
        let mut entry = sample(Verb::Get, "thing");
        entry.description = "  ".into();
        assert!(matches!(
            Registry::from_entries(vec![entry]),
            Err(RegistryError::EmptyDescription(_))
        ));

        let mut entry = sample(Verb::Get, "thing");
        entry.example = String::new();
        assert!(matches!(
            Registry::from_entries(vec![entry]),
            Err(RegistryError::EmptyExample(_))
        ));
    }

    #[test]
    fn test_from_entries_rejects_duplicate_params() {
        let mut entry = sample(Verb::Get, "thing");
        entry.params.push(ParamSpec::optional("owner", ParamKind::String, "again"));
        let err = Registry::from_entries(vec![entry]).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateParam { ref param, .. } if param == "owner"));
    }

    #[test]
    fn test_same_kind_under_different_verbs_is_allowed() {
        let registry = Registry::from_entries(vec![
            sample(Verb::Get, "thing"),
            sample(Verb::List, "thing"),
        ])
        .unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.resource_kinds_for(Verb::Create).is_empty());
    }

    #[test]
    fn test_verb_round_trip_and_metadata() {
        for verb in Verb::ALL {
            assert_eq!(verb.as_str().parse::<Verb>().unwrap(), verb);
            assert_eq!(verb.tool_name(), format!("{}_gitea", verb));
            assert!(!verb.summary().is_empty());
        }
        assert_eq!(Verb::Link.discriminator(), "type");
        assert_eq!(Verb::Edit.discriminator(), "resource");
        assert!("update".parse::<Verb>().is_err());
    }

    #[test]
    fn test_registry_key_display() {
        assert_eq!(
            RegistryKey::new(Verb::Unlink, "issue_label").to_string(),
            "unlink:issue_label"
        );
    }
}
