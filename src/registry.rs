//! # Fixture registry
//!
//! The registry is what the test runner queries while executing scenarios.
//! It is filled by a single [`Registry::load`] over a parsed description
//! and holds two lookup tables:
//!
//! - **groups**, keyed by node category ([`GroupKey`]): every resource,
//!   method, response and body of the description with the data a step
//!   needs (URI template, parameter list, expected headers);
//! - **contexts**, keyed by variant name: `default` with every method, plus
//!   one context per declared trait with that trait's parameters merged in.
//!   A trait may not be named `default`, and a method may declare each trait
//!   name only once; either is reported like a missing example.
//!
//! ## Lifecycle
//!
//! ```text
//! empty ──load()──▶ loaded ──reset()──▶ empty
//! ```
//!
//! A load is all-or-nothing: nodes are collected into fresh tables and only
//! committed once the whole description has been walked without errors.
//! Loading an already loaded registry is rejected with
//! [`LoadError::AlreadyLoaded`].
//!
//! ## Process-wide instance
//!
//! [`global()`] exposes one registry behind an `RwLock` for runners that
//! look fixtures up from step definitions. [`reset_global`] takes the write
//! lock, so no lookup can overlap a reset.
//!
//! ```rust
//! use apisail::registry::{GroupKey, Registry};
//! use apisail::spec::{ApiDescription, Method, Parameter, Resource};
//! use http::Method as HttpMethod;
//!
//! let description = ApiDescription {
//!     resources: vec![Resource::new("/posts").with_method(
//!         Method::new(HttpMethod::GET).with_query_parameter(Parameter::new("page")),
//!     )],
//!     ..Default::default()
//! };
//!
//! let mut registry = Registry::new();
//! registry.load(&description).unwrap();
//! assert_eq!(registry.group(GroupKey::Method).len(), 1);
//! assert_eq!(registry.context("default")[0].uri_template, "/posts{?page}");
//! ```

use crate::error::{LoadError, MissingExampleError, TraitError};
use crate::headers::{expected_headers, missing_header_examples, missing_parameter_examples, ExpectedHeaders};
use crate::spec::{verb_serde, ApiDescription, MethodRef};
use crate::template::{
    build_uri_template, build_variant_uri_template, parameters_for, variant_parameters_for,
    ParameterEntry,
};
use crate::validator::{fail_if_issues, ValidationIssue};
use http::Method as HttpMethod;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info};

/// Name of the context every method belongs to.
pub const DEFAULT_CONTEXT: &str = "default";

/// Category of a node in the group registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Resource,
    Method,
    Response,
    Body,
}

impl GroupKey {
    pub const ALL: [GroupKey; 4] = [
        GroupKey::Resource,
        GroupKey::Method,
        GroupKey::Response,
        GroupKey::Body,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKey::Resource => "resource",
            GroupKey::Method => "method",
            GroupKey::Response => "response",
            GroupKey::Body => "body",
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GroupKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown group '{s}'"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceNode {
    pub path: String,
    pub method_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodNode {
    #[serde(with = "verb_serde")]
    pub verb: HttpMethod,
    pub path: String,
    pub uri_template: String,
    pub parameters: Vec<ParameterEntry>,
    pub traits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseNode {
    #[serde(with = "verb_serde")]
    pub verb: HttpMethod,
    pub path: String,
    pub status: u16,
    pub expected_headers: ExpectedHeaders,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BodyNode {
    #[serde(with = "verb_serde")]
    pub verb: HttpMethod,
    pub path: String,
    pub status: u16,
    pub media_type: String,
    pub example: Option<String>,
    /// Headers of the parent response.
    pub expected_headers: ExpectedHeaders,
}

/// A loaded node of the description graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Resource(ResourceNode),
    Method(MethodNode),
    Response(ResponseNode),
    Body(BodyNode),
}

impl Node {
    #[must_use]
    pub fn key(&self) -> GroupKey {
        match self {
            Node::Resource(_) => GroupKey::Resource,
            Node::Method(_) => GroupKey::Method,
            Node::Response(_) => GroupKey::Response,
            Node::Body(_) => GroupKey::Body,
        }
    }
}

/// A method as seen under one context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextEntry {
    #[serde(with = "verb_serde")]
    pub verb: HttpMethod,
    pub path: String,
    pub uri_template: String,
    pub parameters: Vec<ParameterEntry>,
}

/// How [`Registry::load`] reacts to missing examples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Abort on the first violation (default) instead of collecting all.
    pub fail_fast: bool,
    /// Also require examples on required query parameters.
    pub require_parameter_examples: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            fail_fast: true,
            require_parameter_examples: false,
        }
    }
}

/// Node counts of a successful load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub resources: usize,
    pub methods: usize,
    pub responses: usize,
    pub bodies: usize,
    pub contexts: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Registry {
    groups: BTreeMap<GroupKey, Vec<Node>>,
    contexts: BTreeMap<String, Vec<ContextEntry>>,
    #[serde(skip)]
    options: LoadOptions,
    #[serde(skip)]
    loaded: bool,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: LoadOptions) -> Self {
        Registry {
            options,
            ..Self::default()
        }
    }

    /// Change the load options; only effective for the next load.
    pub fn set_options(&mut self, options: LoadOptions) {
        self.options = options;
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Walk `description` and populate both tables.
    ///
    /// # Errors
    ///
    /// - [`LoadError::AlreadyLoaded`] if the registry was not reset since
    ///   the previous load.
    /// - [`LoadError::MissingExample`] in fail-fast mode, for the first
    ///   required header (or parameter, if configured) without an example.
    /// - [`LoadError::InvalidTrait`] in fail-fast mode, for a trait named
    ///   [`DEFAULT_CONTEXT`] or declared twice on one method.
    /// - [`LoadError::Invalid`] in aggregate mode, with every violation.
    ///
    /// The registry is left untouched on error.
    pub fn load(&mut self, description: &ApiDescription) -> Result<LoadSummary, LoadError> {
        if self.loaded {
            return Err(LoadError::AlreadyLoaded);
        }
        info!(
            title = %description.title,
            resources = description.resources.len(),
            fail_fast = self.options.fail_fast,
            "loading description"
        );

        let mut staging = Staging::new(self.options);
        staging.walk(description)?;

        let summary = staging.summary();
        self.groups = staging.groups;
        self.contexts = staging.contexts;
        self.loaded = true;

        info!(
            resources = summary.resources,
            methods = summary.methods,
            responses = summary.responses,
            bodies = summary.bodies,
            contexts = summary.contexts,
            "description loaded"
        );
        Ok(summary)
    }

    /// Clear both tables so the registry can be loaded again.
    pub fn reset(&mut self) {
        if self.loaded {
            info!("resetting registry");
        }
        self.groups.clear();
        self.contexts.clear();
        self.loaded = false;
    }

    /// Nodes of one category; empty when nothing of that kind was loaded.
    #[must_use]
    pub fn group(&self, key: GroupKey) -> &[Node] {
        self.groups.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Methods under a context; empty for an unknown name.
    #[must_use]
    pub fn context(&self, name: &str) -> &[ContextEntry] {
        self.contexts.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn group_keys(&self) -> impl Iterator<Item = GroupKey> + '_ {
        self.groups.keys().copied()
    }

    pub fn context_names(&self) -> impl Iterator<Item = &str> {
        self.contexts.keys().map(String::as_str)
    }

    #[must_use]
    pub fn method_fixture(&self, verb: &HttpMethod, path: &str) -> Option<&MethodNode> {
        self.group(GroupKey::Method).iter().find_map(|node| match node {
            Node::Method(m) if m.verb == *verb && m.path == path => Some(m),
            _ => None,
        })
    }

    #[must_use]
    pub fn response_fixture(
        &self,
        verb: &HttpMethod,
        path: &str,
        status: u16,
    ) -> Option<&ResponseNode> {
        self.group(GroupKey::Response)
            .iter()
            .find_map(|node| match node {
                Node::Response(r) if r.verb == *verb && r.path == path && r.status == status => {
                    Some(r)
                }
                _ => None,
            })
    }
}

/// Tables under construction during one load.
struct Staging {
    options: LoadOptions,
    groups: BTreeMap<GroupKey, Vec<Node>>,
    contexts: BTreeMap<String, Vec<ContextEntry>>,
    issues: Vec<ValidationIssue>,
}

impl Staging {
    fn new(options: LoadOptions) -> Self {
        let groups = GroupKey::ALL.into_iter().map(|k| (k, Vec::new())).collect();
        let mut contexts = BTreeMap::new();
        contexts.insert(DEFAULT_CONTEXT.to_string(), Vec::new());
        Staging {
            options,
            groups,
            contexts,
            issues: Vec::new(),
        }
    }

    fn push(&mut self, node: Node) {
        self.groups.entry(node.key()).or_default().push(node);
    }

    /// Record a violation; in fail-fast mode this ends the load.
    fn reject(&mut self, location: String, err: MissingExampleError) -> Result<(), LoadError> {
        if self.options.fail_fast {
            return Err(LoadError::MissingExample {
                location,
                source: err,
            });
        }
        self.issues
            .push(ValidationIssue::missing_example(location, &err));
        Ok(())
    }

    fn reject_trait(&mut self, location: String, err: TraitError) -> Result<(), LoadError> {
        if self.options.fail_fast {
            return Err(LoadError::InvalidTrait {
                location,
                source: err,
            });
        }
        self.issues.push(ValidationIssue::invalid_trait(location, &err));
        Ok(())
    }

    fn walk(&mut self, description: &ApiDescription) -> Result<(), LoadError> {
        for resource in &description.resources {
            debug!(path = %resource.path, methods = resource.methods.len(), "resource");
            self.push(Node::Resource(ResourceNode {
                path: resource.path.clone(),
                method_count: resource.methods.len(),
            }));
            for method in resource.methods() {
                self.walk_method(method)?;
            }
        }
        fail_if_issues(std::mem::take(&mut self.issues))
    }

    fn walk_method(&mut self, method: MethodRef<'_>) -> Result<(), LoadError> {
        let verb = method.verb().clone();
        let path = method.parent().path.clone();
        let uri_template = build_uri_template(method);
        debug!(%verb, %path, %uri_template, "method");

        if self.options.require_parameter_examples {
            for err in missing_parameter_examples(method) {
                self.reject(method.location(), err)?;
            }
        }

        self.push(Node::Method(MethodNode {
            verb: verb.clone(),
            path: path.clone(),
            uri_template: uri_template.clone(),
            parameters: parameters_for(method),
            traits: method.method.traits.iter().map(|t| t.name.clone()).collect(),
        }));
        self.contexts
            .entry(DEFAULT_CONTEXT.to_string())
            .or_default()
            .push(ContextEntry {
                verb: verb.clone(),
                path: path.clone(),
                uri_template,
                parameters: parameters_for(method),
            });
        let mut seen = HashSet::new();
        for variant in &method.method.traits {
            if variant.name == DEFAULT_CONTEXT {
                self.reject_trait(method.location(), TraitError::ReservedName(variant.name.clone()))?;
                continue;
            }
            if !seen.insert(variant.name.as_str()) {
                self.reject_trait(method.location(), TraitError::Duplicate(variant.name.clone()))?;
                continue;
            }
            self.contexts
                .entry(variant.name.clone())
                .or_default()
                .push(ContextEntry {
                    verb: verb.clone(),
                    path: path.clone(),
                    uri_template: build_variant_uri_template(method, &variant.name),
                    parameters: variant_parameters_for(method, &variant.name),
                });
        }

        for response in method.responses() {
            let headers = match expected_headers(&response) {
                Ok(headers) => headers,
                Err(err) => {
                    self.reject(response.location(), err)?;
                    // Aggregate mode: the first violation is recorded, add the rest.
                    for rest in missing_header_examples(&response).into_iter().skip(1) {
                        self.reject(response.location(), rest)?;
                    }
                    continue;
                }
            };
            let status = response.response.status;
            self.push(Node::Response(ResponseNode {
                verb: verb.clone(),
                path: path.clone(),
                status,
                expected_headers: headers.clone(),
            }));
            for body in response.bodies() {
                self.push(Node::Body(BodyNode {
                    verb: verb.clone(),
                    path: path.clone(),
                    status,
                    media_type: body.body.media_type.clone(),
                    example: body.body.example.clone(),
                    expected_headers: headers.clone(),
                }));
            }
        }
        Ok(())
    }

    fn summary(&self) -> LoadSummary {
        let count = |key: GroupKey| self.groups.get(&key).map_or(0, Vec::len);
        LoadSummary {
            resources: count(GroupKey::Resource),
            methods: count(GroupKey::Method),
            responses: count(GroupKey::Response),
            bodies: count(GroupKey::Body),
            contexts: self.contexts.len(),
        }
    }
}

static GLOBAL: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(Registry::new()));

/// The process-wide registry.
pub fn global() -> &'static RwLock<Registry> {
    &GLOBAL
}

/// Load `description` into the process-wide registry.
pub fn load_global(
    description: &ApiDescription,
    options: LoadOptions,
) -> Result<LoadSummary, LoadError> {
    let mut registry = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    if !registry.is_loaded() {
        registry.set_options(options);
    }
    registry.load(description)
}

/// Clear the process-wide registry. Holds the write lock for the duration.
pub fn reset_global() {
    GLOBAL
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .reset();
}

/// Run `f` against the process-wide registry under a read lock.
pub fn with_global<R>(f: impl FnOnce(&Registry) -> R) -> R {
    let registry = GLOBAL.read().unwrap_or_else(PoisonError::into_inner);
    f(&registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Body, Header, Method, Parameter, Resource, Response, Trait};

    fn blog() -> ApiDescription {
        ApiDescription {
            title: "My Blog".to_string(),
            base_uri: None,
            resources: vec![
                Resource::new("/posts").with_method(
                    Method::new(HttpMethod::GET)
                        .with_query_parameter(Parameter::new("page").example("1"))
                        .with_query_parameter(Parameter::new("api-key").required().example("k"))
                        .with_trait(Trait::new("sortable").with_query_parameter(Parameter::new("sort")))
                        .with_response(
                            Response::new(200)
                                .with_header(Header::new("content_type").required().example("application/json"))
                                .with_header(Header::new("etag"))
                                .with_body(Body::new("application/json").example("[]")),
                        ),
                ),
                Resource::new("/posts/{id}").with_method(
                    Method::new(HttpMethod::DELETE).with_response(Response::new(204)),
                ),
            ],
        }
    }

    #[test]
    fn test_load_populates_all_groups() {
        let mut registry = Registry::new();
        let summary = registry.load(&blog()).unwrap();
        assert_eq!(
            summary,
            LoadSummary {
                resources: 2,
                methods: 2,
                responses: 2,
                bodies: 1,
                contexts: 2,
            }
        );
        let keys: Vec<GroupKey> = registry.group_keys().collect();
        assert_eq!(keys, GroupKey::ALL.to_vec());
        let names: Vec<&str> = registry.context_names().collect();
        assert_eq!(names, vec!["default", "sortable"]);
    }

    #[test]
    fn test_default_context_always_present() {
        let description = ApiDescription {
            resources: vec![Resource::new("/ping").with_method(Method::new(HttpMethod::GET))],
            ..Default::default()
        };
        let mut registry = Registry::new();
        registry.load(&description).unwrap();
        let names: Vec<&str> = registry.context_names().collect();
        assert_eq!(names, vec![DEFAULT_CONTEXT]);
        assert_eq!(registry.context("default")[0].uri_template, "/ping");
    }

    #[test]
    fn test_method_fixture_and_trait_context() {
        let mut registry = Registry::new();
        registry.load(&blog()).unwrap();
        let method = registry.method_fixture(&HttpMethod::GET, "/posts").unwrap();
        assert_eq!(method.uri_template, "/posts{?page,api%2Dkey}");
        assert_eq!(method.parameters[1].name, "api-key");
        assert!(method.parameters[1].required);
        assert_eq!(method.traits, vec!["sortable".to_string()]);

        let sortable = registry.context("sortable");
        assert_eq!(sortable.len(), 1);
        assert_eq!(sortable[0].uri_template, "/posts{?page,api%2Dkey,sort}");
    }

    #[test]
    fn test_body_carries_parent_headers() {
        let mut registry = Registry::new();
        registry.load(&blog()).unwrap();
        match &registry.group(GroupKey::Body)[0] {
            Node::Body(body) => {
                assert_eq!(body.status, 200);
                assert_eq!(
                    body.expected_headers.get("content_type"),
                    Some(Some("application/json"))
                );
                assert_eq!(body.expected_headers.get("etag"), Some(None));
            }
            other => panic!("expected body node, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_lookups_are_empty() {
        let registry = Registry::new();
        assert!(registry.group(GroupKey::Resource).is_empty());
        assert!(registry.context("nope").is_empty());
        assert!(registry.method_fixture(&HttpMethod::GET, "/x").is_none());
    }

    #[test]
    fn test_second_load_requires_reset() {
        let mut registry = Registry::new();
        registry.load(&blog()).unwrap();
        assert_eq!(registry.load(&blog()), Err(LoadError::AlreadyLoaded));
        registry.reset();
        assert!(!registry.is_loaded());
        assert!(registry.group(GroupKey::Method).is_empty());
        assert!(registry.load(&blog()).is_ok());
    }

    fn broken() -> ApiDescription {
        ApiDescription {
            resources: vec![Resource::new("/posts").with_method(
                Method::new(HttpMethod::GET)
                    .with_query_parameter(Parameter::new("page").required())
                    .with_response(Response::new(200).with_header(Header::new("content_type").required()))
                    .with_response(Response::new(404).with_header(Header::new("x-reason").required())),
            )],
            ..Default::default()
        }
    }

    #[test]
    fn test_fail_fast_aborts_and_keeps_registry_empty() {
        let mut registry = Registry::new();
        let err = registry.load(&broken()).unwrap_err();
        assert_eq!(
            err,
            LoadError::MissingExample {
                location: "GET /posts → 200".to_string(),
                source: MissingExampleError::header("content_type"),
            }
        );
        assert!(!registry.is_loaded());
        assert!(registry.group(GroupKey::Resource).is_empty());
    }

    #[test]
    fn test_aggregate_mode_collects_every_issue() {
        let mut registry = Registry::with_options(LoadOptions {
            fail_fast: false,
            require_parameter_examples: true,
        });
        match registry.load(&broken()).unwrap_err() {
            LoadError::Invalid(issues) => {
                let messages: Vec<&str> = issues.iter().map(|i| i.message.as_str()).collect();
                assert_eq!(
                    messages,
                    vec![
                        "Required parameter page does not have an example value",
                        "Required header content_type does not have an example value",
                        "Required header x-reason does not have an example value",
                    ]
                );
            }
            other => panic!("expected aggregate error, got {other:?}"),
        }
        assert!(!registry.is_loaded());
    }

    fn clashing_traits() -> ApiDescription {
        ApiDescription {
            resources: vec![Resource::new("/posts").with_method(
                Method::new(HttpMethod::GET)
                    .with_trait(Trait::new("default").with_query_parameter(Parameter::new("x")))
                    .with_trait(Trait::new("paged").with_query_parameter(Parameter::new("page")))
                    .with_trait(Trait::new("paged").with_query_parameter(Parameter::new("page2"))),
            )],
            ..Default::default()
        }
    }

    #[test]
    fn test_trait_named_default_is_rejected() {
        let mut registry = Registry::new();
        assert_eq!(
            registry.load(&clashing_traits()),
            Err(LoadError::InvalidTrait {
                location: "GET /posts".to_string(),
                source: TraitError::ReservedName("default".to_string()),
            })
        );
        assert!(!registry.is_loaded());
        assert!(registry.context(DEFAULT_CONTEXT).is_empty());
    }

    #[test]
    fn test_duplicate_trait_is_rejected() {
        let description = ApiDescription {
            resources: vec![Resource::new("/posts").with_method(
                Method::new(HttpMethod::GET)
                    .with_trait(Trait::new("paged").with_query_parameter(Parameter::new("page")))
                    .with_trait(Trait::new("paged").with_query_parameter(Parameter::new("page2"))),
            )],
            ..Default::default()
        };
        let mut registry = Registry::new();
        assert_eq!(
            registry.load(&description),
            Err(LoadError::InvalidTrait {
                location: "GET /posts".to_string(),
                source: TraitError::Duplicate("paged".to_string()),
            })
        );
        assert!(registry.context("paged").is_empty());
    }

    #[test]
    fn test_aggregate_mode_reports_every_trait_clash() {
        let mut registry = Registry::with_options(LoadOptions {
            fail_fast: false,
            require_parameter_examples: false,
        });
        match registry.load(&clashing_traits()).unwrap_err() {
            LoadError::Invalid(issues) => {
                let kinds: Vec<&str> = issues.iter().map(|i| i.kind.as_str()).collect();
                assert_eq!(kinds, vec!["InvalidTrait", "InvalidTrait"]);
                assert_eq!(
                    issues[0].message,
                    "Trait default clashes with the context every method belongs to"
                );
                assert_eq!(issues[1].message, "Trait paged is declared more than once");
            }
            other => panic!("expected aggregate error, got {other:?}"),
        }
        assert!(!registry.is_loaded());
    }

    #[test]
    fn test_same_trait_on_different_methods_shares_a_context() {
        let paged = || Trait::new("paged").with_query_parameter(Parameter::new("page"));
        let description = ApiDescription {
            resources: vec![
                Resource::new("/posts").with_method(Method::new(HttpMethod::GET).with_trait(paged())),
                Resource::new("/tags").with_method(Method::new(HttpMethod::GET).with_trait(paged())),
            ],
            ..Default::default()
        };
        let mut registry = Registry::new();
        registry.load(&description).unwrap();
        let templates: Vec<&str> = registry
            .context("paged")
            .iter()
            .map(|e| e.uri_template.as_str())
            .collect();
        assert_eq!(templates, vec!["/posts{?page}", "/tags{?page}"]);
    }

    #[test]
    fn test_group_key_parse() {
        assert_eq!("Body".parse::<GroupKey>(), Ok(GroupKey::Body));
        assert!("widget".parse::<GroupKey>().is_err());
    }
}
