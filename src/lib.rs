//! # apisail
//!
//! **apisail** turns a parsed API description (resources, methods,
//! responses, headers, query parameters) into the data a behaviour-driven
//! API test runner needs:
//!
//! - named **registries** of fixtures, grouped by node category
//!   (`resource`, `method`, `response`, `body`) and by context (`default`
//!   plus one per declared trait);
//! - per-request **expectations**: the RFC 6570 URI template of a method,
//!   its query parameter list and the headers each response must carry.
//!
//! Parsing the description text is left to a collaborator, which builds the
//! typed graph in [`spec`] (or serializes it to a YAML/JSON snapshot that
//! [`spec::load_description`] reads back).
//!
//! ## Architecture
//!
//! - **[`encoding`]** - percent-encodes `-`, `~` and `.` in parameter names
//! - **[`template`]** - builds and expands URI templates, lists parameters
//! - **[`headers`]** - resolves expected headers, enforcing that required
//!   headers have an example
//! - **[`registry`]** - walks the description once and stores the fixtures
//! - **[`runtime_config`]**, **[`logging`]**, **[`cli`]** - ambient plumbing
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Runner as Test runner
//!     participant Registry as registry::Registry
//!     participant Template as template
//!     participant Headers as headers
//!
//!     Runner->>Registry: load(&description)
//!     loop resources → methods
//!         Registry->>Template: build_uri_template(method)
//!         Template-->>Registry: "/posts{?page,api%2Dkey}"
//!         loop responses
//!             Registry->>Headers: expected_headers(&response)
//!             alt required header without example
//!                 Headers-->>Registry: MissingExampleError
//!                 Registry-->>Runner: LoadError (registry left empty)
//!             end
//!             Headers-->>Registry: ExpectedHeaders
//!         end
//!     end
//!     Registry-->>Runner: LoadSummary
//!     Runner->>Registry: group(GroupKey::Method) / context("default")
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use apisail::headers::expected_headers;
//! use apisail::spec::{Header, Method, Parameter, Resource, Response};
//! use apisail::template::build_uri_template;
//! use http::Method as HttpMethod;
//!
//! let resource = Resource::new("/posts").with_method(
//!     Method::new(HttpMethod::GET)
//!         .with_query_parameter(Parameter::new("page"))
//!         .with_query_parameter(Parameter::new("api-key"))
//!         .with_response(Response::new(200).with_header(Header::new("content_type"))),
//! );
//! let method = resource.methods().next().unwrap();
//! assert_eq!(build_uri_template(method), "/posts{?page,api%2Dkey}");
//!
//! let response = method.responses().next().unwrap();
//! let headers = expected_headers(&response).unwrap();
//! assert_eq!(headers.get("content_type"), Some(None));
//! ```

pub mod cli;
pub mod encoding;
pub mod error;
pub mod headers;
pub mod logging;
pub mod registry;
pub mod runtime_config;
pub mod spec;
pub mod template;
pub mod validator;

pub use error::{ExampleSubject, LoadError, MissingExampleError, TraitError};
pub use headers::{expected_headers, ExpectedHeaders, HeaderSource};
pub use registry::{GroupKey, LoadOptions, LoadSummary, Registry};
pub use spec::{load_description, ApiDescription};
pub use template::{build_uri_template, parameters_for, ParameterEntry};
