use http::Method as HttpMethod;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

fn default_optional() -> bool {
    true
}

/// Root of a parsed API description.
///
/// The parsing collaborator builds this graph (or deserializes it from a
/// snapshot, see [`crate::spec::load_description`]); this crate only reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiDescription {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_uri: Option<String>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl ApiDescription {
    /// Iterate every method in traversal order (resources, then methods).
    pub fn methods(&self) -> impl Iterator<Item = MethodRef<'_>> {
        self.resources.iter().flat_map(|r| r.methods())
    }

    /// Find a method by verb and resource path.
    #[must_use]
    pub fn find_method(&self, verb: &HttpMethod, path: &str) -> Option<MethodRef<'_>> {
        self.methods()
            .find(|m| m.method.verb == *verb && m.resource.path == path)
    }
}

/// A resource: its path template plus the methods declared on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub path: String,
    #[serde(default)]
    pub methods: Vec<Method>,
}

impl Resource {
    pub fn new(path: impl Into<String>) -> Self {
        Resource {
            path: path.into(),
            methods: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    /// Methods of this resource, each paired with a reference back to it.
    pub fn methods(&self) -> impl Iterator<Item = MethodRef<'_>> {
        self.methods.iter().map(move |method| MethodRef {
            resource: self,
            method,
        })
    }
}

/// An HTTP verb on a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    #[serde(with = "verb_serde")]
    pub verb: HttpMethod,
    /// Declared query parameters, in declaration order.
    #[serde(default)]
    pub query_parameters: Vec<Parameter>,
    #[serde(default)]
    pub traits: Vec<Trait>,
    #[serde(default)]
    pub responses: Vec<Response>,
}

impl Method {
    pub fn new(verb: HttpMethod) -> Self {
        Method {
            verb,
            query_parameters: Vec::new(),
            traits: Vec::new(),
            responses: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_query_parameter(mut self, parameter: Parameter) -> Self {
        self.query_parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn with_trait(mut self, variant: Trait) -> Self {
        self.traits.push(variant);
        self
    }

    #[must_use]
    pub fn with_response(mut self, response: Response) -> Self {
        self.responses.push(response);
        self
    }

    /// The trait declared under `name`. Registry loads reject methods that
    /// declare a name twice, so the first match is the only one.
    #[must_use]
    pub fn trait_named(&self, name: &str) -> Option<&Trait> {
        self.traits.iter().find(|t| t.name == name)
    }
}

/// A named variant of a method that may add query parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trait {
    pub name: String,
    #[serde(default)]
    pub query_parameters: Vec<Parameter>,
}

impl Trait {
    pub fn new(name: impl Into<String>) -> Self {
        Trait {
            name: name.into(),
            query_parameters: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_query_parameter(mut self, parameter: Parameter) -> Self {
        self.query_parameters.push(parameter);
        self
    }
}

/// A query parameter as declared in the description.
///
/// `name` is the raw declared name and may contain RFC 3986 reserved
/// characters; see [`crate::encoding`] for how it is made template-safe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default = "default_optional")]
    pub optional: bool,
}

impl Parameter {
    /// An optional parameter without an example.
    pub fn new(name: impl Into<String>) -> Self {
        Parameter {
            name: name.into(),
            example: None,
            optional: true,
        }
    }

    #[must_use]
    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.optional = false;
        self
    }
}

/// A response declared under a method, identified by its status code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub bodies: Vec<Body>,
}

impl Response {
    pub fn new(status: u16) -> Self {
        Response {
            status,
            headers: Vec::new(),
            bodies: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, header: Header) -> Self {
        self.headers.push(header);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Body) -> Self {
        self.bodies.push(body);
        self
    }
}

/// A response header declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    #[serde(default = "default_optional")]
    pub optional: bool,
    #[serde(default)]
    pub example: Option<String>,
}

impl Header {
    /// An optional header without an example.
    pub fn new(name: impl Into<String>) -> Self {
        Header {
            name: name.into(),
            optional: true,
            example: None,
        }
    }

    #[must_use]
    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.optional = false;
        self
    }
}

/// A response body for one media type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub media_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

impl Body {
    pub fn new(media_type: impl Into<String>) -> Self {
        Body {
            media_type: media_type.into(),
            example: None,
            schema: None,
        }
    }

    #[must_use]
    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }
}

/// A method together with the resource that owns it.
#[derive(Debug, Clone, Copy)]
pub struct MethodRef<'a> {
    pub resource: &'a Resource,
    pub method: &'a Method,
}

impl<'a> MethodRef<'a> {
    /// The owning resource.
    #[must_use]
    pub fn parent(&self) -> &'a Resource {
        self.resource
    }

    #[must_use]
    pub fn verb(&self) -> &'a HttpMethod {
        &self.method.verb
    }

    #[must_use]
    pub fn query_parameters(&self) -> &'a [Parameter] {
        &self.method.query_parameters
    }

    pub fn responses(&self) -> impl Iterator<Item = ResponseRef<'a>> {
        let owner = *self;
        self.method.responses.iter().map(move |response| ResponseRef {
            method: owner,
            response,
        })
    }

    /// Human readable location, e.g. `GET /posts`.
    #[must_use]
    pub fn location(&self) -> String {
        format!("{} {}", self.method.verb, self.resource.path)
    }
}

/// A response together with the method that declares it.
#[derive(Debug, Clone, Copy)]
pub struct ResponseRef<'a> {
    pub method: MethodRef<'a>,
    pub response: &'a Response,
}

impl<'a> ResponseRef<'a> {
    #[must_use]
    pub fn parent(&self) -> MethodRef<'a> {
        self.method
    }

    pub fn bodies(&self) -> impl Iterator<Item = BodyRef<'a>> {
        let owner = *self;
        self.response
            .bodies
            .iter()
            .map(move |body| BodyRef { response: owner, body })
    }

    #[must_use]
    pub fn location(&self) -> String {
        format!("{} → {}", self.method.location(), self.response.status)
    }
}

/// A body together with the response it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct BodyRef<'a> {
    pub response: ResponseRef<'a>,
    pub body: &'a Body,
}

impl<'a> BodyRef<'a> {
    /// The response this body is attached to.
    #[must_use]
    pub fn parent(&self) -> &'a Response {
        self.response.response
    }
}

impl fmt::Display for MethodRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method.verb, self.resource.path)
    }
}

pub(crate) mod verb_serde {
    use super::*;

    pub fn serialize<S: Serializer>(verb: &HttpMethod, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(verb.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<HttpMethod, D::Error> {
        let s = String::deserialize(deserializer)?;
        HttpMethod::from_bytes(s.to_ascii_uppercase().as_bytes())
            .map_err(|_| serde::de::Error::custom(format!("invalid HTTP method '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_ref_parent_and_location() {
        let resource = Resource::new("/posts").with_method(Method::new(HttpMethod::GET));
        let method = resource.methods().next().unwrap();
        assert_eq!(method.parent().path, "/posts");
        assert_eq!(method.location(), "GET /posts");
    }

    #[test]
    fn test_body_ref_resolves_parent_response() {
        let resource = Resource::new("/posts").with_method(
            Method::new(HttpMethod::GET)
                .with_response(Response::new(200).with_body(Body::new("application/json"))),
        );
        let method = resource.methods().next().unwrap();
        let response = method.responses().next().unwrap();
        let body = response.bodies().next().unwrap();
        assert_eq!(body.parent().status, 200);
        assert_eq!(response.location(), "GET /posts → 200");
    }

    #[test]
    fn test_snapshot_defaults() {
        let yaml = r#"
path: /posts
methods:
  - verb: get
    query_parameters:
      - name: page
    responses:
      - status: 200
        headers:
          - name: content_type
"#;
        let resource: Resource = serde_yaml::from_str(yaml).unwrap();
        let method = &resource.methods[0];
        assert_eq!(method.verb, HttpMethod::GET);
        assert!(method.query_parameters[0].optional);
        assert!(method.query_parameters[0].example.is_none());
        assert!(method.responses[0].headers[0].optional);
    }
}
