//! # URI templates
//!
//! Builds the RFC 6570 template a test step requests for a method: the
//! resource path followed by a form-style query expression listing every
//! declared query parameter, e.g. `/posts{?page,sort}`.
//!
//! Parameter names are encoded with [`encode_parameter_name`] inside the
//! template only. The per-request parameter list produced by
//! [`parameters_for`] keeps the raw names the description declares.

use crate::encoding::encode_parameter_name;
use crate::spec::{MethodRef, Parameter};
use serde::Serialize;
use std::collections::HashMap;

/// One declared query parameter as handed to the test runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterEntry {
    /// Raw (unencoded) parameter name.
    pub name: String,
    pub value: Option<String>,
    pub required: bool,
}

impl From<&Parameter> for ParameterEntry {
    fn from(p: &Parameter) -> Self {
        ParameterEntry {
            name: p.name.clone(),
            value: p.example.clone(),
            required: !p.optional,
        }
    }
}

/// Template for the method's owning resource and its query parameters.
#[must_use]
pub fn build_uri_template(method: MethodRef<'_>) -> String {
    build_uri_template_for(&method.parent().path, method.query_parameters())
}

/// Template for a trait context: the method's parameters followed by the
/// trait's own. An unknown trait name yields the plain method template.
#[must_use]
pub fn build_variant_uri_template(method: MethodRef<'_>, trait_name: &str) -> String {
    let params = variant_parameters(method, trait_name);
    build_uri_template_for(&method.parent().path, &params)
}

/// Append `{?name1,name2,...}` to `path`, or return `path` unchanged when
/// there are no parameters. Names keep declaration order and are not
/// deduplicated.
#[must_use]
pub fn build_uri_template_for(path: &str, params: &[Parameter]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let names: Vec<String> = params
        .iter()
        .map(|p| encode_parameter_name(&p.name))
        .collect();
    format!("{path}{{?{}}}", names.join(","))
}

/// Declared query parameters of a method, in declaration order.
#[must_use]
pub fn parameters_for(method: MethodRef<'_>) -> Vec<ParameterEntry> {
    method
        .query_parameters()
        .iter()
        .map(ParameterEntry::from)
        .collect()
}

/// Parameters of a method under the given trait.
#[must_use]
pub fn variant_parameters_for(method: MethodRef<'_>, trait_name: &str) -> Vec<ParameterEntry> {
    variant_parameters(method, trait_name)
        .iter()
        .map(ParameterEntry::from)
        .collect()
}

fn variant_parameters(method: MethodRef<'_>, trait_name: &str) -> Vec<Parameter> {
    let mut params = method.query_parameters().to_vec();
    if let Some(variant) = method.method.trait_named(trait_name) {
        params.extend(variant.query_parameters.iter().cloned());
    }
    params
}

/// Expand a template against raw-name → value pairs.
///
/// Supports the two expression kinds this crate produces: simple string
/// expansion (`{id}`) and form-style query expansion (`{?a,b}`). Variables
/// in the template may be percent-encoded names; values are matched by
/// encoding the raw names the same way. Undefined variables are skipped and
/// values are percent-encoded. An unterminated `{` is kept literally.
#[must_use]
pub fn expand_uri_template<'a, I>(template: &str, values: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let lookup: HashMap<String, &str> = values
        .into_iter()
        .map(|(name, value)| (encode_parameter_name(name), value))
        .collect();

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|c| open + c) else {
            break;
        };
        out.push_str(&rest[..open]);
        expand_expression(&rest[open + 1..close], &lookup, &mut out);
        rest = &rest[close + 1..];
    }
    out.push_str(rest);
    out
}

fn expand_expression(expr: &str, lookup: &HashMap<String, &str>, out: &mut String) {
    let (query, vars) = match expr.strip_prefix('?') {
        Some(vars) => (true, vars),
        None => (false, expr),
    };
    let defined = vars
        .split(',')
        .filter(|v| !v.is_empty())
        .filter_map(|v| lookup.get(v).map(|value| (v, urlencoding::encode(value))));

    if query {
        let mut sep = '?';
        for (name, value) in defined {
            out.push(sep);
            out.push_str(name);
            out.push('=');
            out.push_str(&value);
            sep = '&';
        }
    } else {
        let expanded: Vec<String> = defined.map(|(_, value)| value.into_owned()).collect();
        out.push_str(&expanded.join(","));
    }
}
