use std::collections::HashMap;
use std::io;

use http::Method;
use serde_json::{Map, Value};
use tracing::debug;

use super::http::RawRequest;

/// Parsed HTTP request data handed to the middleware chain and handlers.
#[derive(Debug)]
pub struct ParsedRequest {
    /// HTTP method (GET, POST, PATCH, DELETE)
    pub method: Method,
    /// Request path without the query string
    pub path: String,
    /// Parsed query string parameters (last occurrence of a repeated key wins)
    pub query_params: HashMap<String, String>,
    /// Client address, recorded for audit logging
    pub client_addr: String,
    /// Parsed request body, if any
    pub body: Option<Value>,
}

impl ParsedRequest {
    /// Build a request from a method and target (`/path?query`), without a
    /// body. Mostly useful for tests and in-process dispatch.
    #[must_use]
    pub fn new(method: Method, target: &str, client_addr: impl Into<String>) -> Self {
        Self {
            method,
            path: split_path(target),
            query_params: parse_query_params(target),
            client_addr: client_addr.into(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Get a query parameter by name.
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }
}

fn split_path(target: &str) -> String {
    target.split('?').next().unwrap_or("/").to_string()
}

/// Parse query string parameters from a request target.
///
/// Extracts everything after the `?` and URL-decodes names and values.
/// A repeated key keeps its last occurrence.
#[must_use]
pub fn parse_query_params(target: &str) -> HashMap<String, String> {
    match target.find('?') {
        Some(pos) => url::form_urlencoded::parse(target[pos + 1..].as_bytes())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        None => HashMap::new(),
    }
}

/// Parse a request body according to its content type.
///
/// JSON bodies parse to their JSON value; `application/x-www-form-urlencoded`
/// bodies become a flat object of string fields, the way a submitted HTML
/// form arrives. Anything else is attempted as JSON. An empty or unparseable
/// body yields `None`.
#[must_use]
pub fn parse_body(content_type: &str, raw: &str) -> Option<Value> {
    if raw.is_empty() {
        return None;
    }
    if content_type.contains("application/x-www-form-urlencoded") {
        let fields: Map<String, Value> = url::form_urlencoded::parse(raw.as_bytes())
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        if fields.is_empty() {
            return None;
        }
        return Some(Value::Object(fields));
    }
    serde_json::from_str(raw).ok()
}

/// Parse a raw request read off the socket into a [`ParsedRequest`].
///
/// Fails only when the method token is not a valid HTTP method; the boundary
/// turns that into a closed connection.
pub fn parse_request(raw: &RawRequest, client_addr: &str) -> io::Result<ParsedRequest> {
    let method: Method = raw
        .method
        .parse()
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "invalid HTTP method"))?;
    let content_type = raw
        .headers
        .get("content-type")
        .map(String::as_str)
        .unwrap_or("");
    let body = parse_body(content_type, &raw.body);
    let query_params = parse_query_params(&raw.target);
    debug!(
        method = %method,
        target = %raw.target,
        param_count = query_params.len(),
        has_body = body.is_some(),
        "HTTP request parsed"
    );
    Ok(ParsedRequest {
        method,
        path: split_path(&raw.target),
        query_params,
        client_addr: client_addr.to_string(),
        body,
    })
}
