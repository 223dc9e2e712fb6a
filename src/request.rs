//! Incoming request view.
//!
//! A [`Request`] is the read-only half of one HTTP exchange: method, path,
//! headers, and the query string parsed into a name → value map. Cloning is
//! an `Arc` bump, so the routing stage can hand a request to a handler while
//! the pipeline keeps moving the context forward.

use std::collections::HashMap;
use std::sync::Arc;

use http::{HeaderMap, Method, Uri};
use percent_encoding::percent_decode_str;

struct RequestParts {
    method: Method,
    path: String,
    headers: HeaderMap,
    query: HashMap<String, String>,
}

/// Read-only view of an incoming HTTP request.
///
/// Query values are kept as raw strings; use [`bind::query`](crate::bind::query)
/// to parse one into a typed value before your handler runs.
#[derive(Clone)]
pub struct Request {
    parts: Arc<RequestParts>,
}

impl Request {
    pub(crate) fn new(method: Method, uri: &Uri, headers: HeaderMap) -> Self {
        let query = uri.query().map(parse_query).unwrap_or_default();
        Self {
            parts: Arc::new(RequestParts { method, path: uri.path().to_owned(), headers, query }),
        }
    }

    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    pub fn path(&self) -> &str {
        &self.parts.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Case-insensitive header lookup. Returns `None` for absent headers and
    /// for values that are not valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the decoded value of a query-string entry.
    ///
    /// For `/echo?x=42`, `req.query("x")` returns `Some("42")`.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.parts.query.get(name).map(String::as_str)
    }
}

/// Parses `a=1&b=two` into a map. Percent-escapes and `+` are decoded in
/// both keys and values; a repeated key keeps the last value.
fn parse_query(raw: &str) -> HashMap<String, String> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect()
}

fn decode(component: &str) -> String {
    // '+' encodes a space in query strings; percent_decode leaves it alone.
    let component = component.replace('+', " ");
    percent_decode_str(&component).decode_utf8_lossy().into_owned()
}
