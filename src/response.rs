//! Mutable response sink.
//!
//! Every request context carries one [`ResponseState`]: the status, headers,
//! and body that will be flushed to the client once the pipeline returns.
//! Middlewares and the routing stage mutate it in place; nothing touches the
//! wire until dispatch finishes.

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;

/// The response half of a request context.
///
/// Starts as `200 OK` with no headers and no body. A body is written at most
/// once per request — later stages check [`has_body`](ResponseState::has_body)
/// before rendering (the not-found page middleware relies on exactly this).
pub struct ResponseState {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl ResponseState {
    pub(crate) fn new() -> Self {
        Self { status: StatusCode::OK, headers: HeaderMap::new(), body: None }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    pub fn insert_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    /// Sets content-type, content-length, and the body bytes in one step.
    ///
    /// Overwrites any previously written body; callers that want
    /// write-at-most-once semantics check [`has_body`](ResponseState::has_body)
    /// first.
    pub fn write_body(&mut self, content_type: &'static str, body: impl Into<Bytes>) {
        let body = body.into();
        self.headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        self.headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
        self.body = Some(body);
    }

    /// Hands the accumulated state to hyper. A pipeline that never wrote a
    /// body produces an empty response with whatever status it left behind —
    /// by default an empty `200 OK`.
    pub(crate) fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut response = http::Response::new(Full::new(self.body.unwrap_or_default()));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_empty_ok() {
        let state = ResponseState::new();
        assert_eq!(state.status(), StatusCode::OK);
        assert!(!state.has_body());
        let response = state.into_http();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().is_empty());
    }

    #[test]
    fn write_body_sets_framing_headers() {
        let mut state = ResponseState::new();
        state.write_body("text/plain; charset=utf-8", "hello");
        assert!(state.has_body());
        assert_eq!(state.headers.get(CONTENT_TYPE).unwrap(), "text/plain; charset=utf-8");
        assert_eq!(state.headers.get(CONTENT_LENGTH).unwrap(), "5");
    }
}
