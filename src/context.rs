//! Per-request context.

use crate::request::Request;
use crate::response::ResponseState;

/// Everything the pipeline knows about one in-flight exchange: the read-only
/// [`Request`] view and the mutable [`ResponseState`] sink.
///
/// A context is owned by exactly one pipeline invocation. It moves by value
/// through the middleware chain — each stage takes it, optionally mutates the
/// response, and either passes it to [`Next::run`](crate::Next::run) or
/// returns it to short-circuit.
pub struct Context {
    request: Request,
    response: ResponseState,
}

impl Context {
    pub(crate) fn new(request: Request) -> Self {
        Self { request, response: ResponseState::new() }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn response(&self) -> &ResponseState {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut ResponseState {
        &mut self.response
    }

    pub(crate) fn into_response(self) -> ResponseState {
        self.response
    }
}
