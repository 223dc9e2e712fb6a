//! Built-in middleware.
//!
//! Cross-cutting concerns that almost every deployment wants: structured
//! tracing, authentication-header inspection, and the not-found page. Each is
//! an ordinary [`Middleware`] — register the ones you want with
//! [`App::wrap`](crate::App::wrap), in the order you want them to run.

use std::time::Instant;

use bytes::Bytes;
use http::StatusCode;
use tracing::info;

use crate::context::Context;
use crate::pipeline::{BoxFuture, Middleware, Next};
use crate::reply::NOT_FOUND_PAGE;

// ── RequireAuth ───────────────────────────────────────────────────────────────

/// Rejects requests without an `Authorization` header.
///
/// Presence check only — validating the credential is the job of whatever
/// sits behind the header, not the framework. A request carrying the header
/// continues inward; one without it stops here with an empty `401` and the
/// inner stages (routing included) never run. Register it early: everything
/// wrapped inside it is gated.
pub struct RequireAuth;

impl Middleware for RequireAuth {
    fn handle(&self, mut ctx: Context, next: Next) -> BoxFuture {
        if ctx.request().header("authorization").is_some() {
            next.run(ctx)
        } else {
            ctx.response_mut().set_status(StatusCode::UNAUTHORIZED);
            Box::pin(std::future::ready(ctx))
        }
    }
}

// ── NotFoundPage ──────────────────────────────────────────────────────────────

/// Renders an HTML body for unmatched requests.
///
/// Belongs after the routing stage. It decides on the response state alone:
/// if the status is exactly `404` and no body has been written yet, it fills
/// in the page and sets `text/html`; anything else passes through untouched.
/// Checking the status, not "was routed", keeps it decoupled from the route
/// table — a handler that itself returns a body-less `404` gets the page too.
pub struct NotFoundPage {
    page: Bytes,
}

impl NotFoundPage {
    pub fn new() -> Self {
        Self { page: Bytes::from_static(NOT_FOUND_PAGE.as_bytes()) }
    }

    /// Uses a custom HTML page instead of the built-in one.
    pub fn with_page(page: impl Into<String>) -> Self {
        Self { page: Bytes::from(page.into()) }
    }
}

impl Default for NotFoundPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for NotFoundPage {
    fn handle(&self, mut ctx: Context, next: Next) -> BoxFuture {
        let response = ctx.response_mut();
        if response.status() == StatusCode::NOT_FOUND && !response.has_body() {
            response.write_body("text/html; charset=utf-8", self.page.clone());
        }
        next.run(ctx)
    }
}

// ── Trace ─────────────────────────────────────────────────────────────────────

/// Emits one `tracing` event per request: method, path, response status, and
/// latency. Wraps the inner stages, so the latency covers everything inside
/// it — register it outermost to time the whole pipeline.
pub struct Trace;

impl Middleware for Trace {
    fn handle(&self, ctx: Context, next: Next) -> BoxFuture {
        let method = ctx.request().method().clone();
        let path = ctx.request().path().to_owned();
        Box::pin(async move {
            let start = Instant::now();
            let ctx = next.run(ctx).await;
            info!(
                %method,
                %path,
                status = ctx.response().status().as_u16(),
                elapsed_us = start.elapsed().as_micros() as u64,
                "request"
            );
            ctx
        })
    }
}
