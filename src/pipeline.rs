//! Middleware chain.
//!
//! A [`Middleware`] wraps the rest of the pipeline: it receives the request
//! [`Context`] and a [`Next`] handle, runs whatever pre-processing it wants,
//! and then either calls `next.run(ctx)` to continue inward or returns the
//! context without doing so to short-circuit. Work placed after the
//! `next.run(…).await` runs on the way back out, so every middleware gets
//! both pre and post hooks with plain control flow:
//!
//! ```text
//! A in → B in → C in → routing → C out → B out → A out
//! ```
//!
//! Registration order is the semantics: the first middleware registered with
//! [`App::wrap`](crate::App::wrap) is the outermost stage. There are no
//! priorities and no reordering.
//!
//! The chain provides no fault isolation. A middleware that panics takes its
//! own connection task down with it — nothing more — and the chain does not
//! convert panics into responses. Callers who want that register their own
//! outermost catching middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::Context;

/// A heap-allocated, type-erased future resolving to the request [`Context`].
pub type BoxFuture = Pin<Box<dyn Future<Output = Context> + Send + 'static>>;

/// One stage of the request pipeline.
///
/// Implement this for stateful middleware; for simple cases wrap a closure
/// with [`from_fn`].
pub trait Middleware: Send + Sync + 'static {
    fn handle(&self, ctx: Context, next: Next) -> BoxFuture;
}

pub(crate) type BoxMiddleware = Arc<dyn Middleware>;

/// The remainder of the pipeline, handed to each middleware.
///
/// Calling [`run`](Next::run) invokes the next inner stage. Past the last
/// stage sits the terminal no-op, which returns the context untouched — so
/// every composed pipeline terminates, and a chain that never writes leaves
/// the response in its default empty `200` state.
pub struct Next {
    stack: Arc<[BoxMiddleware]>,
    index: usize,
}

impl Next {
    /// Runs the rest of the chain to completion.
    pub fn run(mut self, ctx: Context) -> BoxFuture {
        match self.stack.get(self.index).map(Arc::clone) {
            Some(stage) => {
                self.index += 1;
                stage.handle(ctx, self)
            }
            None => Box::pin(std::future::ready(ctx)),
        }
    }
}

/// The composed pipeline: an ordered, immutable stack of stages, built once
/// at startup and shared read-only across all connection tasks.
pub struct Pipeline {
    stack: Arc<[BoxMiddleware]>,
}

impl Pipeline {
    pub(crate) fn new(stack: Vec<BoxMiddleware>) -> Self {
        Self { stack: stack.into() }
    }

    /// Dispatches one request context through the whole chain.
    pub async fn dispatch(&self, ctx: Context) -> Context {
        Next { stack: Arc::clone(&self.stack), index: 0 }.run(ctx).await
    }
}

// ── Closure adapter ───────────────────────────────────────────────────────────

/// Wraps an async closure as a [`Middleware`].
///
/// ```rust,no_run
/// use pylon::{App, from_fn};
///
/// let app = App::new().wrap(from_fn(|ctx, next| async move {
///     // before the inner stages
///     let ctx = next.run(ctx).await;
///     // after the inner stages
///     ctx
/// }));
/// ```
pub fn from_fn<F, Fut>(f: F) -> FnMiddleware<F>
where
    F: Fn(Context, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Context> + Send + 'static,
{
    FnMiddleware(f)
}

/// A [`Middleware`] backed by a closure. Built with [`from_fn`].
pub struct FnMiddleware<F>(F);

impl<F, Fut> Middleware for FnMiddleware<F>
where
    F: Fn(Context, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Context> + Send + 'static,
{
    fn handle(&self, ctx: Context, next: Next) -> BoxFuture {
        Box::pin((self.0)(ctx, next))
    }
}
