//! Route table and the routing stage.
//!
//! Exact-match, case-sensitive path lookup. You register a path, you get a
//! handler — no patterns, no wildcards. The table is built before the server
//! starts and never mutated while serving, so lookups need no locks.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use http::StatusCode;

use crate::context::Context;
use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};
use crate::pipeline::{BoxFuture, Middleware, Next};

/// Exact-match mapping from path to handler.
#[derive(Default)]
pub(crate) struct RouteTable {
    routes: HashMap<String, BoxedHandler>,
}

impl RouteTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a handler. Each path can be registered once; a duplicate is
    /// a setup-time error.
    pub(crate) fn insert(&mut self, path: &str, handler: impl Handler) -> Result<(), Error> {
        match self.routes.entry(path.to_owned()) {
            Entry::Occupied(_) => Err(Error::DuplicateRoute(path.to_owned())),
            Entry::Vacant(slot) => {
                slot.insert(handler.into_boxed_handler());
                Ok(())
            }
        }
    }

    pub(crate) fn lookup(&self, path: &str) -> Option<BoxedHandler> {
        self.routes.get(path).map(Arc::clone)
    }
}

/// The routing stage, itself an ordinary middleware.
///
/// On a hit it invokes the handler once, renders the handler's [`Reply`]
/// onto the response, then continues to `next` so later stages can still
/// observe the response. On a miss it sets `404` *without* writing a body
/// and continues — body rendering belongs to
/// [`NotFoundPage`](crate::middleware::NotFoundPage), which keeps the page
/// customizable independently of routing.
///
/// [`Reply`]: crate::Reply
pub(crate) struct Routes {
    table: Arc<RouteTable>,
}

impl Routes {
    pub(crate) fn new(table: RouteTable) -> Self {
        Self { table: Arc::new(table) }
    }
}

impl Middleware for Routes {
    fn handle(&self, mut ctx: Context, next: Next) -> BoxFuture {
        match self.table.lookup(ctx.request().path()) {
            Some(handler) => {
                let req = ctx.request().clone();
                Box::pin(async move {
                    let reply = handler.call(req).await;
                    reply.render(ctx.response_mut());
                    next.run(ctx).await
                })
            }
            None => {
                ctx.response_mut().set_status(StatusCode::NOT_FOUND);
                next.run(ctx)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use http::{HeaderMap, Method, Uri};

    use super::*;
    use crate::pipeline::{Pipeline, from_fn};
    use crate::reply::Reply;
    use crate::request::Request;

    fn ctx(path: &str) -> Context {
        Context::new(Request::new(Method::GET, &path.parse::<Uri>().unwrap(), HeaderMap::new()))
    }

    #[test]
    fn duplicate_path_is_a_setup_error() {
        let mut table = RouteTable::new();
        table.insert("/dup", |_req: Request| async { Reply::text("one") }).unwrap();
        let err = table
            .insert("/dup", |_req: Request| async { Reply::text("two") })
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateRoute(path) if path == "/dup"));
    }

    #[tokio::test]
    async fn hit_invokes_handler_once_and_renders() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut table = RouteTable::new();
        let counter = Arc::clone(&calls);
        table
            .insert("/hello", move |_req: Request| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Reply::text("hi")
                }
            })
            .unwrap();

        let pipeline = Pipeline::new(vec![Arc::new(Routes::new(table))]);
        let ctx = pipeline.dispatch(ctx("/hello")).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(ctx.response().status(), StatusCode::OK);
        assert!(ctx.response().has_body());
    }

    #[tokio::test]
    async fn miss_sets_404_without_body_and_continues() {
        let seen = Arc::new(Mutex::new(None));
        let observer = {
            let seen = Arc::clone(&seen);
            from_fn(move |ctx: Context, next: Next| {
                let seen = Arc::clone(&seen);
                async move {
                    *seen.lock().unwrap() = Some((ctx.response().status(), ctx.response().has_body()));
                    next.run(ctx).await
                }
            })
        };

        let pipeline = Pipeline::new(vec![
            Arc::new(Routes::new(RouteTable::new())),
            Arc::new(observer),
        ]);
        let ctx = pipeline.dispatch(ctx("/nowhere")).await;

        assert_eq!(ctx.response().status(), StatusCode::NOT_FOUND);
        assert!(!ctx.response().has_body());
        assert_eq!(*seen.lock().unwrap(), Some((StatusCode::NOT_FOUND, false)));
    }

    #[tokio::test]
    async fn lookup_is_exact_and_case_sensitive() {
        let mut table = RouteTable::new();
        table.insert("/users", |_req: Request| async { Reply::text("list") }).unwrap();

        assert!(table.lookup("/users").is_some());
        assert!(table.lookup("/Users").is_none());
        assert!(table.lookup("/users/").is_none());
        assert!(table.lookup("/users/1").is_none());
    }
}
