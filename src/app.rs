//! Application setup.
//!
//! An [`App`] collects routes and middleware before the server starts. All
//! registration happens here, once; after [`Server::serve`](crate::Server::serve)
//! takes the app, the table and chain are frozen and shared read-only across
//! every connection task.

use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use crate::bind;
use crate::error::Error;
use crate::handler::Handler;
use crate::middleware::NotFoundPage;
use crate::pipeline::{BoxMiddleware, Middleware, Pipeline};
use crate::reply::IntoReply;
use crate::routes::{RouteTable, Routes};

/// Routes plus middleware, assembled before serving.
///
/// ```rust,no_run
/// use pylon::{App, Reply, Request, middleware};
///
/// # fn build() -> Result<App, pylon::Error> {
/// let app = App::new()
///     .wrap(middleware::Trace)
///     .route("/hello", hello)?
///     .route_query("/echo", "x", |x: i32| async move { Reply::text(x.to_string()) })?;
/// # Ok(app)
/// # }
///
/// async fn hello(_req: Request) -> &'static str {
///     "hello"
/// }
/// ```
///
/// At serve time the pipeline is composed as: your middleware in
/// registration order (first = outermost), then the routing stage, then the
/// not-found page stage innermost.
pub struct App {
    routes: RouteTable,
    chain: Vec<BoxMiddleware>,
    not_found_page: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self { routes: RouteTable::new(), chain: Vec::new(), not_found_page: None }
    }

    /// Registers a handler for an exact path. Registering the same path
    /// twice fails with [`Error::DuplicateRoute`].
    pub fn route(mut self, path: &str, handler: impl Handler) -> Result<Self, Error> {
        self.routes.insert(path, handler)?;
        Ok(self)
    }

    /// Registers a handler that takes one typed query parameter.
    ///
    /// Shorthand for `route(path, bind::query(name, handler))`; see
    /// [`bind::query`] for the binding rules.
    pub fn route_query<T, F, Fut, R>(
        self,
        path: &str,
        name: impl Into<String>,
        handler: F,
    ) -> Result<Self, Error>
    where
        T: FromStr + Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoReply + Send + 'static,
    {
        self.route(path, bind::query(name, handler))
    }

    /// Appends a middleware to the chain. The first middleware registered is
    /// the outermost stage; order is preserved and is the semantics.
    pub fn wrap(mut self, middleware: impl Middleware) -> Self {
        self.chain.push(Arc::new(middleware));
        self
    }

    /// Replaces the built-in 404 HTML page.
    pub fn not_found_page(mut self, page: impl Into<String>) -> Self {
        self.not_found_page = Some(page.into());
        self
    }

    pub(crate) fn into_pipeline(self) -> Pipeline {
        let mut stack = self.chain;
        stack.push(Arc::new(Routes::new(self.routes)));
        stack.push(Arc::new(match self.not_found_page {
            Some(page) => NotFoundPage::with_page(page),
            None => NotFoundPage::new(),
        }));
        Pipeline::new(stack)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use http::{HeaderMap, Method, StatusCode, Uri};

    use super::*;
    use crate::context::Context;
    use crate::reply::Reply;
    use crate::request::Request;

    fn ctx(path: &str) -> Context {
        Context::new(Request::new(Method::GET, &path.parse::<Uri>().unwrap(), HeaderMap::new()))
    }

    #[test]
    fn duplicate_route_fails_setup() {
        let result = App::new()
            .route("/dup", |_req: Request| async { Reply::text("one") })
            .unwrap()
            .route("/dup", |_req: Request| async { Reply::text("two") });
        assert!(matches!(result, Err(Error::DuplicateRoute(_))));
    }

    #[tokio::test]
    async fn composed_pipeline_serves_routes_and_404s() {
        let app = App::new()
            .route("/hello", |_req: Request| async { Reply::text("hi") })
            .unwrap();
        let pipeline = app.into_pipeline();

        let hit = pipeline.dispatch(ctx("/hello")).await;
        assert_eq!(hit.response().status(), StatusCode::OK);

        let miss = pipeline.dispatch(ctx("/nope")).await;
        assert_eq!(miss.response().status(), StatusCode::NOT_FOUND);
        assert!(miss.response().has_body());
    }

    #[tokio::test]
    async fn typed_route_round_trips() {
        let app = App::new()
            .route_query("/echo", "x", |x: i32| async move { Reply::text(x.to_string()) })
            .unwrap();
        let pipeline = app.into_pipeline();

        let ok = pipeline.dispatch(ctx("/echo?x=42")).await;
        assert_eq!(ok.response().status(), StatusCode::OK);

        let bad = pipeline.dispatch(ctx("/echo?x=notanumber")).await;
        assert_eq!(bad.response().status(), StatusCode::BAD_REQUEST);
    }
}
