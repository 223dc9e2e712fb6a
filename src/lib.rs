//! # pylon
//!
//! A minimal HTTP framework built around one idea: the request pipeline is
//! an ordered chain of middleware, and everything else — routing, typed
//! parameters, the 404 page — is just another stage in it.
//!
//! ## The model
//!
//! Each middleware wraps the rest of the pipeline. It runs before the inner
//! stages on the way in, and after them on the way out, in strict
//! registration order — the first middleware registered is the outermost:
//!
//! ```text
//! trace in → auth in → routing → auth out → trace out
//! ```
//!
//! Routing is exact-match by path. Handlers return a [`Reply`] — an
//! immutable value that knows how to render itself — and the routing stage
//! writes it onto the response. Unmatched paths fall through as a bare
//! `404` for the not-found stage to dress up.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use pylon::{App, Reply, Request, Server, middleware};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), pylon::Error> {
//!     let app = App::new()
//!         .wrap(middleware::Trace)
//!         .route("/hello", hello)?
//!         .route_query("/echo", "x", |x: i32| async move {
//!             Reply::text(x.to_string())
//!         })?;
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await
//! }
//!
//! async fn hello(_req: Request) -> Reply {
//!     Reply::text("hello")
//! }
//! ```
//!
//! Stop the server with Ctrl-C / SIGTERM, or programmatically:
//!
//! ```rust,no_run
//! # use pylon::{App, Server};
//! # async fn run() -> Result<(), pylon::Error> {
//! let server = Server::bind("0.0.0.0:3000");
//! let shutdown = server.shutdown_handle();
//! // … hand `shutdown` to whatever decides when to stop …
//! shutdown.stop(); // idempotent, safe from any task
//! # server.serve(App::new()).await
//! # }
//! ```

mod app;
mod context;
mod error;
mod handler;
mod pipeline;
mod reply;
mod request;
mod response;
mod routes;
mod server;

pub mod bind;
pub mod middleware;

pub use app::App;
pub use context::Context;
pub use error::Error;
pub use handler::Handler;
pub use pipeline::{BoxFuture, FnMiddleware, Middleware, Next, from_fn};
pub use reply::{IntoReply, Reply};
pub use request::Request;
pub use response::ResponseState;
pub use server::{Server, Shutdown};

pub use http::{Method, StatusCode};
