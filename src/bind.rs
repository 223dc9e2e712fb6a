//! Typed query-parameter binding.
//!
//! [`query`] turns a handler over one strongly-typed value into an ordinary
//! route handler: it reads the named query-string entry, parses it with the
//! type's [`FromStr`] impl (locale-independent by construction), and invokes
//! the wrapped handler with the parsed value. A missing or unparsable
//! parameter never reaches the handler — it becomes a `400` with a short
//! explanation, and never a crash.
//!
//! The parameter name is an explicit argument; exactly one parameter is
//! bound. Handlers needing more than one value take the [`Request`] directly
//! and call [`Request::query`] themselves.

use std::future::Future;
use std::str::FromStr;

use crate::handler::{Handler, ReplyFuture};
use crate::reply::{IntoReply, Reply};
use crate::request::Request;

/// Binds one typed query parameter in front of `handler`.
///
/// ```rust,no_run
/// use pylon::{App, Reply, bind};
///
/// let app = App::new()
///     .route("/echo", bind::query("x", |x: i32| async move {
///         Reply::text(x.to_string())
///     }))
///     .unwrap();
/// ```
///
/// `GET /echo?x=42` → `200` with body `42`.
/// `GET /echo?x=notanumber` and `GET /echo` → `400`.
pub fn query<T, F, Fut, R>(name: impl Into<String>, handler: F) -> impl Handler
where
    T: FromStr + Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoReply + Send + 'static,
{
    let name = name.into();
    move |req: Request| -> ReplyFuture {
        match req.query(&name) {
            None => {
                let message = format!("missing query parameter `{name}`");
                Box::pin(async move { Reply::bad_request(message) })
            }
            Some(raw) => match raw.parse::<T>() {
                Ok(value) => {
                    let fut = handler(value);
                    Box::pin(async move { fut.await.into_reply() })
                }
                Err(_) => {
                    let message = format!("invalid value for query parameter `{name}`");
                    Box::pin(async move { Reply::bad_request(message) })
                }
            },
        }
    }
}
