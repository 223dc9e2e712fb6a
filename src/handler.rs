//! Handler trait and type erasure.
//!
//! The route table holds handlers of *different* concrete types in one map,
//! so each handler is erased behind `Arc<dyn ErasedHandler>`:
//!
//! ```text
//! async fn hello(req: Request) -> Reply { … }     ← user writes this
//!        ↓ app.route("/hello", hello)
//! hello.into_boxed_handler()                      ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(hello))                      ← stored as BoxedHandler
//!        ↓
//! handler.call(req)  at request time              ← one vtable dispatch
//! ```
//!
//! Runtime cost per request: one `Arc` clone plus one virtual call.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::reply::{IntoReply, Reply};
use crate::request::Request;

/// A heap-allocated, type-erased future resolving to a [`Reply`].
pub(crate) type ReplyFuture = Pin<Box<dyn Future<Output = Reply> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// return type of [`Handler::into_boxed_handler`]. External crates cannot
/// usefully interact with it.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> ReplyFuture;
}

/// A type-erased handler shared read-only across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

/// Implemented for every valid route handler.
///
/// You never implement this yourself. It is automatically satisfied for any
/// `async fn` with the signature:
///
/// ```text
/// async fn name(req: Request) -> impl IntoReply
/// ```
///
/// The trait is sealed: only the blanket impl below can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoReply + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoReply + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

/// Newtype bridging a concrete handler `F` into the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoReply + Send + 'static,
{
    fn call(&self, req: Request) -> ReplyFuture {
        // The wrapped call returns the concrete `Fut`; box it and map the
        // output through `IntoReply` so the trait signature lines up.
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_reply() })
    }
}
