//! HTTP server, accept loop, and shutdown.
//!
//! The server owns an explicit, cancellable accept loop: each iteration
//! `select!`s over the OS shutdown signal (SIGTERM / Ctrl-C), the
//! programmatic [`Shutdown`] channel, and the next incoming connection.
//! Stopping — by signal or by [`Shutdown::stop`] — closes the listener
//! immediately, lets every in-flight connection task run to completion, and
//! then returns from [`Server::serve`].

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};

use crate::app::App;
use crate::context::Context;
use crate::error::Error;
use crate::pipeline::Pipeline;
use crate::request::Request;

/// Handle for stopping a running server from another task.
///
/// Obtained from [`Server::shutdown_handle`] before `serve` consumes the
/// server. [`stop`](Shutdown::stop) is idempotent: calling it on an
/// already-stopped server does nothing, and it is safe to call concurrently
/// with in-flight request processing.
#[derive(Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    /// Signals the server to stop accepting connections.
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }
}

/// The HTTP server.
pub struct Server {
    binding: Binding,
    shutdown_tx: Arc<watch::Sender<bool>>,
    shutdown_rx: watch::Receiver<bool>,
}

enum Binding {
    Addr(SocketAddr),
    Listener(TcpListener),
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called.
    ///
    /// # Panics
    ///
    /// Panics if `addr` is not a valid `host:port` string.
    pub fn bind(addr: &str) -> Self {
        let addr: SocketAddr = addr.parse().expect("invalid socket address");
        Self::with_binding(Binding::Addr(addr))
    }

    /// Serves on an already-bound listener.
    ///
    /// Useful for socket activation and for tests that bind to port 0 and
    /// read the assigned address back before serving.
    pub fn from_listener(listener: TcpListener) -> Self {
        Self::with_binding(Binding::Listener(listener))
    }

    fn with_binding(binding: Binding) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self { binding, shutdown_tx: Arc::new(shutdown_tx), shutdown_rx }
    }

    /// Returns a clonable handle that stops this server.
    pub fn shutdown_handle(&self) -> Shutdown {
        Shutdown { tx: Arc::clone(&self.shutdown_tx) }
    }

    /// Starts accepting connections and dispatching them through `app`'s
    /// pipeline.
    ///
    /// Returns after a shutdown signal, an OS signal, and after all
    /// in-flight connections have completed.
    pub async fn serve(self, app: App) -> Result<(), Error> {
        let listener = match self.binding {
            Binding::Listener(listener) => listener,
            Binding::Addr(addr) => TcpListener::bind(addr).await?,
        };

        // Composed once; shared read-only across connection tasks.
        let pipeline = Arc::new(app.into_pipeline());

        info!(addr = %listener.local_addr()?, "pylon listening");

        // Keep a sender alive for the whole serve call so the stop channel
        // stays open even when no handle was taken.
        let _shutdown_tx = self.shutdown_tx;
        let mut stop_rx = self.shutdown_rx;

        // JoinSet tracks every spawned connection task so we can wait for
        // them all to finish while draining.
        let mut tasks = tokio::task::JoinSet::new();

        let signal = shutdown_signal();
        tokio::pin!(signal);

        loop {
            tokio::select! {
                // `biased` checks arms top-to-bottom: a stop request wins
                // over queued connections.
                biased;

                () = &mut signal => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow_and_update() {
                        info!(in_flight = tasks.len(), "stop requested, draining connections");
                        break;
                    }
                }

                accepted = listener.accept() => {
                    let (stream, remote_addr) = match accepted {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let pipeline = Arc::clone(&pipeline);
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        // `service_fn` runs once per request on the
                        // connection, not once per connection.
                        let svc = service_fn(move |req| {
                            let pipeline = Arc::clone(&pipeline);
                            async move { dispatch(pipeline, req).await }
                        });

                        // auto::Builder speaks both HTTP/1.1 and HTTP/2,
                        // whatever the client negotiates.
                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                // Reap finished connection tasks so the JoinSet does not
                // grow without bound.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        // Stop accepting before draining.
        drop(listener);
        while tasks.join_next().await.is_some() {}

        info!("pylon stopped");
        Ok(())
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Core hot path: one request in, one response out.
///
/// The error type is [`Infallible`](std::convert::Infallible) — every
/// failure is converted into a response somewhere in the pipeline, so hyper
/// never sees an error and the connection is never reset by us.
async fn dispatch(
    pipeline: Arc<Pipeline>,
    req: hyper::Request<hyper::body::Incoming>,
) -> Result<http::Response<Full<Bytes>>, std::convert::Infallible> {
    let (parts, _body) = req.into_parts();
    let request = Request::new(parts.method, &parts.uri, parts.headers);

    let ctx = pipeline.dispatch(Context::new(request)).await;

    Ok(ctx.into_response().into_http())
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal the process receives.
///
/// On Unix this listens for both SIGTERM and SIGINT (Ctrl-C); on Windows
/// only Ctrl-C is available.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c  => {}
        () = sigterm => {}
    }
}
