//! Loopback HTTP receiver for status pushes from the in-game mod.
//!
//! Each overlay process runs one receiver with exactly one route. A `POST`
//! to that route always gets `200 OK`, even when the body cannot be parsed:
//! the mod fires and forgets, and a bad payload must never stall it.
//! Everything else is `404`.

use crate::hud::keystrokes::KeystrokeState;
use crate::hud::store::StatusStore;
use crate::models::KeyEvent;
use anyhow::{Context, Result};
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

type HandlerFn = dyn Fn(&[u8]) -> Result<(), serde_json::Error> + Send + Sync;

/// One route and what to do with its JSON bodies
#[derive(Clone)]
pub struct StatusReceiver {
    route: &'static str,
    handler: Arc<HandlerFn>,
}

impl StatusReceiver {
    pub fn new(
        route: &'static str,
        handler: impl Fn(&[u8]) -> Result<(), serde_json::Error> + Send + Sync + 'static,
    ) -> Self {
        Self {
            route,
            handler: Arc::new(handler),
        }
    }

    /// Receiver that parses each body as `T` and replaces the snapshot
    pub fn replacing<T>(route: &'static str, store: StatusStore<T>) -> Self
    where
        T: DeserializeOwned + Send + 'static,
    {
        Self::new(route, move |body| {
            let status: T = serde_json::from_slice(body)?;
            store.replace(status);
            Ok(())
        })
    }

    /// Receiver that feeds key events into the keystroke state
    pub fn keystrokes(route: &'static str, store: StatusStore<KeystrokeState>) -> Self {
        Self::new(route, move |body| {
            let event: KeyEvent = serde_json::from_slice(body)?;
            store.update(|state| state.apply(event));
            Ok(())
        })
    }

    pub fn route(&self) -> &'static str {
        self.route
    }

    async fn handle(&self, req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
        if req.method() != Method::POST || req.uri().path() != self.route {
            tracing::debug!("Rejecting {} {}", req.method(), req.uri().path());
            return Ok(text_response(StatusCode::NOT_FOUND, "Not Found"));
        }

        match req.into_body().collect().await {
            Ok(collected) => {
                let body = collected.to_bytes();
                if let Err(e) = (self.handler)(&body[..]) {
                    tracing::warn!("Ignoring bad payload on {}: {}", self.route, e);
                }
            }
            Err(e) => tracing::warn!("Failed to read body on {}: {}", self.route, e),
        }

        Ok(text_response(StatusCode::OK, "OK"))
    }
}

fn text_response(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(body.as_bytes())));
    *response.status_mut() = status;
    response
}

/// Accept connections on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    receiver: StatusReceiver,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    tokio::pin!(shutdown);

    loop {
        let (stream, peer) = tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Status receiver for {} shutting down", receiver.route);
                return Ok(());
            }
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::warn!("Failed to accept connection: {}", e);
                    continue;
                }
            },
        };

        let receiver = receiver.clone();
        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let receiver = receiver.clone();
                async move { receiver.handle(req).await }
            });

            if let Err(e) = http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                tracing::debug!("Connection from {} ended with error: {}", peer, e);
            }
        });
    }
}

/// A receiver running on its own thread with its own tokio runtime.
pub struct ReceiverHandle {
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl ReceiverHandle {
    /// Address actually bound, useful when the configured port was 0
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and join the thread
    pub fn stop(mut self) {
        self.shutdown_and_join();
    }

    fn shutdown_and_join(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("Status receiver thread panicked");
            }
        }
    }
}

impl Drop for ReceiverHandle {
    fn drop(&mut self) {
        self.shutdown_and_join();
    }
}

async fn bind(addr: SocketAddr) -> Result<(TcpListener, SocketAddr)> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    let local_addr = listener
        .local_addr()
        .context("Failed to read bound address")?;
    Ok((listener, local_addr))
}

/// Bind `addr` and serve `receiver` from a background thread.
///
/// Returns once the socket is bound, so a port conflict is reported to the
/// caller instead of disappearing inside the thread.
pub fn spawn_receiver(addr: SocketAddr, receiver: StatusReceiver) -> Result<ReceiverHandle> {
    let (bound_tx, bound_rx) = std::sync::mpsc::channel::<Result<SocketAddr>>();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let route = receiver.route;

    let thread = std::thread::Builder::new()
        .name(format!("status-receiver{}", route.replace('/', "-")))
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    let err = anyhow::Error::new(e).context("Failed to build tokio runtime");
                    let _ = bound_tx.send(Err(err));
                    return;
                }
            };

            runtime.block_on(async move {
                let (listener, local_addr) = match bind(addr).await {
                    Ok(bound) => bound,
                    Err(e) => {
                        let _ = bound_tx.send(Err(e));
                        return;
                    }
                };
                let _ = bound_tx.send(Ok(local_addr));

                tracing::info!("Status receiver listening on http://{}{}", local_addr, route);
                let shutdown = async {
                    let _ = shutdown_rx.await;
                };
                if let Err(e) = serve(listener, receiver, shutdown).await {
                    tracing::error!("Status receiver failed: {:#}", e);
                }
            });
        })
        .context("Failed to spawn status receiver thread")?;

    let local_addr = bound_rx
        .recv()
        .context("Status receiver thread exited before binding")??;

    Ok(ReceiverHandle {
        local_addr,
        shutdown: Some(shutdown_tx),
        thread: Some(thread),
    })
}
