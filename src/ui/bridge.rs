// EventLoopBridge - Hands work between the tokio runtime and the Slint event loop
//
// The launcher runs its blocking jobs (client install, Java probe, process
// spawning) on tokio and only touches the window from the Slint thread. The
// bridge is the one place that crosses between the two.

use slint::{ComponentHandle, Weak};
use std::future::Future;
use tokio::sync::mpsc;

type UiUpdate<T> = Box<dyn FnOnce(&T) + Send>;

/// Pending UI updates are bounded so a stalled window cannot grow memory
const UI_UPDATE_CAPACITY: usize = 100;

/// Coordinates between the tokio runtime and a Slint component.
///
/// - [`update_ui()`](Self::update_ui) queues a closure to run on the Slint thread
/// - [`spawn_async()`](Self::spawn_async) runs a future on tokio from a Slint callback
///
/// # Example
/// ```ignore
/// let bridge = EventLoopBridge::new(&ui, runtime.handle().clone());
/// let handle = bridge.clone_handle();
///
/// bridge.spawn_async(move || async move {
///     let version = probe_java_version("java").await;
///     handle.update_ui(move |ui| ui.set_status_message(format!("{:?}", version).into()));
/// });
/// ```
pub struct EventLoopBridge<T: ComponentHandle> {
    ui_weak: Weak<T>,
    tokio_handle: tokio::runtime::Handle,
    ui_update_tx: mpsc::Sender<UiUpdate<T>>,
}

impl<T: ComponentHandle + 'static> EventLoopBridge<T> {
    /// Create the bridge and its forwarding thread.
    ///
    /// The thread drains queued updates into `upgrade_in_event_loop` and exits
    /// once the event loop is gone or every sender is dropped.
    pub fn new(ui: &T, tokio_handle: tokio::runtime::Handle) -> Self {
        let ui_weak = ui.as_weak();
        let (ui_update_tx, mut ui_update_rx) = mpsc::channel::<UiUpdate<T>>(UI_UPDATE_CAPACITY);

        let forward_weak = ui_weak.clone();
        std::thread::spawn(move || {
            tracing::debug!("EventLoopBridge handler thread started");

            while let Some(update_fn) = ui_update_rx.blocking_recv() {
                let result = forward_weak.upgrade_in_event_loop(move |ui| {
                    update_fn(&ui);
                });

                if let Err(e) = result {
                    tracing::warn!("Failed to queue UI update to event loop: {:?}", e);
                    break;
                }
            }

            tracing::debug!("EventLoopBridge handler thread terminated");
        });

        Self {
            ui_weak,
            tokio_handle,
            ui_update_tx,
        }
    }

    /// Schedule a UI update from any thread
    pub fn update_ui<F>(&self, update: F)
    where
        F: FnOnce(&T) + Send + 'static,
    {
        send_update(&self.ui_update_tx, Box::new(update));
    }

    /// Spawn an async task on the tokio runtime from a Slint callback
    pub fn spawn_async<F, Fut>(&self, future_factory: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.tokio_handle.spawn(async move {
            future_factory().await;
        });
    }

    /// Cloneable handle for capturing in several callbacks
    pub fn clone_handle(&self) -> EventLoopBridgeHandle<T> {
        EventLoopBridgeHandle {
            ui_weak: self.ui_weak.clone(),
            tokio_handle: self.tokio_handle.clone(),
            ui_update_tx: self.ui_update_tx.clone(),
        }
    }
}

/// Lightweight, cloneable view of an [`EventLoopBridge`]
pub struct EventLoopBridgeHandle<T: ComponentHandle> {
    ui_weak: Weak<T>,
    tokio_handle: tokio::runtime::Handle,
    ui_update_tx: mpsc::Sender<UiUpdate<T>>,
}

// Manual Clone implementation to avoid requiring T: Clone
impl<T: ComponentHandle> Clone for EventLoopBridgeHandle<T> {
    fn clone(&self) -> Self {
        Self {
            ui_weak: self.ui_weak.clone(),
            tokio_handle: self.tokio_handle.clone(),
            ui_update_tx: self.ui_update_tx.clone(),
        }
    }
}

impl<T: ComponentHandle + 'static> EventLoopBridgeHandle<T> {
    /// See [`EventLoopBridge::update_ui`]
    pub fn update_ui<F>(&self, update: F)
    where
        F: FnOnce(&T) + Send + 'static,
    {
        send_update(&self.ui_update_tx, Box::new(update));
    }

    /// See [`EventLoopBridge::spawn_async`]
    pub fn spawn_async<F, Fut>(&self, future_factory: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.tokio_handle.spawn(async move {
            future_factory().await;
        });
    }

    /// Run a blocking job on tokio's blocking pool
    pub fn spawn_blocking<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.tokio_handle.spawn_blocking(job);
    }

    pub fn ui_weak(&self) -> &Weak<T> {
        &self.ui_weak
    }
}

fn send_update<T>(tx: &mpsc::Sender<UiUpdate<T>>, update: UiUpdate<T>) {
    match tx.try_send(update) {
        Ok(()) => {}
        Err(mpsc::error::TrySendError::Full(_)) => {
            tracing::warn!("UI update channel full - skipping update to prevent backpressure");
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            tracing::warn!("Failed to send UI update - handler thread has stopped");
        }
    }
}
