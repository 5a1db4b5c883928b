use parking_lot::Mutex;
use std::sync::Arc;

/// Latest status snapshot shared between the HTTP receiver and the GUI timer.
///
/// Cloning the store clones the handle, not the data. All access goes
/// through one mutex and never holds it across an await or a redraw.
#[derive(Debug, Default)]
pub struct StatusStore<T> {
    inner: Arc<Mutex<T>>,
}

impl<T> Clone for StatusStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> StatusStore<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(initial)),
        }
    }

    /// Swap in a new snapshot. Latest write wins.
    pub fn replace(&self, value: T) {
        *self.inner.lock() = value;
    }

    /// Mutate the snapshot in place and return whatever `f` returns
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Read through a closure without cloning
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.lock())
    }
}

impl<T: Clone> StatusStore<T> {
    pub fn snapshot(&self) -> T {
        self.inner.lock().clone()
    }
}
