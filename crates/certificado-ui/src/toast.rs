//! Toast queue with timed, cancellable dismissal.
//!
//! Toasts are kept in insertion order. Every pushed toast gets a tokio task
//! keyed by its id that removes it once its duration elapses. Removing a toast
//! (by hand or by timer) is idempotent, and shutting the queue down (or
//! dropping its last handle) aborts every pending timer so nothing fires
//! against a torn-down view.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use certificado_core::{Toast, ToastKind};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
struct ToastState {
    toasts: Vec<Toast>,
    timers: HashMap<String, JoinHandle<()>>,
}

impl Drop for ToastState {
    fn drop(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.abort();
        }
    }
}

/// Shared handle to a view's toast queue. Clones refer to the same queue.
#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    inner: Arc<Mutex<ToastState>>,
}

fn lock(inner: &Mutex<ToastState>) -> MutexGuard<'_, ToastState> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a toast and schedule its dismissal. Returns its id.
    ///
    /// Outside a tokio runtime no timer is scheduled and the toast stays until
    /// removed explicitly.
    pub fn push(&self, toast: Toast) -> String {
        let id = toast.id.clone();
        let duration = toast.duration();

        tracing::debug!(
            toast.id = %id,
            toast.kind = ?toast.kind,
            toast.title = %toast.title,
            "Showing toast"
        );

        // The lock is held while spawning so the timer cannot run before it is registered.
        let mut state = lock(&self.inner);
        state.toasts.push(toast);

        match Handle::try_current() {
            Ok(handle) => {
                let queue = Arc::downgrade(&self.inner);
                let timer_id = id.clone();
                let timer = handle.spawn(async move {
                    tokio::time::sleep(duration).await;
                    expire(queue, &timer_id);
                });
                if let Some(previous) = state.timers.insert(id.clone(), timer) {
                    previous.abort();
                }
            }
            Err(_) => {
                tracing::debug!(toast.id = %id, "No runtime available, toast will not auto-dismiss");
            }
        }

        id
    }

    pub fn notify(&self, kind: ToastKind, title: &str, message: &str) -> String {
        self.push(Toast::new(kind, title, message))
    }

    pub fn success(&self, title: &str, message: &str) -> String {
        self.notify(ToastKind::Success, title, message)
    }

    pub fn error(&self, title: &str, message: &str) -> String {
        self.notify(ToastKind::Error, title, message)
    }

    pub fn warning(&self, title: &str, message: &str) -> String {
        self.notify(ToastKind::Warning, title, message)
    }

    pub fn info(&self, title: &str, message: &str) -> String {
        self.notify(ToastKind::Info, title, message)
    }

    /// Remove a toast and cancel its timer. Returns `false` if it was already gone.
    pub fn remove(&self, id: &str) -> bool {
        let mut state = lock(&self.inner);
        if let Some(timer) = state.timers.remove(id) {
            timer.abort();
        }
        let before = state.toasts.len();
        state.toasts.retain(|toast| toast.id != id);
        before != state.toasts.len()
    }

    /// Cancel all pending dismissals and clear the queue.
    pub fn shutdown(&self) {
        let mut state = lock(&self.inner);
        let pending = state.timers.len();
        for (_, timer) in state.timers.drain() {
            timer.abort();
        }
        state.toasts.clear();
        tracing::debug!(pending, "Toast queue shut down");
    }

    /// Current toasts, oldest first.
    pub fn toasts(&self) -> Vec<Toast> {
        lock(&self.inner).toasts.clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pending_timers(&self) -> usize {
        lock(&self.inner).timers.len()
    }
}

fn expire(queue: Weak<Mutex<ToastState>>, id: &str) {
    let Some(inner) = queue.upgrade() else {
        return;
    };
    let mut state = lock(&inner);
    state.timers.remove(id);
    state.toasts.retain(|toast| toast.id != id);
    tracing::trace!(toast.id = %id, "Toast expired");
}
