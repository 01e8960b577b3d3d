//! Ordered callback registry
//!
//! Handles compare by identity, so the same handle can be registered twice
//! and removed one entry at a time.

use crate::payload::EventPayload;
use std::fmt;
use std::sync::Arc;

/// Outcome of a single callback invocation
pub type CallbackResult = anyhow::Result<()>;

/// Shared handle to a subscriber function.
///
/// Handles compare by identity: two clones of one handle are equal, two
/// handles built from identical closures are not.
pub struct Callback<P = EventPayload> {
    func: Arc<dyn Fn(&P) -> CallbackResult + Send + Sync>,
}

impl<P> Callback<P> {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&P) -> CallbackResult + Send + Sync + 'static,
    {
        Self { func: Arc::new(func) }
    }

    pub fn call(&self, payload: &P) -> CallbackResult {
        (self.func)(payload)
    }

    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl<P> Clone for Callback<P> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
        }
    }
}

impl<P> PartialEq for Callback<P> {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl<P> fmt::Debug for Callback<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Arc::as_ptr(&self.func))
    }
}

/// Ordered list of subscribers fanned out to on every inbound payload
#[derive(Debug)]
pub struct DispatchRegistry<P = EventPayload> {
    callbacks: Vec<Callback<P>>,
}

impl<P> Default for DispatchRegistry<P> {
    fn default() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }
}

impl<P> DispatchRegistry<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `callback`. Registering the same handle twice gives two entries.
    pub fn register(&mut self, callback: Callback<P>) {
        self.callbacks.push(callback);
    }

    /// Remove the first entry that is `callback`. Missing handles are ignored.
    pub fn unregister(&mut self, callback: &Callback<P>) {
        if let Some(index) = self.callbacks.iter().position(|c| c.same_as(callback)) {
            self.callbacks.remove(index);
        } else {
            tracing::debug!("Ignoring removal of unregistered {:?}", callback);
        }
    }

    /// Single-call form used by the host surface: add, or remove when `remove` is set.
    pub fn register_callback(&mut self, callback: Callback<P>, remove: bool) {
        if remove {
            self.unregister(&callback);
        } else {
            self.register(callback);
        }
    }

    pub fn reset(&mut self) {
        self.callbacks.clear();
    }

    pub fn callbacks(&self) -> &[Callback<P>] {
        &self.callbacks
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Copy of the current list; what a dispatch starting now would call.
    pub fn snapshot(&self) -> Vec<Callback<P>> {
        self.callbacks.clone()
    }

    /// Call every registered callback in order with `payload`.
    ///
    /// The first failure stops delivery and is returned unchanged.
    pub fn dispatch(&self, payload: &P) -> CallbackResult {
        invoke_all(&self.snapshot(), payload)
    }
}

/// Run `callbacks` in order, stopping at the first error.
pub fn invoke_all<P>(callbacks: &[Callback<P>], payload: &P) -> CallbackResult {
    for callback in callbacks {
        callback.call(payload)?;
    }
    Ok(())
}
