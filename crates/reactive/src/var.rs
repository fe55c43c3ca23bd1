//! Reactive variables
//!
//! A `ReactiveVar` is a shared cell with a default value. Every `set`
//! notifies subscribers synchronously with the new value, including when the
//! new value equals the old one. Clones share the same cell.

use crate::listeners::{ListenerSet, Subscription};
use parking_lot::{ReentrantMutex, RwLock};
use std::sync::Arc;
use tracing::trace;

struct Inner<T> {
    name: &'static str,
    value: RwLock<T>,
    updating: ReentrantMutex<()>,
    default: T,
    listeners: ListenerSet<T>,
}

/// Observable value cell
pub struct ReactiveVar<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for ReactiveVar<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> ReactiveVar<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a variable holding `default`
    pub fn new(name: &'static str, default: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                name,
                value: RwLock::new(default.clone()),
                updating: ReentrantMutex::new(()),
                default,
                listeners: ListenerSet::new(),
            }),
        }
    }

    /// Name used in logs
    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    /// Current value
    pub fn get(&self) -> T {
        self.inner.value.read().clone()
    }

    /// Run `f` against the current value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.read())
    }

    /// Replace the value and notify subscribers
    pub fn set(&self, value: T) {
        {
            let mut slot = self.inner.value.write();
            *slot = value.clone();
        }
        trace!(target: "boxcache::reactive", var = self.inner.name, "set");
        self.inner.listeners.notify(&value);
    }

    /// Derive the next value from the current one
    ///
    /// Updates are serialized against each other, but `f` runs without the
    /// value lock, so it may read this variable or update it again on the
    /// same thread. A plain `set` racing with `f` is overwritten.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = {
            let _turn = self.inner.updating.lock();
            let next = f(&self.get());
            *self.inner.value.write() = next.clone();
            next
        };
        trace!(target: "boxcache::reactive", var = self.inner.name, "update");
        self.inner.listeners.notify(&next);
    }

    /// Restore the default value
    pub fn reset(&self) {
        self.set(self.inner.default.clone());
    }

    /// Value the variable was created with
    pub fn default_value(&self) -> &T {
        &self.inner.default
    }

    /// Register a listener for future changes
    ///
    /// The listener is not called with the current value.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.inner.listeners.add(listener)
    }

    /// Number of active listeners
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ReactiveVar<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactiveVar")
            .field("name", &self.inner.name)
            .field("value", &*self.inner.value.read())
            .finish()
    }
}
