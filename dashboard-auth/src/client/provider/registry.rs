use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, Weak};

use super::lock;
use crate::common::Identity;

type Listener = Box<dyn FnMut(Option<Identity>) + Send>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: BTreeMap<u64, Arc<Mutex<Listener>>>,
}

/// Callback registry backing a provider's auth state stream
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Arc<Mutex<Listeners>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(Option<Identity>) + Send + 'static,
    {
        self.insert(Arc::new(Mutex::new(Box::new(listener) as Listener)))
    }

    /// Register `listener` and hand it `current()` before any later notification.
    ///
    /// `current` is read after the listener is in the registry, so a change
    /// racing with registration is either seen by `current` or delivered after it.
    pub fn register_and_deliver<F, C>(&self, listener: F, current: C) -> Subscription
    where
        F: FnMut(Option<Identity>) + Send + 'static,
        C: FnOnce() -> Option<Identity>,
    {
        let entry = Arc::new(Mutex::new(Box::new(listener) as Listener));
        // Concurrent notifications queue on this lock until the first delivery is done
        let mut callback = lock(&entry);
        let subscription = self.insert(entry.clone());
        (*callback)(current());
        drop(callback);
        subscription
    }

    fn insert(&self, entry: Arc<Mutex<Listener>>) -> Subscription {
        let id = {
            let mut listeners = lock(&self.inner);
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.insert(id, entry);
            id
        };
        tracing::trace!(listener_id = id, "Auth state listener registered");

        let registry: Weak<Mutex<Listeners>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = registry.upgrade() {
                lock(&inner).entries.remove(&id);
                tracing::trace!(listener_id = id, "Auth state listener removed");
            }
        })
    }

    /// Deliver `identity` to every registered listener, in registration order
    pub fn notify(&self, identity: Option<Identity>) {
        let snapshot: Vec<(u64, Arc<Mutex<Listener>>)> = lock(&self.inner)
            .entries
            .iter()
            .map(|(id, listener)| (*id, listener.clone()))
            .collect();

        for (id, listener) in snapshot {
            // A listener may have been cancelled by an earlier one in this round
            if !lock(&self.inner).entries.contains_key(&id) {
                continue;
            }
            let mut callback = lock(&listener);
            (*callback)(identity.clone());
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle for a registered listener. Cancelling or dropping it unregisters the listener.
#[must_use = "dropping a Subscription unregisters its listener"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new<F>(cancel: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        self.unregister();
    }

    fn unregister(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unregister();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
