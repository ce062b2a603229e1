//! Change notifications, so that UI layers can re-render without polling
//!
//! Every store owns a [`ChangeNotifier`], made of three [`Channel`]s (created, updated, deleted).
//! Publishing is synchronous: subscribers run on the caller's thread, right after the store mutation,
//! and after the store lock has been released. The mutation is authoritative: nothing a subscriber
//! does (including panicking) can undo it.

use std::fmt::{Debug, Formatter};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;
type SubscriberList<T> = Mutex<Vec<(u64, Callback<T>)>>;

/// A named fan-out channel
pub struct Channel<T> {
    store: &'static str,
    name: &'static str,
    subscribers: Arc<SubscriberList<T>>,
    next_key: AtomicU64,
}

impl<T: 'static> Channel<T> {
    pub fn new(store: &'static str, name: &'static str) -> Self {
        Self {
            store,
            name,
            subscribers: Arc::new(Mutex::new(Vec::new())),
            next_key: AtomicU64::new(0),
        }
    }

    /// The channel name, e.g. `updated`
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Name of the store that publishes on this channel
    pub fn store(&self) -> &'static str {
        self.store
    }

    /// Register a callback. It is called for every published value until the returned [`Subscription`] is dropped
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let key = self.next_key.fetch_add(1, Ordering::Relaxed);
        lock_list(&self.subscribers).push((key, Arc::new(callback)));
        log::trace!("New subscriber #{} on {}.{}", key, self.store, self.name);

        let list: Weak<SubscriberList<T>> = Arc::downgrade(&self.subscribers);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(list) = list.upgrade() {
                    lock_list(&list).retain(|(k, _)| *k != key);
                }
            })),
        }
    }

    /// Call every subscriber with `value`.
    ///
    /// A panicking subscriber is logged and skipped, the others are still called.
    /// Returns how many subscribers completed normally.
    pub fn publish(&self, value: &T) -> usize {
        // Snapshot the list, so that subscribers may (un)subscribe or publish themselves
        let snapshot: Vec<Callback<T>> = lock_list(&self.subscribers)
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();

        let mut n_ok = 0;
        for callback in snapshot {
            match catch_unwind(AssertUnwindSafe(|| callback(value))) {
                Ok(()) => n_ok += 1,
                Err(_) => log::warn!("A subscriber of {}.{} panicked. Ignoring it.", self.store, self.name),
            }
        }
        n_ok
    }

    pub fn subscriber_count(&self) -> usize {
        lock_list(&self.subscribers).len()
    }
}

impl<T> Debug for Channel<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel").field("store", &self.store).field("name", &self.name).finish()
    }
}

fn lock_list<T>(list: &SubscriberList<T>) -> MutexGuard<'_, Vec<(u64, Callback<T>)>> {
    list.lock().unwrap_or_else(PoisonError::into_inner)
}


/// Handle returned by [`Channel::subscribe`]. The callback is removed when this is dropped.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.run_unsubscribe();
    }

    /// Keep the callback registered for as long as the channel lives
    pub fn detach(mut self) {
        self.unsubscribe = None;
    }

    fn run_unsubscribe(&mut self) {
        if let Some(f) = self.unsubscribe.take() {
            f();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_unsubscribe();
    }
}

impl Debug for Subscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("active", &self.unsubscribe.is_some()).finish()
    }
}


/// The created/updated/deleted channels of a store.
///
/// `T` is the record type, `K` its id (deletions only carry the id).
#[derive(Debug)]
pub struct ChangeNotifier<T, K> {
    created: Channel<T>,
    updated: Channel<T>,
    deleted: Channel<K>,
}

impl<T: 'static, K: 'static> ChangeNotifier<T, K> {
    pub fn new(store: &'static str) -> Self {
        Self {
            created: Channel::new(store, "created"),
            updated: Channel::new(store, "updated"),
            deleted: Channel::new(store, "deleted"),
        }
    }

    pub fn created(&self) -> &Channel<T> { &self.created }
    pub fn updated(&self) -> &Channel<T> { &self.updated }
    pub fn deleted(&self) -> &Channel<K> { &self.deleted }
}
