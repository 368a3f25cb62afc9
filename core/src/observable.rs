//! Observable value holder shared by the token and movie stores.
//!
//! # Design
//! [`Observable<T>`] is a plain subject: it owns one value and offers a pull
//! interface (`get`, a clone of the current value) and a push interface
//! (`subscribe`, invoked once immediately and then after every mutation).
//! There are no global instances; holders are created at the composition
//! root and handed to whoever consumes them; cloning an `Observable` clones
//! the handle, not the value.
//!
//! Notification runs after the value lock is released, so a callback may
//! re-enter `get` (or even `set`) without deadlocking. Callbacks run on the
//! mutating thread, synchronously, in subscription order.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Subscribers<T> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
}

struct Shared<T> {
    value: Mutex<T>,
    subscribers: Mutex<Subscribers<T>>,
}

/// A shareable container for a single observable value.
pub struct Observable<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

// A poisoned lock only means some subscriber panicked mid-notification; the
// stored value itself is still coherent, so recover it instead of bubbling
// the poison to every later caller.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<T: Clone> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            shared: Arc::new(Shared {
                value: Mutex::new(value),
                subscribers: Mutex::new(Subscribers {
                    next_id: 0,
                    entries: Vec::new(),
                }),
            }),
        }
    }

    /// Snapshot of the current value.
    pub fn get(&self) -> T {
        lock(&self.shared.value).clone()
    }

    /// Replace the value and notify subscribers.
    pub fn set(&self, value: T) {
        {
            let mut guard = lock(&self.shared.value);
            *guard = value;
        }
        self.notify();
    }

    /// Mutate the value in place and notify subscribers once.
    pub fn update(&self, mutate: impl FnOnce(&mut T)) {
        {
            let mut guard = lock(&self.shared.value);
            mutate(&mut guard);
        }
        self.notify();
    }

    /// Register `callback` for value changes.
    ///
    /// The callback is invoked immediately with the current value, then
    /// after every `set`/`update`, until the returned [`Subscription`] is
    /// dropped.
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription<T> {
        let callback: Callback<T> = Arc::new(callback);
        let id = {
            let mut subscribers = lock(&self.shared.subscribers);
            let id = subscribers.next_id;
            subscribers.next_id += 1;
            subscribers.entries.push((id, Arc::clone(&callback)));
            id
        };
        callback(&self.get());
        Subscription {
            id,
            shared: Arc::downgrade(&self.shared),
        }
    }

    fn notify(&self) {
        let snapshot = self.get();
        let callbacks: Vec<Callback<T>> = lock(&self.shared.subscribers)
            .entries
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(&snapshot);
        }
    }
}

/// Guard tying a subscription to its observable.
///
/// Dropping it removes the callback. Holds only a weak reference, so an
/// outstanding subscription never keeps the observable's value alive.
pub struct Subscription<T> {
    id: u64,
    shared: Weak<Shared<T>>,
}

impl<T> Subscription<T> {
    /// Explicit, self-documenting alternative to dropping the guard.
    pub fn unsubscribe(self) {}
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            lock(&shared.subscribers)
                .entries
                .retain(|(id, _)| *id != self.id);
        }
    }
}
