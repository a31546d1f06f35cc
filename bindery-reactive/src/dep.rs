//! Per-key dependency registries
//!
//! Every observed key owns one [`Dep`]. Subscribers are registered while they
//! are the active reader; a write to the key notifies all of them, in
//! registration order, before the write returns.
//!
//! A registry never owns its subscribers. Entries are weak and a subscriber
//! removes itself from every registry it joined when it is disposed.

use crate::error::{ReactiveError, ReactiveResult};
use crate::subscriber::{Subscriber, SubscriberInner};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Default bound on nested notification passes
pub const DEFAULT_MAX_NOTIFY_DEPTH: usize = 64;

thread_local! {
    static NOTIFY_DEPTH: Cell<usize> = const { Cell::new(0) };
    static MAX_NOTIFY_DEPTH: Cell<usize> = const { Cell::new(DEFAULT_MAX_NOTIFY_DEPTH) };
}

/// Set the nesting limit for notification passes on this thread
pub fn set_max_notify_depth(limit: usize) {
    MAX_NOTIFY_DEPTH.with(|max| max.set(limit.max(1)));
}

pub fn max_notify_depth() -> usize {
    MAX_NOTIFY_DEPTH.with(|max| max.get())
}

/// Limit override that restores the previous limit when dropped
#[must_use = "the limit is restored as soon as the scope is dropped"]
pub struct NotifyLimitScope {
    previous: usize,
}

/// Apply `limit` to every write made while the returned scope is alive
pub fn scoped_max_notify_depth(limit: usize) -> NotifyLimitScope {
    let previous = max_notify_depth();
    set_max_notify_depth(limit);
    NotifyLimitScope { previous }
}

impl Drop for NotifyLimitScope {
    fn drop(&mut self) {
        set_max_notify_depth(self.previous);
    }
}

/// Holds one level of notification depth until dropped
struct DepthGuard;

impl DepthGuard {
    fn enter(key: &str) -> ReactiveResult<Self> {
        let limit = max_notify_depth();
        let depth = NOTIFY_DEPTH.with(|d| d.get()) + 1;
        if depth > limit {
            tracing::warn!(key, limit, "notification depth exceeded");
            return Err(ReactiveError::NotifyDepthExceeded {
                key: key.to_string(),
                limit,
            });
        }
        NOTIFY_DEPTH.with(|d| d.set(depth));
        Ok(DepthGuard)
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        NOTIFY_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

pub(crate) struct DepInner {
    key: String,
    subscribers: RefCell<Vec<Weak<SubscriberInner>>>,
}

impl DepInner {
    pub(crate) fn remove(&self, subscriber: &Weak<SubscriberInner>) {
        self.subscribers
            .borrow_mut()
            .retain(|entry| !Weak::ptr_eq(entry, subscriber));
    }
}

/// Dependency registry for a single observed key
#[derive(Clone)]
pub struct Dep {
    inner: Rc<DepInner>,
}

impl Dep {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(DepInner {
                key: key.into(),
                subscribers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Name of the key this registry belongs to
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    /// Append a subscriber. Registering the same subscriber twice makes it
    /// run twice per notification.
    pub fn register(&self, subscriber: &Subscriber) {
        self.register_inner(subscriber.inner());
    }

    pub(crate) fn register_inner(&self, subscriber: &Rc<SubscriberInner>) {
        self.inner
            .subscribers
            .borrow_mut()
            .push(Rc::downgrade(subscriber));
        subscriber.joined(Rc::downgrade(&self.inner));
        tracing::trace!(key = %self.inner.key, subscriber = subscriber.id(), "registered");
    }

    /// Number of live registrations (duplicates counted)
    pub fn len(&self) -> usize {
        self.inner
            .subscribers
            .borrow()
            .iter()
            .filter(|entry| entry.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every registered subscriber's update, in registration order.
    ///
    /// The first failing update aborts the pass and its error is returned.
    /// Subscribers registered while the pass runs are not part of it.
    pub fn notify(&self) -> ReactiveResult<()> {
        let _depth = DepthGuard::enter(&self.inner.key)?;

        let live: Vec<Rc<SubscriberInner>> = {
            let mut subscribers = self.inner.subscribers.borrow_mut();
            subscribers.retain(|entry| entry.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };

        tracing::trace!(key = %self.inner.key, count = live.len(), "notify");

        for subscriber in live {
            subscriber.update()?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Dep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dep")
            .field("key", &self.inner.key)
            .field("subscribers", &self.len())
            .finish()
    }
}
