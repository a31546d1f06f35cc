//! Subscribers and the active-reader slot
//!
//! A [`Subscriber`] is one unit of reactive work: a key path read from a root
//! record plus an update callback. Construction makes the subscriber the
//! active reader for one read of its path; every cell touched by that read
//! registers it. Later, each notification re-reads the path and hands the
//! fresh value to the callback.
//!
//! A single-key subscriber never registers again. A dotted-path subscriber
//! drops its registrations and re-reads as the active reader on every
//! update, so it follows a replaced intermediate record.
//!
//! The active-reader slot is thread-local and holds at most one subscriber.
//! It is acquired through a scoped guard, so it is cleared on every exit path.

use crate::dep::DepInner;
use crate::error::{ReactiveError, ReactiveResult};
use crate::record::Record;
use crate::value::Value;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::str::FromStr;

/// Unique identifier for a subscriber
pub type SubscriberId = u64;

/// Callback invoked with the freshly read value on every notification
pub type UpdateFn = Box<dyn Fn(&Value) -> ReactiveResult<()>>;

thread_local! {
    static NEXT_SUBSCRIBER_ID: Cell<SubscriberId> = const { Cell::new(1) };
    static ACTIVE_READER: RefCell<Option<Rc<SubscriberInner>>> = const { RefCell::new(None) };
}

fn next_subscriber_id() -> SubscriberId {
    NEXT_SUBSCRIBER_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        id
    })
}

pub(crate) fn active_reader() -> Option<Rc<SubscriberInner>> {
    ACTIVE_READER.with(|slot| slot.borrow().clone())
}

/// Whether a subscriber is currently performing its dependency read
pub fn has_active_reader() -> bool {
    ACTIVE_READER.with(|slot| slot.borrow().is_some())
}

/// Occupies the active-reader slot until dropped
struct ReaderScope;

impl ReaderScope {
    fn acquire(subscriber: &Rc<SubscriberInner>) -> ReactiveResult<Self> {
        ACTIVE_READER.with(|slot| {
            let mut slot = slot.borrow_mut();
            if slot.is_some() {
                return Err(ReactiveError::ReaderBusy);
            }
            *slot = Some(Rc::clone(subscriber));
            Ok(ReaderScope)
        })
    }
}

impl Drop for ReaderScope {
    fn drop(&mut self) {
        ACTIVE_READER.with(|slot| slot.borrow_mut().take());
    }
}

/// A dotted key path such as `counter` or `user.name`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    pub fn parse(raw: &str) -> ReactiveResult<Self> {
        let trimmed = raw.trim();
        let segments: Vec<String> = trimmed.split('.').map(|s| s.trim().to_string()).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(ReactiveError::InvalidPath(raw.to_string()));
        }
        Ok(Self { segments })
    }

    /// A path of one key, taken verbatim
    pub fn single(key: impl Into<String>) -> Self {
        Self {
            segments: vec![key.into()],
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The top-level key this path starts at
    pub fn root_key(&self) -> &str {
        &self.segments[0]
    }

    /// Read the path from `root`, registering the active reader on every
    /// segment along the way.
    pub fn resolve(&self, root: &Record) -> ReactiveResult<Value> {
        let mut current = root.get(self.root_key())?;
        for segment in &self.segments[1..] {
            let next = match &current {
                Value::Record(record) => record.get(segment)?,
                other => {
                    return Err(ReactiveError::NotARecord {
                        path: self.to_string(),
                        segment: segment.clone(),
                        found: other.type_name(),
                    })
                }
            };
            current = next;
        }
        Ok(current)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl FromStr for KeyPath {
    type Err = ReactiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

pub(crate) struct SubscriberInner {
    id: SubscriberId,
    root: Record,
    path: KeyPath,
    callback: UpdateFn,
    joined: RefCell<Vec<Weak<DepInner>>>,
}

impl SubscriberInner {
    pub(crate) fn id(&self) -> SubscriberId {
        self.id
    }

    pub(crate) fn joined(&self, dep: Weak<DepInner>) {
        self.joined.borrow_mut().push(dep);
    }

    pub(crate) fn update(self: &Rc<Self>) -> ReactiveResult<()> {
        let value = if self.path.segments().len() > 1 {
            self.retrack()?
        } else {
            self.path.resolve(&self.root)?
        };
        (self.callback)(&value)
    }

    /// Leave every registry, then read the path again as the active reader.
    /// On a failed read the registrations made before the failure stay.
    fn retrack(self: &Rc<Self>) -> ReactiveResult<Value> {
        self.dispose();
        let _scope = ReaderScope::acquire(self)?;
        self.path.resolve(&self.root)
    }

    fn dispose(self: &Rc<Self>) {
        let me = Rc::downgrade(self);
        let joined = std::mem::take(&mut *self.joined.borrow_mut());
        for dep in joined.iter().filter_map(Weak::upgrade) {
            dep.remove(&me);
        }
    }
}

/// Handle to a live subscriber. Dropping it disposes the subscriber.
pub struct Subscriber {
    inner: Rc<SubscriberInner>,
}

impl Subscriber {
    /// Create a subscriber and run its single dependency-discovery read.
    ///
    /// Fails if the path cannot be read or another subscriber is mid-read.
    pub fn new<F>(root: &Record, path: KeyPath, callback: F) -> ReactiveResult<Self>
    where
        F: Fn(&Value) -> ReactiveResult<()> + 'static,
    {
        let inner = Rc::new(SubscriberInner {
            id: next_subscriber_id(),
            root: root.clone(),
            path,
            callback: Box::new(callback),
            joined: RefCell::new(Vec::new()),
        });

        let read = {
            let _scope = ReaderScope::acquire(&inner)?;
            inner.path.resolve(&inner.root)
        };
        if let Err(e) = read {
            inner.dispose();
            return Err(e);
        }

        tracing::debug!(
            subscriber = inner.id,
            path = %inner.path,
            registrations = inner.joined.borrow().len(),
            "subscriber created"
        );
        Ok(Self { inner })
    }

    pub(crate) fn inner(&self) -> &Rc<SubscriberInner> {
        &self.inner
    }

    pub fn id(&self) -> SubscriberId {
        self.inner.id
    }

    pub fn path(&self) -> &KeyPath {
        &self.inner.path
    }

    /// Re-read the path and invoke the callback. Dotted paths re-register.
    pub fn update(&self) -> ReactiveResult<()> {
        self.inner.update()
    }

    /// Number of registries this subscriber is still a member of
    pub fn registrations(&self) -> usize {
        self.inner
            .joined
            .borrow()
            .iter()
            .filter(|dep| dep.strong_count() > 0)
            .count()
    }

    /// Remove this subscriber from every registry it joined
    pub fn dispose(&self) {
        self.inner.dispose();
    }
}

impl Drop for Subscriber {
    fn drop(&mut self) {
        self.inner.dispose();
    }
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("id", &self.inner.id)
            .field("path", &self.inner.path.to_string())
            .finish()
    }
}
