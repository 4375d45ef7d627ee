//! Push-based data sources.
//!
//! A [`Topic`] holds the latest value of a realtime record and pushes every
//! change synchronously to its subscribers. Subscribing returns a
//! [`Subscription`] disposer; once it is released the callback is never
//! invoked again, even if a publish is in progress.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::error::Result;
use crate::geo::GeoPoint;

type Callback<T> = RefCell<Box<dyn FnMut(T)>>;

struct Slot<T> {
    id: u64,
    active: Cell<bool>,
    callback: Callback<T>,
}

struct TopicInner<T> {
    name: String,
    latest: Option<T>,
    next_id: u64,
    slots: Vec<Rc<Slot<T>>>,
}

/// Realtime record with change notification.
pub struct Topic<T> {
    inner: Rc<RefCell<TopicInner<T>>>,
}

impl<T> Clone for Topic<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> Topic<T> {
    pub fn new(name: &str) -> Self {
        Self {
            inner: Rc::new(RefCell::new(TopicInner {
                name: name.to_string(),
                latest: None,
                next_id: 0,
                slots: Vec::new(),
            })),
        }
    }

    /// Most recently published value.
    pub fn latest(&self) -> Option<T> {
        self.inner.borrow().latest.clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().slots.len()
    }

    /// Store `value` and deliver it to every active subscriber, in subscription order.
    pub fn publish(&self, value: T) {
        let slots: Vec<Rc<Slot<T>>> = {
            let mut inner = self.inner.borrow_mut();
            inner.latest = Some(value.clone());
            inner.slots.clone()
        };

        for slot in slots {
            if !slot.active.get() {
                continue;
            }
            match slot.callback.try_borrow_mut() {
                Ok(mut callback) => callback(value.clone()),
                Err(_) => {
                    tracing::warn!(
                        "{}: re-entrant publish skipped for subscriber {}",
                        self.inner.borrow().name,
                        slot.id
                    );
                }
            }
        }
    }

    /// Register `callback`; the current value, if any, is delivered immediately.
    pub fn subscribe(&self, callback: impl FnMut(T) + 'static) -> Subscription {
        let slot = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            let slot = Rc::new(Slot {
                id,
                active: Cell::new(true),
                callback: RefCell::new(Box::new(callback)),
            });
            inner.slots.push(Rc::clone(&slot));
            tracing::debug!("{}: subscriber {} added", inner.name, id);
            slot
        };

        let replay = self.latest();
        if let Some(value) = replay
            && let Ok(mut callback) = slot.callback.try_borrow_mut()
        {
            callback(value);
        }

        let topic: Weak<RefCell<TopicInner<T>>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            slot.active.set(false);
            if let Some(inner) = topic.upgrade() {
                let mut inner = inner.borrow_mut();
                inner.slots.retain(|s| s.id != slot.id);
                tracing::debug!("{}: subscriber {} removed", inner.name, slot.id);
            }
        })
    }
}

/// Disposer returned by `subscribe`. Unsubscribes when released or dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    dispose: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(dispose: impl FnOnce() + 'static) -> Self {
        Self {
            dispose: Some(Box::new(dispose)),
        }
    }

    /// Stop receiving updates.
    pub fn unsubscribe(mut self) {
        self.dispose_now();
    }

    fn dispose_now(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.dispose.is_some())
            .finish()
    }
}

/// Source of coordinate updates (stick position or destination).
pub trait PointSource {
    fn subscribe_points(&self, callback: Box<dyn FnMut(GeoPoint)>) -> Subscription;
}

impl PointSource for Topic<GeoPoint> {
    fn subscribe_points(&self, callback: Box<dyn FnMut(GeoPoint)>) -> Subscription {
        self.subscribe(callback)
    }
}

/// Persists a new destination upstream.
pub trait DestinationSetter {
    fn set_destination(&self, point: GeoPoint) -> Result<()>;
}

impl DestinationSetter for Topic<GeoPoint> {
    fn set_destination(&self, point: GeoPoint) -> Result<()> {
        tracing::info!("Destination set: {}", point);
        self.publish(point);
        Ok(())
    }
}
