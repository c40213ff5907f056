use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<E> = Box<dyn FnMut(&E)>;

struct Slot<E> {
    id: u64,
    // `None` while the callback is running.
    callback: Option<Callback<E>>,
}

struct Registry<E> {
    slots: RefCell<Vec<Slot<E>>>,
    next_id: Cell<u64>,
}

impl<E> Registry<E> {
    fn remove(&self, id: u64) {
        let removed = {
            let mut slots = self.slots.borrow_mut();
            slots
                .iter()
                .position(|s| s.id == id)
                .map(|i| slots.remove(i))
        };
        // Dropped outside the borrow: the callback may own subscriptions into this registry.
        drop(removed);
    }
}

/// Ordered set of event callbacks.
///
/// Dispatch is reentrancy-safe: a callback may subscribe, unsubscribe itself or unsubscribe
/// others while an event is being delivered. A callback cancelled mid-dispatch is never
/// invoked again; callbacks added mid-dispatch first see the next event.
pub struct Listeners<E> {
    inner: Rc<Registry<E>>,
}

impl<E: 'static> Listeners<E> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Registry {
                slots: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Register `callback`; it stays registered until the returned [`Subscription`] is
    /// cancelled or dropped.
    pub fn subscribe(&self, callback: impl FnMut(&E) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.slots.borrow_mut().push(Slot {
            id,
            callback: Some(Box::new(callback)),
        });

        let registry: Weak<Registry<E>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.remove(id);
            }
        })
    }

    /// Deliver `event` to every callback registered when dispatch starts, in subscription order.
    pub fn emit(&self, event: &E) {
        let ids: Vec<u64> = self.inner.slots.borrow().iter().map(|s| s.id).collect();
        for id in ids {
            let taken = {
                let mut slots = self.inner.slots.borrow_mut();
                slots
                    .iter_mut()
                    .find(|s| s.id == id)
                    .and_then(|s| s.callback.take())
            };
            let Some(mut callback) = taken else {
                continue;
            };

            callback(event);

            let mut slots = self.inner.slots.borrow_mut();
            if let Some(slot) = slots.iter_mut().find(|s| s.id == id) {
                slot.callback = Some(callback);
            }
        }
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.inner.slots.borrow().len()
    }

    /// Return `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: 'static> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.inner.slots.borrow().len())
            .finish()
    }
}

/// Scoped registration handle. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub(crate) fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Handle that owns no registration.
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Unsubscribe now.
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/events/listeners.rs"]
mod tests;
