// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Same-process change notifications for preference writes.
//!
//! The bus is owned by the accessor that performs the writes, so notifications
//! reach only listeners registered on that instance. Nothing crosses process or
//! machine boundaries; another process sharing the same backing file sees the
//! new value on its next read, never as an event.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// What happened to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// A new value was written.
    Written,
    /// The key was deleted.
    Removed,
}

/// Notification carrying the fully-qualified key that changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefChange {
    /// Fully-qualified key (`env:{id}:{key}` or a global key).
    pub key: String,
    /// Kind of change.
    pub kind: ChangeKind,
}

/// Handle returned by [`ChangeBus::subscribe`].
pub type SubscriptionId = u64;

type Listener = Rc<dyn Fn(&PrefChange)>;

/// Observer registry with synchronous, fire-and-forget dispatch.
#[derive(Default)]
pub struct ChangeBus {
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_id: Cell<SubscriptionId>,
}

impl fmt::Debug for ChangeBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeBus")
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

impl ChangeBus {
    /// Create a bus with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`; it is called for every change published afterwards.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&PrefChange) + 'static,
    {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Drop a listener. Returns false when `id` was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(sid, _)| *sid != id);
        listeners.len() != before
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Dispatch `change` to every listener registered at call time.
    ///
    /// Listeners may subscribe or unsubscribe from inside the callback; those
    /// edits take effect from the next publish.
    pub fn publish(&self, change: &PrefChange) {
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in snapshot {
            listener(change);
        }
    }
}
