#![forbid(unsafe_code)]

//! Observer registry shared by all models.
//!
//! Every model owns an [`ObserverList`]. Mutation methods apply their change
//! first, then call [`ObserverList::notify`], which invokes the registered
//! callbacks in registration order. No observer runs until the mutation has
//! fully completed.
//!
//! Registration is expected to last for the process lifetime; `remove`
//! exists for symmetry and for tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// How much of the board a model change invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateType {
    /// A single entity changed; only the owning presenter refreshes.
    Patch,

    /// Set membership changed; the board re-filters and re-sorts but keeps
    /// pagination, sort position, and open-popup state.
    Minor,

    /// Structural reset; the board rebuilds with pagination and sort
    /// returned to their defaults.
    Major,
}

/// Token returned by [`ObserverList::add`], usable to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// An observer callback: update granularity plus the model's event payload.
pub type Observer<E> = Rc<dyn Fn(UpdateType, &E)>;

/// Ordered token→callback registry.
pub struct ObserverList<E> {
    entries: RefCell<Vec<(ObserverId, Observer<E>)>>,
    next_id: Cell<u64>,
}

impl<E> ObserverList<E> {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Register a callback, returning its token.
    pub fn add(&self, observer: Observer<E>) -> ObserverId {
        let id = ObserverId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.entries.borrow_mut().push((id, observer));
        id
    }

    /// Unregister a callback. Returns `false` when the token is unknown.
    pub fn remove(&self, id: ObserverId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    /// Invoke every registered callback in registration order.
    ///
    /// The callback list is snapshotted before the first invocation, so an
    /// observer may register or unregister observers without disturbing the
    /// iteration; such changes take effect from the next notification.
    pub fn notify(&self, update: UpdateType, event: &E) {
        let snapshot: Vec<Observer<E>> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect();
        for observer in snapshot {
            observer(update, event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl<E> Default for ObserverList<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn notifies_in_registration_order() {
        let list: ObserverList<u32> = ObserverList::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let seen = Rc::clone(&seen);
            list.add(Rc::new(move |_, value: &u32| {
                seen.borrow_mut().push((tag, *value));
            }));
        }

        list.notify(UpdateType::Patch, &7);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7), ("c", 7)]);
    }

    #[test]
    fn remove_stops_delivery() {
        let list: ObserverList<()> = ObserverList::new();
        let count = Rc::new(Cell::new(0u32));

        let counter = Rc::clone(&count);
        let id = list.add(Rc::new(move |_, _| counter.set(counter.get() + 1)));

        list.notify(UpdateType::Minor, &());
        assert!(list.remove(id));
        assert!(!list.remove(id));
        list.notify(UpdateType::Minor, &());

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn observer_registered_during_notify_runs_next_time() {
        let list: Rc<ObserverList<()>> = Rc::new(ObserverList::new());
        let late_calls = Rc::new(Cell::new(0u32));

        let inner_list = Rc::clone(&list);
        let late = Rc::clone(&late_calls);
        let registered = Cell::new(false);
        list.add(Rc::new(move |_, _| {
            if !registered.get() {
                registered.set(true);
                let late = Rc::clone(&late);
                inner_list.add(Rc::new(move |_, _| late.set(late.get() + 1)));
            }
        }));

        list.notify(UpdateType::Patch, &());
        assert_eq!(late_calls.get(), 0);

        list.notify(UpdateType::Patch, &());
        assert_eq!(late_calls.get(), 1);
    }
}
