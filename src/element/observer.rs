//! Observer lists - One explicit listener list per change channel.
//!
//! Listeners fire synchronously, in registration order, exactly once per
//! `notify`. The list is snapshotted before dispatch, so a listener may
//! unsubscribe itself (or others) while a notification is running.
//!
//! A listener may fail. The first failure stops the dispatch and is returned
//! to whoever performed the mutation, wrapped in a [`NotifyError`] that names
//! the channel.

use std::cell::{Cell, RefCell};
use std::error::Error as StdError;
use std::rc::{Rc, Weak};

use thiserror::Error;

// =============================================================================
// Types
// =============================================================================

/// Cleanup function returned by subscriptions.
///
/// Call this to remove the listener again.
pub type Cleanup = Box<dyn FnOnce()>;

/// Result returned by a listener.
pub type ListenerResult = Result<(), Box<dyn StdError>>;

type Listener<A> = Rc<dyn Fn(&A) -> ListenerResult>;

/// Identifies one listener inside one observer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A listener failed while a change was being dispatched.
#[derive(Error, Debug)]
#[error("`{channel}` listener failed: {source}")]
pub struct NotifyError {
    channel: &'static str,
    #[source]
    source: Box<dyn StdError>,
}

impl NotifyError {
    /// Name of the channel whose dispatch failed.
    pub fn channel(&self) -> &'static str {
        self.channel
    }

    /// The listener's own error, if it has type `E`.
    pub fn source_as<E: StdError + 'static>(&self) -> Option<&E> {
        self.source.downcast_ref::<E>()
    }
}

// =============================================================================
// Observers
// =============================================================================

/// Listener list for one change channel.
pub struct Observers<A: ?Sized> {
    channel: &'static str,
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(ListenerId, Listener<A>)>>,
}

impl<A: ?Sized + 'static> Observers<A> {
    /// Create an empty list for the named channel.
    pub fn new(channel: &'static str) -> Rc<Self> {
        Rc::new(Self {
            channel,
            next_id: Cell::new(0),
            listeners: RefCell::new(Vec::new()),
        })
    }

    /// Channel name (used in errors and logs).
    pub fn channel(&self) -> &'static str {
        self.channel
    }

    /// Append a listener.
    pub fn add<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&A) -> ListenerResult + 'static,
    {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    /// Append a listener and return a cleanup that removes it.
    ///
    /// The cleanup holds the list weakly; running it after the owner is
    /// gone does nothing.
    pub fn subscribe<F>(self: &Rc<Self>, listener: F) -> Cleanup
    where
        F: Fn(&A) -> ListenerResult + 'static,
    {
        let id = self.add(listener);
        let list: Weak<Self> = Rc::downgrade(self);
        Box::new(move || {
            if let Some(list) = list.upgrade() {
                list.remove(id);
            }
        })
    }

    /// Fire every listener with `arg`, in registration order.
    pub fn notify(&self, arg: &A) -> Result<(), NotifyError> {
        let snapshot: Vec<Listener<A>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in snapshot {
            listener(arg).map_err(|source| NotifyError {
                channel: self.channel,
                source,
            })?;
        }
        Ok(())
    }

    /// Number of listeners.
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every listener.
    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Error, Debug)]
    #[error("boom")]
    struct Boom;

    #[test]
    fn test_registration_order() {
        let list = Observers::<i32>::new("test");
        let log = Rc::new(RefCell::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let log = log.clone();
            list.add(move |value| {
                log.borrow_mut().push(format!("{tag}{value}"));
                Ok(())
            });
        }

        list.notify(&1).unwrap();
        assert_eq!(*log.borrow(), vec!["a1", "b1", "c1"]);
    }

    #[test]
    fn test_cleanup_removes_listener() {
        let list = Observers::<()>::new("test");
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();

        let cleanup = list.subscribe(move |_| {
            count_clone.set(count_clone.get() + 1);
            Ok(())
        });

        list.notify(&()).unwrap();
        cleanup();
        list.notify(&()).unwrap();

        assert_eq!(count.get(), 1);
        assert!(list.is_empty());
    }

    #[test]
    fn test_first_error_stops_dispatch() {
        let list = Observers::<()>::new("style");
        let reached = Rc::new(Cell::new(false));
        let reached_clone = reached.clone();

        list.add(|_| Err(Box::new(Boom)));
        list.add(move |_| {
            reached_clone.set(true);
            Ok(())
        });

        let err = list.notify(&()).unwrap_err();
        assert_eq!(err.channel(), "style");
        assert!(err.source_as::<Boom>().is_some());
        assert!(!reached.get());
    }

    #[test]
    fn test_error_message_and_source() {
        let list = Observers::<()>::new("value_changed");
        list.add(|_| Err(Box::new(Boom)));

        let err = list.notify(&()).unwrap_err();
        assert_eq!(err.to_string(), "`value_changed` listener failed: boom");
        assert_eq!(StdError::source(&err).map(|e| e.to_string()).as_deref(), Some("boom"));
    }

    #[test]
    fn test_listener_can_unsubscribe_during_dispatch() {
        let list = Observers::<()>::new("test");
        let slot: Rc<RefCell<Option<Cleanup>>> = Rc::new(RefCell::new(None));
        let slot_clone = slot.clone();

        let cleanup = list.subscribe(move |_| {
            if let Some(cleanup) = slot_clone.borrow_mut().take() {
                cleanup();
            }
            Ok(())
        });
        *slot.borrow_mut() = Some(cleanup);

        list.notify(&()).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_cleanup_after_drop_is_noop() {
        let list = Observers::<()>::new("test");
        let cleanup = list.subscribe(|_| Ok(()));
        drop(list);
        cleanup();
    }
}
