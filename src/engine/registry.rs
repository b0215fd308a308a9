//! Binding Registry - Element ↔ native node association.
//!
//! Holds exactly one entry per built element:
//! - ElementId → (NodeId, weak element handle)
//! - NodeId → ElementId (reverse lookup for layout and input events)
//! - ElementId → subscription cleanups, run when the element is unregistered
//!
//! Entries are added by `build` and removed by `destroy` or a structural
//! rebuild. Cleanups always run outside the registry borrow.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::element::{Cleanup, Element, ElementId, WeakElement};
use crate::error::{BindError, Result};
use crate::visual::NodeId;

struct Entry {
    node: NodeId,
    element: WeakElement,
}

// =============================================================================
// Registry State
// =============================================================================

thread_local! {
    /// Map element to its native node.
    static ENTRIES: RefCell<HashMap<ElementId, Entry>> = RefCell::new(HashMap::new());

    /// Map native node back to its element.
    static NODE_TO_ELEMENT: RefCell<HashMap<NodeId, ElementId>> = RefCell::new(HashMap::new());

    /// Subscription cleanups registered per element.
    static SUBSCRIPTIONS: RefCell<HashMap<ElementId, Vec<Cleanup>>> = RefCell::new(HashMap::new());
}

// =============================================================================
// Registration
// =============================================================================

/// Associate `element` with `node`.
///
/// Fails if the element already has a node.
pub fn register(element: &Element, node: NodeId) -> Result<()> {
    let id = element.id();
    ENTRIES.with(|entries| {
        let mut entries = entries.borrow_mut();
        if entries.contains_key(&id) {
            return Err(BindError::AlreadyRegistered { id });
        }
        entries.insert(
            id,
            Entry {
                node,
                element: element.downgrade(),
            },
        );
        Ok(())
    })?;
    NODE_TO_ELEMENT.with(|map| map.borrow_mut().insert(node, id));
    Ok(())
}

/// Native node of a built element.
pub fn node_of(id: ElementId) -> Result<NodeId> {
    try_node_of(id).ok_or(BindError::UnregisteredElement { id })
}

/// Native node of a built element, if any.
pub fn try_node_of(id: ElementId) -> Option<NodeId> {
    ENTRIES.with(|entries| entries.borrow().get(&id).map(|entry| entry.node))
}

/// Element a native node was built for.
pub fn element_of(node: NodeId) -> Option<Element> {
    let id = element_id_of(node)?;
    ENTRIES.with(|entries| entries.borrow().get(&id)?.element.upgrade())
}

/// Id of the element a native node was built for, even if it was dropped.
pub fn element_id_of(node: NodeId) -> Option<ElementId> {
    NODE_TO_ELEMENT.with(|map| map.borrow().get(&node).copied())
}

pub fn is_registered(id: ElementId) -> bool {
    ENTRIES.with(|entries| entries.borrow().contains_key(&id))
}

/// Number of registered elements.
pub fn registered_count() -> usize {
    ENTRIES.with(|entries| entries.borrow().len())
}

// =============================================================================
// Subscriptions
// =============================================================================

/// Keep `cleanup` until `id` is unregistered.
pub fn track(id: ElementId, cleanup: Cleanup) {
    SUBSCRIPTIONS.with(|subs| subs.borrow_mut().entry(id).or_default().push(cleanup));
}

/// Number of live subscriptions held for `id`.
pub fn subscription_count(id: ElementId) -> usize {
    SUBSCRIPTIONS.with(|subs| subs.borrow().get(&id).map_or(0, Vec::len))
}

fn run_cleanups(id: ElementId) {
    let cleanups = SUBSCRIPTIONS.with(|subs| subs.borrow_mut().remove(&id));
    for cleanup in cleanups.into_iter().flatten() {
        cleanup();
    }
}

// =============================================================================
// Removal
// =============================================================================

/// Drop the entry for `id` and run its subscription cleanups.
///
/// Returns the node it was associated with, if any.
pub fn unregister(id: ElementId) -> Option<NodeId> {
    let node = ENTRIES.with(|entries| entries.borrow_mut().remove(&id).map(|entry| entry.node));
    if let Some(node) = node {
        NODE_TO_ELEMENT.with(|map| map.borrow_mut().remove(&node));
    }
    run_cleanups(id);
    node
}

/// Reset all registry state (for testing).
pub fn reset_registry() {
    ENTRIES.with(|entries| entries.borrow_mut().clear());
    NODE_TO_ELEMENT.with(|map| map.borrow_mut().clear());
    let subs = SUBSCRIPTIONS.with(|subs| std::mem::take(&mut *subs.borrow_mut()));
    for cleanup in subs.into_values().flatten() {
        cleanup();
    }
}
