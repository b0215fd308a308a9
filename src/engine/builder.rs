//! Builder Engine - Build, rebuild and destroy native nodes for elements.
//!
//! `build` resolves the builder for an element's kind, lets it construct the
//! native node (recursively building children), registers the pair and wires
//! the change handlers:
//!
//! ```text
//! enable_changed       -> sync::apply_enable
//! interactable_changed -> sync::apply_interactable
//! style_changed        -> sync::apply_style
//! children_changed     -> rebuild_group_children   (groups only)
//! destroyed            -> destroy
//! ```
//!
//! Handlers capture the node id and a weak element handle, never the
//! element itself. Every registration made during a build is journaled so a
//! failure anywhere in the subtree unwinds all of it.

use std::cell::{Cell, RefCell};

use tracing::debug;

use super::{dispatch, registry, sync};
use crate::element::{Element, ElementId};
use crate::error::{BindError, Result};
use crate::visual::{self, NodeId};

// =============================================================================
// Build Journal
// =============================================================================

thread_local! {
    /// Registrations made by builds still in progress, in order.
    static JOURNAL: RefCell<Vec<(ElementId, NodeId)>> = const { RefCell::new(Vec::new()) };

    /// Number of builds and rebuilds in progress.
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Open a journal scope; returns the mark to roll back to.
fn journal_begin() -> usize {
    DEPTH.with(|depth| depth.set(depth.get() + 1));
    JOURNAL.with(|journal| journal.borrow().len())
}

fn journal_push(id: ElementId, node: NodeId) {
    JOURNAL.with(|journal| journal.borrow_mut().push((id, node)));
}

/// Close a scope that succeeded. The outermost scope forgets the journal.
fn journal_commit() {
    let depth = DEPTH.with(|depth| {
        let remaining = depth.get().saturating_sub(1);
        depth.set(remaining);
        remaining
    });
    if depth == 0 {
        JOURNAL.with(|journal| journal.borrow_mut().clear());
    }
}

/// Close a scope that failed, unwinding everything it registered.
fn journal_abort(mark: usize) {
    DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    rollback_to(mark);
}

/// Unregister everything journaled after `mark` and release its nodes.
fn rollback_to(mark: usize) {
    let entries = JOURNAL.with(|journal| {
        let mut journal = journal.borrow_mut();
        let mark = mark.min(journal.len());
        journal.split_off(mark)
    });
    for (id, node) in entries.into_iter().rev() {
        registry::unregister(id);
        if visual::contains(node) {
            let _ = visual::release_tree(node);
        }
    }
}

// =============================================================================
// Build
// =============================================================================

/// Build the native node for `element` and its subtree.
///
/// On failure nothing built by this call stays registered or allocated.
pub fn build(element: &Element) -> Result<NodeId> {
    let id = element.id();
    if registry::is_registered(id) {
        return Err(BindError::AlreadyRegistered { id });
    }
    let build_fn = dispatch::resolve(element.kind())?;

    let mark = journal_begin();
    let result = build_fn(element).and_then(|node| bind(element, node).map(|()| node));

    match result {
        Ok(node) => {
            journal_commit();
            debug!(element = %id, kind = %element.kind(), node = %node, "built");
            Ok(node)
        }
        Err(err) => {
            // Also drops subscriptions the builder tracked before failing.
            registry::unregister(id);
            journal_abort(mark);
            debug!(element = %id, kind = %element.kind(), error = %err, "build failed");
            Err(err)
        }
    }
}

/// Register `element` with `node`, apply its state and subscribe handlers.
fn bind(element: &Element, node: NodeId) -> Result<()> {
    let id = element.id();
    registry::register(element, node)?;
    journal_push(id, node);

    sync::apply_enable(node, element.enable())?;
    sync::apply_interactable(node, element.interactable())?;
    sync::apply_style(node, &element.style())?;

    registry::track(
        id,
        element.on_enable_changed(move |&enable| {
            sync::apply_enable(node, enable)?;
            Ok(())
        }),
    );
    registry::track(
        id,
        element.on_interactable_changed(move |&interactable| {
            sync::apply_interactable(node, interactable)?;
            Ok(())
        }),
    );
    registry::track(
        id,
        element.on_style_changed(move |style| {
            sync::apply_style(node, style)?;
            Ok(())
        }),
    );

    if element.kind().is_group() {
        let weak = element.downgrade();
        registry::track(
            id,
            element.on_children_changed(move |_| {
                if let Some(group) = weak.upgrade() {
                    rebuild_group_children(&group)?;
                }
                Ok(())
            }),
        );
    }

    let weak = element.downgrade();
    registry::track(
        id,
        element.on_destroyed(move |&is_root| {
            if let Some(element) = weak.upgrade() {
                destroy(&element, is_root)?;
            }
            Ok(())
        }),
    );

    Ok(())
}

// =============================================================================
// Builder Helpers
// =============================================================================

/// Finish a freshly created node with `fill`, releasing it if `fill` fails.
pub fn fill_node(node: NodeId, fill: impl FnOnce(NodeId) -> Result<()>) -> Result<NodeId> {
    match fill(node) {
        Ok(()) => Ok(node),
        Err(err) => {
            if visual::contains(node) {
                let _ = visual::release_tree(node);
            }
            Err(err)
        }
    }
}

/// Build each of `children` and append it to `parent`'s content container.
pub fn build_children(parent: NodeId, children: &[Element]) -> Result<()> {
    for child in children {
        let node = build(child)?;
        visual::append_child(parent, node)?;
    }
    Ok(())
}

// =============================================================================
// Structural Rebuild
// =============================================================================

/// Make the native children of `group` mirror its element children.
///
/// Children that already have a node keep it; new children are built.
/// Nodes whose elements left the group are released along with every
/// registry entry under them. If a new child fails to build, the native
/// children are left as they were.
pub fn rebuild_group_children(group: &Element) -> Result<()> {
    let group_node = registry::node_of(group.id())?;
    let container = visual::content_container(group_node)?;
    let previous = visual::children(container)?;

    let mark = journal_begin();
    let mut nodes = Vec::with_capacity(group.child_count());
    for child in group.children() {
        match registry::try_node_of(child.id()) {
            Some(node) => nodes.push(node),
            None => match build(&child) {
                Ok(node) => nodes.push(node),
                Err(err) => {
                    journal_abort(mark);
                    return Err(err);
                }
            },
        }
    }
    journal_commit();

    visual::set_children(group_node, &nodes)?;

    let mut released = 0;
    for node in previous.into_iter().filter(|node| !nodes.contains(node)) {
        release_subtree(node)?;
        released += 1;
    }

    debug!(
        group = %group.id(),
        children = nodes.len(),
        released,
        "rebuilt group children"
    );
    Ok(())
}

/// Unregister every element with a node under `node`, then release it.
fn release_subtree(node: NodeId) -> Result<()> {
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if let Some(id) = registry::element_id_of(current) {
            registry::unregister(id);
        }
        stack.extend(visual::children(current)?);
    }
    visual::release_tree(node)?;
    Ok(())
}

// =============================================================================
// Destroy
// =============================================================================

/// Tear down the native side of a destroyed element.
///
/// The destroy root detaches and releases its whole native subtree; every
/// element drops its registry entry and subscriptions.
pub fn destroy(element: &Element, is_root: bool) -> Result<()> {
    let id = element.id();
    let node = registry::node_of(id)?;

    if is_root && visual::contains(node) {
        visual::release_tree(node)?;
    }
    registry::unregister(id);

    debug!(element = %id, node = %node, is_root, "destroyed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{BuildTable, install_build_table, reset_build_table};
    use crate::types::ElementKind;

    fn setup() {
        registry::reset_registry();
        visual::reset_visual_tree();
        reset_build_table();
    }

    #[test]
    fn test_build_registers_subtree() {
        setup();

        let label = Element::label("a");
        let column = Element::column(vec![label.clone()]);
        let node = build(&column).unwrap();

        assert_eq!(registry::node_of(column.id()).unwrap(), node);
        let label_node = registry::node_of(label.id()).unwrap();
        assert_eq!(visual::content_children(node).unwrap(), vec![label_node]);
    }

    #[test]
    fn test_build_twice_fails() {
        setup();

        let label = Element::label("a");
        build(&label).unwrap();
        let err = build(&label).unwrap_err();

        assert!(matches!(err, BindError::AlreadyRegistered { .. }));
        assert_eq!(registry::registered_count(), 1);
    }

    #[test]
    fn test_failed_build_unwinds() {
        setup();
        let mut table = BuildTable::with_defaults();
        table.unregister(ElementKind::Button);
        install_build_table(table);

        let column = Element::column(vec![
            Element::label("ok"),
            Element::row(vec![Element::label("nested")]),
            Element::button("boom", || {}),
        ]);
        let err = build(&column).unwrap_err();

        assert!(matches!(err, BindError::UnregisteredType { kind: ElementKind::Button }));
        assert_eq!(registry::registered_count(), 0);
        assert_eq!(visual::node_count(), 0);
    }

    #[test]
    fn test_initial_state_applied() {
        setup();

        let label = Element::label("a").with_enable(false).with_interactable(false);
        let node = build(&label).unwrap();

        assert_eq!(
            visual::resolved_style(node).unwrap().resolved_display(),
            crate::types::Display::None
        );
        assert!(!visual::is_enabled(node).unwrap());
    }

    #[test]
    fn test_destroy_unregistered_fails() {
        setup();

        let label = Element::label("a");
        let err = destroy(&label, true).unwrap_err();
        assert!(matches!(err, BindError::UnregisteredElement { id } if id == label.id()));
    }

    #[test]
    fn test_element_destroy_releases_native_subtree() {
        setup();

        let label = Element::label("a");
        let column = Element::column(vec![label.clone()]);
        let canvas = visual::create_canvas(100.0, 100.0);
        let node = build(&column).unwrap();
        visual::append_child(canvas, node).unwrap();

        column.destroy().unwrap();

        assert_eq!(registry::registered_count(), 0);
        assert!(!visual::contains(node));
        assert!(visual::children(canvas).unwrap().is_empty());
        assert_eq!(registry::subscription_count(label.id()), 0);
    }

    #[test]
    fn test_rebuild_releases_removed_subtree() {
        setup();

        let inner = Element::label("inner");
        let removed = Element::row(vec![inner.clone()]);
        let kept = Element::label("kept");
        let column = Element::column(vec![removed.clone(), kept.clone()]);
        build(&column).unwrap();
        let removed_node = registry::node_of(removed.id()).unwrap();

        column.remove_child(&removed).unwrap();

        assert!(!visual::contains(removed_node));
        assert!(registry::try_node_of(removed.id()).is_none());
        assert!(registry::try_node_of(inner.id()).is_none());
        assert!(registry::try_node_of(kept.id()).is_some());
    }

    #[test]
    fn test_rebuild_failure_keeps_children() {
        setup();

        let kept = Element::label("kept");
        let column = Element::column(vec![kept.clone()]);
        let node = build(&column).unwrap();
        let before = visual::content_children(node).unwrap();

        let mut table = BuildTable::with_defaults();
        table.unregister(ElementKind::Image);
        install_build_table(table);

        let err = column
            .push_child(Element::column(vec![Element::label("x"), Element::image("icon")]))
            .unwrap_err();

        assert!(err.source_as::<BindError>().is_some());
        assert_eq!(visual::content_children(node).unwrap(), before);
        assert_eq!(registry::registered_count(), 2);
    }
}
