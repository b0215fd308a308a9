//! Visual Tree - Arena of retained native nodes.
//!
//! Nodes live in a thread-local map keyed by [`NodeId`]. Every write counts
//! as a mutation and marks layout dirty, whether or not the value changed.
//! Callers that want idempotence compare before writing.
//!
//! Listener lists are snapshotted and the arena borrow is dropped before any
//! listener runs, so listeners may freely read and write the tree.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::node::{GeometryChanged, NodeId, NodeStyle, VisualNode};
use crate::element::Cleanup;
use crate::error::{BindError, Result};
use crate::types::{Display, Rect, Vec2};

// =============================================================================
// Tree State
// =============================================================================

thread_local! {
    static NODES: RefCell<HashMap<NodeId, VisualNode>> = RefCell::new(HashMap::new());
    static NEXT_NODE: Cell<u64> = const { Cell::new(0) };
    static NEXT_LISTENER: Cell<u64> = const { Cell::new(0) };
    static LAYOUT_DIRTY: Cell<bool> = const { Cell::new(false) };
}

fn next_listener_id() -> u64 {
    NEXT_LISTENER.with(|next| {
        let id = next.get();
        next.set(id + 1);
        id
    })
}

fn mark_dirty() {
    LAYOUT_DIRTY.with(|dirty| dirty.set(true));
}

/// Whether any node was written since the last [`clear_layout_dirty`].
pub fn is_layout_dirty() -> bool {
    LAYOUT_DIRTY.with(|dirty| dirty.get())
}

pub(crate) fn clear_layout_dirty() {
    LAYOUT_DIRTY.with(|dirty| dirty.set(false));
}

/// Read one node.
pub fn with_node<R>(node: NodeId, f: impl FnOnce(&VisualNode) -> R) -> Result<R> {
    NODES.with(|nodes| {
        nodes
            .borrow()
            .get(&node)
            .map(f)
            .ok_or(BindError::UnknownNode { node })
    })
}

fn with_node_mut<R>(node: NodeId, f: impl FnOnce(&mut VisualNode) -> R) -> Result<R> {
    NODES.with(|nodes| {
        nodes
            .borrow_mut()
            .get_mut(&node)
            .map(f)
            .ok_or(BindError::UnknownNode { node })
    })
}

/// Write one node property: counts a mutation and dirties layout.
fn write_node<R>(node: NodeId, f: impl FnOnce(&mut VisualNode) -> R) -> Result<R> {
    let result = with_node_mut(node, |n| {
        n.mutations += 1;
        f(n)
    })?;
    mark_dirty();
    Ok(result)
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Create a detached node of the given class.
pub fn create_node(class: &'static str) -> NodeId {
    insert_node(class, NodeStyle::default())
}

/// Create a root canvas of fixed size for a tree to be attached to.
pub fn create_canvas(width: f32, height: f32) -> NodeId {
    insert_node(
        "spark-canvas",
        NodeStyle {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        },
    )
}

fn insert_node(class: &'static str, base_style: NodeStyle) -> NodeId {
    let id = NEXT_NODE.with(|next| {
        let id = next.get();
        next.set(id + 1);
        NodeId(id)
    });
    let mut node = VisualNode::new(id, class);
    node.base_style = base_style;
    NODES.with(|nodes| nodes.borrow_mut().insert(id, node));
    mark_dirty();
    id
}

pub fn contains(node: NodeId) -> bool {
    NODES.with(|nodes| nodes.borrow().contains_key(&node))
}

pub fn node_count() -> usize {
    NODES.with(|nodes| nodes.borrow().len())
}

/// Detach `node` from its parent. Does nothing for a root.
pub fn remove_from_hierarchy(node: NodeId) -> Result<()> {
    let parent = with_node_mut(node, |n| n.parent.take())?;
    if let Some(parent) = parent {
        with_node_mut(parent, |p| p.children.retain(|&c| c != node))?;
        mark_dirty();
    }
    Ok(())
}

/// Detach `node` and drop it together with its whole subtree.
///
/// Listeners owned by the released nodes are dropped with them.
pub fn release_tree(node: NodeId) -> Result<usize> {
    remove_from_hierarchy(node)?;
    let released = NODES.with(|nodes| {
        let mut nodes = nodes.borrow_mut();
        let mut stack = vec![node];
        let mut released = Vec::new();
        while let Some(id) = stack.pop() {
            if let Some(n) = nodes.remove(&id) {
                stack.extend(n.children.iter().copied());
                released.push(n);
            }
        }
        released
    });
    // Listener closures drop here, outside the arena borrow.
    let count = released.len();
    drop(released);
    mark_dirty();
    Ok(count)
}

/// Drop every node (for testing).
pub fn reset_visual_tree() {
    let nodes = NODES.with(|nodes| std::mem::take(&mut *nodes.borrow_mut()));
    drop(nodes);
    clear_layout_dirty();
}

// =============================================================================
// Hierarchy
// =============================================================================

/// Set where appended children go. `container` should be a descendant.
pub fn set_content_container(node: NodeId, container: NodeId) -> Result<()> {
    with_node_mut(node, |n| n.content_container = Some(container))
}

/// The node children are appended to: the content container or `node` itself.
pub fn content_container(node: NodeId) -> Result<NodeId> {
    with_node(node, |n| n.content_container.unwrap_or(node))
}

/// Append `child` to the content container of `parent`.
///
/// The child is detached from any previous parent first.
pub fn append_child(parent: NodeId, child: NodeId) -> Result<()> {
    let target = content_container(parent)?;
    if !contains(target) {
        return Err(BindError::UnknownNode { node: target });
    }
    remove_from_hierarchy(child)?;
    with_node_mut(child, |c| c.parent = Some(target))?;
    with_node_mut(target, |t| t.children.push(child))?;
    mark_dirty();
    Ok(())
}

/// Replace the children of `parent`'s content container with `children`.
///
/// Nodes that were children but are not in the list are detached, not
/// released. Listed nodes are moved in from wherever they were.
pub fn set_children(parent: NodeId, children: &[NodeId]) -> Result<()> {
    let target = content_container(parent)?;
    if let Some(&missing) = children.iter().find(|&&c| !contains(c)) {
        return Err(BindError::UnknownNode { node: missing });
    }

    let old = with_node_mut(target, |t| std::mem::take(&mut t.children))?;
    for &child in &old {
        if !children.contains(&child) {
            let _ = with_node_mut(child, |c| c.parent = None);
        }
    }
    for &child in children {
        let previous = with_node(child, |c| c.parent)?;
        if let Some(previous) = previous.filter(|&p| p != target) {
            with_node_mut(previous, |p| p.children.retain(|&c| c != child))?;
        }
        with_node_mut(child, |c| c.parent = Some(target))?;
    }
    with_node_mut(target, |t| t.children = children.to_vec())?;
    mark_dirty();
    Ok(())
}

/// Parent of `node`; `None` for roots and unknown nodes.
pub fn parent(node: NodeId) -> Option<NodeId> {
    with_node(node, |n| n.parent).ok().flatten()
}

/// Direct children of `node`, in order.
pub fn children(node: NodeId) -> Result<Vec<NodeId>> {
    with_node(node, |n| n.children.clone())
}

/// Children of `node`'s content container.
pub fn content_children(node: NodeId) -> Result<Vec<NodeId>> {
    children(content_container(node)?)
}

/// Whether `node` and every ancestor above it accept input.
pub fn is_enabled_in_hierarchy(node: NodeId) -> Result<bool> {
    for current in std::iter::successors(Some(node), |&n| parent(n)) {
        if !is_enabled(current)? {
            return Ok(false);
        }
    }
    Ok(true)
}

// =============================================================================
// Properties
// =============================================================================

/// Set the class style. Builders call this once when creating a node.
pub fn set_base_style(node: NodeId, style: NodeStyle) -> Result<()> {
    with_node_mut(node, |n| n.base_style = style)?;
    mark_dirty();
    Ok(())
}

pub fn inline_style(node: NodeId) -> Result<NodeStyle> {
    with_node(node, |n| n.inline_style)
}

/// Inline style layered over the class style.
pub fn resolved_style(node: NodeId) -> Result<NodeStyle> {
    with_node(node, |n| n.resolved_style())
}

/// Replace the whole inline style.
pub fn set_inline_style(node: NodeId, style: NodeStyle) -> Result<()> {
    write_node(node, |n| n.inline_style = style)
}

/// Edit the inline style.
pub fn update_inline_style(node: NodeId, edit: impl FnOnce(&mut NodeStyle)) -> Result<()> {
    write_node(node, |n| edit(&mut n.inline_style))
}

/// Set the inline display.
pub fn set_display(node: NodeId, display: Display) -> Result<()> {
    update_inline_style(node, |style| style.display = Some(display))
}

pub fn set_enabled(node: NodeId, enabled: bool) -> Result<()> {
    write_node(node, |n| n.enabled = enabled)
}

pub fn is_enabled(node: NodeId) -> Result<bool> {
    with_node(node, |n| n.enabled)
}

pub fn set_text(node: NodeId, text: impl Into<String>) -> Result<()> {
    let text = text.into();
    write_node(node, |n| n.text = Some(text))
}

pub fn text(node: NodeId) -> Result<Option<String>> {
    with_node(node, |n| n.text.clone())
}

/// Set the transform scale of `node` (applies to its subtree).
pub fn set_scale(node: NodeId, scale: Vec2) -> Result<()> {
    write_node(node, |n| n.scale = scale)
}

pub fn class(node: NodeId) -> Result<&'static str> {
    with_node(node, |n| n.class)
}

/// Number of property writes made to `node`.
pub fn mutation_count(node: NodeId) -> Result<u32> {
    with_node(node, |n| n.mutations)
}

// =============================================================================
// Geometry
// =============================================================================

/// Last resolved rect relative to the parent.
pub fn layout_rect(node: NodeId) -> Result<Rect> {
    with_node(node, |n| n.layout)
}

/// Last resolved rect in root canvas space.
pub fn world_bound(node: NodeId) -> Result<Rect> {
    with_node(node, |n| n.world_bound)
}

/// Accumulated scale of `node` and its ancestors.
pub fn world_scale(node: NodeId) -> Result<Vec2> {
    with_node(node, |n| n.world_scale)
}

/// Store a resolved layout; returns the previous world bound.
pub(crate) fn store_geometry(
    node: NodeId,
    layout: Rect,
    world_bound: Rect,
    world_scale: Vec2,
) -> Result<Rect> {
    with_node_mut(node, |n| {
        n.layout = layout;
        n.world_scale = world_scale;
        std::mem::replace(&mut n.world_bound, world_bound)
    })
}

// =============================================================================
// Listeners
// =============================================================================

/// Generates `on_*` subscription functions and `*_listeners` snapshots.
macro_rules! node_listeners {
    ($($(#[$doc:meta])* $subscribe:ident, $snapshot:ident => $field:ident : $ty:ty;)*) => {
        $(
            $(#[$doc])*
            pub fn $subscribe(node: NodeId, listener: $ty) -> Result<Cleanup> {
                let id = next_listener_id();
                with_node_mut(node, |n| n.$field.push((id, listener)))?;
                Ok(Box::new(move || {
                    let removed = with_node_mut(node, |n| {
                        n.$field
                            .iter()
                            .position(|(listener_id, _)| *listener_id == id)
                            .map(|index| n.$field.remove(index))
                    });
                    drop(removed);
                }))
            }

            pub(crate) fn $snapshot(node: NodeId) -> Vec<$ty> {
                with_node(node, |n| n.$field.iter().map(|(_, l)| l.clone()).collect())
                    .unwrap_or_default()
            }
        )*
    };
}

node_listeners! {
    /// Run `listener` after every layout pass that resolves `node`.
    on_layout_resolved, layout_listeners => layout_listeners: Rc<dyn Fn(&GeometryChanged) -> Result<()>>;
    /// Run `listener` when text is typed into `node`.
    on_input, input_listeners => input_listeners: Rc<dyn Fn(&str) -> Result<()>>;
    /// Run `listener` when `node` is clicked.
    on_click, click_listeners => click_listeners: Rc<dyn Fn() -> Result<()>>;
}

/// Whether any layout listener is registered on `node`.
pub fn has_layout_listeners(node: NodeId) -> bool {
    with_node(node, |n| !n.layout_listeners.is_empty()).unwrap_or(false)
}

/// Type `text` into `node`, as the host's input system would.
///
/// The node shows the typed text before listeners run. Input to a node
/// under a disabled ancestor (or disabled itself) is swallowed.
pub fn dispatch_input(node: NodeId, text: &str) -> Result<()> {
    if !is_enabled_in_hierarchy(node)? {
        return Ok(());
    }
    set_text(node, text)?;
    for listener in input_listeners(node) {
        listener(text)?;
    }
    Ok(())
}

/// Deliver a click to `node`. Clicks inside a disabled subtree are swallowed.
pub fn dispatch_click(node: NodeId) -> Result<()> {
    if !is_enabled_in_hierarchy(node)? {
        return Ok(());
    }
    for listener in click_listeners(node) {
        listener()?;
    }
    Ok(())
}

pub(crate) fn dispatch_geometry(event: &GeometryChanged) -> Result<()> {
    for listener in layout_listeners(event.node) {
        listener(event)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() {
        reset_visual_tree();
    }

    #[test]
    fn test_create_and_release() {
        setup();

        let root = create_node("root");
        let child = create_node("child");
        let grandchild = create_node("grandchild");
        append_child(root, child).unwrap();
        append_child(child, grandchild).unwrap();
        assert_eq!(node_count(), 3);

        assert_eq!(release_tree(child).unwrap(), 2);
        assert_eq!(node_count(), 1);
        assert!(children(root).unwrap().is_empty());
        assert!(!contains(grandchild));
    }

    #[test]
    fn test_ids_not_reused() {
        setup();

        let a = create_node("a");
        release_tree(a).unwrap();
        let b = create_node("b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_append_uses_content_container() {
        setup();

        let window = create_node("window");
        let content = create_node("content");
        append_child(window, content).unwrap();
        set_content_container(window, content).unwrap();

        let child = create_node("child");
        append_child(window, child).unwrap();

        assert_eq!(parent(child), Some(content));
        assert_eq!(content_children(window).unwrap(), vec![child]);
        assert_eq!(children(window).unwrap(), vec![content]);
    }

    #[test]
    fn test_append_moves_child() {
        setup();

        let a = create_node("a");
        let b = create_node("b");
        let child = create_node("child");
        append_child(a, child).unwrap();
        append_child(b, child).unwrap();

        assert!(children(a).unwrap().is_empty());
        assert_eq!(children(b).unwrap(), vec![child]);
    }

    #[test]
    fn test_set_children_detaches_missing() {
        setup();

        let parent_node = create_node("parent");
        let a = create_node("a");
        let b = create_node("b");
        let c = create_node("c");
        append_child(parent_node, a).unwrap();
        append_child(parent_node, b).unwrap();

        set_children(parent_node, &[c, a]).unwrap();

        assert_eq!(children(parent_node).unwrap(), vec![c, a]);
        assert_eq!(parent(b), None);
        assert!(contains(b));
    }

    #[test]
    fn test_set_children_rejects_unknown() {
        setup();

        let parent_node = create_node("parent");
        let gone = create_node("gone");
        release_tree(gone).unwrap();

        let err = set_children(parent_node, &[gone]).unwrap_err();
        assert!(matches!(err, BindError::UnknownNode { node } if node == gone));
    }

    #[test]
    fn test_every_write_counts() {
        setup();

        let node = create_node("n");
        set_enabled(node, true).unwrap();
        set_enabled(node, true).unwrap();
        set_display(node, Display::None).unwrap();
        assert_eq!(mutation_count(node).unwrap(), 3);
    }

    #[test]
    fn test_unknown_node_errors() {
        setup();

        let node = create_node("n");
        release_tree(node).unwrap();
        assert!(matches!(set_text(node, "x"), Err(BindError::UnknownNode { .. })));
        assert_eq!(parent(node), None);
    }

    #[test]
    fn test_input_listener_cleanup() {
        setup();

        let node = create_node("input");
        let typed = Rc::new(RefCell::new(Vec::new()));
        let typed_clone = typed.clone();
        let cleanup = on_input(
            node,
            Rc::new(move |text: &str| {
                typed_clone.borrow_mut().push(text.to_string());
                Ok(())
            }),
        )
        .unwrap();

        dispatch_input(node, "a").unwrap();
        cleanup();
        dispatch_input(node, "b").unwrap();

        assert_eq!(*typed.borrow(), vec!["a".to_string()]);
    }

    #[test]
    fn test_disabled_swallows_clicks() {
        setup();

        let node = create_node("button");
        let clicks = Rc::new(Cell::new(0));
        let clicks_clone = clicks.clone();
        let _cleanup = on_click(
            node,
            Rc::new(move || {
                clicks_clone.set(clicks_clone.get() + 1);
                Ok(())
            }),
        )
        .unwrap();

        dispatch_click(node).unwrap();
        set_enabled(node, false).unwrap();
        dispatch_click(node).unwrap();
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_disabled_ancestor_swallows_input() {
        setup();

        let row = create_node("row");
        let input = create_node("field-input");
        append_child(row, input).unwrap();
        let typed = Rc::new(Cell::new(0));
        let typed_clone = typed.clone();
        let _cleanup = on_input(
            input,
            Rc::new(move |_: &str| {
                typed_clone.set(typed_clone.get() + 1);
                Ok(())
            }),
        )
        .unwrap();

        set_enabled(row, false).unwrap();
        dispatch_input(input, "9").unwrap();
        assert_eq!(typed.get(), 0);
        assert_eq!(text(input).unwrap(), None);
        assert!(!is_enabled_in_hierarchy(input).unwrap());

        set_enabled(row, true).unwrap();
        dispatch_input(input, "9").unwrap();
        assert_eq!(typed.get(), 1);
    }

    #[test]
    fn test_canvas_has_fixed_size() {
        setup();

        let canvas = create_canvas(320.0, 200.0);
        let style = resolved_style(canvas).unwrap();
        assert_eq!(style.width, Some(320.0));
        assert_eq!(style.height, Some(200.0));
        assert_eq!(mutation_count(canvas).unwrap(), 0);
    }

    #[test]
    fn test_set_inline_style_replaces_all() {
        setup();

        let node = create_node("n");
        update_inline_style(node, |style| style.width = Some(10.0)).unwrap();
        set_inline_style(
            node,
            NodeStyle {
                height: Some(5.0),
                ..Default::default()
            },
        )
        .unwrap();

        let inline = inline_style(node).unwrap();
        assert_eq!(inline.width, None);
        assert_eq!(inline.height, Some(5.0));
    }

    #[test]
    fn test_dirty_flag() {
        setup();

        let node = create_node("n");
        assert!(is_layout_dirty());
        clear_layout_dirty();
        set_text(node, "hi").unwrap();
        assert!(is_layout_dirty());
    }
}
