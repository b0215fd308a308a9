//! Visual - The host's retained visual tree.
//!
//! A minimal retained-mode node tree with flex styles, content containers,
//! input and click events, and layout-resolved callbacks. The builder engine
//! is its only writer; layout reads it and stores resolved geometry back.

mod node;
mod tree;

pub use node::{GeometryChanged, NodeId, NodeStyle, VisualNode};
pub use tree::{
    append_child, children, class, contains, content_children, content_container, create_canvas,
    create_node, dispatch_click, dispatch_input, has_layout_listeners, inline_style,
    is_enabled, is_enabled_in_hierarchy, is_layout_dirty, layout_rect, mutation_count, node_count,
    on_click, on_input, on_layout_resolved, parent, release_tree, remove_from_hierarchy,
    reset_visual_tree, resolved_style, set_base_style, set_children, set_content_container,
    set_display, set_enabled, set_inline_style, set_scale, set_text, text, update_inline_style,
    with_node, world_bound, world_scale,
};

pub(crate) use tree::{clear_layout_dirty, dispatch_geometry, store_geometry};
