//! VisualNode - One retained node of the host visual tree.
//!
//! Style is split the way retained toolkits split it: a class (base) style set
//! once by the builder that creates the node, and an inline style written by
//! the sync handlers. Unset inline properties fall back to the class style,
//! and unset class properties fall back to the layout engine's defaults.

use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::types::{Display, FlexDirection, Rect, Rgba, Vec2};

// =============================================================================
// Identity
// =============================================================================

/// Identity of a native node. Never reused within a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

// =============================================================================
// Node Style
// =============================================================================

/// Style properties of a native node. `None` is the unset (auto) state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeStyle {
    pub display: Option<Display>,
    pub flex_direction: Option<FlexDirection>,
    pub flex_grow: Option<f32>,
    pub flex_shrink: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub min_width: Option<f32>,
    pub min_height: Option<f32>,
    pub max_width: Option<f32>,
    pub max_height: Option<f32>,
    pub padding_left: Option<f32>,
    pub padding: Option<f32>,
    pub border: Option<f32>,
    pub color: Option<Rgba>,
    pub background_color: Option<Rgba>,
    /// Absolute position inside the parent; `None` keeps the node in flow.
    pub position: Option<Vec2>,
}

impl NodeStyle {
    /// Layer `self` over `base`: every property set here wins.
    pub fn over(&self, base: &NodeStyle) -> NodeStyle {
        NodeStyle {
            display: self.display.or(base.display),
            flex_direction: self.flex_direction.or(base.flex_direction),
            flex_grow: self.flex_grow.or(base.flex_grow),
            flex_shrink: self.flex_shrink.or(base.flex_shrink),
            width: self.width.or(base.width),
            height: self.height.or(base.height),
            min_width: self.min_width.or(base.min_width),
            min_height: self.min_height.or(base.min_height),
            max_width: self.max_width.or(base.max_width),
            max_height: self.max_height.or(base.max_height),
            padding_left: self.padding_left.or(base.padding_left),
            padding: self.padding.or(base.padding),
            border: self.border.or(base.border),
            color: self.color.or(base.color),
            background_color: self.background_color.or(base.background_color),
            position: self.position.or(base.position),
        }
    }

    /// Display with the unset state resolved.
    pub fn resolved_display(&self) -> Display {
        self.display.unwrap_or_default()
    }
}

// =============================================================================
// Events
// =============================================================================

/// Fired for every node with listeners after each layout pass.
///
/// Bounds are in world (root canvas) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryChanged {
    pub node: NodeId,
    pub old_rect: Rect,
    pub new_rect: Rect,
}

pub(crate) type LayoutListener = Rc<dyn Fn(&GeometryChanged) -> Result<()>>;
pub(crate) type InputListener = Rc<dyn Fn(&str) -> Result<()>>;
pub(crate) type ClickListener = Rc<dyn Fn() -> Result<()>>;

// =============================================================================
// Visual Node
// =============================================================================

/// A retained node owned by the visual tree.
pub struct VisualNode {
    pub id: NodeId,
    /// Class name (builders use `spark-<kind>` names).
    pub class: &'static str,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Where `append_child` puts children; the node itself when `None`.
    pub content_container: Option<NodeId>,
    pub base_style: NodeStyle,
    pub inline_style: NodeStyle,
    /// Responds to input.
    pub enabled: bool,
    pub text: Option<String>,
    /// Transform scale applied to this node and its subtree.
    pub scale: Vec2,
    /// Layout rect relative to the parent.
    pub layout: Rect,
    pub world_bound: Rect,
    pub world_scale: Vec2,
    /// Number of property writes (style, display, enabled, text).
    pub mutations: u32,
    pub(crate) layout_listeners: Vec<(u64, LayoutListener)>,
    pub(crate) input_listeners: Vec<(u64, InputListener)>,
    pub(crate) click_listeners: Vec<(u64, ClickListener)>,
}

impl VisualNode {
    pub(crate) fn new(id: NodeId, class: &'static str) -> Self {
        Self {
            id,
            class,
            parent: None,
            children: Vec::new(),
            content_container: None,
            base_style: NodeStyle::default(),
            inline_style: NodeStyle::default(),
            enabled: true,
            text: None,
            scale: Vec2::ONE,
            layout: Rect::ZERO,
            world_bound: Rect::ZERO,
            world_scale: Vec2::ONE,
            mutations: 0,
            layout_listeners: Vec::new(),
            input_listeners: Vec::new(),
            click_listeners: Vec::new(),
        }
    }

    /// Inline style layered over the class style.
    pub fn resolved_style(&self) -> NodeStyle {
        self.inline_style.over(&self.base_style)
    }
}

impl fmt::Debug for VisualNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualNode")
            .field("id", &self.id)
            .field("class", &self.class)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("text", &self.text)
            .field("layout", &self.layout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_over_base() {
        let base = NodeStyle {
            flex_grow: Some(1.0),
            width: Some(10.0),
            ..Default::default()
        };
        let inline = NodeStyle {
            width: Some(20.0),
            ..Default::default()
        };

        let resolved = inline.over(&base);
        assert_eq!(resolved.width, Some(20.0));
        assert_eq!(resolved.flex_grow, Some(1.0));
        assert_eq!(resolved.height, None);
    }

    #[test]
    fn test_default_display_is_flex() {
        assert_eq!(NodeStyle::default().resolved_display(), Display::Flex);
    }
}
