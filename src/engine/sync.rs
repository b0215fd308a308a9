//! Sync Handlers - Mirror element state onto native node properties.
//!
//! Each handler touches only the properties it owns. Enable, interactable
//! and value text compare the current native state first and write nothing
//! when it already matches. Style recomputes every style-derived property
//! from the full record on each change.

use crate::error::Result;
use crate::types::{Display, Style};
use crate::visual::{self, NodeId};

/// Show `node` when `enable` is set, hide it otherwise.
///
/// Returns whether the node was written.
pub fn apply_enable(node: NodeId, enable: bool) -> Result<bool> {
    let wanted = if enable { Display::Flex } else { Display::None };
    apply_display(node, wanted)
}

/// Set the display of `node` unless it already resolves to `display`.
pub fn apply_display(node: NodeId, display: Display) -> Result<bool> {
    if visual::resolved_style(node)?.resolved_display() == display {
        return Ok(false);
    }
    visual::set_display(node, display)?;
    Ok(true)
}

/// Let `node` receive input when `interactable` is set.
pub fn apply_interactable(node: NodeId, interactable: bool) -> Result<bool> {
    if visual::is_enabled(node)? == interactable {
        return Ok(false);
    }
    visual::set_enabled(node, interactable)?;
    Ok(true)
}

/// Recompute the style-derived inline properties of `node`.
///
/// Unset dimensions clear the inline value so the class style (or the
/// layout default) applies. A fixed width or height pins the node: it stops
/// growing but may still shrink.
pub fn apply_style(node: NodeId, style: &Style) -> Result<()> {
    visual::update_inline_style(node, |inline| {
        inline.width = style.width;
        inline.height = style.height;
        inline.min_width = style.min_width;
        inline.min_height = style.min_height;
        inline.max_width = style.max_width;
        inline.max_height = style.max_height;

        if style.has_fixed_size() {
            inline.flex_grow = Some(0.0);
            inline.flex_shrink = Some(1.0);
        } else {
            inline.flex_grow = None;
            inline.flex_shrink = None;
        }

        inline.color = style.color;
        inline.background_color = style.background_color;
    })
}

/// Show `text` on `node` unless it already does.
pub fn apply_text(node: NodeId, text: &str) -> Result<bool> {
    if visual::text(node)?.as_deref() == Some(text) {
        return Ok(false);
    }
    visual::set_text(node, text)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgba;
    use crate::visual::{
        create_node, inline_style, mutation_count, reset_visual_tree, resolved_style,
        set_base_style, NodeStyle,
    };

    fn setup() -> NodeId {
        reset_visual_tree();
        create_node("test")
    }

    #[test]
    fn test_enable_is_idempotent() {
        let node = setup();

        assert!(!apply_enable(node, true).unwrap());
        assert!(apply_enable(node, false).unwrap());
        assert!(!apply_enable(node, false).unwrap());
        assert_eq!(mutation_count(node).unwrap(), 1);
        assert_eq!(resolved_style(node).unwrap().display, Some(Display::None));
    }

    #[test]
    fn test_interactable_only_touches_enabled() {
        let node = setup();

        assert!(apply_interactable(node, false).unwrap());
        assert!(!apply_interactable(node, false).unwrap());
        assert!(!visual::is_enabled(node).unwrap());
        assert_eq!(resolved_style(node).unwrap().resolved_display(), Display::Flex);
    }

    #[test]
    fn test_fixed_width_pins_growth() {
        let node = setup();

        let style = Style {
            width: Some(120.0),
            ..Default::default()
        };
        apply_style(node, &style).unwrap();

        let inline = inline_style(node).unwrap();
        assert_eq!(inline.width, Some(120.0));
        assert_eq!(inline.height, None);
        assert_eq!(inline.flex_grow, Some(0.0));
        assert_eq!(inline.flex_shrink, Some(1.0));
    }

    #[test]
    fn test_cleared_style_restores_class_defaults() {
        let node = setup();
        set_base_style(
            node,
            NodeStyle {
                flex_grow: Some(1.0),
                ..Default::default()
            },
        )
        .unwrap();

        apply_style(
            node,
            &Style {
                height: Some(30.0),
                color: Some(Rgba::RED),
                ..Default::default()
            },
        )
        .unwrap();
        apply_style(node, &Style::default()).unwrap();

        let inline = inline_style(node).unwrap();
        assert_eq!(inline, NodeStyle::default());
        assert_eq!(resolved_style(node).unwrap().flex_grow, Some(1.0));
    }

    #[test]
    fn test_text_is_idempotent() {
        let node = setup();

        assert!(apply_text(node, "5").unwrap());
        assert!(!apply_text(node, "5").unwrap());
        assert_eq!(mutation_count(node).unwrap(), 1);
    }
}
