//! Leaf Primitives - Text-bearing and spacer nodes.

use std::rc::Rc;

use super::{bind_value_text, create};
use crate::element::Element;
use crate::engine::{fill_node, track};
use crate::error::Result;
use crate::visual::{self, NodeId, NodeStyle};

fn build_text_leaf(element: &Element, class: &'static str, base: NodeStyle) -> Result<NodeId> {
    fill_node(create(class, base)?, |node| bind_value_text(element, node))
}

pub fn build_label(element: &Element) -> Result<NodeId> {
    build_text_leaf(element, "label", NodeStyle::default())
}

pub fn build_help_box(element: &Element) -> Result<NodeId> {
    build_text_leaf(
        element,
        "help-box",
        NodeStyle {
            border: Some(1.0),
            padding: Some(4.0),
            ..Default::default()
        },
    )
}

/// Image placeholder showing the image name.
pub fn build_image(element: &Element) -> Result<NodeId> {
    build_text_leaf(
        element,
        "image",
        NodeStyle {
            min_width: Some(16.0),
            min_height: Some(16.0),
            ..Default::default()
        },
    )
}

/// Fills the free space of its row or column.
pub fn build_space(_element: &Element) -> Result<NodeId> {
    create(
        "space",
        NodeStyle {
            flex_grow: Some(1.0),
            ..Default::default()
        },
    )
}

/// Text node that runs the element's action when clicked.
pub fn build_button(element: &Element) -> Result<NodeId> {
    let base = NodeStyle {
        padding: Some(2.0),
        border: Some(1.0),
        ..Default::default()
    };
    fill_node(create("button", base)?, |node| {
        bind_value_text(element, node)?;

        let weak = element.downgrade();
        let cleanup = visual::on_click(
            node,
            Rc::new(move || {
                if let Some(button) = weak.upgrade() {
                    button.click();
                }
                Ok(())
            }),
        )?;
        track(element.id(), cleanup);
        Ok(())
    })
}
