//! Field Primitive - Prefix label plus an editable value node.
//!
//! ```text
//! row (field kind)
//!   ├─ label        aligned to the label column
//!   └─ field-input  shows the value text, receives typed input
//! ```
//!
//! Typed text is parsed into the variant of the current value. Accepted
//! input goes back through [`Element::set_value_from_view`]; rejected input
//! is logged and the input reverts to the current value text.

use std::rc::Rc;

use tracing::warn;

use super::{bind_value_text, create, row_style};
use crate::element::Element;
use crate::engine::{apply_text, build, fill_node, register_label_alignment, track};
use crate::error::Result;
use crate::visual::{self, NodeId, NodeStyle};

/// Builder shared by every field kind.
pub fn build_field(element: &Element) -> Result<NodeId> {
    fill_node(create(element.kind().name(), row_style())?, |root| {
        // 1. PREFIX LABEL
        if let Some(label) = element.prefix_label() {
            let label_node = build(&label)?;
            visual::append_child(root, label_node)?;
            register_label_alignment(&label, label_node)?;
        }

        // 2. VALUE NODE
        let input = create(
            "field-input",
            NodeStyle {
                flex_grow: Some(1.0),
                ..Default::default()
            },
        )?;
        visual::append_child(root, input)?;
        bind_value_text(element, input)?;

        // 3. INPUT
        let weak = element.downgrade();
        let cleanup = visual::on_input(
            input,
            Rc::new(move |text: &str| match weak.upgrade() {
                Some(field) => accept_input(&field, input, text),
                None => Ok(()),
            }),
        )?;
        track(element.id(), cleanup);

        Ok(())
    })
}

fn accept_input(field: &Element, input: NodeId, text: &str) -> Result<()> {
    match field.value().parse_like(text, &field.options()) {
        Some(value) => field.set_value_from_view(value)?,
        None => warn!(element = %field.id(), kind = %field.kind(), input = text, "rejected field input"),
    }
    // Show the canonical (possibly clamped) text, or revert.
    apply_text(input, &field.value_text())?;
    Ok(())
}
