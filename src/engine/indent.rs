//! Label Alignment - Keep prefix labels lined up across indentation.
//!
//! A prefix label is given a min width of `label_width - offset`, where the
//! offset is its horizontal distance from the nearest indent origin
//! (window, fold or list item) in unscaled units. Labels at any indent depth
//! then end on the same column, so the values after them line up.
//!
//! The offset is only known after layout, so it is recomputed from every
//! layout-resolved event whose bounds actually moved.

use std::rc::Rc;

use tracing::trace;

use super::registry;
use crate::config::{LayoutSettings, layout_settings};
use crate::element::Element;
use crate::error::Result;
use crate::visual::{self, GeometryChanged, NodeId};

/// Bound on the ancestor walk.
const MAX_ANCESTOR_DEPTH: usize = 256;

/// Align the prefix-label node `node` of `label` for the label's lifetime.
///
/// The listener is released together with the label's registry entry.
pub fn register_label_alignment(label: &Element, node: NodeId) -> Result<()> {
    let weak = label.downgrade();
    let cleanup = visual::on_layout_resolved(
        node,
        Rc::new(move |event: &GeometryChanged| {
            let settings = layout_settings();
            if event.old_rect.approx_eq(&event.new_rect, settings.geometry_epsilon) {
                return Ok(());
            }
            match weak.upgrade() {
                Some(label) => align_label(&label, event.node, &settings),
                None => Ok(()),
            }
        }),
    )?;
    registry::track(label.id(), cleanup);
    Ok(())
}

/// Horizontal offset of `node` from the nearest indent origin above `label`.
///
/// Measured in the node's unscaled units. Without an origin ancestor the
/// offset is taken from the root canvas; an origin that was never built is
/// an error.
pub fn indent_offset(label: &Element, node: NodeId) -> Result<f32> {
    let mut x = visual::world_bound(node)?.x;

    let origin = label
        .ancestors()
        .take(MAX_ANCESTOR_DEPTH)
        .find(|ancestor| ancestor.kind().is_indent_origin());
    if let Some(origin) = origin {
        let origin_node = registry::node_of(origin.id())?;
        x -= visual::world_bound(origin_node)?.x;
    }

    // Rotation is not modeled; only the x scale matters.
    let scale = visual::world_scale(node)?.x;
    Ok(if scale != 0.0 { x / scale } else { x })
}

fn align_label(label: &Element, node: NodeId, settings: &LayoutSettings) -> Result<()> {
    let offset = indent_offset(label, node)?;
    let min_width = (settings.label_width - offset).max(0.0);

    if visual::inline_style(node)?.min_width == Some(min_width) {
        return Ok(());
    }
    trace!(label = %label.id(), node = %node, offset, min_width, "label aligned");
    visual::update_inline_style(node, |style| style.min_width = Some(min_width))
}
