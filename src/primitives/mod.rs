//! Primitives - One builder function per element kind.
//!
//! Each builder creates the native node (plus any internal header, viewport
//! or input nodes), builds the element's children into its content
//! container, and wires the kind-specific handlers (open state, position,
//! value text, input, clicks). The engine wires the shared handlers.
//!
//! Builders release everything they created if any step fails.

mod containers;
mod fields;
mod leaves;

pub use containers::{
    build_box, build_column, build_composite_field, build_dynamic, build_fold, build_indent,
    build_list_item, build_page, build_popup_menu, build_row, build_scroll_view, build_window,
    build_window_launcher,
};
pub use fields::build_field;
pub use leaves::{build_button, build_help_box, build_image, build_label, build_space};

use crate::element::Element;
use crate::engine::{BuildFn, apply_text, track};
use crate::error::Result;
use crate::types::{ElementKind, FlexDirection};
use crate::visual::{self, NodeId, NodeStyle};

/// Builders installed by default, one per kind.
pub(crate) const DEFAULT_BUILDERS: &[(ElementKind, BuildFn)] = &[
    // Containers
    (ElementKind::Window, build_window),
    (ElementKind::Row, build_row),
    (ElementKind::Column, build_column),
    (ElementKind::Box, build_box),
    (ElementKind::ScrollView, build_scroll_view),
    (ElementKind::Indent, build_indent),
    (ElementKind::Page, build_page),
    (ElementKind::ListViewItemContainer, build_list_item),
    (ElementKind::Fold, build_fold),
    (ElementKind::DynamicElement, build_dynamic),
    (ElementKind::CompositeField, build_composite_field),
    (ElementKind::WindowLauncher, build_window_launcher),
    (ElementKind::PopupMenu, build_popup_menu),
    // Leaves
    (ElementKind::Label, build_label),
    (ElementKind::HelpBox, build_help_box),
    (ElementKind::Space, build_space),
    (ElementKind::Image, build_image),
    (ElementKind::Button, build_button),
    // Fields
    (ElementKind::IntField, build_field),
    (ElementKind::UIntField, build_field),
    (ElementKind::FloatField, build_field),
    (ElementKind::TextField, build_field),
    (ElementKind::BoolField, build_field),
    (ElementKind::ColorField, build_field),
    (ElementKind::Dropdown, build_field),
    (ElementKind::IntSlider, build_field),
    (ElementKind::FloatSlider, build_field),
    (ElementKind::IntMinMaxSlider, build_field),
    (ElementKind::FloatMinMaxSlider, build_field),
];

// =============================================================================
// Helpers
// =============================================================================

/// Create a node with a class style.
fn create(class: &'static str, base: NodeStyle) -> Result<NodeId> {
    let node = visual::create_node(class);
    visual::set_base_style(node, base)?;
    Ok(node)
}

fn column_style() -> NodeStyle {
    NodeStyle {
        flex_direction: Some(FlexDirection::Column),
        ..Default::default()
    }
}

fn row_style() -> NodeStyle {
    NodeStyle {
        flex_direction: Some(FlexDirection::Row),
        ..Default::default()
    }
}

/// Show the element's value text on `node`, and keep it current.
fn bind_value_text(element: &Element, node: NodeId) -> Result<()> {
    apply_text(node, &element.value_text())?;

    let weak = element.downgrade();
    track(
        element.id(),
        element.on_value_changed(move |_| {
            if let Some(element) = weak.upgrade() {
                apply_text(node, &element.value_text())?;
            }
            Ok(())
        }),
    );
    Ok(())
}
