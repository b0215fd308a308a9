//! Container Primitives - Group builders.
//!
//! Every group builds its children into a content container. For plain
//! groups that is the node itself; windows, folds, scroll views and
//! composite fields put an inner node there so headers and labels stay out
//! of the rebuildable child list.

use std::rc::Rc;

use super::{column_style, create, row_style};
use crate::config::layout_settings;
use crate::element::Element;
use crate::engine::{
    apply_display, apply_text, build, build_children, fill_node, register_label_alignment, track,
};
use crate::error::Result;
use crate::types::{Display, Vec2};
use crate::visual::{self, NodeId, NodeStyle};

fn open_display(open: bool) -> Display {
    if open { Display::Flex } else { Display::None }
}

/// Show `content` while `element` is open.
fn bind_open(element: &Element, content: NodeId) -> Result<()> {
    apply_display(content, open_display(element.is_open()))?;
    track(
        element.id(),
        element.on_open_changed(move |&open| {
            apply_display(content, open_display(open))?;
            Ok(())
        }),
    );
    Ok(())
}

fn apply_position(node: NodeId, position: Option<Vec2>) -> Result<()> {
    visual::update_inline_style(node, |style| style.position = position)
}

/// Plain group: a node of `class` holding the children directly.
fn build_group(element: &Element, class: &'static str, base: NodeStyle) -> Result<NodeId> {
    fill_node(create(class, base)?, |node| {
        build_children(node, &element.children())
    })
}

// =============================================================================
// Window
// =============================================================================

/// Window: title header over a content container.
///
/// Closing the window hides the content; a position takes the window out of
/// flow and places it absolutely.
pub fn build_window(element: &Element) -> Result<NodeId> {
    fill_node(create("window", column_style())?, |root| {
        // 1. HEADER
        if let Some(title) = element.prefix_label() {
            let header = create("window-header", row_style())?;
            visual::append_child(root, header)?;
            build_children(header, &[title])?;
        }

        // 2. CONTENT
        let content = create(
            "window-content",
            NodeStyle {
                flex_grow: Some(1.0),
                ..column_style()
            },
        )?;
        visual::append_child(root, content)?;
        visual::set_content_container(root, content)?;
        build_children(root, &element.children())?;

        // 3. OPEN / POSITION
        bind_open(element, content)?;
        if let Some(position) = element.position() {
            apply_position(root, Some(position))?;
        }
        track(
            element.id(),
            element.on_position_changed(move |&position| {
                apply_position(root, position)?;
                Ok(())
            }),
        );

        Ok(())
    })
}

// =============================================================================
// Plain Groups
// =============================================================================

pub fn build_row(element: &Element) -> Result<NodeId> {
    build_group(element, "row", row_style())
}

pub fn build_column(element: &Element) -> Result<NodeId> {
    build_group(element, "column", column_style())
}

pub fn build_page(element: &Element) -> Result<NodeId> {
    build_group(
        element,
        "page",
        NodeStyle {
            flex_grow: Some(1.0),
            ..column_style()
        },
    )
}

/// Bordered column.
pub fn build_box(element: &Element) -> Result<NodeId> {
    build_group(
        element,
        "box",
        NodeStyle {
            border: Some(1.0),
            padding: Some(2.0),
            ..column_style()
        },
    )
}

pub fn build_list_item(element: &Element) -> Result<NodeId> {
    build_group(element, "list-view-item", column_style())
}

/// Column whose child is swapped by a structural rebuild on update.
pub fn build_dynamic(element: &Element) -> Result<NodeId> {
    build_group(element, "dynamic-element", column_style())
}

/// Column padded by one indent step per level.
pub fn build_indent(element: &Element) -> Result<NodeId> {
    let padding = layout_settings().indent_size * element.level() as f32;
    build_group(
        element,
        "indent",
        NodeStyle {
            padding_left: Some(padding),
            ..column_style()
        },
    )
}

// =============================================================================
// Scroll View
// =============================================================================

/// Viewport clipping a content column.
pub fn build_scroll_view(element: &Element) -> Result<NodeId> {
    fill_node(create("scroll-view", column_style())?, |root| {
        let viewport = create(
            "scroll-viewport",
            NodeStyle {
                flex_grow: Some(1.0),
                flex_shrink: Some(1.0),
                ..column_style()
            },
        )?;
        let content = create("scroll-content", column_style())?;
        visual::append_child(root, viewport)?;
        visual::append_child(viewport, content)?;
        visual::set_content_container(root, content)?;
        build_children(root, &element.children())
    })
}

// =============================================================================
// Fold
// =============================================================================

/// Clickable header over indented content; clicking toggles the fold.
pub fn build_fold(element: &Element) -> Result<NodeId> {
    fill_node(create("fold", column_style())?, |root| {
        // 1. HEADER
        let header = create("fold-header", row_style())?;
        visual::append_child(root, header)?;
        if let Some(title) = element.prefix_label() {
            build_children(header, &[title])?;
        }

        let weak = element.downgrade();
        let toggle = visual::on_click(
            header,
            Rc::new(move || {
                if let Some(fold) = weak.upgrade() {
                    fold.set_open(!fold.is_open())?;
                }
                Ok(())
            }),
        )?;
        track(element.id(), toggle);

        // 2. CONTENT
        let content = create(
            "fold-content",
            NodeStyle {
                padding_left: Some(layout_settings().indent_size),
                ..column_style()
            },
        )?;
        visual::append_child(root, content)?;
        visual::set_content_container(root, content)?;
        build_children(root, &element.children())?;

        bind_open(element, content)
    })
}

// =============================================================================
// Composite Field
// =============================================================================

/// Aligned prefix label followed by a row of child fields.
pub fn build_composite_field(element: &Element) -> Result<NodeId> {
    fill_node(create("composite-field", row_style())?, |root| {
        if let Some(label) = element.prefix_label() {
            let label_node = build(&label)?;
            visual::append_child(root, label_node)?;
            register_label_alignment(&label, label_node)?;
        }

        let contents = create(
            "composite-contents",
            NodeStyle {
                flex_grow: Some(1.0),
                ..row_style()
            },
        )?;
        visual::append_child(root, contents)?;
        visual::set_content_container(root, contents)?;
        build_children(root, &element.children())
    })
}

// =============================================================================
// Window Launcher
// =============================================================================

/// Launch button over the launched windows; clicking shows or hides them.
pub fn build_window_launcher(element: &Element) -> Result<NodeId> {
    fill_node(create("window-launcher", column_style())?, |root| {
        // 1. BUTTON
        let button = create(
            "window-launcher-button",
            NodeStyle {
                padding: Some(2.0),
                border: Some(1.0),
                ..row_style()
            },
        )?;
        visual::append_child(root, button)?;
        if let Some(title) = element.prefix_label() {
            build_children(button, &[title])?;
        }

        let weak = element.downgrade();
        let toggle = visual::on_click(
            button,
            Rc::new(move || {
                if let Some(launcher) = weak.upgrade() {
                    for window in launcher.children() {
                        window.set_enable(!window.enable())?;
                    }
                }
                Ok(())
            }),
        )?;
        track(element.id(), toggle);

        // 2. WINDOWS
        let content = create("window-launcher-content", column_style())?;
        visual::append_child(root, content)?;
        visual::set_content_container(root, content)?;
        build_children(root, &element.children())
    })
}

// =============================================================================
// Popup Menu
// =============================================================================

/// Click target followed by the item list, shown while the menu is open.
pub fn build_popup_menu(element: &Element) -> Result<NodeId> {
    fill_node(create("popup-menu", column_style())?, |root| {
        // 1. TARGET
        let target = create("popup-menu-target", column_style())?;
        visual::append_child(root, target)?;
        visual::set_content_container(root, target)?;
        build_children(root, &element.children())?;

        let weak = element.downgrade();
        let toggle = visual::on_click(
            target,
            Rc::new(move || {
                if let Some(menu) = weak.upgrade() {
                    menu.set_open(!menu.is_open())?;
                }
                Ok(())
            }),
        )?;
        track(element.id(), toggle);

        // 2. ITEMS
        let items = create(
            "popup-menu-items",
            NodeStyle {
                border: Some(1.0),
                ..column_style()
            },
        )?;
        visual::append_child(root, items)?;
        for (index, name) in element.options().iter().enumerate() {
            let item = create("popup-menu-item", row_style())?;
            visual::append_child(items, item)?;
            apply_text(item, name)?;

            let weak = element.downgrade();
            let select = visual::on_click(
                item,
                Rc::new(move || {
                    if let Some(menu) = weak.upgrade() {
                        menu.select_menu_item(index)?;
                    }
                    Ok(())
                }),
            )?;
            track(element.id(), select);
        }

        bind_open(element, items)
    })
}
