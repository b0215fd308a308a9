//! Taffy Bridge - Integration with Taffy layout engine
//!
//! Converts visual node styles to Taffy styles, runs layout computation, and
//! writes resolved geometry back to the visual tree.
//!
//! A fresh Taffy tree is built per pass. After each pass, every node with
//! layout-resolved listeners gets a [`GeometryChanged`] event carrying its
//! previous and new world bound, in pre-order. Listeners that write to the
//! tree trigger another pass, up to `max_layout_passes`.

use std::collections::HashMap;

use taffy::{
    AvailableSpace, Dimension as TaffyDimension, Display as TaffyDisplay,
    FlexDirection as TaffyFlexDirection, LengthPercentage, LengthPercentageAuto,
    NodeId as TaffyNodeId, Position as TaffyPosition, Rect as TaffyRect, Size, Style, TaffyError,
    TaffyTree,
};
use tracing::{trace, warn};

use crate::config::layout_settings;
use crate::error::{BindError, Result};
use crate::types::{Display, FlexDirection, Rect, Vec2};
use crate::visual::{
    self, GeometryChanged, NodeId, NodeStyle, clear_layout_dirty, dispatch_geometry,
    has_layout_listeners, is_layout_dirty, store_geometry, with_node,
};

use super::text_measure::{LINE_HEIGHT, line_count, text_width};

// =============================================================================
// STYLE CONVERSION
// =============================================================================

fn to_taffy_dimension(value: Option<f32>) -> TaffyDimension {
    match value {
        Some(length) => TaffyDimension::Length(length),
        None => TaffyDimension::Auto,
    }
}

fn to_taffy_display(display: Display) -> TaffyDisplay {
    match display {
        Display::Flex => TaffyDisplay::Flex,
        Display::None => TaffyDisplay::None,
    }
}

fn to_taffy_flex_direction(dir: FlexDirection) -> TaffyFlexDirection {
    match dir {
        FlexDirection::Column => TaffyFlexDirection::Column,
        FlexDirection::Row => TaffyFlexDirection::Row,
    }
}

/// Build a Taffy Style from a resolved node style.
fn build_style(style: &NodeStyle) -> Style {
    let padding = style.padding.unwrap_or(0.0);
    let border = style.border.unwrap_or(0.0);

    let (position, inset) = match style.position {
        Some(at) => (
            TaffyPosition::Absolute,
            TaffyRect {
                left: LengthPercentageAuto::Length(at.x),
                right: LengthPercentageAuto::Auto,
                top: LengthPercentageAuto::Length(at.y),
                bottom: LengthPercentageAuto::Auto,
            },
        ),
        None => (
            TaffyPosition::Relative,
            TaffyRect {
                left: LengthPercentageAuto::Auto,
                right: LengthPercentageAuto::Auto,
                top: LengthPercentageAuto::Auto,
                bottom: LengthPercentageAuto::Auto,
            },
        ),
    };

    Style {
        display: to_taffy_display(style.resolved_display()),
        position,
        inset,

        flex_direction: to_taffy_flex_direction(style.flex_direction.unwrap_or_default()),
        flex_grow: style.flex_grow.unwrap_or(0.0),
        flex_shrink: style.flex_shrink.unwrap_or(1.0),

        size: Size {
            width: to_taffy_dimension(style.width),
            height: to_taffy_dimension(style.height),
        },
        min_size: Size {
            width: to_taffy_dimension(style.min_width),
            height: to_taffy_dimension(style.min_height),
        },
        max_size: Size {
            width: to_taffy_dimension(style.max_width),
            height: to_taffy_dimension(style.max_height),
        },

        padding: TaffyRect {
            left: LengthPercentage::Length(style.padding_left.unwrap_or(padding)),
            right: LengthPercentage::Length(padding),
            top: LengthPercentage::Length(padding),
            bottom: LengthPercentage::Length(padding),
        },
        border: TaffyRect {
            left: LengthPercentage::Length(border),
            right: LengthPercentage::Length(border),
            top: LengthPercentage::Length(border),
            bottom: LengthPercentage::Length(border),
        },

        ..Default::default()
    }
}

fn layout_error(err: TaffyError) -> BindError {
    BindError::Layout(err.to_string())
}

// =============================================================================
// TEXT MEASUREMENT
// =============================================================================

/// Measure function for text-bearing nodes.
///
/// Text does not wrap below its natural width unless the available width is
/// definite and smaller. Text nodes are at least one line tall.
fn measure_text(
    text: &str,
    known_dimensions: Size<Option<f32>>,
    available_space: Size<AvailableSpace>,
) -> Size<f32> {
    let natural = text_width(text);
    let width = known_dimensions.width.unwrap_or(match available_space.width {
        AvailableSpace::Definite(available) => natural.min(available),
        AvailableSpace::MinContent | AvailableSpace::MaxContent => natural,
    });
    let lines = line_count(text, width).max(1);

    Size {
        width,
        height: known_dimensions.height.unwrap_or(lines as f32 * LINE_HEIGHT),
    }
}

// =============================================================================
// TREE BUILDING
// =============================================================================

/// Mirror the subtree under `node` into `tree`, recording pre-order.
fn add_subtree(
    tree: &mut TaffyTree<String>,
    node: NodeId,
    order: &mut Vec<(NodeId, TaffyNodeId)>,
) -> Result<TaffyNodeId> {
    let (style, text, children) = with_node(node, |n| {
        (build_style(&n.resolved_style()), n.text.clone(), n.children.clone())
    })?;

    let taffy_node = match text {
        Some(text) => tree.new_leaf_with_context(style, text),
        None => tree.new_leaf(style),
    }
    .map_err(layout_error)?;
    order.push((node, taffy_node));

    for child in children {
        let child_node = add_subtree(tree, child, order)?;
        tree.add_child(taffy_node, child_node).map_err(layout_error)?;
    }

    Ok(taffy_node)
}

/// Run one layout pass and store the results.
///
/// Returns the events to deliver, in pre-order.
fn resolve_pass(root: NodeId, width: f32, height: f32) -> Result<Vec<GeometryChanged>> {
    let mut tree: TaffyTree<String> = TaffyTree::new();
    let mut order = Vec::new();
    let taffy_root = add_subtree(&mut tree, root, &mut order)?;

    let available = Size {
        width: AvailableSpace::Definite(width),
        height: AvailableSpace::Definite(height),
    };
    tree.compute_layout_with_measure(
        taffy_root,
        available,
        |known_dimensions, available_space, _node_id, context: Option<&mut String>, _style| {
            match context {
                Some(text) => measure_text(text, known_dimensions, available_space),
                None => Size::ZERO,
            }
        },
    )
    .map_err(layout_error)?;

    // Pre-order guarantees a parent's world transform is known before its children.
    let mut world: HashMap<NodeId, (Rect, Vec2)> = HashMap::new();
    let mut events = Vec::new();

    for (node, taffy_node) in order {
        let layout = tree.layout(taffy_node).map_err(layout_error)?;
        let local = Rect::new(
            layout.location.x,
            layout.location.y,
            layout.size.width,
            layout.size.height,
        );

        let (origin, parent_scale) = match visual::parent(node).and_then(|p| world.get(&p)) {
            Some((bound, scale)) => (Vec2::new(bound.x, bound.y), *scale),
            None => (Vec2::ZERO, Vec2::ONE),
        };
        let scale = with_node(node, |n| n.scale)?;
        let world_scale = Vec2::new(parent_scale.x * scale.x, parent_scale.y * scale.y);
        let world_bound = Rect::new(
            origin.x + local.x * parent_scale.x,
            origin.y + local.y * parent_scale.y,
            local.width * world_scale.x,
            local.height * world_scale.y,
        );

        let old_rect = store_geometry(node, local, world_bound, world_scale)?;
        world.insert(node, (world_bound, world_scale));

        if has_layout_listeners(node) {
            events.push(GeometryChanged {
                node,
                old_rect,
                new_rect: world_bound,
            });
        }
    }

    Ok(events)
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Lay out the tree under `root` into a `width` x `height` area.
///
/// Passes repeat while layout-resolved listeners keep writing to the tree.
/// A listener error stops layout and is returned.
pub fn compute_layout(root: NodeId, width: f32, height: f32) -> Result<()> {
    let max_passes = layout_settings().max_layout_passes.max(1);

    for pass in 1..=max_passes {
        clear_layout_dirty();
        let events = resolve_pass(root, width, height)?;
        trace!(root = %root, pass, events = events.len(), "layout pass resolved");

        for event in &events {
            dispatch_geometry(event)?;
        }

        if !is_layout_dirty() {
            return Ok(());
        }
    }

    warn!(root = %root, passes = max_passes, "layout did not settle");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LayoutSettings, reset_layout_settings, set_layout_settings};
    use crate::layout::CHAR_WIDTH;
    use crate::visual::{
        append_child, create_canvas, create_node, layout_rect, on_layout_resolved,
        reset_visual_tree, set_base_style, set_scale, set_text, update_inline_style, world_bound,
        world_scale,
    };
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn setup() {
        reset_visual_tree();
        reset_layout_settings();
    }

    fn sized(width: f32, height: f32) -> NodeStyle {
        NodeStyle {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    #[test]
    fn test_single_root() {
        setup();

        let canvas = create_canvas(400.0, 300.0);
        compute_layout(canvas, 400.0, 300.0).unwrap();

        assert_eq!(world_bound(canvas).unwrap(), Rect::new(0.0, 0.0, 400.0, 300.0));
    }

    #[test]
    fn test_column_stacks_children() {
        setup();

        let canvas = create_canvas(400.0, 300.0);
        let a = create_node("a");
        let b = create_node("b");
        set_base_style(a, sized(50.0, 20.0)).unwrap();
        set_base_style(b, sized(50.0, 30.0)).unwrap();
        append_child(canvas, a).unwrap();
        append_child(canvas, b).unwrap();

        compute_layout(canvas, 400.0, 300.0).unwrap();

        assert_eq!(layout_rect(b).unwrap().y, 20.0);
        assert_eq!(world_bound(b).unwrap().height, 30.0);
    }

    #[test]
    fn test_row_with_text() {
        setup();

        let canvas = create_canvas(400.0, 300.0);
        let row = create_node("row");
        set_base_style(
            row,
            NodeStyle {
                flex_direction: Some(FlexDirection::Row),
                ..Default::default()
            },
        )
        .unwrap();
        let label = create_node("label");
        let value = create_node("value");
        set_text(label, "abc").unwrap();
        set_text(value, "x").unwrap();
        append_child(canvas, row).unwrap();
        append_child(row, label).unwrap();
        append_child(row, value).unwrap();

        compute_layout(canvas, 400.0, 300.0).unwrap();

        assert_eq!(world_bound(label).unwrap().width, 3.0 * CHAR_WIDTH);
        assert_eq!(world_bound(value).unwrap().x, 3.0 * CHAR_WIDTH);
        assert_eq!(world_bound(value).unwrap().height, LINE_HEIGHT);
    }

    #[test]
    fn test_padding_left_offsets_children() {
        setup();

        let canvas = create_canvas(400.0, 300.0);
        let indent = create_node("indent");
        update_inline_style(indent, |style| style.padding_left = Some(20.0)).unwrap();
        let child = create_node("child");
        set_base_style(child, sized(10.0, 10.0)).unwrap();
        append_child(canvas, indent).unwrap();
        append_child(indent, child).unwrap();

        compute_layout(canvas, 400.0, 300.0).unwrap();

        assert_eq!(world_bound(child).unwrap().x, 20.0);
    }

    #[test]
    fn test_hidden_node_takes_no_space() {
        setup();

        let canvas = create_canvas(400.0, 300.0);
        let hidden = create_node("hidden");
        let after = create_node("after");
        set_base_style(hidden, sized(50.0, 40.0)).unwrap();
        set_base_style(after, sized(50.0, 10.0)).unwrap();
        append_child(canvas, hidden).unwrap();
        append_child(canvas, after).unwrap();
        update_inline_style(hidden, |style| style.display = Some(Display::None)).unwrap();

        compute_layout(canvas, 400.0, 300.0).unwrap();

        assert_eq!(world_bound(after).unwrap().y, 0.0);
    }

    #[test]
    fn test_scale_accumulates() {
        setup();

        let canvas = create_canvas(400.0, 300.0);
        let scaled = create_node("scaled");
        let child = create_node("child");
        set_base_style(
            scaled,
            NodeStyle {
                padding_left: Some(10.0),
                ..Default::default()
            },
        )
        .unwrap();
        set_base_style(child, sized(20.0, 20.0)).unwrap();
        set_scale(scaled, Vec2::new(2.0, 2.0)).unwrap();
        append_child(canvas, scaled).unwrap();
        append_child(scaled, child).unwrap();

        compute_layout(canvas, 400.0, 300.0).unwrap();

        assert_eq!(world_scale(child).unwrap(), Vec2::new(2.0, 2.0));
        let bound = world_bound(child).unwrap();
        assert_eq!(bound.x, 20.0);
        assert_eq!(bound.width, 40.0);
    }

    #[test]
    fn test_absolute_position() {
        setup();

        let canvas = create_canvas(400.0, 300.0);
        let window = create_node("window");
        set_base_style(window, sized(100.0, 100.0)).unwrap();
        update_inline_style(window, |style| style.position = Some(Vec2::new(30.0, 40.0)))
            .unwrap();
        append_child(canvas, window).unwrap();

        compute_layout(canvas, 400.0, 300.0).unwrap();

        let bound = world_bound(window).unwrap();
        assert_eq!((bound.x, bound.y), (30.0, 40.0));
    }

    #[test]
    fn test_listener_receives_old_and_new() {
        setup();

        let canvas = create_canvas(400.0, 300.0);
        let child = create_node("child");
        set_base_style(child, sized(10.0, 10.0)).unwrap();
        append_child(canvas, child).unwrap();

        let events = Rc::new(RefCell::new(Vec::new()));
        let events_clone = events.clone();
        let _cleanup = on_layout_resolved(
            child,
            Rc::new(move |event: &GeometryChanged| {
                events_clone.borrow_mut().push(*event);
                Ok(())
            }),
        )
        .unwrap();

        compute_layout(canvas, 400.0, 300.0).unwrap();
        compute_layout(canvas, 400.0, 300.0).unwrap();

        let events = events.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].old_rect, Rect::ZERO);
        assert_eq!(events[0].new_rect, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(events[1].old_rect, events[1].new_rect);
    }

    #[test]
    fn test_listener_writes_trigger_relayout() {
        setup();

        let canvas = create_canvas(400.0, 300.0);
        let child = create_node("child");
        set_base_style(child, sized(10.0, 10.0)).unwrap();
        append_child(canvas, child).unwrap();

        let passes = Rc::new(Cell::new(0));
        let passes_clone = passes.clone();
        let _cleanup = on_layout_resolved(
            child,
            Rc::new(move |event: &GeometryChanged| {
                passes_clone.set(passes_clone.get() + 1);
                if event.new_rect.width < 30.0 {
                    update_inline_style(event.node, |style| style.width = Some(30.0))?;
                }
                Ok(())
            }),
        )
        .unwrap();

        compute_layout(canvas, 400.0, 300.0).unwrap();

        assert_eq!(passes.get(), 2);
        assert_eq!(world_bound(child).unwrap().width, 30.0);
    }

    #[test]
    fn test_pass_limit() {
        setup();
        set_layout_settings(LayoutSettings {
            max_layout_passes: 3,
            ..Default::default()
        });

        let canvas = create_canvas(400.0, 300.0);
        let passes = Rc::new(Cell::new(0));
        let passes_clone = passes.clone();
        let _cleanup = on_layout_resolved(
            canvas,
            Rc::new(move |event: &GeometryChanged| {
                passes_clone.set(passes_clone.get() + 1);
                set_text(event.node, "again")
            }),
        )
        .unwrap();

        compute_layout(canvas, 400.0, 300.0).unwrap();
        assert_eq!(passes.get(), 3);
    }

    #[test]
    fn test_listener_error_propagates() {
        setup();

        let canvas = create_canvas(400.0, 300.0);
        let _cleanup = on_layout_resolved(
            canvas,
            Rc::new(|_: &GeometryChanged| Err(BindError::Layout("listener".into()))),
        )
        .unwrap();

        let err = compute_layout(canvas, 400.0, 300.0).unwrap_err();
        assert!(matches!(err, BindError::Layout(message) if message == "listener"));
    }
}
