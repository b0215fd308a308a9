//! Element constructors - The declarative tree-building surface.
//!
//! Fields take a prefix label; an empty label means "no label".

use std::rc::Rc;

use super::{DynamicSource, Element, Value};
use crate::types::{ElementKind, Rgba};

impl Element {
    fn group(kind: ElementKind, children: Vec<Element>) -> Self {
        let element = Element::new(kind);
        element.attach_children(children);
        element
    }

    fn leaf(kind: ElementKind, value: Value) -> Self {
        let element = Element::new(kind);
        *element.data_value().borrow_mut() = value;
        element
    }

    fn field(kind: ElementKind, label: &str, value: Value) -> Self {
        let element = Self::leaf(kind, value);
        if !label.is_empty() {
            element.attach_label(Element::label(label));
        }
        element
    }

    // =========================================================================
    // Containers
    // =========================================================================

    /// Top-level window with a title bar.
    pub fn window(title: &str, children: Vec<Element>) -> Self {
        let element = Self::group(ElementKind::Window, children);
        element.attach_label(Element::label(title));
        element
    }

    pub fn row(children: Vec<Element>) -> Self {
        Self::group(ElementKind::Row, children)
    }

    pub fn column(children: Vec<Element>) -> Self {
        Self::group(ElementKind::Column, children)
    }

    pub fn page(children: Vec<Element>) -> Self {
        Self::group(ElementKind::Page, children)
    }

    /// Bordered column.
    pub fn boxed(children: Vec<Element>) -> Self {
        Self::group(ElementKind::Box, children)
    }

    pub fn scroll_view(children: Vec<Element>) -> Self {
        Self::group(ElementKind::ScrollView, children)
    }

    /// Column indented by `level` indent steps.
    pub fn indent(level: u32, children: Vec<Element>) -> Self {
        let element = Self::group(ElementKind::Indent, children);
        element.data().level.set(level);
        element
    }

    /// One item of a list view; resets the label-alignment baseline.
    pub fn list_item(children: Vec<Element>) -> Self {
        Self::group(ElementKind::ListViewItemContainer, children)
    }

    /// Collapsible section, closed by default.
    pub fn fold(title: &str, children: Vec<Element>) -> Self {
        let element = Self::group(ElementKind::Fold, children);
        element.attach_label(Element::label(title));
        element
    }

    /// Label followed by a row of child fields.
    pub fn composite_field(label: &str, children: Vec<Element>) -> Self {
        let element = Self::group(ElementKind::CompositeField, children);
        if !label.is_empty() {
            element.attach_label(Element::label(label));
        }
        element
    }

    /// Element whose single child is rebuilt by `build` whenever
    /// `rebuild_if` holds during [`Element::update`].
    pub fn dynamic<B, P>(build: B, rebuild_if: P) -> Self
    where
        B: Fn() -> Element + 'static,
        P: Fn(&Element) -> bool + 'static,
    {
        let initial = build();
        let element = Self::group(ElementKind::DynamicElement, vec![initial]);
        element.data().set_dynamic(DynamicSource {
            build: Rc::new(build),
            rebuild_if: Rc::new(rebuild_if),
        });
        element
    }

    /// Button titled `title` that shows and hides `window`.
    ///
    /// The window starts hidden.
    pub fn window_launcher(title: &str, window: Element) -> Self {
        let element = Self::group(ElementKind::WindowLauncher, vec![window.with_enable(false)]);
        element.attach_label(Element::label(title));
        element
    }

    /// Menu of `items` popped up from `target`, closed by default.
    ///
    /// `on_select` receives the index of the picked item.
    pub fn popup_menu(
        target: Element,
        items: &[&str],
        on_select: impl Fn(usize) + 'static,
    ) -> Self {
        let element = Self::group(ElementKind::PopupMenu, vec![target]);
        *element.data().options.borrow_mut() = items.iter().map(|i| i.to_string()).collect();
        *element.data().menu_action.borrow_mut() = Some(Rc::new(on_select));
        element
    }

    // =========================================================================
    // Leaves
    // =========================================================================

    pub fn label(text: &str) -> Self {
        Self::leaf(ElementKind::Label, Value::Text(text.to_string()))
    }

    pub fn help_box(message: &str) -> Self {
        Self::leaf(ElementKind::HelpBox, Value::Text(message.to_string()))
    }

    /// Flexible spacer.
    pub fn space() -> Self {
        Element::new(ElementKind::Space)
    }

    pub fn image(name: &str) -> Self {
        Self::leaf(ElementKind::Image, Value::Text(name.to_string()))
    }

    pub fn button(text: &str, action: impl Fn() + 'static) -> Self {
        let element = Self::leaf(ElementKind::Button, Value::Text(text.to_string()));
        *element.data().action.borrow_mut() = Some(Rc::new(action));
        element
    }

    // =========================================================================
    // Fields
    // =========================================================================

    pub fn int_field(label: &str, value: i32) -> Self {
        Self::field(ElementKind::IntField, label, Value::Int(value))
    }

    pub fn uint_field(label: &str, value: u32) -> Self {
        Self::field(ElementKind::UIntField, label, Value::UInt(value))
    }

    pub fn float_field(label: &str, value: f32) -> Self {
        Self::field(ElementKind::FloatField, label, Value::Float(value))
    }

    pub fn text_field(label: &str, value: &str) -> Self {
        Self::field(ElementKind::TextField, label, Value::Text(value.to_string()))
    }

    pub fn bool_field(label: &str, value: bool) -> Self {
        Self::field(ElementKind::BoolField, label, Value::Bool(value))
    }

    pub fn color_field(label: &str, value: Rgba) -> Self {
        Self::field(ElementKind::ColorField, label, Value::Color(value))
    }

    /// Dropdown over `options`; `index` is clamped to the option count.
    pub fn dropdown(label: &str, options: &[&str], index: usize) -> Self {
        let index = index.min(options.len().saturating_sub(1));
        let element = Self::field(ElementKind::Dropdown, label, Value::Choice(index));
        *element.data().options.borrow_mut() = options.iter().map(|o| o.to_string()).collect();
        element
    }

    pub fn int_slider(label: &str, value: i32, min: i32, max: i32) -> Self {
        let (min, max) = (min.min(max), min.max(max));
        Self::slider(
            ElementKind::IntSlider,
            label,
            Value::Int(value),
            Value::Int(min),
            Value::Int(max),
        )
    }

    pub fn float_slider(label: &str, value: f32, min: f32, max: f32) -> Self {
        let (min, max) = (min.min(max), min.max(max));
        Self::slider(
            ElementKind::FloatSlider,
            label,
            Value::Float(value),
            Value::Float(min),
            Value::Float(max),
        )
    }

    /// Slider over a `(low, high)` pair inside `[min, max]`.
    pub fn int_min_max_slider(label: &str, value: (i32, i32), min: i32, max: i32) -> Self {
        let (min, max) = (min.min(max), min.max(max));
        Self::slider(
            ElementKind::IntMinMaxSlider,
            label,
            value.into(),
            Value::Int(min),
            Value::Int(max),
        )
    }

    pub fn float_min_max_slider(label: &str, value: (f32, f32), min: f32, max: f32) -> Self {
        let (min, max) = (min.min(max), min.max(max));
        Self::slider(
            ElementKind::FloatMinMaxSlider,
            label,
            value.into(),
            Value::Float(min),
            Value::Float(max),
        )
    }

    fn slider(kind: ElementKind, label: &str, value: Value, min: Value, max: Value) -> Self {
        let element = Self::field(kind, label, value.clamped(&min, &max));
        *element.data().range.borrow_mut() = Some((min, max));
        element
    }

    fn data_value(&self) -> &std::cell::RefCell<Value> {
        &self.data().value
    }
}
