//! Element Tree - Host-independent description of the desired UI.
//!
//! An [`Element`] is a cheap, clonable handle to one abstract node. Elements
//! know nothing about native nodes; the builder keeps that association in its
//! registry and reacts to the change channels every element exposes:
//!
//! ```text
//! value_changed        -> Value      (any value mutation)
//! view_value_changed   -> Value      (mutation that came from native input)
//! update               -> Element    (per-frame update)
//! enable_changed       -> bool
//! interactable_changed -> bool
//! style_changed        -> Style
//! open_changed         -> bool       (folds, windows)
//! position_changed     -> Option<Vec2> (windows)
//! children_changed     -> ()         (structural rebuild)
//! destroyed            -> bool       (true for the destroy root)
//! ```
//!
//! Setters fire their channel once per actual change; writing the current
//! value again fires nothing.

mod constructors;
mod fluent;
mod observer;
mod value;

pub use observer::{Cleanup, ListenerId, ListenerResult, NotifyError, Observers};
pub use value::Value;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::types::{ElementKind, Style, Vec2};

// =============================================================================
// Identity
// =============================================================================

/// Unique identity of an element (never reused within a thread).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

thread_local! {
    /// Counter for generating unique IDs.
    static ID_COUNTER: Cell<u64> = const { Cell::new(0) };
}

fn next_id() -> ElementId {
    ID_COUNTER.with(|counter| {
        let id = counter.get();
        counter.set(id + 1);
        ElementId(id)
    })
}

// =============================================================================
// Element Data
// =============================================================================

/// Source of a dynamic element's single child.
#[derive(Clone)]
pub(crate) struct DynamicSource {
    pub(crate) build: Rc<dyn Fn() -> Element>,
    pub(crate) rebuild_if: Rc<dyn Fn(&Element) -> bool>,
}

struct Channels {
    value_changed: Rc<Observers<Value>>,
    view_value_changed: Rc<Observers<Value>>,
    update: Rc<Observers<Element>>,
    enable_changed: Rc<Observers<bool>>,
    interactable_changed: Rc<Observers<bool>>,
    style_changed: Rc<Observers<Style>>,
    open_changed: Rc<Observers<bool>>,
    position_changed: Rc<Observers<Option<Vec2>>>,
    children_changed: Rc<Observers<()>>,
    destroyed: Rc<Observers<bool>>,
}

impl Channels {
    fn new() -> Self {
        Self {
            value_changed: Observers::new("value_changed"),
            view_value_changed: Observers::new("view_value_changed"),
            update: Observers::new("update"),
            enable_changed: Observers::new("enable_changed"),
            interactable_changed: Observers::new("interactable_changed"),
            style_changed: Observers::new("style_changed"),
            open_changed: Observers::new("open_changed"),
            position_changed: Observers::new("position_changed"),
            children_changed: Observers::new("children_changed"),
            destroyed: Observers::new("destroyed"),
        }
    }

    fn clear(&self) {
        self.value_changed.clear();
        self.view_value_changed.clear();
        self.update.clear();
        self.enable_changed.clear();
        self.interactable_changed.clear();
        self.style_changed.clear();
        self.open_changed.clear();
        self.position_changed.clear();
        self.children_changed.clear();
        self.destroyed.clear();
    }
}

pub(crate) struct ElementData {
    id: ElementId,
    kind: ElementKind,
    parent: RefCell<Weak<ElementData>>,
    children: RefCell<Vec<Element>>,
    /// Prefix label (fields, folds, windows, composite fields).
    label: RefCell<Option<Element>>,
    style: Cell<Style>,
    enable: Cell<bool>,
    interactable: Cell<bool>,
    open: Cell<bool>,
    /// Field value; also the text of labels, buttons, help boxes and images.
    value: RefCell<Value>,
    /// Dropdown options.
    options: RefCell<Vec<String>>,
    /// Slider range.
    range: RefCell<Option<(Value, Value)>>,
    /// Indent level.
    level: Cell<u32>,
    /// Window position.
    position: Cell<Option<Vec2>>,
    /// Button action.
    action: RefCell<Option<Rc<dyn Fn()>>>,
    /// Popup menu selection action, given the picked item index.
    menu_action: RefCell<Option<Rc<dyn Fn(usize)>>>,
    dynamic: RefCell<Option<DynamicSource>>,
    destroyed: Cell<bool>,
    channels: Channels,
}

// =============================================================================
// Element Handle
// =============================================================================

/// Handle to an abstract element.
#[derive(Clone)]
pub struct Element(Rc<ElementData>);

/// Non-owning element handle.
#[derive(Clone)]
pub struct WeakElement(Weak<ElementData>);

impl WeakElement {
    pub fn upgrade(&self) -> Option<Element> {
        self.0.upgrade().map(Element)
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.0.id)
            .field("kind", &self.0.kind)
            .field("children", &self.0.children.borrow().len())
            .finish()
    }
}

/// Generates `on_<channel>` subscription methods.
macro_rules! channel_subscribe {
    ($($(#[$doc:meta])* $method:ident => $channel:ident : $arg:ty;)*) => {
        $(
            $(#[$doc])*
            pub fn $method<F>(&self, listener: F) -> Cleanup
            where
                F: Fn(&$arg) -> ListenerResult + 'static,
            {
                self.0.channels.$channel.subscribe(listener)
            }
        )*
    };
}

impl Element {
    /// Create a bare element of `kind` with default state.
    pub fn new(kind: ElementKind) -> Self {
        Element(Rc::new(ElementData {
            id: next_id(),
            kind,
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
            label: RefCell::new(None),
            style: Cell::new(Style::default()),
            enable: Cell::new(true),
            interactable: Cell::new(true),
            open: Cell::new(kind == ElementKind::Window),
            value: RefCell::new(Value::None),
            options: RefCell::new(Vec::new()),
            range: RefCell::new(None),
            level: Cell::new(0),
            position: Cell::new(None),
            action: RefCell::new(None),
            menu_action: RefCell::new(None),
            dynamic: RefCell::new(None),
            destroyed: Cell::new(false),
            channels: Channels::new(),
        }))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> ElementId {
        self.0.id
    }

    pub fn kind(&self) -> ElementKind {
        self.0.kind
    }

    pub fn downgrade(&self) -> WeakElement {
        WeakElement(Rc::downgrade(&self.0))
    }

    /// Parent element, if attached and still alive.
    pub fn parent(&self) -> Option<Element> {
        self.0.parent.borrow().upgrade().map(Element)
    }

    /// Ancestors from the parent upward.
    pub fn ancestors(&self) -> impl Iterator<Item = Element> {
        std::iter::successors(self.parent(), |element| element.parent())
    }

    /// Snapshot of the children, in order.
    pub fn children(&self) -> Vec<Element> {
        self.0.children.borrow().clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.children.borrow().len()
    }

    /// Prefix label or title element, if any.
    pub fn prefix_label(&self) -> Option<Element> {
        self.0.label.borrow().clone()
    }

    pub fn style(&self) -> Style {
        self.0.style.get()
    }

    pub fn enable(&self) -> bool {
        self.0.enable.get()
    }

    pub fn interactable(&self) -> bool {
        self.0.interactable.get()
    }

    pub fn is_open(&self) -> bool {
        self.0.open.get()
    }

    pub fn value(&self) -> Value {
        self.0.value.borrow().clone()
    }

    /// Value as display text (dropdown choices resolved to option text).
    pub fn value_text(&self) -> String {
        self.0.value.borrow().display_text(&self.0.options.borrow())
    }

    pub fn options(&self) -> Vec<String> {
        self.0.options.borrow().clone()
    }

    /// Slider bounds, in the value's own variant.
    pub fn range(&self) -> Option<(Value, Value)> {
        self.0.range.borrow().clone()
    }

    pub fn level(&self) -> u32 {
        self.0.level.get()
    }

    pub fn position(&self) -> Option<Vec2> {
        self.0.position.get()
    }

    pub fn is_destroyed(&self) -> bool {
        self.0.destroyed.get()
    }

    /// Run the button action, if any.
    pub fn click(&self) {
        let action = self.0.action.borrow().clone();
        if let Some(action) = action {
            action();
        }
    }

    /// Pick popup menu item `index`, then close the menu.
    ///
    /// Indices past the item list are ignored.
    pub fn select_menu_item(&self, index: usize) -> Result<(), NotifyError> {
        if index >= self.0.options.borrow().len() {
            return Ok(());
        }
        let action = self.0.menu_action.borrow().clone();
        if let Some(action) = action {
            action(index);
        }
        self.set_open(false)
    }

    // =========================================================================
    // Change Channels
    // =========================================================================

    channel_subscribe! {
        /// Any value mutation.
        on_value_changed => value_changed: Value;
        /// Value mutations that came from native input.
        on_view_value_changed => view_value_changed: Value;
        /// Per-frame update.
        on_update => update: Element;
        on_enable_changed => enable_changed: bool;
        on_interactable_changed => interactable_changed: bool;
        on_style_changed => style_changed: Style;
        on_open_changed => open_changed: bool;
        on_position_changed => position_changed: Option<Vec2>;
        /// Children inserted, removed or reordered.
        on_children_changed => children_changed: ();
        /// The element is being destroyed; the flag is true for the destroy root.
        on_destroyed => destroyed: bool;
    }

    // =========================================================================
    // State Mutation
    // =========================================================================

    pub fn set_enable(&self, enable: bool) -> Result<(), NotifyError> {
        if self.0.enable.replace(enable) == enable {
            return Ok(());
        }
        self.0.channels.enable_changed.notify(&enable)
    }

    pub fn set_interactable(&self, interactable: bool) -> Result<(), NotifyError> {
        if self.0.interactable.replace(interactable) == interactable {
            return Ok(());
        }
        self.0.channels.interactable_changed.notify(&interactable)
    }

    /// Replace the whole style record.
    pub fn set_style(&self, style: Style) -> Result<(), NotifyError> {
        if self.0.style.replace(style) == style {
            return Ok(());
        }
        self.0.channels.style_changed.notify(&style)
    }

    /// Edit the style record in place; fires once for all edited fields.
    pub fn update_style(&self, edit: impl FnOnce(&mut Style)) -> Result<(), NotifyError> {
        let mut style = self.style();
        edit(&mut style);
        self.set_style(style)
    }

    /// Set the value. Slider values are clamped into their range.
    pub fn set_value(&self, value: impl Into<Value>) -> Result<(), NotifyError> {
        self.store_value(value.into()).map_or(Ok(()), |value| {
            self.0.channels.value_changed.notify(&value)
        })
    }

    /// Set the value on behalf of native input.
    ///
    /// Fires `value_changed` and then `view_value_changed`.
    pub fn set_value_from_view(&self, value: impl Into<Value>) -> Result<(), NotifyError> {
        let Some(value) = self.store_value(value.into()) else {
            return Ok(());
        };
        self.0.channels.value_changed.notify(&value)?;
        self.0.channels.view_value_changed.notify(&value)
    }

    /// Store `value`, returning it when it differs from the current one.
    fn store_value(&self, value: Value) -> Option<Value> {
        let value = match &*self.0.range.borrow() {
            Some((min, max)) => value.clamped(min, max),
            None => value,
        };
        let mut current = self.0.value.borrow_mut();
        if *current == value {
            return None;
        }
        *current = value.clone();
        Some(value)
    }

    pub fn set_open(&self, open: bool) -> Result<(), NotifyError> {
        if self.0.open.replace(open) == open {
            return Ok(());
        }
        self.0.channels.open_changed.notify(&open)
    }

    pub fn set_position(&self, position: Option<Vec2>) -> Result<(), NotifyError> {
        if self.0.position.replace(position) == position {
            return Ok(());
        }
        self.0.channels.position_changed.notify(&position)
    }

    // =========================================================================
    // Structure
    // =========================================================================

    fn adopt(&self, child: &Element) {
        *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
    }

    fn disown(child: &Element) {
        *child.0.parent.borrow_mut() = Weak::new();
    }

    /// Append a child.
    pub fn push_child(&self, child: Element) -> Result<(), NotifyError> {
        self.adopt(&child);
        self.0.children.borrow_mut().push(child);
        self.0.channels.children_changed.notify(&())
    }

    /// Insert a child at `index` (clamped to the child count).
    pub fn insert_child(&self, index: usize, child: Element) -> Result<(), NotifyError> {
        self.adopt(&child);
        {
            let mut children = self.0.children.borrow_mut();
            let index = index.min(children.len());
            children.insert(index, child);
        }
        self.0.channels.children_changed.notify(&())
    }

    /// Remove a child. Returns false (and fires nothing) if it is not a child.
    pub fn remove_child(&self, child: &Element) -> Result<bool, NotifyError> {
        let removed = {
            let mut children = self.0.children.borrow_mut();
            let before = children.len();
            children.retain(|c| c != child);
            children.len() != before
        };
        if !removed {
            return Ok(false);
        }
        Self::disown(child);
        self.0.channels.children_changed.notify(&())?;
        Ok(true)
    }

    /// Replace all children (also used to reorder).
    pub fn replace_children(&self, children: Vec<Element>) -> Result<(), NotifyError> {
        let old = std::mem::take(&mut *self.0.children.borrow_mut());
        for child in old.iter().filter(|c| !children.contains(c)) {
            Self::disown(child);
        }
        for child in &children {
            self.adopt(child);
        }
        *self.0.children.borrow_mut() = children;
        self.0.channels.children_changed.notify(&())
    }

    pub(crate) fn attach_children(&self, children: Vec<Element>) {
        for child in &children {
            self.adopt(child);
        }
        self.0.children.borrow_mut().extend(children);
    }

    pub(crate) fn attach_label(&self, label: Element) {
        self.adopt(&label);
        *self.0.label.borrow_mut() = Some(label);
    }

    pub(crate) fn data(&self) -> &ElementData {
        &self.0
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Per-frame update: fires `update` here, then on the label and children.
    ///
    /// Dynamic elements whose rebuild predicate holds swap their child first.
    pub fn update(&self) -> Result<(), NotifyError> {
        if self.is_destroyed() {
            return Ok(());
        }
        self.0.channels.update.notify(self)?;

        let dynamic = self.0.dynamic.borrow().clone();
        if let Some(source) = dynamic {
            if (source.rebuild_if)(self) {
                for child in self.children() {
                    child.destroy()?;
                }
                let child = (source.build)();
                self.replace_children(vec![child])?;
            }
        }

        if let Some(label) = self.prefix_label() {
            label.update()?;
        }
        for child in self.children() {
            child.update()?;
        }
        Ok(())
    }

    // =========================================================================
    // Destruction
    // =========================================================================

    /// Destroy this element and its subtree.
    ///
    /// Fires `destroyed(true)` here and `destroyed(false)` on every
    /// descendant, then drops every listener so nothing in the subtree fires
    /// again. The element is removed from its parent without a
    /// `children_changed` notification.
    pub fn destroy(&self) -> Result<(), NotifyError> {
        if self.is_destroyed() {
            return Ok(());
        }
        if let Some(parent) = self.parent() {
            parent.0.children.borrow_mut().retain(|c| c != self);
            Self::disown(self);
        }
        self.destroy_recursive(true)
    }

    fn destroy_recursive(&self, is_root: bool) -> Result<(), NotifyError> {
        self.0.destroyed.set(true);
        let mut result = self.0.channels.destroyed.notify(&is_root);

        let label = self.prefix_label();
        for descendant in label.into_iter().chain(self.children()) {
            let child_result = descendant.destroy_recursive(false);
            if result.is_ok() {
                result = child_result;
            }
        }

        self.0.channels.clear();
        result
    }
}

impl ElementData {
    pub(crate) fn set_dynamic(&self, source: DynamicSource) {
        *self.dynamic.borrow_mut() = Some(source);
    }
}
