//! Method-chain setters for tree construction.
//!
//! These write element state directly and fire no change notifications, so
//! they belong to construction time. Built elements are mutated with the
//! `set_*` methods, which notify the builder.

use super::{Element, ListenerResult, Value};
use crate::types::{Rgba, Vec2};

impl Element {
    pub fn with_enable(self, enable: bool) -> Self {
        self.data().enable.set(enable);
        self
    }

    pub fn with_interactable(self, interactable: bool) -> Self {
        self.data().interactable.set(interactable);
        self
    }

    pub fn with_width(self, width: Option<f32>) -> Self {
        self.edit_style(|style| style.width = width)
    }

    pub fn with_height(self, height: Option<f32>) -> Self {
        self.edit_style(|style| style.height = height)
    }

    pub fn with_min_width(self, min_width: Option<f32>) -> Self {
        self.edit_style(|style| style.min_width = min_width)
    }

    pub fn with_min_height(self, min_height: Option<f32>) -> Self {
        self.edit_style(|style| style.min_height = min_height)
    }

    pub fn with_max_width(self, max_width: Option<f32>) -> Self {
        self.edit_style(|style| style.max_width = max_width)
    }

    pub fn with_max_height(self, max_height: Option<f32>) -> Self {
        self.edit_style(|style| style.max_height = max_height)
    }

    pub fn with_color(self, color: Option<Rgba>) -> Self {
        self.edit_style(|style| style.color = color)
    }

    pub fn with_background_color(self, color: Option<Rgba>) -> Self {
        self.edit_style(|style| style.background_color = color)
    }

    pub fn with_open(self, open: bool) -> Self {
        self.data().open.set(open);
        self
    }

    pub fn opened(self) -> Self {
        self.with_open(true)
    }

    pub fn closed(self) -> Self {
        self.with_open(false)
    }

    /// Window position; `None` lets the window flow with the layout.
    pub fn with_position(self, position: Option<Vec2>) -> Self {
        self.data().position.set(position);
        self
    }

    /// Listen for values typed into the native field.
    ///
    /// The listener lives as long as the element.
    pub fn register_value_change_callback<F>(self, callback: F) -> Self
    where
        F: Fn(&Value) -> ListenerResult + 'static,
    {
        let _ = self.on_view_value_changed(callback);
        self
    }

    /// Run `callback` on every [`Element::update`].
    ///
    /// The listener lives as long as the element.
    pub fn register_update_callback<F>(self, callback: F) -> Self
    where
        F: Fn(&Element) -> ListenerResult + 'static,
    {
        let _ = self.on_update(callback);
        self
    }

    fn edit_style(self, edit: impl FnOnce(&mut crate::types::Style)) -> Self {
        let mut style = self.data().style.get();
        edit(&mut style);
        self.data().style.set(style);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_chain_sets_state() {
        let element = Element::label("x")
            .with_width(Some(120.0))
            .with_color(Some(Rgba::RED))
            .with_enable(false)
            .with_interactable(false);

        let style = element.style();
        assert_eq!(style.width, Some(120.0));
        assert_eq!(style.height, None);
        assert_eq!(style.color, Some(Rgba::RED));
        assert!(!element.enable());
        assert!(!element.interactable());
    }

    #[test]
    fn test_open_close() {
        let fold = Element::fold("Section", vec![]);
        assert!(!fold.is_open());
        let fold = fold.opened();
        assert!(fold.is_open());
        assert!(!fold.closed().is_open());
    }

    #[test]
    fn test_value_change_callback_only_for_view_changes() {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let field = Element::int_field("n", 1).register_value_change_callback(move |_| {
            count_clone.set(count_clone.get() + 1);
            Ok(())
        });

        field.set_value(2).unwrap();
        assert_eq!(count.get(), 0);

        field.set_value_from_view(3).unwrap();
        assert_eq!(count.get(), 1);
    }
}
