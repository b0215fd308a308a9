//! Build Table - Element kind → builder function.
//!
//! The table is installed lazily per thread from the primitives' static list
//! the first time a kind is resolved. Hosts may install their own table to
//! add kinds or swap builders.

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::error;

use crate::element::Element;
use crate::error::{BindError, Result};
use crate::primitives::DEFAULT_BUILDERS;
use crate::types::ElementKind;
use crate::visual::NodeId;

/// Builds the native node for one element (recursively building children).
pub type BuildFn = fn(&Element) -> Result<NodeId>;

/// Registration map from element kind to builder function.
#[derive(Clone, Default)]
pub struct BuildTable {
    builders: HashMap<ElementKind, BuildFn>,
}

impl BuildTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with a builder for every built-in kind.
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        for &(kind, build) in DEFAULT_BUILDERS {
            table.register(kind, build);
        }
        table
    }

    /// Register `build` for `kind`, returning the builder it replaced.
    pub fn register(&mut self, kind: ElementKind, build: BuildFn) -> Option<BuildFn> {
        self.builders.insert(kind, build)
    }

    pub fn unregister(&mut self, kind: ElementKind) -> Option<BuildFn> {
        self.builders.remove(&kind)
    }

    pub fn get(&self, kind: ElementKind) -> Option<BuildFn> {
        self.builders.get(&kind).copied()
    }

    pub fn contains(&self, kind: ElementKind) -> bool {
        self.builders.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

// =============================================================================
// Thread Table
// =============================================================================

thread_local! {
    static TABLE: RefCell<Option<BuildTable>> = const { RefCell::new(None) };
}

/// Builder function for `kind`.
pub fn resolve(kind: ElementKind) -> Result<BuildFn> {
    let build = TABLE.with(|table| {
        table
            .borrow_mut()
            .get_or_insert_with(BuildTable::with_defaults)
            .get(kind)
    });
    build.ok_or_else(|| {
        error!(kind = %kind, "no builder registered for element kind");
        BindError::UnregisteredType { kind }
    })
}

/// Replace this thread's table.
pub fn install_build_table(table: BuildTable) {
    TABLE.with(|current| *current.borrow_mut() = Some(table));
}

/// Drop the installed table; the defaults return on next use (for testing).
pub fn reset_build_table() {
    TABLE.with(|current| *current.borrow_mut() = None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::create_node;

    fn fake_builder(_: &Element) -> Result<NodeId> {
        Ok(create_node("fake"))
    }

    #[test]
    fn test_defaults_cover_every_kind() {
        let table = BuildTable::with_defaults();
        for kind in ElementKind::ALL {
            assert!(table.contains(kind), "missing builder for {kind}");
        }
        assert_eq!(table.len(), ElementKind::ALL.len());
    }

    #[test]
    fn test_register_returns_previous() {
        let mut table = BuildTable::new();
        assert!(table.register(ElementKind::Label, fake_builder).is_none());
        assert!(table.register(ElementKind::Label, fake_builder).is_some());
        assert!(table.unregister(ElementKind::Label).is_some());
        assert!(table.is_empty());
    }

    #[test]
    fn test_resolve_miss() {
        reset_build_table();
        install_build_table(BuildTable::new());

        let err = resolve(ElementKind::Button).err().unwrap();
        assert!(matches!(err, BindError::UnregisteredType { kind: ElementKind::Button }));

        reset_build_table();
        assert!(resolve(ElementKind::Button).is_ok());
    }
}
