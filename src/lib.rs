//! # spark-bind
//!
//! Binding layer between an abstract element tree and a retained visual tree.
//!
//! ## Architecture
//!
//! Elements describe the UI; native visual nodes display it. The engine
//! builds one native node per element, remembers the pair in a registry, and
//! keeps native properties in sync through explicit change subscriptions:
//!
//! ```text
//! Element tree → dispatch table → builder fn → native node
//!      │                                          ▲
//!      └── change channels ── sync handlers ──────┘
//! ```
//!
//! Mutations never rebuild nodes. Enable, interactable, style and value
//! changes rewrite only the affected properties; structural changes reuse
//! every node whose element is still present.
//!
//! ## Modules
//!
//! - [`types`] - Core types (Rgba, Rect, Style, ElementKind, etc.)
//! - [`element`] - Abstract element tree with change channels
//! - [`visual`] - Retained native node tree
//! - [`layout`] - Taffy flexbox layout of the native tree
//! - [`engine`] - Registry, dispatch, builder, sync, label alignment
//! - [`primitives`] - Builder functions for every element kind
//! - [`config`] - Layout settings
//! - [`renderer`] - Terminal inspector for native trees

pub mod config;
pub mod element;
pub mod engine;
pub mod error;
pub mod layout;
pub mod primitives;
pub mod renderer;
pub mod types;
pub mod visual;

// Re-export commonly used items
pub use types::*;

pub use config::{LayoutSettings, layout_settings, reset_layout_settings, set_layout_settings};

pub use element::{Cleanup, Element, ElementId, ListenerResult, NotifyError, Value, WeakElement};

pub use engine::{
    BuildFn, BuildTable, build, destroy, element_of, install_build_table, node_of,
    rebuild_group_children, register_label_alignment, reset_build_table, reset_registry,
    try_node_of,
};

pub use error::{BindError, Result};

pub use layout::compute_layout;

pub use renderer::{outline, write_tree};

pub use visual::{GeometryChanged, NodeId, NodeStyle, create_canvas, reset_visual_tree};

/// Reset all thread-local state (for testing).
pub fn reset_all() {
    engine::reset_registry();
    engine::reset_build_table();
    visual::reset_visual_tree();
    config::reset_layout_settings();
}
