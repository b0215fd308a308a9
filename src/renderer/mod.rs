//! Renderer - Terminal views of the native tree.

mod inspect;

pub use inspect::{outline, write_tree};
