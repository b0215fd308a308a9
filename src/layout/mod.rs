//! Layout Module
//!
//! Flexbox layout of the visual tree using Taffy.
//!
//! # Architecture
//!
//! The layout module uses [Taffy](https://github.com/DioxusLabs/taffy) for
//! W3C-compliant flexbox computation. The bridge:
//!
//! 1. Converts resolved node styles to Taffy styles
//! 2. Mirrors the visual subtree into a Taffy tree
//! 3. Measures text-bearing leaves
//! 4. Stores local and world geometry back on the nodes
//! 5. Fires layout-resolved listeners, repeating while they write
//!
//! # Example
//!
//! ```ignore
//! use spark_bind::layout::compute_layout;
//! use spark_bind::visual::create_canvas;
//!
//! let canvas = create_canvas(800.0, 600.0);
//! compute_layout(canvas, 800.0, 600.0)?;
//! ```

mod taffy_bridge;
mod text_measure;

pub use taffy_bridge::compute_layout;
pub use text_measure::{CHAR_WIDTH, LINE_HEIGHT, line_count, text_height, text_width};
