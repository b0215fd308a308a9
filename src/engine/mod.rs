//! Binding Engine - Element tree ↔ native visual tree.
//!
//! The engine owns the association between abstract elements and the native
//! nodes built for them:
//! - Registry: element id ↔ node id, plus per-element subscriptions
//! - Dispatch: element kind → builder function
//! - Builder: build, structural rebuild, destroy
//! - Sync: enable, interactable, style and value-text handlers
//! - Indent: prefix-label alignment across indentation levels
//!
//! # Architecture
//!
//! Elements never hold native nodes. A built element is one registry entry
//! plus a set of change subscriptions that close over its node id:
//!
//! ```text
//! Element e3 (IntField)  ──registry──▶  n7 (row)
//!   ├─ label e4          ──registry──▶  n8 (label text)
//!   └─ value             ──on_input──▶  n9 (field input)
//! ```
//!
//! A mutation on the element fires its channel, and the subscribed handler
//! rewrites only the affected native properties before the setter returns.

mod builder;
mod dispatch;
mod indent;
mod registry;
mod sync;

pub use builder::*;
pub use dispatch::*;
pub use indent::*;
pub use registry::*;
pub use sync::*;
