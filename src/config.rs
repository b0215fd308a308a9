//! Layout settings.
//!
//! Global knobs read by the builder at event time, so changing them takes
//! effect on the next layout pass. Settings load from TOML:
//!
//! ```toml
//! label_width = 150.0
//! indent_size = 15.0
//! geometry_epsilon = 0.0
//! max_layout_passes = 8
//! ```
//!
//! Missing keys keep their defaults.

use std::cell::RefCell;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings shared by every builder on this thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Width of the prefix-label column, before indentation is subtracted.
    pub label_width: f32,
    /// Horizontal step used by indents and fold contents.
    pub indent_size: f32,
    /// Bounds closer than this count as unchanged in layout events
    /// (0 = exact equality).
    pub geometry_epsilon: f32,
    /// Upper bound on layout passes triggered by layout-resolved listeners.
    pub max_layout_passes: u32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            label_width: 150.0,
            indent_size: 15.0,
            geometry_epsilon: 0.0,
            max_layout_passes: 8,
        }
    }
}

impl LayoutSettings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load settings from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Override values from `SPARK_BIND_*` environment variables.
    pub fn merge_with_env(&mut self) {
        if let Some(width) = env_parse("SPARK_BIND_LABEL_WIDTH") {
            self.label_width = width;
        }
        if let Some(size) = env_parse("SPARK_BIND_INDENT_SIZE") {
            self.indent_size = size;
        }
        if let Some(epsilon) = env_parse("SPARK_BIND_GEOMETRY_EPSILON") {
            self.geometry_epsilon = epsilon;
        }
        if let Some(passes) = env_parse("SPARK_BIND_MAX_LAYOUT_PASSES") {
            self.max_layout_passes = passes;
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok()?.trim().parse().ok()
}

// =============================================================================
// Thread State
// =============================================================================

thread_local! {
    static SETTINGS: RefCell<LayoutSettings> = RefCell::new(LayoutSettings::default());
}

/// Current settings.
pub fn layout_settings() -> LayoutSettings {
    SETTINGS.with(|settings| settings.borrow().clone())
}

/// Replace the current settings.
pub fn set_layout_settings(settings: LayoutSettings) {
    SETTINGS.with(|current| *current.borrow_mut() = settings);
}

/// Restore default settings (for testing).
pub fn reset_layout_settings() {
    set_layout_settings(LayoutSettings::default());
}
