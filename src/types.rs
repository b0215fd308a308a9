//! Core types for spark-bind.
//!
//! These types are shared by the abstract element tree, the visual node
//! arena and the builder engine that connects the two.

use std::fmt;

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Using integers for exact comparison - no floating point epsilon needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Transparent color.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    // Standard colors
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    /// Check if color is fully opaque.
    #[inline]
    pub const fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// 2D vector (positions, transform scale).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a new rect.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Left edge.
    #[inline]
    pub fn x_min(&self) -> f32 {
        self.x
    }

    /// True when every edge is within `epsilon` of `other`.
    ///
    /// An epsilon of zero is plain equality.
    pub fn approx_eq(&self, other: &Rect, epsilon: f32) -> bool {
        if epsilon <= 0.0 {
            return self == other;
        }
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.width - other.width).abs() <= epsilon
            && (self.height - other.height).abs() <= epsilon
    }
}

// =============================================================================
// Flex Enums - For layout
// =============================================================================

/// Flex direction for container layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexDirection {
    #[default]
    Column,
    Row,
}

impl FlexDirection {
    /// Check if this is a row direction.
    pub const fn is_row(&self) -> bool {
        matches!(self, Self::Row)
    }
}

/// Display mode of a visual node.
///
/// `None` hides the node; it stays in the hierarchy with a zero-size slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Flex,
    None,
}

// =============================================================================
// Abstract Style Record
// =============================================================================

/// Style record carried by every abstract element.
///
/// Every field is optional; `None` means "not specified", which the builder
/// maps to the native unset state rather than to zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Style {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub min_width: Option<f32>,
    pub min_height: Option<f32>,
    pub max_width: Option<f32>,
    pub max_height: Option<f32>,
    pub color: Option<Rgba>,
    pub background_color: Option<Rgba>,
}

impl Style {
    /// True when either width or height is explicitly set.
    pub fn has_fixed_size(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }
}

// =============================================================================
// Element Kinds - Type tags for dispatch
// =============================================================================

bitflags::bitflags! {
    /// Capabilities of an element kind.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KindFlags: u8 {
        const NONE = 0;
        /// Owns an ordered list of child elements.
        const GROUP = 1 << 0;
        /// Carries an editable value shown by a native value node.
        const FIELD = 1 << 1;
        /// Resets the baseline used for label alignment.
        const INDENT_ORIGIN = 1 << 2;
        /// Has an open/closed state.
        const OPEN_CLOSE = 1 << 3;
    }
}

/// Runtime type tag of an abstract element.
///
/// The builder resolves exactly one builder function per tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    // Containers
    Window,
    Row,
    Column,
    Box,
    ScrollView,
    Indent,
    Page,
    ListViewItemContainer,
    Fold,
    DynamicElement,
    CompositeField,
    WindowLauncher,
    PopupMenu,
    // Leaves
    Label,
    HelpBox,
    Space,
    Image,
    Button,
    // Fields
    IntField,
    UIntField,
    FloatField,
    TextField,
    BoolField,
    ColorField,
    Dropdown,
    IntSlider,
    FloatSlider,
    IntMinMaxSlider,
    FloatMinMaxSlider,
}

impl ElementKind {
    /// Every kind, in declaration order.
    pub const ALL: [ElementKind; 29] = [
        Self::Window,
        Self::Row,
        Self::Column,
        Self::Box,
        Self::ScrollView,
        Self::Indent,
        Self::Page,
        Self::ListViewItemContainer,
        Self::Fold,
        Self::DynamicElement,
        Self::CompositeField,
        Self::WindowLauncher,
        Self::PopupMenu,
        Self::Label,
        Self::HelpBox,
        Self::Space,
        Self::Image,
        Self::Button,
        Self::IntField,
        Self::UIntField,
        Self::FloatField,
        Self::TextField,
        Self::BoolField,
        Self::ColorField,
        Self::Dropdown,
        Self::IntSlider,
        Self::FloatSlider,
        Self::IntMinMaxSlider,
        Self::FloatMinMaxSlider,
    ];

    /// Capabilities of this kind.
    pub const fn flags(&self) -> KindFlags {
        match self {
            Self::Window => KindFlags::GROUP
                .union(KindFlags::INDENT_ORIGIN)
                .union(KindFlags::OPEN_CLOSE),
            Self::Fold => KindFlags::GROUP
                .union(KindFlags::INDENT_ORIGIN)
                .union(KindFlags::OPEN_CLOSE),
            Self::ListViewItemContainer => KindFlags::GROUP.union(KindFlags::INDENT_ORIGIN),
            Self::PopupMenu => KindFlags::GROUP.union(KindFlags::OPEN_CLOSE),
            Self::Row
            | Self::Column
            | Self::Box
            | Self::ScrollView
            | Self::Indent
            | Self::Page
            | Self::DynamicElement
            | Self::CompositeField
            | Self::WindowLauncher => KindFlags::GROUP,
            Self::Label | Self::HelpBox | Self::Space | Self::Image | Self::Button => {
                KindFlags::NONE
            }
            Self::IntField
            | Self::UIntField
            | Self::FloatField
            | Self::TextField
            | Self::BoolField
            | Self::ColorField
            | Self::Dropdown
            | Self::IntSlider
            | Self::FloatSlider
            | Self::IntMinMaxSlider
            | Self::FloatMinMaxSlider => KindFlags::FIELD,
        }
    }

    #[inline]
    pub const fn is_group(&self) -> bool {
        self.flags().contains(KindFlags::GROUP)
    }

    #[inline]
    pub const fn is_field(&self) -> bool {
        self.flags().contains(KindFlags::FIELD)
    }

    #[inline]
    pub const fn is_indent_origin(&self) -> bool {
        self.flags().contains(KindFlags::INDENT_ORIGIN)
    }

    /// Stable name used in logs and native class names.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Window => "window",
            Self::Row => "row",
            Self::Column => "column",
            Self::Box => "box",
            Self::ScrollView => "scroll-view",
            Self::Indent => "indent",
            Self::Page => "page",
            Self::ListViewItemContainer => "list-view-item",
            Self::Fold => "fold",
            Self::DynamicElement => "dynamic-element",
            Self::CompositeField => "composite-field",
            Self::WindowLauncher => "window-launcher",
            Self::PopupMenu => "popup-menu",
            Self::Label => "label",
            Self::HelpBox => "help-box",
            Self::Space => "space",
            Self::Image => "image",
            Self::Button => "button",
            Self::IntField => "int-field",
            Self::UIntField => "uint-field",
            Self::FloatField => "float-field",
            Self::TextField => "text-field",
            Self::BoolField => "bool-field",
            Self::ColorField => "color-field",
            Self::Dropdown => "dropdown",
            Self::IntSlider => "int-slider",
            Self::FloatSlider => "float-slider",
            Self::IntMinMaxSlider => "int-min-max-slider",
            Self::FloatMinMaxSlider => "float-min-max-slider",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
