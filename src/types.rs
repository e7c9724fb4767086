//! Core types for spark-layout.
//!
//! Flex enums, edges and dimensions shared by the style encoder, the node
//! adapter and the result façade. Every enum has a fixed wire value; the
//! values are part of the style buffer format and must never be reordered.

use std::fmt;

/// Convert a wire float into a small enum discriminant.
///
/// Returns `None` for negative, fractional or out-of-range values.
pub(crate) fn wire_u8(value: f32) -> Option<u8> {
    if !value.is_finite() || value < 0.0 || value > u8::MAX as f32 || value.fract() != 0.0 {
        return None;
    }
    Some(value as u8)
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[repr(u8)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $value ),+
        }

        impl $name {
            /// Value written into a style buffer.
            pub fn as_wire(self) -> f32 {
                self as u8 as f32
            }

            /// Parse a value read from a style buffer.
            pub fn from_wire(value: f32) -> Option<Self> {
                match wire_u8(value)? {
                    $( $value => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// Name used in diagnostic dumps.
            pub const fn label(self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

// =============================================================================
// Writing direction
// =============================================================================

wire_enum! {
    /// Writing direction. `Inherit` takes the parent's resolved direction.
    Direction {
        #[default]
        Inherit = 0 => "inherit",
        Ltr = 1 => "ltr",
        Rtl = 2 => "rtl",
    }
}

impl Direction {
    /// Resolve against the parent's direction.
    pub fn resolve(self, parent: Direction) -> Direction {
        match self {
            Self::Inherit => match parent {
                Self::Inherit => Self::Ltr,
                resolved => resolved,
            },
            explicit => explicit,
        }
    }
}

// =============================================================================
// Flex Enums - For layout
// =============================================================================

wire_enum! {
    /// Flex direction for container layout.
    FlexDirection {
        #[default]
        Column = 0 => "column",
        Row = 1 => "row",
        ColumnReverse = 2 => "column-reverse",
        RowReverse = 3 => "row-reverse",
    }
}

impl FlexDirection {
    /// Check if this is a row direction (Row or RowReverse).
    pub const fn is_row(&self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    /// Check if this is a reverse direction (ColumnReverse or RowReverse).
    pub const fn is_reverse(&self) -> bool {
        matches!(self, Self::ColumnReverse | Self::RowReverse)
    }
}

wire_enum! {
    /// Flex wrap behavior.
    FlexWrap {
        #[default]
        NoWrap = 0 => "nowrap",
        Wrap = 1 => "wrap",
        WrapReverse = 2 => "wrap-reverse",
    }
}

wire_enum! {
    /// Justify content (main axis alignment).
    JustifyContent {
        #[default]
        FlexStart = 0 => "flex-start",
        Center = 1 => "center",
        FlexEnd = 2 => "flex-end",
        SpaceBetween = 3 => "space-between",
        SpaceAround = 4 => "space-around",
        SpaceEvenly = 5 => "space-evenly",
    }
}

wire_enum! {
    /// Align items (cross axis alignment).
    AlignItems {
        #[default]
        Stretch = 0 => "stretch",
        FlexStart = 1 => "flex-start",
        Center = 2 => "center",
        FlexEnd = 3 => "flex-end",
        Baseline = 4 => "baseline",
    }
}

wire_enum! {
    /// Align self (item override for align items).
    AlignSelf {
        #[default]
        Auto = 0 => "auto",
        Stretch = 1 => "stretch",
        FlexStart = 2 => "flex-start",
        Center = 3 => "center",
        FlexEnd = 4 => "flex-end",
        Baseline = 5 => "baseline",
    }
}

wire_enum! {
    /// Align content (multi-line cross axis).
    AlignContent {
        #[default]
        Stretch = 0 => "stretch",
        FlexStart = 1 => "flex-start",
        Center = 2 => "center",
        FlexEnd = 3 => "flex-end",
        SpaceBetween = 4 => "space-between",
        SpaceAround = 5 => "space-around",
    }
}

wire_enum! {
    /// Overflow behavior.
    Overflow {
        #[default]
        Visible = 0 => "visible",
        Hidden = 1 => "hidden",
        Scroll = 2 => "scroll",
    }
}

wire_enum! {
    /// Position type.
    PositionType {
        #[default]
        Relative = 0 => "relative",
        Absolute = 1 => "absolute",
    }
}

wire_enum! {
    /// Display mode. `None` removes the node from flex participation.
    Display {
        #[default]
        Flex = 0 => "flex",
        None = 1 => "none",
    }
}

// =============================================================================
// Edges
// =============================================================================

wire_enum! {
    /// Box edge addressed by margin, padding, border and position styles.
    ///
    /// `Start` and `End` follow the writing direction; `Horizontal`,
    /// `Vertical` and `All` are shorthands with lower precedence.
    Edge {
        #[default]
        Left = 0 => "LEFT",
        Top = 1 => "TOP",
        Right = 2 => "RIGHT",
        Bottom = 3 => "BOTTOM",
        Start = 4 => "START",
        End = 5 => "END",
        Horizontal = 6 => "HORIZONTAL",
        Vertical = 7 => "VERTICAL",
        All = 8 => "ALL",
    }
}

impl Edge {
    pub const COUNT: usize = 9;
}

wire_enum! {
    /// Gap axis.
    Gutter {
        #[default]
        Column = 0 => "COLUMN",
        Row = 1 => "ROW",
        All = 2 => "ALL",
    }
}

// =============================================================================
// Dimension
// =============================================================================

/// A length that can be absolute or relative to the parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    /// Absolute value in points (scaled by the node's scale factor).
    Points(f32),
    /// Percentage of the parent (0-100).
    Percent(f32),
}

impl Default for Length {
    fn default() -> Self {
        Self::Points(0.0)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Points(v) => write!(f, "{v}"),
            Self::Percent(v) => write!(f, "{v}%"),
        }
    }
}

/// Dimension value for size constraints.
///
/// - `Auto`: size based on content and flex rules
/// - `Points(n)`: absolute value
/// - `Percent(n)`: percentage of parent (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    #[default]
    Auto,
    Points(f32),
    Percent(f32),
}

impl Dimension {
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Percentage value, if this is a percentage.
    pub const fn percent(&self) -> Option<f32> {
        match self {
            Self::Percent(p) => Some(*p),
            _ => None,
        }
    }
}

impl From<Length> for Dimension {
    fn from(value: Length) -> Self {
        match value {
            Length::Points(v) => Self::Points(v),
            Length::Percent(v) => Self::Percent(v),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Points(v) => write!(f, "{v}"),
            Self::Percent(v) => write!(f, "{v}%"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
