//! Style tags and the structured attribute union.
//!
//! `StyleTag` is the closed enumeration shared by encoder and decoder. Its
//! numeric codes are the wire contract; append new tags at the end and bump
//! [`STYLE_FORMAT_VERSION`](super::STYLE_FORMAT_VERSION).

use std::fmt;

use crate::error::ConfigurationError;
use crate::types::{
    AlignContent, AlignItems, AlignSelf, Dimension, Direction, Display, Edge, FlexDirection,
    FlexWrap, Gutter, JustifyContent, Length, Overflow, PositionType,
};

// =============================================================================
// TAGS
// =============================================================================

/// Wire tag of a style record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum StyleTag {
    Direction = 0,
    FlexDirection = 1,
    JustifyContent = 2,
    AlignContent = 3,
    AlignItems = 4,
    AlignSelf = 5,
    PositionType = 6,
    FlexWrap = 7,
    Overflow = 8,
    Display = 9,
    FlexGrow = 10,
    FlexShrink = 11,
    FlexBasis = 12,
    FlexBasisPercent = 13,
    Margin = 14,
    MarginPercent = 15,
    Padding = 16,
    PaddingPercent = 17,
    Border = 18,
    Position = 19,
    PositionPercent = 20,
    Gap = 21,
    Width = 22,
    WidthPercent = 23,
    Height = 24,
    HeightPercent = 25,
    MinWidth = 26,
    MinWidthPercent = 27,
    MinHeight = 28,
    MinHeightPercent = 29,
    MaxWidth = 30,
    MaxWidthPercent = 31,
    MaxHeight = 32,
    MaxHeightPercent = 33,
    AspectRatio = 34,
    ScaleFactor = 35,
}

impl StyleTag {
    /// Every tag, indexed by its wire code.
    pub const ALL: [StyleTag; 36] = [
        Self::Direction,
        Self::FlexDirection,
        Self::JustifyContent,
        Self::AlignContent,
        Self::AlignItems,
        Self::AlignSelf,
        Self::PositionType,
        Self::FlexWrap,
        Self::Overflow,
        Self::Display,
        Self::FlexGrow,
        Self::FlexShrink,
        Self::FlexBasis,
        Self::FlexBasisPercent,
        Self::Margin,
        Self::MarginPercent,
        Self::Padding,
        Self::PaddingPercent,
        Self::Border,
        Self::Position,
        Self::PositionPercent,
        Self::Gap,
        Self::Width,
        Self::WidthPercent,
        Self::Height,
        Self::HeightPercent,
        Self::MinWidth,
        Self::MinWidthPercent,
        Self::MinHeight,
        Self::MinHeightPercent,
        Self::MaxWidth,
        Self::MaxWidthPercent,
        Self::MaxHeight,
        Self::MaxHeightPercent,
        Self::AspectRatio,
        Self::ScaleFactor,
    ];

    pub const fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Number of float values following the tag.
    pub const fn arity(self) -> usize {
        match self {
            Self::Margin
            | Self::MarginPercent
            | Self::Padding
            | Self::PaddingPercent
            | Self::Border
            | Self::Position
            | Self::PositionPercent
            | Self::Gap => 2,
            _ => 1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Direction => "direction",
            Self::FlexDirection => "flexDirection",
            Self::JustifyContent => "justifyContent",
            Self::AlignContent => "alignContent",
            Self::AlignItems => "alignItems",
            Self::AlignSelf => "alignSelf",
            Self::PositionType => "positionType",
            Self::FlexWrap => "flexWrap",
            Self::Overflow => "overflow",
            Self::Display => "display",
            Self::FlexGrow => "flexGrow",
            Self::FlexShrink => "flexShrink",
            Self::FlexBasis => "flexBasis",
            Self::FlexBasisPercent => "flexBasisPercent",
            Self::Margin => "margin",
            Self::MarginPercent => "marginPercent",
            Self::Padding => "padding",
            Self::PaddingPercent => "paddingPercent",
            Self::Border => "border",
            Self::Position => "position",
            Self::PositionPercent => "positionPercent",
            Self::Gap => "gap",
            Self::Width => "width",
            Self::WidthPercent => "widthPercent",
            Self::Height => "height",
            Self::HeightPercent => "heightPercent",
            Self::MinWidth => "minWidth",
            Self::MinWidthPercent => "minWidthPercent",
            Self::MinHeight => "minHeight",
            Self::MinHeightPercent => "minHeightPercent",
            Self::MaxWidth => "maxWidth",
            Self::MaxWidthPercent => "maxWidthPercent",
            Self::MaxHeight => "maxHeight",
            Self::MaxHeightPercent => "maxHeightPercent",
            Self::AspectRatio => "aspectRatio",
            Self::ScaleFactor => "scaleFactor",
        }
    }
}

impl fmt::Display for StyleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// ATTRIBUTES
// =============================================================================

/// One style attribute, the structured form of a wire record.
///
/// Edge and gap attributes have no default: an edge that was never set falls
/// back to its shorthand, so an explicit zero is always written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleAttr {
    Direction(Direction),
    FlexDirection(FlexDirection),
    JustifyContent(JustifyContent),
    AlignContent(AlignContent),
    AlignItems(AlignItems),
    AlignSelf(AlignSelf),
    PositionType(PositionType),
    FlexWrap(FlexWrap),
    Overflow(Overflow),
    Display(Display),
    FlexGrow(f32),
    FlexShrink(f32),
    FlexBasis(Dimension),
    Margin(Edge, Length),
    Padding(Edge, Length),
    Border(Edge, f32),
    Position(Edge, Length),
    Gap(Gutter, f32),
    Width(Dimension),
    Height(Dimension),
    MinWidth(Dimension),
    MinHeight(Dimension),
    MaxWidth(Dimension),
    MaxHeight(Dimension),
    AspectRatio(f32),
    ScaleFactor(f32),
}

pub(crate) const DEFAULT_FLEX_SHRINK: f32 = 1.0;
pub(crate) const DEFAULT_SCALE_FACTOR: f32 = 1.0;

impl StyleAttr {
    /// Whether this value equals the declared default of its tag.
    pub fn is_default(&self) -> bool {
        match *self {
            Self::Direction(v) => v == Direction::default(),
            Self::FlexDirection(v) => v == FlexDirection::default(),
            Self::JustifyContent(v) => v == JustifyContent::default(),
            Self::AlignContent(v) => v == AlignContent::default(),
            Self::AlignItems(v) => v == AlignItems::default(),
            Self::AlignSelf(v) => v == AlignSelf::default(),
            Self::PositionType(v) => v == PositionType::default(),
            Self::FlexWrap(v) => v == FlexWrap::default(),
            Self::Overflow(v) => v == Overflow::default(),
            Self::Display(v) => v == Display::default(),
            Self::FlexGrow(v) => v == 0.0,
            Self::FlexShrink(v) => v == DEFAULT_FLEX_SHRINK,
            Self::FlexBasis(d)
            | Self::Width(d)
            | Self::Height(d)
            | Self::MinWidth(d)
            | Self::MinHeight(d)
            | Self::MaxWidth(d)
            | Self::MaxHeight(d) => d.is_auto(),
            Self::Margin(..)
            | Self::Padding(..)
            | Self::Border(..)
            | Self::Position(..)
            | Self::Gap(..) => false,
            Self::AspectRatio(v) => v.is_nan(),
            Self::ScaleFactor(v) => v == DEFAULT_SCALE_FACTOR,
        }
    }

    /// Tag and values written for this attribute. `None` for `Auto`
    /// dimensions, which only exist as the omitted default.
    pub(crate) fn wire(&self) -> Option<(StyleTag, [f32; 2])> {
        fn dim(d: Dimension, points: StyleTag, percent: StyleTag) -> Option<(StyleTag, [f32; 2])> {
            match d {
                Dimension::Auto => None,
                Dimension::Points(v) => Some((points, [v, 0.0])),
                Dimension::Percent(v) => Some((percent, [v, 0.0])),
            }
        }
        fn edge(e: Edge, l: Length, points: StyleTag, percent: StyleTag) -> (StyleTag, [f32; 2]) {
            match l {
                Length::Points(v) => (points, [e.as_wire(), v]),
                Length::Percent(v) => (percent, [e.as_wire(), v]),
            }
        }

        let scalar = |tag: StyleTag, v: f32| Some((tag, [v, 0.0]));
        match *self {
            Self::Direction(v) => scalar(StyleTag::Direction, v.as_wire()),
            Self::FlexDirection(v) => scalar(StyleTag::FlexDirection, v.as_wire()),
            Self::JustifyContent(v) => scalar(StyleTag::JustifyContent, v.as_wire()),
            Self::AlignContent(v) => scalar(StyleTag::AlignContent, v.as_wire()),
            Self::AlignItems(v) => scalar(StyleTag::AlignItems, v.as_wire()),
            Self::AlignSelf(v) => scalar(StyleTag::AlignSelf, v.as_wire()),
            Self::PositionType(v) => scalar(StyleTag::PositionType, v.as_wire()),
            Self::FlexWrap(v) => scalar(StyleTag::FlexWrap, v.as_wire()),
            Self::Overflow(v) => scalar(StyleTag::Overflow, v.as_wire()),
            Self::Display(v) => scalar(StyleTag::Display, v.as_wire()),
            Self::FlexGrow(v) => scalar(StyleTag::FlexGrow, v),
            Self::FlexShrink(v) => scalar(StyleTag::FlexShrink, v),
            Self::FlexBasis(d) => dim(d, StyleTag::FlexBasis, StyleTag::FlexBasisPercent),
            Self::Margin(e, l) => Some(edge(e, l, StyleTag::Margin, StyleTag::MarginPercent)),
            Self::Padding(e, l) => Some(edge(e, l, StyleTag::Padding, StyleTag::PaddingPercent)),
            Self::Border(e, v) => Some((StyleTag::Border, [e.as_wire(), v])),
            Self::Position(e, l) => {
                Some(edge(e, l, StyleTag::Position, StyleTag::PositionPercent))
            }
            Self::Gap(g, v) => Some((StyleTag::Gap, [g.as_wire(), v])),
            Self::Width(d) => dim(d, StyleTag::Width, StyleTag::WidthPercent),
            Self::Height(d) => dim(d, StyleTag::Height, StyleTag::HeightPercent),
            Self::MinWidth(d) => dim(d, StyleTag::MinWidth, StyleTag::MinWidthPercent),
            Self::MinHeight(d) => dim(d, StyleTag::MinHeight, StyleTag::MinHeightPercent),
            Self::MaxWidth(d) => dim(d, StyleTag::MaxWidth, StyleTag::MaxWidthPercent),
            Self::MaxHeight(d) => dim(d, StyleTag::MaxHeight, StyleTag::MaxHeightPercent),
            Self::AspectRatio(v) => scalar(StyleTag::AspectRatio, v),
            Self::ScaleFactor(v) => scalar(StyleTag::ScaleFactor, v),
        }
    }

    /// Rebuild an attribute from a tag and exactly `tag.arity()` values.
    pub(crate) fn read(tag: StyleTag, values: &[f32]) -> Result<Self, ConfigurationError> {
        let invalid = |value: f32| ConfigurationError::InvalidValue { tag, value };
        let first = values[0];
        let finite = |v: f32| if v.is_finite() { Ok(v) } else { Err(invalid(v)) };
        let edge = || Edge::from_wire(first).ok_or_else(|| invalid(first));

        let attr = match tag {
            StyleTag::Direction => {
                Self::Direction(Direction::from_wire(first).ok_or_else(|| invalid(first))?)
            }
            StyleTag::FlexDirection => Self::FlexDirection(
                FlexDirection::from_wire(first).ok_or_else(|| invalid(first))?,
            ),
            StyleTag::JustifyContent => Self::JustifyContent(
                JustifyContent::from_wire(first).ok_or_else(|| invalid(first))?,
            ),
            StyleTag::AlignContent => Self::AlignContent(
                AlignContent::from_wire(first).ok_or_else(|| invalid(first))?,
            ),
            StyleTag::AlignItems => {
                Self::AlignItems(AlignItems::from_wire(first).ok_or_else(|| invalid(first))?)
            }
            StyleTag::AlignSelf => {
                Self::AlignSelf(AlignSelf::from_wire(first).ok_or_else(|| invalid(first))?)
            }
            StyleTag::PositionType => Self::PositionType(
                PositionType::from_wire(first).ok_or_else(|| invalid(first))?,
            ),
            StyleTag::FlexWrap => {
                Self::FlexWrap(FlexWrap::from_wire(first).ok_or_else(|| invalid(first))?)
            }
            StyleTag::Overflow => {
                Self::Overflow(Overflow::from_wire(first).ok_or_else(|| invalid(first))?)
            }
            StyleTag::Display => {
                Self::Display(Display::from_wire(first).ok_or_else(|| invalid(first))?)
            }
            StyleTag::FlexGrow => Self::FlexGrow(finite(first)?),
            StyleTag::FlexShrink => Self::FlexShrink(finite(first)?),
            StyleTag::FlexBasis => Self::FlexBasis(Dimension::Points(finite(first)?)),
            StyleTag::FlexBasisPercent => Self::FlexBasis(Dimension::Percent(finite(first)?)),
            StyleTag::Margin => Self::Margin(edge()?, Length::Points(finite(values[1])?)),
            StyleTag::MarginPercent => Self::Margin(edge()?, Length::Percent(finite(values[1])?)),
            StyleTag::Padding => Self::Padding(edge()?, Length::Points(finite(values[1])?)),
            StyleTag::PaddingPercent => {
                Self::Padding(edge()?, Length::Percent(finite(values[1])?))
            }
            StyleTag::Border => Self::Border(edge()?, finite(values[1])?),
            StyleTag::Position => Self::Position(edge()?, Length::Points(finite(values[1])?)),
            StyleTag::PositionPercent => {
                Self::Position(edge()?, Length::Percent(finite(values[1])?))
            }
            StyleTag::Gap => Self::Gap(
                Gutter::from_wire(first).ok_or_else(|| invalid(first))?,
                finite(values[1])?,
            ),
            StyleTag::Width => Self::Width(Dimension::Points(finite(first)?)),
            StyleTag::WidthPercent => Self::Width(Dimension::Percent(finite(first)?)),
            StyleTag::Height => Self::Height(Dimension::Points(finite(first)?)),
            StyleTag::HeightPercent => Self::Height(Dimension::Percent(finite(first)?)),
            StyleTag::MinWidth => Self::MinWidth(Dimension::Points(finite(first)?)),
            StyleTag::MinWidthPercent => Self::MinWidth(Dimension::Percent(finite(first)?)),
            StyleTag::MinHeight => Self::MinHeight(Dimension::Points(finite(first)?)),
            StyleTag::MinHeightPercent => Self::MinHeight(Dimension::Percent(finite(first)?)),
            StyleTag::MaxWidth => Self::MaxWidth(Dimension::Points(finite(first)?)),
            StyleTag::MaxWidthPercent => Self::MaxWidth(Dimension::Percent(finite(first)?)),
            StyleTag::MaxHeight => Self::MaxHeight(Dimension::Points(finite(first)?)),
            StyleTag::MaxHeightPercent => Self::MaxHeight(Dimension::Percent(finite(first)?)),
            StyleTag::AspectRatio => Self::AspectRatio(finite(first)?),
            StyleTag::ScaleFactor => {
                let v = finite(first)?;
                if v <= 0.0 {
                    return Err(invalid(v));
                }
                Self::ScaleFactor(v)
            }
        };
        Ok(attr)
    }

    /// Property name used in diagnostic lines, without unit suffixes.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Direction(_) => "direction",
            Self::FlexDirection(_) => "flexDirection",
            Self::JustifyContent(_) => "justifyContent",
            Self::AlignContent(_) => "alignContent",
            Self::AlignItems(_) => "alignItems",
            Self::AlignSelf(_) => "alignSelf",
            Self::PositionType(_) => "positionType",
            Self::FlexWrap(_) => "flexWrap",
            Self::Overflow(_) => "overflow",
            Self::Display(_) => "display",
            Self::FlexGrow(_) => "flexGrow",
            Self::FlexShrink(_) => "flexShrink",
            Self::FlexBasis(_) => "flexBasis",
            Self::Margin(..) => "margin",
            Self::Padding(..) => "padding",
            Self::Border(..) => "border",
            Self::Position(..) => "position",
            Self::Gap(..) => "gap",
            Self::Width(_) => "width",
            Self::Height(_) => "height",
            Self::MinWidth(_) => "minWidth",
            Self::MinHeight(_) => "minHeight",
            Self::MaxWidth(_) => "maxWidth",
            Self::MaxHeight(_) => "maxHeight",
            Self::AspectRatio(_) => "aspectRatio",
            Self::ScaleFactor(_) => "scaleFactor",
        }
    }
}

impl fmt::Display for StyleAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.label();
        match self {
            Self::Direction(v) => write!(f, "{name}: {v}"),
            Self::FlexDirection(v) => write!(f, "{name}: {v}"),
            Self::JustifyContent(v) => write!(f, "{name}: {v}"),
            Self::AlignContent(v) => write!(f, "{name}: {v}"),
            Self::AlignItems(v) => write!(f, "{name}: {v}"),
            Self::AlignSelf(v) => write!(f, "{name}: {v}"),
            Self::PositionType(v) => write!(f, "{name}: {v}"),
            Self::FlexWrap(v) => write!(f, "{name}: {v}"),
            Self::Overflow(v) => write!(f, "{name}: {v}"),
            Self::Display(v) => write!(f, "{name}: {v}"),
            Self::FlexGrow(v)
            | Self::FlexShrink(v)
            | Self::AspectRatio(v)
            | Self::ScaleFactor(v) => {
                write!(f, "{name}: {v}")
            }
            Self::FlexBasis(d)
            | Self::Width(d)
            | Self::Height(d)
            | Self::MinWidth(d)
            | Self::MinHeight(d)
            | Self::MaxWidth(d)
            | Self::MaxHeight(d) => write!(f, "{name}: {d}"),
            Self::Margin(e, l) | Self::Padding(e, l) | Self::Position(e, l) => {
                write!(f, "{name}{e}: {l}")
            }
            Self::Border(e, v) => write!(f, "{name}{e}: {v}"),
            Self::Gap(g, v) => write!(f, "{name}{g}: {v}"),
        }
    }
}
