//! Structured style record.
//!
//! `NodeStyle` is what the node adapter consumes. It is built from a
//! `StyleBuffer` by [`NodeStyle::decode`] and turned back into one by
//! [`NodeStyle::encode`]; nothing else touches the wire format.

use crate::error::ConfigurationError;
use crate::style::attr::{DEFAULT_FLEX_SHRINK, DEFAULT_SCALE_FACTOR, StyleAttr};
use crate::style::encoder::StyleBuffer;
use crate::types::{
    AlignContent, AlignItems, AlignSelf, Dimension, Direction, Display, Edge, FlexDirection,
    FlexWrap, Gutter, JustifyContent, Length, Overflow, PositionType,
};

/// Per-edge values, including the direction-relative and shorthand edges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeValues {
    values: [Option<Length>; Edge::COUNT],
}

impl EdgeValues {
    pub fn set(&mut self, edge: Edge, value: Length) {
        self.values[edge as usize] = Some(value);
    }

    pub fn get(&self, edge: Edge) -> Option<Length> {
        self.values[edge as usize]
    }

    /// Value of a physical edge: start/end first, then the physical edge,
    /// then horizontal/vertical, then all.
    pub fn resolve(&self, physical: Edge, direction: Direction) -> Option<Length> {
        let rtl = direction == Direction::Rtl;
        let (relative, axis) = match physical {
            Edge::Left => (Some(if rtl { Edge::End } else { Edge::Start }), Edge::Horizontal),
            Edge::Right => (Some(if rtl { Edge::Start } else { Edge::End }), Edge::Horizontal),
            Edge::Top | Edge::Bottom => (None, Edge::Vertical),
            other => return self.get(other),
        };
        relative
            .and_then(|edge| self.get(edge))
            .or(self.get(physical))
            .or(self.get(axis))
            .or(self.get(Edge::All))
    }

    fn iter(&self) -> impl Iterator<Item = (Edge, Length)> + '_ {
        self.values.iter().enumerate().filter_map(|(i, value)| {
            let edge = Edge::from_wire(i as f32)?;
            value.map(|v| (edge, v))
        })
    }
}

/// Gap per gutter.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GapValues {
    values: [Option<f32>; 3],
}

impl GapValues {
    pub fn set(&mut self, gutter: Gutter, value: f32) {
        self.values[gutter as usize] = Some(value);
    }

    pub fn get(&self, gutter: Gutter) -> Option<f32> {
        self.values[gutter as usize]
    }

    /// Effective gap for one axis (`Column` or `Row`), falling back to `All`.
    pub fn resolve(&self, gutter: Gutter) -> f32 {
        self.get(gutter).or(self.get(Gutter::All)).unwrap_or(0.0)
    }
}

/// Fully defaulted style of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStyle {
    pub direction: Direction,
    pub flex_direction: FlexDirection,
    pub justify_content: JustifyContent,
    pub align_content: AlignContent,
    pub align_items: AlignItems,
    pub align_self: AlignSelf,
    pub position_type: PositionType,
    pub flex_wrap: FlexWrap,
    pub overflow: Overflow,
    pub display: Display,

    pub flex_grow: f32,
    pub flex_shrink: f32,
    pub flex_basis: Dimension,

    pub margin: EdgeValues,
    pub padding: EdgeValues,
    pub border: EdgeValues,
    pub position: EdgeValues,
    pub gap: GapValues,

    pub width: Dimension,
    pub height: Dimension,
    pub min_width: Dimension,
    pub min_height: Dimension,
    pub max_width: Dimension,
    pub max_height: Dimension,

    pub aspect_ratio: Option<f32>,
    pub scale_factor: f32,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            direction: Direction::default(),
            flex_direction: FlexDirection::default(),
            justify_content: JustifyContent::default(),
            align_content: AlignContent::default(),
            align_items: AlignItems::default(),
            align_self: AlignSelf::default(),
            position_type: PositionType::default(),
            flex_wrap: FlexWrap::default(),
            overflow: Overflow::default(),
            display: Display::default(),
            flex_grow: 0.0,
            flex_shrink: DEFAULT_FLEX_SHRINK,
            flex_basis: Dimension::Auto,
            margin: EdgeValues::default(),
            padding: EdgeValues::default(),
            border: EdgeValues::default(),
            position: EdgeValues::default(),
            gap: GapValues::default(),
            width: Dimension::Auto,
            height: Dimension::Auto,
            min_width: Dimension::Auto,
            min_height: Dimension::Auto,
            max_width: Dimension::Auto,
            max_height: Dimension::Auto,
            aspect_ratio: None,
            scale_factor: DEFAULT_SCALE_FACTOR,
        }
    }
}

impl NodeStyle {
    /// Decode a wire buffer. Later records override earlier ones.
    pub fn decode(buffer: &StyleBuffer) -> Result<Self, ConfigurationError> {
        let mut style = Self::default();
        for attr in buffer.decode() {
            style.apply(attr?);
        }
        Ok(style)
    }

    /// Encode into a sparse wire buffer.
    pub fn encode(&self) -> StyleBuffer {
        StyleBuffer::from_attrs(self.attrs())
    }

    pub fn apply(&mut self, attr: StyleAttr) {
        match attr {
            StyleAttr::Direction(v) => self.direction = v,
            StyleAttr::FlexDirection(v) => self.flex_direction = v,
            StyleAttr::JustifyContent(v) => self.justify_content = v,
            StyleAttr::AlignContent(v) => self.align_content = v,
            StyleAttr::AlignItems(v) => self.align_items = v,
            StyleAttr::AlignSelf(v) => self.align_self = v,
            StyleAttr::PositionType(v) => self.position_type = v,
            StyleAttr::FlexWrap(v) => self.flex_wrap = v,
            StyleAttr::Overflow(v) => self.overflow = v,
            StyleAttr::Display(v) => self.display = v,
            StyleAttr::FlexGrow(v) => self.flex_grow = v,
            StyleAttr::FlexShrink(v) => self.flex_shrink = v,
            StyleAttr::FlexBasis(v) => self.flex_basis = v,
            StyleAttr::Margin(edge, v) => self.margin.set(edge, v),
            StyleAttr::Padding(edge, v) => self.padding.set(edge, v),
            StyleAttr::Border(edge, v) => self.border.set(edge, Length::Points(v)),
            StyleAttr::Position(edge, v) => self.position.set(edge, v),
            StyleAttr::Gap(gutter, v) => self.gap.set(gutter, v),
            StyleAttr::Width(v) => self.width = v,
            StyleAttr::Height(v) => self.height = v,
            StyleAttr::MinWidth(v) => self.min_width = v,
            StyleAttr::MinHeight(v) => self.min_height = v,
            StyleAttr::MaxWidth(v) => self.max_width = v,
            StyleAttr::MaxHeight(v) => self.max_height = v,
            StyleAttr::AspectRatio(v) => self.aspect_ratio = (!v.is_nan()).then_some(v),
            StyleAttr::ScaleFactor(v) => self.scale_factor = v,
        }
    }

    /// Every attribute of this style in tag order, defaults included.
    pub fn attrs(&self) -> Vec<StyleAttr> {
        let mut attrs = vec![
            StyleAttr::Direction(self.direction),
            StyleAttr::FlexDirection(self.flex_direction),
            StyleAttr::JustifyContent(self.justify_content),
            StyleAttr::AlignContent(self.align_content),
            StyleAttr::AlignItems(self.align_items),
            StyleAttr::AlignSelf(self.align_self),
            StyleAttr::PositionType(self.position_type),
            StyleAttr::FlexWrap(self.flex_wrap),
            StyleAttr::Overflow(self.overflow),
            StyleAttr::Display(self.display),
            StyleAttr::FlexGrow(self.flex_grow),
            StyleAttr::FlexShrink(self.flex_shrink),
            StyleAttr::FlexBasis(self.flex_basis),
        ];
        attrs.extend(self.margin.iter().map(|(e, v)| StyleAttr::Margin(e, v)));
        attrs.extend(self.padding.iter().map(|(e, v)| StyleAttr::Padding(e, v)));
        attrs.extend(self.border.iter().map(|(e, v)| {
            let points = match v {
                Length::Points(p) => p,
                Length::Percent(_) => 0.0,
            };
            StyleAttr::Border(e, points)
        }));
        attrs.extend(self.position.iter().map(|(e, v)| StyleAttr::Position(e, v)));
        for gutter in [Gutter::Column, Gutter::Row, Gutter::All] {
            if let Some(v) = self.gap.get(gutter) {
                attrs.push(StyleAttr::Gap(gutter, v));
            }
        }
        attrs.extend([
            StyleAttr::Width(self.width),
            StyleAttr::Height(self.height),
            StyleAttr::MinWidth(self.min_width),
            StyleAttr::MinHeight(self.min_height),
            StyleAttr::MaxWidth(self.max_width),
            StyleAttr::MaxHeight(self.max_height),
            StyleAttr::AspectRatio(self.aspect_ratio.unwrap_or(f32::NAN)),
            StyleAttr::ScaleFactor(self.scale_factor),
        ]);
        attrs
    }

    pub fn is_hidden(&self) -> bool {
        self.display == Display::None
    }
}
