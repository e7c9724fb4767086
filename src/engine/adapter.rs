//! Node adapter - converts a decoded [`NodeStyle`] to a solver style.
//!
//! The solver has no notion of writing direction, so right-to-left is
//! applied here: row axes are mirrored and start/end edges resolve to the
//! opposite physical side.

use taffy::prelude::{Rect, Size};
use taffy::style::{
    AlignContent as TaffyAlignContent, AlignItems as TaffyAlignItems,
    AlignSelf as TaffyAlignSelf, Dimension as TaffyDimension, Display as TaffyDisplay,
    FlexDirection as TaffyFlexDirection, FlexWrap as TaffyFlexWrap,
    JustifyContent as TaffyJustifyContent, LengthPercentage, LengthPercentageAuto,
    Overflow as TaffyOverflow, Position as TaffyPosition, Style,
};

use crate::style::{EdgeValues, NodeStyle};
use crate::types::{
    AlignContent, AlignItems, AlignSelf, Dimension, Direction, Display, Edge, FlexDirection,
    FlexWrap, Gutter, JustifyContent, Length, Overflow, PositionType,
};

// =============================================================================
// DIMENSION CONVERSION
// =============================================================================

fn to_taffy_dimension(dim: Dimension, scale: f32) -> TaffyDimension {
    match dim {
        Dimension::Auto => TaffyDimension::auto(),
        Dimension::Points(n) => TaffyDimension::length(n * scale),
        Dimension::Percent(p) => TaffyDimension::percent(p / 100.0),
    }
}

fn to_taffy_lp(len: Option<Length>, scale: f32) -> LengthPercentage {
    match len {
        None => LengthPercentage::length(0.0),
        Some(Length::Points(n)) => LengthPercentage::length((n * scale).max(0.0)),
        Some(Length::Percent(p)) => LengthPercentage::percent((p / 100.0).max(0.0)),
    }
}

fn to_taffy_lpa(
    len: Option<Length>,
    scale: f32,
    unset: LengthPercentageAuto,
) -> LengthPercentageAuto {
    match len {
        None => unset,
        Some(Length::Points(n)) => LengthPercentageAuto::length(n * scale),
        Some(Length::Percent(p)) => LengthPercentageAuto::percent(p / 100.0),
    }
}

/// Resolve all four physical edges of an edge set.
fn physical_edges<T>(
    values: &EdgeValues,
    direction: Direction,
    convert: impl Fn(Option<Length>) -> T,
) -> Rect<T> {
    Rect {
        left: convert(values.resolve(Edge::Left, direction)),
        right: convert(values.resolve(Edge::Right, direction)),
        top: convert(values.resolve(Edge::Top, direction)),
        bottom: convert(values.resolve(Edge::Bottom, direction)),
    }
}

// =============================================================================
// ENUM CONVERSIONS
// =============================================================================

fn to_taffy_flex_direction(dir: FlexDirection, direction: Direction) -> TaffyFlexDirection {
    let rtl = direction == Direction::Rtl;
    match dir {
        FlexDirection::Column => TaffyFlexDirection::Column,
        FlexDirection::ColumnReverse => TaffyFlexDirection::ColumnReverse,
        FlexDirection::Row if rtl => TaffyFlexDirection::RowReverse,
        FlexDirection::Row => TaffyFlexDirection::Row,
        FlexDirection::RowReverse if rtl => TaffyFlexDirection::Row,
        FlexDirection::RowReverse => TaffyFlexDirection::RowReverse,
    }
}

fn to_taffy_flex_wrap(wrap: FlexWrap) -> TaffyFlexWrap {
    match wrap {
        FlexWrap::NoWrap => TaffyFlexWrap::NoWrap,
        FlexWrap::Wrap => TaffyFlexWrap::Wrap,
        FlexWrap::WrapReverse => TaffyFlexWrap::WrapReverse,
    }
}

fn to_taffy_justify_content(justify: JustifyContent) -> Option<TaffyJustifyContent> {
    Some(match justify {
        JustifyContent::FlexStart => TaffyJustifyContent::FlexStart,
        JustifyContent::Center => TaffyJustifyContent::Center,
        JustifyContent::FlexEnd => TaffyJustifyContent::FlexEnd,
        JustifyContent::SpaceBetween => TaffyJustifyContent::SpaceBetween,
        JustifyContent::SpaceAround => TaffyJustifyContent::SpaceAround,
        JustifyContent::SpaceEvenly => TaffyJustifyContent::SpaceEvenly,
    })
}

fn to_taffy_align_items(align: AlignItems) -> Option<TaffyAlignItems> {
    Some(match align {
        AlignItems::Stretch => TaffyAlignItems::Stretch,
        AlignItems::FlexStart => TaffyAlignItems::FlexStart,
        AlignItems::Center => TaffyAlignItems::Center,
        AlignItems::FlexEnd => TaffyAlignItems::FlexEnd,
        AlignItems::Baseline => TaffyAlignItems::Baseline,
    })
}

fn to_taffy_align_content(align: AlignContent) -> Option<TaffyAlignContent> {
    Some(match align {
        AlignContent::Stretch => TaffyAlignContent::Stretch,
        AlignContent::FlexStart => TaffyAlignContent::FlexStart,
        AlignContent::Center => TaffyAlignContent::Center,
        AlignContent::FlexEnd => TaffyAlignContent::FlexEnd,
        AlignContent::SpaceBetween => TaffyAlignContent::SpaceBetween,
        AlignContent::SpaceAround => TaffyAlignContent::SpaceAround,
    })
}

fn to_taffy_align_self(align: AlignSelf) -> Option<TaffyAlignSelf> {
    match align {
        AlignSelf::Auto => None, // parent's align-items
        AlignSelf::Stretch => Some(TaffyAlignSelf::Stretch),
        AlignSelf::FlexStart => Some(TaffyAlignSelf::FlexStart),
        AlignSelf::Center => Some(TaffyAlignSelf::Center),
        AlignSelf::FlexEnd => Some(TaffyAlignSelf::FlexEnd),
        AlignSelf::Baseline => Some(TaffyAlignSelf::Baseline),
    }
}

fn to_taffy_overflow(overflow: Overflow) -> TaffyOverflow {
    match overflow {
        Overflow::Visible => TaffyOverflow::Visible,
        Overflow::Hidden => TaffyOverflow::Hidden,
        Overflow::Scroll => TaffyOverflow::Scroll,
    }
}

fn to_taffy_position(position: PositionType) -> TaffyPosition {
    match position {
        PositionType::Relative => TaffyPosition::Relative,
        PositionType::Absolute => TaffyPosition::Absolute,
    }
}

// =============================================================================
// STYLE BUILDING
// =============================================================================

/// Build the solver style of one node under its resolved direction.
pub(crate) fn solver_style(style: &NodeStyle, direction: Direction) -> Style {
    let scale = style.scale_factor;
    let overflow = to_taffy_overflow(style.overflow);

    Style {
        display: match style.display {
            Display::Flex => TaffyDisplay::Flex,
            Display::None => TaffyDisplay::None,
        },
        position: to_taffy_position(style.position_type),
        overflow: taffy::Point {
            x: overflow,
            y: overflow,
        },

        flex_direction: to_taffy_flex_direction(style.flex_direction, direction),
        flex_wrap: to_taffy_flex_wrap(style.flex_wrap),
        justify_content: to_taffy_justify_content(style.justify_content),
        align_items: to_taffy_align_items(style.align_items),
        align_content: to_taffy_align_content(style.align_content),

        flex_grow: style.flex_grow,
        flex_shrink: style.flex_shrink,
        flex_basis: to_taffy_dimension(style.flex_basis, scale),
        align_self: to_taffy_align_self(style.align_self),

        size: Size {
            width: to_taffy_dimension(style.width, scale),
            height: to_taffy_dimension(style.height, scale),
        },
        min_size: Size {
            width: to_taffy_dimension(style.min_width, scale),
            height: to_taffy_dimension(style.min_height, scale),
        },
        max_size: Size {
            width: to_taffy_dimension(style.max_width, scale),
            height: to_taffy_dimension(style.max_height, scale),
        },
        aspect_ratio: style.aspect_ratio,

        margin: physical_edges(&style.margin, direction, |len| {
            to_taffy_lpa(len, scale, LengthPercentageAuto::length(0.0))
        }),
        padding: physical_edges(&style.padding, direction, |len| to_taffy_lp(len, scale)),
        border: physical_edges(&style.border, direction, |len| to_taffy_lp(len, scale)),
        inset: physical_edges(&style.position, direction, |len| {
            to_taffy_lpa(len, scale, LengthPercentageAuto::auto())
        }),

        gap: Size {
            width: LengthPercentage::length((style.gap.resolve(Gutter::Column) * scale).max(0.0)),
            height: LengthPercentage::length((style.gap.resolve(Gutter::Row) * scale).max(0.0)),
        },

        ..Style::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtl_mirrors_row() {
        assert_eq!(
            to_taffy_flex_direction(FlexDirection::Row, Direction::Rtl),
            TaffyFlexDirection::RowReverse
        );
        assert_eq!(
            to_taffy_flex_direction(FlexDirection::RowReverse, Direction::Rtl),
            TaffyFlexDirection::Row
        );
        assert_eq!(
            to_taffy_flex_direction(FlexDirection::Column, Direction::Rtl),
            TaffyFlexDirection::Column
        );
    }

    #[test]
    fn test_start_padding_follows_direction() {
        let mut style = NodeStyle::default();
        style.padding.set(Edge::Start, Length::Points(8.0));

        let ltr = solver_style(&style, Direction::Ltr);
        assert_eq!(ltr.padding.left, LengthPercentage::length(8.0));
        assert_eq!(ltr.padding.right, LengthPercentage::length(0.0));

        let rtl = solver_style(&style, Direction::Rtl);
        assert_eq!(rtl.padding.left, LengthPercentage::length(0.0));
        assert_eq!(rtl.padding.right, LengthPercentage::length(8.0));
    }

    #[test]
    fn test_scale_factor_applies_to_points_only() {
        let mut style = NodeStyle::default();
        style.scale_factor = 2.0;
        style.width = Dimension::Points(10.0);
        style.height = Dimension::Percent(50.0);

        let solved = solver_style(&style, Direction::Ltr);
        assert_eq!(solved.size.width, TaffyDimension::length(20.0));
        assert_eq!(solved.size.height, TaffyDimension::percent(0.5));
    }

    #[test]
    fn test_unset_inset_is_auto() {
        let solved = solver_style(&NodeStyle::default(), Direction::Ltr);
        assert_eq!(solved.inset.left, LengthPercentageAuto::auto());
        assert_eq!(solved.margin.left, LengthPercentageAuto::length(0.0));
    }

    #[test]
    fn test_display_none() {
        let mut style = NodeStyle::default();
        style.display = Display::None;
        assert_eq!(solver_style(&style, Direction::Ltr).display, TaffyDisplay::None);
    }
}
