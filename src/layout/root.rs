//! Root sizing and root direction.
//!
//! The host hands the pass one [`SizeSpec`] per axis. Before the solve they
//! are turned into size overrides on the root's solver style and the
//! available space the solve starts from.

use std::fmt;

use taffy::prelude::{AvailableSpace, Size};
use taffy::style::{Dimension as TaffyDimension, Style};

use crate::style::NodeStyle;
use crate::types::{Dimension, Direction};

/// How a host constraint limits one axis of the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SizeMode {
    Exact,
    AtMost,
    #[default]
    Unspecified,
}

/// Host constraint for one axis of the root.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeSpec {
    pub mode: SizeMode,
    pub size: f32,
}

impl SizeSpec {
    pub fn exact(size: f32) -> Self {
        Self {
            mode: SizeMode::Exact,
            size,
        }
    }

    pub fn at_most(size: f32) -> Self {
        Self {
            mode: SizeMode::AtMost,
            size,
        }
    }

    pub fn unspecified() -> Self {
        Self::default()
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            SizeMode::Exact => write!(f, "EXACTLY {}", self.size),
            SizeMode::AtMost => write!(f, "AT_MOST {}", self.size),
            SizeMode::Unspecified => f.write_str("UNSPECIFIED"),
        }
    }
}

/// Resolved constraint for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum AxisConstraint {
    /// Size, min and max all pinned.
    Fixed(f32),
    /// Upper bound only.
    AtMost(f32),
    /// Sized by content.
    Free,
}

impl AxisConstraint {
    fn resolve(
        spec: SizeSpec,
        declared: Dimension,
        declared_max: Dimension,
        scale: f32,
        percent_at_root: bool,
    ) -> Self {
        let px = spec.size.max(0.0);
        match spec.mode {
            SizeMode::Exact => Self::Fixed(px),
            SizeMode::AtMost => match declared {
                Dimension::Percent(p) if percent_at_root => Self::Fixed(px * p / 100.0),
                _ => {
                    let bound = match declared_max {
                        Dimension::Points(m) => px.min(m * scale),
                        Dimension::Percent(p) => px.min(px * p / 100.0),
                        Dimension::Auto => px,
                    };
                    Self::AtMost(bound)
                }
            },
            SizeMode::Unspecified => Self::Free,
        }
    }

    fn available(self) -> AvailableSpace {
        match self {
            Self::Fixed(px) | Self::AtMost(px) => AvailableSpace::Definite(px),
            Self::Free => AvailableSpace::MaxContent,
        }
    }

    fn apply(self, size: &mut TaffyDimension, min: &mut TaffyDimension, max: &mut TaffyDimension) {
        match self {
            Self::Fixed(px) => {
                *size = TaffyDimension::length(px);
                *min = TaffyDimension::length(px);
                *max = TaffyDimension::length(px);
            }
            Self::AtMost(px) => *max = TaffyDimension::length(px),
            Self::Free => {}
        }
    }
}

/// Host constraints resolved against the root style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RootSizing {
    pub width: AxisConstraint,
    pub height: AxisConstraint,
}

impl RootSizing {
    pub(crate) fn resolve(
        width: SizeSpec,
        height: SizeSpec,
        root: &NodeStyle,
        percent_at_root: bool,
    ) -> Self {
        let scale = root.scale_factor;
        Self {
            width: AxisConstraint::resolve(
                width,
                root.width,
                root.max_width,
                scale,
                percent_at_root,
            ),
            height: AxisConstraint::resolve(
                height,
                root.height,
                root.max_height,
                scale,
                percent_at_root,
            ),
        }
    }

    pub(crate) fn available_space(&self) -> Size<AvailableSpace> {
        Size {
            width: self.width.available(),
            height: self.height.available(),
        }
    }

    /// Override the root's solver style with the host constraints.
    pub(crate) fn apply(&self, style: &mut Style) {
        self.width.apply(
            &mut style.size.width,
            &mut style.min_size.width,
            &mut style.max_size.width,
        );
        self.height.apply(
            &mut style.size.height,
            &mut style.min_size.height,
            &mut style.max_size.height,
        );
    }
}

/// Direction a root inherits from the platform.
///
/// Only a right-to-left platform is propagated; anything else starts the
/// tree left-to-right.
pub fn ambient_root_direction(ambient: Direction) -> Direction {
    match ambient {
        Direction::Rtl => Direction::Rtl,
        Direction::Inherit | Direction::Ltr => Direction::Ltr,
    }
}

/// Effective direction of a root declaring `declared`.
pub fn resolve_root_direction(declared: Direction, ambient: Direction) -> Direction {
    declared.resolve(ambient_root_direction(ambient))
}
