//! Engine configuration.

use crate::types::Direction;

/// Settings shared by every pass of one [`LayoutContext`](crate::LayoutContext).
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Writing direction of the platform. `Rtl` is forced onto roots whose
    /// direction is `inherit`.
    pub ambient_direction: Direction,

    /// Resolve a percentage root size against an `AtMost` constraint as an
    /// exact size instead of a maximum.
    pub percent_at_root: bool,

    /// Reuse cached subtrees by cloning them. When off, every cache hit is
    /// rebuilt from the abstract tree.
    pub native_clone: bool,

    /// Number of recent measurements remembered per leaf.
    pub measure_memo_capacity: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            ambient_direction: Direction::Ltr,
            percent_at_root: false,
            native_clone: true,
            measure_memo_capacity: 16,
        }
    }
}

impl LayoutConfig {
    pub fn with_ambient_direction(mut self, direction: Direction) -> Self {
        self.ambient_direction = direction;
        self
    }

    pub fn with_percent_at_root(mut self, enabled: bool) -> Self {
        self.percent_at_root = enabled;
        self
    }

    pub fn with_native_clone(mut self, enabled: bool) -> Self {
        self.native_clone = enabled;
        self
    }

    pub fn with_measure_memo_capacity(mut self, capacity: usize) -> Self {
        self.measure_memo_capacity = capacity;
        self
    }
}
