//! The abstract node contract consumed by the engine.
//!
//! The surrounding framework owns the node tree. The engine only needs a
//! stable identity, the children in order, the encoded style and, for
//! content-driven leaves, a measurement function.

use std::fmt;
use std::sync::Arc;

use crate::error::MeasureError;
use crate::style::{StyleAttr, StyleBuffer};

/// Stable identity of an abstract node.
///
/// The framework must hand out a new key whenever the node, its style or
/// anything below it changes; an unchanged key means an unchanged subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub u64);

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Box constraints passed to a measurement function.
///
/// `max_*` may be `f32::INFINITY` when the axis is unbounded. The owner size
/// is the content box of the parent, when known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureInput {
    pub min_width: f32,
    pub max_width: f32,
    pub min_height: f32,
    pub max_height: f32,
    pub owner_width: Option<f32>,
    pub owner_height: Option<f32>,
}

impl MeasureInput {
    /// An exact box.
    pub fn exact(width: f32, height: f32) -> Self {
        Self {
            min_width: width,
            max_width: width,
            min_height: height,
            max_height: height,
            owner_width: None,
            owner_height: None,
        }
    }

    /// Same box constraints, ignoring the owner size.
    pub(crate) fn same_box(&self, other: &Self) -> bool {
        self.min_width.to_bits() == other.min_width.to_bits()
            && self.max_width.to_bits() == other.max_width.to_bits()
            && self.min_height.to_bits() == other.min_height.to_bits()
            && self.max_height.to_bits() == other.max_height.to_bits()
    }
}

/// Size reported by a measurement function (content box, in pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeasuredSize {
    pub width: f32,
    pub height: f32,
}

impl MeasuredSize {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Pure content measurement. Called with the box the solver assigned.
pub type MeasureFn =
    Arc<dyn Fn(&MeasureInput) -> Result<MeasuredSize, MeasureError> + Send + Sync>;

/// Wrap a closure as a [`MeasureFn`].
pub fn measure_fn<F>(f: F) -> MeasureFn
where
    F: Fn(&MeasureInput) -> Result<MeasuredSize, MeasureError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Whether a node is sized by content or by the flex solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Container,
    Leaf,
}

impl NodeKind {
    /// Kind of `node` in the current pass.
    pub fn of<N: LayoutNode + ?Sized>(node: &N) -> Self {
        if node.can_self_measure() { Self::Leaf } else { Self::Container }
    }
}

/// A node of the abstract tree.
pub trait LayoutNode {
    fn key(&self) -> NodeKey;

    /// Encoded sparse style.
    fn style(&self) -> &StyleBuffer;

    /// Children in layout order. Ignored for self-measuring nodes.
    fn children(&self) -> impl Iterator<Item = &Self>;

    /// Measurement function of a content-driven leaf.
    fn measure_fn(&self) -> Option<MeasureFn> {
        None
    }

    fn can_self_measure(&self) -> bool {
        self.measure_fn().is_some()
    }
}

// =============================================================================
// VIEW NODE
// =============================================================================

/// Owned node tree for embedders without their own node type.
///
/// ```
/// use spark_layout::{MeasuredSize, StyleAttr, ViewNode, measure_fn};
/// use spark_layout::types::FlexDirection;
///
/// let tree = ViewNode::new(1)
///     .with_style(StyleAttr::FlexDirection(FlexDirection::Row))
///     .child(ViewNode::new(2).measured(measure_fn(|_| Ok(MeasuredSize::new(10.0, 4.0)))));
/// assert_eq!(tree.child_nodes().len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct ViewNode {
    key: u64,
    style: StyleBuffer,
    children: Vec<ViewNode>,
    measure: Option<MeasureFn>,
}

impl ViewNode {
    pub fn new(key: u64) -> Self {
        Self {
            key,
            ..Self::default()
        }
    }

    pub fn with_style(mut self, attr: StyleAttr) -> Self {
        self.style.append(attr);
        self
    }

    pub fn with_buffer(mut self, style: StyleBuffer) -> Self {
        self.style = style;
        self
    }

    pub fn child(mut self, child: ViewNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = ViewNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Make this node a content-driven leaf.
    pub fn measured(mut self, measure: MeasureFn) -> Self {
        self.measure = Some(measure);
        self
    }

    pub fn child_nodes(&self) -> &[ViewNode] {
        &self.children
    }

    pub fn child_nodes_mut(&mut self) -> &mut Vec<ViewNode> {
        &mut self.children
    }

    pub fn set_key(&mut self, key: u64) {
        self.key = key;
    }

    pub fn set_style(&mut self, style: StyleBuffer) {
        self.style = style;
    }
}

impl LayoutNode for ViewNode {
    fn key(&self) -> NodeKey {
        NodeKey(self.key)
    }

    fn style(&self) -> &StyleBuffer {
        &self.style
    }

    fn children(&self) -> impl Iterator<Item = &Self> {
        self.children.iter()
    }

    fn measure_fn(&self) -> Option<MeasureFn> {
        self.measure.clone()
    }
}

impl fmt::Debug for ViewNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewNode")
            .field("key", &self.key)
            .field("style", &self.style)
            .field("children", &self.children)
            .field("measured", &self.measure.is_some())
            .finish()
    }
}
