//! Layout result façade.
//!
//! A [`LayoutResult`] is a read-only view of one node of a committed native
//! tree. Values are reported in whole pixels; leaves report their delegate
//! size plus their own padding instead of the solved size.

use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

use crate::engine::native::{Geometry, NativeId, NativeNode, NativeTree};
use crate::layout::node::{MeasuredSize, NodeKey};
use crate::layout::root::SizeSpec;

/// Round a layout value to whole pixels, half away from zero.
pub(crate) fn round_px(value: f32) -> i32 {
    value.round() as i32
}

#[derive(Clone)]
pub struct LayoutResult {
    tree: Arc<NativeTree>,
    id: NativeId,
    width_spec: SizeSpec,
    height_spec: SizeSpec,
    is_root: bool,
}

impl LayoutResult {
    pub(crate) fn root(
        tree: Arc<NativeTree>,
        id: NativeId,
        width_spec: SizeSpec,
        height_spec: SizeSpec,
    ) -> Self {
        Self {
            tree,
            id,
            width_spec,
            height_spec,
            is_root: true,
        }
    }

    fn at(&self, id: NativeId) -> Self {
        let mut child = Self {
            tree: Arc::clone(&self.tree),
            id,
            width_spec: SizeSpec::unspecified(),
            height_spec: SizeSpec::unspecified(),
            is_root: false,
        };
        child.width_spec = SizeSpec::exact(child.width() as f32);
        child.height_spec = SizeSpec::exact(child.height() as f32);
        child
    }

    fn node(&self) -> &NativeNode {
        self.tree.node(self.id)
    }

    fn geometry(&self) -> &Geometry {
        self.node().geometry()
    }

    pub fn key(&self) -> NodeKey {
        self.node().key()
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }

    pub fn is_leaf(&self) -> bool {
        self.node().is_leaf()
    }

    pub fn is_hidden(&self) -> bool {
        self.node().is_hidden()
    }

    /// Size reported by this leaf's measurement function.
    pub fn delegate(&self) -> Option<MeasuredSize> {
        self.node().leaf().and_then(|slot| slot.delegate())
    }

    pub fn width(&self) -> i32 {
        let g = self.geometry();
        match self.delegate() {
            Some(size) => round_px(size.width + g.padding.horizontal()),
            None => round_px(g.width),
        }
    }

    pub fn height(&self) -> i32 {
        let g = self.geometry();
        match self.delegate() {
            Some(size) => round_px(size.height + g.padding.vertical()),
            None => round_px(g.height),
        }
    }

    /// Position relative to the parent.
    pub fn x(&self) -> i32 {
        round_px(self.geometry().x)
    }

    pub fn y(&self) -> i32 {
        round_px(self.geometry().y)
    }

    pub fn padding_top(&self) -> i32 {
        round_px(self.geometry().padding.top)
    }

    pub fn padding_right(&self) -> i32 {
        round_px(self.geometry().padding.right)
    }

    pub fn padding_bottom(&self) -> i32 {
        round_px(self.geometry().padding.bottom)
    }

    pub fn padding_left(&self) -> i32 {
        round_px(self.geometry().padding.left)
    }

    /// Constraint this node was laid out under. Non-root nodes report their
    /// solved size as exact.
    pub fn width_spec(&self) -> SizeSpec {
        self.width_spec
    }

    pub fn height_spec(&self) -> SizeSpec {
        self.height_spec
    }

    /// Number of attached children. Hidden children are not counted.
    pub fn child_count(&self) -> usize {
        self.node().children().len()
    }

    pub fn child_at(&self, index: usize) -> Option<LayoutResult> {
        let id = *self.node().children().get(index)?;
        Some(self.at(id))
    }

    pub fn x_for_child_at(&self, index: usize) -> Option<i32> {
        let id = *self.node().children().get(index)?;
        Some(round_px(self.tree.geometry(id).x))
    }

    pub fn y_for_child_at(&self, index: usize) -> Option<i32> {
        let id = *self.node().children().get(index)?;
        Some(round_px(self.tree.geometry(id).y))
    }

    pub fn children(&self) -> impl Iterator<Item = LayoutResult> + '_ {
        self.node().children().iter().map(|&id| self.at(id))
    }

    /// Indented text rendering of this subtree.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize) {
        let _ = write!(
            out,
            "{:indent$}{} {}x{} @({},{})",
            "",
            self.key(),
            self.width(),
            self.height(),
            self.x(),
            self.y(),
            indent = depth * 2
        );
        if self.is_leaf() {
            out.push_str(" [leaf]");
        }
        out.push('\n');
        for child in self.children() {
            child.dump_into(out, depth + 1);
        }
    }
}

impl fmt::Debug for LayoutResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutResult")
            .field("key", &self.key())
            .field("x", &self.x())
            .field("y", &self.y())
            .field("width", &self.width())
            .field("height", &self.height())
            .field("children", &self.child_count())
            .finish()
    }
}
