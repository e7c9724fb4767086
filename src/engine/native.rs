//! Native node arena.
//!
//! One `NativeTree` is built per layout pass. Nodes are stored in a flat
//! vector and addressed by [`NativeId`]; every node owns its geometry slot,
//! so two nodes never share a position or size even when one was cloned
//! from the other.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::error::{CacheConsistencyError, MeasureError};
use crate::layout::node::{MeasureFn, MeasureInput, MeasuredSize, NodeKey};
use crate::style::{NodeStyle, StyleBuffer};
use crate::types::Direction;

/// Index of a node inside one [`NativeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeId(u32);

impl NativeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

impl fmt::Display for NativeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct NodeFlags: u8 {
        /// Sized by a measurement function.
        const LEAF = 1 << 0;
        /// `display: none`; built but never attached.
        const HIDDEN = 1 << 1;
        /// Copied from another subtree rather than built.
        const CLONED = 1 << 2;
    }
}

/// Resolved per-edge pixel values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeInsets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeInsets {
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Solved geometry of one node. Position is relative to the parent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub padding: EdgeInsets,
    pub border: EdgeInsets,
}

impl Geometry {
    /// Outer size minus padding, never negative.
    pub fn content_box(&self) -> (f32, f32) {
        (
            (self.width - self.padding.horizontal()).max(0.0),
            (self.height - self.padding.vertical()).max(0.0),
        )
    }
}

/// Style of a native node in every form the engine needs.
#[derive(Debug, Clone)]
pub struct ResolvedStyle {
    /// Buffer the node was built from; compared on cache lookup.
    pub source: StyleBuffer,
    /// Direction inherited from the parent at build time.
    pub inherited: Direction,
    /// Effective direction of this node.
    pub direction: Direction,
    pub node: NodeStyle,
}

// =============================================================================
// LEAF SLOT
// =============================================================================

/// Bounded FIFO of recent measurements, keyed by box constraints.
#[derive(Debug, Clone)]
struct MeasureMemo {
    entries: VecDeque<(MeasureInput, MeasuredSize)>,
    capacity: usize,
}

impl MeasureMemo {
    fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(16)),
            capacity,
        }
    }

    fn get(&self, input: &MeasureInput) -> Option<MeasuredSize> {
        self.entries
            .iter()
            .find(|(key, _)| key.same_box(input))
            .map(|(_, size)| *size)
    }

    fn insert(&mut self, input: MeasureInput, size: MeasuredSize) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back((input, size));
    }
}

/// Measurement state of a content-driven leaf.
#[derive(Clone)]
pub struct LeafSlot {
    measure: MeasureFn,
    memo: MeasureMemo,
    last_box: Option<(f32, f32)>,
    delegate: Option<MeasuredSize>,
}

impl LeafSlot {
    pub(crate) fn new(measure: MeasureFn, memo_capacity: usize) -> Self {
        Self {
            measure,
            memo: MeasureMemo::new(memo_capacity),
            last_box: None,
            delegate: None,
        }
    }

    /// Measure through the memo. The flag is true when the function ran.
    pub(crate) fn measure(
        &mut self,
        input: &MeasureInput,
    ) -> Result<(MeasuredSize, bool), MeasureError> {
        if let Some(size) = self.memo.get(input) {
            return Ok((size, false));
        }
        let size = (self.measure)(input)?;
        self.memo.insert(*input, size);
        Ok((size, true))
    }

    /// Size reported by the last dispatch, if any.
    pub fn delegate(&self) -> Option<MeasuredSize> {
        self.delegate
    }

    /// Content box the delegate was measured with.
    pub fn last_box(&self) -> Option<(f32, f32)> {
        self.last_box
    }

    pub(crate) fn set_delegate(&mut self, size: MeasuredSize, content_box: (f32, f32)) {
        self.delegate = Some(size);
        self.last_box = Some(content_box);
    }
}

impl fmt::Debug for LeafSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafSlot")
            .field("memo", &self.memo.entries.len())
            .field("last_box", &self.last_box)
            .field("delegate", &self.delegate)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// NATIVE NODE
// =============================================================================

#[derive(Debug, Clone)]
pub struct NativeNode {
    key: NodeKey,
    flags: NodeFlags,
    style: Arc<ResolvedStyle>,
    parent: Option<NativeId>,
    children: Vec<NativeId>,
    geometry: Geometry,
    leaf: Option<LeafSlot>,
}

impl NativeNode {
    fn new(
        key: NodeKey,
        flags: NodeFlags,
        style: Arc<ResolvedStyle>,
        leaf: Option<LeafSlot>,
    ) -> Self {
        Self {
            key,
            flags,
            style,
            parent: None,
            children: Vec::new(),
            geometry: Geometry::default(),
            leaf,
        }
    }

    pub fn key(&self) -> NodeKey {
        self.key
    }

    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    pub fn is_leaf(&self) -> bool {
        self.flags.contains(NodeFlags::LEAF)
    }

    pub fn is_hidden(&self) -> bool {
        self.flags.contains(NodeFlags::HIDDEN)
    }

    pub fn style(&self) -> &ResolvedStyle {
        &self.style
    }

    pub fn parent(&self) -> Option<NativeId> {
        self.parent
    }

    pub fn children(&self) -> &[NativeId] {
        &self.children
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn leaf(&self) -> Option<&LeafSlot> {
        self.leaf.as_ref()
    }

    pub(crate) fn leaf_mut(&mut self) -> Option<&mut LeafSlot> {
        self.leaf.as_mut()
    }
}

// =============================================================================
// NATIVE TREE
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct NativeTree {
    nodes: Vec<NativeNode>,
}

impl NativeTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: NativeNode) -> NativeId {
        let id = NativeId::from_index(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub(crate) fn insert_container(&mut self, key: NodeKey, style: Arc<ResolvedStyle>) -> NativeId {
        self.push(NativeNode::new(key, NodeFlags::empty(), style, None))
    }

    pub(crate) fn insert_leaf(
        &mut self,
        key: NodeKey,
        style: Arc<ResolvedStyle>,
        slot: LeafSlot,
    ) -> NativeId {
        self.push(NativeNode::new(key, NodeFlags::LEAF, style, Some(slot)))
    }

    pub(crate) fn insert_hidden(&mut self, key: NodeKey, style: Arc<ResolvedStyle>) -> NativeId {
        self.push(NativeNode::new(key, NodeFlags::HIDDEN, style, None))
    }

    pub(crate) fn append_child(&mut self, parent: NativeId, child: NativeId) {
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }

    /// Node by id. Ids are only ever produced by this tree.
    pub fn node(&self, id: NativeId) -> &NativeNode {
        &self.nodes[id.index()]
    }

    pub fn get(&self, id: NativeId) -> Option<&NativeNode> {
        self.nodes.get(id.index())
    }

    pub(crate) fn node_mut(&mut self, id: NativeId) -> &mut NativeNode {
        &mut self.nodes[id.index()]
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [NativeNode] {
        &mut self.nodes
    }

    pub fn geometry(&self, id: NativeId) -> &Geometry {
        &self.nodes[id.index()].geometry
    }

    pub(crate) fn geometry_mut(&mut self, id: NativeId) -> &mut Geometry {
        &mut self.nodes[id.index()].geometry
    }

    /// Ids of a subtree in pre-order.
    pub fn subtree(&self, root: NativeId) -> Vec<NativeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            out.push(id);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Deep-copy a subtree of another tree into this one.
    ///
    /// The copy is detached: its root has no parent. Leaf slots keep their
    /// measurement function, memo and delegate.
    pub fn clone_subtree_from(
        &mut self,
        source: &NativeTree,
        root: NativeId,
    ) -> Result<NativeId, CacheConsistencyError> {
        let collected = source.collect(root)?;
        Ok(self.insert_collected(collected))
    }

    /// Deep-copy a subtree of this tree.
    pub fn clone_subtree(&mut self, root: NativeId) -> Result<NativeId, CacheConsistencyError> {
        let collected = self.collect(root)?;
        Ok(self.insert_collected(collected))
    }

    fn collect(
        &self,
        root: NativeId,
    ) -> Result<Vec<(NativeId, NativeNode)>, CacheConsistencyError> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = self
                .get(id)
                .ok_or(CacheConsistencyError::MissingNode(id))?;
            stack.extend(node.children.iter().rev());
            out.push((id, node.clone()));
        }
        Ok(out)
    }

    fn insert_collected(&mut self, collected: Vec<(NativeId, NativeNode)>) -> NativeId {
        let base = self.nodes.len();
        let remap: HashMap<NativeId, NativeId> = collected
            .iter()
            .enumerate()
            .map(|(i, (old, _))| (*old, NativeId::from_index(base + i)))
            .collect();

        for (i, (_, mut node)) in collected.into_iter().enumerate() {
            node.parent = if i == 0 {
                None
            } else {
                node.parent.and_then(|p| remap.get(&p).copied())
            };
            for child in &mut node.children {
                // collect() visited every child, so the lookup cannot miss
                if let Some(&new) = remap.get(child) {
                    *child = new;
                }
            }
            node.flags |= NodeFlags::CLONED;
            self.nodes.push(node);
        }
        NativeId::from_index(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::node::measure_fn;

    fn style() -> Arc<ResolvedStyle> {
        let node = NodeStyle::default();
        Arc::new(ResolvedStyle {
            source: StyleBuffer::new(),
            inherited: Direction::Ltr,
            direction: Direction::Ltr,
            node,
        })
    }

    fn leaf_slot() -> LeafSlot {
        LeafSlot::new(measure_fn(|_| Ok(MeasuredSize::new(3.0, 1.0))), 4)
    }

    fn sample(tree: &mut NativeTree) -> NativeId {
        let root = tree.insert_container(NodeKey(1), style());
        let a = tree.insert_container(NodeKey(2), style());
        let b = tree.insert_leaf(NodeKey(3), style(), leaf_slot());
        let c = tree.insert_leaf(NodeKey(4), style(), leaf_slot());
        tree.append_child(root, a);
        tree.append_child(a, b);
        tree.append_child(root, c);
        root
    }

    #[test]
    fn test_subtree_is_preorder() {
        let mut tree = NativeTree::new();
        let root = sample(&mut tree);
        let keys: Vec<u64> = tree
            .subtree(root)
            .into_iter()
            .map(|id| tree.node(id).key().0)
            .collect();
        assert_eq!(keys, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_clone_from_other_tree() {
        let mut source = NativeTree::new();
        let root = sample(&mut source);
        source.geometry_mut(root).width = 80.0;

        let mut target = NativeTree::new();
        let copy = target.clone_subtree_from(&source, root).unwrap();

        assert_eq!(target.len(), 4);
        assert!(target.node(copy).parent().is_none());
        assert!(target.node(copy).flags().contains(NodeFlags::CLONED));
        let keys: Vec<u64> = target
            .subtree(copy)
            .into_iter()
            .map(|id| target.node(id).key().0)
            .collect();
        assert_eq!(keys, vec![1, 2, 3, 4]);
        assert_eq!(target.geometry(copy).width, 80.0);
    }

    #[test]
    fn test_clone_geometry_is_independent() {
        let mut tree = NativeTree::new();
        let root = sample(&mut tree);
        let copy = tree.clone_subtree(root).unwrap();

        tree.geometry_mut(copy).x = 42.0;
        assert_eq!(tree.geometry(root).x, 0.0);
        assert_eq!(tree.geometry(copy).x, 42.0);

        let original_child = tree.node(root).children()[0];
        let copied_child = tree.node(copy).children()[0];
        assert_ne!(original_child, copied_child);
        assert_eq!(tree.node(copied_child).parent(), Some(copy));
    }

    #[test]
    fn test_clone_missing_root() {
        let mut tree = NativeTree::new();
        let missing = NativeId::from_index(7);
        assert_eq!(
            tree.clone_subtree(missing),
            Err(CacheConsistencyError::MissingNode(missing))
        );
    }

    #[test]
    fn test_leaf_memo_is_fifo() {
        let mut slot = LeafSlot::new(measure_fn(|i| Ok(MeasuredSize::new(i.max_width, 1.0))), 2);
        for w in [1.0, 2.0, 3.0] {
            let (_, fresh) = slot.measure(&MeasureInput::exact(w, 1.0)).unwrap();
            assert!(fresh);
        }
        // 1.0 was evicted, 3.0 is still remembered
        assert!(slot.measure(&MeasureInput::exact(1.0, 1.0)).unwrap().1);
        assert!(!slot.measure(&MeasureInput::exact(3.0, 1.0)).unwrap().1);
    }

    #[test]
    fn test_memo_ignores_owner() {
        let mut slot = leaf_slot();
        let mut input = MeasureInput::exact(5.0, 5.0);
        slot.measure(&input).unwrap();
        input.owner_width = Some(100.0);
        assert!(!slot.measure(&input).unwrap().1);
    }
}
