//! Tree builder - turns the abstract tree into a native tree.
//!
//! For each abstract node:
//!
//! 1. A container whose key, style and inherited direction match an entry
//!    registered earlier in this pass, or committed by the last pass, is
//!    copied instead of built.
//! 2. Otherwise the style is decoded and adapted, and a native node created.
//! 3. Self-measuring nodes become leaves and are queued for dispatch.
//! 4. Containers recurse into their children and register themselves.
//! 5. `display: none` nodes are built but never attached.
//!
//! A copy that fails falls back to a full rebuild of that subtree.

use std::sync::Arc;

use tracing::{trace, warn};

use crate::config::LayoutConfig;
use crate::engine::native::{LeafSlot, NativeId, NativeNode, NativeTree, ResolvedStyle};
use crate::error::{CacheConsistencyError, ConfigurationError, LayoutError};
use crate::layout::cache::{CacheKey, LayoutCache, Registrations};
use crate::layout::node::{LayoutNode, NodeKind};
use crate::layout::pass::PassStats;
use crate::style::NodeStyle;
use crate::types::Direction;

/// Result of building one abstract node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Built {
    Attached(NativeId),
    Hidden(NativeId),
}

impl Built {
    pub(crate) fn id(self) -> NativeId {
        match self {
            Self::Attached(id) | Self::Hidden(id) => id,
        }
    }
}

/// Output of a finished build.
pub(crate) struct BuildOutput {
    pub tree: NativeTree,
    pub root: NativeId,
    pub registrations: Registrations,
    pub pending_leaves: Vec<NativeId>,
    pub stats: PassStats,
}

pub(crate) struct TreeBuilder<'a> {
    cache: &'a LayoutCache,
    config: &'a LayoutConfig,
    tree: NativeTree,
    registrations: Registrations,
    pending_leaves: Vec<NativeId>,
    stats: PassStats,
}

impl<'a> TreeBuilder<'a> {
    pub(crate) fn new(cache: &'a LayoutCache, config: &'a LayoutConfig) -> Self {
        Self {
            cache,
            config,
            tree: NativeTree::new(),
            registrations: Registrations::new(),
            pending_leaves: Vec::new(),
            stats: PassStats::default(),
        }
    }

    /// Build the whole tree below `root`, which inherits `inherited`.
    pub(crate) fn build<N: LayoutNode>(
        mut self,
        root: &N,
        inherited: Direction,
    ) -> Result<BuildOutput, LayoutError> {
        let built = self.build_node(root, inherited, true)?;
        self.stats.leaves = self.pending_leaves.len();
        Ok(BuildOutput {
            tree: self.tree,
            root: built.id(),
            registrations: self.registrations,
            pending_leaves: self.pending_leaves,
            stats: self.stats,
        })
    }

    fn build_node<N: LayoutNode>(
        &mut self,
        node: &N,
        inherited: Direction,
        use_cache: bool,
    ) -> Result<Built, LayoutError> {
        let key = node.key();
        let self_measuring = node.can_self_measure();

        if use_cache && !self_measuring {
            match self.reuse(node, inherited) {
                Ok(Some(id)) => return Ok(Built::Attached(id)),
                Ok(None) => {}
                Err(err) => {
                    warn!(node = %key, error = %err, "cached subtree unusable, rebuilding");
                    self.stats.clone_fallbacks += 1;
                    return self.build_node(node, inherited, false);
                }
            }
        }

        self.stats.nodes_built += 1;
        let decoded = NodeStyle::decode(node.style())?;
        let direction = decoded.direction.resolve(inherited);
        let hidden = decoded.is_hidden();
        let style = Arc::new(ResolvedStyle {
            source: node.style().clone(),
            inherited,
            direction,
            node: decoded,
        });

        if hidden {
            trace!(node = %key, "display none");
            return Ok(Built::Hidden(self.tree.insert_hidden(key, style)));
        }

        if self_measuring {
            let measure = node
                .measure_fn()
                .ok_or(ConfigurationError::MissingMeasureFunction(key))?;
            let slot = LeafSlot::new(measure, self.config.measure_memo_capacity);
            let id = self.tree.insert_leaf(key, style, slot);
            self.pending_leaves.push(id);
            self.registrations.insert(CacheKey::new(key, NodeKind::Leaf), id);
            return Ok(Built::Attached(id));
        }

        let id = self.tree.insert_container(key, style);
        for child in node.children() {
            if let Built::Attached(child_id) = self.build_node(child, direction, use_cache)? {
                self.tree.append_child(id, child_id);
            }
        }
        self.registrations.insert(CacheKey::container(key), id);
        Ok(Built::Attached(id))
    }

    /// Copy a matching container subtree, if one is registered.
    fn reuse<N: LayoutNode>(
        &mut self,
        node: &N,
        inherited: Direction,
    ) -> Result<Option<NativeId>, CacheConsistencyError> {
        let cache_key = CacheKey::new(node.key(), NodeKind::of(node));

        if let Some(&source) = self.registrations.get(&cache_key) {
            if entry_matches(&self.tree, source, node, inherited) {
                if !self.config.native_clone {
                    return Err(CacheConsistencyError::CloneUnsupported);
                }
                let copy = self.tree.clone_subtree(source)?;
                self.stats.cache_hits += 1;
                reattach(
                    &self.tree,
                    copy,
                    &mut self.registrations,
                    &mut self.pending_leaves,
                    &mut self.stats,
                );
                trace!(node = %node.key(), "reused subtree from this pass");
                return Ok(Some(copy));
            }
        }

        let cache = self.cache;
        if let Some((committed, source)) = cache.lookup(cache_key) {
            if entry_matches(committed, source, node, inherited) {
                if !self.config.native_clone {
                    return Err(CacheConsistencyError::CloneUnsupported);
                }
                let copy = self.tree.clone_subtree_from(committed, source)?;
                self.stats.cache_hits += 1;
                reattach(
                    &self.tree,
                    copy,
                    &mut self.registrations,
                    &mut self.pending_leaves,
                    &mut self.stats,
                );
                trace!(node = %node.key(), "reused committed subtree");
                return Ok(Some(copy));
            }
        }

        self.stats.cache_misses += 1;
        Ok(None)
    }
}

/// Whether a registered native container still describes `node`.
fn entry_matches<N: LayoutNode>(
    tree: &NativeTree,
    id: NativeId,
    node: &N,
    inherited: Direction,
) -> bool {
    let kind = NodeKind::of(node);
    tree.get(id).is_some_and(|native| {
        kind == NodeKind::Container
            && native_kind(native) == kind
            && native.key() == node.key()
            && native.style().inherited == inherited
            && native.style().source == *node.style()
    })
}

fn native_kind(native: &NativeNode) -> NodeKind {
    if native.is_leaf() { NodeKind::Leaf } else { NodeKind::Container }
}

/// Register every node of a copied subtree and queue its leaves.
fn reattach(
    tree: &NativeTree,
    root: NativeId,
    registrations: &mut Registrations,
    pending_leaves: &mut Vec<NativeId>,
    stats: &mut PassStats,
) {
    for id in tree.subtree(root) {
        let node = tree.node(id);
        stats.nodes_cloned += 1;
        if node.is_leaf() {
            pending_leaves.push(id);
        }
        registrations.insert(CacheKey::new(node.key(), native_kind(node)), id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::node::{MeasuredSize, NodeKey, ViewNode, measure_fn};
    use crate::style::StyleAttr;
    use crate::types::Display;

    fn leaf(key: u64) -> ViewNode {
        ViewNode::new(key).measured(measure_fn(|_| Ok(MeasuredSize::new(4.0, 2.0))))
    }

    #[test]
    fn test_builds_containers_and_leaves() {
        let cache = LayoutCache::new();
        let config = LayoutConfig::default();
        let root = ViewNode::new(1).child(leaf(2)).child(ViewNode::new(3).child(leaf(4)));

        let out = TreeBuilder::new(&cache, &config).build(&root, Direction::Ltr).unwrap();
        assert_eq!(out.tree.len(), 4);
        assert_eq!(out.pending_leaves.len(), 2);
        assert_eq!(out.registrations.len(), 4);
        assert!(out.registrations.contains_key(&CacheKey::new(NodeKey(2), NodeKind::Leaf)));
        assert!(!out.registrations.contains_key(&CacheKey::container(NodeKey(2))));
        assert_eq!(out.stats.nodes_built, 4);
        assert_eq!(out.tree.node(out.root).children().len(), 2);
    }

    #[test]
    fn test_hidden_child_is_not_attached() {
        let cache = LayoutCache::new();
        let config = LayoutConfig::default();
        let root = ViewNode::new(1)
            .child(ViewNode::new(2).with_style(StyleAttr::Display(Display::None)))
            .child(ViewNode::new(3));

        let out = TreeBuilder::new(&cache, &config).build(&root, Direction::Ltr).unwrap();
        assert_eq!(out.tree.len(), 3);
        let children = out.tree.node(out.root).children();
        assert_eq!(children.len(), 1);
        assert_eq!(out.tree.node(children[0]).key(), NodeKey(3));
    }

    #[test]
    fn test_repeated_key_in_one_pass_is_cloned() {
        let cache = LayoutCache::new();
        let config = LayoutConfig::default();
        let shared = ViewNode::new(7).child(leaf(8));
        let root = ViewNode::new(1).child(shared.clone()).child(shared);

        let out = TreeBuilder::new(&cache, &config).build(&root, Direction::Ltr).unwrap();
        assert_eq!(out.stats.cache_hits, 1);
        assert_eq!(out.stats.nodes_cloned, 2);
        assert_eq!(out.pending_leaves.len(), 2);

        let children = out.tree.node(out.root).children();
        assert_ne!(children[0], children[1]);
        assert_eq!(out.tree.node(children[1]).parent(), Some(out.root));
    }

    #[test]
    fn test_clone_disabled_falls_back_to_rebuild() {
        let cache = LayoutCache::new();
        let config = LayoutConfig::default().with_native_clone(false);
        let shared = ViewNode::new(7).child(leaf(8));
        let root = ViewNode::new(1).child(shared.clone()).child(shared);

        let out = TreeBuilder::new(&cache, &config).build(&root, Direction::Ltr).unwrap();
        assert_eq!(out.stats.clone_fallbacks, 1);
        assert_eq!(out.stats.cache_hits, 0);
        assert_eq!(out.tree.len(), 5);
    }

    #[test]
    fn test_direction_change_invalidates_match() {
        let cache = LayoutCache::new();
        let config = LayoutConfig::default();
        let shared = ViewNode::new(7);
        let root = ViewNode::new(1)
            .child(shared.clone())
            .child(ViewNode::new(2).with_style(StyleAttr::Direction(Direction::Rtl)).child(shared));

        let out = TreeBuilder::new(&cache, &config).build(&root, Direction::Ltr).unwrap();
        assert_eq!(out.stats.cache_hits, 0);
    }

    #[test]
    fn test_invalid_style_is_fatal() {
        let cache = LayoutCache::new();
        let config = LayoutConfig::default();
        let root = ViewNode::new(1).with_buffer(crate::style::StyleBuffer::from_raw(vec![500.0]));

        let err = TreeBuilder::new(&cache, &config).build(&root, Direction::Ltr).err();
        assert_eq!(
            err,
            Some(LayoutError::Configuration(ConfigurationError::UnknownTag(500.0)))
        );
    }
}
