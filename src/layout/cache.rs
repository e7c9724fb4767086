//! Layout cache - container subtrees committed by the last pass.
//!
//! Entries point into one frozen native tree, keyed by node identity and
//! kind. Only container entries are ever copied; leaf entries record that a
//! key was a leaf so a later container lookup cannot mistake it for one.
//!
//! A pass only reads the cache. The whole cache is replaced when a pass
//! commits, so a failed pass never leaves half of its registrations behind.

use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::native::{NativeId, NativeTree};
use crate::layout::node::{NodeKey, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    pub key: NodeKey,
    pub kind: NodeKind,
}

impl CacheKey {
    pub(crate) fn new(key: NodeKey, kind: NodeKind) -> Self {
        Self { key, kind }
    }

    pub(crate) fn container(key: NodeKey) -> Self {
        Self::new(key, NodeKind::Container)
    }
}

/// Registrations made while building one pass.
pub(crate) type Registrations = HashMap<CacheKey, NativeId>;

#[derive(Debug, Default)]
pub struct LayoutCache {
    tree: Option<Arc<NativeTree>>,
    entries: Registrations,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed entries of either kind.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: NodeKey, kind: NodeKind) -> bool {
        self.entries.contains_key(&CacheKey::new(key, kind))
    }

    pub(crate) fn lookup(&self, key: CacheKey) -> Option<(&NativeTree, NativeId)> {
        let id = *self.entries.get(&key)?;
        let tree = self.tree.as_deref()?;
        Some((tree, id))
    }

    /// Swap in the registrations of a committed pass.
    pub(crate) fn replace(&mut self, tree: Arc<NativeTree>, entries: Registrations) {
        self.tree = Some(tree);
        self.entries = entries;
    }

    pub fn clear(&mut self) {
        self.tree = None;
        self.entries.clear();
    }
}
