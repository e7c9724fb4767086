//! Layout pass orchestration.
//!
//! ```text
//! begin_pass(root)  build native tree (cache reuse, leaves queued)
//!      │
//!      ▼
//! solve(w, h)       root sizing → flex solve → measurement dispatch
//!      │            (repeatable; a failure poisons the pass)
//!      ▼
//! finish()          commit: cache + committed result replaced together
//! ```
//!
//! Nothing a pass does is visible through its [`LayoutContext`] until
//! `finish` succeeds.

use std::sync::Arc;

use tracing::{debug, debug_span};

use crate::config::LayoutConfig;
use crate::engine::native::{NativeId, NativeTree};
use crate::engine::solver;
use crate::error::{ConfigurationError, LayoutError};
use crate::layout::builder::{BuildOutput, TreeBuilder};
use crate::layout::cache::{LayoutCache, Registrations};
use crate::layout::measure;
use crate::layout::node::{LayoutNode, NodeKey};
use crate::layout::result::LayoutResult;
use crate::layout::root::{RootSizing, SizeSpec, ambient_root_direction};

/// Counters collected over one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    pub nodes_built: usize,
    pub nodes_cloned: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub clone_fallbacks: usize,
    pub leaves: usize,
    pub solves: usize,
    pub measure_invocations: usize,
    pub measure_memo_hits: usize,
    pub measure_skips: usize,
}

/// Long-lived layout state of one host view.
///
/// Holds the cache and the last committed result. Contexts are independent;
/// separate contexts may run passes on separate threads.
#[derive(Debug, Default)]
pub struct LayoutContext {
    config: LayoutConfig,
    cache: LayoutCache,
    committed: Option<LayoutResult>,
    last_stats: Option<PassStats>,
}

impl LayoutContext {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Build, solve once and commit.
    pub fn calculate<N: LayoutNode>(
        &mut self,
        root: &N,
        width: SizeSpec,
        height: SizeSpec,
    ) -> Result<LayoutResult, LayoutError> {
        let mut pass = self.begin_pass(root)?;
        pass.solve(width, height)?;
        pass.finish()
    }

    /// Build the native tree for `root` and open a pass over it.
    pub fn begin_pass<N: LayoutNode>(&mut self, root: &N) -> Result<LayoutPass<'_>, LayoutError> {
        let key = root.key();
        let _span = debug_span!("layout_pass", root = %key).entered();

        let inherited = ambient_root_direction(self.config.ambient_direction);
        let BuildOutput {
            tree,
            root,
            registrations,
            pending_leaves,
            stats,
        } = TreeBuilder::new(&self.cache, &self.config).build(root, inherited)?;

        debug!(
            nodes = tree.len(),
            built = stats.nodes_built,
            cloned = stats.nodes_cloned,
            "native tree built"
        );
        Ok(LayoutPass {
            context: self,
            key,
            tree,
            root,
            registrations,
            pending_leaves,
            stats,
            solved: None,
            poisoned: false,
        })
    }

    /// Result of the last committed pass.
    pub fn committed(&self) -> Option<&LayoutResult> {
        self.committed.as_ref()
    }

    pub fn last_stats(&self) -> Option<PassStats> {
        self.last_stats
    }

    pub fn cache(&self) -> &LayoutCache {
        &self.cache
    }

    /// Drop the cache and the committed result.
    pub fn teardown(&mut self) {
        self.cache.clear();
        self.committed = None;
        self.last_stats = None;
        debug!("layout context torn down");
    }
}

/// One in-flight layout pass.
pub struct LayoutPass<'a> {
    context: &'a mut LayoutContext,
    key: NodeKey,
    tree: NativeTree,
    root: NativeId,
    registrations: Registrations,
    pending_leaves: Vec<NativeId>,
    stats: PassStats,
    solved: Option<(SizeSpec, SizeSpec)>,
    poisoned: bool,
}

impl LayoutPass<'_> {
    /// Solve under new root constraints. May be called repeatedly.
    pub fn solve(&mut self, width: SizeSpec, height: SizeSpec) -> Result<(), LayoutError> {
        if self.poisoned {
            return Err(LayoutError::Aborted);
        }
        let _span = debug_span!("solve", root = %self.key, %width, %height).entered();
        let result = self.run_solve(width, height);
        if let Err(err) = &result {
            debug!(error = %err, "solve failed, pass aborted");
            self.poisoned = true;
        }
        result
    }

    fn run_solve(&mut self, width: SizeSpec, height: SizeSpec) -> Result<(), LayoutError> {
        let sizing = RootSizing::resolve(
            width,
            height,
            &self.tree.node(self.root).style().node,
            self.context.config.percent_at_root,
        );
        let invoked = solver::solve(&mut self.tree, self.root, &sizing)?;
        self.stats.solves += 1;
        self.stats.measure_invocations += invoked;

        measure::dispatch(&mut self.tree, &self.pending_leaves, &mut self.stats)?;
        self.solved = Some((width, height));
        Ok(())
    }

    pub fn stats(&self) -> &PassStats {
        &self.stats
    }

    /// Commit the pass. Replaces the context's cache and committed result.
    pub fn finish(self) -> Result<LayoutResult, LayoutError> {
        if self.poisoned {
            return Err(LayoutError::Aborted);
        }
        let Some((width, height)) = self.solved else {
            return Err(ConfigurationError::NotSolved.into());
        };

        let tree = Arc::new(self.tree);
        let result = LayoutResult::root(Arc::clone(&tree), self.root, width, height);
        self.context.cache.replace(tree, self.registrations);
        self.context.committed = Some(result.clone());
        self.context.last_stats = Some(self.stats);

        let stats = self.stats;
        debug!(
            root = %self.key,
            built = stats.nodes_built,
            cloned = stats.nodes_cloned,
            cache_hits = stats.cache_hits,
            cache_misses = stats.cache_misses,
            clone_fallbacks = stats.clone_fallbacks,
            leaves = stats.leaves,
            solves = stats.solves,
            measured = stats.measure_invocations,
            memo_hits = stats.measure_memo_hits,
            skipped = stats.measure_skips,
            "layout pass committed"
        );
        Ok(result)
    }
}
