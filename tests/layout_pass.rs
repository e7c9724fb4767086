//! End-to-end layout passes over `ViewNode` trees.
//!
//! Run with: cargo test --test layout_pass -- --nocapture

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use spark_layout::layout::text_measure_fn;
use spark_layout::types::{AlignItems, Dimension, Direction, Display, Edge, FlexDirection, Length};
use spark_layout::{
    ConfigurationError, LayoutConfig, LayoutContext, LayoutError, LayoutNode, LayoutResult,
    MeasureError, MeasuredSize, MeasureFn, NodeKey, NodeKind, SizeMode, SizeSpec, StyleAttr,
    StyleBuffer, ViewNode, measure_fn,
};

// =============================================================================
// HELPERS
// =============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Fixed-size measurement that counts its invocations.
fn counted(width: f32, height: f32) -> (MeasureFn, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let measure = measure_fn(move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
        Ok(MeasuredSize::new(width, height))
    });
    (measure, calls)
}

fn row(key: u64) -> ViewNode {
    ViewNode::new(key).with_style(StyleAttr::FlexDirection(FlexDirection::Row))
}

fn sized(key: u64, width: f32) -> ViewNode {
    ViewNode::new(key).with_style(StyleAttr::Width(Dimension::Points(width)))
}

// =============================================================================
// ROOT SIZING
// =============================================================================

#[test]
fn test_exact_root_size() {
    init_tracing();
    let mut ctx = LayoutContext::default();
    let tree = ViewNode::new(1);
    let layout = ctx
        .calculate(&tree, SizeSpec::exact(120.0), SizeSpec::exact(40.0))
        .unwrap();
    assert_eq!(layout.width(), 120);
    assert_eq!(layout.height(), 40);
    assert_eq!(layout.width_spec().mode, SizeMode::Exact);
    assert!(layout.is_root());
}

#[test]
fn test_at_most_root_shrinks_to_content() {
    init_tracing();
    let (measure, _) = counted(40.0, 10.0);
    let tree = row(1).child(ViewNode::new(2).measured(measure));

    let mut ctx = LayoutContext::default();
    let layout = ctx
        .calculate(&tree, SizeSpec::at_most(100.0), SizeSpec::at_most(100.0))
        .unwrap();
    assert_eq!(layout.width(), 40);
    assert_eq!(layout.width_spec(), SizeSpec::at_most(100.0));
}

#[test]
fn test_unspecified_root_uses_content_width() {
    init_tracing();
    let tree = row(1).child(sized(2, 20.0)).child(sized(3, 15.0));
    let mut ctx = LayoutContext::default();
    let layout = ctx
        .calculate(&tree, SizeSpec::unspecified(), SizeSpec::exact(10.0))
        .unwrap();
    assert_eq!(layout.width(), 35);
    assert_eq!(layout.width_spec().mode, SizeMode::Unspecified);
}

#[test]
fn test_percent_root_under_at_most() {
    init_tracing();
    let tree = ViewNode::new(1).with_style(StyleAttr::Width(Dimension::Percent(50.0)));
    let mut ctx = LayoutContext::new(LayoutConfig::default().with_percent_at_root(true));
    let layout = ctx
        .calculate(&tree, SizeSpec::at_most(200.0), SizeSpec::exact(10.0))
        .unwrap();
    assert_eq!(layout.width(), 100);
}

// =============================================================================
// GEOMETRY
// =============================================================================

#[test]
fn test_row_positions_and_child_access() {
    init_tracing();
    let tree = row(1).child(sized(2, 20.0)).child(sized(3, 30.0));
    let mut ctx = LayoutContext::default();
    let layout = ctx
        .calculate(&tree, SizeSpec::exact(100.0), SizeSpec::exact(10.0))
        .unwrap();

    assert_eq!(layout.child_count(), 2);
    assert_eq!(layout.x_for_child_at(0), Some(0));
    assert_eq!(layout.x_for_child_at(1), Some(20));
    assert_eq!(layout.y_for_child_at(1), Some(0));
    assert_eq!(layout.x_for_child_at(2), None);
    assert!(layout.child_at(2).is_none());

    let second = layout.child_at(1).unwrap();
    assert_eq!(second.key(), NodeKey(3));
    assert_eq!(second.width(), 30);
    assert_eq!(second.height(), 10);
    assert_eq!(second.width_spec(), SizeSpec::exact(30.0));
    assert!(!second.is_root());
}

#[test]
fn test_hidden_child_is_skipped() {
    init_tracing();
    let tree = row(1)
        .child(sized(2, 20.0))
        .child(sized(3, 30.0).with_style(StyleAttr::Display(Display::None)))
        .child(sized(4, 10.0));
    let mut ctx = LayoutContext::default();
    let layout = ctx
        .calculate(&tree, SizeSpec::exact(100.0), SizeSpec::exact(10.0))
        .unwrap();

    assert_eq!(layout.child_count(), 2);
    assert_eq!(layout.child_at(1).unwrap().key(), NodeKey(4));
    assert_eq!(layout.x_for_child_at(1), Some(20));
}

#[test]
fn test_hidden_root_is_empty() {
    init_tracing();
    let tree = row(1)
        .with_style(StyleAttr::Display(Display::None))
        .child(sized(2, 20.0));
    let mut ctx = LayoutContext::default();
    let layout = ctx
        .calculate(&tree, SizeSpec::exact(100.0), SizeSpec::exact(100.0))
        .unwrap();

    assert!(layout.is_hidden());
    assert_eq!(layout.width(), 0);
    assert_eq!(layout.height(), 0);
    assert_eq!(layout.child_count(), 0);
}

#[test]
fn test_rtl_ambient_mirrors_row() {
    init_tracing();
    let tree = row(1).child(sized(2, 20.0)).child(sized(3, 30.0));
    let mut ctx =
        LayoutContext::new(LayoutConfig::default().with_ambient_direction(Direction::Rtl));
    let layout = ctx
        .calculate(&tree, SizeSpec::exact(100.0), SizeSpec::exact(10.0))
        .unwrap();

    assert_eq!(layout.x_for_child_at(0), Some(80));
    assert_eq!(layout.x_for_child_at(1), Some(50));
}

#[test]
fn test_explicit_ltr_root_ignores_rtl_ambient() {
    init_tracing();
    let tree = row(1)
        .with_style(StyleAttr::Direction(Direction::Ltr))
        .child(sized(2, 20.0));
    let mut ctx =
        LayoutContext::new(LayoutConfig::default().with_ambient_direction(Direction::Rtl));
    let layout = ctx
        .calculate(&tree, SizeSpec::exact(100.0), SizeSpec::exact(10.0))
        .unwrap();
    assert_eq!(layout.x_for_child_at(0), Some(0));
}

#[test]
fn test_leaf_reports_delegate_plus_padding() {
    init_tracing();
    let (measure, _) = counted(10.0, 4.0);
    let tree = row(1)
        .with_style(StyleAttr::AlignItems(AlignItems::FlexStart))
        .child(
            ViewNode::new(2)
                .with_style(StyleAttr::Padding(Edge::All, Length::Points(2.0)))
                .measured(measure),
        );
    let mut ctx = LayoutContext::default();
    let layout = ctx
        .calculate(&tree, SizeSpec::exact(100.0), SizeSpec::exact(50.0))
        .unwrap();

    let leaf = layout.child_at(0).unwrap();
    assert!(leaf.is_leaf());
    assert_eq!(leaf.delegate(), Some(MeasuredSize::new(10.0, 4.0)));
    assert_eq!(leaf.width(), 14);
    assert_eq!(leaf.height(), 8);
    assert_eq!(leaf.padding_left(), 2);
    assert_eq!(leaf.padding_bottom(), 2);
}

#[test]
fn test_text_leaf() {
    init_tracing();
    let tree = row(1).child(ViewNode::new(2).measured(text_measure_fn("hello")));
    let mut ctx = LayoutContext::default();
    let layout = ctx
        .calculate(&tree, SizeSpec::exact(80.0), SizeSpec::exact(24.0))
        .unwrap();
    let text = layout.child_at(0).unwrap();
    assert_eq!(text.width(), 5);
    assert_eq!(text.height(), 1);
}

#[test]
fn test_dump_lists_subtree() {
    init_tracing();
    let tree = row(1).child(sized(2, 20.0));
    let mut ctx = LayoutContext::default();
    let layout = ctx
        .calculate(&tree, SizeSpec::exact(100.0), SizeSpec::exact(10.0))
        .unwrap();
    let dump = layout.dump();
    let lines: Vec<&str> = dump.lines().collect();
    assert_eq!(lines, vec!["#1 100x10 @(0,0)", "  #2 20x10 @(0,0)"]);
}

// =============================================================================
// CACHING AND MEASUREMENT
// =============================================================================

#[test]
fn test_second_pass_reuses_tree_without_measuring() {
    init_tracing();
    let (measure, calls) = counted(40.0, 10.0);
    let tree = row(1).child(ViewNode::new(2).measured(measure));
    let mut ctx = LayoutContext::default();

    let first = ctx
        .calculate(&tree, SizeSpec::exact(100.0), SizeSpec::exact(20.0))
        .unwrap();
    let after_first = calls.load(Ordering::SeqCst);
    assert!(after_first >= 1);

    let second = ctx
        .calculate(&tree, SizeSpec::exact(100.0), SizeSpec::exact(20.0))
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), after_first);
    assert_eq!(second.child_at(0).unwrap().width(), first.child_at(0).unwrap().width());

    let stats = ctx.last_stats().unwrap();
    assert_eq!(stats.nodes_built, 0);
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(stats.measure_invocations, 0);
    assert_eq!(stats.measure_skips, 1);
}

#[test]
fn test_unchanged_subtree_reused_under_new_parent() {
    init_tracing();
    let (measure, _) = counted(5.0, 5.0);
    let shared = ViewNode::new(2).child(ViewNode::new(3).measured(measure));
    let (other, _) = counted(7.0, 7.0);

    let mut ctx = LayoutContext::default();
    let first = row(1).child(shared.clone()).child(ViewNode::new(4).measured(other.clone()));
    ctx.calculate(&first, SizeSpec::exact(100.0), SizeSpec::exact(20.0))
        .unwrap();

    let second = row(10).child(shared).child(ViewNode::new(4).measured(other));
    ctx.calculate(&second, SizeSpec::exact(100.0), SizeSpec::exact(20.0))
        .unwrap();

    let stats = ctx.last_stats().unwrap();
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(stats.nodes_cloned, 2);
    assert_eq!(stats.nodes_built, 2);
    assert_eq!(stats.leaves, 2);
}

#[test]
fn test_style_change_invalidates_reuse() {
    init_tracing();
    let mut ctx = LayoutContext::default();
    let tree = row(1).child(sized(2, 20.0));
    ctx.calculate(&tree, SizeSpec::exact(100.0), SizeSpec::exact(10.0))
        .unwrap();

    let restyled = row(1)
        .with_style(StyleAttr::Padding(Edge::Left, Length::Points(5.0)))
        .child(sized(2, 20.0));
    let layout = ctx
        .calculate(&restyled, SizeSpec::exact(100.0), SizeSpec::exact(10.0))
        .unwrap();

    // the root is rebuilt, its unchanged child is copied
    let stats = ctx.last_stats().unwrap();
    assert_eq!(stats.nodes_built, 1);
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(layout.x_for_child_at(0), Some(5));
}

#[test]
fn test_remeasure_only_when_box_changes() {
    init_tracing();
    let (measure, calls) = counted(10.0, 10.0);
    let tree = row(1).child(
        ViewNode::new(2)
            .with_style(StyleAttr::FlexGrow(1.0))
            .measured(measure),
    );
    let mut ctx = LayoutContext::default();
    let mut pass = ctx.begin_pass(&tree).unwrap();

    pass.solve(SizeSpec::exact(100.0), SizeSpec::exact(10.0)).unwrap();
    let wide = calls.load(Ordering::SeqCst);

    pass.solve(SizeSpec::exact(50.0), SizeSpec::exact(10.0)).unwrap();
    let narrow = calls.load(Ordering::SeqCst);
    assert!(narrow > wide);

    pass.solve(SizeSpec::exact(50.0), SizeSpec::exact(10.0)).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), narrow);
    assert_eq!(pass.stats().solves, 3);

    let layout = pass.finish().unwrap();
    assert_eq!(layout.width(), 50);
    assert_eq!(layout.width_spec(), SizeSpec::exact(50.0));
}

#[test]
fn test_clone_disabled_still_lays_out() {
    init_tracing();
    let shared = row(2).child(sized(3, 10.0));
    let tree = row(1).child(shared.clone()).child(shared);
    let mut ctx = LayoutContext::new(LayoutConfig::default().with_native_clone(false));
    let layout = ctx
        .calculate(&tree, SizeSpec::exact(100.0), SizeSpec::exact(10.0))
        .unwrap();

    assert_eq!(layout.child_count(), 2);
    assert_eq!(ctx.last_stats().unwrap().clone_fallbacks, 1);
}

#[test]
fn test_key_switching_between_leaf_and_container() {
    init_tracing();
    let mut ctx = LayoutContext::default();
    let as_container = |root: u64| row(root).child(row(2).child(sized(3, 10.0)));

    ctx.calculate(&as_container(10), SizeSpec::exact(100.0), SizeSpec::exact(10.0))
        .unwrap();
    assert!(ctx.cache().contains(NodeKey(2), NodeKind::Container));

    let (measure, calls) = counted(7.0, 7.0);
    let as_leaf = row(11).child(ViewNode::new(2).measured(measure));
    let layout = ctx
        .calculate(&as_leaf, SizeSpec::exact(100.0), SizeSpec::exact(10.0))
        .unwrap();
    let leaf = layout.child_at(0).unwrap();
    assert!(leaf.is_leaf());
    assert_eq!(leaf.child_count(), 0);
    assert_eq!(leaf.width(), 7);
    assert!(calls.load(Ordering::SeqCst) > 0);
    assert_eq!(ctx.last_stats().unwrap().cache_hits, 0);
    assert!(ctx.cache().contains(NodeKey(2), NodeKind::Leaf));
    assert!(!ctx.cache().contains(NodeKey(2), NodeKind::Container));

    let layout = ctx
        .calculate(&as_container(12), SizeSpec::exact(100.0), SizeSpec::exact(10.0))
        .unwrap();
    let container = layout.child_at(0).unwrap();
    assert!(!container.is_leaf());
    assert_eq!(container.child_count(), 1);
    assert_eq!(ctx.last_stats().unwrap().cache_hits, 0);
}

// =============================================================================
// FAILURES AND LIFECYCLE
// =============================================================================

#[test]
fn test_failed_pass_publishes_nothing() {
    init_tracing();
    let mut ctx = LayoutContext::default();
    let good = row(1).child(sized(2, 20.0));
    ctx.calculate(&good, SizeSpec::exact(100.0), SizeSpec::exact(10.0))
        .unwrap();

    let failing = row(5).child(
        ViewNode::new(6).measured(measure_fn(|_| Err(MeasureError::new("font missing")))),
    );
    let err = ctx
        .calculate(&failing, SizeSpec::exact(100.0), SizeSpec::exact(10.0))
        .unwrap_err();
    assert!(matches!(err, LayoutError::Measurement { key: NodeKey(6), .. }));

    let committed = ctx.committed().unwrap();
    assert_eq!(committed.key(), NodeKey(1));
    assert!(ctx.cache().contains(NodeKey(1), NodeKind::Container));
    assert!(!ctx.cache().contains(NodeKey(5), NodeKind::Container));
}

#[test]
fn test_poisoned_pass_aborts() {
    init_tracing();
    let mut ctx = LayoutContext::default();
    let failing =
        row(1).child(ViewNode::new(2).measured(measure_fn(|_| Err(MeasureError::new("x")))));
    let mut pass = ctx.begin_pass(&failing).unwrap();

    assert!(pass.solve(SizeSpec::exact(10.0), SizeSpec::exact(10.0)).is_err());
    assert_eq!(
        pass.solve(SizeSpec::exact(10.0), SizeSpec::exact(10.0)),
        Err(LayoutError::Aborted)
    );
    assert_eq!(pass.finish().unwrap_err(), LayoutError::Aborted);
    assert!(ctx.committed().is_none());
}

#[test]
fn test_finish_without_solve() {
    init_tracing();
    let mut ctx = LayoutContext::default();
    let pass = ctx.begin_pass(&ViewNode::new(1)).unwrap();
    assert_eq!(
        pass.finish().unwrap_err(),
        LayoutError::Configuration(ConfigurationError::NotSolved)
    );
}

#[test]
fn test_bad_style_buffer() {
    init_tracing();
    let tree = ViewNode::new(1).with_buffer(StyleBuffer::from_raw(vec![3.5, 1.0]));
    let mut ctx = LayoutContext::default();
    let err = ctx
        .calculate(&tree, SizeSpec::exact(10.0), SizeSpec::exact(10.0))
        .unwrap_err();
    assert_eq!(
        err,
        LayoutError::Configuration(ConfigurationError::UnknownTag(3.5))
    );
}

struct Unmeasurable;

impl LayoutNode for Unmeasurable {
    fn key(&self) -> NodeKey {
        NodeKey(99)
    }

    fn style(&self) -> &StyleBuffer {
        static EMPTY: StyleBuffer = StyleBuffer::new();
        &EMPTY
    }

    fn children(&self) -> impl Iterator<Item = &Self> {
        std::iter::empty()
    }

    fn can_self_measure(&self) -> bool {
        true
    }
}

#[test]
fn test_non_finite_style_is_dropped_at_encode() {
    init_tracing();
    let tree = row(1)
        .child(sized(2, 20.0).with_style(StyleAttr::FlexGrow(f32::INFINITY)))
        .child(sized(3, 30.0));
    let mut ctx = LayoutContext::default();
    let layout = ctx
        .calculate(&tree, SizeSpec::exact(100.0), SizeSpec::exact(10.0))
        .unwrap();

    assert_eq!(layout.child_at(0).unwrap().width(), 20);
    assert_eq!(layout.x_for_child_at(1), Some(20));
}

#[test]
fn test_self_measuring_node_without_function() {
    init_tracing();
    let mut ctx = LayoutContext::default();
    let err = ctx
        .calculate(&Unmeasurable, SizeSpec::exact(10.0), SizeSpec::exact(10.0))
        .unwrap_err();
    assert_eq!(
        err,
        LayoutError::Configuration(ConfigurationError::MissingMeasureFunction(NodeKey(99)))
    );
}

#[test]
fn test_teardown_clears_state() {
    init_tracing();
    let mut ctx = LayoutContext::default();
    let tree = row(1).child(sized(2, 20.0));
    let layout = ctx
        .calculate(&tree, SizeSpec::exact(100.0), SizeSpec::exact(10.0))
        .unwrap();

    ctx.teardown();
    assert!(ctx.committed().is_none());
    assert!(ctx.cache().is_empty());
    // results handed out earlier stay readable
    assert_eq!(layout.x_for_child_at(0), Some(0));

    ctx.calculate(&tree, SizeSpec::exact(100.0), SizeSpec::exact(10.0))
        .unwrap();
    assert_eq!(ctx.last_stats().unwrap().cache_hits, 0);
}

#[test]
fn test_contexts_on_separate_threads() {
    init_tracing();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            thread::spawn(move || {
                let width = 20.0 + i as f32 * 10.0;
                let tree = row(1)
                    .child(sized(2, width))
                    .child(ViewNode::new(3).measured(text_measure_fn("abc")));
                let mut ctx = LayoutContext::default();
                let layout = ctx
                    .calculate(&tree, SizeSpec::exact(200.0), SizeSpec::exact(10.0))
                    .unwrap();
                layout.x_for_child_at(1)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), Some(20 + i as i32 * 10));
    }
}

#[test]
fn test_context_and_result_are_send() {
    fn assert_send<T: Send + 'static>() {}
    assert_send::<LayoutContext>();
    assert_send::<LayoutResult>();
}

#[test]
fn test_context_moves_to_worker_and_back() {
    init_tracing();
    let tree = row(1).child(sized(2, 20.0)).child(sized(3, 30.0));
    let mut ctx = LayoutContext::default();
    ctx.calculate(&tree, SizeSpec::exact(100.0), SizeSpec::exact(10.0))
        .unwrap();

    let worker = thread::spawn(move || {
        let layout = ctx
            .calculate(&tree, SizeSpec::exact(100.0), SizeSpec::exact(10.0))
            .unwrap();
        (ctx, layout)
    });
    let (ctx, layout) = worker.join().unwrap();

    assert_eq!(layout.x_for_child_at(1), Some(20));
    assert_eq!(ctx.last_stats().unwrap().cache_hits, 1);
    assert_eq!(ctx.committed().unwrap().key(), NodeKey(1));
}
