//! Constraint solve over a native tree.
//!
//! The arena is mirrored into a fresh `TaffyTree` for every solve. Leaves
//! carry their `NativeId` as node context, so the measure closure can reach
//! the leaf slot. Solved geometry is written back into the arena.

use taffy::TaffyTree;
use taffy::prelude::{AvailableSpace, NodeId, Size};
use tracing::trace;

use crate::engine::adapter;
use crate::engine::native::{EdgeInsets, Geometry, NativeId, NativeNode, NativeTree};
use crate::error::LayoutError;
use crate::layout::node::{MeasureInput, NodeKey};
use crate::layout::root::RootSizing;

/// Solve the tree under `sizing`. Returns how many measurement functions ran.
pub(crate) fn solve(
    tree: &mut NativeTree,
    root: NativeId,
    sizing: &RootSizing,
) -> Result<usize, LayoutError> {
    let mut taffy: TaffyTree<NativeId> = TaffyTree::new();
    taffy.disable_rounding();

    let mut mapping: Vec<(NativeId, NodeId)> = Vec::with_capacity(tree.len());
    let taffy_root = mirror(tree, &mut taffy, root, Some(sizing), &mut mapping)?;

    let mut invoked = 0usize;
    let mut failure: Option<LayoutError> = None;
    {
        let nodes = tree.nodes_mut();
        taffy.compute_layout_with_measure(
            taffy_root,
            sizing.available_space(),
            |known_dimensions, available_space, _node_id, context, _style| {
                let Some(&mut id) = context else {
                    return Size::ZERO;
                };
                if failure.is_some() {
                    return Size::ZERO;
                }
                match measure_leaf(&mut nodes[id.index()], known_dimensions, available_space) {
                    Ok((size, fresh)) => {
                        if fresh {
                            invoked += 1;
                        }
                        size
                    }
                    Err(err) => {
                        failure = Some(err);
                        Size::ZERO
                    }
                }
            },
        )?;
    }
    if let Some(err) = failure {
        return Err(err);
    }

    for (id, taffy_id) in mapping {
        let layout = taffy.layout(taffy_id)?;
        *tree.geometry_mut(id) = Geometry {
            x: layout.location.x,
            y: layout.location.y,
            width: layout.size.width,
            height: layout.size.height,
            padding: EdgeInsets {
                top: layout.padding.top,
                right: layout.padding.right,
                bottom: layout.padding.bottom,
                left: layout.padding.left,
            },
            border: EdgeInsets {
                top: layout.border.top,
                right: layout.border.right,
                bottom: layout.border.bottom,
                left: layout.border.left,
            },
        };
    }

    trace!(nodes = tree.len(), invoked, "solve complete");
    Ok(invoked)
}

fn mirror(
    tree: &NativeTree,
    taffy: &mut TaffyTree<NativeId>,
    id: NativeId,
    sizing: Option<&RootSizing>,
    mapping: &mut Vec<(NativeId, NodeId)>,
) -> Result<NodeId, taffy::TaffyError> {
    let node = tree.node(id);
    let resolved = node.style();
    let mut style = adapter::solver_style(&resolved.node, resolved.direction);
    if let Some(sizing) = sizing {
        sizing.apply(&mut style);
    }

    let taffy_id = if node.is_leaf() {
        taffy.new_leaf_with_context(style, id)?
    } else {
        let children = node
            .children()
            .iter()
            .map(|&child| mirror(tree, taffy, child, None, mapping))
            .collect::<Result<Vec<_>, _>>()?;
        taffy.new_with_children(style, &children)?
    };
    mapping.push((id, taffy_id));
    Ok(taffy_id)
}

/// Translate solver constraints into a measurement call on one leaf.
fn measure_leaf(
    node: &mut NativeNode,
    known: Size<Option<f32>>,
    available: Size<AvailableSpace>,
) -> Result<(Size<f32>, bool), LayoutError> {
    let key: NodeKey = node.key();
    let Some(slot) = node.leaf_mut() else {
        return Ok((Size::ZERO, false));
    };

    let (min_width, max_width) = axis_bounds(known.width, available.width);
    let (min_height, max_height) = axis_bounds(known.height, available.height);
    let input = MeasureInput {
        min_width,
        max_width,
        min_height,
        max_height,
        owner_width: None,
        owner_height: None,
    };

    let (measured, fresh) = slot
        .measure(&input)
        .map_err(|source| LayoutError::Measurement { key, source })?;
    let size = Size {
        width: known.width.unwrap_or(measured.width),
        height: known.height.unwrap_or(measured.height),
    };
    Ok((size, fresh))
}

fn axis_bounds(known: Option<f32>, available: AvailableSpace) -> (f32, f32) {
    if let Some(v) = known {
        return (v, v);
    }
    match available {
        AvailableSpace::Definite(v) => (0.0, v.max(0.0)),
        AvailableSpace::MinContent => (0.0, 0.0),
        AvailableSpace::MaxContent => (0.0, f32::INFINITY),
    }
}
