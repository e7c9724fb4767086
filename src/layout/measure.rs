//! Measurement dispatch.
//!
//! After each solve every leaf is measured once against the content box the
//! solver assigned it. The result becomes the leaf's delegate size, which
//! the result façade reports in place of the solved size.

use tracing::trace;

use crate::engine::native::{NativeId, NativeTree};
use crate::error::LayoutError;
use crate::layout::node::MeasureInput;
use crate::layout::pass::PassStats;

/// Measure every pending leaf against its solved content box.
///
/// A leaf whose box is unchanged since its last dispatch keeps its delegate.
pub(crate) fn dispatch(
    tree: &mut NativeTree,
    leaves: &[NativeId],
    stats: &mut PassStats,
) -> Result<(), LayoutError> {
    for &id in leaves {
        let owner = tree
            .node(id)
            .parent()
            .map(|parent| tree.geometry(parent).content_box());
        let content_box = tree.geometry(id).content_box();

        let node = tree.node_mut(id);
        let key = node.key();
        let Some(slot) = node.leaf_mut() else {
            continue;
        };

        if slot.last_box() == Some(content_box) && slot.delegate().is_some() {
            stats.measure_skips += 1;
            continue;
        }

        let (width, height) = content_box;
        let input = MeasureInput {
            owner_width: owner.map(|(w, _)| w),
            owner_height: owner.map(|(_, h)| h),
            ..MeasureInput::exact(width, height)
        };
        let (size, fresh) = slot
            .measure(&input)
            .map_err(|source| LayoutError::Measurement { key, source })?;
        slot.set_delegate(size, content_box);

        if fresh {
            stats.measure_invocations += 1;
        } else {
            stats.measure_memo_hits += 1;
        }
        trace!(node = %key, width = size.width, height = size.height, fresh, "measured leaf");
    }
    Ok(())
}
