//! Layout - abstract node tree in, positioned boxes out.
//!
//! # Architecture
//!
//! The layout module drives [Taffy](https://github.com/DioxusLabs/taffy)
//! through the native arena in [`crate::engine`]. A pass:
//!
//! 1. Builds a native tree from the abstract tree, reusing unchanged
//!    container subtrees from the last committed pass
//! 2. Resolves the host's size constraints against the root
//! 3. Runs the flex solve, asking leaves for their content size
//! 4. Measures every leaf against its solved box
//! 5. Commits the tree and exposes it through [`LayoutResult`]
//!
//! # Example
//!
//! ```
//! use spark_layout::{LayoutConfig, LayoutContext, SizeSpec, StyleAttr, ViewNode};
//! use spark_layout::layout::text_measure_fn;
//! use spark_layout::types::FlexDirection;
//!
//! let tree = ViewNode::new(1)
//!     .with_style(StyleAttr::FlexDirection(FlexDirection::Row))
//!     .child(ViewNode::new(2).measured(text_measure_fn("hello")));
//!
//! let mut ctx = LayoutContext::new(LayoutConfig::default());
//! let layout = ctx
//!     .calculate(&tree, SizeSpec::exact(80.0), SizeSpec::exact(24.0))
//!     .unwrap();
//! assert_eq!(layout.child_at(0).unwrap().width(), 5);
//! ```

mod builder;
mod cache;
mod measure;
pub mod node;
mod pass;
mod result;
pub(crate) mod root;
mod text_measure;

pub use cache::LayoutCache;
pub use node::{
    LayoutNode, MeasureFn, MeasureInput, MeasuredSize, NodeKey, NodeKind, ViewNode, measure_fn,
};
pub use pass::{LayoutContext, LayoutPass, PassStats};
pub use result::LayoutResult;
pub use root::{SizeMode, SizeSpec, ambient_root_direction, resolve_root_direction};
pub use text_measure::{string_width, text_measure_fn, text_size, wrap_text};
