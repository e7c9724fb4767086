//! # spark-layout
//!
//! Flexbox layout engine for abstract view trees.
//!
//! Built on [taffy](https://github.com/DioxusLabs/taffy) for the flex solve.
//!
//! ## Architecture
//!
//! The host framework owns an abstract tree of nodes that implement
//! [`LayoutNode`]. Each node carries a sparse, tagged style buffer and,
//! for content-driven leaves, a measurement function. A layout pass turns
//! that tree into a native arena, solves it, measures its leaves and
//! commits the result:
//!
//! ```text
//! LayoutNode tree → NativeTree (cache reuse) → taffy solve → leaf measure → LayoutResult
//! ```
//!
//! Unchanged container subtrees are copied from the last committed pass
//! instead of rebuilt, keeping their leaf measurements.
//!
//! ## Modules
//!
//! - [`types`] - Flex enums, edges, lengths and dimensions
//! - [`style`] - Style attributes, wire buffer encoder and decoder
//! - [`engine`] - Native node arena, style adapter and solver
//! - [`layout`] - Tree builder, cache, pass orchestration and results
//! - [`config`] - Engine configuration
//! - [`error`] - Error types

pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod style;
pub mod types;

// Re-export commonly used items
pub use config::LayoutConfig;

pub use error::{CacheConsistencyError, ConfigurationError, LayoutError, MeasureError};

pub use layout::{
    LayoutCache, LayoutContext, LayoutNode, LayoutPass, LayoutResult, MeasureFn, MeasureInput,
    MeasuredSize, NodeKey, NodeKind, PassStats, SizeMode, SizeSpec, ViewNode, measure_fn,
};

pub use style::{NodeStyle, STYLE_FORMAT_VERSION, StyleAttr, StyleBuffer, StyleTag};
