//! Layout engine - native node arena and constraint solve.
//!
//! - NativeTree: flat arena of native nodes, one per layout pass
//! - Adapter: decoded style → solver style, with direction applied
//! - Solver: mirrors the arena into taffy, runs the flex solve, writes
//!   geometry back
//!
//! # Architecture
//!
//! Native nodes are NOT shared objects. They are slots in a per-pass arena
//! addressed by index:
//!
//! ```text
//! n0: container (key=#1, children=[n1, n2], geometry=0,0 100x40)
//! n1: leaf      (key=#2, parent=n0, delegate=30x12)
//! n2: container (key=#3, parent=n0, children=[], geometry=30,0 70x40)
//! ```
//!
//! A committed arena is frozen behind an `Arc` and only read afterwards;
//! the next pass copies whatever it reuses into its own arena.

pub(crate) mod adapter;
pub mod native;
pub(crate) mod solver;

pub use native::{EdgeInsets, Geometry, LeafSlot, NativeId, NativeNode, NativeTree, NodeFlags};
