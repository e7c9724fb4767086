//! Error taxonomy for layout passes.

use crate::engine::native::NativeId;
use crate::layout::node::NodeKey;
use crate::style::StyleTag;

/// Fatal problems with the input tree or style buffers.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// The buffer contains a tag outside the closed enumeration.
    #[error("unknown style tag {0}")]
    UnknownTag(f32),

    /// The buffer ended in the middle of a record.
    #[error("truncated {tag} record: expected {expected} values, found {found}")]
    Truncated {
        tag: StyleTag,
        expected: usize,
        found: usize,
    },

    /// A record carries a value its tag does not accept.
    #[error("invalid value {value} for {tag}")]
    InvalidValue { tag: StyleTag, value: f32 },

    /// The node reports it can self-measure but has no measurement function.
    #[error("node {0} can self-measure but has no measurement function")]
    MissingMeasureFunction(NodeKey),

    /// `LayoutPass::finish` was called before any solve.
    #[error("layout pass finished before any constraint solve")]
    NotSolved,
}

/// Failure reported by a leaf's measurement function.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct MeasureError {
    message: String,
}

impl MeasureError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A cached subtree could not be cloned.
///
/// Never surfaces from a pass: the builder recovers by rebuilding the
/// affected subtree from the abstract tree.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheConsistencyError {
    #[error("native subtree cloning is disabled")]
    CloneUnsupported,

    #[error("cached native node {0:?} is missing from its source tree")]
    MissingNode(NativeId),
}

/// Error returned by a layout pass. A failed pass publishes nothing.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("measurement failed for node {key}")]
    Measurement {
        key: NodeKey,
        #[source]
        source: MeasureError,
    },

    /// The constraint solver rejected the native tree.
    #[error("constraint solve failed")]
    Solver(#[from] taffy::TaffyError),

    /// An earlier solve of this pass failed.
    #[error("layout pass aborted by an earlier failure")]
    Aborted,
}
