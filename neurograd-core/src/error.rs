use crate::tensor::NodeId;
use thiserror::Error;

/// Custom error type for the NeuroGrad engine.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum NeuroGradError {
    /// A non-scalar root reached `backward` without a seed gradient.
    #[error("Missing gradient for root {node} with shape {shape:?}: non-scalar roots need an explicit seed")]
    MissingGradient { node: NodeId, shape: Vec<usize> },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    /// The backward step of the operation that produced `node` failed.
    #[error("Backward of '{operation}' failed at {node}: {source}")]
    OperatorBackwardFailure {
        node: NodeId,
        operation: String,
        #[source]
        source: Box<NeuroGradError>,
    },

    /// The recorded graph is malformed (cycle, produced node without provenance, ...).
    #[error("Autograd invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Cannot broadcast shapes: {shape1:?} and {shape2:?}")]
    BroadcastError {
        shape1: Vec<usize>,
        shape2: Vec<usize>,
    },

    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Rank mismatch: expected {expected}, got {actual}")]
    RankMismatch { expected: usize, actual: usize },

    #[error("Axis {axis} is out of bounds for tensor of rank {rank}")]
    AxisOutOfBounds { axis: usize, rank: usize },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Failed to build backward thread pool: {0}")]
    ThreadPoolBuild(String),
}

impl NeuroGradError {
    /// Wraps an error raised inside a backward closure.
    pub(crate) fn backward_failure(node: NodeId, operation: &str, source: NeuroGradError) -> Self {
        NeuroGradError::OperatorBackwardFailure {
            node,
            operation: operation.to_string(),
            source: Box::new(source),
        }
    }
}
