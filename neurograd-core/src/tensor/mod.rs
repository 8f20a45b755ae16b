// src/tensor/mod.rs

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::autograd::Origin;
use crate::error::NeuroGradError;
use crate::tensor_data::TensorData;

pub mod broadcast_utils;
pub mod create;
pub mod utils;

pub use create::{arange, full, ones, ones_like, rand_uniform, randn, zeros, zeros_like};

/// Process-wide counter backing `NodeId::next`.
static NODE_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Identity of a node in the computation graph.
///
/// Ids are handed out monotonically, so they stay stable and comparable however many
/// handles to the same node exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn next() -> Self {
        // Relaxed is enough: only uniqueness and monotonicity of the counter matter.
        NodeId(NODE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// The immutable vertex behind a `Tensor` handle.
pub struct TensorNode {
    pub(crate) id: NodeId,
    pub(crate) data: TensorData,
    pub(crate) requires_grad: bool,
    pub(crate) origin: Option<Origin>,
    pub(crate) generation: usize,
}

/// A node of the computation graph: a tensor value plus its autograd metadata.
///
/// `Tensor` is a shared handle (`Arc<TensorNode>`): cloning it is cheap and every clone
/// refers to the same node, with the same `id`. Nodes never change after construction;
/// gradients live in a [`GradStore`](crate::autograd::GradStore) keyed by `id`.
#[derive(Clone)]
pub struct Tensor {
    pub(crate) node: Arc<TensorNode>,
}

impl Tensor {
    /// Creates a new leaf tensor from flat row-major data. Gradient tracking is off.
    pub fn new(data_vec: Vec<f64>, shape: Vec<usize>) -> Result<Self, NeuroGradError> {
        Ok(Self::from_data(TensorData::new(data_vec, shape)?, false))
    }

    /// Creates a new leaf tensor that participates in differentiation.
    pub fn new_with_grad(data_vec: Vec<f64>, shape: Vec<usize>) -> Result<Self, NeuroGradError> {
        Ok(Self::from_data(TensorData::new(data_vec, shape)?, true))
    }

    /// Creates a 0-dimensional tensor.
    pub fn scalar(value: f64) -> Self {
        Self::from_data(
            TensorData {
                buffer: Arc::new(vec![value]),
                shape: vec![],
                strides: vec![],
            },
            false,
        )
    }

    /// Wraps already-built storage into a leaf node.
    pub(crate) fn from_data(data: TensorData, requires_grad: bool) -> Self {
        Tensor {
            node: Arc::new(TensorNode {
                id: NodeId::next(),
                data,
                requires_grad,
                origin: None,
                generation: 0,
            }),
        }
    }

    /// Wraps the output of a recorded primitive.
    pub(crate) fn from_origin(data: TensorData, origin: Origin) -> Self {
        let generation = 1 + origin
            .inputs()
            .iter()
            .map(Tensor::generation)
            .max()
            .unwrap_or(0);
        Tensor {
            node: Arc::new(TensorNode {
                id: NodeId::next(),
                data,
                requires_grad: true,
                origin: Some(origin),
                generation,
            }),
        }
    }

    /// Returns a new leaf sharing this tensor's storage, with the given gradient flag.
    pub fn with_requires_grad(&self, requires_grad: bool) -> Tensor {
        Self::from_data(self.node.data.clone(), requires_grad)
    }

    /// Returns a new leaf sharing this tensor's storage, cut off from the graph.
    pub fn detach(&self) -> Tensor {
        self.with_requires_grad(false)
    }

    // --- Accessors ---

    pub fn id(&self) -> NodeId {
        self.node.id
    }

    /// Returns a clone of the tensor's shape.
    pub fn shape(&self) -> Vec<usize> {
        self.node.data.shape.clone()
    }

    pub fn rank(&self) -> usize {
        self.node.data.shape.len()
    }

    pub fn numel(&self) -> usize {
        self.node.data.numel()
    }

    /// Returns a copy of the elements in row-major order.
    pub fn data(&self) -> Vec<f64> {
        self.node.data.as_slice().to_vec()
    }

    /// Borrow of the underlying storage.
    pub fn tensor_data(&self) -> &TensorData {
        &self.node.data
    }

    /// Returns the single element of a one-element tensor.
    pub fn item(&self) -> Result<f64, NeuroGradError> {
        match self.node.data.as_slice() {
            [value] => Ok(*value),
            _ => Err(NeuroGradError::ShapeMismatch {
                expected: vec![],
                actual: self.shape(),
                operation: "item".to_string(),
            }),
        }
    }

    pub fn requires_grad(&self) -> bool {
        self.node.requires_grad
    }

    /// A leaf was created directly rather than recorded from a primitive.
    pub fn is_leaf(&self) -> bool {
        self.node.origin.is_none()
    }

    pub fn generation(&self) -> usize {
        self.node.generation
    }

    pub fn origin(&self) -> Option<&Origin> {
        self.node.origin.as_ref()
    }

    /// Name of the primitive that produced this tensor, if it was recorded.
    pub fn op_name(&self) -> Option<&'static str> {
        self.node.origin.as_ref().map(Origin::op_name)
    }
}

impl PartialEq for Tensor {
    /// Value equality: same shape and same elements. Use `id()` for identity.
    fn eq(&self, other: &Self) -> bool {
        self.node.data.shape == other.node.data.shape
            && self.node.data.as_slice() == other.node.data.as_slice()
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.node.data.as_slice();
        let preview: Vec<f64> = data.iter().take(8).copied().collect();
        write!(
            f,
            "Tensor(id={}, shape={:?}, data={:?}{}, requires_grad={}, op={:?}, generation={})",
            self.node.id.0,
            self.node.data.shape,
            preview,
            if data.len() > 8 { "..." } else { "" },
            self.node.requires_grad,
            self.op_name(),
            self.node.generation
        )
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
