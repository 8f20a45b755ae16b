use std::sync::Arc;

use log::trace;

use crate::autograd::{BackwardOp, Origin};
use crate::error::NeuroGradError;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;

/// Recording configuration threaded through every graph-construction call.
///
/// A context is a plain value: deriving a no-grad context for a nested region leaves the
/// outer context, and any context used by another thread, untouched.
///
/// ```
/// use neurograd_core::autograd::GraphContext;
/// use neurograd_core::ops::arithmetic::mul_op;
/// use neurograd_core::Tensor;
///
/// let ctx = GraphContext::new();
/// let w = Tensor::new_with_grad(vec![2.0], vec![1]).unwrap();
/// let recorded = mul_op(&ctx, &w, &w).unwrap();
/// assert!(recorded.requires_grad());
///
/// let eval = ctx.no_grad_scope();
/// let plain = mul_op(&eval, &w, &w).unwrap();
/// assert!(!plain.requires_grad());
/// assert!(ctx.is_grad_enabled());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphContext {
    grad_enabled: bool,
}

impl Default for GraphContext {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphContext {
    /// A context that records provenance for differentiable inputs.
    pub fn new() -> Self {
        GraphContext { grad_enabled: true }
    }

    /// A context that never records.
    pub fn no_grad() -> Self {
        GraphContext { grad_enabled: false }
    }

    pub fn with_grad_enabled(self, grad_enabled: bool) -> Self {
        GraphContext { grad_enabled }
    }

    /// Derives a non-recording context for a nested region.
    pub fn no_grad_scope(&self) -> Self {
        self.with_grad_enabled(false)
    }

    pub fn is_grad_enabled(&self) -> bool {
        self.grad_enabled
    }

    /// Whether an operation over `inputs` would be recorded under this context.
    pub fn should_record(&self, inputs: &[&Tensor]) -> bool {
        self.grad_enabled && inputs.iter().any(|t| t.requires_grad())
    }

    /// Wraps the forward result of a primitive into a graph node.
    ///
    /// If recording applies, the output gets an [`Origin`] holding `inputs` and the backward
    /// op built by `make_backward`, and its generation becomes one more than the deepest
    /// input. Otherwise the output is a plain leaf and `make_backward` is never called.
    pub fn record<B, F>(&self, op_name: &'static str, inputs: &[&Tensor], data: TensorData, make_backward: F) -> Tensor
    where
        B: BackwardOp + 'static,
        F: FnOnce() -> B,
    {
        if !self.should_record(inputs) {
            return Tensor::from_data(data, false);
        }
        let backward: Arc<dyn BackwardOp> = Arc::new(make_backward());
        let origin = Origin::new(op_name, inputs.iter().map(|t| (*t).clone()).collect(), backward);
        let output = Tensor::from_origin(data, origin);
        trace!(
            "recorded {} as {} (generation {})",
            op_name,
            output.id(),
            output.generation()
        );
        output
    }

    /// Applies a user-defined operator.
    ///
    /// `forward` computes the output storage from the inputs; `backward` must return one
    /// gradient per input, in order, each shaped like its input.
    pub fn apply<F, B>(&self, op_name: &'static str, inputs: &[Tensor], forward: F, backward: B) -> Result<Tensor, NeuroGradError>
    where
        F: FnOnce(&[Tensor]) -> Result<TensorData, NeuroGradError>,
        B: BackwardOp + 'static,
    {
        let data = forward(inputs)?;
        let input_refs: Vec<&Tensor> = inputs.iter().collect();
        Ok(self.record(op_name, &input_refs, data, || backward))
    }
}
