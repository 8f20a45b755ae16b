use std::fmt::{self, Debug};

use crate::error::NeuroGradError;
use crate::tensor::Tensor;

/// Defines the interface for the backward pass of a differentiable tensor operation.
///
/// Any primitive that records an output must supply a `BackwardOp` capturing whatever
/// forward-time values its gradient formula needs. The implementation is stored in the
/// output's [`Origin`](crate::autograd::Origin) and invoked exactly once per backward pass,
/// possibly on a worker thread, hence the `Send + Sync` bounds.
pub trait BackwardOp: Debug + Send + Sync {
    /// Computes the gradients of the operation's inputs given the gradient of its output.
    ///
    /// # Arguments
    /// * `grad_output`: dL/dOutput, shaped like the operation's output.
    ///
    /// # Returns
    /// * `Ok(Vec<Tensor>)`: one gradient per input, in the same order as the inputs recorded
    ///   in the origin. Each gradient **must** already be reduced to its input's shape; the
    ///   scheduler rejects mismatched shapes.
    /// * `Err(NeuroGradError)`: the formula could not be evaluated.
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuroGradError>;
}

/// Adapts a closure into a [`BackwardOp`], for operators defined through
/// [`GraphContext::apply`](crate::autograd::GraphContext::apply).
pub struct FnBackward<F> {
    name: &'static str,
    func: F,
}

impl<F> FnBackward<F>
where
    F: Fn(&Tensor) -> Result<Vec<Tensor>, NeuroGradError> + Send + Sync,
{
    pub fn new(name: &'static str, func: F) -> Self {
        FnBackward { name, func }
    }
}

impl<F> Debug for FnBackward<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnBackward").field("name", &self.name).finish()
    }
}

impl<F> BackwardOp for FnBackward<F>
where
    F: Fn(&Tensor) -> Result<Vec<Tensor>, NeuroGradError> + Send + Sync,
{
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuroGradError> {
        (self.func)(grad_output)
    }
}
