use crate::autograd::{BackwardOp, GraphContext};
use crate::error::NeuroGradError;
use crate::ops::arithmetic::broadcast_binary_kernel;
use crate::tensor::Tensor;

// --- Backward Operation Structure ---

/// Backward operation context for element-wise addition.
/// Only the input shapes are needed to undo broadcasting.
#[derive(Debug)]
struct AddBackward {
    a_shape: Vec<usize>,
    b_shape: Vec<usize>,
}

// --- Backward Operation Implementation ---

impl BackwardOp for AddBackward {
    /// dL/da = dL/dc, dL/db = dL/dc, each summed back over broadcast axes.
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuroGradError> {
        let grad_a = grad_output.reduce_to_shape(&self.a_shape)?;
        let grad_b = grad_output.reduce_to_shape(&self.b_shape)?;
        Ok(vec![grad_a, grad_b])
    }
}

// --- Forward Operation ---

/// Performs element-wise addition `a + b` with broadcasting.
///
/// # Errors
/// Returns `NeuroGradError::BroadcastError` if the shapes are not broadcast-compatible.
pub fn add_op(ctx: &GraphContext, a: &Tensor, b: &Tensor) -> Result<Tensor, NeuroGradError> {
    let data = broadcast_binary_kernel(a.tensor_data(), b.tensor_data(), |x, y| x + y)?;
    Ok(ctx.record("add", &[a, b], data, || AddBackward {
        a_shape: a.shape(),
        b_shape: b.shape(),
    }))
}

#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
