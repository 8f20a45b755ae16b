use crate::autograd::{BackwardOp, GraphContext};
use crate::error::NeuroGradError;
use crate::ops::arithmetic::{broadcast_binary_kernel, neg_op};
use crate::tensor::Tensor;

// --- Backward Operation Structure ---

#[derive(Debug)]
struct SubBackward {
    a_shape: Vec<usize>,
    b_shape: Vec<usize>,
}

// --- Backward Operation Implementation ---

impl BackwardOp for SubBackward {
    /// dL/da = dL/dc, dL/db = -dL/dc.
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuroGradError> {
        let ctx = GraphContext::no_grad();
        let grad_a = grad_output.reduce_to_shape(&self.a_shape)?;
        let grad_b = neg_op(&ctx, grad_output)?.reduce_to_shape(&self.b_shape)?;
        Ok(vec![grad_a, grad_b])
    }
}

// --- Forward Operation ---

/// Performs element-wise subtraction `a - b` with broadcasting.
pub fn sub_op(ctx: &GraphContext, a: &Tensor, b: &Tensor) -> Result<Tensor, NeuroGradError> {
    let data = broadcast_binary_kernel(a.tensor_data(), b.tensor_data(), |x, y| x - y)?;
    Ok(ctx.record("sub", &[a, b], data, || SubBackward {
        a_shape: a.shape(),
        b_shape: b.shape(),
    }))
}

#[cfg(test)]
#[path = "sub_test.rs"]
mod tests;
