use crate::autograd::{BackwardOp, GraphContext};
use crate::error::NeuroGradError;
use crate::ops::arithmetic::broadcast_binary_kernel;
use crate::tensor::Tensor;

// --- Backward Operation Structure ---

/// Backward operation context for multiplication.
/// Keeps both operands: each one's gradient depends on the other.
#[derive(Debug)]
struct MulBackward {
    a: Tensor,
    b: Tensor,
}

// --- Backward Operation Implementation ---

impl BackwardOp for MulBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuroGradError> {
        let ctx = GraphContext::no_grad();
        // grad_a = grad_output * b
        let grad_a = mul_op(&ctx, grad_output, &self.b)?.reduce_to_shape(&self.a.shape())?;
        // grad_b = grad_output * a
        let grad_b = mul_op(&ctx, grad_output, &self.a)?.reduce_to_shape(&self.b.shape())?;
        Ok(vec![grad_a, grad_b])
    }
}

// --- Forward Operation ---

/// Performs element-wise multiplication `a * b` with broadcasting.
pub fn mul_op(ctx: &GraphContext, a: &Tensor, b: &Tensor) -> Result<Tensor, NeuroGradError> {
    let data = broadcast_binary_kernel(a.tensor_data(), b.tensor_data(), |x, y| x * y)?;
    Ok(ctx.record("mul", &[a, b], data, || MulBackward {
        a: a.detach(),
        b: b.detach(),
    }))
}

#[cfg(test)]
#[path = "mul_test.rs"]
mod tests;
