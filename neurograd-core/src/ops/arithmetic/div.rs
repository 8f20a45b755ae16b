use crate::autograd::{BackwardOp, GraphContext};
use crate::error::NeuroGradError;
use crate::ops::arithmetic::{broadcast_binary_kernel, mul_op, neg_op};
use crate::tensor::Tensor;

// --- Backward Operation Structure ---

#[derive(Debug)]
struct DivBackward {
    a: Tensor,
    b: Tensor,
}

// --- Backward Operation Implementation ---

impl BackwardOp for DivBackward {
    /// dL/da = dL/dc / b, dL/db = -dL/dc * a / b².
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuroGradError> {
        let ctx = GraphContext::no_grad();
        let grad_a_unreduced = div_op(&ctx, grad_output, &self.b)?;
        let grad_a = grad_a_unreduced.reduce_to_shape(&self.a.shape())?;

        let b_squared = mul_op(&ctx, &self.b, &self.b)?;
        let quotient = div_op(&ctx, &self.a, &b_squared)?;
        let grad_b_unreduced = neg_op(&ctx, &mul_op(&ctx, grad_output, &quotient)?)?;
        let grad_b = grad_b_unreduced.reduce_to_shape(&self.b.shape())?;
        Ok(vec![grad_a, grad_b])
    }
}

// --- Forward Operation ---

/// Performs element-wise division `a / b` with broadcasting.
///
/// Division by zero follows IEEE 754 and yields infinities or NaN.
pub fn div_op(ctx: &GraphContext, a: &Tensor, b: &Tensor) -> Result<Tensor, NeuroGradError> {
    let data = broadcast_binary_kernel(a.tensor_data(), b.tensor_data(), |x, y| x / y)?;
    Ok(ctx.record("div", &[a, b], data, || DivBackward {
        a: a.detach(),
        b: b.detach(),
    }))
}

#[cfg(test)]
#[path = "div_test.rs"]
mod tests;
