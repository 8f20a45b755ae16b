use crate::autograd::{BackwardOp, GraphContext};
use crate::error::NeuroGradError;
use crate::ops::map_elements;
use crate::tensor::Tensor;

/// Backward for `a + s`: the gradient passes through unchanged.
#[derive(Debug)]
struct AddScalarBackward;

impl BackwardOp for AddScalarBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuroGradError> {
        Ok(vec![grad_output.clone()])
    }
}

/// Backward for `a * s`.
#[derive(Debug)]
struct MulScalarBackward {
    scalar: f64,
}

impl BackwardOp for MulScalarBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuroGradError> {
        Ok(vec![mul_scalar_op(&GraphContext::no_grad(), grad_output, self.scalar)?])
    }
}

/// Adds a constant to every element.
pub fn add_scalar_op(ctx: &GraphContext, a: &Tensor, scalar: f64) -> Result<Tensor, NeuroGradError> {
    let data = map_elements(a.tensor_data(), |x| x + scalar)?;
    Ok(ctx.record("add_scalar", &[a], data, || AddScalarBackward))
}

/// Multiplies every element by a constant.
pub fn mul_scalar_op(ctx: &GraphContext, a: &Tensor, scalar: f64) -> Result<Tensor, NeuroGradError> {
    let data = map_elements(a.tensor_data(), |x| x * scalar)?;
    Ok(ctx.record("mul_scalar", &[a], data, || MulScalarBackward { scalar }))
}
