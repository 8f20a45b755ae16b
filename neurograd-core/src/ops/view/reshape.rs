use crate::autograd::{BackwardOp, GraphContext};
use crate::error::NeuroGradError;
use crate::tensor::Tensor;

#[derive(Debug)]
struct ReshapeBackward {
    input_shape: Vec<usize>,
}

impl BackwardOp for ReshapeBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuroGradError> {
        let reshaped = grad_output.tensor_data().reshaped(self.input_shape.clone())?;
        Ok(vec![Tensor::from_data(reshaped, false)])
    }
}

/// Gives `input` a new shape with the same number of elements. The buffer is shared.
///
/// # Errors
/// Returns `NeuroGradError::ShapeMismatch` if the element counts differ.
pub fn reshape_op(ctx: &GraphContext, input: &Tensor, new_shape: &[usize]) -> Result<Tensor, NeuroGradError> {
    let data = input.tensor_data().reshaped(new_shape.to_vec())?;
    Ok(ctx.record("reshape", &[input], data, || ReshapeBackward {
        input_shape: input.shape(),
    }))
}

#[cfg(test)]
#[path = "reshape_test.rs"]
mod tests;
