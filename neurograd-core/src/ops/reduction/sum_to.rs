use crate::autograd::{BackwardOp, GraphContext};
use crate::error::NeuroGradError;
use crate::tensor::Tensor;

#[derive(Debug)]
struct SumToBackward {
    input_shape: Vec<usize>,
}

impl BackwardOp for SumToBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuroGradError> {
        Ok(vec![grad_output.expand_to_shape(&self.input_shape)?])
    }
}

/// Sums `input` down to `shape`, the inverse of broadcasting `shape` up to the input's.
///
/// # Errors
/// Returns `NeuroGradError::ShapeMismatch` if `shape` does not broadcast to the input shape.
pub fn sum_to_op(ctx: &GraphContext, input: &Tensor, shape: &[usize]) -> Result<Tensor, NeuroGradError> {
    let reduced = input.reduce_to_shape(shape)?;
    Ok(ctx.record("sum_to", &[input], reduced.tensor_data().clone(), || SumToBackward {
        input_shape: input.shape(),
    }))
}
