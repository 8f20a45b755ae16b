use crate::autograd::{BackwardOp, GraphContext};
use crate::error::NeuroGradError;
use crate::ops::{map_elements, scale_by_derivative};
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;

#[derive(Debug)]
struct ExpBackward {
    output: TensorData,
}

impl BackwardOp for ExpBackward {
    /// \( \frac{de^a}{da} = e^a \), which is the forward output.
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuroGradError> {
        Ok(vec![scale_by_derivative(grad_output, &self.output, |y| y, "exp")?])
    }
}

/// Element-wise exponential.
pub fn exp_op(ctx: &GraphContext, a: &Tensor) -> Result<Tensor, NeuroGradError> {
    let data = map_elements(a.tensor_data(), f64::exp)?;
    let output = data.clone();
    Ok(ctx.record("exp", &[a], data, move || ExpBackward { output }))
}
