use crate::autograd::{BackwardOp, GraphContext};
use crate::error::NeuroGradError;
use crate::ops::{map_elements, scale_by_derivative};
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;

/// Keeps the forward output: \( \frac{d\sqrt{a}}{da} = \frac{1}{2\sqrt{a}} \).
#[derive(Debug)]
struct SqrtBackward {
    output: TensorData,
}

impl BackwardOp for SqrtBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuroGradError> {
        Ok(vec![scale_by_derivative(grad_output, &self.output, |y| 0.5 / y, "sqrt")?])
    }
}

/// Element-wise square root. Negative inputs give NaN.
pub fn sqrt_op(ctx: &GraphContext, a: &Tensor) -> Result<Tensor, NeuroGradError> {
    let data = map_elements(a.tensor_data(), f64::sqrt)?;
    let output = data.clone();
    Ok(ctx.record("sqrt", &[a], data, move || SqrtBackward { output }))
}
