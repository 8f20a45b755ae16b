use crate::autograd::{BackwardOp, GraphContext};
use crate::error::NeuroGradError;
use crate::ops::{map_elements, scale_by_derivative};
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;

// --- LnBackward Definition ---

/// Backward pass structure for the element-wise natural logarithm (`ln`) operation.
///
/// Stores the input values, as the gradient is `1 / input`.
#[derive(Debug)]
struct LnBackward {
    input: TensorData,
}

// --- BackwardOp Implementation for LnBackward ---

impl BackwardOp for LnBackward {
    /// Computes the gradient for \( z = \ln(a) \):
    /// \\[ \frac{dL}{da} = \frac{dL}{dz} \cdot \frac{1}{a} \\]
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuroGradError> {
        Ok(vec![scale_by_derivative(grad_output, &self.input, |a| 1.0 / a, "ln")?])
    }
}

// --- ln_op Implementation ---

/// Computes the element-wise natural logarithm (base \( e \)) of a tensor.
///
/// Non-positive inputs follow IEEE 754: `ln(0) = -inf`, negative inputs give NaN.
pub fn ln_op(ctx: &GraphContext, a: &Tensor) -> Result<Tensor, NeuroGradError> {
    let data = map_elements(a.tensor_data(), f64::ln)?;
    Ok(ctx.record("ln", &[a], data, || LnBackward {
        input: a.tensor_data().clone(),
    }))
}

#[cfg(test)]
#[path = "ln_test.rs"]
mod tests;
