use crate::autograd::{BackwardOp, GraphContext};
use crate::error::NeuroGradError;
use crate::ops::{map_elements, scale_by_derivative};
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;

// --- Backward Operation Structure ---

/// Backward context for `a^exponent` with a constant exponent.
#[derive(Debug)]
struct PowScalarBackward {
    input: TensorData,
    exponent: f64,
}

// --- Backward Operation Implementation ---

impl BackwardOp for PowScalarBackward {
    /// \\[ \frac{dL}{da} = \frac{dL}{dz} \cdot p \cdot a^{p-1} \\]
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuroGradError> {
        let p = self.exponent;
        let grad = scale_by_derivative(grad_output, &self.input, |a| p * a.powf(p - 1.0), "pow_scalar")?;
        Ok(vec![grad])
    }
}

#[derive(Debug)]
struct SquareBackward {
    input: TensorData,
}

impl BackwardOp for SquareBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuroGradError> {
        Ok(vec![scale_by_derivative(grad_output, &self.input, |a| 2.0 * a, "square")?])
    }
}

// --- Forward Operations ---

/// Raises every element to a constant power.
pub fn pow_scalar_op(ctx: &GraphContext, a: &Tensor, exponent: f64) -> Result<Tensor, NeuroGradError> {
    let data = map_elements(a.tensor_data(), |x| x.powf(exponent))?;
    Ok(ctx.record("pow_scalar", &[a], data, || PowScalarBackward {
        input: a.tensor_data().clone(),
        exponent,
    }))
}

/// Element-wise square `a * a`.
pub fn square_op(ctx: &GraphContext, a: &Tensor) -> Result<Tensor, NeuroGradError> {
    let data = map_elements(a.tensor_data(), |x| x * x)?;
    Ok(ctx.record("square", &[a], data, || SquareBackward {
        input: a.tensor_data().clone(),
    }))
}

#[cfg(test)]
#[path = "pow_test.rs"]
mod tests;
