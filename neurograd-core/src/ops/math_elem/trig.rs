use crate::autograd::{BackwardOp, GraphContext};
use crate::error::NeuroGradError;
use crate::ops::{map_elements, scale_by_derivative};
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;

#[derive(Debug)]
struct SinBackward {
    input: TensorData,
}

impl BackwardOp for SinBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuroGradError> {
        Ok(vec![scale_by_derivative(grad_output, &self.input, f64::cos, "sin")?])
    }
}

#[derive(Debug)]
struct CosBackward {
    input: TensorData,
}

impl BackwardOp for CosBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuroGradError> {
        Ok(vec![scale_by_derivative(grad_output, &self.input, |a| -a.sin(), "cos")?])
    }
}

/// Keeps the forward output: \( \frac{d\tanh(a)}{da} = 1 - \tanh^2(a) \).
#[derive(Debug)]
struct TanhBackward {
    output: TensorData,
}

impl BackwardOp for TanhBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuroGradError> {
        Ok(vec![scale_by_derivative(grad_output, &self.output, |y| 1.0 - y * y, "tanh")?])
    }
}

pub fn sin_op(ctx: &GraphContext, a: &Tensor) -> Result<Tensor, NeuroGradError> {
    let data = map_elements(a.tensor_data(), f64::sin)?;
    Ok(ctx.record("sin", &[a], data, || SinBackward {
        input: a.tensor_data().clone(),
    }))
}

pub fn cos_op(ctx: &GraphContext, a: &Tensor) -> Result<Tensor, NeuroGradError> {
    let data = map_elements(a.tensor_data(), f64::cos)?;
    Ok(ctx.record("cos", &[a], data, || CosBackward {
        input: a.tensor_data().clone(),
    }))
}

/// Element-wise hyperbolic tangent.
pub fn tanh_op(ctx: &GraphContext, a: &Tensor) -> Result<Tensor, NeuroGradError> {
    let data = map_elements(a.tensor_data(), f64::tanh)?;
    let output = data.clone();
    Ok(ctx.record("tanh", &[a], data, move || TanhBackward { output }))
}
