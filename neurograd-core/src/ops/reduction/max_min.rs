use crate::autograd::{BackwardOp, GraphContext};
use crate::error::NeuroGradError;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;

const CLOSE_ATOL: f64 = 1e-8;
const CLOSE_RTOL: f64 = 1e-5;

/// `1.0` where `a` is within tolerance of `b`, else `0.0`.
fn is_close(a: f64, b: f64) -> f64 {
    if (a - b).abs() < CLOSE_ATOL + CLOSE_RTOL * b.abs() {
        1.0
    } else {
        0.0
    }
}

/// Backward for a global extremum: the gradient flows to every element that is close
/// to the selected value, so ties each receive the full gradient.
#[derive(Debug)]
struct ExtremumBackward {
    input: TensorData,
    extremum: f64,
}

impl BackwardOp for ExtremumBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuroGradError> {
        let g = grad_output.item()?;
        let data_vec = self
            .input
            .as_slice()
            .iter()
            .map(|&v| g * is_close(v, self.extremum))
            .collect();
        Ok(vec![Tensor::new(data_vec, self.input.shape().to_vec())?])
    }
}

fn extremum_op<F>(ctx: &GraphContext, input: &Tensor, op_name: &'static str, pick: F) -> Result<Tensor, NeuroGradError>
where
    F: Fn(f64, f64) -> f64,
{
    let extremum = input
        .tensor_data()
        .as_slice()
        .iter()
        .copied()
        .reduce(pick)
        .ok_or_else(|| NeuroGradError::UnsupportedOperation(format!("{} of an empty tensor", op_name)))?;
    let data = TensorData::new(vec![extremum], vec![])?;
    Ok(ctx.record(op_name, &[input], data, || ExtremumBackward {
        input: input.tensor_data().clone(),
        extremum,
    }))
}

/// Largest element of `input`, as a 0-dimensional tensor.
///
/// # Errors
/// Returns `NeuroGradError::UnsupportedOperation` for an empty tensor.
pub fn max_op(ctx: &GraphContext, input: &Tensor) -> Result<Tensor, NeuroGradError> {
    extremum_op(ctx, input, "max", f64::max)
}

/// Smallest element of `input`, as a 0-dimensional tensor.
pub fn min_op(ctx: &GraphContext, input: &Tensor) -> Result<Tensor, NeuroGradError> {
    extremum_op(ctx, input, "min", f64::min)
}

#[cfg(test)]
#[path = "max_min_test.rs"]
mod tests;
