use crate::autograd::{BackwardOp, GraphContext};
use crate::error::NeuroGradError;
use crate::tensor::utils::{calculate_strides, index_to_coord};
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;

/// Copies `input` with axes `dim0` and `dim1` swapped.
fn transpose_kernel(input: &TensorData, dim0: usize, dim1: usize) -> Result<TensorData, NeuroGradError> {
    let rank = input.shape().len();
    for dim in [dim0, dim1] {
        if dim >= rank {
            return Err(NeuroGradError::AxisOutOfBounds { axis: dim, rank });
        }
    }
    let mut output_shape = input.shape().to_vec();
    output_shape.swap(dim0, dim1);
    let output_strides = calculate_strides(&output_shape);
    let source = input.as_slice();

    let data_vec = (0..input.numel())
        .map(|i| {
            let mut coord = index_to_coord(i, &output_strides, &output_shape);
            coord.swap(dim0, dim1);
            let offset: usize = coord.iter().zip(input.strides()).map(|(c, s)| c * s).sum();
            source[offset]
        })
        .collect();
    TensorData::new(data_vec, output_shape)
}

#[derive(Debug)]
struct TransposeBackward {
    dim0: usize,
    dim1: usize,
}

impl BackwardOp for TransposeBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuroGradError> {
        Ok(vec![transpose_op(&GraphContext::no_grad(), grad_output, self.dim0, self.dim1)?])
    }
}

/// Swaps two axes of `input`.
///
/// # Errors
/// Returns `NeuroGradError::AxisOutOfBounds` if either axis is not smaller than the rank.
pub fn transpose_op(ctx: &GraphContext, input: &Tensor, dim0: usize, dim1: usize) -> Result<Tensor, NeuroGradError> {
    let data = transpose_kernel(input.tensor_data(), dim0, dim1)?;
    Ok(ctx.record("transpose", &[input], data, || TransposeBackward { dim0, dim1 }))
}

#[cfg(test)]
#[path = "transpose_test.rs"]
mod tests;
