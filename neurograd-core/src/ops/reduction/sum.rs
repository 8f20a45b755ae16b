use crate::autograd::{BackwardOp, GraphContext};
use crate::error::NeuroGradError;
use crate::tensor::utils::{calculate_strides, index_to_coord};
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;

// --- Kernel ---

/// Validates `axes` against `rank`, returning them sorted and deduplicated.
pub(crate) fn normalize_axes(axes: &[usize], rank: usize) -> Result<Vec<usize>, NeuroGradError> {
    let mut processed_axes = Vec::with_capacity(axes.len());
    for &axis in axes {
        if axis >= rank {
            return Err(NeuroGradError::AxisOutOfBounds { axis, rank });
        }
        processed_axes.push(axis);
    }
    processed_axes.sort_unstable();
    processed_axes.dedup();
    Ok(processed_axes)
}

/// Shape after reducing `axes` (already normalized) of `input_shape`.
pub(crate) fn reduced_shape(input_shape: &[usize], axes: &[usize], keep_dims: bool) -> Vec<usize> {
    input_shape
        .iter()
        .enumerate()
        .filter_map(|(dim, &size)| {
            if !axes.contains(&dim) {
                Some(size)
            } else if keep_dims {
                Some(1)
            } else {
                None
            }
        })
        .collect()
}

/// Sums `input` over `axes`. Elements are added in row-major input order.
pub(crate) fn sum_axes_kernel(input: &TensorData, axes: &[usize], keep_dims: bool) -> Result<TensorData, NeuroGradError> {
    let input_shape = input.shape();
    let axes = normalize_axes(axes, input_shape.len())?;
    let output_shape = reduced_shape(input_shape, &axes, keep_dims);
    let kept_shape = reduced_shape(input_shape, &axes, true);
    let kept_strides = calculate_strides(&kept_shape);
    let output_numel: usize = output_shape.iter().product();

    let mut sums = vec![0.0; output_numel];
    for (i, &value) in input.as_slice().iter().enumerate() {
        let coord = index_to_coord(i, input.strides(), input_shape);
        let out_idx: usize = coord
            .iter()
            .enumerate()
            .filter(|(dim, _)| !axes.contains(dim))
            .map(|(dim, &c)| c * kept_strides[dim])
            .sum();
        sums[out_idx] += value;
    }
    TensorData::new(sums, output_shape)
}

// --- Backward Operation ---

/// Broadcasts the output gradient back over the summed axes.
#[derive(Debug)]
struct SumBackward {
    input_shape: Vec<usize>,
    /// Output shape with the reduced axes kept as size 1.
    kept_shape: Vec<usize>,
}

impl BackwardOp for SumBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuroGradError> {
        let kept = Tensor::from_data(grad_output.tensor_data().reshaped(self.kept_shape.clone())?, false);
        Ok(vec![kept.expand_to_shape(&self.input_shape)?])
    }
}

// --- Forward Operation ---

/// Sums the elements of `input`, over every axis when `axes` is `None`.
///
/// With `keep_dims`, reduced axes stay in the output shape with size 1.
///
/// # Errors
/// Returns `NeuroGradError::AxisOutOfBounds` for an axis not smaller than the rank.
pub fn sum_op(
    ctx: &GraphContext,
    input: &Tensor,
    axes: Option<&[usize]>,
    keep_dims: bool,
) -> Result<Tensor, NeuroGradError> {
    let rank = input.rank();
    let axes: Vec<usize> = match axes {
        Some(axes) => normalize_axes(axes, rank)?,
        None => (0..rank).collect(),
    };
    let data = sum_axes_kernel(input.tensor_data(), &axes, keep_dims)?;
    Ok(ctx.record("sum", &[input], data, || SumBackward {
        input_shape: input.shape(),
        kept_shape: reduced_shape(input.tensor_data().shape(), &axes, true),
    }))
}

#[cfg(test)]
#[path = "sum_test.rs"]
mod tests;
