use crate::error::NeuroGradError;
use crate::ops::reduction::sum::sum_axes_kernel;
use crate::ops::view::broadcast_to::broadcast_to_kernel;
use crate::tensor::Tensor;

/// Axes of `current_shape` that must be summed to get back to `target_shape`,
/// or `None` if `target_shape` cannot broadcast to `current_shape`.
pub(crate) fn reduction_axes(current_shape: &[usize], target_shape: &[usize]) -> Option<Vec<usize>> {
    let current_rank = current_shape.len();
    let target_rank = target_shape.len();
    if current_rank < target_rank {
        return None;
    }
    let rank_diff = current_rank - target_rank;
    let mut axes: Vec<usize> = (0..rank_diff).collect();
    for (i, &target_dim) in target_shape.iter().enumerate() {
        let current_dim = current_shape[rank_diff + i];
        if current_dim != target_dim {
            if target_dim == 1 {
                axes.push(rank_diff + i);
            } else {
                return None;
            }
        }
    }
    Some(axes)
}

impl Tensor {
    /// Reduces the tensor (gradient) to match a target shape by summing along broadcasted
    /// dimensions.
    ///
    /// This is the broadcast reduction every binary backward formula applies before handing
    /// a contribution to the scheduler. The result is a plain, non-recorded tensor.
    pub fn reduce_to_shape(&self, target_shape: &[usize]) -> Result<Tensor, NeuroGradError> {
        let current_shape = self.shape();
        if current_shape == target_shape {
            return Ok(self.clone());
        }
        let axes = reduction_axes(&current_shape, target_shape).ok_or_else(|| {
            NeuroGradError::ShapeMismatch {
                expected: target_shape.to_vec(),
                actual: current_shape.clone(),
                operation: "reduce_to_shape".to_string(),
            }
        })?;
        let reduced = sum_axes_kernel(self.tensor_data(), &axes, true)?;
        // Drop the leading axes that the target never had.
        let reshaped = reduced.reshaped(target_shape.to_vec())?;
        Ok(Tensor::from_data(reshaped, false))
    }

    /// Expands the tensor to `target_shape` following broadcasting rules.
    /// The counterpart of `reduce_to_shape`; the result is a plain, non-recorded tensor.
    pub fn expand_to_shape(&self, target_shape: &[usize]) -> Result<Tensor, NeuroGradError> {
        if self.tensor_data().shape() == target_shape {
            return Ok(self.clone());
        }
        let expanded = broadcast_to_kernel(self.tensor_data(), target_shape)?;
        Ok(Tensor::from_data(expanded, false))
    }
}
