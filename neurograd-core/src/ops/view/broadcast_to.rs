use crate::autograd::{BackwardOp, GraphContext};
use crate::error::NeuroGradError;
use crate::tensor::utils::{broadcast_shapes, broadcast_source_index, calculate_strides, index_to_coord};
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;

/// Materializes `input` broadcast to `target_shape`.
///
/// # Errors
/// Returns `NeuroGradError::BroadcastError` if `input` cannot broadcast to exactly
/// `target_shape`.
pub(crate) fn broadcast_to_kernel(input: &TensorData, target_shape: &[usize]) -> Result<TensorData, NeuroGradError> {
    let broadcast_error = || NeuroGradError::BroadcastError {
        shape1: input.shape().to_vec(),
        shape2: target_shape.to_vec(),
    };
    if input.shape().len() > target_shape.len() || broadcast_shapes(input.shape(), target_shape)? != target_shape {
        return Err(broadcast_error());
    }

    let target_strides = calculate_strides(target_shape);
    let numel: usize = target_shape.iter().product();
    let source = input.as_slice();
    let data_vec = (0..numel)
        .map(|i| {
            let coord = index_to_coord(i, &target_strides, target_shape);
            source[broadcast_source_index(&coord, input.shape(), input.strides())]
        })
        .collect();
    TensorData::new(data_vec, target_shape.to_vec())
}

#[derive(Debug)]
struct BroadcastToBackward {
    input_shape: Vec<usize>,
}

impl BackwardOp for BroadcastToBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuroGradError> {
        Ok(vec![grad_output.reduce_to_shape(&self.input_shape)?])
    }
}

/// Expands `input` to `shape` following broadcasting rules.
pub fn broadcast_to_op(ctx: &GraphContext, input: &Tensor, shape: &[usize]) -> Result<Tensor, NeuroGradError> {
    let data = broadcast_to_kernel(input.tensor_data(), shape)?;
    Ok(ctx.record("broadcast_to", &[input], data, || BroadcastToBackward {
        input_shape: input.shape(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::{check_tensor_near, create_test_tensor, create_test_tensor_with_grad};

    #[test]
    fn test_broadcast_to_forward() {
        let ctx = GraphContext::new();
        let t = create_test_tensor(vec![1.0, 2.0, 3.0], vec![3]);
        let result = broadcast_to_op(&ctx, &t, &[2, 3]).unwrap();
        check_tensor_near(&result, &[2, 3], &[1.0, 2.0, 3.0, 1.0, 2.0, 3.0], 0.0);

        let s = Tensor::scalar(4.0);
        check_tensor_near(&broadcast_to_op(&ctx, &s, &[2]).unwrap(), &[2], &[4.0, 4.0], 0.0);
    }

    #[test]
    fn test_broadcast_to_rejects_shrinking() {
        let ctx = GraphContext::new();
        let t = create_test_tensor(vec![0.0; 6], vec![2, 3]);
        assert!(matches!(
            broadcast_to_op(&ctx, &t, &[3]),
            Err(NeuroGradError::BroadcastError { .. })
        ));
        assert!(matches!(
            broadcast_to_op(&ctx, &t, &[4, 3]),
            Err(NeuroGradError::BroadcastError { .. })
        ));
    }

    #[test]
    fn test_broadcast_to_backward() {
        let ctx = GraphContext::new();
        let t = create_test_tensor_with_grad(vec![1.0, 2.0], vec![2, 1]);
        let y = broadcast_to_op(&ctx, &t, &[2, 3]).unwrap();
        let grads = y.backward_with(create_test_tensor(vec![1.0; 6], vec![2, 3])).unwrap();
        check_tensor_near(&grads.get(&t).unwrap(), &[2, 1], &[3.0, 3.0], 0.0);
    }
}
