use crate::error::NeuroGradError;
use crate::tensor::utils::{broadcast_shapes, broadcast_source_index, calculate_strides, index_to_coord};
use crate::tensor_data::TensorData;

pub mod add;
pub mod div;
pub mod mul;
pub mod neg;
pub mod scalar;
pub mod sub;

pub use add::add_op;
pub use div::div_op;
pub use mul::mul_op;
pub use neg::neg_op;
pub use scalar::{add_scalar_op, mul_scalar_op};
pub use sub::sub_op;

/// Element-wise binary kernel with NumPy-style broadcasting.
///
/// Equal shapes take a straight zip; otherwise every output coordinate is mapped back
/// to each operand.
pub(crate) fn broadcast_binary_kernel<F>(
    a: &TensorData,
    b: &TensorData,
    op: F,
) -> Result<TensorData, NeuroGradError>
where
    F: Fn(f64, f64) -> f64,
{
    if a.shape() == b.shape() {
        let data_vec = a
            .as_slice()
            .iter()
            .zip(b.as_slice())
            .map(|(&x, &y)| op(x, y))
            .collect();
        return TensorData::new(data_vec, a.shape().to_vec());
    }

    let output_shape = broadcast_shapes(a.shape(), b.shape())?;
    let output_strides = calculate_strides(&output_shape);
    let numel: usize = output_shape.iter().product();
    let a_data = a.as_slice();
    let b_data = b.as_slice();

    let mut data_vec = Vec::with_capacity(numel);
    for i in 0..numel {
        let coord = index_to_coord(i, &output_strides, &output_shape);
        let val_a = a_data[broadcast_source_index(&coord, a.shape(), a.strides())];
        let val_b = b_data[broadcast_source_index(&coord, b.shape(), b.strides())];
        data_vec.push(op(val_a, val_b));
    }
    TensorData::new(data_vec, output_shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_binary_kernel_rows_and_columns() {
        let col = TensorData::new(vec![1.0, 2.0], vec![2, 1]).unwrap();
        let row = TensorData::new(vec![10.0, 20.0, 30.0], vec![3]).unwrap();
        let out = broadcast_binary_kernel(&col, &row, |x, y| x + y).unwrap();
        assert_eq!(out.shape(), &[2, 3]);
        assert_eq!(out.as_slice(), &[11.0, 21.0, 31.0, 12.0, 22.0, 32.0]);
    }

    #[test]
    fn test_broadcast_binary_kernel_scalar_operand() {
        let scalar = TensorData::new(vec![2.0], vec![]).unwrap();
        let m = TensorData::new(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]).unwrap();
        let out = broadcast_binary_kernel(&m, &scalar, |x, y| x * y).unwrap();
        assert_eq!(out.shape(), &[2, 2]);
        assert_eq!(out.as_slice(), &[2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn test_broadcast_binary_kernel_incompatible() {
        let a = TensorData::new(vec![0.0; 6], vec![2, 3]).unwrap();
        let b = TensorData::new(vec![0.0; 2], vec![2]).unwrap();
        assert_eq!(
            broadcast_binary_kernel(&a, &b, |x, y| x + y).unwrap_err(),
            NeuroGradError::BroadcastError {
                shape1: vec![2, 3],
                shape2: vec![2]
            }
        );
    }
}
