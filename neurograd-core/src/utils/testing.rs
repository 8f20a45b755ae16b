use crate::tensor::Tensor;

/// Checks that a tensor has the expected shape and that its data is within `tolerance`
/// of `expected_data`, element by element.
/// Panics if shapes differ or data differs significantly.
pub fn check_tensor_near(actual: &Tensor, expected_shape: &[usize], expected_data: &[f64], tolerance: f64) {
    assert_eq!(actual.shape(), expected_shape, "Shape mismatch");

    let actual_data = actual.data();
    assert_eq!(actual_data.len(), expected_data.len(), "Data length mismatch");

    for (i, (a, e)) in actual_data.iter().zip(expected_data.iter()).enumerate() {
        let diff = (a - e).abs();
        if diff > tolerance {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, diff={:?}, tolerance={:?}",
                i, a, e, diff, tolerance
            );
        }
    }
}

/// Helper to create a plain tensor for testing purposes.
pub fn create_test_tensor(data: Vec<f64>, shape: Vec<usize>) -> Tensor {
    Tensor::new(data, shape).expect("Failed to create test tensor")
}

/// Helper to create a tensor that requires gradient for testing.
pub fn create_test_tensor_with_grad(data: Vec<f64>, shape: Vec<usize>) -> Tensor {
    Tensor::new_with_grad(data, shape).expect("Failed to create test tensor with grad")
}
