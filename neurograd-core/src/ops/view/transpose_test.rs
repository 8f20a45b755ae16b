use super::*;
use crate::autograd::grad_check::check_grad;
use crate::utils::testing::{check_tensor_near, create_test_tensor, create_test_tensor_with_grad};

#[test]
fn test_transpose_2d() {
    let ctx = GraphContext::new();
    let t = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let result = transpose_op(&ctx, &t, 0, 1).unwrap();
    check_tensor_near(&result, &[3, 2], &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0], 0.0);
}

#[test]
fn test_transpose_3d_outer_axes() {
    let ctx = GraphContext::new();
    let t = create_test_tensor((0..12).map(f64::from).collect(), vec![2, 3, 2]);
    let result = transpose_op(&ctx, &t, 0, 2).unwrap();
    assert_eq!(result.shape(), vec![2, 3, 2]);
    // result[i][j][k] = t[k][j][i]
    let expected: Vec<f64> = (0..2)
        .flat_map(|i| (0..3).flat_map(move |j| (0..2).map(move |k| (k * 6 + j * 2 + i) as f64)))
        .collect();
    check_tensor_near(&result, &[2, 3, 2], &expected, 0.0);
}

#[test]
fn test_transpose_same_axis_is_copy() {
    let ctx = GraphContext::new();
    let t = create_test_tensor(vec![1.0, 2.0], vec![2]);
    check_tensor_near(&transpose_op(&ctx, &t, 0, 0).unwrap(), &[2], &[1.0, 2.0], 0.0);
}

#[test]
fn test_transpose_invalid_axis() {
    let ctx = GraphContext::new();
    let t = create_test_tensor(vec![0.0; 4], vec![2, 2]);
    assert_eq!(
        transpose_op(&ctx, &t, 0, 2).unwrap_err(),
        NeuroGradError::AxisOutOfBounds { axis: 2, rank: 2 }
    );
}

#[test]
fn test_transpose_grad_check() {
    let t = create_test_tensor_with_grad((0..6).map(|v| v as f64 - 2.5).collect(), vec![2, 3]);
    let output_grad = create_test_tensor(vec![1.0, 2.0, 3.0, -1.0, -2.0, -3.0], vec![3, 2]);
    let result = check_grad(|ctx, inputs| transpose_op(ctx, &inputs[0], 0, 1), &[t], &output_grad, 1e-6, 1e-6);
    assert_eq!(result, Ok(()));
}
