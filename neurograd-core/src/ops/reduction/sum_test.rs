use super::*;
use crate::autograd::grad_check::check_grad;
use crate::utils::testing::{check_tensor_near, create_test_tensor, create_test_tensor_with_grad};

fn matrix_2x3() -> Tensor {
    create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3])
}

#[test]
fn test_sum_all() {
    let ctx = GraphContext::new();
    let result = sum_op(&ctx, &matrix_2x3(), None, false).unwrap();
    check_tensor_near(&result, &[], &[21.0], 1e-12);

    let kept = sum_op(&ctx, &matrix_2x3(), None, true).unwrap();
    check_tensor_near(&kept, &[1, 1], &[21.0], 1e-12);
}

#[test]
fn test_sum_axis_0() {
    let ctx = GraphContext::new();
    let result = sum_op(&ctx, &matrix_2x3(), Some(&[0]), false).unwrap();
    check_tensor_near(&result, &[3], &[5.0, 7.0, 9.0], 1e-12);
}

#[test]
fn test_sum_axis_1_keep_dims() {
    let ctx = GraphContext::new();
    let result = sum_op(&ctx, &matrix_2x3(), Some(&[1]), true).unwrap();
    check_tensor_near(&result, &[2, 1], &[6.0, 15.0], 1e-12);
}

#[test]
fn test_sum_middle_axis_of_3d() {
    let ctx = GraphContext::new();
    let t = create_test_tensor((0..24).map(f64::from).collect(), vec![2, 3, 4]);
    let result = sum_op(&ctx, &t, Some(&[1]), false).unwrap();
    check_tensor_near(
        &result,
        &[2, 4],
        &[12.0, 15.0, 18.0, 21.0, 48.0, 51.0, 54.0, 57.0],
        1e-12,
    );
}

#[test]
fn test_sum_invalid_axis() {
    let ctx = GraphContext::new();
    let err = sum_op(&ctx, &matrix_2x3(), Some(&[2]), false).unwrap_err();
    assert_eq!(err, NeuroGradError::AxisOutOfBounds { axis: 2, rank: 2 });
}

#[test]
fn test_sum_backward_broadcasts() {
    let ctx = GraphContext::new();
    let t = create_test_tensor_with_grad(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let rows = sum_op(&ctx, &t, Some(&[1]), false).unwrap();
    let grads = rows.backward_with(create_test_tensor(vec![1.0, 2.0], vec![2])).unwrap();
    check_tensor_near(&grads.get(&t).unwrap(), &[2, 3], &[1.0, 1.0, 1.0, 2.0, 2.0, 2.0], 0.0);
}

#[test]
fn test_sum_grad_check() {
    let t = create_test_tensor_with_grad((0..12).map(|v| v as f64 * 0.3).collect(), vec![3, 4]);
    let output_grad = create_test_tensor(vec![1.0, -2.0, 0.5, 3.0], vec![4]);
    let result = check_grad(
        |ctx, inputs| sum_op(ctx, &inputs[0], Some(&[0]), false),
        &[t],
        &output_grad,
        1e-6,
        1e-5,
    );
    assert_eq!(result, Ok(()));
}
