use super::*;
use crate::autograd::grad_check::check_grad;
use crate::utils::testing::{check_tensor_near, create_test_tensor, create_test_tensor_with_grad};

#[test]
fn test_div_ok() {
    let ctx = GraphContext::new();
    let a = create_test_tensor(vec![6.0, 8.0, 9.0], vec![3]);
    let b = create_test_tensor(vec![2.0, 4.0, 3.0], vec![3]);
    let result = div_op(&ctx, &a, &b).unwrap();
    check_tensor_near(&result, &[3], &[3.0, 2.0, 3.0], 1e-12);
}

#[test]
fn test_div_by_zero_is_ieee() {
    let ctx = GraphContext::new();
    let a = create_test_tensor(vec![1.0, 0.0], vec![2]);
    let b = create_test_tensor(vec![0.0, 0.0], vec![2]);
    let result = div_op(&ctx, &a, &b).unwrap().data();
    assert!(result[0].is_infinite());
    assert!(result[1].is_nan());
}

#[test]
fn test_div_backward() {
    let a = create_test_tensor(vec![3.0], vec![1]);
    let b = create_test_tensor(vec![2.0], vec![1]);
    let backward = DivBackward { a, b };
    let grads = backward.backward(&create_test_tensor(vec![1.0], vec![1])).unwrap();
    check_tensor_near(&grads[0], &[1], &[0.5], 1e-12);
    check_tensor_near(&grads[1], &[1], &[-0.75], 1e-12);
}

#[test]
fn test_div_grad_check_broadcast() {
    let a = create_test_tensor_with_grad(vec![1.0, 2.0, -3.0, 4.0], vec![2, 2]);
    let b = create_test_tensor_with_grad(vec![2.0, -4.0], vec![2, 1]);
    let output_grad = create_test_tensor(vec![1.0, -1.0, 0.5, 2.0], vec![2, 2]);
    let result = check_grad(|ctx, inputs| div_op(ctx, &inputs[0], &inputs[1]), &[a, b], &output_grad, 1e-6, 1e-5);
    assert_eq!(result, Ok(()));
}
