use super::*;
use crate::autograd::grad_check::check_grad;
use crate::utils::testing::{check_tensor_near, create_test_tensor, create_test_tensor_with_grad};
use std::f64::consts::E;

#[test]
fn test_ln_forward() {
    let ctx = GraphContext::new();
    let t = create_test_tensor(vec![1.0, E, E * E], vec![3]);
    let result = ln_op(&ctx, &t).unwrap();
    check_tensor_near(&result, &[3], &[0.0, 1.0, 2.0], 1e-12);
}

#[test]
fn test_ln_forward_non_positive() {
    let ctx = GraphContext::new();
    let t = create_test_tensor(vec![0.0, -1.0], vec![2]);
    let result = ln_op(&ctx, &t).unwrap().data();
    assert_eq!(result[0], f64::NEG_INFINITY);
    assert!(result[1].is_nan());
}

#[test]
fn test_ln_backward() {
    let ctx = GraphContext::new();
    let t = create_test_tensor_with_grad(vec![1.0, 2.0, 4.0], vec![3]);
    let result = ln_op(&ctx, &t).unwrap();
    let grads = result.backward_with(create_test_tensor(vec![1.0, 1.0, 2.0], vec![3])).unwrap();
    check_tensor_near(&grads.get(&t).unwrap(), &[3], &[1.0, 0.5, 0.5], 1e-12);
}

#[test]
fn test_ln_grad_check() {
    let t = create_test_tensor_with_grad(vec![0.5, 1.5, 3.0, 10.0], vec![2, 2]);
    let output_grad = create_test_tensor(vec![1.0, -2.0, 0.5, 1.0], vec![2, 2]);
    let result = check_grad(|ctx, inputs| ln_op(ctx, &inputs[0]), &[t], &output_grad, 1e-6, 1e-5);
    assert_eq!(result, Ok(()));
}
