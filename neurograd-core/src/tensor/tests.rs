use super::*;
use std::collections::HashSet;
use std::thread;

#[test]
fn test_new_tensor_is_plain_leaf() {
    let t = Tensor::new(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]).unwrap();
    assert_eq!(t.shape(), vec![2, 2]);
    assert_eq!(t.numel(), 4);
    assert_eq!(t.rank(), 2);
    assert!(!t.requires_grad());
    assert!(t.is_leaf());
    assert_eq!(t.generation(), 0);
    assert!(t.op_name().is_none());
}

#[test]
fn test_new_tensor_wrong_length() {
    let result = Tensor::new(vec![1.0, 2.0], vec![3]);
    assert!(matches!(result, Err(NeuroGradError::TensorCreationError { .. })));
}

#[test]
fn test_clone_shares_identity() {
    let t = Tensor::new_with_grad(vec![1.0], vec![1]).unwrap();
    let alias = t.clone();
    assert_eq!(t.id(), alias.id());
    assert!(Arc::ptr_eq(&t.node, &alias.node));
}

#[test]
fn test_ids_are_monotonic() {
    let a = Tensor::scalar(1.0);
    let b = Tensor::scalar(2.0);
    assert!(b.id() > a.id());
}

#[test]
fn test_ids_are_unique_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| thread::spawn(|| (0..250).map(|_| NodeId::next()).collect::<Vec<_>>()))
        .collect();
    let mut seen = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(seen.insert(id), "duplicate node id {}", id);
        }
    }
    assert_eq!(seen.len(), 1000);
}

#[test]
fn test_with_requires_grad_and_detach() {
    let t = Tensor::new(vec![1.0, 2.0], vec![2]).unwrap();
    let v = t.with_requires_grad(true);
    assert!(v.requires_grad());
    assert_ne!(v.id(), t.id());
    assert!(Arc::ptr_eq(&v.tensor_data().buffer, &t.tensor_data().buffer));

    let d = v.detach();
    assert!(!d.requires_grad());
    assert!(d.is_leaf());
    assert_eq!(d, v);
}

#[test]
fn test_item() {
    assert_eq!(Tensor::scalar(3.5).item().unwrap(), 3.5);
    assert_eq!(Tensor::new(vec![2.0], vec![1, 1]).unwrap().item().unwrap(), 2.0);
    assert!(Tensor::new(vec![1.0, 2.0], vec![2]).unwrap().item().is_err());
}

#[test]
fn test_value_equality_ignores_identity() {
    let a = Tensor::new(vec![1.0, 2.0], vec![2]).unwrap();
    let b = Tensor::new(vec![1.0, 2.0], vec![2]).unwrap();
    let c = Tensor::new(vec![1.0, 2.0], vec![1, 2]).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_debug_format() {
    let t = Tensor::new_with_grad(vec![1.0, 2.0], vec![2]).unwrap();
    let s = format!("{:?}", t);
    assert!(s.contains("shape=[2]"));
    assert!(s.contains("requires_grad=true"));
}
