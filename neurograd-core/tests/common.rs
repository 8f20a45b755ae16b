use neurograd_core::autograd::GraphContext;
use neurograd_core::ops::arithmetic::{add_op, mul_op, mul_scalar_op, sub_op};
use neurograd_core::ops::math_elem::{sin_op, tanh_op};
use neurograd_core::ops::reduction::sum_op;
use neurograd_core::Tensor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// Shared by several test crates; not every crate uses every helper.
#[allow(dead_code)]
pub fn leaf(data: Vec<f64>, shape: Vec<usize>) -> Tensor {
    Tensor::new_with_grad(data, shape).expect("Test tensor creation failed")
}

#[allow(dead_code)]
pub fn constant(data: Vec<f64>, shape: Vec<usize>) -> Tensor {
    Tensor::new(data, shape).expect("Test tensor creation failed")
}

/// Builds a reproducible random graph over `leaves` and returns a scalar loss.
///
/// Every step combines one or two earlier nodes, so intermediate results are reused
/// many times and the graph is full of fan-out and fan-in.
#[allow(dead_code)]
pub fn random_graph(ctx: &GraphContext, leaves: &[Tensor], steps: usize, seed: u64) -> Tensor {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pool: Vec<Tensor> = leaves.to_vec();
    for _ in 0..steps {
        let a = pool[rng.gen_range(0..pool.len())].clone();
        let b = pool[rng.gen_range(0..pool.len())].clone();
        let next = match rng.gen_range(0..6) {
            0 => add_op(ctx, &a, &b),
            1 => sub_op(ctx, &a, &b),
            2 => mul_op(ctx, &tanh_op(ctx, &a).unwrap(), &b),
            3 => sin_op(ctx, &a),
            4 => tanh_op(ctx, &b),
            _ => mul_scalar_op(ctx, &a, rng.gen_range(-1.0..1.0)),
        }
        .expect("random graph op failed");
        pool.push(next);
    }
    let mut loss = sum_op(ctx, &pool[pool.len() - 1], None, false).unwrap();
    for node in pool.iter().rev().step_by(7) {
        let partial = sum_op(ctx, node, None, false).unwrap();
        loss = add_op(ctx, &loss, &partial).unwrap();
    }
    loss
}

#[allow(dead_code)]
pub fn bits(t: &Tensor) -> Vec<u64> {
    t.data().iter().map(|v| v.to_bits()).collect()
}
