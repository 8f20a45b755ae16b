use rayon::prelude::*;

use crate::autograd::{BackwardOp, GraphContext};
use crate::error::NeuroGradError;
use crate::ops::view::transpose_op;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;

// --- Kernel ---

/// `[m, k] x [k, n] -> [m, n]`, rows computed in parallel.
///
/// Each output element is accumulated sequentially over `k`, so the result does not
/// depend on how rows are scheduled.
fn matmul_kernel(a: &TensorData, b: &TensorData) -> Result<TensorData, NeuroGradError> {
    for operand in [a, b] {
        if operand.shape().len() != 2 {
            return Err(NeuroGradError::RankMismatch {
                expected: 2,
                actual: operand.shape().len(),
            });
        }
    }
    let (m, k) = (a.shape()[0], a.shape()[1]);
    let (k2, n) = (b.shape()[0], b.shape()[1]);
    if k != k2 {
        return Err(NeuroGradError::ShapeMismatch {
            expected: vec![k, n],
            actual: b.shape().to_vec(),
            operation: "matmul (inner dimensions)".to_string(),
        });
    }

    let a_data = a.as_slice();
    let b_data = b.as_slice();
    let mut out_data = vec![0.0; m * n];
    if n > 0 {
        out_data.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
            for (j, out) in row.iter_mut().enumerate() {
                let mut sum = 0.0;
                for l in 0..k {
                    sum += a_data[i * k + l] * b_data[l * n + j];
                }
                *out = sum;
            }
        });
    }
    TensorData::new(out_data, vec![m, n])
}

// --- Backward Operation ---

#[derive(Debug)]
struct MatmulBackward {
    a: Tensor,
    b: Tensor,
}

impl BackwardOp for MatmulBackward {
    /// dL/dA = dL/dC @ B^T, dL/dB = A^T @ dL/dC.
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuroGradError> {
        let ctx = GraphContext::no_grad();
        let b_t = transpose_op(&ctx, &self.b, 0, 1)?;
        let a_t = transpose_op(&ctx, &self.a, 0, 1)?;
        let grad_a = matmul_op(&ctx, grad_output, &b_t)?;
        let grad_b = matmul_op(&ctx, &a_t, grad_output)?;
        Ok(vec![grad_a, grad_b])
    }
}

// --- Forward Operation ---

/// Matrix product of two 2-D tensors.
///
/// # Errors
/// * `RankMismatch` if either operand is not 2-D.
/// * `ShapeMismatch` if the inner dimensions differ.
pub fn matmul_op(ctx: &GraphContext, a: &Tensor, b: &Tensor) -> Result<Tensor, NeuroGradError> {
    let data = matmul_kernel(a.tensor_data(), b.tensor_data())?;
    Ok(ctx.record("matmul", &[a, b], data, || MatmulBackward {
        a: a.detach(),
        b: b.detach(),
    }))
}

#[cfg(test)]
#[path = "matmul_test.rs"]
mod tests;
