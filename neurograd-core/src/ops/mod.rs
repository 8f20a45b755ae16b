//! # Tensor Operations Module (`ops`)
//!
//! The catalog of differentiable primitives. Operations are grouped by family.
//!
//! ## Structure:
//!
//! - **`_op` Functions:** Each operation has a public function (named `xxx_op`) taking a
//!   [`GraphContext`](crate::autograd::GraphContext) first. It computes the forward value
//!   and, when the context records and an input requires grad, wires the backward step
//!   through `GraphContext::record`.
//! - **`Backward` Structs:** Each operation has a corresponding struct (e.g. `AddBackward`,
//!   `MatmulBackward`) implementing [`BackwardOp`](crate::autograd::BackwardOp). It keeps
//!   the forward-time values its gradient needs. Gradients are computed with the same
//!   primitives under a non-recording context and are reduced to each input's shape.
//!
//! ## Submodules:
//!
//! - [`arithmetic`]: Element-wise arithmetic with broadcasting (add, sub, mul, div, ...).
//! - [`math_elem`]: Element-wise math functions (sqrt, exp, ln, sin, tanh, ...).
//! - [`reduction`]: Sum, sum-to-shape, global max and min.
//! - [`view`]: Shape manipulation (broadcast_to, reshape, transpose).
//! - [`linalg`]: Matrix multiplication.

use crate::error::NeuroGradError;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;

pub mod arithmetic;
pub mod linalg;
pub mod math_elem;
pub mod reduction;
pub mod view;

/// Applies `op` to every element of `a`, keeping its shape.
pub(crate) fn map_elements<F>(a: &TensorData, op: F) -> Result<TensorData, NeuroGradError>
where
    F: Fn(f64) -> f64,
{
    let data_vec = a.as_slice().iter().map(|&v| op(v)).collect();
    TensorData::new(data_vec, a.shape().to_vec())
}

/// `grad_output * derivative(source)` element by element, as a plain tensor.
///
/// `source` is a forward-time input or output whose shape equals `grad_output`'s.
pub(crate) fn scale_by_derivative<F>(
    grad_output: &Tensor,
    source: &TensorData,
    derivative: F,
    op_name: &str,
) -> Result<Tensor, NeuroGradError>
where
    F: Fn(f64) -> f64,
{
    if grad_output.tensor_data().shape() != source.shape() {
        return Err(NeuroGradError::ShapeMismatch {
            expected: source.shape().to_vec(),
            actual: grad_output.shape(),
            operation: format!("{} backward", op_name),
        });
    }
    let data_vec = grad_output
        .tensor_data()
        .as_slice()
        .iter()
        .zip(source.as_slice())
        .map(|(&g, &s)| g * derivative(s))
        .collect();
    Tensor::new(data_vec, source.shape().to_vec())
}
