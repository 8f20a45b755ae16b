use crate::autograd::{BackwardOp, GraphContext};
use crate::error::NeuroGradError;
use crate::ops::map_elements;
use crate::tensor::Tensor;

#[derive(Debug)]
struct NegBackward;

impl BackwardOp for NegBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, NeuroGradError> {
        Ok(vec![neg_op(&GraphContext::no_grad(), grad_output)?])
    }
}

/// Element-wise negation `-a`.
pub fn neg_op(ctx: &GraphContext, a: &Tensor) -> Result<Tensor, NeuroGradError> {
    let data = map_elements(a.tensor_data(), |x| -x)?;
    Ok(ctx.record("neg", &[a], data, || NegBackward))
}

#[cfg(test)]
#[path = "neg_test.rs"]
mod tests;
