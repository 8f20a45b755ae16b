use std::fmt;
use std::sync::Arc;

use crate::autograd::BackwardOp;
use crate::tensor::Tensor;

/// Provenance of a recorded tensor: which primitive produced it, from which inputs, and
/// how to turn its gradient into gradients for those inputs.
///
/// `inputs` keeps every input in call order, differentiable or not, so that the vector
/// returned by `backward` lines up with it index by index.
#[derive(Clone)]
pub struct Origin {
    op_name: &'static str,
    inputs: Vec<Tensor>,
    backward: Arc<dyn BackwardOp>,
}

impl Origin {
    pub(crate) fn new(op_name: &'static str, inputs: Vec<Tensor>, backward: Arc<dyn BackwardOp>) -> Self {
        Origin {
            op_name,
            inputs,
            backward,
        }
    }

    pub fn op_name(&self) -> &'static str {
        self.op_name
    }

    pub fn inputs(&self) -> &[Tensor] {
        &self.inputs
    }

    pub fn backward_op(&self) -> &Arc<dyn BackwardOp> {
        &self.backward
    }
}

impl fmt::Debug for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let input_ids: Vec<usize> = self.inputs.iter().map(|t| t.id().0).collect();
        f.debug_struct("Origin")
            .field("op_name", &self.op_name)
            .field("inputs", &input_ids)
            .field("backward", &self.backward)
            .finish()
    }
}
