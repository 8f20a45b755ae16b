//! NeuroGrad core: immutable tensor nodes, an operator catalog that records provenance,
//! and a concurrent reverse-mode backward pass.
//!
//! ```
//! use neurograd_core::autograd::GraphContext;
//! use neurograd_core::ops::arithmetic::mul_op;
//! use neurograd_core::ops::reduction::sum_op;
//! use neurograd_core::Tensor;
//!
//! let ctx = GraphContext::new();
//! let x = Tensor::new_with_grad(vec![1.0, 2.0, 3.0], vec![3]).unwrap();
//! let loss = sum_op(&ctx, &mul_op(&ctx, &x, &x).unwrap(), None, false).unwrap();
//! let grads = loss.backward().unwrap();
//! assert_eq!(grads.get(&x).unwrap().data(), vec![2.0, 4.0, 6.0]);
//! ```

pub mod autograd;
pub mod error;
pub mod ops;
pub mod tensor;
pub mod tensor_data;
pub mod utils;

pub use autograd::{backward, GradStore, GraphContext};
pub use error::NeuroGradError;
pub use tensor::{NodeId, Tensor};
