//! Reverse-mode differentiation: graph recording, gradient storage and the concurrent
//! backward scheduler.

pub mod backward_op;
pub mod context;
pub mod dot;
pub mod engine;
pub mod grad_check;
pub mod grad_store;
pub(crate) mod graph;
pub mod origin;

pub use backward_op::{BackwardOp, FnBackward};
pub use context::GraphContext;
pub use engine::{backward, BackwardEngine};
pub use grad_store::GradStore;
pub use origin::Origin;
