//! Shape manipulation. Storage is always contiguous, so ops that reorder elements copy
//! them while `reshape` shares the buffer.

pub mod broadcast_to;
pub mod reshape;
pub mod transpose;

pub use broadcast_to::broadcast_to_op;
pub use reshape::reshape_op;
pub use transpose::transpose_op;
