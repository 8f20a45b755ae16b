pub mod max_min;
pub mod sum;
pub mod sum_to;

pub use max_min::{max_op, min_op};
pub use sum::sum_op;
pub use sum_to::sum_to_op;
