pub mod sync;
pub mod testing;
