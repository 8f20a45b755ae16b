// src/tensor/create.rs

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::error::NeuroGradError;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;

/// Creates a new leaf tensor filled with zeros with the specified shape.
pub fn zeros(shape: &[usize]) -> Result<Tensor, NeuroGradError> {
    full(shape, 0.0)
}

/// Creates a new leaf tensor filled with ones with the specified shape.
pub fn ones(shape: &[usize]) -> Result<Tensor, NeuroGradError> {
    full(shape, 1.0)
}

/// Creates a new leaf tensor filled with `value` with the specified shape.
pub fn full(shape: &[usize], value: f64) -> Result<Tensor, NeuroGradError> {
    Ok(Tensor::from_data(TensorData::filled(shape, value)?, false))
}

/// Zero-filled leaf shaped like `tensor`. This is the gradient table's default entry.
pub fn zeros_like(tensor: &Tensor) -> Result<Tensor, NeuroGradError> {
    zeros(tensor.tensor_data().shape())
}

/// One-filled leaf shaped like `tensor`. Used to seed scalar roots.
pub fn ones_like(tensor: &Tensor) -> Result<Tensor, NeuroGradError> {
    ones(tensor.tensor_data().shape())
}

/// Values `start, start + step, ...` up to but excluding `end`.
///
/// # Errors
/// Returns `NeuroGradError::UnsupportedOperation` for a non-finite argument or a step that
/// does not move towards `end`, and `TensorCreationError` if the range is too long to
/// allocate.
pub fn arange(start: f64, end: f64, step: f64) -> Result<Tensor, NeuroGradError> {
    let invalid = || {
        NeuroGradError::UnsupportedOperation(format!("Invalid step {} for arange({}, {})", step, start, end))
    };
    if !(start.is_finite() && end.is_finite() && step.is_finite()) {
        return Err(invalid());
    }
    if (end > start && step <= 0.0) || (end < start && step >= 0.0) || step == 0.0 {
        return Err(invalid());
    }
    let count = ((end - start) / step).ceil();
    if !count.is_finite() {
        return Err(invalid());
    }
    // `as` saturates for huge counts, which the allocation check then rejects.
    let numel = TensorData::numel_for(&[count as usize])?;
    let data_vec: Vec<f64> = (0..numel).map(|i| start + i as f64 * step).collect();
    Tensor::new(data_vec, vec![numel])
}

/// Uniform samples in `[low, high)` drawn from the caller's generator.
pub fn rand_uniform<R: Rng + ?Sized>(
    shape: &[usize],
    low: f64,
    high: f64,
    rng: &mut R,
) -> Result<Tensor, NeuroGradError> {
    if !(low < high && (high - low).is_finite()) {
        return Err(NeuroGradError::UnsupportedOperation(format!(
            "rand_uniform requires a finite range with low < high, got [{}, {})",
            low, high
        )));
    }
    let numel = TensorData::numel_for(shape)?;
    let data_vec: Vec<f64> = (0..numel).map(|_| rng.gen_range(low..high)).collect();
    Tensor::new(data_vec, shape.to_vec())
}

/// Standard normal samples drawn from the caller's generator.
pub fn randn<R: Rng + ?Sized>(shape: &[usize], rng: &mut R) -> Result<Tensor, NeuroGradError> {
    let numel = TensorData::numel_for(shape)?;
    let data_vec: Vec<f64> = (0..numel).map(|_| StandardNormal.sample(&mut *rng)).collect();
    Tensor::new(data_vec, shape.to_vec())
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
