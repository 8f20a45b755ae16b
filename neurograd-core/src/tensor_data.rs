// src/tensor_data.rs
use std::sync::Arc;

use crate::error::NeuroGradError;
use crate::tensor::utils::calculate_strides;

/// Numeric storage and metadata for a tensor value.
///
/// The buffer is always contiguous and row-major. It sits behind an `Arc` so that
/// reshapes and detached copies share it instead of cloning the data.
#[derive(Debug, Clone)]
pub struct TensorData {
    /// The underlying element buffer.
    pub(crate) buffer: Arc<Vec<f64>>,
    /// The shape (dimensions) of the tensor. Empty for a scalar.
    pub(crate) shape: Vec<usize>,
    /// Contiguous strides matching `shape`.
    pub(crate) strides: Vec<usize>,
}

impl TensorData {
    /// Creates a new `TensorData` from a flat, row-major `Vec<f64>`.
    ///
    /// # Errors
    /// Returns `NeuroGradError::TensorCreationError` if the length of `data_vec` does not
    /// match the number of elements described by `shape`, or if that number overflows.
    pub fn new(data_vec: Vec<f64>, shape: Vec<usize>) -> Result<Self, NeuroGradError> {
        let data_len = data_vec.len();
        let numel = Self::checked_numel(&shape).ok_or_else(|| NeuroGradError::TensorCreationError {
            data_len,
            shape: shape.clone(),
        })?;
        if data_len != numel {
            return Err(NeuroGradError::TensorCreationError { data_len, shape });
        }
        let strides = calculate_strides(&shape);
        Ok(TensorData {
            buffer: Arc::new(data_vec),
            shape,
            strides,
        })
    }

    /// Creates a `TensorData` with every element set to `value`.
    pub fn filled(shape: &[usize], value: f64) -> Result<Self, NeuroGradError> {
        let numel = Self::numel_for(shape)?;
        Self::new(vec![value; numel], shape.to_vec())
    }

    /// Element count of `shape`, checked before anything is allocated.
    ///
    /// # Errors
    /// Returns `NeuroGradError::TensorCreationError` if the count overflows or the buffer
    /// would exceed the largest possible allocation.
    pub(crate) fn numel_for(shape: &[usize]) -> Result<usize, NeuroGradError> {
        Self::checked_numel(shape).ok_or_else(|| NeuroGradError::TensorCreationError {
            data_len: 0,
            shape: shape.to_vec(),
        })
    }

    /// Shares this buffer under a different shape with the same element count.
    pub(crate) fn reshaped(&self, shape: Vec<usize>) -> Result<Self, NeuroGradError> {
        if Self::checked_numel(&shape) != Some(self.numel()) {
            return Err(NeuroGradError::ShapeMismatch {
                expected: self.shape.clone(),
                actual: shape,
                operation: "reshape".to_string(),
            });
        }
        let strides = calculate_strides(&shape);
        Ok(TensorData {
            buffer: Arc::clone(&self.buffer),
            shape,
            strides,
        })
    }

    /// Element count, `None` if the product overflows or the `f64` buffer would not fit
    /// in `isize::MAX` bytes.
    fn checked_numel(shape: &[usize]) -> Option<usize> {
        shape
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .filter(|&numel| numel <= isize::MAX as usize / std::mem::size_of::<f64>())
    }

    pub fn numel(&self) -> usize {
        self.buffer.len()
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn as_slice(&self) -> &[f64] {
        self.buffer.as_slice()
    }

    /// Calculates the linear offset for the given multi-dimensional indices.
    /// Returns `None` if the rank differs or any index is out of bounds.
    pub fn get_offset(&self, indices: &[usize]) -> Option<usize> {
        if indices.len() != self.shape.len() {
            return None;
        }
        let mut offset = 0;
        for ((&idx, &dim), &stride) in indices.iter().zip(&self.shape).zip(&self.strides) {
            if idx >= dim {
                return None;
            }
            offset += idx * stride;
        }
        Some(offset)
    }
}
