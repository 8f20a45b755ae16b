use approx::relative_eq;
use thiserror::Error;

use crate::autograd::{backward, GradStore, GraphContext};
use crate::error::NeuroGradError;
use crate::ops::arithmetic::mul_op;
use crate::ops::reduction::sum_op;
use crate::tensor::Tensor;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for input tensor at index {input_index}, element index {element_index}: Analytical grad {analytical_grad:?} != Numerical grad {numerical_grad:?}. Difference: {difference:?}")]
    GradientMismatch {
        input_index: usize,
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },
    #[error("Forward function execution failed during gradient check: {0}")]
    ForwardPassError(NeuroGradError),
    #[error("Backward pass execution failed during gradient check: {0}")]
    BackwardPassError(NeuroGradError),
    #[error("Tensor error during intermediate calculation: {0}")]
    TensorError(NeuroGradError),
    #[error("Input tensor {input_index} requires grad but has no gradient after backward pass.")]
    MissingAnalyticalGrad { input_index: usize },
    #[error("Numerical gradient is NaN or infinite for input {input_index}, element {element_index}. Details: Loss+: {loss_plus:?}, Loss-: {loss_minus:?}")]
    NumericalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },
    #[error("Analytical gradient is NaN or infinite for input {input_index}, element {element_index}. Value: {value:?}")]
    AnalyticalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        value: f64,
    },
    #[error("Gradient check input tensor must be a leaf node. Input index: {input_index}")]
    InputNotLeaf { input_index: usize },
    #[error("Function did not propagate requires_grad correctly.")]
    RequiresGradPropagationError,
}

impl From<NeuroGradError> for GradCheckError {
    fn from(err: NeuroGradError) -> Self {
        GradCheckError::TensorError(err)
    }
}

/// Checks analytical gradients against numerical gradients using central finite differences.
///
/// `func` is run once under a recording context and backpropagated with `output_grad` as
/// seed. Then, for every element of every differentiable input, the scalar
/// `sum(func(inputs) * output_grad)` is evaluated at `x + epsilon` and `x - epsilon`
/// without recording, and the resulting slope is compared with the analytical gradient.
/// Two values agree if they are within `tolerance` absolutely or relatively.
pub fn check_grad<F>(
    func: F,
    inputs: &[Tensor],
    output_grad: &Tensor,
    epsilon: f64,
    tolerance: f64,
) -> Result<(), GradCheckError>
where
    F: Fn(&GraphContext, &[Tensor]) -> Result<Tensor, NeuroGradError>,
{
    for (i, input) in inputs.iter().enumerate() {
        if !input.is_leaf() {
            return Err(GradCheckError::InputNotLeaf { input_index: i });
        }
    }

    let output = func(&GraphContext::new(), inputs).map_err(GradCheckError::ForwardPassError)?;
    if inputs.iter().any(Tensor::requires_grad) && !output.requires_grad() {
        return Err(GradCheckError::RequiresGradPropagationError);
    }

    let seeds = GradStore::new();
    seeds.set(&output, output_grad.clone());
    let grads = backward(std::slice::from_ref(&output), Some(seeds)).map_err(GradCheckError::BackwardPassError)?;

    let eval = GraphContext::no_grad();
    for (i, original_input) in inputs.iter().enumerate() {
        if !original_input.requires_grad() {
            continue;
        }
        let analytical = grads
            .get(original_input)
            .ok_or(GradCheckError::MissingAnalyticalGrad { input_index: i })?
            .data();
        let original_data = original_input.data();

        for elem_idx in 0..original_input.numel() {
            let loss_at = |delta: f64| -> Result<f64, GradCheckError> {
                let mut perturbed_data = original_data.clone();
                perturbed_data[elem_idx] += delta;
                let mut perturbed_inputs = inputs.to_vec();
                perturbed_inputs[i] = Tensor::new(perturbed_data, original_input.shape())?;
                let perturbed_output = func(&eval, &perturbed_inputs).map_err(GradCheckError::ForwardPassError)?;
                calculate_loss(&eval, &perturbed_output, output_grad)
            };
            let loss_plus = loss_at(epsilon)?;
            let loss_minus = loss_at(-epsilon)?;
            let numerical_grad = (loss_plus - loss_minus) / (2.0 * epsilon);
            let analytical_grad = analytical[elem_idx];

            if !numerical_grad.is_finite() {
                return Err(GradCheckError::NumericalGradNaNOrInfinite {
                    input_index: i,
                    element_index: elem_idx,
                    loss_plus,
                    loss_minus,
                });
            }
            if !analytical_grad.is_finite() {
                return Err(GradCheckError::AnalyticalGradNaNOrInfinite {
                    input_index: i,
                    element_index: elem_idx,
                    value: analytical_grad,
                });
            }
            if !relative_eq!(analytical_grad, numerical_grad, epsilon = tolerance, max_relative = tolerance) {
                return Err(GradCheckError::GradientMismatch {
                    input_index: i,
                    element_index: elem_idx,
                    analytical_grad,
                    numerical_grad,
                    difference: (analytical_grad - numerical_grad).abs(),
                });
            }
        }
    }

    Ok(())
}

/// `sum(output * output_grad)`, the scalar whose gradient is seeded by `output_grad`.
fn calculate_loss(ctx: &GraphContext, output: &Tensor, output_grad: &Tensor) -> Result<f64, GradCheckError> {
    if output.shape() != output_grad.shape() {
        return Err(GradCheckError::TensorError(NeuroGradError::ShapeMismatch {
            expected: output.shape(),
            actual: output_grad.shape(),
            operation: "calculate_loss (grad_check)".to_string(),
        }));
    }
    let weighted = mul_op(ctx, output, output_grad)?;
    Ok(sum_op(ctx, &weighted, None, false)?.item()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::FnBackward;
    use crate::ops::math_elem::exp_op;

    #[test]
    fn test_check_grad_accepts_correct_gradient() {
        let x = Tensor::new_with_grad(vec![0.5, -1.0, 2.0], vec![3]).unwrap();
        let y = Tensor::new_with_grad(vec![1.5, 2.0, -0.5], vec![3]).unwrap();
        let output_grad = Tensor::new(vec![1.0, -2.0, 0.5], vec![3]).unwrap();
        let result = check_grad(
            |ctx, inputs| {
                let e = exp_op(ctx, &inputs[0])?;
                mul_op(ctx, &e, &inputs[1])
            },
            &[x, y],
            &output_grad,
            1e-6,
            1e-5,
        );
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_check_grad_detects_wrong_gradient() {
        let x = Tensor::new_with_grad(vec![1.0, 2.0], vec![2]).unwrap();
        let output_grad = Tensor::new(vec![1.0, 1.0], vec![2]).unwrap();
        let result = check_grad(
            |ctx, inputs| {
                ctx.apply(
                    "square_with_bad_grad",
                    inputs,
                    |inputs| {
                        let squared = inputs[0].data().iter().map(|v| v * v).collect();
                        crate::tensor_data::TensorData::new(squared, inputs[0].shape())
                    },
                    FnBackward::new("square_with_bad_grad", |g: &Tensor| Ok(vec![g.clone()])),
                )
            },
            &[x],
            &output_grad,
            1e-6,
            1e-5,
        );
        assert!(matches!(
            result,
            Err(GradCheckError::GradientMismatch {
                input_index: 0,
                element_index: 0,
                ..
            })
        ));
    }

    #[test]
    fn test_check_grad_rejects_non_leaf_input() {
        let ctx = GraphContext::new();
        let x = Tensor::new_with_grad(vec![1.0], vec![1]).unwrap();
        let y = mul_op(&ctx, &x, &x).unwrap();
        let output_grad = Tensor::new(vec![1.0], vec![1]).unwrap();
        let result = check_grad(|ctx, inputs| mul_op(ctx, &inputs[0], &inputs[0]), &[y], &output_grad, 1e-6, 1e-5);
        assert_eq!(result, Err(GradCheckError::InputNotLeaf { input_index: 0 }));
    }
}
