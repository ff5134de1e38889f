//! Function objects accepted by the tessellators.
//!
//! Any `Fn(f64) -> f64` / `Fn(f64, f64) -> f64` closure works, as does a
//! parsed [`Expression`](super::Expression). Implementations must be `Sync`
//! so grids can be sampled on the rayon pool when `parallel` is enabled.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("function returned non-finite value {value} at {input:?}")]
    NonFinite { input: Vec<f64>, value: f64 },
    #[error("expression error: {0}")]
    Expression(String),
}

/// `t -> value`, used for parametric curves.
pub trait Function1: Sync {
    fn evaluate(&self, t: f64) -> Result<f64, EvaluationError>;

    /// Like [`evaluate`](Self::evaluate) but rejects NaN and infinities.
    fn evaluate_finite(&self, t: f64) -> Result<f64, EvaluationError> {
        let value = self.evaluate(t)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvaluationError::NonFinite {
                input: vec![t],
                value,
            })
        }
    }
}

/// `(a, b) -> value`, used for height fields (`x, y`) and parametric
/// surfaces (`u, v`).
pub trait Function2: Sync {
    fn evaluate(&self, a: f64, b: f64) -> Result<f64, EvaluationError>;

    fn evaluate_finite(&self, a: f64, b: f64) -> Result<f64, EvaluationError> {
        let value = self.evaluate(a, b)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvaluationError::NonFinite {
                input: vec![a, b],
                value,
            })
        }
    }
}

impl<F> Function1 for F
where
    F: Fn(f64) -> f64 + Sync,
{
    fn evaluate(&self, t: f64) -> Result<f64, EvaluationError> {
        Ok(self(t))
    }
}

impl<F> Function2 for F
where
    F: Fn(f64, f64) -> f64 + Sync,
{
    fn evaluate(&self, a: f64, b: f64) -> Result<f64, EvaluationError> {
        Ok(self(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample2(f: &impl Function2) -> Result<f64, EvaluationError> {
        f.evaluate_finite(3.0, 4.0)
    }

    #[test]
    fn closures_are_functions() {
        assert_eq!(sample2(&|x: f64, y: f64| x.hypot(y)), Ok(5.0));
        assert_eq!((|t: f64| t * 2.0).evaluate_finite(1.5), Ok(3.0));
    }

    #[test]
    fn non_finite_results_are_rejected() {
        let err = sample2(&|x: f64, _y: f64| (x - 3.0).ln()).unwrap_err();
        assert_eq!(
            err,
            EvaluationError::NonFinite {
                input: vec![3.0, 4.0],
                value: f64::NEG_INFINITY
            }
        );

        let err = (|_t: f64| f64::NAN).evaluate_finite(0.25).unwrap_err();
        assert!(matches!(err, EvaluationError::NonFinite { .. }));
    }
}
