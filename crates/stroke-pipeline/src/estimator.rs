//! Estimator seam at the end of the pipeline.
//!
//! Anything exposing fit/predict/predict_proba over a dense feature matrix
//! can close the pipeline; the composed pipeline is generic over it.

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::logistic_regression::{LogisticRegression, LogisticRegressionParameters};

/// A binary classifier usable as the final pipeline stage.
pub trait Estimator {
    /// Learn parameters from the feature matrix and 0/1 labels.
    fn fit(&mut self, x: &DenseMatrix<f64>, y: &[i32]) -> Result<()>;

    /// Predicted class label per row.
    fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<i32>>;

    /// Probability of the positive class per row, in [0, 1].
    fn predict_proba(&self, x: &DenseMatrix<f64>) -> Result<Vec<f64>>;
}

type FittedModel = LogisticRegression<f64, i32, DenseMatrix<f64>, Vec<i32>>;

/// Logistic-regression estimator backed by smartcore.
///
/// smartcore exposes no probability API, so `predict_proba` applies the
/// sigmoid to the fitted linear score read from the model's coefficients.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LogisticEstimator {
    model: Option<FittedModel>,
}

impl LogisticEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    fn fitted(&self) -> Result<&FittedModel> {
        self.model.as_ref().ok_or(PipelineError::NotFitted)
    }
}

impl Estimator for LogisticEstimator {
    fn fit(&mut self, x: &DenseMatrix<f64>, y: &[i32]) -> Result<()> {
        let labels: Vec<i32> = y.to_vec();
        let model = LogisticRegression::fit(x, &labels, LogisticRegressionParameters::default())
            .map_err(|e| PipelineError::Estimator(e.to_string()))?;
        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<i32>> {
        self.fitted()?
            .predict(x)
            .map_err(|e| PipelineError::Estimator(e.to_string()))
    }

    fn predict_proba(&self, x: &DenseMatrix<f64>) -> Result<Vec<f64>> {
        let model = self.fitted()?;
        let coefficients = model.coefficients();
        let intercept = *model.intercept().get((0, 0));

        let (rows, cols) = x.shape();
        let (coef_rows, _) = coefficients.shape();

        let mut probabilities = Vec::with_capacity(rows);
        for row in 0..rows {
            let mut score = intercept;
            for col in 0..cols {
                // Coefficient layout depends on the matrix orientation
                let weight = if coef_rows == 1 {
                    *coefficients.get((0, col))
                } else {
                    *coefficients.get((col, 0))
                };
                score += weight * *x.get((row, col));
            }
            probabilities.push(sigmoid(score));
        }
        Ok(probabilities)
    }
}

fn sigmoid(score: f64) -> f64 {
    1.0 / (1.0 + (-score).exp())
}
