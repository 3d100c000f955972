//! The composed cleaning, preprocessing, and prediction pipeline.
//!
//! [`StrokePipeline`] is one fittable, invokable, serializable unit. Stage
//! failures are mapped to typed errors at each boundary; estimator
//! rejections surface unmodified.

use crate::cleaner::CleaningStage;
use crate::error::{PipelineError, Result, ResultExt};
use crate::estimator::Estimator;
use crate::preprocess::ColumnPreprocessor;
use crate::schema::FeatureSchema;
use polars::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::path::Path;
use tracing::{debug, info};

/// Cleaning, preprocessing, and a supplied estimator composed into a single
/// transform-and-predict unit.
#[derive(Debug, Serialize, Deserialize)]
pub struct StrokePipeline<E> {
    cleaner: CleaningStage,
    preprocessor: ColumnPreprocessor,
    estimator: E,
}

// A fitted pipeline is shared read-only across server workers
static_assertions::assert_impl_all!(
    StrokePipeline<crate::estimator::LogisticEstimator>: Send, Sync
);

impl<E: Estimator> StrokePipeline<E> {
    /// Compose the fixed stroke feature pipeline around the given estimator.
    /// Construction cannot fail.
    pub fn new(estimator: E) -> Self {
        Self::with_schema(FeatureSchema::stroke_features(), estimator)
    }

    /// Compose around a custom feature schema.
    pub fn with_schema(schema: FeatureSchema, estimator: E) -> Self {
        Self {
            cleaner: CleaningStage::new(),
            preprocessor: ColumnPreprocessor::new(schema),
            estimator,
        }
    }

    /// Clean and preprocess `rows`, then fit the estimator against `labels`.
    pub fn fit(&mut self, rows: &DataFrame, labels: &[i32]) -> Result<()> {
        if rows.height() != labels.len() {
            return Err(PipelineError::InvalidData(format!(
                "{} rows but {} labels",
                rows.height(),
                labels.len()
            )));
        }

        info!("Fitting pipeline on {} rows", rows.height());
        self.cleaner
            .fit(rows)
            .map_err(|e| PipelineError::CleaningFailed(e.to_string()))?;
        let cleaned = self
            .cleaner
            .transform(rows)
            .map_err(|e| PipelineError::CleaningFailed(e.to_string()))?;
        self.check_schema(&cleaned)?;
        let features = self
            .preprocessor
            .fit_transform(&cleaned)
            .map_err(|e| PipelineError::PreprocessingFailed(e.to_string()))?;

        let matrix = to_matrix(&features)?;
        self.estimator.fit(&matrix, labels)?;
        debug!("Fitted on {} feature columns", features.width());
        Ok(())
    }

    /// Predicted class label per row.
    pub fn predict(&self, rows: &DataFrame) -> Result<Vec<i32>> {
        let matrix = self.features(rows)?;
        self.estimator.predict(&matrix)
    }

    /// Probability of the positive class per row, in [0, 1].
    pub fn predict_proba(&self, rows: &DataFrame) -> Result<Vec<f64>> {
        let matrix = self.features(rows)?;
        self.estimator.predict_proba(&matrix)
    }

    /// Fitted feature layout, for interpretability tooling.
    pub fn feature_names(&self) -> Vec<String> {
        self.preprocessor.feature_names()
    }

    fn features(&self, rows: &DataFrame) -> Result<DenseMatrix<f64>> {
        let cleaned = self
            .cleaner
            .transform(rows)
            .map_err(|e| PipelineError::CleaningFailed(e.to_string()))?;
        self.check_schema(&cleaned)?;
        let features = self
            .preprocessor
            .transform(&cleaned)
            .map_err(|e| PipelineError::PreprocessingFailed(e.to_string()))?;
        to_matrix(&features)
    }

    /// A schema-declared column missing after cleaning is a schema violation
    /// and fails the request.
    fn check_schema(&self, cleaned: &DataFrame) -> Result<()> {
        for feature in self.preprocessor.schema().columns() {
            if cleaned.column(&feature.name).is_err() {
                return Err(PipelineError::ColumnNotFound(feature.name.clone()));
            }
        }
        Ok(())
    }
}

impl<E: Serialize> StrokePipeline<E> {
    /// Serialize the pipeline into an opaque artifact blob.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Write the artifact blob to disk.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes().context("Failed to serialize pipeline")?;
        std::fs::write(path, bytes)?;
        info!("Saved pipeline artifact to {}", path.display());
        Ok(())
    }
}

impl<E: DeserializeOwned> StrokePipeline<E> {
    /// Restore a pipeline from an artifact blob.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Read the artifact blob from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let pipeline = Self::from_bytes(&bytes)
            .context(format!("Failed to load pipeline artifact from {}", path.display()))?;
        info!("Loaded pipeline artifact from {}", path.display());
        Ok(pipeline)
    }
}

/// Flatten the preprocessed table into the dense matrix the estimator
/// consumes. Preprocessing leaves no nulls behind.
fn to_matrix(df: &DataFrame) -> Result<DenseMatrix<f64>> {
    let rows = df.height();
    let cols = df.width();

    let mut values = Vec::with_capacity(rows * cols);
    for column in df.get_columns() {
        let series = column.as_materialized_series().cast(&DataType::Float64)?;
        for value in series.f64()?.into_iter() {
            values.push(value.unwrap_or(0.0));
        }
    }

    Ok(DenseMatrix::new(rows, cols, values, true))
}
