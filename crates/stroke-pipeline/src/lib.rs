//! Stroke-Risk Feature Pipeline Library
//!
//! Feature cleaning, preprocessing, and prediction for the stroke-risk
//! binary classifier, built with Rust and Polars.
//!
//! # Overview
//!
//! This library provides the pipeline the prediction service runs behind:
//!
//! - **Cleaning Stage**: categorical normalization and the derived
//!   `ever_smoked` indicator
//! - **Feature Schema**: explicit declaration of each modeling column's
//!   semantic type, driving all column routing
//! - **Column Preprocessor**: constant-fill imputation plus one-hot encoding
//!   with an unknown-category indicator
//! - **Pipeline**: one fittable, invokable, serializable composition of the
//!   stages around a supplied estimator
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use stroke_pipeline::{LogisticEstimator, StrokePipeline, record};
//!
//! // Fit once on labeled rows and persist the artifact
//! let mut pipeline = StrokePipeline::new(LogisticEstimator::new());
//! pipeline.fit(&rows, &labels)?;
//! pipeline.save("model.json")?;
//!
//! // Serve: load once, predict per request
//! let pipeline = StrokePipeline::<LogisticEstimator>::load("model.json")?;
//! let df = record::to_dataframe(&[patient])?;
//! let probability = pipeline.predict_proba(&df)?[0];
//! ```
//!
//! # Error Handling
//!
//! All fallible operations on the composed pipeline return
//! [`Result<T, PipelineError>`](error::Result). Unknown categorical values
//! and missing numeric/flag values are recovered locally and never error;
//! schema violations and estimator rejections fail the operation.

pub mod cleaner;
pub mod error;
pub mod estimator;
pub mod pipeline;
pub mod preprocess;
pub mod record;
pub mod schema;

// Re-exports for convenient access
pub use cleaner::CleaningStage;
pub use error::{PipelineError, Result as PipelineResult, ResultExt};
pub use estimator::{Estimator, LogisticEstimator};
pub use pipeline::StrokePipeline;
pub use preprocess::{ColumnPreprocessor, Imputer, OneHotEncoder, Scaler};
pub use record::{PatientRecord, YesNo};
pub use schema::{FeatureColumn, FeatureKind, FeatureSchema};
