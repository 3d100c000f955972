//! Request and response types for the prediction endpoint.

use serde::Serialize;

pub use stroke_pipeline::PatientRecord;

/// Response body of the prediction endpoint.
#[derive(Debug, Serialize)]
pub struct PredictionOut {
    pub predicted_probability: f64,
    pub high_stroke_risk: i32,
}
