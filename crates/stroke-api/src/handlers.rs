//! Route handlers for the prediction service.

use crate::models::{PatientRecord, PredictionOut};
use actix_web::{Error, HttpResponse, Result, web};
use stroke_pipeline::{LogisticEstimator, PipelineError, StrokePipeline, record};
use tracing::{debug, error};

/// Probability at or above which a record is labeled high risk.
const HIGH_RISK_THRESHOLD: f64 = 0.5;

/// The fitted pipeline shared read-only across workers.
pub type SharedPipeline = StrokePipeline<LogisticEstimator>;

fn high_risk(probability: f64) -> i32 {
    i32::from(probability >= HIGH_RISK_THRESHOLD)
}

/// Pipeline errors reach the client as `{code, message}` with status 500.
fn pipeline_error(e: &PipelineError) -> HttpResponse {
    error!("Prediction failed: {}", e);
    HttpResponse::InternalServerError().json(e)
}

pub async fn home() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Stroke Risk Prediction App"
    }))
}

pub async fn predict(
    data: web::Json<PatientRecord>,
    pipeline: web::Data<SharedPipeline>,
) -> Result<HttpResponse, Error> {
    let patient = data.into_inner();

    let df = match record::to_dataframe(std::slice::from_ref(&patient)) {
        Ok(df) => df,
        Err(e) => return Ok(pipeline_error(&e)),
    };

    let probability = match pipeline.predict_proba(&df) {
        Ok(probabilities) => match probabilities.first().copied() {
            Some(p) => p,
            None => {
                let e = PipelineError::InvalidData("empty prediction batch".to_string());
                return Ok(pipeline_error(&e));
            }
        },
        Err(e) => return Ok(pipeline_error(&e)),
    };

    let out = PredictionOut {
        predicted_probability: probability,
        high_stroke_risk: high_risk(probability),
    };
    debug!(
        "predicted probability {:.3} -> high risk {}",
        probability, out.high_stroke_risk
    );

    Ok(HttpResponse::Ok().json(out))
}
