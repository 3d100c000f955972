//! Cleaning stage for raw patient rows.
//!
//! Normalizes the free-text categorical fields, derives the `ever_smoked`
//! indicator, and drops the columns excluded from the modeling feature set.
//! The transform operates on a copy of its input and degrades malformed or
//! out-of-vocabulary categorical values to missing instead of failing.

use anyhow::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Raw columns removed from the feature set after cleaning.
pub const DROPPED_COLUMNS: [&str; 3] = ["smoking_status", "work_type", "ever_married"];

const GENDER_VOCABULARY: [&str; 2] = ["male", "female"];

/// Age below which an "unknown" smoking status is read as never smoked
/// rather than as a data gap.
const CHILD_AGE_CUTOFF: f64 = 10.0;

/// Stateless cleaning transform over a patient-row table.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CleaningStage;

impl CleaningStage {
    pub fn new() -> Self {
        Self
    }

    /// No learned parameters; fitting always succeeds.
    pub fn fit(&mut self, _rows: &DataFrame) -> Result<()> {
        Ok(())
    }

    /// Clean a copy of `rows`, returning a table of the same row count.
    ///
    /// Steps touching a column are skipped when that column is absent, which
    /// makes the transform idempotent on already-cleaned output.
    pub fn transform(&self, rows: &DataFrame) -> Result<DataFrame> {
        let mut out = rows.clone();

        if out.column("gender").is_ok() {
            out = normalize_gender(out)?;
        }
        if out.column("smoking_status").is_ok() {
            out = normalize_smoking_status(out)?;
            out = derive_ever_smoked(out)?;
        }

        let present: Vec<PlSmallStr> = DROPPED_COLUMNS
            .iter()
            .filter(|name| out.column(name).is_ok())
            .map(|name| (*name).into())
            .collect();
        if !present.is_empty() {
            out = out.drop_many(present);
        }

        Ok(out)
    }
}

/// Lowercase `gender`; any value outside the recognized vocabulary becomes
/// missing.
fn normalize_gender(mut df: DataFrame) -> Result<DataFrame> {
    let series = df.column("gender")?.as_materialized_series().clone();
    let str_series = series.str()?;

    let mut values: Vec<Option<String>> = Vec::with_capacity(str_series.len());
    let mut degraded = 0usize;
    for opt_val in str_series.into_iter() {
        match opt_val {
            Some(raw) => {
                let lowered = raw.trim().to_lowercase();
                if GENDER_VOCABULARY.contains(&lowered.as_str()) {
                    values.push(Some(lowered));
                } else {
                    degraded += 1;
                    values.push(None);
                }
            }
            None => values.push(None),
        }
    }

    if degraded > 0 {
        debug!("gender: {} out-of-vocabulary values set to missing", degraded);
    }

    df.replace("gender", Series::new("gender".into(), values))?;
    Ok(df)
}

/// Canonicalize `smoking_status`: lowercase with internal whitespace
/// collapsed to underscores. "unknown" for a child under the age cutoff is
/// rewritten to "never_smoked"; any remaining "unknown" becomes missing.
fn normalize_smoking_status(mut df: DataFrame) -> Result<DataFrame> {
    let series = df.column("smoking_status")?.as_materialized_series().clone();
    let ages: Vec<Option<f64>> = match df.column("age") {
        Ok(col) => col
            .as_materialized_series()
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .collect(),
        Err(_) => vec![None; series.len()],
    };

    let str_series = series.str()?;
    let mut values: Vec<Option<String>> = Vec::with_capacity(str_series.len());
    let mut child_overrides = 0usize;
    for (opt_val, age) in str_series.into_iter().zip(ages) {
        let canonical = opt_val.map(|raw| {
            raw.to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("_")
        });

        match canonical.as_deref() {
            Some("unknown") => {
                if age.is_some_and(|a| a < CHILD_AGE_CUTOFF) {
                    child_overrides += 1;
                    values.push(Some("never_smoked".to_string()));
                } else {
                    values.push(None);
                }
            }
            _ => values.push(canonical),
        }
    }

    if child_overrides > 0 {
        debug!(
            "smoking_status: {} unknown child rows rewritten to never_smoked",
            child_overrides
        );
    }

    df.replace(
        "smoking_status",
        Series::new("smoking_status".into(), values),
    )?;
    Ok(df)
}

/// Derive the `ever_smoked` indicator from the canonical `smoking_status`.
///
/// Rows with a missing or non-canonical smoking status get a missing
/// indicator.
fn derive_ever_smoked(mut df: DataFrame) -> Result<DataFrame> {
    let series = df.column("smoking_status")?.as_materialized_series().clone();
    let str_series = series.str()?;

    let values: Vec<Option<String>> = str_series
        .into_iter()
        .map(|opt_val| match opt_val {
            Some("never_smoked") => Some("No".to_string()),
            Some("formerly_smoked") | Some("smokes") => Some("Yes".to_string()),
            _ => None,
        })
        .collect();

    df.with_column(Series::new("ever_smoked".into(), values))?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn gender_at(df: &DataFrame, idx: usize) -> Option<String> {
        df.column("gender")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .get(idx)
            .map(|s| s.to_string())
    }

    fn ever_smoked_at(df: &DataFrame, idx: usize) -> Option<String> {
        df.column("ever_smoked")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .get(idx)
            .map(|s| s.to_string())
    }

    #[test]
    fn test_gender_normalized_to_vocabulary() {
        let df = df![
            "gender" => [Some("Male"), Some("FEMALE"), Some("Other"), Some("nonbinary"), None],
        ]
        .unwrap();

        let cleaned = CleaningStage::new().transform(&df).unwrap();

        assert_eq!(gender_at(&cleaned, 0), Some("male".to_string()));
        assert_eq!(gender_at(&cleaned, 1), Some("female".to_string()));
        assert_eq!(gender_at(&cleaned, 2), None);
        assert_eq!(gender_at(&cleaned, 3), None);
        assert_eq!(gender_at(&cleaned, 4), None);
    }

    #[test]
    fn test_smoking_status_casing_and_spacing() {
        let df = df![
            "age" => [45.0, 52.0, 60.0, 33.0],
            "smoking_status" => ["Formerly Smoked", "FORMERLY  SMOKED", "never smoked", "Smokes"],
        ]
        .unwrap();

        let cleaned = CleaningStage::new().transform(&df).unwrap();

        assert_eq!(ever_smoked_at(&cleaned, 0), Some("Yes".to_string()));
        assert_eq!(ever_smoked_at(&cleaned, 1), Some("Yes".to_string()));
        assert_eq!(ever_smoked_at(&cleaned, 2), Some("No".to_string()));
        assert_eq!(ever_smoked_at(&cleaned, 3), Some("Yes".to_string()));
    }

    #[test]
    fn test_unknown_smoking_child_reads_as_never_smoked() {
        let df = df![
            "age" => [5.0, 9.9, 10.0, 45.0],
            "smoking_status" => ["Unknown", "unknown", "Unknown", "Unknown"],
        ]
        .unwrap();

        let cleaned = CleaningStage::new().transform(&df).unwrap();

        assert_eq!(ever_smoked_at(&cleaned, 0), Some("No".to_string()));
        assert_eq!(ever_smoked_at(&cleaned, 1), Some("No".to_string()));
        // At or above the cutoff, "unknown" stays a data gap
        assert_eq!(ever_smoked_at(&cleaned, 2), None);
        assert_eq!(ever_smoked_at(&cleaned, 3), None);
    }

    #[test]
    fn test_non_canonical_smoking_value_degrades_to_missing() {
        let df = df![
            "age" => [40.0],
            "smoking_status" => ["vaping"],
        ]
        .unwrap();

        let cleaned = CleaningStage::new().transform(&df).unwrap();
        assert_eq!(ever_smoked_at(&cleaned, 0), None);
    }

    #[test]
    fn test_excluded_columns_dropped() {
        let df = df![
            "age" => [67.0],
            "gender" => ["Female"],
            "smoking_status" => ["smokes"],
            "work_type" => ["Private"],
            "ever_married" => ["Yes"],
        ]
        .unwrap();

        let cleaned = CleaningStage::new().transform(&df).unwrap();

        for dropped in DROPPED_COLUMNS {
            assert!(
                cleaned.column(dropped).is_err(),
                "'{}' must be dropped",
                dropped
            );
        }
        assert!(cleaned.column("ever_smoked").is_ok());
    }

    #[test]
    fn test_transform_is_idempotent() {
        let df = df![
            "age" => [5.0, 45.0],
            "gender" => [Some("Male"), Some("Other")],
            "smoking_status" => [Some("Unknown"), Some("Smokes")],
            "work_type" => [Some("children"), Some("Private")],
            "ever_married" => [Some("No"), Some("Yes")],
        ]
        .unwrap();

        let stage = CleaningStage::new();
        let once = stage.transform(&df).unwrap();
        let twice = stage.transform(&once).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let df = df![
            "age" => [45.0],
            "gender" => ["Male"],
            "smoking_status" => ["Smokes"],
        ]
        .unwrap();
        let original = df.clone();

        CleaningStage::new().transform(&df).unwrap();

        assert_eq!(df, original);
    }

    #[test]
    fn test_missing_columns_tolerated() {
        let df = df![
            "age" => [45.0],
            "avg_glucose_level" => [105.2],
        ]
        .unwrap();

        let cleaned = CleaningStage::new().transform(&df).unwrap();

        assert_eq!(cleaned.height(), 1);
        // No smoking column in, no derived indicator out
        assert!(cleaned.column("ever_smoked").is_err());
    }
}
