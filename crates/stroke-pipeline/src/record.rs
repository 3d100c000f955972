//! Patient record schema shared by the training CLI and the serving layer.

use crate::error::Result;
use polars::prelude::*;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// Integer-coded yes/no indicator, as the upstream dataset encodes it.
///
/// Deserialization accepts exactly `0` or `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YesNo {
    #[default]
    No,
    Yes,
}

impl YesNo {
    /// The 0/1 encoding used in the feature matrix.
    pub fn as_flag(self) -> i32 {
        match self {
            YesNo::No => 0,
            YesNo::Yes => 1,
        }
    }
}

impl Serialize for YesNo {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i32(self.as_flag())
    }
}

impl<'de> Deserialize<'de> for YesNo {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match i32::deserialize(deserializer)? {
            0 => Ok(YesNo::No),
            1 => Ok(YesNo::Yes),
            other => Err(de::Error::invalid_value(
                de::Unexpected::Signed(other as i64),
                &"0 or 1",
            )),
        }
    }
}

/// One raw patient row, as accepted by the prediction endpoint and as read
/// from the training data.
///
/// Optional fields default to missing; the cleaning and preprocessing stages
/// degrade missing values rather than rejecting them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub age: f64,
    pub avg_glucose_level: f64,
    #[serde(default)]
    pub bmi: Option<f64>,
    #[serde(default)]
    pub hypertension: YesNo,
    #[serde(default)]
    pub heart_disease: YesNo,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub smoking_status: Option<String>,
    #[serde(default)]
    pub work_type: Option<String>,
    #[serde(default)]
    pub ever_married: Option<String>,
}

/// Build the typed frame the pipeline consumes from a batch of records.
pub fn to_dataframe(records: &[PatientRecord]) -> Result<DataFrame> {
    let df = DataFrame::new(vec![
        Series::new(
            "age".into(),
            records.iter().map(|r| r.age).collect::<Vec<f64>>(),
        )
        .into_column(),
        Series::new(
            "avg_glucose_level".into(),
            records
                .iter()
                .map(|r| r.avg_glucose_level)
                .collect::<Vec<f64>>(),
        )
        .into_column(),
        Series::new(
            "bmi".into(),
            records.iter().map(|r| r.bmi).collect::<Vec<Option<f64>>>(),
        )
        .into_column(),
        Series::new(
            "hypertension".into(),
            records
                .iter()
                .map(|r| r.hypertension.as_flag())
                .collect::<Vec<i32>>(),
        )
        .into_column(),
        Series::new(
            "heart_disease".into(),
            records
                .iter()
                .map(|r| r.heart_disease.as_flag())
                .collect::<Vec<i32>>(),
        )
        .into_column(),
        Series::new(
            "gender".into(),
            records
                .iter()
                .map(|r| r.gender.clone())
                .collect::<Vec<Option<String>>>(),
        )
        .into_column(),
        Series::new(
            "smoking_status".into(),
            records
                .iter()
                .map(|r| r.smoking_status.clone())
                .collect::<Vec<Option<String>>>(),
        )
        .into_column(),
        Series::new(
            "work_type".into(),
            records
                .iter()
                .map(|r| r.work_type.clone())
                .collect::<Vec<Option<String>>>(),
        )
        .into_column(),
        Series::new(
            "ever_married".into(),
            records
                .iter()
                .map(|r| r.ever_married.clone())
                .collect::<Vec<Option<String>>>(),
        )
        .into_column(),
    ])?;
    Ok(df)
}
