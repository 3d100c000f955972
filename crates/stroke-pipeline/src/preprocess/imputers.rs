//! Constant-fill imputation for the numeric and flag branches.

use anyhow::Result;
use polars::prelude::*;

/// Constant imputation methods for filling missing values.
pub struct Imputer;

impl Imputer {
    /// Cast to `Float64` and fill missing values with the constant 0.0.
    ///
    /// The cast is non-strict: string values that do not parse as numbers
    /// degrade to missing and are then filled.
    pub fn numeric(series: &Series) -> Result<Series> {
        let casted = series.cast(&DataType::Float64)?;
        let values: Vec<f64> = casted
            .f64()?
            .into_iter()
            .map(|opt_val| opt_val.unwrap_or(0.0))
            .collect();
        Ok(Series::new(series.name().clone(), values))
    }

    /// Cast to `Int32` and fill missing values with the constant 0.
    ///
    /// A genuinely missing flag and an explicit "no" both encode to 0; the
    /// upstream data offers no way to tell them apart.
    pub fn flag(series: &Series) -> Result<Series> {
        let casted = series.cast(&DataType::Int32)?;
        let values: Vec<i32> = casted
            .i32()?
            .into_iter()
            .map(|opt_val| opt_val.unwrap_or(0))
            .collect();
        Ok(Series::new(series.name().clone(), values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_fills_nulls_with_zero() {
        let series = Series::new("bmi".into(), &[Some(36.6), None, Some(24.0)]);
        let filled = Imputer::numeric(&series).unwrap();

        assert_eq!(filled.null_count(), 0);
        assert_eq!(filled.f64().unwrap().get(1), Some(0.0));
        assert_eq!(filled.f64().unwrap().get(0), Some(36.6));
    }

    #[test]
    fn test_numeric_degrades_unparsable_strings() {
        let series = Series::new("bmi".into(), &[Some("31.4"), Some("N/A"), None]);
        let filled = Imputer::numeric(&series).unwrap();

        assert_eq!(filled.dtype(), &DataType::Float64);
        assert_eq!(filled.f64().unwrap().get(0), Some(31.4));
        assert_eq!(filled.f64().unwrap().get(1), Some(0.0));
        assert_eq!(filled.f64().unwrap().get(2), Some(0.0));
    }

    #[test]
    fn test_flag_fills_nulls_with_zero() {
        let series = Series::new("hypertension".into(), &[Some(1i32), None, Some(0)]);
        let filled = Imputer::flag(&series).unwrap();

        assert_eq!(filled.null_count(), 0);
        assert_eq!(filled.i32().unwrap().get(1), Some(0));
    }

    #[test]
    fn test_flag_missing_and_absent_collapse() {
        // A null flag and an explicit 0 are indistinguishable after filling.
        let series = Series::new("heart_disease".into(), &[None, Some(0i32)]);
        let filled = Imputer::flag(&series).unwrap();

        assert_eq!(filled.i32().unwrap().get(0), filled.i32().unwrap().get(1));
    }
}
