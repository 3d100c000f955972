//! One-hot encoding for categorical columns.
//!
//! Indicator columns carry the original column name as a prefix so the
//! encoded feature matrix stays interpretable.

use anyhow::{Result, anyhow};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Suffix of the catch-all indicator for out-of-vocabulary values.
pub const UNKNOWN_SUFFIX: &str = "unknown";

/// Vocabulary-based one-hot encoder.
///
/// At inference, a non-null value outside the fitted vocabulary fires the
/// `{column}_unknown` catch-all instead of failing; a null value is an
/// ignorable category and leaves every indicator at 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    /// Fitted vocabulary per column: sorted distinct non-null values.
    vocabularies: BTreeMap<String, Vec<String>>,
}

impl OneHotEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn the category vocabulary of each given column.
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<()> {
        self.vocabularies.clear();
        for &name in columns {
            let series = df.column(name)?.as_materialized_series().clone();
            let str_series = series.str()?;

            let mut categories: Vec<String> = str_series
                .into_iter()
                .flatten()
                .map(|value| value.to_string())
                .collect();
            categories.sort();
            categories.dedup();

            debug!("{}: {} categories learned", name, categories.len());
            self.vocabularies.insert(name.to_string(), categories);
        }
        Ok(())
    }

    /// Indicator columns for one fitted column, in vocabulary order followed
    /// by the unknown catch-all.
    pub fn transform_column(&self, df: &DataFrame, name: &str) -> Result<Vec<Series>> {
        let vocabulary = self
            .vocabularies
            .get(name)
            .ok_or_else(|| anyhow!("column '{}' was not fitted", name))?;

        let series = df.column(name)?.as_materialized_series().clone();
        let str_series = series.str()?;

        let mut indicators: Vec<Vec<i32>> =
            vec![vec![0; str_series.len()]; vocabulary.len() + 1];
        for (row, opt_val) in str_series.into_iter().enumerate() {
            if let Some(value) = opt_val {
                match vocabulary.iter().position(|category| category == value) {
                    Some(idx) => indicators[idx][row] = 1,
                    None => indicators[vocabulary.len()][row] = 1,
                }
            }
        }

        let out = self
            .column_names(name, vocabulary)
            .into_iter()
            .zip(indicators)
            .map(|(column_name, values)| Series::new(column_name.as_str().into(), values))
            .collect();
        Ok(out)
    }

    /// Names of the indicator columns a fitted column expands into.
    pub fn feature_names(&self, name: &str) -> Option<Vec<String>> {
        self.vocabularies
            .get(name)
            .map(|vocabulary| self.column_names(name, vocabulary))
    }

    fn column_names(&self, name: &str, vocabulary: &[String]) -> Vec<String> {
        let mut names: Vec<String> = vocabulary
            .iter()
            .map(|category| format!("{}_{}", name, category))
            .collect();
        names.push(format!("{}_{}", name, UNKNOWN_SUFFIX));
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fitted_encoder() -> (OneHotEncoder, DataFrame) {
        let df = df![
            "gender" => [Some("male"), Some("female"), Some("male"), None],
        ]
        .unwrap();
        let mut encoder = OneHotEncoder::new();
        encoder.fit(&df, &["gender"]).unwrap();
        (encoder, df)
    }

    fn indicator_values(series: &Series) -> Vec<i32> {
        series.i32().unwrap().into_no_null_iter().collect()
    }

    #[test]
    fn test_fit_learns_sorted_vocabulary() {
        let (encoder, _) = fitted_encoder();
        assert_eq!(
            encoder.feature_names("gender").unwrap(),
            vec!["gender_female", "gender_male", "gender_unknown"]
        );
    }

    #[test]
    fn test_transform_sets_one_indicator_per_row() {
        let (encoder, df) = fitted_encoder();
        let columns = encoder.transform_column(&df, "gender").unwrap();

        assert_eq!(columns.len(), 3);
        assert_eq!(indicator_values(&columns[0]), vec![0, 1, 0, 0]); // female
        assert_eq!(indicator_values(&columns[1]), vec![1, 0, 1, 0]); // male
        assert_eq!(indicator_values(&columns[2]), vec![0, 0, 0, 0]); // unknown
    }

    #[test]
    fn test_out_of_vocabulary_value_fires_unknown() {
        let (encoder, _) = fitted_encoder();
        let df = df!["gender" => ["nonbinary"]].unwrap();

        let columns = encoder.transform_column(&df, "gender").unwrap();

        assert_eq!(indicator_values(&columns[0]), vec![0]);
        assert_eq!(indicator_values(&columns[1]), vec![0]);
        assert_eq!(indicator_values(&columns[2]), vec![1]);
    }

    #[test]
    fn test_null_leaves_all_indicators_zero() {
        let (encoder, _) = fitted_encoder();
        let df = df!["gender" => [Option::<&str>::None]].unwrap();

        let columns = encoder.transform_column(&df, "gender").unwrap();
        for column in &columns {
            assert_eq!(indicator_values(column), vec![0]);
        }
    }

    #[test]
    fn test_transform_unfitted_column_is_an_error() {
        let (encoder, df) = fitted_encoder();
        assert!(encoder.transform_column(&df, "ever_smoked").is_err());
    }
}
