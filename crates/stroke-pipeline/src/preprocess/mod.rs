//! Schema-routed preprocessing: imputation and categorical encoding.
//!
//! Columns are routed to the numeric, flag, or categorical branch by the
//! declared [`FeatureSchema`], never by runtime dtype. Output is tabular and
//! keeps column names so downstream interpretability tooling can read it.

mod encoder;
mod imputers;

pub use encoder::{OneHotEncoder, UNKNOWN_SUFFIX};
pub use imputers::Imputer;

use crate::schema::{FeatureKind, FeatureSchema};
use anyhow::{Result, bail};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Scaling step reserved for the numeric branch.
///
/// No scaler is configured anywhere yet; the slot exists so one can be wired
/// in without reshaping the persisted artifact. With no variants, the branch
/// is identity by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scaler {}

/// Fit/transform preprocessing stage combining the three routed branches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnPreprocessor {
    schema: FeatureSchema,
    encoder: OneHotEncoder,
    scaler: Option<Scaler>,
    fitted: bool,
}

impl ColumnPreprocessor {
    pub fn new(schema: FeatureSchema) -> Self {
        Self {
            schema,
            encoder: OneHotEncoder::new(),
            scaler: None,
            fitted: false,
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Learn the categorical vocabularies. The numeric and flag branches
    /// carry no learned parameters.
    pub fn fit(&mut self, df: &DataFrame) -> Result<()> {
        let categorical = self.schema.names_of(FeatureKind::Categorical);
        self.encoder.fit(df, &categorical)?;
        self.fitted = true;
        Ok(())
    }

    /// Route every declared column through its branch and combine the
    /// results into one table: numeric columns first, then flags, then the
    /// one-hot groups, each in declaration order.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.fitted {
            bail!("transform called before fit");
        }

        let mut columns: Vec<Column> = Vec::new();
        for kind in [
            FeatureKind::Numeric,
            FeatureKind::Flag,
            FeatureKind::Categorical,
        ] {
            for feature in self.schema.columns().iter().filter(|f| f.kind == kind) {
                match kind {
                    FeatureKind::Numeric => {
                        let series = df
                            .column(&feature.name)?
                            .as_materialized_series()
                            .clone();
                        let filled = Imputer::numeric(&series)?;
                        if let Some(scaler) = self.scaler {
                            match scaler {}
                        }
                        columns.push(filled.into_column());
                    }
                    FeatureKind::Flag => {
                        let series = df
                            .column(&feature.name)?
                            .as_materialized_series()
                            .clone();
                        columns.push(Imputer::flag(&series)?.into_column());
                    }
                    FeatureKind::Categorical => {
                        for indicator in self.encoder.transform_column(df, &feature.name)? {
                            columns.push(indicator.into_column());
                        }
                    }
                }
            }
        }

        let out = DataFrame::new(columns)?;
        debug!("preprocessed into {} feature columns", out.width());
        Ok(out)
    }

    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<DataFrame> {
        self.fit(df)?;
        self.transform(df)
    }

    /// Column layout of the transformed output, in order. Empty before fit.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for kind in [
            FeatureKind::Numeric,
            FeatureKind::Flag,
            FeatureKind::Categorical,
        ] {
            for feature in self.schema.columns().iter().filter(|f| f.kind == kind) {
                match kind {
                    FeatureKind::Categorical => {
                        if let Some(expanded) = self.encoder.feature_names(&feature.name) {
                            names.extend(expanded);
                        }
                    }
                    _ => names.push(feature.name.clone()),
                }
            }
        }
        names
    }
}
