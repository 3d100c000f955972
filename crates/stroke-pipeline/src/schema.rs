//! Declared feature schema for the modeling columns.
//!
//! Column routing in the preprocessor is driven by this declaration, never
//! inferred from runtime dtypes. Columns absent from the declaration (raw
//! identifiers, residence type, ...) never reach the feature matrix.

use serde::{Deserialize, Serialize};

/// Semantic type of a modeling column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureKind {
    /// Floating-point measurement.
    Numeric,
    /// Integer-coded boolean indicator (0/1).
    Flag,
    /// Free-text category, one-hot encoded.
    Categorical,
}

/// One declared modeling column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureColumn {
    pub name: String,
    pub kind: FeatureKind,
}

impl FeatureColumn {
    pub fn new(name: impl Into<String>, kind: FeatureKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered declaration of the columns the preprocessor routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    columns: Vec<FeatureColumn>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<FeatureColumn>) -> Self {
        Self { columns }
    }

    /// The fixed feature set of the stroke-risk classifier, post-cleaning.
    pub fn stroke_features() -> Self {
        Self::new(vec![
            FeatureColumn::new("age", FeatureKind::Numeric),
            FeatureColumn::new("avg_glucose_level", FeatureKind::Numeric),
            FeatureColumn::new("bmi", FeatureKind::Numeric),
            FeatureColumn::new("hypertension", FeatureKind::Flag),
            FeatureColumn::new("heart_disease", FeatureKind::Flag),
            FeatureColumn::new("gender", FeatureKind::Categorical),
            FeatureColumn::new("ever_smoked", FeatureKind::Categorical),
        ])
    }

    /// All declared columns, in declaration order.
    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    /// Names of the declared columns of one kind, in declaration order.
    pub fn names_of(&self, kind: FeatureKind) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|column| column.kind == kind)
            .map(|column| column.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_features_layout() {
        let schema = FeatureSchema::stroke_features();
        assert_eq!(schema.columns().len(), 7);
        assert_eq!(
            schema.names_of(FeatureKind::Numeric),
            vec!["age", "avg_glucose_level", "bmi"]
        );
        assert_eq!(
            schema.names_of(FeatureKind::Flag),
            vec!["hypertension", "heart_disease"]
        );
        assert_eq!(
            schema.names_of(FeatureKind::Categorical),
            vec!["gender", "ever_smoked"]
        );
    }

    #[test]
    fn test_excluded_raw_columns_are_not_declared() {
        let schema = FeatureSchema::stroke_features();
        for excluded in ["smoking_status", "work_type", "ever_married", "id"] {
            assert!(
                !schema.columns().iter().any(|c| c.name == excluded),
                "'{}' must not be part of the feature set",
                excluded
            );
        }
    }

    #[test]
    fn test_schema_serialization_round_trip() {
        let schema = FeatureSchema::stroke_features();
        let json = serde_json::to_string(&schema).unwrap();
        let restored: FeatureSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, restored);
    }
}
