use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::Result;

/// Whether an attribute holds a numeric value or an index into a declared
/// value vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    Continuous,
    Discrete,
}

/// Schema for a set of records, describing the domain and range of the
/// classification function to be estimated.
///
/// Immutable once constructed and shared by `Arc` across every dataset
/// derived from the same source (folds, bootstrap bags, test splits).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSchema {
    /// Ordered class label names; a record's label value is an index here.
    pub labels: Vec<String>,
    /// Type of each attribute, in record order (label excluded).
    pub attribute_types: Vec<AttributeType>,
    /// Value vocabulary per attribute; empty for continuous attributes.
    pub attribute_values: Vec<Vec<String>>,
}

impl RecordSchema {
    pub fn new(
        labels: Vec<String>,
        attribute_types: Vec<AttributeType>,
        attribute_values: Vec<Vec<String>>,
    ) -> Self {
        debug_assert_eq!(attribute_types.len(), attribute_values.len());
        Self {
            labels,
            attribute_types,
            attribute_values,
        }
    }

    /// Number of attributes, label excluded. Records carry one extra slot
    /// for the label, so their length is `num_attributes() + 1`.
    pub fn num_attributes(&self) -> usize {
        self.attribute_types.len()
    }

    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    /// Index of the class label within a record.
    pub fn label_index(&self) -> usize {
        self.num_attributes()
    }

    /// Read a record's class label as a class index.
    pub fn label_of(&self, record: &[f64]) -> usize {
        record[self.label_index()] as usize
    }

    /// Translate a textual record into its numeric form: continuous values
    /// parse as f64, discrete values (and the trailing label) become the
    /// index of their entry in the declared vocabulary.
    pub fn translate_record(&self, fields: &[&str]) -> Result<Vec<f64>> {
        if fields.len() != self.num_attributes() + 1 {
            return Err(Error::SchemaMismatch {
                expected: self.num_attributes() + 1,
                found: fields.len(),
            });
        }
        fields
            .iter()
            .enumerate()
            .map(|(i, value)| self.translate_value(i, value))
            .collect()
    }

    fn translate_value(&self, attribute: usize, value: &str) -> Result<f64> {
        let vocabulary = if attribute == self.label_index() {
            &self.labels
        } else if self.attribute_types[attribute] == AttributeType::Discrete {
            &self.attribute_values[attribute]
        } else {
            return value.parse::<f64>().map_err(|_| Error::UnknownValue {
                attribute,
                value: value.to_string(),
            });
        };

        vocabulary
            .iter()
            .position(|v| v == value)
            .map(|i| i as f64)
            .ok_or_else(|| Error::UnknownValue {
                attribute,
                value: value.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> RecordSchema {
        RecordSchema::new(
            vec!["yes".into(), "no".into()],
            vec![AttributeType::Continuous, AttributeType::Discrete],
            vec![vec![], vec!["red".into(), "blue".into()]],
        )
    }

    #[test]
    fn translates_mixed_record() {
        let s = schema();
        let rec = s.translate_record(&["1.5", "blue", "no"]).unwrap();
        assert_eq!(rec, vec![1.5, 1.0, 1.0]);
        assert_eq!(s.label_of(&rec), 1);
    }

    #[test]
    fn rejects_wrong_field_count() {
        let err = schema().translate_record(&["1.5", "red"]).unwrap_err();
        assert!(matches!(
            err,
            Error::SchemaMismatch {
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn rejects_unknown_discrete_value() {
        let err = schema()
            .translate_record(&["1.5", "green", "yes"])
            .unwrap_err();
        assert!(matches!(err, Error::UnknownValue { attribute: 1, .. }));
    }
}
