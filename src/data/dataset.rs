use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::data::schema::RecordSchema;
use crate::models::Model;
use crate::Result;

/// One labeled instance: `num_attributes` numeric values followed by the
/// class label stored as an integer-valued f64.
pub type Record = Vec<f64>;

/// Provenance for a dataset; carried along for reporting and persistence
/// paths but never consulted by any computation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSetInfo {
    pub name: String,
    pub path: String,
    pub num_records: usize,
    pub num_continuous: usize,
    pub num_nominal: usize,
    pub num_classes: usize,
}

impl DataSetInfo {
    pub fn named(name: &str) -> Self {
        DataSetInfo {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// A set of labeled instances with their schema and provenance.
#[derive(Debug, Clone)]
pub struct DataSet {
    pub schema: Arc<RecordSchema>,
    pub records: Vec<Record>,
    pub info: DataSetInfo,
}

impl DataSet {
    pub fn new(schema: Arc<RecordSchema>, records: Vec<Record>, info: DataSetInfo) -> Self {
        Self {
            schema,
            records,
            info,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A dataset over different records that shares this dataset's schema
    /// and provenance (folds, bags, test splits).
    pub fn with_records(&self, records: Vec<Record>) -> DataSet {
        DataSet {
            schema: Arc::clone(&self.schema),
            records,
            info: self.info.clone(),
        }
    }

    pub fn log_summary(&self) {
        log::debug!(
            "dataset '{}': {} records, {} attributes, {} classes",
            self.info.name,
            self.records.len(),
            self.schema.num_attributes(),
            self.schema.num_labels()
        );
    }
}

/// A dataset together with the predictions one model snapshot made for
/// every record. Used only for scoring, never for retraining.
#[derive(Debug, Clone)]
pub struct ClassifiedDataSet {
    pub schema: Arc<RecordSchema>,
    pub records: Vec<Record>,
    pub info: DataSetInfo,
    pub predicted_labels: Vec<usize>,
    pub predicted_distributions: Vec<Vec<f64>>,
}

impl ClassifiedDataSet {
    /// Run `model` over every record of `data` and capture its predictions.
    pub fn classify(data: &DataSet, model: &dyn Model) -> Result<Self> {
        let mut predicted_labels = Vec::with_capacity(data.len());
        let mut predicted_distributions = Vec::with_capacity(data.len());
        for record in &data.records {
            predicted_labels.push(model.target_value(record)?);
            predicted_distributions.push(model.target_distribution(record)?);
        }
        Ok(ClassifiedDataSet {
            schema: Arc::clone(&data.schema),
            records: data.records.clone(),
            info: data.info.clone(),
            predicted_labels,
            predicted_distributions,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True label of record `i` as a class index.
    pub fn true_label(&self, i: usize) -> usize {
        self.schema.label_of(&self.records[i])
    }

    /// Whether the model predicted record `i` correctly.
    pub fn is_correct(&self, i: usize) -> bool {
        self.predicted_labels[i] == self.true_label(i)
    }
}
