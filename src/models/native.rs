//! Built-in reference engine.
//!
//! Two deliberately small learners back the built-in engine: a
//! majority-class baseline and a k-nearest-neighbor classifier. Both train
//! against the factory's cached numeric conversion of the dataset, so
//! repeated builds over the same training data share one conversion.
use std::sync::Arc;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::config::ModelKind;
use crate::data::DataSet;
use crate::error::Error;
use crate::math::first_argmax;
use crate::models::persistence::SavedModel;
use crate::models::Model;
use crate::Result;

const DEFAULT_K: usize = 3;

/// The built-in engine's native view of a dataset: an instances-by-
/// attributes feature matrix plus the label column as class indices.
#[derive(Debug)]
pub struct NativeData {
    pub features: Array2<f64>,
    pub labels: Vec<usize>,
    pub num_classes: usize,
}

impl NativeData {
    pub fn from_dataset(data: &DataSet) -> Self {
        let n = data.len();
        let num_attributes = data.schema.num_attributes();
        let mut features = Array2::<f64>::zeros((n, num_attributes));
        let mut labels = Vec::with_capacity(n);
        for (i, record) in data.records.iter().enumerate() {
            for (j, &value) in record[..num_attributes].iter().enumerate() {
                features[(i, j)] = value;
            }
            labels.push(data.schema.label_of(record));
        }
        NativeData {
            features,
            labels,
            num_classes: data.schema.num_labels(),
        }
    }

    pub fn num_instances(&self) -> usize {
        self.labels.len()
    }
}

/// Baseline that always predicts the class priors of its training set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MajorityClassModel {
    priors: Vec<f64>,
    majority: usize,
}

impl MajorityClassModel {
    pub fn train(data: &NativeData) -> Self {
        let mut priors = vec![0.0; data.num_classes];
        for &label in &data.labels {
            priors[label] += 1.0;
        }
        let total = data.num_instances().max(1) as f64;
        for p in priors.iter_mut() {
            *p /= total;
        }
        let majority = first_argmax(&priors);
        MajorityClassModel { priors, majority }
    }
}

impl Model for MajorityClassModel {
    fn target_value(&self, _record: &[f64]) -> Result<usize> {
        Ok(self.majority)
    }

    fn target_distribution(&self, _record: &[f64]) -> Result<Vec<f64>> {
        Ok(self.priors.clone())
    }

    fn kind(&self) -> ModelKind {
        ModelKind::MajorityClass
    }

    fn to_saved(&self) -> Result<SavedModel> {
        Ok(SavedModel::MajorityClass(self.clone()))
    }
}

/// k-nearest-neighbor classifier over Euclidean distance in attribute
/// space. Training stores the converted instances; prediction votes among
/// the k closest.
#[derive(Debug)]
pub struct KnnModel {
    k: usize,
    data: Arc<NativeData>,
}

impl KnnModel {
    pub fn train(data: Arc<NativeData>, k: Option<usize>) -> Result<Self> {
        let k = k.unwrap_or(DEFAULT_K);
        if data.num_instances() == 0 || k == 0 {
            return Err(Error::ModelNotBuilt {
                kind: ModelKind::KNearestNeighbor,
            });
        }
        Ok(KnnModel { k, data })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub(crate) fn training_data(&self) -> &Arc<NativeData> {
        &self.data
    }

    fn neighbor_votes(&self, record: &[f64]) -> Vec<f64> {
        let n = self.data.num_instances();
        let num_attributes = self.data.features.ncols();
        let mut distances: Vec<(f64, usize)> = (0..n)
            .map(|i| {
                let mut d = 0.0;
                for j in 0..num_attributes {
                    let diff = self.data.features[(i, j)] - record[j];
                    d += diff * diff;
                }
                (d, self.data.labels[i])
            })
            .collect();
        distances.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let k = self.k.min(n);
        let mut votes = vec![0.0; self.data.num_classes];
        for &(_, label) in distances.iter().take(k) {
            votes[label] += 1.0;
        }
        for v in votes.iter_mut() {
            *v /= k as f64;
        }
        votes
    }
}

impl Model for KnnModel {
    fn target_value(&self, record: &[f64]) -> Result<usize> {
        Ok(first_argmax(&self.neighbor_votes(record)))
    }

    fn target_distribution(&self, record: &[f64]) -> Result<Vec<f64>> {
        Ok(self.neighbor_votes(record))
    }

    fn kind(&self) -> ModelKind {
        ModelKind::KNearestNeighbor
    }

    fn to_saved(&self) -> Result<SavedModel> {
        Ok(SavedModel::knn(self))
    }
}
