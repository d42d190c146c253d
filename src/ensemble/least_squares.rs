use std::sync::Arc;

use ndarray::{Array1, Array2};

use crate::config::ModelKind;
use crate::data::DataSet;
use crate::math::{first_argmax, invert, l1_normalize};
use crate::models::Model;
use crate::Result;

/// Regression fusion: base-classifier predictions over the training set
/// form a design matrix whose solved weights scale each base classifier's
/// contribution (plus a constant term) at prediction time.
///
/// The design matrix has one row per (instance, class) pair and one column
/// per base model plus a constant column; the dependent vector holds 1
/// where the row's class is the instance's true class. Weights come from
/// inverting the design matrix directly rather than a least-squares solve,
/// so training only succeeds when
/// `num_classes * num_instances == num_base_models + 1` and the matrix is
/// non-singular.
pub struct OrdinaryLeastSquares {
    base: Vec<Box<dyn Model>>,
    data: Arc<DataSet>,
    weights: Vec<f64>,
}

impl std::fmt::Debug for OrdinaryLeastSquares {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdinaryLeastSquares")
            .field("base_len", &self.base.len())
            .field("data", &self.data)
            .field("weights", &self.weights)
            .finish()
    }
}

impl OrdinaryLeastSquares {
    pub fn train(base: Vec<Box<dyn Model>>, data: Arc<DataSet>) -> Result<Self> {
        let design = design_matrix(&base, &data)?;
        let targets = true_distribution_vector(&data);
        let weights = invert(&design)?.dot(&targets).to_vec();
        Ok(Self {
            base,
            data,
            weights,
        })
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

fn design_matrix(base: &[Box<dyn Model>], data: &DataSet) -> Result<Array2<f64>> {
    let num_classes = data.schema.num_labels();
    let num_instances = data.len();
    let mut inputs = Array2::<f64>::zeros((num_classes * num_instances, base.len() + 1));

    for (column, model) in base.iter().enumerate() {
        for (instance, record) in data.records.iter().enumerate() {
            let dist = model.target_distribution(record)?;
            for (class, &p) in dist.iter().enumerate() {
                inputs[(instance * num_classes + class, column)] = p;
            }
        }
    }
    // Constant column.
    for row in 0..num_classes * num_instances {
        inputs[(row, base.len())] = 1.0;
    }
    Ok(inputs)
}

fn true_distribution_vector(data: &DataSet) -> Array1<f64> {
    let num_classes = data.schema.num_labels();
    let mut targets = Array1::<f64>::zeros(num_classes * data.len());
    for (instance, record) in data.records.iter().enumerate() {
        let true_class = data.schema.label_of(record);
        targets[instance * num_classes + true_class] = 1.0;
    }
    targets
}

impl Model for OrdinaryLeastSquares {
    fn target_value(&self, record: &[f64]) -> Result<usize> {
        Ok(first_argmax(&self.target_distribution(record)?))
    }

    fn target_distribution(&self, record: &[f64]) -> Result<Vec<f64>> {
        let num_labels = self.data.schema.num_labels();
        let mut dist = vec![0.0; num_labels];
        for (model, &weight) in self.base.iter().zip(&self.weights) {
            let base_dist = model.target_distribution(record)?;
            for (d, p) in dist.iter_mut().zip(base_dist) {
                *d += weight * p;
            }
        }
        let constant = self.weights[self.weights.len() - 1];
        for d in dist.iter_mut() {
            *d += constant;
        }
        l1_normalize(&mut dist);
        Ok(dist)
    }

    fn kind(&self) -> ModelKind {
        ModelKind::LinearRegression
    }

    fn base_models(&self) -> Option<&[Box<dyn Model>]> {
        Some(&self.base)
    }
}
