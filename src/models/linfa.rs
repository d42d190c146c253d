//! Decision-tree engine adapter backed by the `linfa` stack.
//!
//! Compiled only with the `linfa` feature; without it the registry reports
//! the engine unavailable instead of failing the build of this crate.
use ndarray::{Array1, Array2};

use linfa::prelude::*;
use linfa_trees::DecisionTree;

use crate::config::{ModelConfig, ModelKind};
use crate::error::Error;
use crate::models::registry::ClassifierFactory;
use crate::models::Model;
use crate::Result;

#[derive(Debug)]
pub struct LinfaTreeModel {
    tree: DecisionTree<f64, usize>,
    num_classes: usize,
}

pub(crate) fn build_decision_tree(
    factory: &ClassifierFactory,
    config: &ModelConfig,
) -> Result<Box<dyn Model>> {
    let (max_depth, min_samples_split) = match config {
        ModelConfig::DecisionTree {
            max_depth,
            min_samples_split,
        } => (*max_depth, *min_samples_split),
        _ => (None, None),
    };

    let native = factory.native_data();
    let targets = Array1::from_vec(native.labels.clone());
    let dataset = Dataset::new(native.features.clone(), targets);

    let mut params = DecisionTree::params().max_depth(max_depth);
    if let Some(min_split) = min_samples_split {
        params = params.min_weight_split(min_split as f32);
    }
    let tree = params.fit(&dataset).map_err(|e| Error::Training {
        kind: ModelKind::DecisionTree,
        message: e.to_string(),
    })?;

    Ok(Box::new(LinfaTreeModel {
        tree,
        num_classes: native.num_classes,
    }))
}

impl LinfaTreeModel {
    fn predict_one(&self, record: &[f64]) -> usize {
        let attributes = record.len() - 1;
        let mut row = Array2::<f64>::zeros((1, attributes));
        for (j, &value) in record[..attributes].iter().enumerate() {
            row[(0, j)] = value;
        }
        self.tree.predict(&row)[0]
    }
}

impl Model for LinfaTreeModel {
    fn target_value(&self, record: &[f64]) -> Result<usize> {
        Ok(self.predict_one(record))
    }

    /// Trees predict hard labels; the distribution is the one-hot vector
    /// of the predicted class.
    fn target_distribution(&self, record: &[f64]) -> Result<Vec<f64>> {
        let mut dist = vec![0.0; self.num_classes];
        dist[self.predict_one(record)] = 1.0;
        Ok(dist)
    }

    fn kind(&self) -> ModelKind {
        ModelKind::DecisionTree
    }
}
