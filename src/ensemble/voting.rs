use std::sync::Arc;

use crate::config::ModelKind;
use crate::data::DataSet;
use crate::math::{first_argmax, l1_normalize};
use crate::models::Model;
use crate::Result;

/// Plurality-voting fusion: each base classifier's hard label counts as one
/// vote; the normalized vote counts are the ensemble's distribution.
#[derive(Debug)]
pub struct Voting {
    base: Vec<Box<dyn Model>>,
    data: Arc<DataSet>,
}

impl Voting {
    pub fn new(base: Vec<Box<dyn Model>>, data: Arc<DataSet>) -> Self {
        Self { base, data }
    }
}

impl Model for Voting {
    fn target_value(&self, record: &[f64]) -> Result<usize> {
        Ok(first_argmax(&self.target_distribution(record)?))
    }

    fn target_distribution(&self, record: &[f64]) -> Result<Vec<f64>> {
        let mut votes = vec![0.0; self.data.schema.num_labels()];
        for model in &self.base {
            votes[model.target_value(record)?] += 1.0;
        }
        l1_normalize(&mut votes);
        Ok(votes)
    }

    fn kind(&self) -> ModelKind {
        ModelKind::Voting
    }

    fn base_models(&self) -> Option<&[Box<dyn Model>]> {
        Some(&self.base)
    }
}
