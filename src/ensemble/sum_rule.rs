use std::sync::Arc;

use crate::config::ModelKind;
use crate::data::DataSet;
use crate::math::{first_argmax, l1_normalize};
use crate::models::Model;
use crate::Result;

/// Sum-rule fusion: base classifiers' full predicted distributions are
/// summed element-wise and normalized.
#[derive(Debug)]
pub struct SumRule {
    base: Vec<Box<dyn Model>>,
    data: Arc<DataSet>,
}

impl SumRule {
    pub fn new(base: Vec<Box<dyn Model>>, data: Arc<DataSet>) -> Self {
        Self { base, data }
    }
}

impl Model for SumRule {
    fn target_value(&self, record: &[f64]) -> Result<usize> {
        Ok(first_argmax(&self.target_distribution(record)?))
    }

    fn target_distribution(&self, record: &[f64]) -> Result<Vec<f64>> {
        let num_labels = self.data.schema.num_labels();
        let mut sum = vec![0.0; num_labels];
        for model in &self.base {
            let dist = model.target_distribution(record)?;
            for (s, d) in sum.iter_mut().zip(dist) {
                *s += d;
            }
        }
        l1_normalize(&mut sum);
        Ok(sum)
    }

    fn kind(&self) -> ModelKind {
        ModelKind::SumRule
    }

    fn base_models(&self) -> Option<&[Box<dyn Model>]> {
        Some(&self.base)
    }
}
