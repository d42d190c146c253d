use std::sync::Arc;

use crate::data::{ClassifiedDataSet, DataSet};
use crate::evaluation::{Experiment, ModelEvaluationResults};
use crate::models::registry::ClassifierFactory;
use crate::Result;

/// Evaluation harness that trains on 100% of a dataset and scores against
/// the same data. The estimate is optimistic; useful as an upper bound on
/// what a model family can reach on a dataset, not as a generalization
/// estimate.
pub struct NoHoldOut {
    data: Arc<DataSet>,
}

impl NoHoldOut {
    pub fn new(data: Arc<DataSet>) -> Self {
        NoHoldOut { data }
    }

    /// Build the experiment's model on the full dataset and score it on
    /// the full dataset.
    pub fn run(&self, experiment: &Experiment) -> Result<ModelEvaluationResults> {
        let factory = ClassifierFactory::new(experiment.model.engine, Arc::clone(&self.data))?;
        let model = factory.create_model(&experiment.model.config)?;
        let classified = ClassifiedDataSet::classify(&self.data, model.as_ref())?;
        ModelEvaluationResults::evaluate(&classified, model.as_ref(), experiment)
    }
}
