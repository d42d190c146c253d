use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::{ClassifiedDataSet, DataSet, Record};
use crate::evaluation::{Experiment, ModelEvaluationResults};
use crate::models::registry::ClassifierFactory;
use crate::Result;

/// Stratified k-fold cross-validation harness.
///
/// The folds partition the dataset exactly, and each class's instances are
/// spread round-robin across folds, so per-class counts differ by at most
/// one between folds. The partition is drawn at construction; an unseeded
/// harness partitions differently on every run.
pub struct StratifiedCrossValidation {
    data: Arc<DataSet>,
    folds: Vec<Vec<Record>>,
}

impl StratifiedCrossValidation {
    pub fn new(num_folds: usize, data: Arc<DataSet>) -> Self {
        Self::partition(num_folds, data, StdRng::from_entropy())
    }

    /// Like [`StratifiedCrossValidation::new`] with a reproducible
    /// partition.
    pub fn with_seed(num_folds: usize, data: Arc<DataSet>, seed: u64) -> Self {
        Self::partition(num_folds, data, StdRng::seed_from_u64(seed))
    }

    fn partition(num_folds: usize, data: Arc<DataSet>, mut rng: StdRng) -> Self {
        // Shuffle by repeated uniform draws from the remaining records,
        // bucketing each draw by its class.
        let mut remaining = data.records.clone();
        let mut bins: Vec<Vec<Record>> = vec![Vec::new(); data.schema.num_labels()];
        while !remaining.is_empty() {
            let index = rng.gen_range(0..remaining.len());
            let record = remaining.remove(index);
            bins[data.schema.label_of(&record)].push(record);
        }

        // Round-robin each class bin over the folds.
        let mut folds: Vec<Vec<Record>> = vec![Vec::new(); num_folds];
        for bin in bins {
            for (i, record) in bin.into_iter().enumerate() {
                folds[i % num_folds].push(record);
            }
        }
        StratifiedCrossValidation { data, folds }
    }

    pub fn num_folds(&self) -> usize {
        self.folds.len()
    }

    /// Fold `i` as a held-out test dataset.
    pub fn test_fold(&self, i: usize) -> DataSet {
        self.data.with_records(self.folds[i].clone())
    }

    /// The union of every fold except `i`, for training.
    pub fn training_folds(&self, i: usize) -> DataSet {
        let records = self
            .folds
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .flat_map(|(_, fold)| fold.iter().cloned())
            .collect();
        self.data.with_records(records)
    }

    /// Train and score the experiment's model once per fold. A failed fold
    /// aborts the whole run; its error names the dataset and fold index.
    pub fn run(&self, experiment: &Experiment) -> Result<Vec<ModelEvaluationResults>> {
        let mut results = Vec::with_capacity(self.num_folds());
        for i in 0..self.num_folds() {
            results.push(
                self.run_fold(i, experiment)
                    .map_err(|e| e.in_fold(&self.data.info.name, i))?,
            );
        }
        Ok(results)
    }

    fn run_fold(&self, i: usize, experiment: &Experiment) -> Result<ModelEvaluationResults> {
        log::debug!("fold {}: training on {} folds", i, self.num_folds() - 1);
        let training = Arc::new(self.training_folds(i));
        let factory = ClassifierFactory::with_fold(experiment.model.engine, training, i)?;
        let model = factory.create_model(&experiment.model.config)?;

        let test = self.test_fold(i);
        let classified = ClassifiedDataSet::classify(&test, model.as_ref())?;
        ModelEvaluationResults::evaluate(&classified, model.as_ref(), experiment)
    }
}
