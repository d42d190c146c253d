//! Base Classifier Set Builder.
//!
//! Given an ensemble's member specifications and its training dataset,
//! produce an equal-length array of trained models in member order. A
//! member whose engine is unavailable or whose (engine, kind) pair has no
//! adapter fails the whole build; partial results are discarded.
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::Rng;

use crate::config::{Engine, EnsembleGeneration, ModelSpec};
use crate::data::DataSet;
use crate::models::registry::ClassifierFactory;
use crate::models::{persistence, Model};
use crate::Result;

/// Train one model per member of `members` over `data`.
///
/// Under `Bagging` every slot draws a fresh N-of-N bootstrap sample and
/// trains on it; under `SameTrainingSet` all slots of an engine share one
/// factory, so the engine-native conversion of the training data happens
/// once. When `serialize_to` is set, each model is persisted under
/// `<serialize_to>/<dataset>[/<fold>]/<index>.model` immediately after it
/// is built.
pub fn realize(
    members: &[ModelSpec],
    serialize_to: Option<&Path>,
    data: &Arc<DataSet>,
    generation: EnsembleGeneration,
    rng: &mut StdRng,
    fold: Option<usize>,
) -> Result<Vec<Box<dyn Model>>> {
    let mut models: Vec<Box<dyn Model>> = Vec::with_capacity(members.len());
    let mut shared: HashMap<Engine, ClassifierFactory> = HashMap::new();

    for (index, spec) in members.iter().enumerate() {
        let model = match generation {
            EnsembleGeneration::Bagging => {
                let bag = Arc::new(bootstrap_sample(data, rng));
                let factory = bind_factory(spec.engine, bag, fold)?;
                factory.create_model(&spec.config)?
            }
            EnsembleGeneration::SameTrainingSet => {
                let factory = match shared.entry(spec.engine) {
                    std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
                    std::collections::hash_map::Entry::Vacant(entry) => {
                        entry.insert(bind_factory(spec.engine, Arc::clone(data), fold)?)
                    }
                };
                factory.create_model(&spec.config)?
            }
        };

        if let Some(root) = serialize_to {
            persistence::save_indexed(model.as_ref(), root, &data.info.name, fold, index)?;
        }
        models.push(model);
    }

    Ok(models)
}

fn bind_factory(engine: Engine, data: Arc<DataSet>, fold: Option<usize>) -> Result<ClassifierFactory> {
    match fold {
        Some(fold) => ClassifierFactory::with_fold(engine, data, fold),
        None => ClassifierFactory::new(engine, data),
    }
}

/// Draw `N` records independently and uniformly with replacement from an
/// `N`-record dataset. Duplicates are expected; on average a draw covers
/// about 63% of the distinct records.
pub fn bootstrap_sample(data: &DataSet, rng: &mut StdRng) -> DataSet {
    let n = data.len();
    let records = (0..n)
        .map(|_| data.records[rng.gen_range(0..n)].clone())
        .collect();
    data.with_records(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    use crate::config::{ModelConfig, ModelKind};
    use crate::data::DataSetGenerator;
    use crate::error::Error;

    fn data() -> Arc<DataSet> {
        Arc::new(DataSetGenerator::separable_two_class(30, 17).generate())
    }

    fn knn_member() -> ModelSpec {
        ModelSpec::new(Engine::Builtin, ModelConfig::KNearestNeighbor { k: Some(1) })
    }

    #[test]
    fn realized_set_matches_member_count_and_order() {
        let data = data();
        let members = vec![
            ModelSpec::new(Engine::Builtin, ModelConfig::MajorityClass),
            knn_member(),
        ];
        let mut rng = StdRng::seed_from_u64(1);
        let models = realize(
            &members,
            None,
            &data,
            EnsembleGeneration::SameTrainingSet,
            &mut rng,
            None,
        )
        .unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].kind(), ModelKind::MajorityClass);
        assert_eq!(models[1].kind(), ModelKind::KNearestNeighbor);
    }

    #[test]
    fn unsupported_member_fails_whole_build() {
        let data = data();
        let members = vec![
            knn_member(),
            ModelSpec::new(
                Engine::Builtin,
                ModelConfig::DecisionTree {
                    max_depth: None,
                    min_samples_split: None,
                },
            ),
        ];
        let mut rng = StdRng::seed_from_u64(1);
        let err = realize(
            &members,
            None,
            &data,
            EnsembleGeneration::SameTrainingSet,
            &mut rng,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedModel { .. }));
    }

    #[test]
    fn bootstrap_keeps_size_and_membership() {
        let data = data();
        let mut rng = StdRng::seed_from_u64(5);
        let bag = bootstrap_sample(&data, &mut rng);
        assert_eq!(bag.len(), data.len());
        for record in &bag.records {
            assert!(data.records.contains(record));
        }
    }

    #[test]
    fn bootstrap_covers_about_two_thirds_of_records() {
        let data = Arc::new(DataSetGenerator::separable_two_class(200, 23).generate());
        let mut rng = StdRng::seed_from_u64(6);
        let mut coverage = 0.0;
        let draws = 20;
        for _ in 0..draws {
            let bag = bootstrap_sample(&data, &mut rng);
            let unique = data
                .records
                .iter()
                .filter(|r| bag.records.contains(*r))
                .count();
            coverage += unique as f64 / data.len() as f64;
        }
        let mean = coverage / draws as f64;
        // 1 - 1/e ~= 0.632; a loose band keeps the test stable.
        assert!((0.57..0.70).contains(&mean), "coverage {}", mean);
    }
}
