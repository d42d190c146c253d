use std::sync::Arc;

use copse::config::{
    BaseSetSpec, Engine, EnsembleConfig, EnsembleGeneration, FusionRule, ModelConfig, ModelKind,
    ModelSpec,
};
use copse::data::{
    AttributeType, ClassifiedDataSet, DataSet, DataSetGenerator, DataSetInfo, RecordSchema,
};
use copse::ensemble::{self, OrdinaryLeastSquares, Voting};
use copse::evaluation::{
    DiversitySelection, Experiment, ModelEvaluationResults, NoHoldOut, StratifiedCrossValidation,
};
use copse::models::registry::ClassifierFactory;
use copse::models::Model;
use copse::Error;

/// Stub base classifier that reads the true label straight from the
/// record's trailing label slot.
#[derive(Debug)]
struct Oracle;

impl Model for Oracle {
    fn target_value(&self, record: &[f64]) -> copse::Result<usize> {
        Ok(record[record.len() - 1] as usize)
    }

    fn target_distribution(&self, record: &[f64]) -> copse::Result<Vec<f64>> {
        let mut dist = vec![0.0; 2];
        dist[self.target_value(record)?] = 1.0;
        Ok(dist)
    }

    fn kind(&self) -> ModelKind {
        ModelKind::MajorityClass
    }
}

/// Stub that inverts the true label for every record whose first feature
/// (an instance id in these tests) is below the threshold.
#[derive(Debug)]
struct FlipBelow {
    threshold: f64,
}

impl Model for FlipBelow {
    fn target_value(&self, record: &[f64]) -> copse::Result<usize> {
        let truth = record[record.len() - 1] as usize;
        if record[0] < self.threshold {
            Ok(1 - truth)
        } else {
            Ok(truth)
        }
    }

    fn target_distribution(&self, record: &[f64]) -> copse::Result<Vec<f64>> {
        let mut dist = vec![0.0; 2];
        dist[self.target_value(record)?] = 1.0;
        Ok(dist)
    }

    fn kind(&self) -> ModelKind {
        ModelKind::MajorityClass
    }
}

/// Two-class dataset whose single feature is the instance index, so stub
/// models can key their behavior on identity.
fn indexed_dataset(n: usize) -> Arc<DataSet> {
    let schema = Arc::new(RecordSchema::new(
        vec!["neg".into(), "pos".into()],
        vec![AttributeType::Continuous],
        vec![vec![]],
    ));
    let records = (0..n).map(|i| vec![i as f64, (i % 2) as f64]).collect();
    Arc::new(DataSet::new(schema, records, DataSetInfo::named("indexed")))
}

#[test]
fn always_correct_voting_ensemble_scores_perfectly() {
    let data = Arc::new(DataSetGenerator::separable_two_class(50, 13).generate());
    let base: Vec<Box<dyn Model>> = vec![Box::new(Oracle), Box::new(Oracle), Box::new(Oracle)];
    let voting = Voting::new(base, Arc::clone(&data));

    let classified = ClassifiedDataSet::classify(&data, &voting).unwrap();
    let experiment = Experiment::new(
        "perfect-voting",
        ModelSpec::new(Engine::Builtin, ModelConfig::MajorityClass),
    )
    .with_roc(1)
    .with_diversity(DiversitySelection::all());

    let results = ModelEvaluationResults::evaluate(&classified, &voting, &experiment).unwrap();
    assert_eq!(results.accuracy, 1.0);
    assert_eq!(results.kind, ModelKind::Voting);
    assert_eq!(results.roc.unwrap().auc, 1.0);

    let diversity = results.diversity.unwrap();
    assert_eq!(diversity.disagreement, Some(0.0));
    assert_eq!(diversity.double_fault, Some(0.0));
    assert_eq!(diversity.coincident_failure, Some(0.0));
}

#[test]
fn disagreement_matches_fraction_of_conflicting_predictions() {
    let data = indexed_dataset(50);
    // FlipBelow(10) differs from Oracle on exactly the first 10 records.
    let base: Vec<Box<dyn Model>> =
        vec![Box::new(Oracle), Box::new(FlipBelow { threshold: 10.0 })];
    let voting = Voting::new(base, Arc::clone(&data));

    let classified = ClassifiedDataSet::classify(&data, &voting).unwrap();
    let experiment = Experiment::new(
        "partial-disagreement",
        ModelSpec::new(Engine::Builtin, ModelConfig::MajorityClass),
    )
    .with_diversity(DiversitySelection {
        disagreement: true,
        ..DiversitySelection::default()
    });

    let results = ModelEvaluationResults::evaluate(&classified, &voting, &experiment).unwrap();
    let diversity = results.diversity.unwrap();
    assert!((diversity.disagreement.unwrap() - 0.2).abs() < 1e-12);
    // Unselected measures stay empty.
    assert_eq!(diversity.correlation, None);
    assert_eq!(diversity.difficulty, None);
}

#[test]
fn fusion_distributions_sum_to_one_with_first_max_value() {
    let data = Arc::new(DataSetGenerator::separable_two_class(40, 29).generate());
    let factory = ClassifierFactory::new(Engine::Builtin, Arc::clone(&data)).unwrap();

    for fusion in [FusionRule::Voting, FusionRule::SumRule] {
        let members = vec![
            ModelSpec::new(Engine::Builtin, ModelConfig::KNearestNeighbor { k: Some(1) }),
            ModelSpec::new(Engine::Builtin, ModelConfig::KNearestNeighbor { k: Some(3) }),
            ModelSpec::new(Engine::Builtin, ModelConfig::MajorityClass),
        ];
        let config = ModelConfig::Ensemble(EnsembleConfig::new(
            fusion,
            BaseSetSpec::train(members),
        ));
        let model = factory.create_model(&config).unwrap();

        for record in &data.records {
            let dist = model.target_distribution(record).unwrap();
            let sum: f64 = dist.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "{:?} sums to {}", fusion, sum);

            let value = model.target_value(record).unwrap();
            let max = dist.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            assert_eq!(dist[value], max);
            // First maximum wins: no earlier index reaches the max.
            assert!(dist[..value].iter().all(|&p| p < max));
        }
    }
}

#[test]
fn split_vote_breaks_ties_toward_lowest_class() {
    let data = indexed_dataset(4);
    // One model always right, one always wrong: every vote splits 1-1.
    let base: Vec<Box<dyn Model>> =
        vec![Box::new(Oracle), Box::new(FlipBelow { threshold: 1e9 })];
    let voting = Voting::new(base, Arc::clone(&data));
    for record in &data.records {
        assert_eq!(
            voting.target_distribution(record).unwrap(),
            vec![0.5, 0.5]
        );
        assert_eq!(voting.target_value(record).unwrap(), 0);
    }
}

#[test]
fn regression_fusion_solves_square_design_exactly() {
    // One instance, two classes, one base model: the 2x2 design (one
    // probability column plus the constant column) is invertible.
    let data = indexed_dataset(1);
    let ols = OrdinaryLeastSquares::train(vec![Box::new(Oracle)], Arc::clone(&data)).unwrap();
    assert_eq!(ols.weights().len(), 2);

    let dist = ols.target_distribution(&data.records[0]).unwrap();
    assert!((dist.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    assert_eq!(ols.target_value(&data.records[0]).unwrap(), 0);
}

#[test]
fn regression_fusion_rejects_non_square_design() {
    // Two instances make the design 4x2; direct inversion must refuse.
    let data = indexed_dataset(2);
    let err = OrdinaryLeastSquares::train(vec![Box::new(Oracle)], data).unwrap_err();
    assert!(matches!(err, Error::SingularMatrix { rows: 4, cols: 2 }));
}

#[test]
fn no_hold_out_scores_bagged_ensemble() {
    let data = Arc::new(DataSetGenerator::separable_two_class(60, 41).generate());
    let members = vec![
        ModelSpec::new(Engine::Builtin, ModelConfig::KNearestNeighbor { k: Some(3) });
        5
    ];
    let ensemble = EnsembleConfig::new(FusionRule::Voting, BaseSetSpec::train(members))
        .with_generation(EnsembleGeneration::Bagging)
        .with_seed(5);
    let experiment = Experiment::new(
        "bagged-voting",
        ModelSpec::new(Engine::Builtin, ModelConfig::Ensemble(ensemble)),
    )
    .with_diversity(DiversitySelection::all());

    let results = NoHoldOut::new(Arc::clone(&data)).run(&experiment).unwrap();
    // Well-separated classes: a bagged 3-NN vote should be near-perfect on
    // its own training data.
    assert!(results.accuracy > 0.9, "accuracy {}", results.accuracy);

    let diversity = results.diversity.unwrap();
    for bounded in [
        diversity.disagreement.unwrap(),
        diversity.double_fault.unwrap(),
        diversity.coincident_failure.unwrap(),
    ] {
        assert!((0.0..=1.0).contains(&bounded));
    }
}

#[test]
fn cross_validation_produces_one_result_per_fold() {
    let data = Arc::new(DataSetGenerator::separable_two_class(60, 23).generate());
    let experiment = Experiment::new(
        "cv-knn",
        ModelSpec::new(Engine::Builtin, ModelConfig::KNearestNeighbor { k: Some(3) }),
    )
    .with_roc(1);

    let cv = StratifiedCrossValidation::with_seed(4, data, 31);
    let results = cv.run(&experiment).unwrap();
    assert_eq!(results.len(), 4);
    for fold in &results {
        assert!(fold.accuracy > 0.9, "fold accuracy {}", fold.accuracy);
        let roc = fold.roc.as_ref().unwrap();
        assert!(roc.auc > 0.9);
        assert_eq!(roc.x_coordinates.len(), roc.y_coordinates.len());
    }
}

#[test]
fn failed_fold_aborts_run_with_context() {
    let data = Arc::new(DataSetGenerator::separable_two_class(30, 2).generate());
    let experiment = Experiment::new(
        "cv-unsupported",
        ModelSpec::new(
            Engine::Builtin,
            ModelConfig::DecisionTree {
                max_depth: None,
                min_samples_split: None,
            },
        ),
    );

    let err = StratifiedCrossValidation::with_seed(3, data, 8)
        .run(&experiment)
        .unwrap_err();
    match err {
        Error::FoldFailed {
            dataset,
            fold,
            source,
        } => {
            assert_eq!(dataset, "synthetic");
            assert_eq!(fold, 0);
            assert!(matches!(*source, Error::UnsupportedModel { .. }));
        }
        other => panic!("expected FoldFailed, got {}", other),
    }
}

#[test]
fn serialized_base_set_reloads_with_identical_predictions() {
    let dir = tempfile::tempdir().unwrap();
    let data = Arc::new(DataSetGenerator::separable_two_class(30, 19).generate());

    let members = vec![
        ModelSpec::new(Engine::Builtin, ModelConfig::KNearestNeighbor { k: Some(1) }),
        ModelSpec::new(Engine::Builtin, ModelConfig::MajorityClass),
    ];
    let trained = ensemble::build(
        &EnsembleConfig::new(
            FusionRule::SumRule,
            BaseSetSpec::Train {
                members,
                serialize_to: Some(dir.path().to_path_buf()),
            },
        ),
        Arc::clone(&data),
        None,
    )
    .unwrap();

    let loaded = ensemble::build(
        &EnsembleConfig::new(
            FusionRule::SumRule,
            BaseSetSpec::Load {
                path: dir.path().to_path_buf(),
            },
        ),
        Arc::clone(&data),
        None,
    )
    .unwrap();

    assert_eq!(loaded.base_models().unwrap().len(), 2);
    for record in &data.records {
        assert_eq!(
            trained.target_distribution(record).unwrap(),
            loaded.target_distribution(record).unwrap()
        );
    }
}
