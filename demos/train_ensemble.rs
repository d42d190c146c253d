use std::sync::Arc;

use anyhow::Result;

use copse::config::{
    BaseSetSpec, Engine, EnsembleConfig, EnsembleGeneration, FusionRule, ModelConfig, ModelSpec,
};
use copse::data::DataSetGenerator;
use copse::evaluation::{DiversitySelection, Experiment, StratifiedCrossValidation};

fn main() -> Result<()> {
    copse::logging::init();

    // Synthetic two-class dataset with overlapping class means, so the
    // base classifiers have something to disagree about.
    let generator = DataSetGenerator {
        num_classes: 2,
        num_nominal: 0,
        num_continuous: 4,
        num_instances: 200,
        nominal_cardinality: vec![],
        mean: vec![vec![0.0; 4], vec![1.5; 4]],
        std: vec![vec![1.0; 4], vec![1.0; 4]],
        name: "demo".to_string(),
        seed: Some(42),
    };
    let data = Arc::new(generator.generate());
    data.log_summary();

    // A bagged voting ensemble of five 3-NN base classifiers.
    let members = vec![
        ModelSpec::new(Engine::Builtin, ModelConfig::KNearestNeighbor { k: Some(3) });
        5
    ];
    let ensemble = EnsembleConfig::new(FusionRule::Voting, BaseSetSpec::train(members))
        .with_generation(EnsembleGeneration::Bagging)
        .with_seed(7);

    let experiment = Experiment::new(
        "bagged-knn-voting",
        ModelSpec::new(Engine::Builtin, ModelConfig::Ensemble(ensemble)),
    )
    .with_roc(1)
    .with_diversity(DiversitySelection::all());

    let cv = StratifiedCrossValidation::with_seed(5, data, 13);
    for results in cv.run(&experiment)? {
        results.log_summary();
        println!(
            "fold on '{}': accuracy {:.4}, auc {:?}, disagreement {:?}",
            results.dataset.name,
            results.accuracy,
            results.roc.as_ref().map(|r| r.auc),
            results.diversity.as_ref().and_then(|d| d.disagreement),
        );
    }
    Ok(())
}
