//! Static engine registry and the per-dataset classifier factory.
//!
//! The registry is a compile-time table from (engine, model kind) to a
//! build function; engine availability is a table lookup rather than any
//! runtime class loading. A [`ClassifierFactory`] binds one engine to one
//! dataset and caches the engine-native conversion of that dataset, so
//! repeated model builds against the same data avoid redundant conversion.
//! The cache is never invalidated and must not be reused across datasets.
use std::cell::OnceCell;
use std::sync::Arc;

use crate::config::{Engine, ModelConfig, ModelKind};
use crate::data::DataSet;
use crate::ensemble;
use crate::error::Error;
use crate::models::native::{KnnModel, MajorityClassModel, NativeData};
use crate::models::Model;
use crate::Result;

type BuildFn = fn(&ClassifierFactory, &ModelConfig) -> Result<Box<dyn Model>>;

/// Whether any adapter for `engine` is compiled into this build.
pub fn engine_available(engine: Engine) -> bool {
    match engine {
        Engine::Builtin => true,
        Engine::Linfa => cfg!(feature = "linfa"),
    }
}

/// The registry proper: every (engine, kind) pair this build can train,
/// mapped to its build function.
fn lookup(engine: Engine, kind: ModelKind) -> Option<BuildFn> {
    match (engine, kind) {
        (Engine::Builtin, ModelKind::MajorityClass) => Some(build_majority_class),
        (Engine::Builtin, ModelKind::KNearestNeighbor) => Some(build_k_nearest_neighbor),
        #[cfg(feature = "linfa")]
        (Engine::Linfa, ModelKind::DecisionTree) => Some(build_linfa_tree),
        _ => None,
    }
}

/// Builds classification models for one (engine, dataset) pairing.
///
/// The optional fold index tags models built inside a cross-validation run
/// so base-classifier serialization lands in fold-specific directories.
#[derive(Debug)]
pub struct ClassifierFactory {
    engine: Engine,
    data: Arc<DataSet>,
    fold: Option<usize>,
    native: OnceCell<Arc<NativeData>>,
}

impl ClassifierFactory {
    /// Bind `engine` to a training dataset. An unavailable engine is
    /// reported here, at first binding, and stays unavailable for the run.
    pub fn new(engine: Engine, data: Arc<DataSet>) -> Result<Self> {
        Self::bind(engine, data, None)
    }

    /// Like [`ClassifierFactory::new`] but tagged with the fold index of a
    /// subsampling evaluation run.
    pub fn with_fold(engine: Engine, data: Arc<DataSet>, fold: usize) -> Result<Self> {
        Self::bind(engine, data, Some(fold))
    }

    fn bind(engine: Engine, data: Arc<DataSet>, fold: Option<usize>) -> Result<Self> {
        if !engine_available(engine) {
            return Err(Error::EngineUnavailable { engine });
        }
        Ok(ClassifierFactory {
            engine,
            data,
            fold,
            native: OnceCell::new(),
        })
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }

    pub fn data(&self) -> &Arc<DataSet> {
        &self.data
    }

    pub fn fold(&self) -> Option<usize> {
        self.fold
    }

    /// Build and train the model `config` describes. Ensemble configs
    /// recurse into the base-classifier-set builder; leaf configs dispatch
    /// through the registry.
    pub fn create_model(&self, config: &ModelConfig) -> Result<Box<dyn Model>> {
        if let ModelConfig::Ensemble(cfg) = config {
            return ensemble::build(cfg, Arc::clone(&self.data), self.fold);
        }
        let build = lookup(self.engine, config.kind()).ok_or(Error::UnsupportedModel {
            engine: self.engine,
            kind: config.kind(),
        })?;
        build(self, config)
    }

    /// The cached built-in-engine conversion of the bound dataset,
    /// converted on first use.
    pub(crate) fn native_data(&self) -> Arc<NativeData> {
        Arc::clone(self.native.get_or_init(|| {
            log::debug!(
                "converting dataset '{}' for engine {}",
                self.data.info.name,
                self.engine
            );
            Arc::new(NativeData::from_dataset(&self.data))
        }))
    }
}

fn build_majority_class(
    factory: &ClassifierFactory,
    _config: &ModelConfig,
) -> Result<Box<dyn Model>> {
    Ok(Box::new(MajorityClassModel::train(&factory.native_data())))
}

fn build_k_nearest_neighbor(
    factory: &ClassifierFactory,
    config: &ModelConfig,
) -> Result<Box<dyn Model>> {
    let k = match config {
        ModelConfig::KNearestNeighbor { k } => *k,
        _ => None,
    };
    Ok(Box::new(KnnModel::train(factory.native_data(), k)?))
}

#[cfg(feature = "linfa")]
fn build_linfa_tree(factory: &ClassifierFactory, config: &ModelConfig) -> Result<Box<dyn Model>> {
    crate::models::linfa::build_decision_tree(factory, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataSetGenerator;

    fn data() -> Arc<DataSet> {
        Arc::new(DataSetGenerator::separable_two_class(20, 9).generate())
    }

    #[test]
    fn builds_registered_models() {
        let factory = ClassifierFactory::new(Engine::Builtin, data()).unwrap();
        let model = factory
            .create_model(&ModelConfig::KNearestNeighbor { k: Some(1) })
            .unwrap();
        assert_eq!(model.kind(), ModelKind::KNearestNeighbor);
    }

    #[test]
    fn unsupported_kind_names_engine_and_kind() {
        let factory = ClassifierFactory::new(Engine::Builtin, data()).unwrap();
        let err = factory
            .create_model(&ModelConfig::DecisionTree {
                max_depth: None,
                min_samples_split: None,
            })
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedModel {
                engine: Engine::Builtin,
                kind: ModelKind::DecisionTree
            }
        ));
    }

    #[cfg(not(feature = "linfa"))]
    #[test]
    fn missing_engine_reported_at_bind_time() {
        let err = ClassifierFactory::new(Engine::Linfa, data()).unwrap_err();
        assert!(matches!(
            err,
            Error::EngineUnavailable {
                engine: Engine::Linfa
            }
        ));
    }

    #[test]
    fn conversion_is_cached_across_builds() {
        let factory = ClassifierFactory::new(Engine::Builtin, data()).unwrap();
        let first = factory.native_data();
        let second = factory.native_data();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
