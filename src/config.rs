use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Tag for a model-building engine. Dispatch happens through the static
/// registry in [`crate::models::registry`]; availability is a registry
/// query, so a missing engine is reported, not fatal to the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Engine {
    /// Reference learners implemented in this crate.
    Builtin,
    /// Decision-tree adapter backed by the `linfa` stack (feature `linfa`).
    Linfa,
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::Builtin => write!(f, "builtin"),
            Engine::Linfa => write!(f, "linfa"),
        }
    }
}

impl FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "builtin" => Ok(Engine::Builtin),
            "linfa" => Ok(Engine::Linfa),
            _ => Err(format!("Unknown engine: {}", s)),
        }
    }
}

/// The learning algorithm behind a model, reported by every
/// [`crate::models::Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    MajorityClass,
    KNearestNeighbor,
    DecisionTree,
    Voting,
    SumRule,
    LinearRegression,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelKind::MajorityClass => "majority-class",
            ModelKind::KNearestNeighbor => "k-nearest-neighbor",
            ModelKind::DecisionTree => "decision-tree",
            ModelKind::Voting => "voting",
            ModelKind::SumRule => "sum-rule",
            ModelKind::LinearRegression => "linear-regression",
        };
        write!(f, "{}", name)
    }
}

/// Hyper-parameters for a single model, one variant per model kind.
///
/// Every parameter is genuinely optional; `None` leaves the default to the
/// engine that trains the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ModelConfig {
    MajorityClass,
    KNearestNeighbor {
        k: Option<usize>,
    },
    DecisionTree {
        max_depth: Option<usize>,
        min_samples_split: Option<usize>,
    },
    Ensemble(EnsembleConfig),
}

impl ModelConfig {
    pub fn kind(&self) -> ModelKind {
        match self {
            ModelConfig::MajorityClass => ModelKind::MajorityClass,
            ModelConfig::KNearestNeighbor { .. } => ModelKind::KNearestNeighbor,
            ModelConfig::DecisionTree { .. } => ModelKind::DecisionTree,
            ModelConfig::Ensemble(cfg) => cfg.fusion.kind(),
        }
    }

    pub fn is_ensemble(&self) -> bool {
        matches!(self, ModelConfig::Ensemble(_))
    }
}

/// A model configuration bound to the engine expected to build it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    pub engine: Engine,
    pub config: ModelConfig,
}

impl ModelSpec {
    pub fn new(engine: Engine, config: ModelConfig) -> Self {
        Self { engine, config }
    }

    pub fn kind(&self) -> ModelKind {
        self.config.kind()
    }
}

/// The algorithm that combines base-classifier predictions into one
/// ensemble prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionRule {
    Voting,
    SumRule,
    OrdinaryLeastSquares,
}

impl FusionRule {
    pub fn kind(&self) -> ModelKind {
        match self {
            FusionRule::Voting => ModelKind::Voting,
            FusionRule::SumRule => ModelKind::SumRule,
            FusionRule::OrdinaryLeastSquares => ModelKind::LinearRegression,
        }
    }
}

/// How the training data for each base-classifier slot is derived from the
/// ensemble's own training set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnsembleGeneration {
    /// Every slot trains on the identical, unmodified training set.
    SameTrainingSet,
    /// Every slot trains on a fresh N-of-N bootstrap sample.
    Bagging,
}

impl Default for EnsembleGeneration {
    fn default() -> Self {
        EnsembleGeneration::SameTrainingSet
    }
}

/// Specification for the set of base classifiers behind an ensemble:
/// either a list of members to train fresh or a directory of previously
/// serialized models to load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BaseSetSpec {
    Train {
        members: Vec<ModelSpec>,
        /// When set, every freshly built member is persisted under
        /// `<serialize_to>/<dataset>[/<fold>]/<index>.model`.
        serialize_to: Option<PathBuf>,
    },
    Load {
        path: PathBuf,
    },
}

impl BaseSetSpec {
    pub fn train(members: Vec<ModelSpec>) -> Self {
        BaseSetSpec::Train {
            members,
            serialize_to: None,
        }
    }
}

/// Full configuration for an ensemble model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleConfig {
    pub fusion: FusionRule,
    pub base_set: BaseSetSpec,
    #[serde(default)]
    pub generation: EnsembleGeneration,
    /// Seed for bootstrap sampling. Unseeded ensembles are
    /// non-deterministic by design.
    pub seed: Option<u64>,
}

impl EnsembleConfig {
    pub fn new(fusion: FusionRule, base_set: BaseSetSpec) -> Self {
        Self {
            fusion,
            base_set,
            generation: EnsembleGeneration::default(),
            seed: None,
        }
    }

    pub fn with_generation(mut self, generation: EnsembleGeneration) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
