use serde::{Deserialize, Serialize};

use crate::config::ModelSpec;

/// One-vs-rest ROC evaluation request: which class index counts as
/// positive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RocSelection {
    pub positive_class: usize,
}

/// Which diversity measures to compute for an ensemble evaluation. All
/// eight default to off; diversity is skipped entirely for non-ensembles.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DiversitySelection {
    pub disagreement: bool,
    pub correlation: bool,
    pub yule_q: bool,
    pub double_fault: bool,
    pub entropy: bool,
    pub generalized_diversity: bool,
    pub coincident_failure: bool,
    pub difficulty: bool,
}

impl DiversitySelection {
    pub fn all() -> Self {
        DiversitySelection {
            disagreement: true,
            correlation: true,
            yule_q: true,
            double_fault: true,
            entropy: true,
            generalized_diversity: true,
            coincident_failure: true,
            difficulty: true,
        }
    }

    pub fn any(&self) -> bool {
        self.disagreement
            || self.correlation
            || self.yule_q
            || self.double_fault
            || self.entropy
            || self.generalized_diversity
            || self.coincident_failure
            || self.difficulty
    }
}

/// What to build and what to measure in one evaluation run. Confusion
/// matrix and accuracy are always computed; ROC and diversity only when
/// selected here. Reading experiments from a configuration file is the
/// caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experiment {
    pub name: String,
    pub model: ModelSpec,
    pub roc: Option<RocSelection>,
    #[serde(default)]
    pub diversity: DiversitySelection,
}

impl Experiment {
    pub fn new(name: &str, model: ModelSpec) -> Self {
        Experiment {
            name: name.to_string(),
            model,
            roc: None,
            diversity: DiversitySelection::default(),
        }
    }

    pub fn with_roc(mut self, positive_class: usize) -> Self {
        self.roc = Some(RocSelection { positive_class });
        self
    }

    pub fn with_diversity(mut self, diversity: DiversitySelection) -> Self {
        self.diversity = diversity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Engine, ModelConfig};

    #[test]
    fn default_selection_computes_nothing_optional() {
        let exp = Experiment::new(
            "baseline",
            ModelSpec::new(Engine::Builtin, ModelConfig::MajorityClass),
        );
        assert!(exp.roc.is_none());
        assert!(!exp.diversity.any());
        assert!(DiversitySelection::all().any());
    }
}
