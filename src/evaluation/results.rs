use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::ModelKind;
use crate::data::{ClassifiedDataSet, DataSet, DataSetInfo};
use crate::evaluation::diversity;
use crate::evaluation::experiment::Experiment;
use crate::evaluation::{ConfusionMatrix, RocGraph};
use crate::models::Model;
use crate::Result;

/// ROC curve points and area for the experiment's positive class.
#[derive(Debug, Clone, Serialize)]
pub struct RocResults {
    pub positive_class: usize,
    pub x_coordinates: Vec<f64>,
    pub y_coordinates: Vec<f64>,
    pub auc: f64,
}

/// The diversity measures an experiment selected, `None` for the rest.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiversityResults {
    pub disagreement: Option<f64>,
    pub correlation: Option<f64>,
    pub yule_q: Option<f64>,
    pub double_fault: Option<f64>,
    pub entropy: Option<f64>,
    pub generalized_diversity: Option<f64>,
    pub coincident_failure: Option<f64>,
    pub difficulty: Option<f64>,
}

/// Performance record for one evaluated model.
///
/// Confusion matrix and accuracy are always present; ROC and diversity
/// blocks are filled only when the experiment selected them (and, for
/// diversity, only when the model exposes at least two base classifiers).
#[derive(Debug, Clone, Serialize)]
pub struct ModelEvaluationResults {
    pub experiment: String,
    pub dataset: DataSetInfo,
    pub kind: ModelKind,
    pub confusion_matrix: ConfusionMatrix,
    pub accuracy: f64,
    pub roc: Option<RocResults>,
    pub diversity: Option<DiversityResults>,
    pub evaluated_at: DateTime<Utc>,
}

impl ModelEvaluationResults {
    /// Score `model`'s predictions over `classified` per the experiment's
    /// metric selection.
    pub fn evaluate(
        classified: &ClassifiedDataSet,
        model: &dyn Model,
        experiment: &Experiment,
    ) -> Result<Self> {
        let confusion_matrix = ConfusionMatrix::from_classified(classified);
        let accuracy = confusion_matrix.accuracy();

        let roc = experiment.roc.map(|selection| {
            let graph = RocGraph::new(classified, selection.positive_class);
            let (x_coordinates, y_coordinates) = graph.points();
            RocResults {
                positive_class: selection.positive_class,
                x_coordinates,
                y_coordinates,
                auc: graph.auc(),
            }
        });

        let diversity = match model.base_models() {
            Some(base) if experiment.diversity.any() && base.len() >= 2 => {
                Some(Self::evaluate_diversity(classified, base, experiment)?)
            }
            _ => None,
        };

        Ok(ModelEvaluationResults {
            experiment: experiment.name.clone(),
            dataset: classified.info.clone(),
            kind: model.kind(),
            confusion_matrix,
            accuracy,
            roc,
            diversity,
            evaluated_at: Utc::now(),
        })
    }

    fn evaluate_diversity(
        classified: &ClassifiedDataSet,
        base: &[Box<dyn Model>],
        experiment: &Experiment,
    ) -> Result<DiversityResults> {
        // Re-score every base classifier over the evaluation records.
        let data = DataSet::new(
            classified.schema.clone(),
            classified.records.clone(),
            classified.info.clone(),
        );
        let cds = base
            .iter()
            .map(|m| ClassifiedDataSet::classify(&data, m.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let selection = &experiment.diversity;
        let mut results = DiversityResults::default();
        if selection.disagreement {
            results.disagreement = Some(diversity::disagreement(&cds));
        }
        if selection.correlation {
            results.correlation = Some(diversity::correlation(&cds));
        }
        if selection.yule_q {
            results.yule_q = Some(diversity::yule_q(&cds));
        }
        if selection.double_fault {
            results.double_fault = Some(diversity::double_fault(&cds));
        }
        if selection.entropy {
            results.entropy = Some(diversity::entropy(&cds));
        }
        if selection.generalized_diversity {
            results.generalized_diversity = Some(diversity::generalized_diversity(&cds));
        }
        if selection.coincident_failure {
            results.coincident_failure = Some(diversity::coincident_failure(&cds));
        }
        if selection.difficulty {
            results.difficulty = Some(diversity::difficulty(&cds));
        }
        Ok(results)
    }

    pub fn log_summary(&self) {
        log::info!(
            "experiment '{}' on '{}': {} model, accuracy {:.4}{}",
            self.experiment,
            self.dataset.name,
            self.kind,
            self.accuracy,
            match &self.roc {
                Some(roc) => format!(", auc {:.4}", roc.auc),
                None => String::new(),
            }
        );
    }
}
