//! Evaluation: confusion matrices, ROC/AUC, ensemble-diversity measures,
//! and the harnesses that drive model building and scoring.
pub mod confusion;
pub mod cross_validation;
pub mod diversity;
pub mod experiment;
pub mod no_hold_out;
pub mod results;
pub mod roc;

pub use confusion::ConfusionMatrix;
pub use cross_validation::StratifiedCrossValidation;
pub use experiment::{DiversitySelection, Experiment, RocSelection};
pub use no_hold_out::NoHoldOut;
pub use results::{DiversityResults, ModelEvaluationResults, RocResults};
pub use roc::RocGraph;
