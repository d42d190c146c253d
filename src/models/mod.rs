//! The capability contract every trainable predictor satisfies, the static
//! engine registry that builds them, and model persistence.
pub mod native;
pub mod persistence;
pub mod registry;

#[cfg(feature = "linfa")]
pub mod linfa;

use crate::config::ModelKind;
use crate::models::persistence::SavedModel;
use crate::Result;

/// Contract for a built classification model.
///
/// Models are produced already trained by a [`registry::ClassifierFactory`]
/// or by the base-classifier-set builder, so the prediction methods are
/// always valid to call on a value of this trait.
pub trait Model: std::fmt::Debug {
    /// Predicted class index for an instance.
    fn target_value(&self, record: &[f64]) -> Result<usize>;

    /// Predicted class distribution for an instance; element `i` is the
    /// probability of class `i`.
    fn target_distribution(&self, record: &[f64]) -> Result<Vec<f64>>;

    /// The learning algorithm behind this model.
    fn kind(&self) -> ModelKind;

    /// The trained base classifiers, for models that are ensembles.
    fn base_models(&self) -> Option<&[Box<dyn Model>]> {
        None
    }

    /// Portable representation for persistence. Ensembles and engine
    /// models without one refuse with [`crate::Error::NotSerializable`].
    fn to_saved(&self) -> Result<SavedModel> {
        Err(crate::Error::NotSerializable { kind: self.kind() })
    }
}
