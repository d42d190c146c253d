//! Ensemble construction: realizing base-classifier sets and fusing their
//! predictions into a single model.
pub mod base_set;
pub mod least_squares;
pub mod sum_rule;
pub mod voting;

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{BaseSetSpec, EnsembleConfig, FusionRule};
use crate::data::DataSet;
use crate::models::{persistence, Model};
use crate::Result;

pub use least_squares::OrdinaryLeastSquares;
pub use sum_rule::SumRule;
pub use voting::Voting;

/// Build the ensemble `cfg` describes over `data`: realize its base
/// classifiers (training or loading them) and wrap them in the configured
/// fusion rule. `fold` tags fold-specific persistence paths inside
/// cross-validation runs.
pub fn build(
    cfg: &EnsembleConfig,
    data: Arc<DataSet>,
    fold: Option<usize>,
) -> Result<Box<dyn Model>> {
    let base = match &cfg.base_set {
        BaseSetSpec::Train {
            members,
            serialize_to,
        } => {
            let mut rng = match cfg.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            base_set::realize(
                members,
                serialize_to.as_deref(),
                &data,
                cfg.generation,
                &mut rng,
                fold,
            )?
        }
        BaseSetSpec::Load { path } => persistence::load_models(path, &data.info.name, fold)?,
    };

    log::debug!(
        "built {:?} ensemble with {} base classifiers on '{}'",
        cfg.fusion,
        base.len(),
        data.info.name
    );

    Ok(match cfg.fusion {
        FusionRule::Voting => Box::new(Voting::new(base, data)),
        FusionRule::SumRule => Box::new(SumRule::new(base, data)),
        FusionRule::OrdinaryLeastSquares => {
            Box::new(OrdinaryLeastSquares::train(base, data)?)
        }
    })
}
