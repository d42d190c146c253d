//! Model persistence.
//!
//! Base classifiers serialize to JSON `.model` files laid out as
//! `<root>/<dataset>[/<fold>]/<index>.model`, so each fold of a
//! cross-validated run keeps its own set. Loading reads every `.model`
//! file in the directory in ascending numeric order.
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::native::{KnnModel, MajorityClassModel, NativeData};
use crate::models::Model;
use crate::Result;

const MODEL_EXTENSION: &str = "model";

/// Portable on-disk representation of a serializable model.
#[derive(Serialize, Deserialize)]
pub enum SavedModel {
    MajorityClass(MajorityClassModel),
    KNearestNeighbor {
        k: usize,
        features: Vec<Vec<f64>>,
        labels: Vec<usize>,
        num_classes: usize,
    },
}

impl SavedModel {
    pub(crate) fn knn(model: &KnnModel) -> SavedModel {
        let data = model.training_data();
        let features = (0..data.num_instances())
            .map(|i| data.features.row(i).to_vec())
            .collect();
        SavedModel::KNearestNeighbor {
            k: model.k(),
            features,
            labels: data.labels.clone(),
            num_classes: data.num_classes,
        }
    }

    pub fn into_model(self) -> Result<Box<dyn Model>> {
        match self {
            SavedModel::MajorityClass(model) => Ok(Box::new(model)),
            SavedModel::KNearestNeighbor {
                k,
                features,
                labels,
                num_classes,
            } => {
                let rows = features.len();
                let cols = features.first().map_or(0, Vec::len);
                let mut matrix = ndarray::Array2::<f64>::zeros((rows, cols));
                for (i, row) in features.iter().enumerate() {
                    for (j, &value) in row.iter().enumerate() {
                        matrix[(i, j)] = value;
                    }
                }
                let data = Arc::new(NativeData {
                    features: matrix,
                    labels,
                    num_classes,
                });
                Ok(Box::new(KnnModel::train(data, Some(k))?))
            }
        }
    }
}

/// Directory holding a dataset's serialized base-classifier set.
pub fn model_dir(root: &Path, dataset: &str, fold: Option<usize>) -> PathBuf {
    let mut dir = root.join(dataset);
    if let Some(fold) = fold {
        dir.push(fold.to_string());
    }
    dir
}

/// Persist one model to `path`.
pub fn save_model(model: &dyn Model, path: &Path) -> Result<()> {
    let saved = model.to_saved()?;
    let file = fs::File::create(path)?;
    serde_json::to_writer(file, &saved)?;
    Ok(())
}

/// Persist a freshly built base model under its indexed path, creating the
/// directory on first use.
pub fn save_indexed(
    model: &dyn Model,
    root: &Path,
    dataset: &str,
    fold: Option<usize>,
    index: usize,
) -> Result<()> {
    let dir = model_dir(root, dataset, fold);
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{}.{}", index, MODEL_EXTENSION));
    log::debug!("serializing base model {} to {}", index, path.display());
    save_model(model, &path)
}

/// Load one model from `path`.
pub fn load_model(path: &Path) -> Result<Box<dyn Model>> {
    let file = fs::File::open(path)?;
    let saved: SavedModel = serde_json::from_reader(file)?;
    saved.into_model()
}

/// Load a previously serialized base-classifier set, ordered by the numeric
/// index in each file name.
pub fn load_models(root: &Path, dataset: &str, fold: Option<usize>) -> Result<Vec<Box<dyn Model>>> {
    let dir = model_dir(root, dataset, fold);
    let mut entries: Vec<(usize, PathBuf)> = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(MODEL_EXTENSION) {
            continue;
        }
        let index = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<usize>().ok());
        if let Some(index) = index {
            entries.push((index, path));
        }
    }
    entries.sort_by_key(|(index, _)| *index);

    let mut models = Vec::with_capacity(entries.len());
    for (_, path) in entries {
        models.push(load_model(&path)?);
    }
    log::debug!(
        "loaded {} base models from {}",
        models.len(),
        dir.display()
    );
    Ok(models)
}
