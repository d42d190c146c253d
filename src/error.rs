use std::error::Error as StdError;
use std::fmt;
use std::io;

use crate::config::{Engine, ModelKind};

/// Crate-wide error type.
///
/// Unsupported (engine, kind) pairs and unavailable engines are permanent
/// for the remainder of a run; nothing here is retried automatically.
#[derive(Debug)]
pub enum Error {
    /// The engine has no adapter for the requested model kind.
    UnsupportedModel { engine: Engine, kind: ModelKind },
    /// The engine's adapter is not compiled in or failed its availability
    /// check when the dataset was first bound to it.
    EngineUnavailable { engine: Engine },
    /// A model's prediction methods were called in a state where the model
    /// holds no trained state (e.g. a loaded file was empty).
    ModelNotBuilt { kind: ModelKind },
    /// An engine failed while training a model.
    Training { kind: ModelKind, message: String },
    /// The OLS design matrix could not be inverted. The matrix must be
    /// square (num_classes * num_instances == num_base_models + 1) and
    /// non-singular.
    SingularMatrix { rows: usize, cols: usize },
    /// A record's field count does not match its schema.
    SchemaMismatch { expected: usize, found: usize },
    /// A discrete value is absent from its declared vocabulary.
    UnknownValue { attribute: usize, value: String },
    /// The model kind cannot be serialized to disk (ensembles and some
    /// engine-backed models carry no portable representation).
    NotSerializable { kind: ModelKind },
    /// A cross-validation fold failed; carries enough context to diagnose.
    FoldFailed {
        dataset: String,
        fold: usize,
        source: Box<Error>,
    },
    Io(io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedModel { engine, kind } => {
                write!(f, "engine {} cannot build {} models", engine, kind)
            }
            Error::EngineUnavailable { engine } => {
                write!(f, "engine {} is not available in this build", engine)
            }
            Error::ModelNotBuilt { kind } => {
                write!(f, "{} model has no trained state", kind)
            }
            Error::Training { kind, message } => {
                write!(f, "failed to train {} model: {}", kind, message)
            }
            Error::SingularMatrix { rows, cols } => write!(
                f,
                "cannot invert {}x{} design matrix (must be square and non-singular)",
                rows, cols
            ),
            Error::SchemaMismatch { expected, found } => write!(
                f,
                "record has {} fields but schema specifies {}",
                found, expected
            ),
            Error::UnknownValue { attribute, value } => write!(
                f,
                "value '{}' not found in vocabulary of attribute {}",
                value, attribute
            ),
            Error::NotSerializable { kind } => {
                write!(f, "{} models cannot be serialized", kind)
            }
            Error::FoldFailed {
                dataset,
                fold,
                source,
            } => write!(
                f,
                "fold {} of dataset '{}' failed: {}",
                fold, dataset, source
            ),
            Error::Io(e) => write!(f, "io error: {}", e),
            Error::Json(e) => write!(f, "serialization error: {}", e),
            Error::Csv(e) => write!(f, "tabular data error: {}", e),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::FoldFailed { source, .. } => Some(source.as_ref()),
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Csv(e)
    }
}

impl Error {
    /// Wrap an error with the dataset/fold context of a failed CV fold.
    pub fn in_fold(self, dataset: &str, fold: usize) -> Error {
        Error::FoldFailed {
            dataset: dataset.to_string(),
            fold,
            source: Box::new(self),
        }
    }
}
