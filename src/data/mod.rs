//! Record/dataset model: schemas, labeled datasets, classified datasets,
//! modified-C4.5 import/export, and a synthetic dataset generator.
pub mod dataset;
pub mod generate;
pub mod import;
pub mod schema;

pub use dataset::{ClassifiedDataSet, DataSet, DataSetInfo, Record};
pub use generate::DataSetGenerator;
pub use import::DatasetCache;
pub use schema::{AttributeType, RecordSchema};
