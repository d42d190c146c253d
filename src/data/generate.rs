use std::sync::Arc;

use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::Normal;

use crate::data::dataset::{DataSet, DataSetInfo};
use crate::data::schema::{AttributeType, RecordSchema};

/// Synthetic dataset generator for experiments and tests.
///
/// Each record draws a class uniformly, then draws every feature from a
/// Gaussian whose mean/std is indexed by (class, feature). Nominal features
/// come first; their sampled values are rounded and clamped to the declared
/// vocabulary size.
#[derive(Debug, Clone)]
pub struct DataSetGenerator {
    pub num_classes: usize,
    pub num_nominal: usize,
    pub num_continuous: usize,
    pub num_instances: usize,
    /// Vocabulary size per nominal feature.
    pub nominal_cardinality: Vec<usize>,
    /// Means indexed by [class][feature].
    pub mean: Vec<Vec<f64>>,
    /// Standard deviations indexed by [class][feature].
    pub std: Vec<Vec<f64>>,
    pub name: String,
    pub seed: Option<u64>,
}

impl DataSetGenerator {
    pub fn generate(&self) -> DataSet {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let num_features = self.num_nominal + self.num_continuous;
        let mut records = Vec::with_capacity(self.num_instances);
        for _ in 0..self.num_instances {
            let class = rng.gen_range(0..self.num_classes);
            let mut record = Vec::with_capacity(num_features + 1);
            for feature in 0..num_features {
                let normal = Normal::new(
                    self.mean[class][feature],
                    self.std[class][feature].max(f64::MIN_POSITIVE),
                )
                .expect("generator std must be finite and positive");
                let mut value = normal.sample(&mut rng);
                if feature < self.num_nominal {
                    let max = (self.nominal_cardinality[feature] - 1) as f64;
                    value = value.clamp(0.0, max).round();
                }
                record.push(value);
            }
            record.push(class as f64);
            records.push(record);
        }

        let schema = Arc::new(self.schema());
        let mut info = DataSetInfo::named(&self.name);
        info.num_records = self.num_instances;
        info.num_classes = self.num_classes;
        info.num_continuous = self.num_continuous;
        info.num_nominal = self.num_nominal;

        DataSet::new(schema, records, info)
    }

    fn schema(&self) -> RecordSchema {
        let num_features = self.num_nominal + self.num_continuous;
        let mut attribute_types = Vec::with_capacity(num_features);
        let mut attribute_values = Vec::with_capacity(num_features);
        for feature in 0..num_features {
            if feature < self.num_nominal {
                attribute_types.push(AttributeType::Discrete);
                attribute_values.push(
                    (0..self.nominal_cardinality[feature])
                        .map(|v| v.to_string())
                        .collect(),
                );
            } else {
                attribute_types.push(AttributeType::Continuous);
                attribute_values.push(Vec::new());
            }
        }
        let labels = (0..self.num_classes).map(|c| c.to_string()).collect();
        RecordSchema::new(labels, attribute_types, attribute_values)
    }

    /// A two-class generator with well-separated continuous features,
    /// convenient for smoke tests and demos.
    pub fn separable_two_class(num_instances: usize, seed: u64) -> Self {
        DataSetGenerator {
            num_classes: 2,
            num_nominal: 0,
            num_continuous: 2,
            num_instances,
            nominal_cardinality: vec![],
            mean: vec![vec![0.0, 0.0], vec![5.0, 5.0]],
            std: vec![vec![0.5, 0.5], vec![0.5, 0.5]],
            name: "synthetic".to_string(),
            seed: Some(seed),
        }
    }
}
