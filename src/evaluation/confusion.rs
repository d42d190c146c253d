use std::fmt;

use ndarray::Array2;
use serde::Serialize;

use crate::data::ClassifiedDataSet;

/// Counts of (true class, predicted class) over a classified dataset.
#[derive(Debug, Clone, Serialize)]
pub struct ConfusionMatrix {
    /// `matrix[(t, p)]` counts instances of true class `t` predicted as `p`.
    pub matrix: Array2<u64>,
    pub total: u64,
}

impl ConfusionMatrix {
    pub fn from_classified(data: &ClassifiedDataSet) -> Self {
        let num_labels = data.schema.num_labels();
        let mut matrix = Array2::<u64>::zeros((num_labels, num_labels));
        for i in 0..data.len() {
            matrix[(data.true_label(i), data.predicted_labels[i])] += 1;
        }
        ConfusionMatrix {
            matrix,
            total: data.len() as u64,
        }
    }

    /// Trace over total: the fraction of instances predicted correctly.
    pub fn accuracy(&self) -> f64 {
        let correct: u64 = (0..self.matrix.nrows()).map(|i| self.matrix[(i, i)]).sum();
        correct as f64 / self.total as f64
    }
}

/// `[r00,r01;r10,r11]` rendering for result files.
impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for row in 0..self.matrix.nrows() {
            if row > 0 {
                write!(f, ";")?;
            }
            for col in 0..self.matrix.ncols() {
                if col > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", self.matrix[(row, col)])?;
            }
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data::{AttributeType, DataSet, DataSetInfo, RecordSchema};

    fn classified(true_labels: &[usize], predicted: &[usize]) -> ClassifiedDataSet {
        let schema = Arc::new(RecordSchema::new(
            vec!["a".into(), "b".into()],
            vec![AttributeType::Continuous],
            vec![vec![]],
        ));
        let records = true_labels
            .iter()
            .map(|&l| vec![0.0, l as f64])
            .collect::<Vec<_>>();
        let data = DataSet::new(schema, records, DataSetInfo::named("t"));
        ClassifiedDataSet {
            schema: Arc::clone(&data.schema),
            records: data.records.clone(),
            info: data.info.clone(),
            predicted_labels: predicted.to_vec(),
            predicted_distributions: predicted
                .iter()
                .map(|&p| {
                    let mut d = vec![0.0; 2];
                    d[p] = 1.0;
                    d
                })
                .collect(),
        }
    }

    #[test]
    fn counts_and_accuracy() {
        let cds = classified(&[0, 0, 1, 1], &[0, 1, 1, 1]);
        let cm = ConfusionMatrix::from_classified(&cds);
        assert_eq!(cm.matrix[(0, 0)], 1);
        assert_eq!(cm.matrix[(0, 1)], 1);
        assert_eq!(cm.matrix[(1, 1)], 2);
        assert_eq!(cm.accuracy(), 0.75);
    }

    #[test]
    fn display_renders_rows_and_columns() {
        let cds = classified(&[0, 1], &[0, 1]);
        let cm = ConfusionMatrix::from_classified(&cds);
        assert_eq!(cm.to_string(), "[1,0;0,1]");
    }
}
