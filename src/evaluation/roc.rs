use crate::data::ClassifiedDataSet;

/// Receiver-operating-characteristic analysis for one positive class.
///
/// The multi-class problem is reduced one-vs-rest: an instance is positive
/// when its true label equals `positive_class`, and its score is the
/// predicted probability of that class. Instances are swept in descending
/// score order; a curve point is emitted only when the score changes, so
/// ties merge into a single point, and AUC accumulates by the trapezoid
/// rule between successive points.
pub struct RocGraph {
    /// (is positive, predicted positive-class probability), sorted by
    /// descending probability.
    scored: Vec<(bool, f64)>,
    total_positive: usize,
    total_negative: usize,
}

impl RocGraph {
    pub fn new(data: &ClassifiedDataSet, positive_class: usize) -> Self {
        let mut scored: Vec<(bool, f64)> = (0..data.len())
            .map(|i| {
                (
                    data.true_label(i) == positive_class,
                    data.predicted_distributions[i][positive_class],
                )
            })
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let total_positive = scored.iter().filter(|(p, _)| *p).count();
        let total_negative = scored.len() - total_positive;
        RocGraph {
            scored,
            total_positive,
            total_negative,
        }
    }

    /// Area under the ROC curve. Zero positives degenerate to 0, zero
    /// negatives to 1.
    pub fn auc(&self) -> f64 {
        if self.total_positive == 0 {
            return 0.0;
        }
        if self.total_negative == 0 {
            return 1.0;
        }

        let mut fp = 0.0;
        let mut tp = 0.0;
        let mut fp_prev = 0.0;
        let mut tp_prev = 0.0;
        let mut prev_score = f64::NEG_INFINITY;
        let mut area = 0.0;

        for &(positive, score) in &self.scored {
            if score != prev_score {
                area += (tp + tp_prev) * (fp - fp_prev) / 2.0;
                prev_score = score;
                fp_prev = fp;
                tp_prev = tp;
            }
            if positive {
                tp += 1.0;
            } else {
                fp += 1.0;
            }
        }
        area += (tp + tp_prev) * (fp - fp_prev) / 2.0;
        area / (self.total_positive as f64 * self.total_negative as f64)
    }

    /// The ROC curve as (false-positive-rate, true-positive-rate) point
    /// lists. Degenerate inputs return the fixed curves
    /// {(0,0),(1,0),(1,1)} (no positives) and {(0,0),(0,1),(1,1)} (no
    /// negatives).
    pub fn points(&self) -> (Vec<f64>, Vec<f64>) {
        if self.total_positive == 0 {
            return (vec![0.0, 1.0, 1.0], vec![0.0, 0.0, 1.0]);
        }
        if self.total_negative == 0 {
            return (vec![0.0, 0.0, 1.0], vec![0.0, 1.0, 1.0]);
        }

        let mut xs = Vec::new();
        let mut ys = Vec::new();
        let mut fp = 0.0;
        let mut tp = 0.0;
        let mut prev_score = f64::NEG_INFINITY;

        for &(positive, score) in &self.scored {
            if score != prev_score {
                xs.push(fp / self.total_negative as f64);
                ys.push(tp / self.total_positive as f64);
                prev_score = score;
            }
            if positive {
                tp += 1.0;
            } else {
                fp += 1.0;
            }
        }
        // Final sweep state is always (1,1).
        xs.push(fp / self.total_negative as f64);
        ys.push(tp / self.total_positive as f64);
        (xs, ys)
    }
}
