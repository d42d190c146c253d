//! Diversity measures over a set of base classifiers.
//!
//! Every function takes the per-base-model classified datasets over the
//! same instances and returns one statistic. Definitions follow Kuncheva,
//! "Combining Pattern Classifiers: Methods and Algorithms",
//! Wiley-Interscience, 2004.
use ndarray::Array2;

use crate::data::ClassifiedDataSet;

fn dimensions(cds: &[ClassifiedDataSet]) -> (usize, usize) {
    debug_assert!(cds.len() >= 2, "diversity needs at least two classifiers");
    (cds[0].len(), cds.len())
}

fn pair_count(l: usize) -> f64 {
    (l * (l - 1)) as f64 / 2.0
}

/// Number of base classifiers that misclassify each instance.
fn failure_counts(cds: &[ClassifiedDataSet]) -> Vec<usize> {
    let (n, _) = dimensions(cds);
    let mut counts = vec![0usize; n];
    for model in cds {
        for (k, count) in counts.iter_mut().enumerate() {
            if !model.is_correct(k) {
                *count += 1;
            }
        }
    }
    counts
}

/// Probability that a random instance is misclassified by exactly `i`
/// classifiers, for i in 0..=L.
fn failure_distribution(cds: &[ClassifiedDataSet]) -> Vec<f64> {
    let (n, l) = dimensions(cds);
    let mut pi = vec![0.0; l + 1];
    for count in failure_counts(cds) {
        pi[count] += 1.0;
    }
    for p in pi.iter_mut() {
        *p /= n as f64;
    }
    pi
}

/// Average pairwise rate of label mismatch between base classifiers.
pub fn disagreement(cds: &[ClassifiedDataSet]) -> f64 {
    let (n, l) = dimensions(cds);
    let mut total = 0u64;
    for i in 0..l - 1 {
        for j in i + 1..l {
            for k in 0..n {
                if cds[i].predicted_labels[k] != cds[j].predicted_labels[k] {
                    total += 1;
                }
            }
        }
    }
    total as f64 / (n as f64 * pair_count(l))
}

/// Average pairwise correlation of the binary correctness indicators.
pub fn correlation(cds: &[ClassifiedDataSet]) -> f64 {
    let (n, l) = dimensions(cds);

    // Centered oracle matrix: instances by classifiers, correct = 1.
    let mut x = Array2::<f64>::zeros((n, l));
    for (i, model) in cds.iter().enumerate() {
        let mut correct = 0.0;
        for k in 0..n {
            if model.is_correct(k) {
                x[(k, i)] = 1.0;
                correct += 1.0;
            }
        }
        let mean = correct / n as f64;
        for k in 0..n {
            x[(k, i)] -= mean;
        }
    }
    let covariance = x.t().dot(&x);

    let mut total = 0.0;
    for i in 0..l - 1 {
        for j in i + 1..l {
            total += covariance[(i, j)] / (covariance[(i, i)] * covariance[(j, j)]).sqrt();
        }
    }
    total / pair_count(l)
}

/// Average pairwise Yule Q statistic from each pair's 2x2 joint-correctness
/// table. A degenerate table (`ad + bc == 0`) contributes 1.
pub fn yule_q(cds: &[ClassifiedDataSet]) -> f64 {
    let (n, l) = dimensions(cds);
    let mut total = 0.0;
    for i in 0..l - 1 {
        for j in i + 1..l {
            let (mut a, mut b, mut c, mut d) = (0.0, 0.0, 0.0, 0.0);
            for k in 0..n {
                match (cds[i].is_correct(k), cds[j].is_correct(k)) {
                    (true, true) => a += 1.0,
                    (true, false) => b += 1.0,
                    (false, true) => c += 1.0,
                    (false, false) => d += 1.0,
                }
            }
            let (a, b, c, d) = (a / n as f64, b / n as f64, c / n as f64, d / n as f64);
            if a * d + b * c == 0.0 {
                total += 1.0;
            } else {
                total += (a * d - b * c) / (a * d + b * c);
            }
        }
    }
    total / pair_count(l)
}

/// Fraction of instances both members of a pair misclassify, averaged over
/// all pairs.
pub fn double_fault(cds: &[ClassifiedDataSet]) -> f64 {
    let (n, l) = dimensions(cds);
    let mut total = 0.0;
    for i in 0..l - 1 {
        for j in i + 1..l {
            for k in 0..n {
                if cds[i].predicted_labels[k] == cds[j].predicted_labels[k]
                    && !cds[i].is_correct(k)
                {
                    total += 1.0;
                }
            }
        }
    }
    total / (n as f64 * pair_count(l))
}

/// Entropy measure: per instance `min(e, L - e)` where `e` counts correct
/// classifiers, averaged and normalized by `N * (L - 1) / 2`.
pub fn entropy(cds: &[ClassifiedDataSet]) -> f64 {
    let (n, l) = dimensions(cds);
    let mut total = 0.0;
    for count in failure_counts(cds) {
        let correct = l - count;
        total += correct.min(l - correct) as f64;
    }
    total / (n as f64 * (l - 1) as f64 / 2.0)
}

/// Generalized diversity: `1 - p2/p1` over the failure-count distribution,
/// where `p1 = sum(i/L * pi)` and `p2 = sum(i/L * (i-1)/(L-1) * pi)`.
/// Defined as 0 when no instance is ever misclassified.
pub fn generalized_diversity(cds: &[ClassifiedDataSet]) -> f64 {
    let (_, l) = dimensions(cds);
    let pi = failure_distribution(cds);
    let mut p1 = 0.0;
    let mut p2 = 0.0;
    for i in 1..=l {
        let fraction = i as f64 / l as f64;
        p1 += fraction * pi[i];
        p2 += fraction * ((i - 1) as f64 / (l - 1) as f64) * pi[i];
    }
    if p1 == 0.0 {
        return 0.0;
    }
    1.0 - p2 / p1
}

/// Coincident failure diversity: weighted sum over failure-count
/// probabilities, normalized by the probability of at least one failure.
/// Defined as 0 when no instance is ever misclassified.
pub fn coincident_failure(cds: &[ClassifiedDataSet]) -> f64 {
    let (_, l) = dimensions(cds);
    let pi = failure_distribution(cds);
    if pi[0] == 1.0 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 1..=l {
        sum += ((l - i) as f64 / (l - 1) as f64) * pi[i];
    }
    sum / (1.0 - pi[0])
}

/// Difficulty: variance of the per-instance proportion of classifiers that
/// predict it correctly.
pub fn difficulty(cds: &[ClassifiedDataSet]) -> f64 {
    let (_, l) = dimensions(cds);
    let pi = failure_distribution(cds);

    // pi indexes failures; correct proportion for failure count i is
    // (L - i) / L.
    let mut mean = 0.0;
    for (i, p) in pi.iter().enumerate() {
        mean += ((l - i) as f64 / l as f64) * p;
    }
    let mut variance = 0.0;
    for (i, p) in pi.iter().enumerate() {
        let rate = (l - i) as f64 / l as f64;
        variance += (rate - mean).powi(2) * p;
    }
    variance
}
