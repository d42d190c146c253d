//! Small dense linear-algebra helpers.
//!
//! The OLS fusion rule solves its weights by inverting the design matrix
//! directly (not by a least-squares solve), so all it needs from here is a
//! plain Gauss-Jordan inversion with partial pivoting.
use ndarray::Array2;

use crate::error::Error;
use crate::Result;

const PIVOT_EPS: f64 = 1e-12;

/// Invert a square matrix by Gauss-Jordan elimination with partial
/// pivoting. Fails with [`Error::SingularMatrix`] when the matrix is not
/// square or a pivot vanishes.
pub fn invert(matrix: &Array2<f64>) -> Result<Array2<f64>> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(Error::SingularMatrix { rows, cols });
    }
    let n = rows;

    // Augmented [A | I], reduced in place.
    let mut a = matrix.clone();
    let mut inv = Array2::<f64>::eye(n);

    for col in 0..n {
        // Pick the largest remaining pivot in this column.
        let mut pivot = col;
        for row in col + 1..n {
            if a[(row, col)].abs() > a[(pivot, col)].abs() {
                pivot = row;
            }
        }
        if a[(pivot, col)].abs() < PIVOT_EPS {
            return Err(Error::SingularMatrix { rows, cols });
        }
        if pivot != col {
            swap_rows(&mut a, pivot, col);
            swap_rows(&mut inv, pivot, col);
        }

        let scale = a[(col, col)];
        for k in 0..n {
            a[(col, k)] /= scale;
            inv[(col, k)] /= scale;
        }

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = a[(row, col)];
            if factor == 0.0 {
                continue;
            }
            for k in 0..n {
                a[(row, k)] -= factor * a[(col, k)];
                inv[(row, k)] -= factor * inv[(col, k)];
            }
        }
    }

    Ok(inv)
}

fn swap_rows(m: &mut Array2<f64>, i: usize, j: usize) {
    let cols = m.ncols();
    for k in 0..cols {
        let tmp = m[(i, k)];
        m[(i, k)] = m[(j, k)];
        m[(j, k)] = tmp;
    }
}

/// Index of the first maximum of a slice; ties resolve to the lowest index.
pub fn first_argmax(values: &[f64]) -> usize {
    let mut max = f64::NEG_INFINITY;
    let mut max_index = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > max {
            max = v;
            max_index = i;
        }
    }
    max_index
}

/// Scale a vector by its L1 norm (sum of absolute values). Regression
/// fusion can produce negative entries, so the norm is taken over absolute
/// values. Leaves an all-zero vector untouched.
pub fn l1_normalize(values: &mut [f64]) {
    let norm: f64 = values.iter().map(|v| v.abs()).sum();
    if norm != 0.0 {
        for v in values.iter_mut() {
            *v /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn inverts_known_2x2() {
        let m = arr2(&[[4.0, 7.0], [2.0, 6.0]]);
        let inv = invert(&m).unwrap();
        let expected = arr2(&[[0.6, -0.7], [-0.2, 0.4]]);
        for (a, b) in inv.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn product_with_inverse_is_identity() {
        let m = arr2(&[[2.0, 1.0, 0.0], [1.0, 3.0, 1.0], [0.0, 1.0, 4.0]]);
        let inv = invert(&m).unwrap();
        let product = m.dot(&inv);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((product[(i, j)] - expected).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn rejects_singular_matrix() {
        let m = arr2(&[[1.0, 2.0], [2.0, 4.0]]);
        assert!(matches!(
            invert(&m),
            Err(Error::SingularMatrix { rows: 2, cols: 2 })
        ));
    }

    #[test]
    fn rejects_non_square_matrix() {
        let m = Array2::<f64>::zeros((2, 3));
        assert!(matches!(
            invert(&m),
            Err(Error::SingularMatrix { rows: 2, cols: 3 })
        ));
    }

    #[test]
    fn argmax_ties_resolve_to_lowest_index() {
        assert_eq!(first_argmax(&[0.2, 0.4, 0.4]), 1);
        assert_eq!(first_argmax(&[0.5, 0.5]), 0);
    }

    #[test]
    fn normalization_sums_to_one() {
        let mut v = vec![2.0, 1.0, 1.0];
        l1_normalize(&mut v);
        assert!((v.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert_eq!(v[0], 0.5);
    }
}
