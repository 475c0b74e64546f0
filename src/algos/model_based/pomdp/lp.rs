//! Dense tableau simplex for the small linear programs used by pruning.
//!
//! Only problems of the form `max c.x  s.t.  A x <= b, x >= 0` with
//! `b >= 0` are handled, so the slack basis is always a feasible start and
//! no phase one is needed. Bland's rule is used for both the entering and
//! leaving variable, which rules out cycling on the heavily degenerate
//! programs that witness search produces.

use ndarray::{s, Array2};

const PIVOT_EPS: f64 = 1e-11;
const RATIO_EPS: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LpStatus {
    Optimal,
    Unbounded,
    /// The pivot budget ran out; `x` and `value` hold the last feasible vertex.
    IterationLimit,
}

#[derive(Debug, Clone)]
pub(crate) struct LpSolution {
    pub status: LpStatus,
    pub value: f64,
    pub x: Vec<f64>,
}

/// Maximizes `c.x` subject to `a x <= b` and `x >= 0`. Every `b[i]` must be non-negative.
pub(crate) fn maximize(c: &[f64], a: &Array2<f64>, b: &[f64]) -> LpSolution {
    let (m, n) = a.dim();
    debug_assert_eq!(c.len(), n);
    debug_assert_eq!(b.len(), m);

    let rhs = n + m;
    let mut t = Array2::<f64>::zeros((m + 1, n + m + 1));
    t.slice_mut(s![..m, ..n]).assign(a);
    for i in 0..m {
        t[[i, n + i]] = 1.;
        t[[i, rhs]] = b[i].max(0.);
    }
    for j in 0..n {
        t[[m, j]] = -c[j];
    }
    let mut basis: Vec<usize> = (n..n + m).collect();

    let max_iterations = 50 * (n + m + 1);
    let mut status = LpStatus::IterationLimit;
    for _ in 0..max_iterations {
        let Some(col) = (0..n + m).find(|&j| t[[m, j]] < -PIVOT_EPS) else {
            status = LpStatus::Optimal;
            break;
        };

        let mut leaving: Option<(usize, f64)> = None;
        for i in 0..m {
            let coef = t[[i, col]];
            if coef <= PIVOT_EPS {
                continue;
            }
            let ratio = t[[i, rhs]] / coef;
            leaving = match leaving {
                None => Some((i, ratio)),
                Some((_, best)) if ratio < best - RATIO_EPS => Some((i, ratio)),
                Some((r, best)) if ratio <= best + RATIO_EPS && basis[i] < basis[r] => {
                    Some((i, ratio))
                }
                keep => keep,
            };
        }
        let Some((row, _)) = leaving else {
            status = LpStatus::Unbounded;
            break;
        };

        pivot(&mut t, row, col);
        basis[row] = col;
    }

    let mut x = vec![0.; n];
    for (i, &var) in basis.iter().enumerate() {
        if var < n {
            x[var] = t[[i, rhs]];
        }
    }

    LpSolution {
        status,
        value: t[[m, rhs]],
        x,
    }
}

fn pivot(t: &mut Array2<f64>, row: usize, col: usize) {
    let p = t[[row, col]];
    t.row_mut(row).mapv_inplace(|x| x / p);

    let pivot_row = t.row(row).to_owned();
    for (i, mut r) in t.rows_mut().into_iter().enumerate() {
        if i == row {
            continue;
        }
        let f = r[col];
        if f != 0. {
            r.scaled_add(-f, &pivot_row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::*;
    use ndarray::array;

    #[test]
    fn solves_textbook_problem() {
        // max 3x + 5y  s.t.  x <= 4, 2y <= 12, 3x + 2y <= 18
        let a = array![[1., 0.], [0., 2.], [3., 2.]];
        let sol = maximize(&[3., 5.], &a, &[4., 12., 18.]);

        assert_eq!(sol.status, LpStatus::Optimal);
        assert_float_eq!(sol.value, 36., abs <= 1e-9);
        assert_float_eq!(sol.x, vec![2., 6.], abs_all <= 1e-9);
    }

    #[test]
    fn origin_is_optimal_when_objective_is_non_positive() {
        let a = array![[1., 1.]];
        let sol = maximize(&[-1., 0.], &a, &[1.]);

        assert_eq!(sol.status, LpStatus::Optimal);
        assert_float_eq!(sol.value, 0., abs <= 1e-12);
    }

    #[test]
    fn detects_unbounded_direction() {
        let a = array![[1., -1.]];
        let sol = maximize(&[0., 1.], &a, &[1.]);

        assert_eq!(sol.status, LpStatus::Unbounded);
    }

    #[test]
    fn degenerate_witness_program_terminates() {
        // b0, b1, d: two accepted vectors identical to the candidate.
        let a = array![[0., 0., 1.], [0., 0., 1.], [1., 1., 0.]];
        let sol = maximize(&[0., 0., 1.], &a, &[0., 0., 1.]);

        assert_eq!(sol.status, LpStatus::Optimal);
        assert_float_eq!(sol.value, 0., abs <= 1e-12);
    }
}
