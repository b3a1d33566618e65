use crate::bounds::derive_limits;
use crate::expr::derive_exprs;
use crate::matrix::Matrix;
use itertools::Itertools;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

/// Candidate assignments beyond this count are refused rather than
/// enumerated.
pub const ENUMERATION_CEILING: u128 = 10_000_000;

/// Reasons a linear system has no reachable minimum.
#[derive(Debug, PartialEq, Eq)]
pub enum SolveError {
    /// Bound derivation reached a fixed point with a free variable still
    /// unbounded above, so the search space cannot be enumerated.
    Unbounded,
    /// No assignment of free variables makes every variable a non-negative
    /// integer.
    Infeasible,
    /// The bounded search space holds this many candidates, more than
    /// [`ENUMERATION_CEILING`] allows.
    SearchSpace(u128),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::Unbounded => f.write_str("a free variable has no derivable upper bound"),
            SolveError::Infeasible => f.write_str("no non-negative integer solution exists"),
            SolveError::SearchSpace(n) => {
                write!(f, "search space of {n} candidates exceeds the enumeration ceiling")
            }
        }
    }
}

impl Error for SolveError {}

/// Returns the smallest possible sum of variable values solving the system,
/// with one coefficient column per variable and one total per equation.
pub fn min_presses(columns: &[Vec<i64>], totals: &[i64]) -> Result<i64, SolveError> {
    let mut matrix = Matrix::from_columns(columns, totals);
    matrix.reduce();
    solve(&matrix)
}

/// Solves a matrix already in row echelon form.
///
/// Every pivot variable is expressed over the free variables, the free
/// variables are bounded, and every assignment in the bounded box is
/// evaluated; the smallest sum of all variable values wins.
pub fn solve(matrix: &Matrix) -> Result<i64, SolveError> {
    let exprs = derive_exprs(matrix);
    let limits = derive_limits(matrix.width(), &exprs)?;

    let candidates: u128 = limits.values().map(|range| range.size()).product();
    if candidates > ENUMERATION_CEILING {
        return Err(SolveError::SearchSpace(candidates));
    }

    let free_cols: Vec<usize> = limits.keys().copied().collect();
    let mut best: Option<i64> = None;

    let mut consider = |free_values: &BTreeMap<usize, i64>| {
        let mut sum: i64 = free_values.values().sum();
        for expr in exprs.values() {
            match expr.evaluate(free_values) {
                Some(value) => sum += value,
                None => return,
            }
        }
        best = Some(best.map_or(sum, |b| b.min(sum)));
    };

    if free_cols.is_empty() {
        // A fully determined system has exactly one candidate.
        consider(&BTreeMap::new());
    } else {
        for combination in limits
            .values()
            .map(|range| range.min..=range.max)
            .multi_cartesian_product()
        {
            let free_values = free_cols.iter().copied().zip(combination).collect();
            consider(&free_values);
        }
    }

    best.ok_or(SolveError::Infeasible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_free_variable() {
        // x0 + x1 = 2 and x1 + x2 = 3; the minimum sits at x = (0, 2, 1).
        let columns = [vec![1, 0], vec![1, 1], vec![0, 1]];
        assert_eq!(min_presses(&columns, &[2, 3]), Ok(3));
    }

    #[test]
    fn fully_determined_system() {
        let columns = [vec![1, 0], vec![0, 1]];
        assert_eq!(min_presses(&columns, &[2, 3]), Ok(5));
    }

    #[test]
    fn redundant_row_changes_nothing() {
        let columns = [vec![1, 0, 1], vec![1, 1, 1], vec![0, 1, 0]];
        assert_eq!(min_presses(&columns, &[2, 3, 2]), Ok(3));
    }

    #[test]
    fn infeasible_system() {
        // 2 * x0 = 3 has no integer solution.
        assert_eq!(min_presses(&[vec![2]], &[3]), Err(SolveError::Infeasible));
    }

    #[test]
    fn unbounded_system() {
        // x0 - x1 = 0 admits arbitrarily large solutions.
        assert_eq!(
            min_presses(&[vec![1], vec![-1]], &[0]),
            Err(SolveError::Unbounded)
        );
    }

    #[test]
    fn oversized_search_space_is_refused() {
        // x0 + x1 = 20_000_000 bounds x1 but leaves far too many candidates.
        assert_eq!(
            min_presses(&[vec![1], vec![1]], &[20_000_000]),
            Err(SolveError::SearchSpace(20_000_001))
        );
    }

    #[test]
    fn matches_brute_force_on_small_systems() {
        // x0 + 2 * x1 = 8 and x1 + x2 = 4, three variables.
        let columns = [vec![1, 0], vec![2, 1], vec![0, 1]];
        let totals = [8, 4];

        let mut brute_best = None;
        for x0 in 0..=10i64 {
            for x1 in 0..=10i64 {
                for x2 in 0..=10i64 {
                    if x0 + 2 * x1 == totals[0] && x1 + x2 == totals[1] {
                        let sum = x0 + x1 + x2;
                        brute_best = Some(brute_best.map_or(sum, |b: i64| b.min(sum)));
                    }
                }
            }
        }

        assert_eq!(min_presses(&columns, &totals), Ok(brute_best.unwrap()));
    }

    #[test]
    fn example_machine() {
        // e + f = 3, b + f = 5, c + d + e = 4, a + b + d = 7.
        let columns = [
            vec![0, 0, 0, 1],
            vec![0, 1, 0, 1],
            vec![0, 0, 1, 0],
            vec![0, 0, 1, 1],
            vec![1, 0, 1, 0],
            vec![1, 1, 0, 0],
        ];
        assert_eq!(min_presses(&columns, &[3, 5, 4, 7]), Ok(10));
    }
}
