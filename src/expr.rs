use crate::matrix::{Matrix, Row};
use gcd::Gcd;
use std::collections::BTreeMap;

/// A pivot variable written in terms of free variables only:
///
/// `coefficient * pivot = constant + Σ free_coeffs[col] * free[col]`
///
/// The coefficient is always normalized positive, and the right-hand side
/// never references another pivot variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearExpr {
    pub(crate) coefficient: i64,
    pub(crate) constant: i64,
    pub(crate) free_coeffs: BTreeMap<usize, i64>,
}

impl LinearExpr {
    /// Builds the expression for a row's pivot variable, substituting out any
    /// reference to an already-derived pivot expression.
    fn from_row(row: &Row, pivot_col: usize, derived: &BTreeMap<usize, LinearExpr>) -> Self {
        let mut coefficients = row.coefficients.clone();
        let mut total = row.total;

        // Substituting an expression `k * x = ...` stays in the integers only
        // if this row is first scaled to a multiple of every such `k`.
        let mut scale = 1;
        for (&col, expr) in derived {
            if col > pivot_col && coefficients[col] != 0 {
                scale = lcm(scale, expr.coefficient);
            }
        }

        for c in &mut coefficients[pivot_col..] {
            *c *= scale;
        }
        total *= scale;

        let mut free_coeffs = BTreeMap::new();

        for col in pivot_col + 1..coefficients.len() {
            let c = coefficients[col];
            if c == 0 {
                continue;
            }

            if let Some(expr) = derived.get(&col) {
                // Replace `c * pivot` with `(c / k) * (constant + frees)`.
                // The division is exact thanks to the scaling above. The free
                // coefficients accumulate into the working row and are folded
                // in when the loop reaches their columns.
                let m = c / expr.coefficient;
                total -= expr.constant * m;
                for (&free_col, &fc) in &expr.free_coeffs {
                    coefficients[free_col] += fc * m;
                }
            } else {
                // A genuine free variable, negated as it moves to the
                // constant side of the equation.
                free_coeffs.insert(col, -c);
            }
        }

        let mut coefficient = coefficients[pivot_col];
        let mut constant = total;

        if coefficient < 0 {
            coefficient = -coefficient;
            constant = -constant;
            free_coeffs.values_mut().for_each(|c| *c = -*c);
        }

        Self {
            coefficient,
            constant,
            free_coeffs,
        }
    }

    /// Evaluates the pivot variable under an assignment of free variables,
    /// or `None` if the result is not a non-negative integer.
    pub fn evaluate(&self, free_values: &BTreeMap<usize, i64>) -> Option<i64> {
        let mut value = self.constant;
        for (col, coeff) in &self.free_coeffs {
            value += coeff * free_values[col];
        }

        if value % self.coefficient != 0 {
            return None;
        }
        let value = value / self.coefficient;

        (value >= 0).then_some(value)
    }

    pub fn coefficient(&self) -> i64 {
        self.coefficient
    }

    /// Columns of the free variables this expression references.
    pub fn free_cols(&self) -> impl Iterator<Item = usize> + '_ {
        self.free_coeffs.keys().copied()
    }
}

/// Expresses every pivot variable of a matrix in row echelon form over the
/// free variables, keyed by pivot column. Rows are processed bottom-up so
/// that every pivot a row references is already derived.
pub fn derive_exprs(matrix: &Matrix) -> BTreeMap<usize, LinearExpr> {
    let pivots = matrix.pivot_cols();
    let mut exprs = BTreeMap::new();

    for (i, row) in matrix.rows().iter().enumerate().rev() {
        let expr = LinearExpr::from_row(row, pivots[i], &exprs);
        exprs.insert(pivots[i], expr);
    }

    exprs
}

/// Returns the positive GCD of two signed integers.
fn gcd(u: i64, v: i64) -> i64 {
    u.unsigned_abs().gcd(v.unsigned_abs()) as i64
}

/// Returns the least common multiple of two positive integers.
fn lcm(a: i64, b: i64) -> i64 {
    a / gcd(a, b) * b
}
