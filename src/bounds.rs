use crate::expr::LinearExpr;
use crate::solver::SolveError;
use std::collections::BTreeMap;

/// Inclusive integer range derived for one free variable.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Limits {
    pub min: i64,
    pub max: i64,
}

impl Limits {
    /// Number of integers in the range; zero when the range is empty.
    pub fn size(&self) -> u128 {
        if self.max < self.min {
            0
        } else {
            (self.max - self.min) as u128 + 1
        }
    }
}

/// A range still being narrowed; `max == None` means no upper bound yet.
#[derive(Copy, Clone)]
struct Narrowing {
    min: i64,
    max: Option<i64>,
}

/// Fixed-point passes are capped here. Narrowing only ever shrinks ranges,
/// so stopping early is sound; the finiteness check afterwards still decides
/// whether enumeration can proceed.
const MAX_PASSES: usize = 1024;

/// Derives the tightest inclusive range for every free variable of `width`
/// columns under the constraint that every pivot expression must evaluate to
/// a non-negative value.
///
/// Every range starts at `[0, +inf)`. Each pass rearranges every expression
/// around each free variable it references, substitutes the known extremes
/// of the other variables, and tightens the variable's range when the result
/// is stricter. Passes repeat until nothing narrows. A variable left without
/// an upper bound at the fixed point makes the system unsolvable by
/// enumeration, reported as [`SolveError::Unbounded`].
pub fn derive_limits(
    width: usize,
    exprs: &BTreeMap<usize, LinearExpr>,
) -> Result<BTreeMap<usize, Limits>, SolveError> {
    let mut limits: BTreeMap<usize, Narrowing> = (0..width)
        .filter(|col| !exprs.contains_key(col))
        .map(|col| (col, Narrowing { min: 0, max: None }))
        .collect();

    let mut narrowed = true;
    let mut passes = 0;

    while narrowed && passes < MAX_PASSES {
        narrowed = false;
        passes += 1;

        for expr in exprs.values() {
            'vars: for (&col, &coeff) in &expr.free_coeffs {
                // The expression demands
                //   constant + coeff * col + Σ other_coeff * other >= 0
                // so isolating this variable gives
                //   coeff * col >= -constant - Σ other_coeff * other.
                if coeff > 0 {
                    // A lower bound. The right-hand side is smallest when a
                    // positively-weighted variable sits at its minimum and a
                    // negatively-weighted one at its maximum.
                    let mut value = -expr.constant;

                    for (&other, &other_coeff) in &expr.free_coeffs {
                        if other == col {
                            continue;
                        }
                        if other_coeff > 0 {
                            // Needs a maximum we may not have derived yet;
                            // retry on a later pass.
                            match limits[&other].max {
                                Some(max) => value -= max * other_coeff,
                                None => continue 'vars,
                            }
                        } else {
                            value -= limits[&other].min * other_coeff;
                        }
                    }

                    let bound = ceil_div(value, coeff);
                    let range = limits.get_mut(&col).unwrap();
                    if bound > range.min {
                        range.min = bound;
                        narrowed = true;
                    }
                } else {
                    // Multiplying through by -1 flips the inequality, so
                    // this derives an upper bound; the substitutions flip
                    // symmetrically.
                    let coeff = -coeff;
                    let mut value = expr.constant;

                    for (&other, &other_coeff) in &expr.free_coeffs {
                        if other == col {
                            continue;
                        }
                        if other_coeff > 0 {
                            match limits[&other].max {
                                Some(max) => value += max * other_coeff,
                                None => continue 'vars,
                            }
                        } else {
                            value += limits[&other].min * other_coeff;
                        }
                    }

                    let bound = ceil_div(value, coeff);
                    let range = limits.get_mut(&col).unwrap();
                    if range.max.map_or(true, |max| bound < max) {
                        range.max = Some(bound);
                        narrowed = true;
                    }
                }
            }
        }
    }

    limits
        .into_iter()
        .map(|(col, range)| match range.max {
            Some(max) => Ok((
                col,
                Limits {
                    min: range.min,
                    max,
                },
            )),
            None => Err(SolveError::Unbounded),
        })
        .collect()
}

/// Ceiling division; the divisor must be positive.
fn ceil_div(a: i64, b: i64) -> i64 {
    (a + b - 1).div_euclid(b)
}
