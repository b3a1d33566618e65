/// One equation of the system: a coefficient per variable plus the
/// right-hand-side total of the augmented column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub(crate) coefficients: Vec<i64>,
    pub(crate) total: i64,
}

impl Row {
    pub fn new(coefficients: Vec<i64>, total: i64) -> Self {
        Self {
            coefficients,
            total,
        }
    }

    pub fn coefficients(&self) -> &[i64] {
        &self.coefficients
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    fn is_zero(&self) -> bool {
        self.coefficients.iter().all(|&c| c == 0)
    }
}

/// An augmented matrix of integer equation rows.
///
/// Reduction is fraction-free, so intermediate entries can grow by a factor
/// of the pivot magnitude per eliminated row. Inputs are expected to be
/// small (puzzle coefficients are 0 or 1 and totals a few hundred), well
/// within `i64`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix {
    cols: usize,
    rows: Vec<Row>,
}

impl Matrix {
    /// Builds a matrix from one coefficient column per variable and one
    /// total per equation. Every column must be as long as `totals`.
    pub fn from_columns(columns: &[Vec<i64>], totals: &[i64]) -> Self {
        let rows = totals
            .iter()
            .enumerate()
            .map(|(i, &total)| Row {
                coefficients: columns.iter().map(|col| col[i]).collect(),
                total,
            })
            .collect();

        Self {
            cols: columns.len(),
            rows,
        }
    }

    /// Builds a matrix directly from equation rows, all of equal width.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self {
            cols: rows.first().map_or(0, |row| row.coefficients.len()),
            rows,
        }
    }

    pub fn width(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Transforms the matrix into row echelon form in place.
    ///
    /// For each column, the first row at or below the cursor with a non-zero
    /// entry is swapped up to become the pivot row, and every non-zero entry
    /// below it is eliminated by scale-and-subtract. A column with no pivot
    /// is skipped without advancing the cursor and is later treated as a
    /// free variable. Rows reduced to all zeroes are removed at the end.
    pub fn reduce(&mut self) {
        let mut row_i = 0;

        for pivot_col in 0..self.cols {
            if row_i >= self.rows.len() {
                break;
            }

            let pivot = (row_i..self.rows.len()).find(|&i| self.rows[i].coefficients[pivot_col] != 0);

            if let Some(i) = pivot {
                self.rows.swap(row_i, i);
                self.eliminate_below(row_i, pivot_col);
                row_i += 1;
            }
        }

        self.rows.retain(|row| !row.is_zero());
    }

    /// Zeroes the pivot column below the pivot row. A row `R` with value `q`
    /// in the pivot column becomes `R * p - P * q` where `P` is the pivot row
    /// and `p` its pivot value, so the arithmetic never leaves the integers.
    fn eliminate_below(&mut self, pivot_row: usize, pivot_col: usize) {
        let (pivot, rest) = self.rows[pivot_row..].split_first_mut().unwrap();
        let p = pivot.coefficients[pivot_col];

        for row in rest {
            let q = row.coefficients[pivot_col];
            if q == 0 {
                continue;
            }

            for j in pivot_col..row.coefficients.len() {
                row.coefficients[j] = row.coefficients[j] * p - pivot.coefficients[j] * q;
            }
            row.total = row.total * p - pivot.total * q;
        }
    }

    /// Returns the pivot column of each row, in row order.
    /// Only meaningful once the matrix is in row echelon form.
    pub(crate) fn pivot_cols(&self) -> Vec<usize> {
        self.rows
            .iter()
            .map(|row| {
                row.coefficients
                    .iter()
                    .position(|&c| c != 0)
                    .unwrap() // No zero rows survive reduction.
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> Matrix {
        Matrix::from_rows(vec![
            Row::new(vec![1, 1, 1, 0], 10),
            Row::new(vec![1, 0, 1, 1], 11),
            Row::new(vec![1, 0, 1, 1], 11),
            Row::new(vec![1, 1, 0, 0], 5),
            Row::new(vec![1, 1, 1, 0], 10),
            Row::new(vec![0, 0, 1, 0], 5),
        ])
    }

    #[test]
    fn reduce_drops_dependent_rows() {
        let mut matrix = example();
        matrix.reduce();

        assert_eq!(
            matrix.rows(),
            &[
                Row::new(vec![1, 1, 1, 0], 10),
                Row::new(vec![0, -1, 0, 1], 1),
                Row::new(vec![0, 0, -1, 0], -5),
            ]
        );
    }

    #[test]
    fn reduce_keeps_pivots_strictly_increasing() {
        let mut matrix = Matrix::from_rows(vec![
            Row::new(vec![0, 2, 1, 3], 7),
            Row::new(vec![1, 1, 0, 1], 4),
            Row::new(vec![1, 3, 1, 4], 11),
            Row::new(vec![0, 0, 5, 1], 6),
        ]);
        matrix.reduce();

        let pivots = matrix.pivot_cols();
        assert!(pivots.windows(2).all(|w| w[0] < w[1]), "pivots: {pivots:?}");
    }

    #[test]
    fn reduce_preserves_solutions() {
        // x = (2, 3, 5, 4) satisfies the original equations.
        let solution = [2, 3, 5, 4];
        let mut matrix = example();

        for row in matrix.rows() {
            let lhs: i64 = row.coefficients().iter().zip(solution).map(|(c, x)| c * x).sum();
            assert_eq!(lhs, row.total());
        }

        matrix.reduce();

        for row in matrix.rows() {
            let lhs: i64 = row.coefficients().iter().zip(solution).map(|(c, x)| c * x).sum();
            assert_eq!(lhs, row.total());
        }
    }

    #[test]
    fn from_columns_transposes() {
        let matrix = Matrix::from_columns(&[vec![1, 0], vec![1, 1], vec![0, 1]], &[2, 3]);

        assert_eq!(
            matrix.rows(),
            &[Row::new(vec![1, 1, 0], 2), Row::new(vec![0, 1, 1], 3)]
        );
        assert_eq!(matrix.width(), 3);
    }
}
