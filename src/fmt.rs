use crate::matrix::Matrix;
use owo_colors::OwoColorize;
use std::fmt::*;

/// Prints the matrix one equation per line, with the augmented total walled
/// off on the right:
///
/// ```text
/// | 1 1 1 0 || 10 |
/// | 0 -1 0 1 || 1 |
/// ```
///
/// Negative coefficients are highlighted, since they only appear once
/// reduction has started mixing rows.
impl Display for Matrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for row in self.rows() {
            f.write_char('|')?;
            for &c in row.coefficients() {
                if c < 0 {
                    write!(f, " {}", c.yellow())?;
                } else {
                    write!(f, " {}", c)?;
                }
            }
            writeln!(f, " || {} |", row.total().bold())?;
        }
        Ok(())
    }
}
