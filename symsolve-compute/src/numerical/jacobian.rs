use nalgebra::DMatrix;
use std::fmt::{self, Display, Formatter};
use crate::symbolic::{derivative, simplify, Expr, VarMap, Variable};

/// The Jacobian of a list of expressions with respect to a list of variables, kept in symbolic
/// form.
///
/// The cell at row `i`, column `j` is the partial derivative of expression `i` with respect to
/// variable `j`. Every cell is differentiated exactly once, when the Jacobian is built, and can
/// then be evaluated any number of times with [`ExprJacobian::eval`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExprJacobian {
    /// The cells, in row-major order.
    cells: Vec<Expr>,

    /// The variables, one per column.
    vars: Vec<Variable>,

    /// The number of rows (expressions).
    rows: usize,
}

impl ExprJacobian {
    /// Differentiates every expression with respect to every variable. The derivatives are not
    /// simplified; see [`ExprJacobian::simplified`].
    pub fn new(exprs: &[Expr], vars: &[Variable]) -> Self {
        let cells = exprs.iter()
            .flat_map(|expr| vars.iter().map(move |var| derivative(expr, var)))
            .collect();

        Self {
            cells,
            vars: vars.to_vec(),
            rows: exprs.len(),
        }
    }

    /// Simplifies every cell once. The numbers produced by [`ExprJacobian::eval`] do not change.
    pub fn simplified(self) -> Self {
        Self {
            cells: self.cells.iter().map(simplify).collect(),
            ..self
        }
    }

    /// The number of rows, which is the number of expressions.
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// The number of columns, which is the number of variables.
    pub fn col_count(&self) -> usize {
        self.vars.len()
    }

    /// The variables the columns are taken with respect to, in column order.
    pub fn variables(&self) -> &[Variable] {
        &self.vars
    }

    /// Returns the partial derivative of expression `row` with respect to variable `col`.
    pub fn get(&self, row: usize, col: usize) -> Option<&Expr> {
        if row < self.row_count() && col < self.col_count() {
            self.cells.get(row * self.col_count() + col)
        } else {
            None
        }
    }

    /// Iterates over the rows of the Jacobian.
    pub fn rows(&self) -> impl Iterator<Item = &[Expr]> {
        let cols = self.col_count();
        (0..self.rows).map(move |i| &self.cells[i * cols..(i + 1) * cols])
    }

    /// Evaluates every cell, returning a `row_count × col_count` matrix.
    ///
    /// The assignment is not checked. A variable with no value makes the cells that use it `NaN`.
    pub fn eval(&self, vars: &VarMap) -> DMatrix<f64> {
        let cols = self.col_count();
        DMatrix::from_fn(self.rows, cols, |i, j| self.cells[i * cols + j].eval_unchecked(vars))
    }
}

impl Display for ExprJacobian {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[")?;
            for (j, cell) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", cell)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
