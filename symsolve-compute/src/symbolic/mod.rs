//! Symbolic manipulation of expressions.
//!
//! # Expression representation
//!
//! Expressions are trees of [`Expr`] nodes. Sums and products are n-ary, so `a + b + c` is a
//! single [`Expr::Sum`] with three children. Powers always have a plain numeric exponent.
//!
//! ```
//! use symsolve_compute::symbolic::{Expr, Variable};
//!
//! let x = Variable::new("x");
//! let y = Variable::new("y");
//! let expr = Expr::var(&x) * Expr::var(&y) - Expr::Const(2.0);
//! assert_eq!(expr.to_string(), "((x*y) + ((-1)*2))");
//! ```
//!
//! # Operations
//!
//! - [`Expr::eval`] / [`Expr::eval_unchecked`] compute the value of an expression given a
//!   [`VarMap`].
//! - [`derivative()`] (or [`Expr::diff`]) builds the partial derivative with respect to a
//!   variable.
//! - [`simplify()`] folds constants and flattens nested sums and products. Use
//!   [`simplify_with_steps`] to see which rewrites were applied.

pub mod derivative;
mod eval;
pub mod expr;
pub mod simplify;
pub mod step_collector;

pub use derivative::derivative;
pub use expr::{cof, neg, Expr, VarGen, VarId, VarMap, Variable};
pub use simplify::{simplify, simplify_with, simplify_with_steps, step::Step};
pub use step_collector::StepCollector;
