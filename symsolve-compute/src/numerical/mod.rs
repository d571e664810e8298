//! Numerical root-finding for systems of expressions.
//!
//! An [`ExprJacobian`] holds the partial derivatives of a list of expressions in symbolic form.
//! A [`Solver`] evaluates it at the current guess and takes Newton–Raphson steps, using the
//! [`pseudo_inverse`] of the Jacobian so that singular and non-square systems still make progress
//! in the least-squares sense.

pub mod config;
pub mod jacobian;
pub mod pinv;
pub mod solver;

pub use config::{SolverConfig, SolverConfigBuilder};
pub use jacobian::ExprJacobian;
pub use pinv::pseudo_inverse;
pub use solver::{Convergence, Solver, SolverBuilder};
