//! An expression engine with symbolic differentiation, and a Newton–Raphson solver for systems of
//! nonlinear equations built on top of it.
//!
//! - [`symbolic`] holds the expression tree, evaluation, differentiation and simplification.
//! - [`numerical`] holds the Jacobian of a system of expressions and the [`Solver`] that drives
//!   it to a root.
//!
//! [`Solver`]: numerical::Solver

pub mod error;
pub mod numerical;
pub mod symbolic;
