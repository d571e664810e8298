use log::{debug, log_enabled, trace, warn, Level};
use nalgebra::DVector;
use std::collections::HashSet;
use symsolve_error::Error;
use crate::error::{missing_variable, unknown_parameter};
use crate::symbolic::{Expr, VarMap, Variable};
use super::{config::SolverConfig, jacobian::ExprJacobian, pinv::pseudo_inverse};

/// The outcome of [`Solver::converge_to_residual`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Convergence {
    /// The number of Newton steps that were taken.
    pub iterations: usize,

    /// The residual norm when iteration stopped.
    pub residual: f64,

    /// Whether the residual norm reached the threshold. This is `false` if the iteration budget
    /// ran out first, or if the residual became `NaN`.
    pub converged: bool,
}

/// Helper struct to build a [`Solver`].
#[derive(Debug, Clone, Default)]
pub struct SolverBuilder {
    exprs: Vec<Expr>,
    initial: VarMap,
    parameters: VarMap,
    config: SolverConfig,
}

impl SolverBuilder {
    /// Creates a builder for a solver that drives the given expressions to zero.
    pub fn new(exprs: impl IntoIterator<Item = Expr>) -> Self {
        Self {
            exprs: exprs.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Sets the initial guess for the unknowns.
    pub fn initial(mut self, initial: VarMap) -> Self {
        self.initial = initial;
        self
    }

    /// Sets the parameters: variables that appear in the expressions, but are held fixed instead
    /// of being solved for. A variable given both here and in [`SolverBuilder::initial`] is a
    /// parameter.
    pub fn parameters(mut self, parameters: VarMap) -> Self {
        self.parameters = parameters;
        self
    }

    /// Sets the solver options.
    pub fn config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the solver, differentiating every expression once.
    ///
    /// Returns an error if some free variable of an expression has neither an initial value nor
    /// a parameter value. No solver is produced in that case.
    pub fn build(self) -> Result<Solver, Error> {
        let Self { exprs, initial, parameters, config } = self;

        let mut bound = initial.clone();
        bound.extend(parameters.iter().map(|(var, value)| (var.clone(), *value)));
        for expr in &exprs {
            let missing = expr.missing_vars(&bound);
            if !missing.is_empty() {
                return Err(missing_variable(expr, &missing, &bound));
            }
        }

        let mut seen = HashSet::new();
        let vars = exprs.iter()
            .flat_map(Expr::vars)
            .filter(|var| !parameters.contains(var))
            .filter(|var| seen.insert(var.id()))
            .collect::<Vec<_>>();

        let values = DVector::from_iterator(
            vars.len(),
            vars.iter().map(|var| initial.get(var).unwrap_or(f64::NAN)),
        );

        let mut jacobian = ExprJacobian::new(&exprs, &vars);
        if config.simplify_jacobian {
            jacobian = jacobian.simplified();
        }

        debug!(
            "built solver: {} equation(s), {} unknown(s), {} parameter(s)",
            exprs.len(),
            vars.len(),
            parameters.len(),
        );

        Ok(Solver { exprs, vars, values, parameters, jacobian, config })
    }
}

/// A Newton–Raphson solver for a system of expressions `f(x) = 0`.
///
/// The unknowns are the free variables of the expressions that are not parameters, in the order
/// they are first found, expression by expression. Each call to [`Solver::iterate`] takes one
/// step
///
/// ```text
/// x ← x - pinv(J(x)) · f(x)
/// ```
///
/// where `J` is the Jacobian, built symbolically once, and `pinv` is the Moore–Penrose
/// pseudo-inverse. Using the pseudo-inverse means that singular and non-square systems take a
/// least-squares step instead of failing.
///
/// Nothing guards against `NaN`: if an expression cannot be evaluated at the current state (for
/// example, a negative number raised to a fractional power), the `NaN` spreads into the state.
///
/// ```
/// use symsolve_compute::numerical::Solver;
/// use symsolve_compute::symbolic::{Expr, VarMap, Variable};
///
/// // y^2 - 2 = 0
/// let y = Variable::new("y");
/// let expr = Expr::var(&y).pow(2.0) - Expr::Const(2.0);
/// let mut solver = Solver::new([expr], VarMap::from([(y.clone(), 1.0)])).unwrap();
///
/// let report = solver.converge_to_residual(1e-12, Some(50));
/// assert!(report.converged);
/// assert!((solver.value_of(&y).unwrap() - 2f64.sqrt()).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct Solver {
    /// The expressions to drive to zero.
    exprs: Vec<Expr>,

    /// The unknowns, in state vector order.
    vars: Vec<Variable>,

    /// The current value of each unknown.
    values: DVector<f64>,

    /// Variables held fixed while solving.
    parameters: VarMap,

    /// The Jacobian of `exprs` with respect to `vars`.
    jacobian: ExprJacobian,

    config: SolverConfig,
}

impl Solver {
    /// Creates a solver with default options and no parameters. See [`SolverBuilder::build`].
    pub fn new(exprs: impl IntoIterator<Item = Expr>, initial: VarMap) -> Result<Self, Error> {
        SolverBuilder::new(exprs).initial(initial).build()
    }

    /// Returns a builder for a solver of the given expressions.
    pub fn builder(exprs: impl IntoIterator<Item = Expr>) -> SolverBuilder {
        SolverBuilder::new(exprs)
    }

    /// The unknowns, in state vector order.
    pub fn variables(&self) -> &[Variable] {
        &self.vars
    }

    /// The current value of each unknown, in the order of [`Solver::variables`].
    pub fn values(&self) -> &DVector<f64> {
        &self.values
    }

    /// The expressions being driven to zero.
    pub fn exprs(&self) -> &[Expr] {
        &self.exprs
    }

    /// The symbolic Jacobian, with one column per unknown.
    pub fn jacobian(&self) -> &ExprJacobian {
        &self.jacobian
    }

    /// The parameters and their current values.
    pub fn parameters(&self) -> &VarMap {
        &self.parameters
    }

    /// The options this solver was built with.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Returns the current values of the unknowns and the parameters. This is rebuilt on every
    /// call.
    pub fn current_assignment(&self) -> VarMap {
        let mut assignment = VarMap::with_capacity(self.vars.len() + self.parameters.len());
        assignment.extend(self.vars.iter().cloned().zip(self.values.iter().copied()));
        assignment.extend(self.parameters.iter().map(|(var, value)| (var.clone(), *value)));
        assignment
    }

    /// Returns the current value of an unknown or a parameter.
    pub fn value_of(&self, var: &Variable) -> Option<f64> {
        self.vars.iter()
            .position(|v| v == var)
            .map(|i| self.values[i])
            .or_else(|| self.parameters.get(var))
    }

    /// Changes the value of a parameter. The new value is used from the next iteration on.
    ///
    /// Returns an error if `var` was not given as a parameter when the solver was built.
    pub fn set_parameter(&mut self, var: &Variable, value: f64) -> Result<(), Error> {
        match self.parameters.get_mut(var) {
            Some(slot) => {
                *slot = value;
                Ok(())
            },
            None => Err(unknown_parameter(var, self.vars.contains(var))),
        }
    }

    /// Evaluates every expression at the current state.
    pub fn residuals(&self) -> Vec<f64> {
        let assignment = self.current_assignment();
        self.eval_exprs(&assignment).iter().copied().collect()
    }

    /// The root-mean-square of the expression values at the current state. This is `0` at an
    /// exact root, and also when there are no expressions.
    pub fn residual_norm(&self) -> f64 {
        let assignment = self.current_assignment();
        rms(&self.eval_exprs(&assignment))
    }

    /// Takes one Newton step. No convergence check is done.
    pub fn iterate(&mut self) {
        let assignment = self.current_assignment();
        let jacobian = self.jacobian.eval(&assignment);
        let residuals = self.eval_exprs(&assignment);

        let step = pseudo_inverse(&jacobian, self.config.pinv_tolerance) * &residuals;
        self.values -= step;

        if log_enabled!(Level::Trace) {
            trace!("iterate: residual before step = {}, after = {}", rms(&residuals), self.residual_norm());
        }
    }

    /// Takes `n` Newton steps.
    pub fn iterate_n(&mut self, n: usize) {
        for _ in 0..n {
            self.iterate();
        }
    }

    /// Iterates until the residual norm is at or below `threshold`, or until `max_iterations`
    /// steps have been taken. If `max_iterations` is [`None`], there is no limit.
    ///
    /// Running out of iterations is not an error; check [`Convergence::converged`]. Iteration
    /// also stops if the residual becomes `NaN`.
    pub fn converge_to_residual(&mut self, threshold: f64, max_iterations: Option<usize>) -> Convergence {
        let mut iterations = 0;
        let mut residual = self.residual_norm();

        while residual > threshold && max_iterations.map_or(true, |max| iterations < max) {
            self.iterate();
            iterations += 1;
            residual = self.residual_norm();
        }

        if !residual.is_finite() {
            warn!("residual is not finite after {} iteration(s): {}", iterations, residual);
        }

        let converged = residual <= threshold;
        debug!(
            "stopped after {} iteration(s): residual = {}, converged = {}",
            iterations,
            residual,
            converged,
        );

        Convergence { iterations, residual, converged }
    }

    /// Like [`Solver::converge_to_residual`], with the iteration budget taken from
    /// [`SolverConfig::max_iterations`].
    pub fn converge(&mut self, threshold: f64) -> Convergence {
        self.converge_to_residual(threshold, self.config.max_iterations)
    }

    /// Evaluates every expression at the given assignment.
    fn eval_exprs(&self, assignment: &VarMap) -> DVector<f64> {
        DVector::from_iterator(
            self.exprs.len(),
            self.exprs.iter().map(|expr| expr.eval_unchecked(assignment)),
        )
    }
}

/// Root-mean-square of the given values, `0` if there are none.
fn rms(values: &DVector<f64>) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        (values.norm_squared() / values.len() as f64).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::{afe_abs, afe_absolute_error_msg, afe_is_absolute_eq, assert_float_absolute_eq};
    use pretty_assertions::assert_eq;
    use crate::error::{MissingVariable, UnknownParameter};
    use crate::numerical::SolverConfigBuilder;
    use crate::symbolic::neg;
    use super::*;

    #[test]
    fn variable_order_is_discovery_order() {
        let a = Variable::new("a");
        let b = Variable::new("b");
        let c = Variable::new("c");
        let exprs = [
            Expr::var(&b) + Expr::var(&a),
            Expr::var(&c) + Expr::var(&b),
        ];
        let initial = VarMap::from([(a.clone(), 1.0), (b.clone(), 2.0), (c.clone(), 3.0)]);
        let solver = Solver::new(exprs, initial).unwrap();

        assert_eq!(solver.variables(), &[b, a, c]);
        assert_eq!(solver.values().as_slice(), &[2.0, 1.0, 3.0]);
        assert_eq!(solver.jacobian().col_count(), 3);
    }

    #[test]
    fn missing_initial_value() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let err = Solver::new([Expr::var(&y) + neg(Expr::var(&x))], VarMap::from([(y, 1.0)]))
            .unwrap_err();

        let kind = err.kind::<MissingVariable>().unwrap();
        assert_eq!(kind.names, vec!["x".to_string()]);
        assert_eq!(err.src, "(y + ((-1)*x))");
    }

    #[test]
    fn empty_system() {
        let mut solver = Solver::new(Vec::new(), VarMap::new()).unwrap();
        assert_eq!(solver.residual_norm(), 0.0);
        assert!(solver.residuals().is_empty());

        solver.iterate();
        let report = solver.converge_to_residual(0.0, None);
        assert_eq!(report, Convergence { iterations: 0, residual: 0.0, converged: true });
    }

    #[test]
    fn parameters_are_not_unknowns() {
        let x = Variable::new("x");
        let k = Variable::new("k");
        // x - k = 0
        let mut solver = Solver::builder([Expr::var(&x) - Expr::var(&k)])
            .initial(VarMap::from([(x.clone(), 10.0)]))
            .parameters(VarMap::from([(k.clone(), 3.0)]))
            .build()
            .unwrap();

        assert_eq!(solver.variables(), &[x.clone()]);
        solver.iterate();
        assert_float_absolute_eq!(solver.value_of(&x).unwrap(), 3.0);

        solver.set_parameter(&k, -4.0).unwrap();
        assert_eq!(solver.value_of(&k), Some(-4.0));
        solver.iterate();
        assert_float_absolute_eq!(solver.value_of(&x).unwrap(), -4.0);
    }

    #[test]
    fn set_parameter_rejects_unknowns() {
        let x = Variable::new("x");
        let stranger = Variable::new("z");
        let mut solver = Solver::new([Expr::var(&x)], VarMap::from([(x.clone(), 1.0)])).unwrap();

        let err = solver.set_parameter(&x, 2.0).unwrap_err();
        assert!(err.kind::<UnknownParameter>().unwrap().is_unknown);
        let err = solver.set_parameter(&stranger, 2.0).unwrap_err();
        assert!(!err.kind::<UnknownParameter>().unwrap().is_unknown);
        assert_eq!(solver.value_of(&x), Some(1.0));
    }

    #[test]
    fn converge_uses_config_budget() {
        let x = Variable::new("x");
        // x^2 + 1 has no real root
        let config = SolverConfigBuilder::new().max_iterations(Some(7)).build();
        let mut solver = Solver::builder([Expr::var(&x).pow(2.0) + Expr::Const(1.0)])
            .initial(VarMap::from([(x, 0.5)]))
            .config(config)
            .build()
            .unwrap();

        let report = solver.converge(1e-9);
        assert_eq!(report.iterations, 7);
        assert!(!report.converged);
    }

    #[test]
    fn simplified_jacobian_takes_same_steps() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let exprs = vec![
            Expr::mul([Expr::var(&x), Expr::var(&y)]) - Expr::Const(6.0),
            Expr::var(&x) + Expr::var(&y) - Expr::Const(5.0),
        ];
        let initial = VarMap::from([(x.clone(), 1.0), (y.clone(), 4.5)]);

        let mut plain = Solver::new(exprs.clone(), initial.clone()).unwrap();
        let mut simplified = Solver::builder(exprs)
            .initial(initial)
            .config(SolverConfig::builder().simplify_jacobian(true).build())
            .build()
            .unwrap();

        plain.iterate_n(5);
        simplified.iterate_n(5);
        for (a, b) in plain.values().iter().zip(simplified.values().iter()) {
            assert_float_absolute_eq!(*a, *b, 1e-9);
        }
    }

    #[test]
    fn nan_spreads_and_stops_convergence() {
        let x = Variable::new("x");
        let mut solver = Solver::new([Expr::var(&x).pow(0.5) - Expr::Const(1.0)], VarMap::from([(x.clone(), -4.0)]))
            .unwrap();

        let report = solver.converge_to_residual(1e-9, Some(10));
        assert!(report.residual.is_nan());
        assert!(!report.converged);
        assert_eq!(report.iterations, 0);

        solver.iterate();
        assert!(solver.value_of(&x).unwrap().is_nan());
    }
}
