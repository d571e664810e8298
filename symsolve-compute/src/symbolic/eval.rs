//! Numeric evaluation of expressions.

use symsolve_error::Error;
use crate::error::missing_variable;
use super::expr::{Expr, VarMap, Variable};

impl Expr {
    /// Returns the free variables of this expression that have no value in `vars`, in discovery
    /// order.
    pub fn missing_vars(&self, vars: &VarMap) -> Vec<Variable> {
        self.vars()
            .into_iter()
            .filter(|var| !vars.contains(var))
            .collect()
    }

    /// Checks that every free variable of this expression has a value in `vars`.
    pub fn check_vars(&self, vars: &VarMap) -> Result<(), Error> {
        let missing = self.missing_vars(vars);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing_variable(self, &missing, vars))
        }
    }

    /// Evaluates the expression, after checking that every free variable has a value.
    ///
    /// ```
    /// use symsolve_compute::symbolic::{Expr, Variable, VarMap};
    ///
    /// let x = Variable::new("x");
    /// let expr = Expr::var(&x).pow(2.0) + Expr::Const(1.0);
    /// assert_eq!(expr.eval(&VarMap::from([(x, 3.0)])).unwrap(), 10.0);
    ///
    /// let y = Variable::new("y");
    /// assert!(Expr::var(&y).eval(&VarMap::new()).is_err());
    /// ```
    pub fn eval(&self, vars: &VarMap) -> Result<f64, Error> {
        self.check_vars(vars)?;
        Ok(self.eval_unchecked(vars))
    }

    /// Evaluates the expression without checking the assignment first. A variable with no value
    /// evaluates to `NaN`.
    ///
    /// Domain violations are not errors either: a negative base raised to a fractional power, for
    /// example, produces `NaN` like [`f64::powf`] does.
    pub fn eval_unchecked(&self, vars: &VarMap) -> f64 {
        match self {
            Self::Const(value) => *value,
            Self::Variable(var) => vars.get(var).unwrap_or(f64::NAN),
            Self::Sum(terms) => terms.iter()
                .fold(0.0, |acc, term| acc + term.eval_unchecked(vars)),
            Self::Mul(factors) => factors.iter()
                .fold(1.0, |acc, factor| acc * factor.eval_unchecked(vars)),
            Self::Pow(base, exp) => base.eval_unchecked(vars).powf(*exp),
            Self::Sin(inner) => inner.eval_unchecked(vars).sin(),
            Self::Cos(inner) => inner.eval_unchecked(vars).cos(),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::{afe_abs, afe_absolute_error_msg, afe_is_absolute_eq, assert_float_absolute_eq};
    use pretty_assertions::assert_eq;
    use std::f64::consts::PI;
    use crate::error::MissingVariable;
    use super::*;

    #[test]
    fn constants_only() {
        let expr = Expr::sum([
            Expr::mul([Expr::Const(2.0), Expr::Const(3.0)]),
            Expr::Const(4.0).pow(0.5),
            Expr::Const(-1.0),
        ]);
        assert_eq!(expr.eval(&VarMap::new()).unwrap(), 7.0);
        assert_eq!(expr.eval_unchecked(&VarMap::new()), 7.0);
    }

    #[test]
    fn empty_sum_and_product() {
        assert_eq!(Expr::Sum(vec![]).eval_unchecked(&VarMap::new()), 0.0);
        assert_eq!(Expr::Mul(vec![]).eval_unchecked(&VarMap::new()), 1.0);
    }

    #[test]
    fn trig_in_radians() {
        let t = Variable::new("t");
        let vars = VarMap::from([(t.clone(), PI / 2.0)]);
        assert_float_absolute_eq!(Expr::var(&t).sin().eval(&vars).unwrap(), 1.0);
        assert_float_absolute_eq!(Expr::var(&t).cos().eval(&vars).unwrap(), 0.0);
    }

    #[test]
    fn domain_violation_is_nan() {
        let expr = Expr::Const(-8.0).pow(1.0 / 3.0);
        assert!(expr.eval(&VarMap::new()).unwrap().is_nan());
    }

    #[test]
    fn missing_is_reported_once_per_variable() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let expr = Expr::mul([Expr::var(&x), Expr::var(&y), Expr::var(&x)]);
        let vars = VarMap::from([(y.clone(), 1.0)]);

        assert_eq!(expr.missing_vars(&vars), vec![x.clone()]);
        let err = expr.eval(&vars).unwrap_err();
        assert_eq!(err.kind::<MissingVariable>().unwrap().names, vec!["x".to_string()]);
        assert_eq!(err.spans.len(), 2);
    }

    #[test]
    fn unchecked_missing_is_nan() {
        let x = Variable::new("x");
        assert!((Expr::var(&x) + Expr::Const(1.0)).eval_unchecked(&VarMap::new()).is_nan());
    }
}
