//! Symbolic differentiation.
//!
//! The derivative is built rule by rule and is **not** simplified: `d/dx (2*x)` comes out as
//! `((0*x) + (1*2))`. Run the result through [`simplify`](super::simplify()) if a smaller tree is
//! wanted; the numeric value is the same either way.

use super::expr::{Expr, Variable};

/// `(f + g)' = f' + g'`
fn sum_rule(terms: &[Expr], with: &Variable) -> Expr {
    Expr::Sum(terms.iter().map(|term| derivative(term, with)).collect())
}

/// `(f * g * h)' = f' * g * h + g' * f * h + h' * f * g`
///
/// The derivative of each factor is placed first, followed by the other factors in their
/// original order.
fn product_rule(factors: &[Expr], with: &Variable) -> Expr {
    Expr::Sum(
        (0..factors.len())
            .map(|derivative_index| {
                let mut product = Vec::with_capacity(factors.len());
                product.push(derivative(&factors[derivative_index], with));
                product.extend(
                    factors.iter()
                        .enumerate()
                        .filter(|(term_index, _)| *term_index != derivative_index)
                        .map(|(_, term)| term.clone()),
                );
                Expr::Mul(product)
            })
            .collect(),
    )
}

/// `(f^p)' = p * f' * f^(p - 1)`
fn power_rule(base: &Expr, exp: f64, with: &Variable) -> Expr {
    if exp == 0.0 {
        return Expr::Const(0.0);
    }

    Expr::Mul(vec![
        Expr::Const(exp),
        derivative(base, with),
        Expr::Pow(Box::new(base.clone()), exp - 1.0),
    ])
}

/// Computes the partial derivative of `f` with respect to `with`. The input is left untouched.
///
/// Variables other than `with` are treated as constants, even if they share its name.
pub fn derivative(f: &Expr, with: &Variable) -> Expr {
    match f {
        Expr::Const(_) => Expr::Const(0.0),
        Expr::Variable(var) => Expr::Const(if var == with { 1.0 } else { 0.0 }),
        Expr::Sum(terms) => sum_rule(terms, with),
        Expr::Mul(factors) => product_rule(factors, with),
        Expr::Pow(base, exp) => power_rule(base, *exp, with),

        // (sin f)' = f' * cos f
        Expr::Sin(inner) => Expr::Mul(vec![
            derivative(inner, with),
            Expr::Cos(inner.clone()),
        ]),

        // (cos f)' = -1 * f' * sin f
        Expr::Cos(inner) => Expr::Mul(vec![
            Expr::Const(-1.0),
            derivative(inner, with),
            Expr::Sin(inner.clone()),
        ]),
    }
}

impl Expr {
    /// Computes the partial derivative of this expression with respect to `with`. See
    /// [`derivative`].
    pub fn diff(&self, with: &Variable) -> Expr {
        derivative(self, with)
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::{afe_abs, afe_absolute_error_msg, afe_is_absolute_eq, assert_float_absolute_eq};
    use pretty_assertions::assert_eq;
    use crate::symbolic::{cof, neg, VarMap};
    use super::*;

    /// Evaluates `e` with `x` substituted.
    fn eval_x(e: &Expr, x: &Variable, value: f64) -> f64 {
        e.eval(&VarMap::from([(x.clone(), value)])).unwrap()
    }

    /// Approximates the derivative of `e` at `value` with a central difference.
    fn finite_difference(e: &Expr, x: &Variable, value: f64) -> f64 {
        const DX: f64 = 1e-6;
        (eval_x(e, x, value + DX) - eval_x(e, x, value - DX)) / (2.0 * DX)
    }

    fn test_for_function(f: impl Fn(Expr) -> Expr, points: impl IntoIterator<Item = f64>) {
        const TOL: f64 = 1e-4;

        let x = Variable::new("x");
        let expr = f(Expr::var(&x));
        let symbolic = derivative(&expr, &x);

        for point in points {
            let symbolically_computed = eval_x(&symbolic, &x, point);
            let numerically_computed = finite_difference(&expr, &x, point);

            assert!(
                (symbolically_computed - numerically_computed).abs() < TOL,
                "for {expr} at x={point}, symbolically computed derivative was {symbolically_computed} but numerically computed derivative was {numerically_computed}, which was out of tolerance {TOL}",
            );
        }
    }

    #[test]
    fn power_rule() {
        test_for_function(
            |x| Expr::sum([x.clone().pow(2.0), x, Expr::Const(1.0)]),
            [0., 1., 2., 5., 8.],
        );
    }

    #[test]
    fn fractional_and_negative_powers() {
        test_for_function(|x| x.pow(0.5), [0.5, 1., 4., 9.]);
        test_for_function(|x| x.recip(), [0.5, 1., 4., -3.]);
    }

    #[test]
    fn chain_rule_through_trig() {
        test_for_function(|x| cof(3.0, x.clone()).sin() + x.pow(2.0).cos(), [-2., 0., 0.3, 1.7]);
    }

    #[test]
    fn long_product() {
        test_for_function(
            |x| Expr::mul([x.clone(), x.clone().sin(), x.clone().cos(), x.pow(3.0)]),
            [-1., 0.25, 2.],
        );
    }

    #[test]
    fn square_at_three() {
        let x = Variable::new("x");
        let d = Expr::var(&x).pow(2.0).diff(&x);
        assert_eq!(eval_x(&d, &x, 3.0), 6.0);
    }

    #[test]
    fn linear() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let a = Expr::var(&x).pow(3.0).sin();
        let b = Expr::mul([Expr::var(&x), Expr::var(&y)]);
        let sum = Expr::sum([a.clone(), b.clone()]);
        let vars = VarMap::from([(x.clone(), 0.7), (y.clone(), -1.3)]);

        assert_float_absolute_eq!(
            sum.diff(&x).eval(&vars).unwrap(),
            a.diff(&x).eval(&vars).unwrap() + b.diff(&x).eval(&vars).unwrap()
        );
    }

    #[test]
    fn product_rule_identity() {
        let x = Variable::new("x");
        let a = Expr::var(&x).cos();
        let b = Expr::var(&x).pow(2.0) + Expr::Const(4.0);
        let product = Expr::mul([a.clone(), b.clone()]);
        let vars = VarMap::from([(x.clone(), 1.1)]);

        let ev = |e: &Expr| e.eval(&vars).unwrap();
        assert_float_absolute_eq!(
            ev(&product.diff(&x)),
            ev(&a.diff(&x)) * ev(&b) + ev(&a) * ev(&b.diff(&x))
        );
    }

    #[test]
    fn structure_is_unsimplified() {
        let x = Variable::new("x");
        let y = Variable::new("y");

        assert_eq!(Expr::Const(4.0).diff(&x), Expr::Const(0.0));
        assert_eq!(Expr::var(&y).diff(&x), Expr::Const(0.0));
        assert_eq!(Expr::var(&x).pow(0.0).diff(&x), Expr::Const(0.0));
        assert_eq!(
            Expr::mul([Expr::Const(2.0), Expr::var(&x)]).diff(&x),
            Expr::Sum(vec![
                Expr::Mul(vec![Expr::Const(0.0), Expr::var(&x)]),
                Expr::Mul(vec![Expr::Const(1.0), Expr::Const(2.0)]),
            ]),
        );
        assert_eq!(
            Expr::var(&x).cos().diff(&x),
            Expr::Mul(vec![Expr::Const(-1.0), Expr::Const(1.0), Expr::var(&x).sin()]),
        );
    }

    #[test]
    fn same_name_is_a_constant() {
        let x = Variable::new("x");
        let other = Variable::new("x");
        let expr = neg(Expr::var(&other)) + Expr::var(&x);
        let d = expr.diff(&x);

        let vars = VarMap::from([(x, 2.0), (other, 5.0)]);
        assert_eq!(d.eval(&vars).unwrap(), 1.0);
    }

    #[test]
    fn input_untouched() {
        let x = Variable::new("x");
        let expr = Expr::mul([Expr::var(&x), Expr::var(&x).sin()]);
        let before = expr.clone();
        let _ = expr.diff(&x);
        assert_eq!(expr, before);
    }
}
