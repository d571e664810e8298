//! Local simplification of expressions.
//!
//! This is **not** a canonicalizer. It makes one bottom-up pass over the tree and applies a small
//! set of rewrites at each node:
//!
//! - sums and products fold their constant children into a single constant, and absorb nested
//!   sums / products of the same kind;
//! - `a+0`, `a*1`, `a*0`, `a^0`, `a^1` and `(a^b)^c` are rewritten;
//! - powers, sines and cosines of constants are computed.
//!
//! Like terms are not combined, and the order of the remaining children is kept (constants that
//! survive folding move to the end). The result always evaluates to the same value as the input.
//!
//! ```
//! use symsolve_compute::symbolic::{simplify, Expr, Variable};
//!
//! let x = Variable::new("x");
//! let expr = Expr::sum([Expr::Const(2.0), Expr::Const(3.0), Expr::var(&x)]);
//! assert_eq!(simplify(&expr), Expr::Sum(vec![Expr::var(&x), Expr::Const(5.0)]));
//! ```

pub mod step;

use std::collections::VecDeque;
use super::{expr::Expr, step_collector::StepCollector};
use step::Step;

/// Folds and flattens the children of a sum.
fn simplify_sum(terms: &[Expr], step_collector: &mut dyn StepCollector<Step>) -> Expr {
    let mut queue = terms.iter()
        .map(|term| simplify_with(term, step_collector))
        .collect::<VecDeque<_>>();
    let mut kept = Vec::with_capacity(queue.len());
    let mut constant = 0.0;
    let mut folded = 0;

    while let Some(term) = queue.pop_front() {
        match term {
            Expr::Const(value) => {
                constant += value;
                folded += 1;
            },
            Expr::Sum(inner) => {
                step_collector.push(Step::FlattenSum);
                queue.extend(inner);
            },
            other => kept.push(other),
        }
    }

    if folded > 1 {
        step_collector.push(Step::FoldConstants);
    }

    if kept.is_empty() {
        return Expr::Const(constant);
    }

    if constant == 0.0 {
        if folded > 0 {
            step_collector.push(Step::AddZero);
        }
        if kept.len() == 1 {
            return kept.remove(0);
        }
        return Expr::Sum(kept);
    }

    kept.push(Expr::Const(constant));
    Expr::Sum(kept)
}

/// Folds and flattens the factors of a product. A zero factor makes the whole product zero.
fn simplify_mul(factors: &[Expr], step_collector: &mut dyn StepCollector<Step>) -> Expr {
    let mut queue = factors.iter()
        .map(|factor| simplify_with(factor, step_collector))
        .collect::<VecDeque<_>>();
    let mut kept = Vec::with_capacity(queue.len());
    let mut constant = 1.0;
    let mut folded = 0;

    while let Some(factor) = queue.pop_front() {
        match factor {
            Expr::Const(value) => {
                constant *= value;
                folded += 1;
                if constant == 0.0 {
                    step_collector.push(Step::MultiplyZero);
                    return Expr::Const(0.0);
                }
            },
            Expr::Mul(inner) => {
                step_collector.push(Step::FlattenMul);
                queue.extend(inner);
            },
            other => kept.push(other),
        }
    }

    if folded > 1 {
        step_collector.push(Step::FoldConstants);
    }

    if kept.is_empty() {
        return Expr::Const(constant);
    }

    if constant == 1.0 {
        if folded > 0 {
            step_collector.push(Step::MultiplyOne);
        }
        if kept.len() == 1 {
            return kept.remove(0);
        }
        return Expr::Mul(kept);
    }

    kept.push(Expr::Const(constant));
    Expr::Mul(kept)
}

/// Applies the power rules to a base that is already simplified.
fn simplify_pow(base: Expr, exp: f64, step_collector: &mut dyn StepCollector<Step>) -> Expr {
    if exp == 0.0 {
        step_collector.push(Step::PowerZero);
        return Expr::Const(1.0);
    }

    if exp == 1.0 {
        step_collector.push(Step::PowerOne);
        return base;
    }

    match base {
        Expr::Const(value) => {
            step_collector.push(Step::FoldConstants);
            Expr::Const(value.powf(exp))
        },
        Expr::Pow(inner, inner_exp) => {
            step_collector.push(Step::PowerPower);
            simplify_pow(*inner, inner_exp * exp, step_collector)
        },
        base => Expr::Pow(Box::new(base), exp),
    }
}

/// Simplifies the given expression, reporting every rewrite to the given step collector.
pub fn simplify_with(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Expr {
    match expr {
        Expr::Const(_) | Expr::Variable(_) => expr.clone(),
        Expr::Sum(terms) => simplify_sum(terms, step_collector),
        Expr::Mul(factors) => simplify_mul(factors, step_collector),
        Expr::Pow(base, exp) => {
            let base = simplify_with(base, step_collector);
            simplify_pow(base, *exp, step_collector)
        },
        Expr::Sin(inner) => match simplify_with(inner, step_collector) {
            Expr::Const(value) => {
                step_collector.push(Step::EvaluateTrig);
                Expr::Const(value.sin())
            },
            inner => Expr::Sin(Box::new(inner)),
        },
        Expr::Cos(inner) => match simplify_with(inner, step_collector) {
            Expr::Const(value) => {
                step_collector.push(Step::EvaluateTrig);
                Expr::Const(value.cos())
            },
            inner => Expr::Cos(Box::new(inner)),
        },
    }
}

/// Simplifies the given expression. The input is left untouched.
pub fn simplify(expr: &Expr) -> Expr {
    simplify_with(expr, &mut ())
}

/// Simplifies the given expression, and also returns the rewrites that were applied, in the
/// order they were applied.
pub fn simplify_with_steps(expr: &Expr) -> (Expr, Vec<Step>) {
    let mut steps = Vec::new();
    let simplified = simplify_with(expr, &mut steps);
    (simplified, steps)
}

impl Expr {
    /// Simplifies this expression. See [`simplify`].
    pub fn simplify(&self) -> Expr {
        simplify(self)
    }
}
