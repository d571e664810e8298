//! The expression tree and the variables that appear in it.
//!
//! An [`Expr`] is an owned tree built from seven kinds of node: constants, variables, n-ary sums
//! and products, powers with a fixed numeric exponent, and the sine / cosine of a sub-expression.
//! There is no subtraction or division node. Subtraction is written as `a + (-1 * b)` and
//! division as `a * b^-1`; the [`Sub`](std::ops::Sub) and [`Div`](std::ops::Div) implementations
//! on [`Expr`] do this lowering for you.
//!
//! # Variable identity
//!
//! A [`Variable`] is identified by a [`VarId`] handed out when it is created, **not** by its
//! name. Two variables constructed with the same name are different unknowns:
//!
//! ```
//! use symsolve_compute::symbolic::expr::{Variable, VarMap};
//!
//! let a = Variable::new("x");
//! let b = Variable::new("x");
//! assert_ne!(a, b);
//!
//! let mut map = VarMap::new();
//! map.insert(a.clone(), 1.0);
//! assert!(map.contains(&a));
//! assert!(!map.contains(&b));
//! ```
//!
//! Names are only used for display. When a caller does not care about names, a [`VarGen`] hands
//! out variables named `x0`, `x1`, ... in order, independently of any other generator.

mod fmt;
mod iter;

pub use fmt::Rendered;
pub use iter::ExprIter;

use std::{
    collections::{hash_map, HashMap, HashSet},
    hash::{Hash, Hasher},
    ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub},
    sync::{atomic::{AtomicU64, Ordering}, Arc},
};

/// Source of [`VarId`]s. Every variable created in the process gets a distinct id.
static NEXT_VAR_ID: AtomicU64 = AtomicU64::new(0);

/// The identity of a [`Variable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(u64);

impl VarId {
    /// Allocates a fresh id.
    fn next() -> Self {
        Self(NEXT_VAR_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw value of the id.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A free scalar unknown.
///
/// Cloning a variable is cheap and the clone refers to the **same** unknown. Equality, ordering
/// and hashing only look at the [`VarId`].
#[derive(Debug, Clone)]
pub struct Variable {
    id: VarId,
    name: Arc<str>,
}

impl Variable {
    /// Creates a new, distinct variable with the given display name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            id: VarId::next(),
            name: Arc::from(name.as_ref()),
        }
    }

    /// The identity of this variable.
    pub fn id(&self) -> VarId {
        self.id
    }

    /// The display name of this variable.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Variable {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Variable {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Hands out variables with default names `x0`, `x1`, `x2`, ...
///
/// Each generator counts on its own, so the names produced in one context never depend on how
/// many variables were created elsewhere. The identities are still globally unique.
#[derive(Debug, Default, Clone)]
pub struct VarGen {
    next: usize,
}

impl VarGen {
    /// Creates a generator whose first variable is named `x0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a variable with the next default name.
    pub fn fresh(&mut self) -> Variable {
        let var = Variable::new(format!("x{}", self.next));
        self.next += 1;
        var
    }

    /// Creates a variable with the given name, or the next default name if `name` is [`None`].
    ///
    /// The counter only advances when a default name is used.
    pub fn named_or_fresh(&mut self, name: Option<&str>) -> Variable {
        match name {
            Some(name) => Variable::new(name),
            None => self.fresh(),
        }
    }
}

/// An assignment of numeric values to variables, keyed by variable identity.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct VarMap(HashMap<Variable, f64>);

impl VarMap {
    /// Creates an empty assignment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty assignment with room for `capacity` variables.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(HashMap::with_capacity(capacity))
    }

    /// Sets the value of a variable, returning the previous value if there was one.
    pub fn insert(&mut self, var: Variable, value: f64) -> Option<f64> {
        self.0.insert(var, value)
    }

    /// Returns the value of a variable.
    pub fn get(&self, var: &Variable) -> Option<f64> {
        self.0.get(var).copied()
    }

    /// Returns a mutable reference to the value of a variable.
    pub fn get_mut(&mut self, var: &Variable) -> Option<&mut f64> {
        self.0.get_mut(var)
    }

    /// Returns true if the variable has a value.
    pub fn contains(&self, var: &Variable) -> bool {
        self.0.contains_key(var)
    }

    /// Removes a variable, returning its value.
    pub fn remove(&mut self, var: &Variable) -> Option<f64> {
        self.0.remove(var)
    }

    /// The number of variables with a value.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no variable has a value.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the assignment in arbitrary order.
    pub fn iter(&self) -> hash_map::Iter<'_, Variable, f64> {
        self.0.iter()
    }

    /// Iterates over the variables with a value in arbitrary order.
    pub fn variables(&self) -> hash_map::Keys<'_, Variable, f64> {
        self.0.keys()
    }
}

impl FromIterator<(Variable, f64)> for VarMap {
    fn from_iter<I: IntoIterator<Item = (Variable, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[(Variable, f64); N]> for VarMap {
    fn from(pairs: [(Variable, f64); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl Extend<(Variable, f64)> for VarMap {
    fn extend<I: IntoIterator<Item = (Variable, f64)>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for VarMap {
    type Item = (Variable, f64);
    type IntoIter = hash_map::IntoIter<Variable, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a VarMap {
    type Item = (&'a Variable, &'a f64);
    type IntoIter = hash_map::Iter<'a, Variable, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A scalar algebraic expression.
///
/// Each node owns its children, so an expression is always a tree. Operations that produce a new
/// expression ([`Expr::diff`], [`simplify`](crate::symbolic::simplify())) never modify their input.
///
/// [`PartialEq`] is structural: two expressions are equal if they have the same shape, the same
/// children in the same order, and the same constants (compared with `==`, so `NaN != NaN`).
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A fixed scalar.
    Const(f64),

    /// A free scalar unknown.
    Variable(Variable),

    /// Multiple terms added together.
    Sum(Vec<Expr>),

    /// Multiple factors multiplied together.
    Mul(Vec<Expr>),

    /// An expression raised to a fixed numeric power.
    Pow(Box<Expr>, f64),

    /// The sine of an expression, in radians.
    Sin(Box<Expr>),

    /// The cosine of an expression, in radians.
    Cos(Box<Expr>),
}

impl Expr {
    /// Creates a [`Expr::Const`].
    pub fn constant(value: f64) -> Self {
        Self::Const(value)
    }

    /// Creates a [`Expr::Variable`] referring to the given variable.
    pub fn var(var: &Variable) -> Self {
        Self::Variable(var.clone())
    }

    /// Creates a [`Expr::Sum`] of the given terms, without flattening.
    pub fn sum(terms: impl IntoIterator<Item = Expr>) -> Self {
        Self::Sum(terms.into_iter().collect())
    }

    /// Creates a [`Expr::Mul`] of the given factors, without flattening.
    pub fn mul(factors: impl IntoIterator<Item = Expr>) -> Self {
        Self::Mul(factors.into_iter().collect())
    }

    /// Raises this expression to a fixed power.
    pub fn pow(self, exponent: f64) -> Self {
        Self::Pow(Box::new(self), exponent)
    }

    /// The sine of this expression.
    pub fn sin(self) -> Self {
        Self::Sin(Box::new(self))
    }

    /// The cosine of this expression.
    pub fn cos(self) -> Self {
        Self::Cos(Box::new(self))
    }

    /// The reciprocal of this expression, `self^-1`.
    pub fn recip(self) -> Self {
        self.pow(-1.0)
    }

    /// If the expression is a [`Expr::Const`], returns the contained value.
    pub fn as_const(&self) -> Option<f64> {
        match self {
            Self::Const(value) => Some(*value),
            _ => None,
        }
    }

    /// If the expression is a [`Expr::Variable`], returns a reference to the contained variable.
    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Self::Variable(var) => Some(var),
            _ => None,
        }
    }

    /// Returns true if the expression is a [`Expr::Const`].
    pub fn is_const(&self) -> bool {
        matches!(self, Self::Const(_))
    }

    /// Returns the direct children of this expression, in order.
    pub fn children(&self) -> &[Expr] {
        match self {
            Self::Const(_) | Self::Variable(_) => &[],
            Self::Sum(children) | Self::Mul(children) => children,
            Self::Pow(inner, _) | Self::Sin(inner) | Self::Cos(inner) => std::slice::from_ref(&**inner),
        }
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// Returns the free variables of this expression, without duplicates, in the order they are
    /// first reached by a left-to-right traversal.
    pub fn vars(&self) -> Vec<Variable> {
        let mut seen = HashSet::new();
        self.post_order_iter()
            .filter_map(Expr::as_variable)
            .filter(|var| seen.insert(var.id()))
            .cloned()
            .collect()
    }

    /// Returns true if the given variable appears in this expression.
    pub fn contains_var(&self, var: &Variable) -> bool {
        self.post_order_iter()
            .any(|expr| expr.as_variable() == Some(var))
    }

    /// Returns the number of nodes in this expression.
    pub fn node_count(&self) -> usize {
        self.post_order_iter().count()
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Self::Const(value)
    }
}

impl From<Variable> for Expr {
    fn from(var: Variable) -> Self {
        Self::Variable(var)
    }
}

impl From<&Variable> for Expr {
    fn from(var: &Variable) -> Self {
        Self::Variable(var.clone())
    }
}

/// Multiplies the expression by -1.
pub fn neg(expr: Expr) -> Expr {
    cof(-1.0, expr)
}

/// Multiplies the expression by the constant coefficient `n`.
///
/// If the expression is already a [`Expr::Mul`], the coefficient is appended to its factors
/// instead of wrapping it in another product.
pub fn cof(n: f64, expr: Expr) -> Expr {
    match expr {
        Expr::Mul(mut factors) => {
            factors.push(Expr::Const(n));
            Expr::Mul(factors)
        },
        expr => Expr::Mul(vec![Expr::Const(n), expr]),
    }
}

/// Adds two [`Expr`]s together. No simplification is done, except that operands which are
/// already [`Expr::Sum`]s are combined into one list of terms (flattening).
impl Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Sum(mut terms), Self::Sum(rhs_terms)) => {
                terms.extend(rhs_terms);
                Self::Sum(terms)
            },
            (Self::Sum(mut terms), other) => {
                terms.push(other);
                Self::Sum(terms)
            },
            (other, Self::Sum(mut terms)) => {
                terms.insert(0, other);
                Self::Sum(terms)
            },
            (lhs, rhs) => Self::Sum(vec![lhs, rhs]),
        }
    }
}

impl AddAssign for Expr {
    fn add_assign(&mut self, rhs: Self) {
        let lhs = std::mem::replace(self, Self::Sum(Vec::new()));
        *self = lhs + rhs;
    }
}

/// Subtracts two [`Expr`]s, producing `self + (-1 * rhs)`.
impl Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + neg(rhs)
    }
}

/// Multiplies two [`Expr`]s together. No simplification is done, except that operands which are
/// already [`Expr::Mul`]s are combined into one list of factors (flattening).
impl Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Mul(mut factors), Self::Mul(rhs_factors)) => {
                factors.extend(rhs_factors);
                Self::Mul(factors)
            },
            (Self::Mul(mut factors), other) => {
                factors.push(other);
                Self::Mul(factors)
            },
            (other, Self::Mul(mut factors)) => {
                factors.insert(0, other);
                Self::Mul(factors)
            },
            (lhs, rhs) => Self::Mul(vec![lhs, rhs]),
        }
    }
}

impl MulAssign for Expr {
    fn mul_assign(&mut self, rhs: Self) {
        let lhs = std::mem::replace(self, Self::Mul(Vec::new()));
        *self = lhs * rhs;
    }
}

/// Scales an expression by a constant, see [`cof`].
impl Mul<Expr> for f64 {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Self::Output {
        cof(self, rhs)
    }
}

/// Divides two [`Expr`]s, producing `self * rhs^-1`.
impl Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        self * rhs.recip()
    }
}

/// Multiplies this expression by -1, see [`neg`].
impl Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        neg(self)
    }
}
