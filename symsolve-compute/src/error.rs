//! Errors raised by the expression engine and the solver.
//!
//! Numeric trouble (`NaN`, infinities, singular Jacobians) is never an error. The only failures
//! are an incomplete variable assignment and a reference to a parameter the solver does not know.

use ariadne::Fmt;
use levenshtein::levenshtein;
use symsolve_attrs::ErrorKind;
use symsolve_error::{Error, EXPR};
use crate::symbolic::{Expr, VarMap, Variable};

/// Some free variables of an expression have no value in the assignment.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = if self.names.len() == 1 {
        format!("no value was given for `{}`", self.names[0])
    } else {
        format!(
            "no values were given for {}",
            self.names
                .iter()
                .map(|name| format!("`{}`", name))
                .collect::<Vec<_>>()
                .join(", ")
        )
    },
    labels = std::iter::repeat("this variable has no value"),
    help = if let Some(name) = &self.same_name {
        format!(
            "a different variable named `{}` has a value; variables are matched by identity, not by name",
            name.fg(EXPR)
        )
    } else if self.suggestions.is_empty() {
        "give every free variable a value in the assignment".to_string()
    } else if self.suggestions.len() == 1 {
        format!("did you mean `{}`?", (&self.suggestions[0]).fg(EXPR))
    } else {
        format!(
            "did you mean one of these? {}",
            self.suggestions
                .iter()
                .map(|s| format!("`{}`", s.fg(EXPR)))
                .collect::<Vec<_>>()
                .join(", ")
        )
    },
)]
pub struct MissingVariable {
    /// The names of the variables with no value, in the order they appear in the expression.
    pub names: Vec<String>,

    /// Names of bound variables that are spelled similarly to a missing one.
    pub suggestions: Vec<String>,

    /// Set if a bound variable has the exact same name as a missing one.
    pub same_name: Option<String>,
}

impl MissingVariable {
    /// Describes the given missing variables, looking through `bound` for similarly named
    /// variables to suggest.
    pub fn new(missing: &[Variable], bound: &VarMap) -> Self {
        let names = missing.iter()
            .map(|var| var.name().to_string())
            .collect::<Vec<_>>();

        let same_name = names.iter()
            .find(|name| bound.variables().any(|var| var.name() == name.as_str()))
            .cloned();

        let mut suggestions = bound.variables()
            .map(Variable::name)
            .filter(|candidate| {
                names.iter().any(|name| {
                    name.as_str() != *candidate && levenshtein(name, candidate) < 2
                })
            })
            .map(str::to_string)
            .collect::<Vec<_>>();
        suggestions.sort();
        suggestions.dedup();

        Self { names, suggestions, same_name }
    }
}

/// A parameter was updated, but the variable was never registered as a parameter of the solver.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a parameter of this solver", self.name),
    labels = ["this variable"],
    help = if self.is_unknown {
        "this variable is one of the unknowns being solved for; it cannot be fixed after the solver is built".to_string()
    } else {
        format!("register it with {} when building the solver", "Solver::builder(..).parameters(..)".fg(EXPR))
    },
)]
pub struct UnknownParameter {
    /// The name of the variable.
    pub name: String,

    /// Whether the variable is one of the solver's unknowns.
    pub is_unknown: bool,
}

/// Builds the error for an expression whose free variables `missing` have no value in `bound`.
///
/// The error points at every occurrence of the missing variables in the rendered expression.
pub fn missing_variable(expr: &Expr, missing: &[Variable], bound: &VarMap) -> Error {
    let rendered = expr.render();
    let spans = rendered.spans.iter()
        .filter(|(var, _)| missing.contains(var))
        .map(|(_, span)| span.clone())
        .collect();
    Error::new(rendered.text, spans, MissingVariable::new(missing, bound))
}

/// Builds the error for setting a parameter the solver does not know about.
pub fn unknown_parameter(var: &Variable, is_unknown: bool) -> Error {
    Error::new(var.name(), Vec::new(), UnknownParameter {
        name: var.name().to_string(),
        is_unknown,
    })
}
