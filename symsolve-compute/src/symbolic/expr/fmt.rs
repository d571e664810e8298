//! Infix rendering of expressions.
//!
//! The output is fully parenthesized and meant for humans. It cannot be parsed back into an
//! [`Expr`].

use std::fmt::{self, Display, Formatter, Write};
use std::ops::Range;
use super::{Expr, Variable};

/// Output target of the renderer.
///
/// Variables go through [`ExprWriter::write_var`] so that a writer can note where each one ends
/// up in the text.
trait ExprWriter: Write {
    fn write_var(&mut self, var: &Variable) -> fmt::Result {
        self.write_str(var.name())
    }
}

impl ExprWriter for Formatter<'_> {}

/// Collects the rendered text along with the character range of every variable occurrence.
#[derive(Default)]
struct SpanWriter {
    text: String,
    chars: usize,
    spans: Vec<(Variable, Range<usize>)>,
}

impl Write for SpanWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.text.push_str(s);
        self.chars += s.chars().count();
        Ok(())
    }
}

impl ExprWriter for SpanWriter {
    fn write_var(&mut self, var: &Variable) -> fmt::Result {
        let start = self.chars;
        self.write_str(var.name())?;
        self.spans.push((var.clone(), start..self.chars));
        Ok(())
    }
}

/// Writes the children of a [`Expr::Sum`] or [`Expr::Mul`], in parentheses, separated by `sep`.
fn write_joined<W: ExprWriter>(w: &mut W, children: &[Expr], sep: &str) -> fmt::Result {
    w.write_char('(')?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            w.write_str(sep)?;
        }
        write_expr(w, child)?;
    }
    w.write_char(')')
}

fn write_expr<W: ExprWriter>(w: &mut W, expr: &Expr) -> fmt::Result {
    match expr {
        Expr::Const(value) if *value < 0.0 => write!(w, "({})", value),
        Expr::Const(value) => write!(w, "{}", value),
        Expr::Variable(var) => w.write_var(var),
        Expr::Sum(terms) => write_joined(w, terms, " + "),
        Expr::Mul(factors) => write_joined(w, factors, "*"),
        Expr::Pow(base, exp) => {
            w.write_char('(')?;
            write_expr(w, base)?;
            write!(w, ")^{}", exp)
        },
        Expr::Sin(inner) => {
            w.write_str("sin(")?;
            write_expr(w, inner)?;
            w.write_char(')')
        },
        Expr::Cos(inner) => {
            w.write_str("cos(")?;
            write_expr(w, inner)?;
            w.write_char(')')
        },
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_expr(f, self)
    }
}

/// The rendered text of an expression, returned by [`Expr::render`].
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    /// The same text that [`Display`] produces.
    pub text: String,

    /// Every variable occurrence in the text, in order, with its **character** range.
    pub spans: Vec<(Variable, Range<usize>)>,
}

impl Rendered {
    /// Returns the ranges where the given variable occurs in the text.
    pub fn spans_of<'a>(&'a self, var: &'a Variable) -> impl Iterator<Item = Range<usize>> + 'a {
        self.spans.iter()
            .filter(move |(v, _)| v == var)
            .map(|(_, span)| span.clone())
    }
}

impl Expr {
    /// Renders the expression like [`Display`] does, and also records where each variable
    /// occurrence ends up in the text.
    pub fn render(&self) -> Rendered {
        let mut writer = SpanWriter::default();
        // writing into a `String` cannot fail
        let _ = write_expr(&mut writer, self);
        Rendered {
            text: writer.text,
            spans: writer.spans,
        }
    }
}
