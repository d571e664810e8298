//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages.
//!
//! Errors in `symsolve` point at the rendered text of the expression that caused them (see
//! `Expr::render` in `symsolve-compute`). The spans stored in an [`Error`] are **character**
//! offsets into that text, which is what [`ariadne`] expects.

// lets `#[derive(ErrorKind)]` refer to this crate by name from inside its own tests
extern crate self as symsolve_error;

use ariadne::{Color, Report, Source};
use std::{any::Any, fmt::{self, Debug, Display}, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::Rgb(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
///
/// This trait is usually derived with `#[derive(ErrorKind)]` from `symsolve-attrs`.
pub trait ErrorKind: Debug + Send + Sync {
    /// Returns `self` as [`Any`], so the concrete kind can be recovered from an [`Error`].
    fn as_any(&self) -> &dyn Any;

    /// The one-line message describing the error.
    fn message(&self) -> String;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of an expression's text that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The text the spans refer to, usually the rendered expression.
    pub src: String,

    /// The regions of the source text that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given source text, spans and kind.
    ///
    /// If no spans are given, the error points at the whole source text.
    pub fn new(
        src: impl Into<String>,
        mut spans: Vec<Range<usize>>,
        kind: impl ErrorKind + 'static,
    ) -> Self {
        let src = src.into();
        if spans.is_empty() {
            spans.push(0..src.chars().count());
        }
        Self { src, spans, kind: Box::new(kind) }
    }

    /// Returns the kind of this error if it is a `K`.
    pub fn kind<K: ErrorKind + 'static>(&self) -> Option<&K> {
        self.kind.as_any().downcast_ref::<K>()
    }

    /// Returns true if the kind of this error is a `K`.
    pub fn is<K: ErrorKind + 'static>(&self) -> bool {
        self.kind::<K>().is_some()
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }

    /// Report this error to stderr.
    ///
    /// The `ariadne` crate's [`Report`] type actually does not have a `Display` implementation, so
    /// we can only use its `eprint` method to print to stderr.
    pub fn report_to_stderr(&self, src_id: &str) {
        let report = self.build_report(src_id);
        if report.eprint((src_id, Source::from(&self.src))).is_err() {
            eprintln!("error: {}", self);
        }
    }

    /// Writes the full report for this error into a [`String`].
    pub fn report_to_string(&self, src_id: &str) -> String {
        let mut buf = Vec::new();
        let report = self.build_report(src_id);
        match report.write((src_id, Source::from(&self.src)), &mut buf) {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.message())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use symsolve_attrs::ErrorKind;

    /// A variable has no value.
    #[derive(Debug, ErrorKind)]
    #[error(
        message = format!("no value for `{}`", self.name),
        labels = ["this variable"],
        help = "bind it first",
    )]
    struct Unbound {
        name: String,
    }

    /// Nothing to solve.
    #[derive(Debug, ErrorKind)]
    #[error(message = "nothing to solve")]
    struct Empty;

    fn plain(report: String) -> String {
        String::from_utf8(strip_ansi_escapes::strip(report.as_bytes())).unwrap()
    }

    #[test]
    fn display_uses_message() {
        let err = Error::new("(x + 1)", vec![1..2], Unbound { name: "x".to_string() });
        assert_eq!(err.to_string(), "no value for `x`");
    }

    #[test]
    fn downcast_kind() {
        let err = Error::new("(x + 1)", vec![1..2], Unbound { name: "x".to_string() });
        assert!(err.is::<Unbound>());
        assert!(!err.is::<Empty>());
        assert_eq!(err.kind::<Unbound>().unwrap().name, "x");
    }

    #[test]
    fn default_span_covers_source() {
        let err = Error::new("θ2", vec![], Empty);
        assert_eq!(err.spans, vec![0..2]);
    }

    #[test]
    fn report_contains_labels_and_help() {
        let err = Error::new("(x + 1)", vec![1..2], Unbound { name: "x".to_string() });
        let report = plain(err.report_to_string("expr"));
        assert!(report.contains("no value for `x`"), "{report}");
        assert!(report.contains("this variable"), "{report}");
        assert!(report.contains("bind it first"), "{report}");
    }
}
