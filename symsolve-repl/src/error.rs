use ariadne::Fmt;
use symsolve_attrs::ErrorKind;
use symsolve_error::EXPR;

/// The command does not exist.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown command `{}`", self.name),
    labels = ["this command"],
    help = if self.suggestions.is_empty() {
        format!("type {} for a list of commands", "help".fg(EXPR))
    } else {
        format!(
            "did you mean {}?",
            self.suggestions
                .iter()
                .map(|s| format!("`{}`", s.fg(EXPR)))
                .collect::<Vec<_>>()
                .join(" or ")
        )
    },
)]
pub struct UnknownCommand {
    /// The name that was typed.
    pub name: String,

    /// Commands with a similar name.
    pub suggestions: Vec<&'static str>,
}

/// A command argument could not be read as a number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a number", self.arg),
    labels = ["expected a number here"],
)]
pub struct InvalidNumber {
    /// The argument that was typed.
    pub arg: String,
}

/// A command was given the wrong number of arguments.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("wrong number of arguments for `{}`", self.command),
    labels = ["this command"],
    help = format!("usage: {}", self.usage.fg(EXPR)),
)]
pub struct WrongArgumentCount {
    /// The command that was typed.
    pub command: &'static str,

    /// How the command is meant to be used.
    pub usage: &'static str,
}
