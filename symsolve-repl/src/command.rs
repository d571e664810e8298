use levenshtein::levenshtein;
use std::ops::Range;
use symsolve_error::Error;
use crate::error::{InvalidNumber, UnknownCommand, WrongArgumentCount};

/// A command typed into the REPL.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Solves the three-equation system from its usual starting point.
    ThreeEq,

    /// Moves the `x` end of the line `y = x` and lets the solver follow it.
    Line(f64),

    /// Turns the crank of the four-bar linkage to the given angle, in degrees.
    Linkage(f64),

    /// Prints the list of commands.
    Help,

    /// Leaves the REPL.
    Quit,
}

/// Name and usage of every command.
pub const COMMANDS: [(&str, &str); 5] = [
    ("three-eq", "three-eq"),
    ("line", "line <x>"),
    ("linkage", "linkage <degrees>"),
    ("help", "help"),
    ("quit", "quit"),
];

/// Splits the input on whitespace, keeping the character range of each word.
fn words(input: &str) -> Vec<(Range<usize>, &str)> {
    let mut words = Vec::new();
    let mut start = None;
    let mut char_idx = 0;

    for (byte_idx, c) in input.char_indices() {
        match (c.is_whitespace(), start) {
            (false, None) => start = Some((char_idx, byte_idx)),
            (true, Some((char_start, byte_start))) => {
                words.push((char_start..char_idx, &input[byte_start..byte_idx]));
                start = None;
            },
            _ => (),
        }
        char_idx += 1;
    }

    if let Some((char_start, byte_start)) = start {
        words.push((char_start..char_idx, &input[byte_start..]));
    }

    words
}

/// Reads the single numeric argument of a command.
fn number_arg(
    input: &str,
    words: &[(Range<usize>, &str)],
    command: &'static str,
    usage: &'static str,
) -> Result<f64, Error> {
    match words {
        [_, (span, arg)] => arg.parse::<f64>()
            .map_err(|_| Error::new(input, vec![span.clone()], InvalidNumber { arg: arg.to_string() })),
        _ => {
            let spans = words.first().map(|(span, _)| span.clone()).into_iter().collect();
            Err(Error::new(input, spans, WrongArgumentCount { command, usage }))
        },
    }
}

impl Command {
    /// Parses a line of input. Returns [`None`] if the line is blank.
    pub fn parse(input: &str) -> Option<Result<Self, Error>> {
        let words = words(input);
        let (span, name) = words.first()?.clone();

        let no_args = |command: Self, name: &'static str| {
            if words.len() == 1 {
                Ok(command)
            } else {
                Err(Error::new(input, vec![span.clone()], WrongArgumentCount { command: name, usage: name }))
            }
        };

        Some(match name {
            "three-eq" => no_args(Self::ThreeEq, "three-eq"),
            "help" => no_args(Self::Help, "help"),
            "quit" | "exit" => no_args(Self::Quit, "quit"),
            "line" => number_arg(input, &words, "line", "line <x>").map(Self::Line),
            "linkage" => number_arg(input, &words, "linkage", "linkage <degrees>").map(Self::Linkage),
            _ => {
                let suggestions = COMMANDS.iter()
                    .map(|(name, _)| *name)
                    .filter(|candidate| levenshtein(candidate, name) < 3)
                    .collect();
                Err(Error::new(input, vec![span.clone()], UnknownCommand {
                    name: name.to_string(),
                    suggestions,
                }))
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn parse_commands() {
        assert_eq!(Command::parse("three-eq").unwrap().unwrap(), Command::ThreeEq);
        assert_eq!(Command::parse("  line   12.5 ").unwrap().unwrap(), Command::Line(12.5));
        assert_eq!(Command::parse("linkage -30").unwrap().unwrap(), Command::Linkage(-30.0));
        assert_eq!(Command::parse("quit").unwrap().unwrap(), Command::Quit);
        assert!(Command::parse("   ").is_none());
    }

    #[test]
    fn word_spans_are_chars() {
        let words = words("θ line  4");
        assert_eq!(words, vec![(0..1, "θ"), (2..6, "line"), (8..9, "4")]);
    }

    #[test]
    fn bad_number() {
        let err = Command::parse("line ten").unwrap().unwrap_err();
        assert_eq!(err.kind::<InvalidNumber>().unwrap().arg, "ten");
        assert_eq!(err.spans, vec![5..8]);
    }

    #[test]
    fn wrong_argument_count() {
        let err = Command::parse("linkage").unwrap().unwrap_err();
        assert_eq!(err.kind::<WrongArgumentCount>().unwrap().usage, "linkage <degrees>");
        assert!(Command::parse("help me").unwrap().is_err());
    }

    #[test]
    fn unknown_command_suggests() {
        let err = Command::parse("lnie 3").unwrap().unwrap_err();
        let kind = err.kind::<UnknownCommand>().unwrap();
        assert_eq!(kind.name, "lnie");
        assert_eq!(kind.suggestions, vec!["line"]);
    }
}
