mod command;
mod error;
mod session;

use command::{Command, COMMANDS};
use env_logger::Env;
use log::debug;
use rustyline::{error::ReadlineError, DefaultEditor};
use session::Session;
use std::io::{self, IsTerminal, Read};
use std::ops::ControlFlow;

/// Prints the list of commands.
fn print_help() {
    println!("commands:");
    for (_, usage) in COMMANDS {
        println!("  {}", usage);
    }
}

/// Parses and runs one line of input, printing the result or the error. Returns
/// [`ControlFlow::Break`] when the user asks to quit.
fn run_line(input: &str, session: &mut Session) -> ControlFlow<()> {
    let command = match Command::parse(input) {
        Some(Ok(command)) => command,
        Some(Err(err)) => {
            err.report_to_stderr("input");
            return ControlFlow::Continue(());
        },
        None => return ControlFlow::Continue(()),
    };
    debug!("running {:?}", command);

    let res = match command {
        Command::ThreeEq => session.three_eq(),
        Command::Line(x) => session.line(x),
        Command::Linkage(degrees) => session.linkage(degrees),
        Command::Help => {
            print_help();
            Ok(())
        },
        Command::Quit => return ControlFlow::Break(()),
    };

    if let Err(err) = res {
        err.report_to_stderr("expr");
    }
    ControlFlow::Continue(())
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let mut session = match Session::new() {
        Ok(session) => session,
        Err(err) => {
            err.report_to_stderr("expr");
            std::process::exit(1);
        },
    };

    if !io::stdin().is_terminal() {
        // read commands from stdin
        let mut input = String::new();
        if let Err(err) = io::stdin().read_to_string(&mut input) {
            eprintln!("{}", err);
            std::process::exit(1);
        }

        for line in input.lines() {
            if run_line(line, &mut session).is_break() {
                break;
            }
        }
    } else {
        // run the repl / interactive mode
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(err) => {
                eprintln!("{}", err);
                std::process::exit(1);
            },
        };
        print_help();

        fn process_line(rl: &mut DefaultEditor, session: &mut Session) -> Result<ControlFlow<()>, ReadlineError> {
            let input = rl.readline("> ")?;
            if input.trim().is_empty() {
                return Ok(ControlFlow::Continue(()));
            }

            rl.add_history_entry(&input)?;
            Ok(run_line(&input, session))
        }

        loop {
            match process_line(&mut rl, &mut session) {
                Ok(ControlFlow::Continue(())) => (),
                Ok(ControlFlow::Break(())) => break,
                Err(ReadlineError::Eof | ReadlineError::Interrupted) => break,
                Err(err) => {
                    eprintln!("{}", err);
                    break;
                },
            }
        }
    }
}
