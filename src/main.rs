mod builtins;
mod constants;
mod errors;
mod input;
mod logger;
mod parser;
mod process;
mod prompt;
mod shell;
mod utils;

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use argh::FromArgs;
use log::LevelFilter;

use crate::shell::Shell;

#[derive(FromArgs)]
/// A minimal interactive command interpreter.
struct Cli {
    /// log command dispatch and child process status to stderr
    #[argh(switch, short = 'v')]
    verbose: bool,

    /// do not print the prompt
    #[argh(switch, short = 'q')]
    quiet: bool,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    logger::init(level).context("failed to install logger")?;

    let stdin = io::stdin();
    let mut shell = Shell::new(stdin.lock(), io::stdout(), io::stderr()).show_prompt(!cli.quiet);
    shell.run()?;
    Ok(())
}

fn main() -> ExitCode {
    let cli: Cli = argh::from_env();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
