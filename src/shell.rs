use std::io::{BufRead, Write};

use crate::builtins::{Builtins, LoopSignal};
use crate::errors::{CommandError, ShellError};
use crate::input::{Line, LineReader};
use crate::parser::{tokenize, ArgumentVector};
use crate::process::{launch, Program};
use crate::prompt::prompt;
use crate::utils::write_line;

pub struct Shell<R, O, E> {
    reader: LineReader<R>,
    builtins: Builtins,
    stdout: O,
    stderr: E,
    show_prompt: bool,
}

impl<R: BufRead, O: Write, E: Write> Shell<R, O, E> {
    pub fn new(input: R, stdout: O, stderr: E) -> Self {
        Shell {
            reader: LineReader::new(input),
            builtins: Builtins::new(),
            stdout,
            stderr,
            show_prompt: true,
        }
    }

    pub fn show_prompt(mut self, show_prompt: bool) -> Self {
        self.show_prompt = show_prompt;
        self
    }

    /// Reads and runs commands until `exit` or end of input.
    pub fn run(&mut self) -> Result<(), ShellError> {
        loop {
            if self.show_prompt {
                write!(self.stdout, "{}", prompt())?;
            }
            self.stdout.flush()?;

            let line = match self.reader.read_line().map_err(ShellError::Read)? {
                Some(Line::Text(line)) => line,
                Some(Line::TooLong) => {
                    let err = CommandError::LineTooLong {
                        limit: self.reader.limit(),
                    };
                    write_line(&mut self.stderr, err.to_string())?;
                    continue;
                }
                None => {
                    log::debug!("end of input");
                    return Ok(());
                }
            };

            let argv = match tokenize(&line) {
                Ok(argv) => argv,
                Err(err) => {
                    write_line(&mut self.stderr, &err.to_string())?;
                    continue;
                }
            };

            if argv.is_empty() {
                continue;
            }

            if self.dispatch(&argv)? == LoopSignal::Terminate {
                return Ok(());
            }
        }
    }

    /// Runs one non-empty command line.
    pub fn dispatch(&mut self, argv: &ArgumentVector) -> Result<LoopSignal, ShellError> {
        let Some(command_name) = argv.command() else {
            return Ok(LoopSignal::Continue);
        };

        log::debug!("dispatching {:?}", argv.as_slice());
        let builtin = command_name
            .to_str()
            .and_then(|name| self.builtins.get(name));
        if let Some(builtin) = builtin {
            return Ok(builtin(argv, &mut self.stdout, &mut self.stderr)?);
        }

        self.run_external(argv)?;
        Ok(LoopSignal::Continue)
    }

    fn run_external(&mut self, argv: &ArgumentVector) -> Result<(), ShellError> {
        let program = match Program::new(argv) {
            Ok(program) => program,
            Err(err) => {
                write_line(&mut self.stderr, &err.to_string())?;
                return Ok(());
            }
        };

        // the child inherits the descriptors, not our buffers
        self.stdout.flush()?;
        self.stderr.flush()?;

        let done = launch(&program)?;
        if done.status.success() {
            log::debug!("{} (pid {}) finished", program.name(), done.pid);
        } else {
            log::info!("{} (pid {}) {}", program.name(), done.pid, done.status);
        }
        Ok(())
    }
}
