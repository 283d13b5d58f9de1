use std::collections::HashMap;
use std::env;
use std::io::{self, Write};
use std::os::unix::ffi::OsStrExt;

use crate::errors::CommandError;
use crate::parser::ArgumentVector;
use crate::utils::write_line;

/// What the main loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopSignal {
    Continue,
    Terminate,
}

pub type BuiltinFn = fn(&ArgumentVector, &mut dyn Write, &mut dyn Write) -> io::Result<LoopSignal>;

pub struct Builtins {
    registry: HashMap<&'static str, BuiltinFn>,
}

impl Builtins {
    pub fn new() -> Self {
        let mut registry: HashMap<&'static str, BuiltinFn> = HashMap::new();
        registry.insert("exit", Builtins::builtin_exit);
        registry.insert("pwd", Builtins::builtin_pwd);
        registry.insert("cd", Builtins::builtin_cd);
        Builtins { registry }
    }

    pub fn get(&self, name: &str) -> Option<&BuiltinFn> {
        self.registry.get(name)
    }

    /// Trailing arguments are ignored.
    fn builtin_exit(
        _argv: &ArgumentVector,
        _stdout_writer: &mut dyn Write,
        _stderr_writer: &mut dyn Write,
    ) -> io::Result<LoopSignal> {
        Ok(LoopSignal::Terminate)
    }

    fn builtin_pwd(
        _argv: &ArgumentVector,
        stdout_writer: &mut dyn Write,
        stderr_writer: &mut dyn Write,
    ) -> io::Result<LoopSignal> {
        match env::current_dir() {
            Ok(path) => {
                write_line(stdout_writer, path.as_os_str().as_bytes())?;
            }
            Err(err) => {
                log::debug!("getcwd failed: {err}");
                write_line(stderr_writer, &CommandError::WorkingDirectory.to_string())?;
            }
        }

        Ok(LoopSignal::Continue)
    }

    fn builtin_cd(
        argv: &ArgumentVector,
        _stdout_writer: &mut dyn Write,
        stderr_writer: &mut dyn Write,
    ) -> io::Result<LoopSignal> {
        if let Err(err) = change_directory(argv) {
            write_line(stderr_writer, &err.to_string())?;
        }

        Ok(LoopSignal::Continue)
    }
}

fn change_directory(argv: &ArgumentVector) -> Result<(), CommandError> {
    let command = argv
        .command()
        .map_or_else(|| "cd".to_string(), |name| name.to_string_lossy().into_owned());
    let path = argv
        .arg(1)
        .ok_or_else(|| CommandError::MissingOperand(command.clone()))?;
    if argv.len() > 2 {
        return Err(CommandError::TooManyOperands(command));
    }

    env::set_current_dir(path).map_err(|err| {
        log::debug!("chdir to {path:?} failed: {err}");
        CommandError::ChangeDirectory {
            command,
            path: path.to_string_lossy().into_owned(),
        }
    })
}
