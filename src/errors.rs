use std::io;

use nix::errno::Errno;
use thiserror::Error;

/// Failures that end the shell.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("ERROR: Failed to read command")]
    Read(#[source] io::Error),
    #[error("ERROR: Failed to create child process")]
    Fork(#[source] Errno),
    #[error("ERROR: Failed to wait for child process")]
    Wait(#[source] Errno),
    #[error("ERROR: Failed to write output")]
    Output(#[from] io::Error),
}

/// Failures of a single command. The message is shown and the loop goes on.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("ERROR: Failed to print working directory")]
    WorkingDirectory,
    #[error("{0}: missing operand")]
    MissingOperand(String),
    #[error("{0}: too many arguments")]
    TooManyOperands(String),
    #[error("{command}: {path}: No such file or directory")]
    ChangeDirectory { command: String, path: String },
    #[error("ERROR: {0}: argument contains a NUL byte")]
    NulByte(String),
    #[error("ERROR: No command given")]
    EmptyCommand,
    #[error("ERROR: Command line too long (at most {limit} bytes are allowed)")]
    LineTooLong { limit: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("ERROR: Too many arguments (at most {limit} are allowed)")]
    TooManyTokens { limit: usize },
}
