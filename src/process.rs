//! Runs external programs: fork, replace the child image with `execvp`, reap with `waitpid`.

use std::ffi::{CString, OsString};
use std::fmt;
use std::os::raw::c_char;
use std::os::unix::ffi::OsStrExt;
use std::ptr;

use nix::errno::Errno;
use nix::libc;
use nix::sys::signal::Signal;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{fork, ForkResult, Pid};

use crate::constants::{EXIT_NOT_EXECUTABLE, EXIT_NOT_FOUND};
use crate::errors::{CommandError, ShellError};
use crate::parser::ArgumentVector;

/// An external command prepared for `execvp`.
///
/// Everything the child needs is allocated up front, so nothing runs between
/// `fork` and `execvp` except restoring `SIGPIPE` and, when the exec fails, one
/// `write` and `_exit`.
pub struct Program {
    name: String,
    // owns the storage `pointers` refers to
    _args: Vec<CString>,
    pointers: Vec<*const c_char>,
    not_found: Vec<u8>,
    not_executable: Vec<u8>,
}

impl Program {
    pub fn new(argv: &ArgumentVector) -> Result<Self, CommandError> {
        let name = argv
            .command()
            .ok_or(CommandError::EmptyCommand)?
            .to_string_lossy()
            .into_owned();
        let args = argv
            .iter()
            .map(|arg| CString::new(arg.as_bytes()).map_err(|_| nul_byte(arg)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut pointers: Vec<*const c_char> = args.iter().map(|arg| arg.as_ptr()).collect();
        pointers.push(ptr::null());

        Ok(Program {
            not_found: format!("ERROR: Command not found: {name}\n").into_bytes(),
            not_executable: format!(
                "ERROR: Cannot execute {name}: permission denied or not executable\n"
            )
            .into_bytes(),
            name,
            _args: args,
            pointers,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the calling process image. Only returns by exiting.
    fn exec(&self) -> ! {
        // SAFETY: `signal` is async-signal-safe; `pointers` is a null-terminated array
        // of pointers into the live `CString`s in `_args`; the failure path only
        // touches pre-built buffers.
        unsafe {
            // the Rust runtime ignores SIGPIPE, and ignored signals survive exec
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
            libc::execvp(self.pointers[0], self.pointers.as_ptr());

            let (message, status) = match Errno::last() {
                Errno::ENOENT | Errno::ENOTDIR => (&self.not_found, EXIT_NOT_FOUND),
                _ => (&self.not_executable, EXIT_NOT_EXECUTABLE),
            };
            let _ = libc::write(
                libc::STDERR_FILENO,
                message.as_ptr().cast::<libc::c_void>(),
                message.len(),
            );
            libc::_exit(status)
        }
    }
}

fn nul_byte(arg: &OsString) -> CommandError {
    CommandError::NulByte(arg.to_string_lossy().into_owned())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Exited(i32),
    Signaled { signal: Signal, core_dumped: bool },
}

impl ExitStatus {
    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Exited(0))
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::Exited(code) => write!(f, "exit status {code}"),
            ExitStatus::Signaled {
                signal,
                core_dumped: true,
            } => write!(f, "killed by {signal} (core dumped)"),
            ExitStatus::Signaled { signal, .. } => write!(f, "killed by {signal}"),
        }
    }
}

/// A child that has run to completion and been reaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub pid: Pid,
    pub status: ExitStatus,
}

/// Runs `program` in a new process and blocks until that process is gone.
pub fn launch(program: &Program) -> Result<Completion, ShellError> {
    // SAFETY: the child branch calls only `Program::exec`, which never returns and
    // does not allocate or take locks.
    match unsafe { fork() }.map_err(ShellError::Fork)? {
        ForkResult::Child => program.exec(),
        ForkResult::Parent { child } => {
            log::debug!("started {} as pid {child}", program.name());
            let status = reap(child)?;
            Ok(Completion { pid: child, status })
        }
    }
}

fn reap(child: Pid) -> Result<ExitStatus, ShellError> {
    loop {
        match waitpid(child, None) {
            Ok(WaitStatus::Exited(_, code)) => return Ok(ExitStatus::Exited(code)),
            Ok(WaitStatus::Signaled(_, signal, core_dumped)) => {
                return Ok(ExitStatus::Signaled {
                    signal,
                    core_dumped,
                })
            }
            Ok(other) => log::trace!("pid {child} not finished yet: {other:?}"),
            Err(Errno::EINTR) => continue,
            Err(errno) => return Err(ShellError::Wait(errno)),
        }
    }
}
