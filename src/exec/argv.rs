use std::ffi::CString;
use std::ptr;

use libc::c_char;

use crate::error::{Result, ShellError};
use crate::models::command::Command;

/// A command's argv converted ahead of fork, so the child only has to call exec.
pub struct CArgv {
    _args: Vec<CString>,
    ptrs: Vec<*const c_char>,
    not_found: Vec<u8>,
}

impl CArgv {
    pub fn new(command: &Command) -> Result<Self> {
        let args = command
            .argv
            .iter()
            .map(|arg| CString::new(arg.as_str()))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| ShellError::NulByte(command.program().to_string()))?;
        if args.is_empty() {
            return Err(ShellError::NulByte(String::new()));
        }

        let mut ptrs: Vec<*const c_char> = Vec::with_capacity(command.argc() + 1);
        ptrs.extend(args.iter().map(|arg| arg.as_ptr()));
        ptrs.push(ptr::null());

        Ok(Self {
            _args: args,
            ptrs,
            not_found: format!("{}: command not found\n", command.program()).into_bytes(),
        })
    }

    pub fn prepare(commands: &[Command]) -> Result<Vec<Self>> {
        commands.iter().map(Self::new).collect()
    }

    /// Replaces the current process image. On failure the child reports it
    /// and exits without telling the shell anything else.
    pub fn exec(&self) -> ! {
        unsafe {
            libc::execvp(self.ptrs[0], self.ptrs.as_ptr());
        }
        write_raw(&self.not_found);
        exit_child(0)
    }
}

/// Unbuffered write to standard output, safe to use between fork and exec.
pub fn write_raw(msg: &[u8]) {
    unsafe {
        libc::write(libc::STDOUT_FILENO, msg.as_ptr().cast(), msg.len());
    }
}

pub fn exit_child(code: i32) -> ! {
    unsafe { libc::_exit(code) }
}
