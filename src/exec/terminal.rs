use std::io;

use crossterm::tty::IsTty;
use libc::pid_t;
use log::{trace, warn};

/// Hands the controlling terminal between the shell's group and a job's group.
#[derive(Debug, Clone, Copy)]
pub struct Terminal {
    shell_pgid: pid_t,
    enabled: bool,
}

/// Returns the terminal to the shell when dropped.
#[must_use]
pub struct TerminalLease<'a> {
    terminal: &'a Terminal,
}

impl Terminal {
    pub fn new(shell_pgid: pid_t, enabled: bool) -> Self {
        Self {
            shell_pgid,
            enabled,
        }
    }

    /// Arbitration is only attempted when standard input is a terminal.
    pub fn detect() -> Self {
        let shell_pgid = unsafe { libc::getpgrp() };
        Self::new(shell_pgid, io::stdin().is_tty())
    }

    pub fn shell_pgid(&self) -> pid_t {
        self.shell_pgid
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn acquire(&self, pgid: pid_t) -> TerminalLease<'_> {
        self.hand_to(pgid);
        TerminalLease { terminal: self }
    }

    pub fn release(&self) {
        self.hand_to(self.shell_pgid);
    }

    fn hand_to(&self, pgid: pid_t) {
        if !self.enabled {
            trace!("Terminal arbitration disabled, skipping handoff to {}.", pgid);
            return;
        }
        for fd in [libc::STDIN_FILENO, libc::STDOUT_FILENO] {
            if unsafe { libc::tcsetpgrp(fd, pgid) } < 0 {
                warn!(
                    "tcsetpgrp({}, {}) failed: {}",
                    fd,
                    pgid,
                    io::Error::last_os_error()
                );
            }
        }
    }
}

impl Drop for TerminalLease<'_> {
    fn drop(&mut self) {
        self.terminal.release();
    }
}
