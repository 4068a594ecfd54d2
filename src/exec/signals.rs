use libc::c_int;

/// Signals the shell ignores for itself; the terminal delivers them to the
/// foreground job's group instead.
const SHELL_IGNORED: [c_int; 4] = [libc::SIGINT, libc::SIGTSTP, libc::SIGTTIN, libc::SIGTTOU];

pub fn ignore_job_control() {
    for sig in SHELL_IGNORED {
        unsafe {
            libc::signal(sig, libc::SIG_IGN);
        }
    }
}

/// Runs in a freshly forked child, before exec.
pub fn restore_in_child() {
    unsafe {
        libc::signal(libc::SIGINT, libc::SIG_DFL);
        libc::signal(libc::SIGTSTP, libc::SIG_DFL);
        // Drop the shell's SIGCHLD forwarding so a pipeline coordinator
        // does not wake the shell for its own stages.
        libc::signal(libc::SIGCHLD, libc::SIG_DFL);
    }
}
