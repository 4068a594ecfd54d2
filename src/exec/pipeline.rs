use std::io;

use libc::c_int;

use super::argv::{exit_child, write_raw, CArgv};
use crate::error::ShellError;

/// Read and write ends of one anonymous pipe.
pub type PipeFds = [c_int; 2];

/// Allocated in the shell before fork; the coordinator fills it in.
pub fn pipe_slots(stages: usize) -> Vec<PipeFds> {
    vec![[-1, -1]; stages.saturating_sub(1)]
}

/// Body of the pipeline's top-level child, which already leads the job's
/// process group. Stages inherit that group, so signals and the terminal
/// reach the whole pipeline through one pgid.
pub fn run_coordinator(stages: &[CArgv], pipes: &mut [PipeFds]) -> ! {
    for i in 0..pipes.len() {
        if unsafe { libc::pipe(pipes[i].as_mut_ptr()) } < 0 {
            let err = ShellError::Pipe(io::Error::last_os_error());
            write_raw(format!("{}\n", err).as_bytes());
            close_all(&pipes[..i]);
            exit_child(1);
        }
    }

    let mut forked = 0;
    for (i, stage) in stages.iter().enumerate() {
        match unsafe { libc::fork() } {
            -1 => {
                let err = ShellError::Fork(io::Error::last_os_error());
                write_raw(format!("{}\n", err).as_bytes());
            }
            0 => {
                wire_stage(i, stages.len(), pipes);
                stage.exec();
            }
            _ => forked += 1,
        }
    }

    close_all(pipes);
    for _ in 0..forked {
        wait_any();
    }
    exit_child(0)
}

/// Connects stage `i` of `n` to its neighbours and closes every original
/// pipe descriptor, so no stray write end keeps a reader from seeing EOF.
fn wire_stage(i: usize, n: usize, pipes: &[PipeFds]) {
    unsafe {
        if i > 0 {
            libc::dup2(pipes[i - 1][0], libc::STDIN_FILENO);
        }
        if i + 1 < n {
            libc::dup2(pipes[i][1], libc::STDOUT_FILENO);
        }
    }
    close_all(pipes);
}

fn close_all(pipes: &[PipeFds]) {
    for fds in pipes {
        for &fd in fds {
            if fd >= 0 {
                unsafe {
                    libc::close(fd);
                }
            }
        }
    }
}

fn wait_any() {
    loop {
        let r = unsafe { libc::wait(std::ptr::null_mut()) };
        if r >= 0 || io::Error::last_os_error().kind() != io::ErrorKind::Interrupted {
            return;
        }
    }
}
