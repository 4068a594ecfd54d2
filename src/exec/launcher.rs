use std::io::{self, Write};

use libc::pid_t;
use log::{debug, info, warn};

use super::argv::CArgv;
use super::pipeline::{self, pipe_slots};
use super::signals;
use super::terminal::Terminal;
use crate::error::{Result, ShellError};
use crate::manager::job_table::JobTable;
use crate::models::job::{Job, JobState};

/// How a stop-aware wait on a job's leading process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Stopped,
    Terminated,
}

/// Forks the job's leading process, records the job and, for a foreground
/// job, waits for it while it owns the terminal. Returns the job id.
pub fn launch(jobs: &mut JobTable, terminal: &Terminal, mut job: Job) -> Result<u32> {
    let argvs = CArgv::prepare(&job.commands)?;
    let is_pipeline = job.is_pipeline();
    let mut pipes = pipe_slots(argvs.len());
    let _ = io::stdout().flush();

    let pid = match unsafe { libc::fork() } {
        -1 => return Err(ShellError::Fork(io::Error::last_os_error())),
        0 => {
            unsafe {
                libc::setpgid(0, 0);
            }
            signals::restore_in_child();
            if !is_pipeline {
                argvs[0].exec();
            }
            pipeline::run_coordinator(&argvs, &mut pipes);
        }
        pid => pid,
    };

    // Also set in the child; either order leaves it leading its own group.
    if unsafe { libc::setpgid(pid, pid) } < 0 {
        debug!("setpgid({}) in parent: {}", pid, io::Error::last_os_error());
    }

    job.pid = pid;
    let is_background = job.is_background;
    let id = jobs.insert(job);
    jobs.set_current(id);

    if is_background {
        info!("Job {} started in background (pid {}).", id, pid);
    } else {
        wait_foreground(jobs, terminal, pid);
    }
    Ok(id)
}

/// Gives the job the terminal, blocks until it stops or terminates, then
/// settles the table: a stopped job is kept and shown, a finished one removed.
pub fn wait_foreground(jobs: &mut JobTable, terminal: &Terminal, pid: pid_t) {
    let lease = terminal.acquire(pid);
    let outcome = wait_stoppable(pid);

    match outcome {
        Ok(WaitOutcome::Stopped) => {
            if let Some(job) = jobs.set_state(pid, JobState::Stopped) {
                println!("{}", job.status_line());
            }
        }
        Ok(WaitOutcome::Terminated) => {
            jobs.set_state(pid, JobState::Done);
            jobs.remove_by_pid(pid);
        }
        Err(e) => {
            warn!("waitpid({}) failed: {}; dropping job.", pid, e);
            jobs.remove_by_pid(pid);
        }
    }
    drop(lease);
}

/// Blocking wait on `pid` that also reports a stop.
pub fn wait_stoppable(pid: pid_t) -> io::Result<WaitOutcome> {
    let mut status = 0;
    loop {
        let r = unsafe { libc::waitpid(pid, &mut status, libc::WUNTRACED) };
        if r < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        if libc::WIFSTOPPED(status) {
            return Ok(WaitOutcome::Stopped);
        }
        if libc::WIFEXITED(status) || libc::WIFSIGNALED(status) {
            return Ok(WaitOutcome::Terminated);
        }
    }
}
