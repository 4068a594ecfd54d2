use libc::pid_t;
use log::{debug, trace};

use crate::manager::job_table::JobTable;
use crate::models::job::JobState;

/// Collects every child that has terminated since the last pass, without
/// blocking, and returns the completion notices for background jobs.
///
/// Stops are not requested here (no `WUNTRACED`), so a background job that
/// gets stopped keeps showing as running until something waits on it in the
/// foreground.
pub fn reap_terminated(jobs: &mut JobTable) -> Vec<String> {
    let mut notices = Vec::new();
    loop {
        let pid = unsafe { libc::waitpid(-1, std::ptr::null_mut(), libc::WNOHANG) };
        if pid <= 0 {
            break;
        }
        trace!("Reaped pid {}.", pid);
        notices.extend(settle_terminated(jobs, pid));
    }
    notices
}

/// Marks the job led by `pid` done and removes it. Unknown pids (pipeline
/// leftovers, jobs already settled) are ignored.
pub fn settle_terminated(jobs: &mut JobTable, pid: pid_t) -> Option<String> {
    let Some(job) = jobs.set_state(pid, JobState::Done) else {
        debug!("No job for reaped pid {}.", pid);
        return None;
    };
    let notice = job.is_background.then(|| job.status_line());
    jobs.remove_by_pid(pid);
    notice
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::command::Command;
    use crate::models::job::Job;

    fn insert(jobs: &mut JobTable, pid: pid_t, cmdline: &str, is_background: bool) -> u32 {
        let argv = cmdline.split(' ').map(String::from).collect();
        let mut job = Job::new(cmdline.into(), vec![Command::new(argv)], is_background);
        job.pid = pid;
        jobs.insert(job)
    }

    #[test]
    fn background_completion_notifies_once() {
        let mut jobs = JobTable::new();
        insert(&mut jobs, 500, "sleep 1", true);

        assert_eq!(
            settle_terminated(&mut jobs, 500).as_deref(),
            Some("1: sleep 1 [&] Done")
        );
        assert!(jobs.is_empty());
        assert_eq!(settle_terminated(&mut jobs, 500), None);
    }

    #[test]
    fn foreground_completion_is_silent() {
        let mut jobs = JobTable::new();
        insert(&mut jobs, 600, "cat", false);
        assert_eq!(settle_terminated(&mut jobs, 600), None);
        assert!(jobs.is_empty());
    }

    #[test]
    fn unknown_pid_leaves_table_alone() {
        let mut jobs = JobTable::new();
        insert(&mut jobs, 700, "sleep 5", true);
        assert_eq!(settle_terminated(&mut jobs, 701), None);
        assert_eq!(jobs.len(), 1);
    }
}
