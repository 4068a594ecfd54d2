use libc::pid_t;
use log::{debug, info};

use crate::models::job::{Job, JobState};

/// Jobs in insertion order, which is also ascending id order.
#[derive(Debug, Default)]
pub struct JobTable {
    jobs: Vec<Job>,
    current: Option<u32>,
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a job, assigning it the id after the current tail's.
    ///
    /// Ids are not unique across removals: dropping the tail job and then
    /// inserting hands its id out again.
    pub fn insert(&mut self, mut job: Job) -> u32 {
        let id = self.jobs.last().map_or(0, |tail| tail.id) + 1;
        job.id = id;
        info!("Job {} inserted (pid {}): {}", id, job.pid, job.cmdline);
        self.jobs.push(job);
        id
    }

    pub fn remove_by_pid(&mut self, pid: pid_t) -> Option<Job> {
        let pos = self.jobs.iter().position(|job| job.pid == pid)?;
        let job = self.jobs.remove(pos);
        info!("Job {} removed (pid {}).", job.id, pid);
        Some(job)
    }

    pub fn get_by_pid_mut(&mut self, pid: pid_t) -> Option<&mut Job> {
        self.jobs.iter_mut().find(|job| job.pid == pid)
    }

    pub fn get_by_id(&self, id: u32) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == id)
    }

    pub fn get_by_id_mut(&mut self, id: u32) -> Option<&mut Job> {
        self.jobs.iter_mut().find(|job| job.id == id)
    }

    pub fn set_state(&mut self, pid: pid_t, state: JobState) -> Option<&Job> {
        let job = self.get_by_pid_mut(pid)?;
        job.state = state;
        debug!("Job {} is now {}.", job.id, state);
        Some(&*job)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// The most recently launched or resumed job id, used by bare `fg`/`bg`.
    pub fn current(&self) -> Option<u32> {
        self.current
    }

    pub fn set_current(&mut self, id: u32) {
        self.current = Some(id);
    }
}
