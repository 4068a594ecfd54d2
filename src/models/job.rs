use std::fmt;

use libc::pid_t;

use super::command::Command;

#[derive(Debug, Clone)]
pub struct Job {
    pub id: u32,
    /// Leading process id; also the process-group id of every stage.
    pub pid: pid_t,
    pub cmdline: String,
    pub commands: Vec<Command>,
    pub is_background: bool,
    pub state: JobState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Running,
    Stopped,
    Done,
}

impl Job {
    /// Builds a job before fork; `id` and `pid` are filled in later.
    pub fn new(cmdline: String, commands: Vec<Command>, is_background: bool) -> Self {
        Self {
            id: 0,
            pid: -1,
            cmdline,
            commands,
            is_background,
            state: JobState::Running,
        }
    }

    pub fn is_pipeline(&self) -> bool {
        self.commands.len() > 1
    }

    /// The job line followed by its state, used for stop and completion notices.
    pub fn status_line(&self) -> String {
        format!("{} {}", self, self.state)
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.cmdline)?;
        if self.is_background {
            write!(f, " [&]")?;
        }
        Ok(())
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Running => "Running",
            JobState::Stopped => "Stopped",
            JobState::Done => "Done",
        };
        f.write_str(name)
    }
}
