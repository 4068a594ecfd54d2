use crate::builtins::{self, Flow};
use crate::error::Result;
use crate::exec::{launcher, terminal::Terminal};
use crate::manager::job_table::JobTable;
use crate::models::job::Job;
use crate::parser::{build_commands, tokenize};
use crate::worker::reaper;

/// Everything the main loop owns: the job table and the terminal arbiter.
pub struct Shell {
    pub jobs: JobTable,
    pub terminal: Terminal,
}

impl Shell {
    pub fn new(terminal: Terminal) -> Self {
        Self {
            jobs: JobTable::new(),
            terminal,
        }
    }

    /// Parses one input line and runs it as a builtin or a new job.
    pub fn execute_line(&mut self, line: &str) -> Result<Flow> {
        let tokens = tokenize(line)?;
        let Some(commands) = build_commands(&tokens.normalized, tokens.stages)? else {
            return Ok(Flow::Continue);
        };

        if let [command] = commands.as_slice() {
            if let Some(result) = builtins::dispatch(self, command) {
                return result;
            }
        }

        let job = Job::new(tokens.normalized, commands, tokens.background);
        launcher::launch(&mut self.jobs, &self.terminal, job)?;
        Ok(Flow::Continue)
    }

    /// Settles terminated children; returns the notices to print.
    pub fn reap(&mut self) -> Vec<String> {
        reaper::reap_terminated(&mut self.jobs)
    }
}
