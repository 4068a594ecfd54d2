use std::env;

use log::{info, warn};

use crate::error::{Result, ShellError};
use crate::exec::launcher::wait_foreground;
use crate::manager::job_table::JobTable;
use crate::models::command::Command;
use crate::models::job::JobState;
use crate::shell::Shell;

/// What the main loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Runs `command` if it names a builtin; `None` means it should be launched.
pub fn dispatch(shell: &mut Shell, command: &Command) -> Option<Result<Flow>> {
    let args = &command.argv[1..];
    let result = match command.program() {
        "exit" => Ok(Flow::Exit),
        "cd" => change_dir(args.first().map(String::as_str)),
        "jobs" => {
            for line in job_lines(&shell.jobs) {
                println!("{}", line);
            }
            Ok(Flow::Continue)
        }
        "fg" => foreground(shell, args.first().map(String::as_str)),
        "bg" => background(&mut shell.jobs, args.first().map(String::as_str)),
        _ => return None,
    };
    Some(result)
}

pub fn job_lines(jobs: &JobTable) -> Vec<String> {
    jobs.iter().map(|job| job.to_string()).collect()
}

fn change_dir(path: Option<&str>) -> Result<Flow> {
    let path = path.ok_or(ShellError::MissingOperand("cd"))?;
    env::set_current_dir(path).map_err(|source| ShellError::ChangeDir {
        path: path.to_string(),
        source,
    })?;
    Ok(Flow::Continue)
}

/// Resolves the job id argument of `fg`/`bg`, falling back to the current job.
fn resolve_job(jobs: &JobTable, builtin: &'static str, arg: Option<&str>) -> Result<u32> {
    let id = match arg {
        Some(arg) => {
            if !arg.chars().all(|c| c.is_ascii_digit()) {
                return Err(ShellError::JobUsage { builtin });
            }
            arg.parse::<u32>()
                .map_err(|_| ShellError::JobUsage { builtin })?
        }
        None => jobs
            .current()
            .ok_or(ShellError::NoCurrentJob { builtin })?,
    };

    match jobs.get_by_id(id) {
        Some(_) => Ok(id),
        None => Err(ShellError::NoSuchJob { builtin, id }),
    }
}

/// Marks the job running with the given placement, prints it and sends
/// SIGCONT to its whole group. Returns the job's pid.
fn resume(jobs: &mut JobTable, id: u32, is_background: bool) -> Option<libc::pid_t> {
    let job = jobs.get_by_id_mut(id)?;
    job.state = JobState::Running;
    job.is_background = is_background;
    println!("{}", job);

    let pid = job.pid;
    if unsafe { libc::kill(-pid, libc::SIGCONT) } < 0 {
        warn!(
            "SIGCONT to group {} failed: {}",
            pid,
            std::io::Error::last_os_error()
        );
    }
    jobs.set_current(id);
    info!("Job {} continued in {}.", id, if is_background { "background" } else { "foreground" });
    Some(pid)
}

fn foreground(shell: &mut Shell, arg: Option<&str>) -> Result<Flow> {
    let id = resolve_job(&shell.jobs, "fg", arg)?;
    if let Some(pid) = resume(&mut shell.jobs, id, false) {
        wait_foreground(&mut shell.jobs, &shell.terminal, pid);
    }
    Ok(Flow::Continue)
}

fn background(jobs: &mut JobTable, arg: Option<&str>) -> Result<Flow> {
    let id = resolve_job(jobs, "bg", arg)?;
    resume(jobs, id, true);
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::terminal::Terminal;
    use crate::models::job::Job;

    fn shell() -> Shell {
        Shell::new(Terminal::new(unsafe { libc::getpgrp() }, false))
    }

    fn command(line: &str) -> Command {
        Command::new(line.split(' ').map(String::from).collect())
    }

    fn run(shell: &mut Shell, line: &str) -> Result<Flow> {
        dispatch(shell, &command(line)).expect("should be a builtin")
    }

    fn kill_and_reap(pid: libc::pid_t) {
        unsafe {
            libc::kill(-pid, libc::SIGKILL);
            libc::waitpid(pid, std::ptr::null_mut(), 0);
        }
    }

    #[test]
    fn external_programs_are_not_builtins() {
        let mut shell = shell();
        assert!(dispatch(&mut shell, &command("ls -l")).is_none());
    }

    #[test]
    fn exit_ends_the_loop() {
        let mut shell = shell();
        assert_eq!(run(&mut shell, "exit").unwrap(), Flow::Exit);
    }

    #[test]
    fn fg_on_empty_table_reports_no_such_job() {
        let mut shell = shell();
        let err = run(&mut shell, "fg").unwrap_err();
        assert_eq!(err.to_string(), "fg: no such job.");

        let err = run(&mut shell, "fg 3").unwrap_err();
        assert_eq!(err.to_string(), "fg 3: no such job.");
        assert!(shell.jobs.is_empty());
        assert_eq!(shell.jobs.current(), None);
    }

    #[test]
    fn non_numeric_job_id_is_a_usage_error() {
        let mut shell = shell();
        assert!(matches!(
            run(&mut shell, "bg x1"),
            Err(ShellError::JobUsage { builtin: "bg" })
        ));
        assert!(matches!(
            run(&mut shell, "fg -1"),
            Err(ShellError::JobUsage { builtin: "fg" })
        ));
    }

    #[test]
    fn jobs_lists_in_id_order_with_background_marker() {
        let mut jobs = JobTable::new();
        for (pid, line, bg) in [(10, "sleep 10", true), (11, "vi notes", false)] {
            let mut job = Job::new(line.into(), vec![command(line)], bg);
            job.pid = pid;
            jobs.insert(job);
        }
        assert_eq!(job_lines(&jobs), vec!["1: sleep 10 [&]", "2: vi notes"]);
    }

    #[test]
    fn cd_changes_directory_and_survives_failure() {
        let original = env::current_dir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell();

        let target = dir.path().to_str().unwrap().to_string();
        run(&mut shell, &format!("cd {}", target)).unwrap();
        assert_eq!(
            env::current_dir().unwrap().canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );

        let missing = dir.path().join("missing");
        let err = run(&mut shell, &format!("cd {}", missing.display())).unwrap_err();
        assert!(matches!(err, ShellError::ChangeDir { .. }));
        assert_eq!(
            env::current_dir().unwrap().canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );

        assert!(matches!(
            run(&mut shell, "cd"),
            Err(ShellError::MissingOperand("cd"))
        ));
        env::set_current_dir(original).unwrap();
    }

    #[test]
    fn bg_resumes_a_stopped_job() {
        let mut shell = shell();
        shell.execute_line("sleep 100 &").unwrap();
        let pid = shell.jobs.iter().next().unwrap().pid;

        unsafe {
            libc::kill(-pid, libc::SIGSTOP);
        }
        shell.jobs.set_state(pid, JobState::Stopped);
        shell.jobs.get_by_id_mut(1).unwrap().is_background = false;

        run(&mut shell, "bg 1").unwrap();
        let job = shell.jobs.get_by_id(1).unwrap();
        assert_eq!(job.state, JobState::Running);
        assert!(job.is_background);
        assert_eq!(shell.jobs.current(), Some(1));

        kill_and_reap(pid);
    }

    #[test]
    fn fg_waits_for_the_job_and_removes_it() {
        let mut shell = shell();
        shell.execute_line("sleep 0.2 &").unwrap();
        assert_eq!(shell.jobs.len(), 1);

        run(&mut shell, "fg").unwrap();
        assert!(shell.jobs.is_empty());
    }
}
