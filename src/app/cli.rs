use std::io::{self, Write};

use crossbeam_channel::{bounded, unbounded, Receiver};
use log::{error, info};

use crate::builtins::Flow;
use crate::models::message::ShellMessage;
use crate::shell::Shell;
use crate::worker::worker::{spawn_input_reader, spawn_signal_forwarder};

/// Runs the read-parse-dispatch loop until `exit` or end of input.
pub fn run_cli(mut shell: Shell, prompt: Option<&str>) -> i32 {
    let (sender, receiver) = unbounded();
    let (request_tx, request_rx) = bounded(1);

    if let Err(e) = spawn_signal_forwarder(sender.clone()) {
        error!("Failed to watch SIGCHLD, reaping once per prompt only: {}", e);
    }
    spawn_input_reader(sender, request_rx);

    info!(
        "Shell started (pgid {}, terminal arbitration {}).",
        shell.terminal.shell_pgid(),
        if shell.terminal.is_enabled() { "on" } else { "off" }
    );

    loop {
        print_notices(&mut shell);
        if let Some(prompt) = prompt {
            print!("{}", prompt);
            let _ = io::stdout().flush();
        }
        if request_tx.send(()).is_err() {
            break;
        }

        let Some(line) = next_line(&mut shell, &receiver) else {
            println!();
            break;
        };

        match shell.execute_line(&line) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(e) => println!("{}", e),
        }
    }

    if !shell.jobs.is_empty() {
        info!("Exiting with {} job(s) left running.", shell.jobs.len());
    }
    0
}

/// Waits for the requested line, settling child state changes as they arrive.
/// `None` means input is exhausted.
fn next_line(shell: &mut Shell, receiver: &Receiver<ShellMessage>) -> Option<String> {
    loop {
        match receiver.recv() {
            Ok(ShellMessage::Line(line)) => return Some(line),
            Ok(ShellMessage::ChildChanged) => print_notices(shell),
            Ok(ShellMessage::Eof) | Err(_) => return None,
        }
    }
}

fn print_notices(shell: &mut Shell) {
    for notice in shell.reap() {
        println!("{}", notice);
    }
}
