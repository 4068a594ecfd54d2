use std::{
    io::{self, BufRead, Read},
    thread,
};

use crossbeam_channel::{Receiver, Sender};
use log::{debug, error};
use signal_hook::{consts::SIGCHLD, iterator::Signals};

use crate::models::message::ShellMessage;
use crate::parser::tokenizer::MAX_LINE;

/// Reads one line from standard input each time the main loop asks for one.
/// Reading only on request keeps the shell off the terminal while a
/// foreground job owns it.
pub fn spawn_input_reader(sender: Sender<ShellMessage>, requests: Receiver<()>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for () in requests.iter() {
            let message = match read_bounded_line(&mut stdin.lock()) {
                Ok(Some(line)) => ShellMessage::Line(line),
                Ok(None) => ShellMessage::Eof,
                Err(e) => {
                    error!("Failed to read input: {}", e);
                    ShellMessage::Eof
                }
            };
            let done = matches!(message, ShellMessage::Eof);
            if sender.send(message).is_err() || done {
                break;
            }
        }
        debug!("Input reader finished.");
    });
}

/// Reads one line without its newline, buffering at most a little over
/// `MAX_LINE` bytes. The rest of an overlong line is discarded; what was kept
/// is still longer than `MAX_LINE`, so the tokenizer rejects it. Bytes that are
/// not UTF-8 become U+FFFD instead of failing the read.
pub fn read_bounded_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut buf = Vec::with_capacity(MAX_LINE + 2);
    let n = reader
        .by_ref()
        .take(MAX_LINE as u64 + 2)
        .read_until(b'\n', &mut buf)?;
    if n == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
    } else if buf.len() > MAX_LINE {
        skip_line(reader)?;
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

fn skip_line<R: BufRead>(reader: &mut R) -> io::Result<()> {
    loop {
        let (found, used) = {
            let available = reader.fill_buf()?;
            if available.is_empty() {
                return Ok(());
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(i) => (true, i + 1),
                None => (false, available.len()),
            }
        };
        reader.consume(used);
        if found {
            return Ok(());
        }
    }
}

/// Turns every SIGCHLD into a `ChildChanged` message. The signal handler
/// itself only wakes this thread; reaping happens on the main loop.
pub fn spawn_signal_forwarder(sender: Sender<ShellMessage>) -> io::Result<()> {
    let mut signals = Signals::new([SIGCHLD])?;
    thread::spawn(move || {
        for _ in signals.forever() {
            if sender.send(ShellMessage::ChildChanged).is_err() {
                break;
            }
        }
        debug!("Signal forwarder finished.");
    });
    Ok(())
}
