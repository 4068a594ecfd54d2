/// Events delivered to the main loop by the reader and signal forwarder threads.
#[derive(Debug)]
pub enum ShellMessage {
    Line(String),
    Eof,
    ChildChanged,
}
